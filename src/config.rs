// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and the
//! process fails fast on anything malformed. The service never accepts
//! requests with a half-initialized configuration.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Directory holding the activation database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ENCRYPTION_KEY` | Hex-encoded 32-byte AES-256 key for mnemonic transport | Required |
//! | `ACTIVATION_PERIOD_DAYS` | Activation validity in days; unset/`-1`/unparsable = no expiration | Unset |
//! | `TLS_CERT_PATH` | PEM certificate chain (HTTPS when set together with key) | Unset |
//! | `TLS_KEY_PATH` | PEM private key | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the mnemonic transport key.
pub const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";

/// Environment variable name for the activation period.
pub const ACTIVATION_PERIOD_ENV: &str = "ACTIVATION_PERIOD_DAYS";

/// AES-256 key length in bytes.
pub const ENCRYPTION_KEY_LEN: usize = 32;

/// Configuration errors abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ENCRYPTION_KEY is required")]
    MissingEncryptionKey,

    #[error("ENCRYPTION_KEY must be {expected} hex-encoded bytes, got {actual}")]
    InvalidEncryptionKeyLength { expected: usize, actual: usize },

    #[error("ENCRYPTION_KEY is not valid hex: {0}")]
    InvalidEncryptionKeyHex(String),

    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
}

/// How long an activation stays valid once granted.
///
/// An unset, `-1`, or unparsable `ACTIVATION_PERIOD_DAYS` means activations
/// never expire; the record then carries a far-future sentinel date rather
/// than a zero default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationPolicy {
    /// Activation expires this many days after it is granted.
    Days(u32),
    /// No expiration; records carry the far-future sentinel.
    Never,
}

impl ExpirationPolicy {
    /// Parse the policy from the raw environment value.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => match value.parse::<i64>() {
                Ok(days) if (0..=i64::from(u32::MAX)).contains(&days) => {
                    ExpirationPolicy::Days(days as u32)
                }
                _ => ExpirationPolicy::Never,
            },
            _ => ExpirationPolicy::Never,
        }
    }

    /// Compute the expiration date for an activation granted at `now`.
    ///
    /// A period too large for chrono's date range falls back to the
    /// far-future sentinel instead of overflowing.
    pub fn expiration_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ExpirationPolicy::Days(days) => now
                .checked_add_signed(chrono::Duration::days(i64::from(*days)))
                .unwrap_or_else(far_future),
            ExpirationPolicy::Never => far_future(),
        }
    }
}

/// Sentinel date for activations without an expiration.
pub fn far_future() -> DateTime<Utc> {
    // Constant, always representable.
    Utc.with_ymd_and_hms(2099, 12, 31, 0, 0, 0).unwrap()
}

/// TLS certificate and key paths (both required for HTTPS).
#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Fully-parsed runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the activation database file.
    pub data_dir: PathBuf,
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// AES-256 key for decrypting uploaded mnemonics.
    pub encryption_key: [u8; ENCRYPTION_KEY_LEN],
    /// Activation expiration policy.
    pub expiration: ExpirationPolicy,
    /// HTTPS credentials, when configured.
    pub tls: Option<TlsPaths>,
}

impl AppConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/data"));

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 8080,
        };

        let raw_key =
            env::var(ENCRYPTION_KEY_ENV).map_err(|_| ConfigError::MissingEncryptionKey)?;
        let encryption_key = parse_encryption_key(&raw_key)?;

        let expiration = ExpirationPolicy::parse(env::var(ACTIVATION_PERIOD_ENV).ok().as_deref());

        let tls = match (env::var("TLS_CERT_PATH").ok(), env::var("TLS_KEY_PATH").ok()) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            data_dir,
            host,
            port,
            encryption_key,
            expiration,
            tls,
        })
    }
}

/// Decode and length-check the hex-encoded transport key.
pub fn parse_encryption_key(hex_key: &str) -> Result<[u8; ENCRYPTION_KEY_LEN], ConfigError> {
    let bytes = alloy::hex::decode(hex_key.trim())
        .map_err(|e| ConfigError::InvalidEncryptionKeyHex(e.to_string()))?;

    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| ConfigError::InvalidEncryptionKeyLength {
            expected: ENCRYPTION_KEY_LEN,
            actual,
        })
}
