// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Stored records and REST request/response structures. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Record Categories
//!
//! - **ActivationRecord**: the time-bounded access grant for a user
//! - **WalletCredential**: key pair derived from an uploaded mnemonic
//! - Request/response bodies for the activation API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Stored Records
// =============================================================================

/// A user's activation grant.
///
/// At most one record exists per `user_id`; activation writes replace any
/// prior record instead of accumulating history. Expired records are never
/// hard-deleted — expiration is a query-time predicate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ActivationRecord {
    /// The activated user.
    pub user_id: String,
    /// EVM address the user proved ownership of.
    pub user_address: String,
    /// The challenge signature that granted this activation.
    pub signature: String,
    /// When the activation stops being valid (far-future sentinel = never).
    pub expiration_date: DateTime<Utc>,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

impl ActivationRecord {
    /// Whether this record grants access at `now`.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date > now
    }

    /// Field-for-field equality excluding `created_at` (the write timestamp).
    ///
    /// Used by the store's idempotency short-circuit: re-writing an
    /// identical grant keeps the existing record untouched.
    pub fn same_grant(&self, other: &ActivationRecord) -> bool {
        self.user_id == other.user_id
            && self.user_address == other.user_address
            && self.signature == other.signature
            && self.expiration_date == other.expiration_date
    }
}

/// Wallet key pair derived from an uploaded mnemonic.
///
/// Only the derived pair is retained; the mnemonic itself is dropped at the
/// moment of derivation and never stored or logged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WalletCredential {
    /// The owning user.
    pub user_id: String,
    /// Derived EVM address (0x-prefixed, 40 hex chars).
    pub user_address: String,
    /// Derived private key (0x-prefixed, 64 hex chars). NEVER returned via API.
    pub user_private_key: String,
    /// When the credential was derived.
    pub created_at: DateTime<Utc>,
}

/// API-visible view of a credential (never includes the private key).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CredentialSummary {
    /// The owning user.
    pub user_id: String,
    /// Derived EVM address.
    pub user_address: String,
    /// When the credential was derived.
    pub created_at: DateTime<Utc>,
}

impl From<WalletCredential> for CredentialSummary {
    fn from(credential: WalletCredential) -> Self {
        Self {
            user_id: credential.user_id,
            user_address: credential.user_address,
            created_at: credential.created_at,
        }
    }
}

// =============================================================================
// Challenge Models
// =============================================================================

/// Response carrying a freshly issued challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChallengeResponse {
    /// Hex-encoded single-use random value the client must sign.
    pub challenge: String,
}

/// Request to verify a signed challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyChallengeRequest {
    /// Address claimed to have produced the signature.
    pub address: String,
    /// Hex-encoded 65-byte signature over the issued challenge.
    pub signature: String,
}

/// Verification outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyChallengeResponse {
    /// Whether the signature matched the bound challenge and address.
    pub valid: bool,
}

// =============================================================================
// Activation Models
// =============================================================================

/// Request to activate a user after signing their session's challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivateRequest {
    /// Session the challenge was issued to.
    pub session_id: String,
    /// Address claimed to have produced the signature.
    pub address: String,
    /// Hex-encoded signature over the issued challenge.
    pub signature: String,
}

/// Activation state as seen by callers.
///
/// An expired record and a missing record are both reported as
/// `valid = false`; the distinction is internal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivationStatus {
    /// Whether the user currently holds a valid activation.
    pub valid: bool,
    /// Expiration of the current grant, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl ActivationStatus {
    /// Status for a user with no current grant.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            expiration_date: None,
        }
    }
}

// =============================================================================
// Mnemonic Models
// =============================================================================

/// Request carrying a transport-encrypted mnemonic.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadMnemonicRequest {
    /// Base64 of `IV (16 bytes) || AES-256-CBC ciphertext`.
    pub encrypted_mnemonic: String,
}

/// Response after a successful mnemonic derivation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadMnemonicResponse {
    /// Address derived from the mnemonic. The private key stays server-side.
    pub address: String,
}

/// Paged list of derived credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CredentialListResponse {
    /// Credential summaries matching the query.
    pub credentials: Vec<CredentialSummary>,
    /// Total count returned.
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(expiration: DateTime<Utc>) -> ActivationRecord {
        ActivationRecord {
            user_id: "u1".into(),
            user_address: "0xabc".into(),
            signature: "0xsig".into(),
            expiration_date: expiration,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn record_is_current_until_expiration() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        assert!(record(now + chrono::Duration::days(1)).is_current(now));
        assert!(!record(now - chrono::Duration::days(1)).is_current(now));
        assert!(!record(now).is_current(now));
    }

    #[test]
    fn same_grant_ignores_created_at() {
        let expiration = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        let mut a = record(expiration);
        let mut b = record(expiration);
        b.created_at = a.created_at + chrono::Duration::hours(3);
        assert!(a.same_grant(&b));

        b.signature = "0xother".into();
        assert!(!a.same_grant(&b));

        b.signature = a.signature.clone();
        a.user_address = "0xdef".into();
        assert!(!a.same_grant(&b));
    }

    #[test]
    fn credential_summary_drops_private_key() {
        let credential = WalletCredential {
            user_id: "u1".into(),
            user_address: "0xabc".into(),
            user_private_key: "0xsecret".into(),
            created_at: Utc::now(),
        };
        let summary = CredentialSummary::from(credential.clone());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("0xsecret"));
        assert_eq!(summary.user_address, credential.user_address);
    }
}
