// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service error taxonomy.
//!
//! Every operation returns a structured outcome carrying a stable error
//! kind. Cryptographic and validation failures are converted at the
//! operation boundary; storage failures keep their distinguishing kind so
//! callers can retry transient errors. Error text never contains mnemonics,
//! private keys, or decrypted payloads.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::crypto::CodecError;
use crate::storage::StoreError;

/// Error type for activation and wallet-derivation operations.
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    /// Missing or malformed input; the caller can fix and resend.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Signature invalid, or no challenge bound to the session.
    #[error("authentication failed")]
    Authentication,

    /// The decrypted phrase failed BIP-39 wordlist/checksum validation.
    #[error("invalid mnemonic phrase")]
    InvalidMnemonic,

    /// The encrypted payload could not be decrypted.
    #[error("failed to decrypt payload")]
    Decryption,

    /// Persistence-layer failure; callers may retry.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Catch-all for failures with no more specific kind.
    #[error("internal error: {0}")]
    Unknown(String),
}

impl From<CodecError> for ActivationError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Decryption => ActivationError::Decryption,
            CodecError::InvalidMnemonic => ActivationError::InvalidMnemonic,
            CodecError::Derivation => ActivationError::Unknown("wallet derivation failed".into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: String,
}

impl ActivationError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ActivationError::Validation(_) => "validation_error",
            ActivationError::Authentication => "authentication_error",
            ActivationError::InvalidMnemonic => "invalid_mnemonic",
            ActivationError::Decryption => "decryption_error",
            ActivationError::Storage(_) => "storage_error",
            ActivationError::Unknown(_) => "unknown_error",
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActivationError::Validation(_) | ActivationError::Decryption => {
                StatusCode::BAD_REQUEST
            }
            ActivationError::Authentication => StatusCode::UNAUTHORIZED,
            ActivationError::InvalidMnemonic => StatusCode::UNPROCESSABLE_ENTITY,
            ActivationError::Storage(_) | ActivationError::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ActivationError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Storage internals stay in the logs, not in the response body.
        let message = match &self {
            ActivationError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                "storage error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorBody {
            error: message,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ActivationError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ActivationError::Authentication.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ActivationError::InvalidMnemonic.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ActivationError::Decryption.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ActivationError::Unknown("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn into_response_carries_error_code() {
        let response = ActivationError::InvalidMnemonic.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "invalid_mnemonic");
        assert_eq!(body["error"], "invalid mnemonic phrase");
    }

    #[tokio::test]
    async fn storage_response_hides_details() {
        let err = ActivationError::Storage(StoreError::NotFound("secret-path".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "storage error");
        assert_eq!(body["error_code"], "storage_error");
    }
}
