// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Activation orchestration.
//!
//! Ties the leaf components together: challenge issuance, signed-response
//! verification, activation record lifecycle, and mnemonic-to-wallet
//! derivation. Per user the state machine is
//! `UNACTIVATED → ACTIVE → EXPIRED`; expired and unactivated users are
//! indistinguishable to callers (`valid = false`).
//!
//! Requests execute independently. The only cross-request state is the
//! database, which is also the authoritative store for challenges, so
//! issuance and verification may run in different processes.

use std::sync::Arc;

use chrono::Utc;

use crate::config::ExpirationPolicy;
use crate::crypto::{generate_challenge, verify_signature, MnemonicCodec};
use crate::error::ActivationError;
use crate::models::{ActivationRecord, ActivationStatus, CredentialSummary, WalletCredential};
use crate::storage::ActivationDb;

/// Orchestrates challenge, verification, activation, and derivation flows.
#[derive(Clone)]
pub struct ActivationService {
    db: Arc<ActivationDb>,
    codec: MnemonicCodec,
    expiration: ExpirationPolicy,
}

impl ActivationService {
    /// Create a service over an opened database.
    ///
    /// The database handle is injected explicitly; there is no global
    /// connection state and no "connecting" limbo once this exists.
    pub fn new(db: Arc<ActivationDb>, codec: MnemonicCodec, expiration: ExpirationPolicy) -> Self {
        Self {
            db,
            codec,
            expiration,
        }
    }

    /// Issue a fresh single-use challenge bound to a session.
    ///
    /// A re-issue for the same session supersedes the previous value.
    pub fn issue_challenge(&self, session_id: &str) -> Result<String, ActivationError> {
        if session_id.trim().is_empty() {
            return Err(ActivationError::Validation("session id is required".into()));
        }

        let challenge = generate_challenge()
            .map_err(|e| ActivationError::Unknown(format!("entropy source failure: {e}")))?;
        self.db.put_challenge(session_id, &challenge)?;
        Ok(challenge)
    }

    /// Verify a signature over the challenge bound to `session_id`.
    ///
    /// Consumes the challenge: a second attempt needs a fresh issuance.
    /// A session with no bound challenge fails closed (`false`), never
    /// treating absence as "always true".
    pub fn verify_challenge(
        &self,
        session_id: &str,
        signature: &str,
        address: &str,
    ) -> Result<bool, ActivationError> {
        let Some(challenge) = self.db.take_challenge(session_id)? else {
            return Ok(false);
        };
        Ok(verify_signature(&challenge, signature, address))
    }

    /// Activate a user after they signed their session's challenge.
    ///
    /// On verification failure nothing is written. A successful
    /// re-activation replaces the prior record and resets the expiration
    /// clock; it never double-creates.
    pub fn activate(
        &self,
        user_id: &str,
        address: &str,
        signature: &str,
        session_id: &str,
    ) -> Result<ActivationStatus, ActivationError> {
        if user_id.trim().is_empty() {
            return Err(ActivationError::Validation("user id is required".into()));
        }
        if address.trim().is_empty() || signature.trim().is_empty() {
            return Err(ActivationError::Validation(
                "address and signature are required".into(),
            ));
        }

        let Some(challenge) = self.db.take_challenge(session_id)? else {
            tracing::debug!(user_id, session_id, "activation attempt with no bound challenge");
            return Err(ActivationError::Authentication);
        };

        if !verify_signature(&challenge, signature, address) {
            tracing::debug!(user_id, "challenge signature rejected");
            return Err(ActivationError::Authentication);
        }

        let now = Utc::now();
        let record = ActivationRecord {
            user_id: user_id.to_string(),
            user_address: address.to_string(),
            signature: signature.to_string(),
            expiration_date: self.expiration.expiration_from(now),
            created_at: now,
        };
        let stored = self.db.upsert_activation(&record)?;

        tracing::info!(user_id, address, expiration = %stored.expiration_date, "user activated");
        Ok(ActivationStatus {
            valid: true,
            expiration_date: Some(stored.expiration_date),
        })
    }

    /// Current activation state for a user.
    ///
    /// Read-only; an absent or expired record is a normal `valid = false`
    /// outcome, not an error.
    pub fn check_activation(&self, user_id: &str) -> Result<ActivationStatus, ActivationError> {
        let Some(record) = self.db.find_activation(user_id)? else {
            return Ok(ActivationStatus::invalid());
        };

        if !record.is_current(Utc::now()) {
            tracing::debug!(user_id, expired = %record.expiration_date, "activation expired");
            return Ok(ActivationStatus::invalid());
        }

        Ok(ActivationStatus {
            valid: true,
            expiration_date: Some(record.expiration_date),
        })
    }

    /// Decrypt an uploaded mnemonic, derive its wallet, persist the
    /// credential, and return the derived address.
    ///
    /// The plaintext phrase is dropped at the end of this call; only the
    /// derived key pair is retained, and neither appears in logs.
    pub fn upload_mnemonic(
        &self,
        user_id: &str,
        encrypted_mnemonic: &str,
    ) -> Result<String, ActivationError> {
        if user_id.trim().is_empty() {
            return Err(ActivationError::Validation("user id is required".into()));
        }
        if encrypted_mnemonic.trim().is_empty() {
            return Err(ActivationError::Validation(
                "encrypted mnemonic is required".into(),
            ));
        }

        let phrase = self.codec.decrypt(encrypted_mnemonic)?;
        let wallet = self.codec.derive(&phrase)?;

        let credential = WalletCredential {
            user_id: user_id.to_string(),
            user_address: wallet.address.clone(),
            user_private_key: wallet.private_key,
            created_at: Utc::now(),
        };
        self.db.upsert_credential(&credential)?;

        tracing::info!(user_id, address = %wallet.address, "wallet credential derived");
        Ok(wallet.address)
    }

    /// Derived credential summaries created within the given range.
    pub fn list_credentials(
        &self,
        start: Option<chrono::DateTime<Utc>>,
        end: Option<chrono::DateTime<Utc>>,
    ) -> Result<Vec<CredentialSummary>, ActivationError> {
        let credentials = self.db.list_credentials(start, end)?;
        Ok(credentials.into_iter().map(CredentialSummary::from).collect())
    }
}
