// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded activation database backed by redb (pure Rust, ACID).
//!
//! Records are stored as JSON bytes keyed by `user_id`, one table per
//! logical collection. An upsert replaces any prior record for the key, so
//! at most one record per user is ever current. Challenges are keyed by
//! session id and removed on consumption.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::{ActivationRecord, WalletCredential};

// =============================================================================
// Table Definitions
// =============================================================================

/// user_id → serialized ActivationRecord (JSON bytes).
const ACTIVATIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("activations");

/// user_id → serialized WalletCredential (JSON bytes).
const WALLET_CREDENTIALS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("wallet_credentials");

/// session_id → hex challenge value.
const SESSION_CHALLENGES: TableDefinition<&str, &str> =
    TableDefinition::new("session_challenges");

/// Database file name under the configured data directory.
const DB_FILE: &str = "activation.redb";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// ActivationDb
// =============================================================================

/// Embedded store for activation records, wallet credentials, and
/// session-bound challenges.
pub struct ActivationDb {
    db: Database,
}

impl ActivationDb {
    /// Open (or create) the database under the given data directory.
    ///
    /// Pre-creates all tables so later read transactions never fail on a
    /// missing table. This must complete before the service accepts
    /// requests; there is no lazily-initialized connection state.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir).ok();
        let db = Database::create(data_dir.join(DB_FILE))?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACTIVATIONS)?;
            let _ = write_txn.open_table(WALLET_CREDENTIALS)?;
            let _ = write_txn.open_table(SESSION_CHALLENGES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Activation Records
    // =========================================================================

    /// Insert or replace the activation record for `record.user_id`.
    ///
    /// Idempotency short-circuit: when the stored record matches the
    /// candidate field-for-field (excluding `created_at`), the write is
    /// skipped and the stored record returned, keeping its original
    /// timestamp. This is an explicit equality check, not an assumption.
    pub fn upsert_activation(&self, record: &ActivationRecord) -> StoreResult<ActivationRecord> {
        let write_txn = self.db.begin_write()?;
        let stored = {
            let mut table = write_txn.open_table(ACTIVATIONS)?;

            let existing = match table.get(record.user_id.as_str())? {
                Some(value) => serde_json::from_slice::<ActivationRecord>(value.value()).ok(),
                None => None,
            };

            match existing {
                Some(current) if current.same_grant(record) => current,
                _ => {
                    let json = serde_json::to_vec(record)?;
                    table.insert(record.user_id.as_str(), json.as_slice())?;
                    record.clone()
                }
            }
        };
        write_txn.commit()?;
        Ok(stored)
    }

    /// Current activation record for a user, if any.
    ///
    /// A record that fails to deserialize (schema drift, partial legacy
    /// data) is reported as absent, matching the validity predicate: a
    /// record with missing fields never grants access.
    pub fn find_activation(&self, user_id: &str) -> StoreResult<Option<ActivationRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACTIVATIONS)?;
        match table.get(user_id)? {
            Some(value) => match serde_json::from_slice(value.value()) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "unreadable activation record treated as absent");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    // =========================================================================
    // Wallet Credentials
    // =========================================================================

    /// Insert or replace the derived credential for `credential.user_id`.
    pub fn upsert_credential(&self, credential: &WalletCredential) -> StoreResult<()> {
        let json = serde_json::to_vec(credential)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(WALLET_CREDENTIALS)?;
            table.insert(credential.user_id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Stored credential for a user, if any.
    pub fn find_credential(&self, user_id: &str) -> StoreResult<Option<WalletCredential>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLET_CREDENTIALS)?;
        match table.get(user_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value()).ok()),
            None => Ok(None),
        }
    }

    /// All credentials whose `created_at` falls in the given range.
    ///
    /// Unreadable entries are skipped rather than failing the listing.
    pub fn list_credentials(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<WalletCredential>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLET_CREDENTIALS)?;

        let mut credentials = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            let Ok(credential) = serde_json::from_slice::<WalletCredential>(entry.1.value())
            else {
                continue;
            };

            if start.is_some_and(|s| credential.created_at < s) {
                continue;
            }
            if end.is_some_and(|e| credential.created_at > e) {
                continue;
            }
            credentials.push(credential);
        }
        Ok(credentials)
    }

    // =========================================================================
    // Session Challenges
    // =========================================================================

    /// Bind a challenge to a session, replacing any previous value.
    pub fn put_challenge(&self, session_id: &str, challenge: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSION_CHALLENGES)?;
            table.insert(session_id, challenge)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Consume the challenge bound to a session.
    ///
    /// The challenge is removed on read: each issued value can back at most
    /// one verification attempt.
    pub fn take_challenge(&self, session_id: &str) -> StoreResult<Option<String>> {
        let write_txn = self.db.begin_write()?;
        let challenge = {
            let mut table = write_txn.open_table(SESSION_CHALLENGES)?;
            // Copy out of the access guard before the table drops.
            let removed = table
                .remove(session_id)?
                .map(|guard| guard.value().to_string());
            removed
        };
        write_txn.commit()?;
        Ok(challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn test_db() -> (ActivationDb, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let db = ActivationDb::open(dir.path()).expect("open db");
        (db, dir)
    }

    fn record(user_id: &str, signature: &str) -> ActivationRecord {
        ActivationRecord {
            user_id: user_id.into(),
            user_address: "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12".into(),
            signature: signature.into(),
            expiration_date: Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn upsert_then_find_activation() {
        let (db, _dir) = test_db();
        let rec = record("u1", "0xsig1");

        db.upsert_activation(&rec).unwrap();
        let found = db.find_activation("u1").unwrap().unwrap();
        assert_eq!(found, rec);

        assert!(db.find_activation("unknown").unwrap().is_none());
    }

    #[test]
    fn upsert_replaces_prior_record() {
        let (db, _dir) = test_db();
        db.upsert_activation(&record("u1", "0xfirst")).unwrap();
        db.upsert_activation(&record("u1", "0xsecond")).unwrap();

        let found = db.find_activation("u1").unwrap().unwrap();
        assert_eq!(found.signature, "0xsecond");
    }

    #[test]
    fn identical_grant_short_circuits_write() {
        let (db, _dir) = test_db();
        let first = record("u1", "0xsig");
        db.upsert_activation(&first).unwrap();

        let mut retry = first.clone();
        retry.created_at = first.created_at + chrono::Duration::hours(1);
        let stored = db.upsert_activation(&retry).unwrap();

        // The original write timestamp survives.
        assert_eq!(stored.created_at, first.created_at);
        let found = db.find_activation("u1").unwrap().unwrap();
        assert_eq!(found.created_at, first.created_at);
    }

    #[test]
    fn credentials_upsert_and_find() {
        let (db, _dir) = test_db();
        let credential = WalletCredential {
            user_id: "u1".into(),
            user_address: "0xabc".into(),
            user_private_key: "0xkey".into(),
            created_at: Utc::now(),
        };

        db.upsert_credential(&credential).unwrap();
        let found = db.find_credential("u1").unwrap().unwrap();
        assert_eq!(found, credential);

        assert!(db.find_credential("nobody").unwrap().is_none());
    }

    #[test]
    fn list_credentials_filters_by_created_at() {
        let (db, _dir) = test_db();
        for (user, day) in [("u1", 1), ("u2", 10), ("u3", 20)] {
            db.upsert_credential(&WalletCredential {
                user_id: user.into(),
                user_address: format!("0x{user}"),
                user_private_key: "0xkey".into(),
                created_at: Utc.with_ymd_and_hms(2026, 3, day, 0, 0, 0).unwrap(),
            })
            .unwrap();
        }

        let all = db.list_credentials(None, None).unwrap();
        assert_eq!(all.len(), 3);

        let from_5th = db
            .list_credentials(
                Some(Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap()),
                None,
            )
            .unwrap();
        assert_eq!(from_5th.len(), 2);

        let middle = db
            .list_credentials(
                Some(Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap()),
                Some(Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap()),
            )
            .unwrap();
        assert_eq!(middle.len(), 1);
        assert_eq!(middle[0].user_id, "u2");
    }

    #[test]
    fn challenge_is_consumed_on_take() {
        let (db, _dir) = test_db();
        db.put_challenge("sess-1", "deadbeef").unwrap();

        assert_eq!(
            db.take_challenge("sess-1").unwrap(),
            Some("deadbeef".to_string())
        );
        // Second take finds nothing: single use.
        assert_eq!(db.take_challenge("sess-1").unwrap(), None);
        assert_eq!(db.take_challenge("never-issued").unwrap(), None);
    }

    #[test]
    fn reissued_challenge_supersedes_previous() {
        let (db, _dir) = test_db();
        db.put_challenge("sess-1", "first").unwrap();
        db.put_challenge("sess-1", "second").unwrap();

        assert_eq!(
            db.take_challenge("sess-1").unwrap(),
            Some("second".to_string())
        );
    }
}
