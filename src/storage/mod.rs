// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistent Storage Module
//!
//! Activation state lives in an embedded redb database (pure Rust, ACID).
//! Every upsert runs in a single write transaction, so readers never observe
//! a half-written record, and the database file is the authoritative store
//! for challenge state in multi-process deployments.
//!
//! ## Table Layout
//!
//! - `activations`: user_id → serialized ActivationRecord
//! - `wallet_credentials`: user_id → serialized WalletCredential
//! - `session_challenges`: session_id → hex challenge value

pub mod database;

pub use database::{ActivationDb, StoreError, StoreResult};
