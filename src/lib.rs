// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Activation - Challenge-Response Activation Service
//!
//! This crate gates access to wallet-backed features behind a
//! challenge-response proof of EVM key ownership, and derives custodial
//! wallets from encrypted mnemonic uploads.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `crypto` - Challenge generation, signature recovery, mnemonic codec
//! - `service` - Activation lifecycle orchestration
//! - `storage` - Embedded activation database (redb)

pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod service;
pub mod state;
pub mod storage;
