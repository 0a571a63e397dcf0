// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Cryptographic Primitives
//!
//! The three leaf components of the activation flow:
//!
//! - `challenge` - single-use random challenge generation
//! - `signature` - EVM signature verification (EIP-191 personal sign)
//! - `mnemonic` - encrypted mnemonic transport and HD wallet derivation

pub mod challenge;
pub mod mnemonic;
pub mod signature;

pub use challenge::generate_challenge;
pub use mnemonic::{CodecError, DerivedWallet, MnemonicCodec};
pub use signature::verify_signature;
