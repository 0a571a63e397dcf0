// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::ExpirationPolicy;
use crate::crypto::MnemonicCodec;
use crate::service::ActivationService;
use crate::storage::ActivationDb;

/// Shared application state handed to every handler.
///
/// Cheap to clone; the database handle is reference-counted and redb
/// serializes concurrent writers internally.
#[derive(Clone)]
pub struct AppState {
    pub service: ActivationService,
}

impl AppState {
    pub fn new(db: Arc<ActivationDb>, codec: MnemonicCodec, expiration: ExpirationPolicy) -> Self {
        Self {
            service: ActivationService::new(db, codec, expiration),
        }
    }
}
