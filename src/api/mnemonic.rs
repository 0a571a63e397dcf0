// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mnemonic upload and credential listing endpoints.
//!
//! Uploads carry an encrypted payload; the plaintext phrase never leaves the
//! service boundary and responses expose only the derived address. The
//! listing endpoint returns summaries without private keys.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::ActivationError,
    models::{CredentialListResponse, UploadMnemonicRequest, UploadMnemonicResponse},
    state::AppState,
};

/// Optional `created_at` range filter for credential listings.
#[derive(Deserialize, IntoParams)]
pub struct CredentialRangeQuery {
    /// Inclusive lower bound on creation time (RFC 3339).
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time (RFC 3339).
    pub end: Option<DateTime<Utc>>,
}

/// Upload an encrypted mnemonic and derive the user's wallet.
///
/// The payload is base64 of `IV || AES-256-CBC ciphertext` under the shared
/// transport key. Returns the derived address, never key material.
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/mnemonic",
    params(
        ("user_id" = String, Path, description = "User the wallet belongs to")
    ),
    request_body = UploadMnemonicRequest,
    tag = "Wallet",
    responses(
        (status = 201, description = "Wallet derived and stored", body = UploadMnemonicResponse),
        (status = 400, description = "Invalid request or undecryptable payload"),
        (status = 422, description = "Decrypted phrase fails BIP-39 validation"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upload_mnemonic(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UploadMnemonicRequest>,
) -> Result<(StatusCode, Json<UploadMnemonicResponse>), ActivationError> {
    let address = state
        .service
        .upload_mnemonic(&user_id, &request.encrypted_mnemonic)?;
    Ok((StatusCode::CREATED, Json(UploadMnemonicResponse { address })))
}

/// List derived credentials created within an optional time range.
#[utoipa::path(
    get,
    path = "/v1/credentials",
    params(CredentialRangeQuery),
    tag = "Wallet",
    responses(
        (status = 200, description = "Credential summaries", body = CredentialListResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_credentials(
    State(state): State<AppState>,
    Query(range): Query<CredentialRangeQuery>,
) -> Result<Json<CredentialListResponse>, ActivationError> {
    let credentials = state.service.list_credentials(range.start, range.end)?;
    let total = credentials.len();
    Ok(Json(CredentialListResponse { credentials, total }))
}
