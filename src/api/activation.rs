// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge and activation API endpoints.
//!
//! A client obtains a challenge for its session, signs it with the wallet it
//! claims to control, and either verifies the signature standalone or
//! exchanges it for an activation record. Challenges are single use.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ActivationError,
    models::{
        ActivateRequest, ActivationStatus, ChallengeResponse, VerifyChallengeRequest,
        VerifyChallengeResponse,
    },
    state::AppState,
};

/// Issue a fresh challenge bound to the session.
///
/// Re-requesting supersedes any previously issued challenge for the same
/// session.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/challenge",
    params(
        ("session_id" = String, Path, description = "Session to bind the challenge to")
    ),
    tag = "Activation",
    responses(
        (status = 201, description = "Challenge issued", body = ChallengeResponse),
        (status = 400, description = "Invalid session id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn issue_challenge(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ChallengeResponse>), ActivationError> {
    let challenge = state.service.issue_challenge(&session_id)?;
    Ok((StatusCode::CREATED, Json(ChallengeResponse { challenge })))
}

/// Verify a signature over the session's challenge without activating.
///
/// Consumes the challenge either way; a failed attempt needs a fresh one.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/verify",
    params(
        ("session_id" = String, Path, description = "Session whose challenge was signed")
    ),
    request_body = VerifyChallengeRequest,
    tag = "Activation",
    responses(
        (status = 200, description = "Verification outcome", body = VerifyChallengeResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn verify_challenge(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<VerifyChallengeRequest>,
) -> Result<Json<VerifyChallengeResponse>, ActivationError> {
    let valid = state
        .service
        .verify_challenge(&session_id, &request.signature, &request.address)?;
    Ok(Json(VerifyChallengeResponse { valid }))
}

/// Activate a user from a signed challenge.
///
/// On success the response carries the computed expiration. A failed
/// signature check returns 401 and writes nothing.
#[utoipa::path(
    post,
    path = "/v1/users/{user_id}/activate",
    params(
        ("user_id" = String, Path, description = "User to activate")
    ),
    request_body = ActivateRequest,
    tag = "Activation",
    responses(
        (status = 200, description = "User activated", body = ActivationStatus),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Signature or challenge rejected"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn activate_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<ActivateRequest>,
) -> Result<Json<ActivationStatus>, ActivationError> {
    let status = state.service.activate(
        &user_id,
        &request.address,
        &request.signature,
        &request.session_id,
    )?;
    Ok(Json(status))
}

/// Current activation state for a user.
///
/// Unknown and expired users both report `valid: false`; neither is an
/// error.
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/activation",
    params(
        ("user_id" = String, Path, description = "User to check")
    ),
    tag = "Activation",
    responses(
        (status = 200, description = "Activation state", body = ActivationStatus),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn check_activation(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ActivationStatus>, ActivationError> {
    let status = state.service.check_activation(&user_id)?;
    Ok(Json(status))
}
