// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        ActivateRequest, ActivationStatus, ChallengeResponse, CredentialListResponse,
        CredentialSummary, UploadMnemonicRequest, UploadMnemonicResponse, VerifyChallengeRequest,
        VerifyChallengeResponse,
    },
    state::AppState,
};

pub mod activation;
pub mod health;
pub mod mnemonic;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/sessions/{session_id}/challenge",
            post(activation::issue_challenge),
        )
        .route(
            "/sessions/{session_id}/verify",
            post(activation::verify_challenge),
        )
        .route("/users/{user_id}/activate", post(activation::activate_user))
        .route(
            "/users/{user_id}/activation",
            get(activation::check_activation),
        )
        .route("/users/{user_id}/mnemonic", post(mnemonic::upload_mnemonic))
        .route("/credentials", get(mnemonic::list_credentials));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        activation::issue_challenge,
        activation::verify_challenge,
        activation::activate_user,
        activation::check_activation,
        mnemonic::upload_mnemonic,
        mnemonic::list_credentials,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            ChallengeResponse,
            VerifyChallengeRequest,
            VerifyChallengeResponse,
            ActivateRequest,
            ActivationStatus,
            UploadMnemonicRequest,
            UploadMnemonicResponse,
            CredentialSummary,
            CredentialListResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Activation", description = "Challenge issuance and user activation"),
        (name = "Wallet", description = "Mnemonic upload and derived credentials"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
