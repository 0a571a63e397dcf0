// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc};

use axum_server::tls_rustls::RustlsConfig;
use tracing_subscriber::EnvFilter;

use relational_activation_server::{
    api::router, config::AppConfig, crypto::MnemonicCodec, state::AppState,
    storage::ActivationDb,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = env::var("LOG_FORMAT").unwrap_or_default();

    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Open the database before binding: a service that cannot reach its
    // store must not report ready.
    let db = match ActivationDb::open(&config.data_dir) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!(error = %e, data_dir = %config.data_dir.display(), "failed to open activation database");
            std::process::exit(1);
        }
    };

    let state = AppState::new(
        db,
        MnemonicCodec::new(config.encryption_key),
        config.expiration,
    );
    let app = router(state);

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "invalid bind address");
            std::process::exit(1);
        }
    };

    match &config.tls {
        Some(tls) => {
            // Install the ring crypto provider for rustls (must be done before any TLS operations)
            if rustls::crypto::ring::default_provider()
                .install_default()
                .is_err()
            {
                tracing::error!("failed to install rustls crypto provider");
                std::process::exit(1);
            }

            let tls_config =
                match RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await {
                    Ok(tls_config) => tls_config,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to load TLS credentials");
                        std::process::exit(1);
                    }
                };

            tracing::info!(%addr, "activation server listening on https (docs at /docs)");
            if let Err(e) = axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await
            {
                tracing::error!(error = %e, "https server failed");
                std::process::exit(1);
            }
        }
        None => {
            tracing::info!(%addr, "activation server listening on http (docs at /docs)");
            if let Err(e) = axum_server::bind(addr)
                .serve(app.into_make_service())
                .await
            {
                tracing::error!(error = %e, "http server failed");
                std::process::exit(1);
            }
        }
    }
}
