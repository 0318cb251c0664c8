// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{error::Error, sync::Arc, time::Duration};

use donations_gateway::{
    api::{cors_layer, router},
    auth::{AuthGuard, JwtVerifier},
    config::GatewayConfig,
    logging::init_tracing,
    metrics::GatewayMetrics,
    providers::{BackendClient, SmtpMailer},
    state::AppState,
};
use tracing::info;

const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // A missing .env file is fine; the environment may be set directly.
    dotenv::dotenv().ok();

    let config = GatewayConfig::from_env()?;
    init_tracing(config.log_format)?;

    let backend = BackendClient::new(config.backend_base_url.clone(), config.upstream_timeout)?;
    let mailer = SmtpMailer::new(&config.mail, config.upstream_timeout)?;
    let metrics = GatewayMetrics::new()?;
    let auth = AuthGuard::new(JwtVerifier::hs256(
        config.jwt.secret.as_bytes(),
        config.jwt.leeway_secs,
    ));

    let state = AppState::new(backend, Arc::new(mailer), metrics.clone(), auth)
        .with_image_proxy_auth(config.image_proxy_require_auth);
    let app = router(state, cors_layer(config.cors_allowed_origin.as_deref())?);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(METRICS_UPKEEP_INTERVAL);
        loop {
            interval.tick().await;
            metrics.run_upkeep();
        }
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        backend = %config.backend_base_url,
        mail_server = %config.mail.server,
        "Donations gateway listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Donations gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
