// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Visitor-Beacon Notification Server
//!
//! Stateless HTTP endpoint that relays a visitor-alert email when the
//! tracker client reports a new page visit.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visitor_beacon::{
    config::Config,
    services::{MailerConfig, MailerService},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Visitor-Beacon notifier");

    // Mail secrets are resolved fresh on every request, never cached in
    // AppState. Probe once at startup so a misconfigured deploy shows up
    // in the logs before the first 500.
    if MailerConfig::from_env().is_err() {
        tracing::warn!("Email secrets not configured; /notify will return 500");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        mailer: MailerService::new(),
    });

    // Build router
    let app = visitor_beacon::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("visitor_beacon=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
