// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Visitor notification endpoint.
//!
//! `POST /notify` validates the request body and relays a visitor-alert
//! email. Responses are plain text: 200 on relay success, 400 on
//! validation failure, 405 on wrong method (via method routing), 500 on
//! missing secrets or transport failure.

use crate::error::AppError;
use crate::services::MailerConfig;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Router};
use std::sync::Arc;

/// Notification routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/notify", post(send_visitor_alert))
}

/// Extract the visitor id from the request body.
///
/// The tracker sends a raw JSON object, but some callers double-encode
/// and send a JSON string containing that object; both are accepted.
fn parse_notify_body(raw: &str) -> Result<String, AppError> {
    let invalid = || AppError::BadRequest("Missing or invalid 'id'".to_string());

    let mut value: serde_json::Value = serde_json::from_str(raw).map_err(|_| invalid())?;

    if let serde_json::Value::String(inner) = &value {
        value = serde_json::from_str(inner).map_err(|_| invalid())?;
    }

    match value.get("id") {
        Some(serde_json::Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(invalid()),
    }
}

/// Handle a visitor notification (POST).
async fn send_visitor_alert(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<(StatusCode, &'static str), AppError> {
    let visitor_id = parse_notify_body(&body)?;

    tracing::info!(visitor_id = %visitor_id, "Visitor notification received");

    // Secrets are re-resolved for every invocation; see services::mailer.
    let mail_config = MailerConfig::from_env()?;

    state
        .mailer
        .send_visitor_alert(&mail_config, &visitor_id, &state.config.dashboard_url)
        .await?;

    Ok((StatusCode::OK, "Email sent successfully"))
}
