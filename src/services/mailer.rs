// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SMTP relay for visitor-alert emails.
//!
//! Secrets are resolved from the environment on every invocation and the
//! SMTP transport is constructed per call. The handler runs in an
//! ephemeral execution environment, so no warm, reusable transport state
//! may be assumed between requests.

use crate::error::AppError;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::env;

/// SMTP settings resolved at invocation time.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP relay hostname
    pub smtp_host: String,
    /// Sender account; alerts are sent from and to this address
    pub sender: String,
    /// Authentication credential for the sender account
    pub password: String,
}

impl MailerConfig {
    /// Resolve SMTP secrets from the environment.
    ///
    /// Both `SMTP_EMAIL` and `SMTP_PASSWORD` are required; an empty
    /// value counts as missing. There is no inline fallback account —
    /// absent secrets fail closed with [`AppError::MissingSecrets`].
    pub fn from_env() -> Result<Self, AppError> {
        let sender = env::var("SMTP_EMAIL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(AppError::MissingSecrets)?;

        let password = env::var("SMTP_PASSWORD")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(AppError::MissingSecrets)?;

        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());

        Ok(Self {
            smtp_host,
            sender: sender.trim().to_string(),
            password,
        })
    }
}

enum MailerMode {
    /// Real SMTP relay
    Smtp,
    /// Accept messages without relaying (offline tests)
    Stub,
}

/// Outbound mail relay.
///
/// The service itself holds no transport and no credentials; it only
/// selects between the real SMTP relay and the offline stub used by
/// tests, mirroring [`crate::db::FirestoreDb::new_mock`].
pub struct MailerService {
    mode: MailerMode,
}

impl Default for MailerService {
    fn default() -> Self {
        Self::new()
    }
}

impl MailerService {
    /// Create a mailer that relays through SMTP.
    pub fn new() -> Self {
        Self {
            mode: MailerMode::Smtp,
        }
    }

    /// Create a stub mailer for testing (no network).
    pub fn new_stub() -> Self {
        Self {
            mode: MailerMode::Stub,
        }
    }

    /// Relay the fixed-template visitor alert for `visitor_id`.
    ///
    /// `config` must be freshly resolved by the caller for this
    /// invocation; see the module docs.
    pub async fn send_visitor_alert(
        &self,
        config: &MailerConfig,
        visitor_id: &str,
        dashboard_url: &str,
    ) -> Result<(), AppError> {
        let sender: Mailbox = config
            .sender
            .parse()
            .map_err(|e| AppError::Mailer(format!("Invalid sender address: {}", e)))?;

        let message = Message::builder()
            .from(sender.clone())
            .to(sender)
            .subject("📬 New Portfolio Visitor")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "A new visitor landed on your portfolio.\n\nVisitor ID: {}\n\nDashboard:\n{}\n",
                visitor_id, dashboard_url
            ))
            .map_err(|e| AppError::Mailer(format!("Failed to build message: {}", e)))?;

        match self.mode {
            MailerMode::Stub => {
                tracing::debug!(visitor_id, "Stub mailer: skipping SMTP relay");
                Ok(())
            }
            MailerMode::Smtp => {
                // Per-invocation transport, built from the credentials
                // resolved for this call.
                let transport: AsyncSmtpTransport<Tokio1Executor> =
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                        .map_err(|e| AppError::Mailer(e.to_string()))?
                        .credentials(Credentials::new(
                            config.sender.clone(),
                            config.password.clone(),
                        ))
                        .build();

                transport
                    .send(message)
                    .await
                    .map_err(|e| AppError::Mailer(e.to_string()))?;

                tracing::info!(visitor_id, "Visitor alert relayed");
                Ok(())
            }
        }
    }
}
