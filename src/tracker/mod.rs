// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tracker client: visit recording, notification trigger, action logger.
//!
//! This is the embeddable side of the pipeline. On session start it
//! resolves the visitor identifier, records the visit in Firestore, and
//! fires a best-effort POST to the notification endpoint. Later user
//! interactions go through [`TrackerClient::log_action`].
//!
//! Every network failure here is non-fatal by design: tracking must
//! never break the page the visitor is looking at.

pub mod identity;

pub use identity::IdentityStore;

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{ActionLogEntry, NotifyRequest};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

/// Hostnames on which all tracking network calls are suppressed.
pub const DEV_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1"];

/// True if `hostname` is a recognized local development host.
pub fn is_dev_host(hostname: &str) -> bool {
    DEV_HOSTS.contains(&hostname)
}

/// Tracker configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Hostname the tracked site is served from
    pub hostname: String,
    /// Notification endpoint URL
    pub notify_url: String,
    /// Directory holding the persisted visitor identifier
    pub storage_dir: PathBuf,
    /// GCP project for the Firestore document store
    pub gcp_project_id: String,
}

impl TrackerConfig {
    /// Load tracker configuration from environment variables.
    pub fn from_env() -> Result<Self, crate::config::ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            hostname: env::var("TRACKER_HOSTNAME")
                .unwrap_or_else(|_| "localhost".to_string()),
            notify_url: env::var("NOTIFY_URL")
                .map_err(|_| crate::config::ConfigError::Missing("NOTIFY_URL"))?,
            storage_dir: env::var("TRACKER_STORAGE_DIR")
                .map(PathBuf::from)
                .map_err(|_| crate::config::ConfigError::Missing("TRACKER_STORAGE_DIR"))?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
        })
    }
}

/// Visitor tracking client.
pub struct TrackerClient {
    db: FirestoreDb,
    http: reqwest::Client,
    identity: IdentityStore,
    notify_url: String,
    /// Dev-host gate, evaluated once at construction
    dev_host: bool,
}

impl TrackerClient {
    /// Connect a tracker client from its configuration.
    ///
    /// Opens the Firestore connection for the configured project and
    /// roots the identity store in the configured storage directory.
    pub async fn connect(config: &TrackerConfig) -> Result<Self, AppError> {
        let db = FirestoreDb::new(&config.gcp_project_id).await?;
        let identity = IdentityStore::new(&config.storage_dir);

        Ok(Self::new(
            db,
            identity,
            config.notify_url.clone(),
            &config.hostname,
        ))
    }

    /// Create a tracker client for the site served at `hostname`.
    pub fn new(db: FirestoreDb, identity: IdentityStore, notify_url: String, hostname: &str) -> Self {
        let dev_host = is_dev_host(hostname);
        if dev_host {
            tracing::debug!(hostname, "Dev host detected; tracking calls suppressed");
        }

        Self {
            db,
            http: reqwest::Client::new(),
            identity,
            notify_url,
            dev_host,
        }
    }

    /// Start a tracking session: resolve the visitor id, record the
    /// visit, then trigger the notification.
    ///
    /// The identifier is resolved (and persisted) even on dev hosts;
    /// only the network calls are gated. A visit-recording failure does
    /// not prevent the notification, and no failure propagates to the
    /// caller.
    ///
    /// Returns the visitor id.
    pub async fn start_session(&self) -> String {
        let visitor_id = self.identity.get_or_create();

        if self.dev_host {
            return visitor_id;
        }

        match self.db.record_visit(&visitor_id).await {
            Ok(true) => tracing::info!(visitor_id = %visitor_id, "First visit recorded"),
            Ok(false) => tracing::debug!(visitor_id = %visitor_id, "Returning visitor"),
            Err(e) => tracing::warn!(error = %e, "Failed to record visit"),
        }

        // Notify regardless of whether the record step succeeded; the
        // alert is worth more than exact-once delivery.
        if let Err(e) = self.notify_visitor(&visitor_id).await {
            tracing::warn!(error = %e, "Visitor notification failed");
        }

        visitor_id
    }

    /// Fire the notification POST for `visitor_id`.
    ///
    /// Returns `Ok(false)` when suppressed on a dev host, `Ok(true)` on
    /// a 2xx response. Callers treat errors as log-only.
    pub async fn notify_visitor(&self, visitor_id: &str) -> Result<bool, AppError> {
        if self.dev_host {
            return Ok(false);
        }

        let body = NotifyRequest {
            id: visitor_id.to_string(),
        };

        let response = self
            .http
            .post(&self.notify_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Notify(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Notify(format!(
                "notification endpoint returned {}",
                response.status()
            )));
        }

        Ok(true)
    }

    /// Append one action log entry for the persisted visitor.
    ///
    /// No-ops (`Ok(false)`) on dev hosts and when no visitor identifier
    /// has been persisted; it never creates one implicitly. There is no
    /// retry on failure — analytics loss is non-fatal, callers log and
    /// move on.
    pub async fn log_action(
        &self,
        action: &str,
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> Result<bool, AppError> {
        if self.dev_host {
            tracing::debug!(action, "Dev host: skipping action log");
            return Ok(false);
        }

        let Some(visitor_id) = self.identity.current() else {
            return Ok(false);
        };

        let entry = ActionLogEntry {
            action: action.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            metadata,
        };

        self.db.append_action_log(&visitor_id, &entry).await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_hosts_recognized() {
        assert!(is_dev_host("localhost"));
        assert!(is_dev_host("127.0.0.1"));
        assert!(is_dev_host("::1"));
    }

    #[test]
    fn test_public_hosts_not_suppressed() {
        assert!(!is_dev_host("example.com"));
        assert!(!is_dev_host("localhost.example.com"));
        assert!(!is_dev_host(""));
    }

    #[test]
    fn test_tracker_config_from_env() {
        env::set_var("TRACKER_HOSTNAME", "portfolio.example.com");
        env::set_var("NOTIFY_URL", "https://example.com/notify");
        env::set_var("TRACKER_STORAGE_DIR", "/var/lib/visitor-beacon");

        let config = TrackerConfig::from_env().expect("Tracker config should load");

        assert_eq!(config.hostname, "portfolio.example.com");
        assert_eq!(config.notify_url, "https://example.com/notify");
        assert_eq!(
            config.storage_dir,
            PathBuf::from("/var/lib/visitor-beacon")
        );
        assert!(!is_dev_host(&config.hostname));
    }
}
