//! Application configuration loaded from environment variables.
//!
//! Only non-sensitive settings live here. SMTP secrets are resolved per
//! invocation by [`crate::services::MailerConfig`] and deliberately kept
//! out of this struct.

use std::env;

/// Notification server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Dashboard URL included in the alert email body
    pub dashboard_url: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            dashboard_url: "https://example.com/dashboard".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            dashboard_url: env::var("DASHBOARD_URL")
                .map_err(|_| ConfigError::Missing("DASHBOARD_URL"))?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
