// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Visitor-Beacon: visitor tracking and notification pipeline
//!
//! This crate provides the tracker client that records portfolio visits
//! and action logs in Firestore, plus the notification endpoint that
//! relays an email alert when a visitor lands.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod tracker;

use config::Config;
use services::MailerService;

/// Shared application state for the notification endpoint.
pub struct AppState {
    pub config: Config,
    pub mailer: MailerService,
}
