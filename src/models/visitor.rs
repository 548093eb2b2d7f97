// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Visitor and action-log models for storage and the notify API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored visitor record in Firestore, keyed by visitor id.
///
/// Field names stay camelCase to match the dashboard's expectations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    /// Visitor identifier (also used as document ID)
    pub id: String,
    /// First-seen timestamp (ISO 8601), set exactly once
    pub first_visit: String,
}

/// Append-only action log entry under `visitors/{id}/logs`.
///
/// Metadata fields are flattened into the document, alongside `action`
/// and `timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    /// Free-form action label ("click", "scroll", ...)
    pub action: String,
    /// Timestamp (ISO 8601) assigned at write time
    pub timestamp: String,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Body of the notification trigger POST. Transient, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub id: String,
}
