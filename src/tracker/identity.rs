// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable per-installation visitor identifier.
//!
//! The identifier is an opaque UUID v4 stored under a fixed key in the
//! tracker's storage directory. It is created on first resolution and
//! never mutated or deleted by the application.

use std::fs;
use std::path::PathBuf;

/// Fixed storage key for the visitor identifier.
pub const VISITOR_ID_KEY: &str = "visitor_id";

/// File-backed store for the visitor identifier.
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Create a store rooted at `storage_dir`.
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: storage_dir.into().join(VISITOR_ID_KEY),
        }
    }

    /// Read the persisted identifier, if any. Never creates one.
    pub fn current(&self) -> Option<String> {
        let id = fs::read_to_string(&self.path).ok()?;
        let id = id.trim();
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }

    /// Resolve the visitor identifier, creating and persisting a new one
    /// if absent.
    ///
    /// UUID v4 carries 122 bits of randomness, so collisions across
    /// installations are negligible. If storage is unavailable the
    /// identifier is still returned but not persisted, so every call
    /// yields a fresh one (degraded mode, not fatal).
    pub fn get_or_create(&self) -> String {
        if let Some(id) = self.current() {
            return id;
        }

        let id = uuid::Uuid::new_v4().to_string();

        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "Visitor id storage unavailable; using ephemeral id");
                return id;
            }
        }

        if let Err(e) = fs::write(&self.path, &id) {
            tracing::warn!(error = %e, "Failed to persist visitor id; using ephemeral id");
        }

        id
    }
}
