// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Visitors (first-visit records, keyed by visitor id)
//! - Action logs (append-only sub-collection per visitor)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ActionLogEntry, VisitorRecord};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // ExternalJwtFunctionSource provides a dummy token without needing a
        // custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Visitor Operations ──────────────────────────────────────

    /// Get a visitor record by id.
    pub async fn get_visitor(&self, visitor_id: &str) -> Result<Option<VisitorRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VISITORS)
            .obj()
            .one(visitor_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a visit for `visitor_id`.
    ///
    /// Reads the visitor document first and only writes when it is
    /// absent, so `firstVisit` is never overwritten on return visits.
    /// Two simultaneous first visits (duplicate tabs) can both observe
    /// the document as absent and both write; both carry write-time
    /// timestamps taken at effectively the same instant, so the
    /// last-write-wins set is accepted.
    ///
    /// Returns `true` if a new record was written, `false` for a
    /// returning visitor.
    pub async fn record_visit(&self, visitor_id: &str) -> Result<bool, AppError> {
        if self.get_visitor(visitor_id).await?.is_some() {
            return Ok(false);
        }

        let record = VisitorRecord {
            id: visitor_id.to_string(),
            first_visit: chrono::Utc::now().to_rfc3339(),
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::VISITORS)
            .document_id(visitor_id)
            .object(&record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(true)
    }

    // ─── Action Log Operations ───────────────────────────────────

    /// Append one action log entry under `visitors/{id}/logs`.
    ///
    /// Entries get a generated document id; there is no update or
    /// delete path, duplicates are expected and allowed.
    pub async fn append_action_log(
        &self,
        visitor_id: &str,
        entry: &ActionLogEntry,
    ) -> Result<(), AppError> {
        let client = self.get_client()?;

        let parent_path = client
            .parent_path(collections::VISITORS, visitor_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        let doc_id = uuid::Uuid::new_v4().to_string();

        let _: () = client
            .fluent()
            .update()
            .in_col(collections::ACTION_LOGS)
            .document_id(&doc_id)
            .parent(&parent_path)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Get all action log entries for a visitor, oldest first.
    ///
    /// Used by the dashboard; the tracker itself never reads logs back.
    pub async fn get_action_logs(
        &self,
        visitor_id: &str,
    ) -> Result<Vec<ActionLogEntry>, AppError> {
        let client = self.get_client()?;

        let parent_path = client
            .parent_path(collections::VISITORS, visitor_id)
            .map_err(|e| AppError::Database(e.to_string()))?;

        client
            .fluent()
            .select()
            .from(collections::ACTION_LOGS)
            .parent(&parent_path)
            .order_by([(
                "timestamp",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
