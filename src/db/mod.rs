//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const VISITORS: &str = "visitors";
    /// Append-only action logs, nested under each visitor document
    pub const ACTION_LOGS: &str = "logs";
}
