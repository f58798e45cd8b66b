mod blunder_store;
mod json_store;
mod session_store;
mod traits;

pub(crate) use json_store::JsonStore;

pub use blunder_store::{BlunderRecord, BlunderStore, MAX_BLUNDERS};
pub use session_store::{
    MoveRecord, NewSessionRecord, OpeningSummary, SessionRecord, SessionStore, StoreSummary,
    MAX_SESSIONS,
};
pub use traits::{BlunderRepository, BlunderSighting, SessionRepository};

use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Get the current unix timestamp in seconds.
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
