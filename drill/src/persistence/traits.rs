//! Repository trait definitions for the persistence layer.
//!
//! The session controller takes these as injected trait objects, so
//! tests can substitute in-memory or temp-dir stores and nothing in
//! the engine reaches for ambient storage.
//!
//! Read methods return best-effort values rather than `Result`: a
//! missing or corrupt store is an empty store (see `JsonStore`), and
//! loss of history must never surface as an error during play.

use book::{DifficultyLevel, PlayerColor};

use super::blunder_store::BlunderRecord;
use super::session_store::{NewSessionRecord, SessionRecord};
use super::PersistenceError;

/// Repository for completed drill sessions.
pub trait SessionRepository: Send + Sync {
    /// Persist a finished session. The store assigns identity and
    /// timestamp; the saved record is returned.
    fn save_session(&self, data: NewSessionRecord) -> Result<SessionRecord, PersistenceError>;
    /// All sessions, newest first.
    fn list_sessions(&self) -> Vec<SessionRecord>;
    fn load_session(&self, id: &str) -> Option<SessionRecord>;
    fn delete_session(&self, id: &str) -> Result<(), PersistenceError>;
    /// Sessions containing at least one blunder (replay candidates).
    fn blunder_sessions(&self) -> Vec<SessionRecord>;
}

/// One observed blunder, before canonicalization.
#[derive(Debug, Clone)]
pub struct BlunderSighting {
    /// FEN of the position *before* the wrong move.
    pub fen: String,
    /// SAN of the wrong move.
    pub wrong_move: String,
    pub opening_name: Option<String>,
    pub player_color: PlayerColor,
    pub rating_level: DifficultyLevel,
}

/// Repository for recurring-mistake records.
pub trait BlunderRepository: Send + Sync {
    /// Record a blunder from a live drill, merging into the existing
    /// record for the same canonical position and color if present.
    fn record_blunder(&self, sighting: BlunderSighting) -> Result<(), PersistenceError>;
    /// Replay bookkeeping: the player found a better move at a known
    /// blunder position.
    fn mark_fixed(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError>;
    /// Replay bookkeeping: the player repeated the recorded mistake.
    fn mark_repeated(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError>;
    /// Records ordered by practice priority, optionally color-filtered.
    fn practice_queue(&self, color: Option<PlayerColor>) -> Vec<BlunderRecord>;
    fn delete_blunder(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError>;
}
