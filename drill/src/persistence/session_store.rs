use std::collections::BTreeMap;
use std::path::PathBuf;

use book::{DifficultyLevel, MoveRating, PlayerColor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::json_store::JsonStore;
use super::traits::SessionRepository;
use super::{now_timestamp, PersistenceError};

/// At most this many sessions are retained; the oldest are evicted
/// first, regardless of their scores.
pub const MAX_SESSIONS: usize = 100;

const CURRENT_VERSION: u32 = 1;

/// One played half-move within a session.
///
/// Created when the player moves; the opponent fields are filled in
/// once (when the reply resolves) and the record is immutable after
/// that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub san: String,
    pub uci: String,
    pub rating: MoveRating,
    /// Position FEN before the move.
    pub fen_before: String,
    pub opponent_san: Option<String>,
    pub opponent_uci: Option<String>,
    pub opening_name: Option<String>,
}

/// One completed drill. Never mutated after creation; deleted only by
/// explicit user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub created_at: u64,
    pub rating_level: DifficultyLevel,
    pub player_color: PlayerColor,
    pub time_limit_secs: u32,
    pub total_score: i32,
    pub moves_played: u32,
    pub moves: Vec<MoveRecord>,
    /// Final opening name reached; suffixed with " (left book)" when
    /// the session ended out of book.
    pub opening_name: String,
    pub blunder_count: u32,
}

/// Session data before the store assigns identity and timestamp.
#[derive(Debug, Clone)]
pub struct NewSessionRecord {
    pub rating_level: DifficultyLevel,
    pub player_color: PlayerColor,
    pub time_limit_secs: u32,
    pub total_score: i32,
    pub moves_played: u32,
    pub moves: Vec<MoveRecord>,
    pub opening_name: String,
    pub blunder_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    version: u32,
    sessions: Vec<SessionRecord>,
}

impl Default for SessionDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            sessions: Vec::new(),
        }
    }
}

/// Aggregate statistics over the stored sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub total_sessions: u32,
    pub total_moves: u32,
    pub total_blunders: u32,
    /// Percent of moves that were not blunders, rounded.
    pub accuracy_pct: u32,
    pub openings: BTreeMap<String, OpeningSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningSummary {
    pub played: u32,
    pub blunders: u32,
    pub avg_score: i32,
}

/// Persistence for completed sessions: one versioned JSON document,
/// newest first, capped at [`MAX_SESSIONS`].
pub struct SessionStore {
    inner: JsonStore<SessionDocument>,
}

impl SessionStore {
    /// Create a SessionStore rooted at the given data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            inner: JsonStore::new(data_dir.join("sessions.json")),
        }
    }

    pub fn save(&self, data: NewSessionRecord) -> Result<SessionRecord, PersistenceError> {
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            created_at: now_timestamp(),
            rating_level: data.rating_level,
            player_color: data.player_color,
            time_limit_secs: data.time_limit_secs,
            total_score: data.total_score,
            moves_played: data.moves_played,
            moves: data.moves,
            opening_name: data.opening_name,
            blunder_count: data.blunder_count,
        };

        let mut doc = self.inner.load();
        doc.sessions.insert(0, record.clone());
        doc.sessions.truncate(MAX_SESSIONS);
        self.inner.save(&doc)?;
        Ok(record)
    }

    /// All sessions, newest first (insertion order).
    pub fn list(&self) -> Vec<SessionRecord> {
        self.inner.load().sessions
    }

    pub fn load(&self, id: &str) -> Option<SessionRecord> {
        self.inner.load().sessions.into_iter().find(|s| s.id == id)
    }

    pub fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        let mut doc = self.inner.load();
        doc.sessions.retain(|s| s.id != id);
        self.inner.save(&doc)
    }

    pub fn blunder_sessions(&self) -> Vec<SessionRecord> {
        let mut sessions = self.list();
        sessions.retain(|s| s.blunder_count > 0);
        sessions
    }

    /// Wipe all stored sessions.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.inner.clear()
    }

    /// Aggregate statistics across every stored session.
    pub fn summary(&self) -> StoreSummary {
        let sessions = self.list();
        let total_sessions = sessions.len() as u32;
        let total_moves: u32 = sessions.iter().map(|s| s.moves_played).sum();
        let total_blunders: u32 = sessions.iter().map(|s| s.blunder_count).sum();
        let accuracy_pct = if total_moves > 0 {
            (((total_moves - total_blunders.min(total_moves)) as f64 / total_moves as f64) * 100.0)
                .round() as u32
        } else {
            0
        };

        let mut grouped: BTreeMap<String, (u32, u32, i64)> = BTreeMap::new();
        for session in &sessions {
            let name = if session.opening_name.is_empty() {
                "Unknown".to_string()
            } else {
                session.opening_name.clone()
            };
            let entry = grouped.entry(name).or_default();
            entry.0 += 1;
            entry.1 += session.blunder_count;
            entry.2 += i64::from(session.total_score);
        }

        let openings = grouped
            .into_iter()
            .map(|(name, (played, blunders, score))| {
                (
                    name,
                    OpeningSummary {
                        played,
                        blunders,
                        avg_score: (score / i64::from(played)) as i32,
                    },
                )
            })
            .collect();

        StoreSummary {
            total_sessions,
            total_moves,
            total_blunders,
            accuracy_pct,
            openings,
        }
    }
}

impl SessionRepository for SessionStore {
    fn save_session(&self, data: NewSessionRecord) -> Result<SessionRecord, PersistenceError> {
        self.save(data)
    }

    fn list_sessions(&self) -> Vec<SessionRecord> {
        self.list()
    }

    fn load_session(&self, id: &str) -> Option<SessionRecord> {
        self.load(id)
    }

    fn delete_session(&self, id: &str) -> Result<(), PersistenceError> {
        self.delete(id)
    }

    fn blunder_sessions(&self) -> Vec<SessionRecord> {
        self.blunder_sessions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(score: i32, blunders: u32, opening: &str) -> NewSessionRecord {
        NewSessionRecord {
            rating_level: DifficultyLevel::Elo1200,
            player_color: PlayerColor::White,
            time_limit_secs: 30,
            total_score: score,
            moves_played: 5,
            moves: vec![MoveRecord {
                san: "e4".to_string(),
                uci: "e2e4".to_string(),
                rating: MoveRating::Best,
                fen_before: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
                    .to_string(),
                opponent_san: Some("c5".to_string()),
                opponent_uci: Some("c7c5".to_string()),
                opening_name: Some(opening.to_string()),
            }],
            opening_name: opening.to_string(),
            blunder_count: blunders,
        }
    }

    #[test]
    fn save_assigns_identity_and_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        let saved = store.save(sample(23, 0, "Sicilian Defense")).unwrap();
        assert!(!saved.id.is_empty());
        assert!(saved.created_at > 0);

        let loaded = store.load(&saved.id).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn sessions_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        let first = store.save(sample(1, 0, "A")).unwrap();
        let second = store.save(sample(2, 0, "B")).unwrap();

        let list = store.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
    }

    #[test]
    fn cap_evicts_oldest_by_insertion() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        let oldest = store.save(sample(0, 0, "Old")).unwrap();
        for i in 0..MAX_SESSIONS {
            store.save(sample(i as i32, 0, "Fill")).unwrap();
        }
        let list = store.list();
        assert_eq!(list.len(), MAX_SESSIONS);
        assert!(store.load(&oldest.id).is_none());
    }

    #[test]
    fn delete_removes_by_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        let saved = store.save(sample(5, 0, "A")).unwrap();
        let kept = store.save(sample(6, 0, "B")).unwrap();
        store.delete(&saved.id).unwrap();
        assert!(store.load(&saved.id).is_none());
        assert!(store.load(&kept.id).is_some());
    }

    #[test]
    fn blunder_sessions_filters() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        store.save(sample(10, 0, "Clean")).unwrap();
        let with = store.save(sample(-5, 2, "Messy")).unwrap();
        let filtered = store.blunder_sessions();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, with.id);
    }

    #[test]
    fn summary_aggregates_by_opening() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        store.save(sample(10, 1, "Sicilian Defense")).unwrap();
        store.save(sample(20, 0, "Sicilian Defense")).unwrap();
        store.save(sample(6, 2, "French Defense")).unwrap();

        let summary = store.summary();
        assert_eq!(summary.total_sessions, 3);
        assert_eq!(summary.total_moves, 15);
        assert_eq!(summary.total_blunders, 3);
        assert_eq!(summary.accuracy_pct, 80);

        let sicilian = &summary.openings["Sicilian Defense"];
        assert_eq!(sicilian.played, 2);
        assert_eq!(sicilian.blunders, 1);
        assert_eq!(sicilian.avg_score, 15);
    }

    #[test]
    fn empty_store_summary() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        let summary = store.summary();
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.accuracy_pct, 0);
        assert!(summary.openings.is_empty());
    }
}
