use std::path::PathBuf;

use book::{DifficultyLevel, PlayerColor};
use rules::canonical_fen;
use serde::{Deserialize, Serialize};

use super::json_store::JsonStore;
use super::traits::{BlunderRepository, BlunderSighting};
use super::{now_timestamp, PersistenceError};

/// At most this many blunder records are retained.
pub const MAX_BLUNDERS: usize = 200;

const CURRENT_VERSION: u32 = 1;

/// One recurring mistake: a position the player has blundered in,
/// keyed by the canonical FEN (first four fields, so move counters do
/// not split identical positions) plus the color being drilled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlunderRecord {
    /// Canonical position key (piece placement, side to move, castling
    /// rights, en passant square).
    pub key: String,
    pub player_color: PlayerColor,
    /// SAN of the move that was rated a blunder.
    pub wrong_move: String,
    pub opening_name: Option<String>,
    pub rating_level: DifficultyLevel,
    /// Encounters of this position, live blunders and replay retests
    /// combined.
    pub times_seen: u32,
    /// Live-drill blunders at this position.
    pub times_blundered: u32,
    /// Replays where a better move was found.
    pub times_fixed: u32,
    /// Replays where the mistake was repeated.
    pub times_repeated: u32,
    /// Unix timestamp of the last replay encounter (or the last live
    /// sighting, whichever is newer).
    pub last_tested: u64,
}

impl BlunderRecord {
    /// Fraction of encounters where the player fixed the mistake.
    /// Zero when the position has never been encountered.
    pub fn fix_rate(&self) -> f64 {
        if self.times_seen == 0 {
            0.0
        } else {
            f64::from(self.times_fixed) / f64::from(self.times_seen)
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BlunderDocument {
    version: u32,
    blunders: Vec<BlunderRecord>,
}

impl Default for BlunderDocument {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            blunders: Vec::new(),
        }
    }
}

/// Persistence for recurring mistakes, capped at [`MAX_BLUNDERS`].
pub struct BlunderStore {
    inner: JsonStore<BlunderDocument>,
}

impl BlunderStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            inner: JsonStore::new(data_dir.join("blunders.json")),
        }
    }

    /// Record a live-drill blunder, merging into the existing record
    /// for the same canonical position and color when one exists.
    pub fn record(&self, sighting: BlunderSighting) -> Result<(), PersistenceError> {
        let key = canonical_fen(&sighting.fen);
        let now = now_timestamp();

        let mut doc = self.inner.load();
        match doc
            .blunders
            .iter_mut()
            .find(|b| b.key == key && b.player_color == sighting.player_color)
        {
            Some(existing) => {
                existing.times_seen += 1;
                existing.times_blundered += 1;
                existing.wrong_move = sighting.wrong_move;
                existing.rating_level = sighting.rating_level;
                if sighting.opening_name.is_some() {
                    existing.opening_name = sighting.opening_name;
                }
                existing.last_tested = now;
            }
            None => {
                doc.blunders.insert(
                    0,
                    BlunderRecord {
                        key,
                        player_color: sighting.player_color,
                        wrong_move: sighting.wrong_move,
                        opening_name: sighting.opening_name,
                        rating_level: sighting.rating_level,
                        times_seen: 1,
                        times_blundered: 1,
                        times_fixed: 0,
                        times_repeated: 0,
                        last_tested: now,
                    },
                );
                doc.blunders.truncate(MAX_BLUNDERS);
            }
        }
        self.inner.save(&doc)
    }

    fn mark(
        &self,
        key: &str,
        color: PlayerColor,
        fixed: bool,
    ) -> Result<(), PersistenceError> {
        let mut doc = self.inner.load();
        if let Some(record) = doc
            .blunders
            .iter_mut()
            .find(|b| b.key == key && b.player_color == color)
        {
            record.times_seen += 1;
            if fixed {
                record.times_fixed += 1;
            } else {
                record.times_repeated += 1;
            }
            record.last_tested = now_timestamp();
            self.inner.save(&doc)?;
        }
        Ok(())
    }

    pub fn mark_fixed(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError> {
        self.mark(key, color, true)
    }

    pub fn mark_repeated(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError> {
        self.mark(key, color, false)
    }

    /// Records in practice order: lowest fix rate first, most recently
    /// seen breaking ties. Optionally restricted to one color.
    pub fn practice_queue(&self, color: Option<PlayerColor>) -> Vec<BlunderRecord> {
        let mut records = self.inner.load().blunders;
        if let Some(color) = color {
            records.retain(|b| b.player_color == color);
        }
        records.sort_by(|a, b| {
            a.fix_rate()
                .partial_cmp(&b.fix_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.last_tested.cmp(&a.last_tested))
        });
        records
    }

    pub fn all(&self) -> Vec<BlunderRecord> {
        self.inner.load().blunders
    }

    pub fn delete(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError> {
        let mut doc = self.inner.load();
        doc.blunders
            .retain(|b| !(b.key == key && b.player_color == color));
        self.inner.save(&doc)
    }

    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.inner.clear()
    }
}

impl BlunderRepository for BlunderStore {
    fn record_blunder(&self, sighting: BlunderSighting) -> Result<(), PersistenceError> {
        self.record(sighting)
    }

    fn mark_fixed(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError> {
        self.mark_fixed(key, color)
    }

    fn mark_repeated(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError> {
        self.mark_repeated(key, color)
    }

    fn practice_queue(&self, color: Option<PlayerColor>) -> Vec<BlunderRecord> {
        self.practice_queue(color)
    }

    fn delete_blunder(&self, key: &str, color: PlayerColor) -> Result<(), PersistenceError> {
        self.delete(key, color)
    }
}
