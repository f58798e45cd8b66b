//! Replay bookkeeping: walking a recorded session move-by-move,
//! classifying each played move against what the record says, and
//! supporting a one-step undo.

use book::MoveRating;

use crate::persistence::{MoveRecord, SessionRecord};
use crate::scoring::ScoreKeeper;

/// How a replayed move compares to the recorded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayVerdict {
    /// The recorded move was a blunder and the player chose differently.
    Fixed,
    /// The recorded move was a blunder and the player repeated it.
    BlunderRepeated,
    /// The recorded move was fine but the player diverged from it.
    Deviation,
}

/// Alert raised when a replayed move differs in kind from the record.
/// Quietly matching a sound recorded move raises none.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayAlert {
    pub verdict: ReplayVerdict,
    /// SAN of the move from the recorded session.
    pub original_move: String,
    /// Whether a one-step undo is offered. Fixing a blunder is final;
    /// repeating one or deviating can be taken back.
    pub can_undo: bool,
}

/// Snapshot taken before a replayed move, for the one-step undo.
#[derive(Debug, Clone)]
pub(crate) struct UndoSnapshot {
    pub fen: String,
    pub index: usize,
    /// Score and streak as they stood before the move.
    pub scores: ScoreKeeper,
}

#[derive(Debug)]
pub(crate) struct ReplayState {
    /// The session being replayed.
    pub original: SessionRecord,
    /// Index into `original.moves` of the next expected player move.
    pub index: usize,
    /// Valid only until the next move is submitted.
    pub undo: Option<UndoSnapshot>,
    pub alert: Option<ReplayAlert>,
}

impl ReplayState {
    pub fn new(original: SessionRecord) -> Self {
        Self {
            original,
            index: 0,
            undo: None,
            alert: None,
        }
    }

    /// The recorded player move at the current index, if the replay has
    /// not run past the end of the record.
    pub fn current_record(&self) -> Option<&MoveRecord> {
        self.original.moves.get(self.index)
    }

    /// The recorded opponent reply to the move *just* played (the replay
    /// index has already advanced past it).
    pub fn recorded_reply(&self) -> Option<&str> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.original.moves.get(i))
            .and_then(|m| m.opponent_uci.as_deref())
    }
}

/// Compare a replayed move to the recorded one.
///
/// Returns `None` when the player repeats a sound recorded move; the
/// replay just continues.
pub(crate) fn classify(recorded: &MoveRecord, played_san: &str) -> Option<ReplayAlert> {
    let was_blunder = recorded.rating == MoveRating::Blunder;
    let same = recorded.san == played_san;

    let (verdict, can_undo) = match (was_blunder, same) {
        (true, false) => (ReplayVerdict::Fixed, false),
        (true, true) => (ReplayVerdict::BlunderRepeated, true),
        (false, false) => (ReplayVerdict::Deviation, true),
        (false, true) => return None,
    };

    Some(ReplayAlert {
        verdict,
        original_move: recorded.san.clone(),
        can_undo,
    })
}
