use book::MoveRating;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The clock ran out.
    TimeUp,
    /// The position left known opening theory (or the statistics source
    /// failed, which is indistinguishable from the player's view).
    OutOfBook,
}

/// Lifecycle of a drill session.
///
/// `Idle → PlayerToMove ⇄ Thinking → Ended`. `Thinking` covers both the
/// statistics fetch and the opponent reply; player input is rejected
/// while it lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillPhase {
    Idle,
    PlayerToMove,
    Thinking,
    Ended(EndReason),
}

impl DrillPhase {
    /// True for the phases in which the clock is running.
    pub fn is_active(self) -> bool {
        matches!(self, Self::PlayerToMove | Self::Thinking)
    }
}

/// Feedback for the most recent player move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub san: String,
    pub rating: MoveRating,
    /// Points awarded, streak bonus included.
    pub points: i32,
    pub opening_name: Option<String>,
}

/// Terminal result of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub reason: EndReason,
    pub score: i32,
    pub moves_played: u32,
    pub opening_name: String,
    /// Identity of the persisted record; `None` for replays (never
    /// persisted) and when saving failed.
    pub session_id: Option<String>,
}
