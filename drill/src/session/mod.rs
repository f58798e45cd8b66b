//! The drill session state machine.
//!
//! One `DrillSession` owns the live position, the phase, scoring, and
//! the move log for a single timed drill (or a replay of a recorded
//! one). Statistics for the position the player faces are prefetched
//! while the opponent "thinks", so rating a submitted move never waits
//! on the network.

mod replay;
mod state;

pub use replay::{ReplayAlert, ReplayVerdict};
pub use state::{DrillPhase, EndReason, MoveOutcome, SessionSummary};

use book::{evaluate_move, sample_reply, MoveAssessment, MoveStat, PlayerColor, PositionStats};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rules::{canonical_fen, PlayedMove, Position, RulesError};
use stats_client::OpeningStatsService;

use crate::config::DrillConfig;
use crate::persistence::{
    BlunderRepository, BlunderSighting, MoveRecord, NewSessionRecord, SessionRecord,
    SessionRepository,
};
use crate::scoring::ScoreKeeper;
use replay::{classify, ReplayState, UndoSnapshot};

const START_OPENING: &str = "Starting Position";
const LEFT_BOOK_SUFFIX: &str = " (left book)";

#[derive(Debug, thiserror::Error)]
pub enum DrillError {
    #[error("no drill is running")]
    NotRunning,
    #[error("not accepting moves right now")]
    NotAcceptingMoves,
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("not replaying a session")]
    NotReplaying,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RulesError> for DrillError {
    fn from(e: RulesError) -> Self {
        match e {
            RulesError::InvalidFen(fen) => Self::Internal(format!("invalid FEN: {fen}")),
            other => Self::IllegalMove(other.to_string()),
        }
    }
}

/// One timed drill (or replay) against the sampled book opponent.
///
/// All transitions run through `&mut self`, so a session processes one
/// thing at a time; input during `Thinking` is rejected rather than
/// queued.
pub struct DrillSession<S: OpeningStatsService> {
    config: DrillConfig,
    service: S,
    rng: Box<dyn RngCore + Send>,
    sessions: Box<dyn SessionRepository>,
    blunders: Box<dyn BlunderRepository>,

    phase: DrillPhase,
    position: Position,
    /// Statistics for the position the player currently faces.
    prefetched: Option<PositionStats>,
    opening_name: String,
    scores: ScoreKeeper,
    moves_played: u32,
    records: Vec<MoveRecord>,
    last_outcome: Option<MoveOutcome>,
    summary: Option<SessionSummary>,
    replay: Option<ReplayState>,
}

impl<S: OpeningStatsService> DrillSession<S> {
    pub fn new(
        config: DrillConfig,
        service: S,
        sessions: Box<dyn SessionRepository>,
        blunders: Box<dyn BlunderRepository>,
    ) -> Self {
        Self {
            config,
            service,
            rng: Box::new(StdRng::from_entropy()),
            sessions,
            blunders,
            phase: DrillPhase::Idle,
            position: Position::startpos(),
            prefetched: None,
            opening_name: START_OPENING.to_string(),
            scores: ScoreKeeper::new(),
            moves_played: 0,
            records: Vec::new(),
            last_outcome: None,
            summary: None,
            replay: None,
        }
    }

    /// A replay of a recorded session: same level, color and time
    /// limit; every move is checked against the record, and nothing is
    /// persisted at the end.
    pub fn replay_of(
        original: SessionRecord,
        service: S,
        sessions: Box<dyn SessionRepository>,
        blunders: Box<dyn BlunderRepository>,
    ) -> Self {
        let config = DrillConfig {
            level: original.rating_level,
            time_limit_secs: original.time_limit_secs,
            player_color: original.player_color,
        };
        let mut session = Self::new(config, service, sessions, blunders);
        session.replay = Some(ReplayState::new(original));
        session
    }

    /// Replace the random source, for deterministic sampling in tests.
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = rng;
        self
    }

    /// Start (or restart) the drill from the standard starting position.
    /// When the player drills black, the opponent moves first.
    pub async fn start(&mut self) -> Result<(), DrillError> {
        self.position = Position::startpos();
        self.prefetched = None;
        self.opening_name = START_OPENING.to_string();
        self.scores = ScoreKeeper::new();
        self.moves_played = 0;
        self.records.clear();
        self.last_outcome = None;
        self.summary = None;
        if let Some(replay) = self.replay.as_mut() {
            replay.index = 0;
            replay.undo = None;
            replay.alert = None;
        }

        self.phase = DrillPhase::Thinking;
        if self.config.player_color == PlayerColor::Black {
            if self.opponent_reply().await? {
                self.phase = DrillPhase::PlayerToMove;
            }
        } else {
            self.prefetch().await;
            self.phase = DrillPhase::PlayerToMove;
        }
        Ok(())
    }

    /// Submit the player's move as a from/to square pair.
    ///
    /// Rates the move against the prefetched statistics, scores it, and
    /// hands the turn to the opponent. On an illegal move nothing
    /// changes and the error is returned.
    pub async fn submit_move(&mut self, from: &str, to: &str) -> Result<MoveOutcome, DrillError> {
        match self.phase {
            DrillPhase::PlayerToMove => {}
            DrillPhase::Idle => return Err(DrillError::NotRunning),
            _ => return Err(DrillError::NotAcceptingMoves),
        }

        let fen_before = self.position.to_fen();
        let scores_before = self.scores;
        let played = self.position.apply_from_to(from, to)?;

        let mut mark = None;
        if let Some(replay) = self.replay.as_mut() {
            match replay.current_record().cloned() {
                Some(recorded) => {
                    let alert = classify(&recorded, &played.san);
                    replay.undo = match &alert {
                        Some(a) if a.can_undo => Some(UndoSnapshot {
                            fen: fen_before.clone(),
                            index: replay.index,
                            scores: scores_before,
                        }),
                        _ => None,
                    };
                    mark = alert.as_ref().map(|a| a.verdict);
                    replay.alert = alert;
                }
                // Replayed past the end of the record; nothing to
                // compare against anymore.
                None => {
                    replay.undo = None;
                    replay.alert = None;
                }
            }
            replay.index += 1;
        }
        if let Some(verdict) = mark {
            let key = canonical_fen(&fen_before);
            let result = match verdict {
                ReplayVerdict::Fixed => self.blunders.mark_fixed(&key, self.config.player_color),
                ReplayVerdict::BlunderRepeated => {
                    self.blunders.mark_repeated(&key, self.config.player_color)
                }
                ReplayVerdict::Deviation => Ok(()),
            };
            if let Err(e) = result {
                tracing::warn!("failed to update blunder record: {}", e);
            }
        }

        let assessment = match &self.prefetched {
            Some(stats) => evaluate_move(&played.uci, stats, self.config.player_color),
            None => MoveAssessment::off_book(),
        };
        let points = self.scores.award(assessment.rating);
        if let Some(op) = &assessment.opening {
            self.opening_name = op.name.clone();
        }

        self.records.push(MoveRecord {
            san: played.san.clone(),
            uci: played.uci.clone(),
            rating: assessment.rating,
            fen_before,
            opponent_san: None,
            opponent_uci: None,
            // The opening the session is in as of this move.
            opening_name: Some(self.opening_name.clone()),
        });
        self.moves_played += 1;

        let outcome = MoveOutcome {
            san: played.san,
            rating: assessment.rating,
            points,
            opening_name: assessment.opening.map(|o| o.name),
        };
        self.last_outcome = Some(outcome.clone());

        // Checkmate or stalemate inside the opening is vanishingly
        // rare, but the session must still terminate cleanly.
        if self.position.is_game_over() {
            self.finish(EndReason::OutOfBook);
            return Ok(outcome);
        }

        self.phase = DrillPhase::Thinking;
        if self.opponent_reply().await? {
            self.phase = DrillPhase::PlayerToMove;
        }
        Ok(outcome)
    }

    /// The clock ran out. Ends the session and returns its summary.
    pub fn time_expired(&mut self) -> Result<SessionSummary, DrillError> {
        if !self.phase.is_active() {
            return Err(DrillError::NotRunning);
        }
        Ok(self.finish(EndReason::TimeUp))
    }

    /// Take back the move that raised the current replay alert.
    ///
    /// Only offered in replays, and only while the alert that allowed
    /// it is current; restores position, score and replay cursor to the
    /// pre-move snapshot.
    pub async fn undo(&mut self) -> Result<(), DrillError> {
        let snapshot = {
            let Some(replay) = self.replay.as_mut() else {
                return Err(DrillError::NotReplaying);
            };
            let allowed = replay.alert.as_ref().is_some_and(|a| a.can_undo);
            let Some(snapshot) = allowed.then(|| replay.undo.take()).flatten() else {
                return Err(DrillError::NothingToUndo);
            };
            replay.index = snapshot.index;
            replay.alert = None;
            snapshot
        };

        self.position =
            Position::from_fen(&snapshot.fen).map_err(|e| DrillError::Internal(e.to_string()))?;
        self.scores = snapshot.scores;
        self.records.pop();
        self.moves_played = self.moves_played.saturating_sub(1);
        self.last_outcome = None;

        self.phase = DrillPhase::Thinking;
        self.prefetch().await;
        self.phase = DrillPhase::PlayerToMove;
        Ok(())
    }

    /// Play the opponent's reply and prefetch statistics for the
    /// position the player will face. Returns false when the session
    /// ended instead (left book, or the statistics source failed).
    async fn opponent_reply(&mut self) -> Result<bool, DrillError> {
        // Replays reuse the recorded reply whenever the record still
        // has one at this index; the live service takes over only when
        // the record is exhausted or the reply no longer applies (the
        // player may have diverged into a different position).
        let scripted = self
            .replay
            .as_ref()
            .and_then(|r| r.recorded_reply().map(str::to_string));
        if let Some(uci) = scripted {
            match self.position.apply_uci(&uci) {
                Ok(reply) => {
                    self.note_reply(reply);
                    self.prefetch().await;
                    return Ok(true);
                }
                Err(e) => {
                    tracing::warn!("recorded reply {} not playable: {}", uci, e);
                }
            }
        }

        let fen = self.position.to_fen();
        let stats = match self.service.fetch(&fen, self.config.level).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::debug!("no statistics for {}: {}", fen, e);
                self.finish(EndReason::OutOfBook);
                return Ok(false);
            }
        };
        if !stats.is_in_book() {
            self.finish(EndReason::OutOfBook);
            return Ok(false);
        }
        let uci = match sample_reply(&stats, &mut self.rng) {
            Some(stat) => stat.uci.clone(),
            None => {
                self.finish(EndReason::OutOfBook);
                return Ok(false);
            }
        };
        match self.position.apply_uci(&uci) {
            Ok(reply) => {
                self.note_reply(reply);
                self.prefetch().await;
                Ok(true)
            }
            // A sampled move the rules reject means the statistics no
            // longer describe this position; end the session rather
            // than fail it.
            Err(e) => {
                tracing::warn!("sampled reply {} not playable: {}", uci, e);
                self.finish(EndReason::OutOfBook);
                Ok(false)
            }
        }
    }

    fn note_reply(&mut self, reply: PlayedMove) {
        if let Some(last) = self.records.last_mut() {
            last.opponent_san = Some(reply.san);
            last.opponent_uci = Some(reply.uci);
        }
    }

    async fn prefetch(&mut self) {
        let fen = self.position.to_fen();
        match self.service.fetch(&fen, self.config.level).await {
            Ok(stats) => {
                if let Some(op) = &stats.opening {
                    self.opening_name = op.name.clone();
                }
                self.prefetched = Some(stats);
            }
            Err(e) => {
                tracing::debug!("no statistics for {}: {}", fen, e);
                self.prefetched = None;
            }
        }
    }

    /// End the session: persist it (unless replaying), record its
    /// blunders, and return the summary. Persistence failures are
    /// logged, never surfaced; the summary is still produced.
    fn finish(&mut self, reason: EndReason) -> SessionSummary {
        self.phase = DrillPhase::Ended(reason);
        if reason == EndReason::OutOfBook && !self.opening_name.ends_with(LEFT_BOOK_SUFFIX) {
            self.opening_name.push_str(LEFT_BOOK_SUFFIX);
        }

        let blunder_count = self
            .records
            .iter()
            .filter(|r| r.rating.is_blunder())
            .count() as u32;

        let session_id = if self.replay.is_some() {
            None
        } else {
            match self.sessions.save_session(NewSessionRecord {
                rating_level: self.config.level,
                player_color: self.config.player_color,
                time_limit_secs: self.config.time_limit_secs,
                total_score: self.scores.score(),
                moves_played: self.moves_played,
                moves: self.records.clone(),
                opening_name: self.opening_name.clone(),
                blunder_count,
            }) {
                Ok(saved) => {
                    // Blunders go to the practice store only once the
                    // session itself is safely on disk.
                    for record in self.records.iter().filter(|r| r.rating.is_blunder()) {
                        let sighting = BlunderSighting {
                            fen: record.fen_before.clone(),
                            wrong_move: record.san.clone(),
                            opening_name: record.opening_name.clone(),
                            player_color: self.config.player_color,
                            rating_level: self.config.level,
                        };
                        if let Err(e) = self.blunders.record_blunder(sighting) {
                            tracing::warn!("failed to record blunder: {}", e);
                        }
                    }
                    Some(saved.id)
                }
                Err(e) => {
                    tracing::warn!("failed to save session: {}", e);
                    None
                }
            }
        };

        let summary = SessionSummary {
            reason,
            score: self.scores.score(),
            moves_played: self.moves_played,
            opening_name: self.opening_name.clone(),
            session_id,
        };
        self.summary = Some(summary.clone());
        summary
    }

    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn score(&self) -> i32 {
        self.scores.score()
    }

    pub fn streak(&self) -> u32 {
        self.scores.streak()
    }

    pub fn moves_played(&self) -> u32 {
        self.moves_played
    }

    pub fn opening_name(&self) -> &str {
        &self.opening_name
    }

    pub fn last_outcome(&self) -> Option<&MoveOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Book candidates for the position the player currently faces;
    /// empty when no statistics are available.
    pub fn candidate_moves(&self) -> &[MoveStat] {
        self.prefetched
            .as_ref()
            .map(|s| s.moves.as_slice())
            .unwrap_or(&[])
    }

    pub fn replay_alert(&self) -> Option<&ReplayAlert> {
        self.replay.as_ref().and_then(|r| r.alert.as_ref())
    }

    pub fn is_replay(&self) -> bool {
        self.replay.is_some()
    }

    pub fn legal_destinations(&self, from: &str) -> Result<Vec<String>, DrillError> {
        Ok(self.position.legal_destinations(from)?)
    }
}
