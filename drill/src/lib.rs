//! Timed opening-drill session engine.
//!
//! A drill pits the player against a statistically sampled "book"
//! opponent: every player move is rated against how human games fared
//! from that position, scored with a streak bonus, and recorded.
//! Finished sessions land in a local store; recurring blunders feed a
//! spaced-repetition practice queue, and any recorded session can be
//! replayed move-by-move to hunt down the mistakes.
//!
//! Board legality lives in the `rules` crate, the rating/sampling math
//! in `book`, and the statistics source behind the
//! `stats_client::OpeningStatsService` trait. This crate owns the state
//! machine and the persistence layer.

pub mod config;
pub mod persistence;
pub mod scoring;
pub mod session;

pub use config::DrillConfig;
pub use session::{
    DrillError, DrillPhase, DrillSession, EndReason, MoveOutcome, ReplayAlert, ReplayVerdict,
    SessionSummary,
};
