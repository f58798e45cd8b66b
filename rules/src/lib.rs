//! Chess rules collaborator for the opening drill.
//!
//! Wraps cozy-chess behind a small move-application surface: the drill
//! engine never implements legality itself, it only asks this crate to
//! apply moves, list destinations, and report game-over conditions.

pub mod position;
pub mod san;

pub use position::{canonical_fen, Position, PlayedMove, RulesError};
