//! Opening-book statistics domain.
//!
//! Pure functions over population statistics for a position: rating a
//! played move against how human games fared from there, sampling a
//! book reply weighted by popularity, and deciding whether a position
//! still counts as "in book". Nothing here touches the network or the
//! board — see the `stats-client` and `rules` crates for those.

pub mod color;
pub mod evaluate;
pub mod level;
pub mod rating;
pub mod sample;
pub mod stats;

pub use color::PlayerColor;
pub use evaluate::{evaluate_move, MoveAssessment};
pub use level::DifficultyLevel;
pub use rating::MoveRating;
pub use sample::sample_reply;
pub use stats::{MoveStat, Opening, PositionStats};
