//! OpeningStatsService trait abstraction for client implementations

use crate::error::ClientResult;
use async_trait::async_trait;
use book::{DifficultyLevel, PositionStats};

/// Source of population statistics for a position.
/// Implemented by both the real ExplorerClient and MockStatsService.
#[async_trait]
pub trait OpeningStatsService: Send + Sync {
    /// Fetch move statistics for the position given as FEN, filtered to
    /// the rating band for `level`.
    async fn fetch(&self, fen: &str, level: DifficultyLevel) -> ClientResult<PositionStats>;
}
