//! Opening statistics client.
//!
//! Provides the [`OpeningStatsService`] trait consumed by the drill
//! engine, a real HTTP implementation against the Lichess opening
//! explorer, and a mock for deterministic tests.
//!
//! # Example
//!
//! ```no_run
//! use book::DifficultyLevel;
//! use stats_client::{ExplorerClient, OpeningStatsService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ExplorerClient::new()?;
//!     let startpos = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
//!     let stats = client.fetch(startpos, DifficultyLevel::Elo1200).await?;
//!     println!("{} candidate moves", stats.moves.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod traits;

pub use client::{ExplorerClient, EXPLORER_URL};
pub use error::{ClientError, ClientResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::{FetchCall, MockStatsService};
pub use traits::OpeningStatsService;
