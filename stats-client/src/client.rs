//! HTTP client for the Lichess opening explorer.

use async_trait::async_trait;
use book::{DifficultyLevel, PositionStats};
use reqwest::Client;

use crate::error::{ClientError, ClientResult};
use crate::traits::OpeningStatsService;

pub const EXPLORER_URL: &str = "https://explorer.lichess.ovh/lichess";

/// Game speeds included in every query. Correspondence games are
/// excluded: their statistics skew heavily toward engine-checked lines.
const SPEEDS: &str = "bullet,blitz,rapid,classical";

/// Network client for the opening explorer.
pub struct ExplorerClient {
    client: Client,
    base_url: String,
}

impl ExplorerClient {
    pub fn new() -> ClientResult<Self> {
        Self::with_base_url(EXPLORER_URL)
    }

    /// Point the client at a different explorer endpoint (used by tests
    /// and self-hosted mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent("opening-drill/0.1")
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl OpeningStatsService for ExplorerClient {
    async fn fetch(&self, fen: &str, level: DifficultyLevel) -> ClientResult<PositionStats> {
        let params = [
            ("variant", "standard"),
            ("speeds", SPEEDS),
            ("ratings", level.band()),
            ("fen", fen),
        ];

        let resp = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), "explorer request failed");
            return Err(ClientError::Status(resp.status().as_u16()));
        }

        let stats = resp
            .json::<PositionStats>()
            .await
            .map_err(|e| ClientError::InvalidData(e.to_string()))?;
        Ok(stats)
    }
}
