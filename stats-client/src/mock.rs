//! Mock OpeningStatsService implementation for testing

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use book::{DifficultyLevel, PositionStats};

use crate::error::{ClientError, ClientResult};
use crate::traits::OpeningStatsService;

type Responder = Box<dyn Fn() -> ClientResult<PositionStats> + Send>;

/// Mock service for testing. Responses are keyed by the exact FEN the
/// caller fetches; an unconfigured FEN yields `ClientError::NotConfigured`,
/// which the drill engine treats as "no statistics for this position".
pub struct MockStatsService {
    responses: Mutex<HashMap<String, Responder>>,
    call_log: Mutex<Vec<FetchCall>>,
}

/// One recorded fetch, for verification.
#[derive(Debug, Clone)]
pub struct FetchCall {
    pub fen: String,
    pub level: DifficultyLevel,
}

impl Default for MockStatsService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStatsService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            call_log: Mutex::new(Vec::new()),
        }
    }

    /// Configure the statistics returned for a FEN.
    pub fn with_stats(self, fen: impl Into<String>, stats: PositionStats) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(fen.into(), Box::new(move || Ok(stats.clone())));
        self
    }

    /// Configure a FEN to fail with the given HTTP status.
    pub fn with_error(self, fen: impl Into<String>, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(fen.into(), Box::new(move || Err(ClientError::Status(status))));
        self
    }

    /// Get recorded calls for verification.
    pub fn get_calls(&self) -> Vec<FetchCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }
}

#[async_trait]
impl OpeningStatsService for MockStatsService {
    async fn fetch(&self, fen: &str, level: DifficultyLevel) -> ClientResult<PositionStats> {
        self.call_log.lock().unwrap().push(FetchCall {
            fen: fen.to_string(),
            level,
        });

        let responses = self.responses.lock().unwrap();
        match responses.get(fen) {
            Some(f) => f(),
            None => Err(ClientError::NotConfigured(fen.to_string())),
        }
    }
}
