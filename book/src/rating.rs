use serde::{Deserialize, Serialize};

/// Quality tag for a played move, ordered worst to best.
///
/// `OffBook` means the move was absent from the statistics: quality
/// unknown, neither rewarded nor penalized. It sorts below the known
/// ratings so that "worst known move" comparisons stay meaningful.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MoveRating {
    OffBook,
    Blunder,
    Inaccuracy,
    Ok,
    Good,
    Best,
}

impl MoveRating {
    /// Base point value for the scoring rule.
    pub fn points(self) -> i32 {
        match self {
            Self::Best => 10,
            Self::Good => 7,
            Self::Ok => 3,
            Self::Inaccuracy => -3,
            Self::Blunder => -10,
            Self::OffBook => 0,
        }
    }

    pub fn is_blunder(self) -> bool {
        matches!(self, Self::Blunder)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Good => "good",
            Self::Ok => "ok",
            Self::Inaccuracy => "inaccuracy",
            Self::Blunder => "blunder",
            Self::OffBook => "offbook",
        }
    }
}

impl std::fmt::Display for MoveRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
