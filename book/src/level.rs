use serde::{Deserialize, Serialize};

/// Difficulty of the book opponent: which rating band the statistics
/// are drawn from. Serialized as the band's nominal rating, so stored
/// records stay readable and tolerate values between bands (nearest
/// level wins on the way back in).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", from = "u32")]
pub enum DifficultyLevel {
    Elo800,
    Elo1000,
    Elo1200,
    Elo1400,
    Elo1600,
}

impl DifficultyLevel {
    pub const ALL: [Self; 5] = [
        Self::Elo800,
        Self::Elo1000,
        Self::Elo1200,
        Self::Elo1400,
        Self::Elo1600,
    ];

    /// Nominal player rating for the band.
    pub fn rating(self) -> u32 {
        match self {
            Self::Elo800 => 800,
            Self::Elo1000 => 1000,
            Self::Elo1200 => 1200,
            Self::Elo1400 => 1400,
            Self::Elo1600 => 1600,
        }
    }

    /// Explorer `ratings` query parameter for the band.
    pub fn band(self) -> &'static str {
        match self {
            Self::Elo800 => "0,1000",
            Self::Elo1000 => "1000,1200",
            Self::Elo1200 => "1200,1400",
            Self::Elo1400 => "1400,1600",
            Self::Elo1600 => "1600,1800",
        }
    }

    /// Nearest configured level for an arbitrary rating.
    pub fn from_rating(rating: u32) -> Self {
        Self::ALL
            .into_iter()
            .min_by_key(|level| level.rating().abs_diff(rating))
            .unwrap_or(Self::Elo1200)
    }
}

impl Default for DifficultyLevel {
    /// Mid band, also the fallback for unrecognized input.
    fn default() -> Self {
        Self::Elo1200
    }
}

impl From<DifficultyLevel> for u32 {
    fn from(level: DifficultyLevel) -> u32 {
        level.rating()
    }
}

impl From<u32> for DifficultyLevel {
    fn from(rating: u32) -> Self {
        Self::from_rating(rating)
    }
}
