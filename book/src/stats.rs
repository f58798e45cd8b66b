//! Statistics DTOs, shaped after the Lichess opening explorer response.

use serde::{Deserialize, Serialize};

use crate::color::PlayerColor;

/// Named opening attached to a position or a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub eco: String,
    pub name: String,
}

/// One candidate move at a position, with game counts by result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveStat {
    pub uci: String,
    pub san: String,
    #[serde(default)]
    pub average_rating: u32,
    pub white: u64,
    pub draws: u64,
    pub black: u64,
    #[serde(default)]
    pub opening: Option<Opening>,
}

impl MoveStat {
    pub fn total_games(&self) -> u64 {
        self.white + self.draws + self.black
    }

    /// Score for the side to move: wins plus half the draws, over all
    /// games for this move. Zero when the move has no recorded games.
    pub fn win_rate(&self, side: PlayerColor) -> f64 {
        let total = self.total_games();
        if total == 0 {
            return 0.0;
        }
        let wins = match side {
            PlayerColor::White => self.white,
            PlayerColor::Black => self.black,
        };
        (wins as f64 + self.draws as f64 * 0.5) / total as f64
    }
}

/// Full statistics for one position, immutable per fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionStats {
    pub white: u64,
    pub draws: u64,
    pub black: u64,
    pub moves: Vec<MoveStat>,
    #[serde(default)]
    pub opening: Option<Opening>,
}

impl PositionStats {
    /// Aggregate recorded games for the position itself.
    pub fn aggregate_games(&self) -> u64 {
        self.white + self.draws + self.black
    }

    /// Sum of game counts over the candidate moves.
    pub fn candidate_games(&self) -> u64 {
        self.moves.iter().map(MoveStat::total_games).sum()
    }

    /// Book gate: at least one candidate move and a position sample large
    /// enough to be meaningful. Main lines have thousands of games;
    /// legitimate sidelines may only have 10-50, so the threshold stays
    /// low.
    pub fn is_in_book(&self) -> bool {
        !self.moves.is_empty() && self.aggregate_games() >= 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(uci: &str, white: u64, draws: u64, black: u64) -> MoveStat {
        MoveStat {
            uci: uci.to_string(),
            san: uci.to_string(),
            average_rating: 1500,
            white,
            draws,
            black,
            opening: None,
        }
    }

    #[test]
    fn win_rate_counts_half_draws() {
        let s = stat("e2e4", 50, 30, 20);
        assert!((s.win_rate(PlayerColor::White) - 0.65).abs() < 1e-9);
        assert!((s.win_rate(PlayerColor::Black) - 0.35).abs() < 1e-9);
    }

    #[test]
    fn win_rate_zero_games() {
        let s = stat("e2e4", 0, 0, 0);
        assert_eq!(s.win_rate(PlayerColor::White), 0.0);
    }

    #[test]
    fn book_gate_requires_moves_and_sample() {
        let empty = PositionStats {
            white: 500,
            draws: 500,
            black: 500,
            moves: vec![],
            opening: None,
        };
        assert!(!empty.is_in_book());

        let thin = PositionStats {
            white: 4,
            draws: 2,
            black: 3,
            moves: vec![stat("e2e4", 4, 2, 3)],
            opening: None,
        };
        assert!(!thin.is_in_book());

        let sideline = PositionStats {
            white: 5,
            draws: 2,
            black: 3,
            moves: vec![stat("e2e4", 5, 2, 3)],
            opening: None,
        };
        assert!(sideline.is_in_book());
    }

    #[test]
    fn explorer_json_decodes() {
        let json = r#"{
            "white": 100, "draws": 20, "black": 80,
            "moves": [
                {"uci": "e2e4", "san": "e4", "averageRating": 1400,
                 "white": 60, "draws": 10, "black": 30,
                 "opening": {"eco": "B00", "name": "King's Pawn"}}
            ],
            "opening": null
        }"#;
        let stats: PositionStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.aggregate_games(), 200);
        assert_eq!(stats.moves[0].average_rating, 1400);
        assert_eq!(stats.moves[0].opening.as_ref().unwrap().eco, "B00");
    }
}
