//! Rate a played move against position statistics.
//!
//! Seven rules, evaluated in precedence order, first match wins:
//!
//! 1. move absent from the statistics → `offbook`
//! 2. most frequent candidate → `best` if win rate ≥ 0.45, else `good`
//! 3. top-three candidate → `good` if win rate ≥ 0.45, else `ok`
//! 4. frequency > 5% and win rate ≥ 0.40 → `good`
//! 5. frequency > 2% or win rate ≥ 0.35 → `ok`
//! 6. win rate ≥ 0.30 → `inaccuracy`
//! 7. otherwise → `blunder`

use crate::color::PlayerColor;
use crate::rating::MoveRating;
use crate::stats::{MoveStat, Opening, PositionStats};

/// Outcome of evaluating one played move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveAssessment {
    pub rating: MoveRating,
    /// Played move's games over the sum across all candidates; zero when
    /// the candidate total is zero.
    pub frequency: f64,
    pub win_rate: f64,
    /// Opening name the move leads into, when the statistics carry one.
    pub opening: Option<Opening>,
}

impl MoveAssessment {
    /// The assessment used when a position has no statistics at all, or
    /// the played move does not appear in them.
    pub fn off_book() -> Self {
        Self {
            rating: MoveRating::OffBook,
            frequency: 0.0,
            win_rate: 0.0,
            opening: None,
        }
    }
}

/// Evaluate the move played as `uci` against the statistics fetched for
/// the position before it. Pure and deterministic.
pub fn evaluate_move(uci: &str, stats: &PositionStats, side: PlayerColor) -> MoveAssessment {
    let Some(played) = stats.moves.iter().find(|m| m.uci == uci) else {
        return MoveAssessment::off_book();
    };

    // The explorer returns candidates sorted by popularity, but that is
    // its contract, not ours. Re-sort descending by total games.
    let mut ranked: Vec<&MoveStat> = stats.moves.iter().collect();
    ranked.sort_by(|a, b| b.total_games().cmp(&a.total_games()));

    let total_all: u64 = ranked.iter().map(|m| m.total_games()).sum();
    let frequency = if total_all > 0 {
        played.total_games() as f64 / total_all as f64
    } else {
        0.0
    };
    let win_rate = played.win_rate(side);

    let rank = ranked.iter().position(|m| m.uci == played.uci);
    let rating = match rank {
        // Most popular move: at least good. Main lines are never punished.
        Some(0) => {
            if win_rate >= 0.45 {
                MoveRating::Best
            } else {
                MoveRating::Good
            }
        }
        // Common alternatives are fine.
        Some(1) | Some(2) => {
            if win_rate >= 0.45 {
                MoveRating::Good
            } else {
                MoveRating::Ok
            }
        }
        _ => {
            if frequency > 0.05 && win_rate >= 0.40 {
                MoveRating::Good
            } else if frequency > 0.02 || win_rate >= 0.35 {
                MoveRating::Ok
            } else if win_rate >= 0.30 {
                MoveRating::Inaccuracy
            } else {
                MoveRating::Blunder
            }
        }
    };

    MoveAssessment {
        rating,
        frequency,
        win_rate,
        opening: played.opening.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(uci: &str, white: u64, draws: u64, black: u64) -> MoveStat {
        MoveStat {
            uci: uci.to_string(),
            san: uci.to_string(),
            average_rating: 0,
            white,
            draws,
            black,
            opening: None,
        }
    }

    fn position(moves: Vec<MoveStat>) -> PositionStats {
        let white = moves.iter().map(|m| m.white).sum();
        let draws = moves.iter().map(|m| m.draws).sum();
        let black = moves.iter().map(|m| m.black).sum();
        PositionStats {
            white,
            draws,
            black,
            moves,
            opening: None,
        }
    }

    #[test]
    fn unknown_move_is_off_book() {
        let stats = position(vec![stat("e2e4", 60, 20, 20)]);
        let a = evaluate_move("b1a3", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::OffBook);
        assert_eq!(a.frequency, 0.0);
        assert_eq!(a.win_rate, 0.0);
    }

    #[test]
    fn most_popular_splits_on_win_rate() {
        // e2e4: 52% for white — best.
        let stats = position(vec![stat("e2e4", 47, 10, 43), stat("d2d4", 10, 5, 10)]);
        let a = evaluate_move("e2e4", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::Best);

        // Most popular but scoring badly — still good, never punished.
        let stats = position(vec![stat("e2e4", 20, 10, 70), stat("d2d4", 10, 5, 10)]);
        let a = evaluate_move("e2e4", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::Good);
    }

    #[test]
    fn popularity_sorting_is_not_trusted() {
        // Candidates deliberately out of popularity order.
        let stats = position(vec![stat("d2d4", 10, 5, 10), stat("e2e4", 47, 10, 43)]);
        let a = evaluate_move("e2e4", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::Best);
    }

    #[test]
    fn top_three_splits_on_win_rate() {
        let stats = position(vec![
            stat("e2e4", 500, 100, 400),
            stat("d2d4", 300, 60, 240),
            stat("g1f3", 100, 40, 60),
            stat("c2c4", 50, 20, 30),
        ]);
        // Second most popular, win rate 0.55 — good.
        let a = evaluate_move("d2d4", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::Good);
        // Third, win rate 0.60 — good as well.
        let a = evaluate_move("g1f3", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::Good);
    }

    #[test]
    fn top_three_with_poor_score_is_ok() {
        let stats = position(vec![
            stat("e2e4", 500, 100, 400),
            stat("d2d4", 100, 40, 260),
            stat("g1f3", 100, 40, 60),
            stat("c2c4", 50, 20, 30),
        ]);
        // Second most popular but win rate 0.30 — ok.
        let a = evaluate_move("d2d4", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::Ok);
    }

    #[test]
    fn popular_enough_with_decent_score_is_good() {
        // 4th candidate, ~8% frequency, win rate 0.45.
        let stats = position(vec![
            stat("e2e4", 300, 0, 100),
            stat("d2d4", 200, 0, 100),
            stat("g1f3", 100, 0, 60),
            stat("c2c4", 45, 10, 45),
            stat("b1c3", 20, 0, 10),
            stat("f2f4", 30, 0, 20),
        ]);
        let a = evaluate_move("c2c4", &stats, PlayerColor::White);
        assert!(a.frequency > 0.05);
        assert!(a.win_rate >= 0.40);
        assert_eq!(a.rating, MoveRating::Good);
    }

    #[test]
    fn rare_but_scoring_is_ok() {
        // Below 2% frequency but win rate 0.35 — rule 5's "or" branch.
        let mut moves = vec![
            stat("e2e4", 3000, 0, 2000),
            stat("d2d4", 2000, 0, 1000),
            stat("g1f3", 1000, 0, 500),
            stat("c2c4", 500, 0, 400),
        ];
        moves.push(stat("a2a3", 30, 10, 60));
        let stats = position(moves);
        let a = evaluate_move("a2a3", &stats, PlayerColor::White);
        assert!(a.frequency < 0.02);
        assert_eq!(a.rating, MoveRating::Ok);
    }

    #[test]
    fn rare_and_mediocre_is_inaccuracy() {
        let mut moves = vec![
            stat("e2e4", 3000, 0, 2000),
            stat("d2d4", 2000, 0, 1000),
            stat("g1f3", 1000, 0, 500),
            stat("c2c4", 500, 0, 400),
        ];
        // win rate 0.32, frequency well under 2%.
        moves.push(stat("a2a3", 28, 8, 64));
        let stats = position(moves);
        let a = evaluate_move("a2a3", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::Inaccuracy);
    }

    #[test]
    fn rare_and_losing_is_blunder() {
        let mut moves = vec![
            stat("e2e4", 3000, 0, 2000),
            stat("d2d4", 2000, 0, 1000),
            stat("g1f3", 1000, 0, 500),
            stat("c2c4", 500, 0, 400),
        ];
        // win rate 0.2, rare.
        moves.push(stat("g2g4", 18, 4, 78));
        let stats = position(moves);
        let a = evaluate_move("g2g4", &stats, PlayerColor::White);
        assert_eq!(a.rating, MoveRating::Blunder);
    }

    #[test]
    fn frequencies_sum_to_one() {
        let stats = position(vec![
            stat("e2e4", 500, 100, 400),
            stat("d2d4", 300, 60, 240),
            stat("g1f3", 100, 40, 60),
        ]);
        let sum: f64 = stats
            .moves
            .iter()
            .map(|m| evaluate_move(&m.uci, &stats, PlayerColor::White).frequency)
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_games_means_zero_frequency() {
        let stats = position(vec![stat("e2e4", 0, 0, 0), stat("d2d4", 0, 0, 0)]);
        for m in &stats.moves {
            let a = evaluate_move(&m.uci, &stats, PlayerColor::White);
            assert_eq!(a.frequency, 0.0);
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let stats = position(vec![
            stat("e2e4", 500, 100, 400),
            stat("d2d4", 300, 60, 240),
        ]);
        let first = evaluate_move("d2d4", &stats, PlayerColor::Black);
        for _ in 0..10 {
            assert_eq!(evaluate_move("d2d4", &stats, PlayerColor::Black), first);
        }
    }
}
