//! Popularity-weighted opponent sampling.

use rand::Rng;

use crate::stats::{MoveStat, PositionStats};

/// Pick one candidate move with probability proportional to its game
/// count. Returns `None` when there are no candidates.
///
/// The random source is supplied by the caller so that tests can seed
/// it and assert exact outcomes.
pub fn sample_reply<'a, R: Rng + ?Sized>(
    stats: &'a PositionStats,
    rng: &mut R,
) -> Option<&'a MoveStat> {
    if stats.moves.is_empty() {
        return None;
    }
    let total = stats.candidate_games();
    if total == 0 {
        // Degenerate sample: every weight is zero, any pick is as good.
        return stats.moves.first();
    }

    let draw = rng.gen_range(0.0..total as f64);
    let mut cumulative = 0u64;
    for stat in &stats.moves {
        cumulative += stat.total_games();
        if draw <= cumulative as f64 {
            return Some(stat);
        }
    }
    // Rounding left the draw unconsumed; fall back to the final candidate.
    stats.moves.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn stat(uci: &str, games: u64) -> MoveStat {
        MoveStat {
            uci: uci.to_string(),
            san: uci.to_string(),
            average_rating: 0,
            white: games,
            draws: 0,
            black: 0,
            opening: None,
        }
    }

    fn position(moves: Vec<MoveStat>) -> PositionStats {
        let white = moves.iter().map(|m| m.white).sum();
        PositionStats {
            white,
            draws: 0,
            black: 0,
            moves,
            opening: None,
        }
    }

    #[test]
    fn no_candidates_yields_none() {
        let stats = position(vec![]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_reply(&stats, &mut rng).is_none());
    }

    #[test]
    fn zero_weight_candidates_still_yield_a_move() {
        let stats = position(vec![stat("e2e4", 0), stat("d2d4", 0)]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_reply(&stats, &mut rng).is_some());
    }

    #[test]
    fn single_candidate_always_selected() {
        let stats = position(vec![stat("e2e4", 42)]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(sample_reply(&stats, &mut rng).unwrap().uci, "e2e4");
        }
    }

    #[test]
    fn three_to_one_ratio_converges() {
        let stats = position(vec![stat("e2e4", 300), stat("d2d4", 100)]);
        let mut rng = StdRng::seed_from_u64(1234);

        let n = 20_000;
        let mut e4 = 0u32;
        for _ in 0..n {
            if sample_reply(&stats, &mut rng).unwrap().uci == "e2e4" {
                e4 += 1;
            }
        }
        let share = f64::from(e4) / f64::from(n);
        assert!(
            (share - 0.75).abs() < 0.02,
            "expected ~0.75, got {share}"
        );
    }
}
