//! Score and streak accumulation.
//!
//! Each rating has a fixed base value; non-blunder moves additionally
//! earn `floor(streak / 3)` bonus points from the streak built up
//! *before* the move. A blunder resets the streak and earns no bonus.
//! Off-book moves are neutral: base zero, streak untouched.

use book::MoveRating;

#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreKeeper {
    score: i32,
    streak: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one rated move and return the points awarded for it.
    pub fn award(&mut self, rating: MoveRating) -> i32 {
        if rating.is_blunder() {
            self.streak = 0;
            self.score += rating.points();
            return rating.points();
        }

        let points = rating.points() + (self.streak / 3) as i32;
        self.score += points;
        if rating != MoveRating::OffBook {
            self.streak += 1;
        }
        points
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }
}
