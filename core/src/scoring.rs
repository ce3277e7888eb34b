//! Score formula for a finished game and the labels derived from a score.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

const BASE_SCORE: i64 = 10_000;
const MOVE_PENALTY: i64 = 50;
const SECOND_PENALTY: i64 = 1;
const HINT_PENALTY: i64 = 200;
const STREAK_BONUS: i64 = 100;
const PERFECT_BONUS: i64 = 2_000;

/// Performance metrics of a finished game, the inputs of [`compute_score`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetrics {
    pub moves: Count,
    pub elapsed_secs: Count,
    pub difficulty: Difficulty,
    pub max_streak: Count,
    pub hints_used: Count,
    pub pair_count: Count,
    pub mode: GameMode,
}

impl GameMetrics {
    /// Every move was a match.
    pub const fn is_perfect(&self) -> bool {
        self.moves == self.pair_count
    }

    pub fn score(&self) -> Score {
        compute_score(
            self.moves,
            self.elapsed_secs,
            self.difficulty,
            self.max_streak,
            self.hints_used,
            self.pair_count,
            self.mode,
        )
    }
}

pub const fn difficulty_bonus(difficulty: Difficulty) -> i64 {
    use Difficulty::*;
    match difficulty {
        Easy => 0,
        Medium => 1_000,
        Hard => 2_500,
    }
}

pub const fn mode_multiplier(mode: GameMode) -> f64 {
    use GameMode::*;
    match mode {
        Classic => 1.0,
        Timed => 1.5,
        LimitedMoves => 1.3,
    }
}

/// Bonus for a fast average time per pair: under 3s, 5s and 8s.
pub const fn time_bonus(elapsed_secs: Count, pair_count: Count) -> i64 {
    if pair_count == 0 {
        return 0;
    }

    // elapsed / pairs < n  <=>  elapsed < n * pairs, without the division
    let elapsed = elapsed_secs as u64;
    let pairs = pair_count as u64;
    if elapsed < 3 * pairs {
        1_500
    } else if elapsed < 5 * pairs {
        1_000
    } else if elapsed < 8 * pairs {
        500
    } else {
        0
    }
}

/// Final score of a game, never negative.
///
/// The mode multiplier is applied last and the product is floored, so the
/// result is reproducible for identical inputs.
pub fn compute_score(
    moves: Count,
    elapsed_secs: Count,
    difficulty: Difficulty,
    max_streak: Count,
    hints_used: Count,
    pair_count: Count,
    mode: GameMode,
) -> Score {
    let mut score = BASE_SCORE;
    score -= i64::from(moves) * MOVE_PENALTY;
    score -= i64::from(elapsed_secs) * SECOND_PENALTY;
    score -= i64::from(hints_used) * HINT_PENALTY;
    score += difficulty_bonus(difficulty);
    score += i64::from(max_streak) * STREAK_BONUS;
    if moves == pair_count {
        score += PERFECT_BONUS;
    }
    score += time_bonus(elapsed_secs, pair_count);

    let scaled = floor(score as f64 * mode_multiplier(mode));
    if scaled <= 0.0 {
        0
    } else if scaled >= Score::MAX as f64 {
        Score::MAX
    } else {
        scaled as Score
    }
}

// `f64::floor` lives in std, this is the same for the finite values seen here.
fn floor(value: f64) -> f64 {
    let truncated = value as i64 as f64;
    if truncated > value {
        truncated - 1.0
    } else {
        truncated
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    Novice,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
    Legendary,
}

impl Rating {
    pub const fn label(self) -> &'static str {
        use Rating::*;
        match self {
            Novice => "Novice",
            Beginner => "Beginner",
            Intermediate => "Intermediate",
            Advanced => "Advanced",
            Expert => "Expert",
            Master => "Master",
            Legendary => "Legendary",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const fn rating_tier(score: Score) -> Rating {
    use Rating::*;
    match score {
        12_000.. => Legendary,
        10_000.. => Master,
        8_000.. => Expert,
        6_000.. => Advanced,
        4_000.. => Intermediate,
        2_000.. => Beginner,
        _ => Novice,
    }
}

/// One to five stars.
pub const fn star_rating(score: Score) -> u8 {
    match score {
        12_000.. => 5,
        9_000.. => 4,
        6_000.. => 3,
        3_000.. => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Difficulty::*;
    use GameMode::*;

    #[test]
    fn perfect_fast_medium_game() {
        assert_eq!(compute_score(12, 24, Medium, 12, 0, 12, Classic), 15_076);
    }

    #[test]
    fn zero_moves_on_hard_gets_no_perfect_bonus() {
        // 10000 + 2500 + 1500 (0s is under 3s per pair)
        assert_eq!(compute_score(0, 0, Hard, 0, 0, 12, Classic), 14_000);
    }

    #[test]
    fn each_term_contributes_in_order() {
        let base = compute_score(10, 80, Easy, 0, 0, 6, Classic);
        // 10000 - 500 - 80, no perfect bonus, 80s / 6 pairs is over 8s
        assert_eq!(base, 9_420);
        assert_eq!(compute_score(10, 80, Easy, 0, 1, 6, Classic), base - 200);
        assert_eq!(compute_score(10, 80, Easy, 2, 0, 6, Classic), base + 200);
        assert_eq!(compute_score(10, 80, Medium, 0, 0, 6, Classic), base + 1_000);
    }

    #[test]
    fn time_bonus_thresholds_are_exclusive() {
        assert_eq!(time_bonus(17, 6), 1_500);
        assert_eq!(time_bonus(18, 6), 1_000);
        assert_eq!(time_bonus(29, 6), 1_000);
        assert_eq!(time_bonus(30, 6), 500);
        assert_eq!(time_bonus(47, 6), 500);
        assert_eq!(time_bonus(48, 6), 0);
        assert_eq!(time_bonus(0, 0), 0);
    }

    #[test]
    fn multiplier_floors_after_multiplying() {
        // 15076 * 1.3 = 19598.8
        assert_eq!(compute_score(12, 24, Medium, 12, 0, 12, LimitedMoves), 19_598);
        // 15076 * 1.5 = 22614
        assert_eq!(compute_score(12, 24, Medium, 12, 0, 12, Timed), 22_614);
        // 9421 * 1.3 = 12247.3
        assert_eq!(compute_score(10, 79, Easy, 0, 0, 6, LimitedMoves), 12_247);
    }

    #[test]
    fn score_is_clamped_at_zero() {
        assert_eq!(compute_score(400, 5_000, Easy, 0, 3, 6, Timed), 0);
    }

    #[test]
    fn same_inputs_same_score() {
        let metrics = GameMetrics {
            moves: 15,
            elapsed_secs: 61,
            difficulty: Hard,
            max_streak: 4,
            hints_used: 1,
            pair_count: 12,
            mode: Timed,
        };
        let first = metrics.score();
        for _ in 0..10 {
            assert_eq!(metrics.score(), first);
        }
        assert!(!metrics.is_perfect());
    }

    #[test]
    fn rating_boundaries_belong_to_upper_tier() {
        assert_eq!(rating_tier(0), Rating::Novice);
        assert_eq!(rating_tier(1_999), Rating::Novice);
        assert_eq!(rating_tier(2_000), Rating::Beginner);
        assert_eq!(rating_tier(4_000), Rating::Intermediate);
        assert_eq!(rating_tier(6_000), Rating::Advanced);
        assert_eq!(rating_tier(8_000), Rating::Expert);
        assert_eq!(rating_tier(9_999), Rating::Expert);
        assert_eq!(rating_tier(10_000), Rating::Master);
        assert_eq!(rating_tier(12_000), Rating::Legendary);
        assert!(Rating::Novice < Rating::Legendary);
    }

    #[test]
    fn star_thresholds() {
        assert_eq!(star_rating(2_999), 1);
        assert_eq!(star_rating(3_000), 2);
        assert_eq!(star_rating(6_000), 3);
        assert_eq!(star_rating(9_000), 4);
        assert_eq!(star_rating(11_999), 4);
        assert_eq!(star_rating(12_000), 5);
    }
}
