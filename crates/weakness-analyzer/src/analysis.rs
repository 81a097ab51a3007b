/// Move-quality classification — pure functions only
/// (No board/engine/client dependencies)

use serde::{Deserialize, Serialize};

use crate::stockfish::EvalResult;

/// Classification thresholds (centipawn loss). Fixed policy constants,
/// not tunable per call.
const THRESHOLD_INACCURACY: i32 = 50;
const THRESHOLD_MISTAKE: i32 = 100;
const THRESHOLD_BLUNDER: i32 = 200;

/// Sentinel for mate scores
pub const MATE_SCORE: i32 = 10_000;

/// Severity tier of a single move by the target player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl MoveCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveCategory::Good => "good",
            MoveCategory::Inaccuracy => "inaccuracy",
            MoveCategory::Mistake => "mistake",
            MoveCategory::Blunder => "blunder",
        }
    }
}

/// One classified move by the target player. Scores are centipawns in
/// the fixed "positive = better for White" convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveEvaluation {
    /// 1-based ply number
    pub ply: usize,
    pub score_before: i32,
    pub score_after: i32,
    pub centipawn_loss: i32,
    pub category: MoveCategory,
}

/// Per-category move counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MoveCounts {
    pub good: u32,
    pub inaccuracies: u32,
    pub mistakes: u32,
    pub blunders: u32,
}

impl MoveCounts {
    pub fn record(&mut self, category: MoveCategory) {
        match category {
            MoveCategory::Good => self.good += 1,
            MoveCategory::Inaccuracy => self.inaccuracies += 1,
            MoveCategory::Mistake => self.mistakes += 1,
            MoveCategory::Blunder => self.blunders += 1,
        }
    }

    pub fn merge(&mut self, other: &MoveCounts) {
        self.good += other.good;
        self.inaccuracies += other.inaccuracies;
        self.mistakes += other.mistakes;
        self.blunders += other.blunders;
    }
}

/// Collapse an engine evaluation into a single centipawn number,
/// mapping mate scores to the ±MATE_SCORE sentinel. The result stays
/// relative to the side to move.
pub fn eval_to_cp(result: EvalResult) -> i32 {
    if let Some(mate) = result.mate {
        return if mate > 0 { MATE_SCORE } else { -MATE_SCORE };
    }
    result.cp.unwrap_or(0)
}

/// Normalize a side-to-move-relative score to the fixed
/// "positive = better for White" convention.
pub fn to_white_cp(relative_cp: i32, white_to_move: bool) -> i32 {
    if white_to_move { relative_cp } else { -relative_cp }
}

/// Evaluation drop attributable to the mover, clamped at 0. Both scores
/// must already be in the White-perspective convention.
pub fn centipawn_loss(score_before: i32, score_after: i32, mover_is_white: bool) -> i32 {
    let loss = if mover_is_white {
        score_before - score_after
    } else {
        score_after - score_before
    };
    loss.max(0)
}

pub fn classify_loss(centipawn_loss: i32) -> MoveCategory {
    if centipawn_loss >= THRESHOLD_BLUNDER {
        MoveCategory::Blunder
    } else if centipawn_loss >= THRESHOLD_MISTAKE {
        MoveCategory::Mistake
    } else if centipawn_loss >= THRESHOLD_INACCURACY {
        MoveCategory::Inaccuracy
    } else {
        MoveCategory::Good
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify_loss(0), MoveCategory::Good);
        assert_eq!(classify_loss(49), MoveCategory::Good);
        assert_eq!(classify_loss(50), MoveCategory::Inaccuracy);
        assert_eq!(classify_loss(99), MoveCategory::Inaccuracy);
        assert_eq!(classify_loss(100), MoveCategory::Mistake);
        assert_eq!(classify_loss(199), MoveCategory::Mistake);
        assert_eq!(classify_loss(200), MoveCategory::Blunder);
        assert_eq!(classify_loss(500), MoveCategory::Blunder);
        assert_eq!(classify_loss(200).as_str(), "blunder");
        assert_eq!(classify_loss(0).as_str(), "good");
    }

    #[test]
    fn test_white_blunder_scenario() {
        // White to move at +50, position drops to -160 after the move.
        let loss = centipawn_loss(50, -160, true);
        assert_eq!(loss, 210);
        assert_eq!(classify_loss(loss), MoveCategory::Blunder);
    }

    #[test]
    fn test_loss_clamped_at_zero() {
        // A move cannot "gain" negative loss.
        assert_eq!(centipawn_loss(50, 120, true), 0);
        assert_eq!(centipawn_loss(-30, -90, false), 0);
    }

    #[test]
    fn test_black_perspective_loss() {
        // Black to move at -80 (good for Black); position swings to +40.
        assert_eq!(centipawn_loss(-80, 40, false), 120);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(to_white_cp(35, true), 35);
        assert_eq!(to_white_cp(35, false), -35);
    }

    #[test]
    fn test_mate_sentinel() {
        let mate_for_mover = EvalResult {
            cp: None,
            mate: Some(3),
        };
        assert_eq!(eval_to_cp(mate_for_mover), MATE_SCORE);

        let mated = EvalResult {
            cp: None,
            mate: Some(-2),
        };
        assert_eq!(eval_to_cp(mated), -MATE_SCORE);

        // Terminal position: the side to move is already checkmated.
        let mated_now = EvalResult {
            cp: None,
            mate: Some(0),
        };
        assert_eq!(eval_to_cp(mated_now), -MATE_SCORE);

        let plain = EvalResult {
            cp: Some(-42),
            mate: None,
        };
        assert_eq!(eval_to_cp(plain), -42);

        let missing = EvalResult {
            cp: None,
            mate: None,
        };
        assert_eq!(eval_to_cp(missing), 0);
    }
}
