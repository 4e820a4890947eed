//! Per-level and total scoring
//!
//! Counters only; the controller decides what a completed level does to the
//! phase and timers. The spawn counter lives with the spawn scheduler.

use serde::{Deserialize, Serialize};

/// Score and level counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    /// 1-based
    pub level: u32,
    pub level_score: u32,
    pub total_score: u32,
    /// Saves + misses this level
    pub balls_completed: u32,
    pub balls_saved: u32,
    pub balls_missed: u32,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self {
            level: 1,
            level_score: 0,
            total_score: 0,
            balls_completed: 0,
            balls_saved: 0,
            balls_missed: 0,
        }
    }
}

/// What a recorded resolution did to the level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelProgress {
    Ongoing,
    /// Quota reached
    Complete { passed: bool },
}

/// Level rules applied to the score board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRules {
    pub quota: u32,
    pub pass_threshold: u32,
    pub level_count: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ball_saved(&mut self, rules: &LevelRules) -> LevelProgress {
        self.level_score += 1;
        self.total_score += 1;
        self.balls_saved += 1;
        self.balls_completed += 1;
        self.progress(rules)
    }

    pub fn ball_missed(&mut self, rules: &LevelRules) -> LevelProgress {
        self.balls_missed += 1;
        self.balls_completed += 1;
        self.progress(rules)
    }

    fn progress(&self, rules: &LevelRules) -> LevelProgress {
        debug_assert_eq!(self.balls_completed, self.balls_saved + self.balls_missed);
        debug_assert!(self.balls_completed <= rules.quota);
        if self.balls_completed >= rules.quota {
            LevelProgress::Complete {
                passed: self.level_passed(rules),
            }
        } else {
            LevelProgress::Ongoing
        }
    }

    pub fn level_passed(&self, rules: &LevelRules) -> bool {
        self.level_score >= rules.pass_threshold
    }

    pub fn is_level_complete(&self, rules: &LevelRules) -> bool {
        self.balls_completed >= rules.quota
    }

    pub fn is_last_level(&self, rules: &LevelRules) -> bool {
        self.level >= rules.level_count
    }

    /// Zero the per-level counters; level and total are kept
    pub fn reset_level(&mut self) {
        self.level_score = 0;
        self.balls_completed = 0;
        self.balls_saved = 0;
        self.balls_missed = 0;
    }

    /// Move to the next level. Returns false (and changes nothing) on the last level.
    pub fn advance_level(&mut self, rules: &LevelRules) -> bool {
        if self.is_last_level(rules) {
            return false;
        }
        self.level += 1;
        self.reset_level();
        true
    }

    pub fn retry_level(&mut self) {
        self.reset_level();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: LevelRules = LevelRules {
        quota: 10,
        pass_threshold: 5,
        level_count: 5,
    };

    fn play(board: &mut ScoreBoard, saves: u32) -> LevelProgress {
        let mut last = LevelProgress::Ongoing;
        for i in 0..RULES.quota {
            last = if i < saves {
                board.ball_saved(&RULES)
            } else {
                board.ball_missed(&RULES)
            };
        }
        last
    }

    #[test]
    fn test_five_of_ten_passes() {
        let mut board = ScoreBoard::new();
        assert_eq!(play(&mut board, 5), LevelProgress::Complete { passed: true });
        assert_eq!(board.level_score, 5);
        assert_eq!(board.total_score, 5);
        assert_eq!(board.balls_completed, 10);
    }

    #[test]
    fn test_four_of_ten_fails_and_retry_resets() {
        let mut board = ScoreBoard::new();
        assert_eq!(play(&mut board, 4), LevelProgress::Complete { passed: false });
        board.retry_level();
        assert_eq!(board.level_score, 0);
        assert_eq!(board.balls_completed, 0);
        assert_eq!(board.total_score, 4);
        assert_eq!(board.level, 1);
    }

    #[test]
    fn test_ongoing_until_quota() {
        let mut board = ScoreBoard::new();
        for _ in 0..9 {
            assert_eq!(board.ball_saved(&RULES), LevelProgress::Ongoing);
        }
        assert!(!board.is_level_complete(&RULES));
        assert!(matches!(board.ball_missed(&RULES), LevelProgress::Complete { .. }));
    }

    #[test]
    fn test_advance_stops_at_last_level() {
        let mut board = ScoreBoard::new();
        for expected in 2..=5 {
            assert!(board.advance_level(&RULES));
            assert_eq!(board.level, expected);
        }
        assert!(board.is_last_level(&RULES));
        assert!(!board.advance_level(&RULES));
        assert_eq!(board.level, 5);
    }

    #[test]
    fn test_advance_keeps_total() {
        let mut board = ScoreBoard::new();
        play(&mut board, 7);
        board.advance_level(&RULES);
        assert_eq!(board.total_score, 7);
        assert_eq!(board.level_score, 0);
        assert_eq!(board.balls_saved + board.balls_missed, 0);
    }
}
