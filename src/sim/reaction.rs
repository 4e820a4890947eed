//! Reaction-time feedback
//!
//! Pure functions: how fast a player must react to stop a ball at a given
//! level. Used only for the text shown after a level.

use crate::settings::GameConfig;

/// Expected minimum reaction time (seconds) for a level
pub fn reaction_time(config: &GameConfig, level: u32) -> f32 {
    config.flight_distance / config.speed_for_level(level)
}

/// Text shown when a level ends
pub fn level_result_text(config: &GameConfig, level: u32, passed: bool, saves: u32) -> String {
    let quota = config.balls_per_level;
    let current = reaction_time(config, level);
    if passed {
        format!(
            "Level {} passed! {}/{} saved. Minimum reaction time: {:.2}s",
            level, saves, quota, current
        )
    } else if level > 1 {
        // Cleared the previous tier, so the player's reaction sits between the two
        let previous = reaction_time(config, level - 1);
        format!(
            "Level {} failed. {}/{} saved. Your reaction time: {:.2}s - {:.2}s",
            level, saves, quota, current, previous
        )
    } else {
        format!(
            "Level {} failed. {}/{} saved. Your reaction time: slower than {:.2}s",
            level, saves, quota, current
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Profile;

    #[test]
    fn test_reaction_time_formula() {
        let config = GameConfig::default();
        for level in 1..=config.level_count() {
            let expected = 23.8 / config.speed_for_level(level);
            assert!((reaction_time(&config, level) - expected).abs() < 1e-6);
        }
        assert!((reaction_time(&config, 1) - 2.975).abs() < 1e-4);
    }

    #[test]
    fn test_reaction_time_decreases_with_level() {
        let config = GameConfig::from_profile(Profile::Arcade);
        let times: Vec<f32> = (1..=config.level_count())
            .map(|l| reaction_time(&config, l))
            .collect();
        assert!(times.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_reaction_time_total() {
        let config = GameConfig::default();
        assert!(reaction_time(&config, 0).is_finite());
        assert!(reaction_time(&config, u32::MAX).is_finite());
    }

    #[test]
    fn test_level_result_text() {
        let config = GameConfig::default();
        let passed = level_result_text(&config, 2, true, 7);
        assert!(passed.contains("passed"));
        assert!(passed.contains("1.59s"));

        let failed = level_result_text(&config, 2, false, 3);
        let range = format!(
            "{:.2}s - {:.2}s",
            reaction_time(&config, 2),
            reaction_time(&config, 1)
        );
        assert!(failed.contains(&range), "{}", failed);

        let first = level_result_text(&config, 1, false, 0);
        let bound = format!("slower than {:.2}s", reaction_time(&config, 1));
        assert!(first.contains(&bound), "{}", first);
    }
}
