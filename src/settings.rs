//! Game balance and level profiles
//!
//! Level count, speed table and pass threshold are data, not constants:
//! different builds of the game shipped 3 and 5 levels.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::secs_to_ticks;

/// Built-in balance presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Profile {
    /// Three levels, a failed level ends the run
    Classic,
    /// Five levels, a failed level can be retried
    #[default]
    Arcade,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Classic => "Classic",
            Profile::Arcade => "Arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "3" => Some(Profile::Classic),
            "arcade" | "5" => Some(Profile::Arcade),
            _ => None,
        }
    }

    /// Speed per level (units/second)
    pub fn speeds(&self) -> Vec<f32> {
        match self {
            Profile::Classic => CLASSIC_SPEEDS.to_vec(),
            Profile::Arcade => ARCADE_SPEEDS.to_vec(),
        }
    }

    /// What happens when a level ends below the pass threshold
    pub fn fail_policy(&self) -> FailPolicy {
        match self {
            Profile::Classic => FailPolicy::GameOver,
            Profile::Arcade => FailPolicy::Retry,
        }
    }
}

/// Outcome of finishing a level below the pass threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FailPolicy {
    /// Stay in LevelComplete and let the player retry
    #[default]
    Retry,
    /// End the run
    GameOver,
}

/// Box that ball start positions are drawn from (in front of the player)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnVolume {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for SpawnVolume {
    fn default() -> Self {
        Self {
            min: Vec3::new(-10.0, 0.5, -25.0),
            max: Vec3::new(10.0, 4.0, -15.0),
        }
    }
}

/// Goal mouth that every ball is aimed through
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalWindow {
    /// Center of the opening on the goal plane
    pub center: Vec3,
    pub width: f32,
    pub height: f32,
    /// Targets sit this far behind the goal plane
    pub depth_offset: f32,
}

impl Default for GoalWindow {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 0.9, 2.0),
            width: 4.0,
            height: 1.6,
            depth_offset: 0.5,
        }
    }
}

impl GoalWindow {
    /// Depth at which every flight path terminates
    pub fn target_depth(&self) -> f32 {
        self.center.z + self.depth_offset
    }

    /// Whether a target lies inside the opening (x/y) at the target depth
    pub fn contains_target(&self, p: Vec3) -> bool {
        const TOLERANCE: f32 = 1e-4;
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        (p.x - self.center.x).abs() <= half_w + TOLERANCE
            && (p.y - self.center.y).abs() <= half_h + TOLERANCE
            && (p.z - self.target_depth()).abs() <= TOLERANCE
    }
}

/// Configuration validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level table is empty")]
    NoLevels,
    #[error("speed for level {level} must be positive (got {speed})")]
    NonPositiveSpeed { level: u32, speed: f32 },
    #[error("speed for level {level} is lower than the level before it")]
    DecreasingSpeed { level: u32 },
    #[error("balls_per_level must be at least 1")]
    EmptyQuota,
    #[error("pass_threshold {threshold} exceeds balls_per_level {quota}")]
    ThresholdAboveQuota { threshold: u32, quota: u32 },
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("spawn cycle ({cycle_ticks} ticks) must outlast the countdown ({countdown_ticks} ticks)")]
    CycleShorterThanCountdown { cycle_ticks: u32, countdown_ticks: u32 },
    #[error("spawn volume min must not exceed max on any axis")]
    InvertedSpawnVolume,
    #[error("goal window size must not be negative")]
    NegativeGoalWindow,
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Speed per level; the table length is the level count
    pub speeds: Vec<f32>,
    pub balls_per_level: u32,
    pub pass_threshold: u32,
    pub fail_policy: FailPolicy,
    pub capture_radius: f32,
    pub flight_distance: f32,
    pub countdown_from: u32,
    pub countdown_interval_secs: f32,
    pub spawn_cycle_secs: f32,
    pub feedback_secs: f32,
    pub expiry_grace_secs: f32,
    pub spawn_volume: SpawnVolume,
    pub goal: GoalWindow,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_profile(Profile::default())
    }
}

impl GameConfig {
    /// Create a config from a preset (everything else at defaults)
    pub fn from_profile(profile: Profile) -> Self {
        Self {
            speeds: profile.speeds(),
            balls_per_level: BALLS_PER_LEVEL,
            pass_threshold: PASS_THRESHOLD,
            fail_policy: profile.fail_policy(),
            capture_radius: CAPTURE_RADIUS,
            flight_distance: FLIGHT_DISTANCE,
            countdown_from: COUNTDOWN_FROM,
            countdown_interval_secs: COUNTDOWN_INTERVAL_SECS,
            spawn_cycle_secs: SPAWN_CYCLE_SECS,
            feedback_secs: FEEDBACK_SECS,
            expiry_grace_secs: EXPIRY_GRACE_SECS,
            spawn_volume: SpawnVolume::default(),
            goal: GoalWindow::default(),
        }
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speeds.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (i, &speed) in self.speeds.iter().enumerate() {
            let level = i as u32 + 1;
            if speed <= 0.0 || !speed.is_finite() {
                return Err(ConfigError::NonPositiveSpeed { level, speed });
            }
            if i > 0 && speed < self.speeds[i - 1] {
                return Err(ConfigError::DecreasingSpeed { level });
            }
        }
        if self.balls_per_level == 0 {
            return Err(ConfigError::EmptyQuota);
        }
        if self.pass_threshold > self.balls_per_level {
            return Err(ConfigError::ThresholdAboveQuota {
                threshold: self.pass_threshold,
                quota: self.balls_per_level,
            });
        }
        let positives = [
            ("capture_radius", self.capture_radius),
            ("flight_distance", self.flight_distance),
            ("countdown_interval_secs", self.countdown_interval_secs),
            ("spawn_cycle_secs", self.spawn_cycle_secs),
            ("feedback_secs", self.feedback_secs),
        ];
        for (field, value) in positives {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if !self.spawn_volume.min.cmple(self.spawn_volume.max).all() {
            return Err(ConfigError::InvertedSpawnVolume);
        }
        if self.goal.width < 0.0 || self.goal.height < 0.0 {
            return Err(ConfigError::NegativeGoalWindow);
        }
        if self.countdown_from == 0 {
            return Err(ConfigError::NonPositive { field: "countdown_from" });
        }
        if self.expiry_grace_secs < 0.0 || self.expiry_grace_secs.is_nan() {
            return Err(ConfigError::Negative {
                field: "expiry_grace_secs",
            });
        }
        // Each cycle fire restarts the countdown, so a short cycle never launches
        let cycle_ticks = secs_to_ticks(self.spawn_cycle_secs);
        let countdown_ticks = self
            .countdown_from
            .saturating_mul(secs_to_ticks(self.countdown_interval_secs));
        if cycle_ticks <= countdown_ticks {
            return Err(ConfigError::CycleShorterThanCountdown {
                cycle_ticks,
                countdown_ticks,
            });
        }
        Ok(())
    }

    /// Number of configured levels
    pub fn level_count(&self) -> u32 {
        self.speeds.len() as u32
    }

    /// Ball speed for a level; out-of-range levels clamp to the nearest tier
    pub fn speed_for_level(&self, level: u32) -> f32 {
        let idx = (level.max(1) as usize - 1).min(self.speeds.len().saturating_sub(1));
        self.speeds.get(idx).copied().unwrap_or(CLASSIC_SPEEDS[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str() {
        assert_eq!(Profile::from_str("Classic"), Some(Profile::Classic));
        assert_eq!(Profile::from_str("arcade"), Some(Profile::Arcade));
        assert_eq!(Profile::from_str("5"), Some(Profile::Arcade));
        assert_eq!(Profile::from_str("hard"), None);
    }

    #[test]
    fn test_profiles_validate() {
        for profile in [Profile::Classic, Profile::Arcade] {
            let config = GameConfig::from_profile(profile);
            assert!(config.validate().is_ok(), "{} should be valid", profile.as_str());
        }
        assert_eq!(GameConfig::from_profile(Profile::Classic).level_count(), 3);
        assert_eq!(GameConfig::default().level_count(), 5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "speeds": [5.0, 6.0], "pass_threshold": 7 }"#)
            .expect("valid config");
        assert_eq!(config.level_count(), 2);
        assert_eq!(config.pass_threshold, 7);
        assert_eq!(config.balls_per_level, BALLS_PER_LEVEL);
        assert_eq!(config.capture_radius, CAPTURE_RADIUS);
    }

    #[test]
    fn test_validation_errors() {
        let err = GameConfig::from_json(r#"{ "speeds": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoLevels));

        let err = GameConfig::from_json(r#"{ "speeds": [10.0, 9.0] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::DecreasingSpeed { level: 2 }));

        let err = GameConfig::from_json(r#"{ "pass_threshold": 11 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdAboveQuota { .. }));

        let err = GameConfig::from_json(r#"{ "capture_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "capture_radius" }));

        let err = GameConfig::from_json(
            r#"{ "spawn_volume": { "min": [1.0, 0.0, 0.0], "max": [0.0, 1.0, 1.0] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedSpawnVolume));

        let err = GameConfig::from_json(r#"{ "expiry_grace_secs": -0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Negative { field: "expiry_grace_secs" }));
        assert!(GameConfig::from_json(r#"{ "expiry_grace_secs": 0.0 }"#).is_ok());

        let err = GameConfig::from_json(r#"{ "spawn_cycle_secs": 2.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CycleShorterThanCountdown {
                cycle_ticks: 120,
                countdown_ticks: 180
            }
        ));
        let err = GameConfig::from_json(r#"{ "spawn_cycle_secs": 3.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::CycleShorterThanCountdown { .. }));
        assert!(GameConfig::from_json(r#"{ "spawn_cycle_secs": 3.5 }"#).is_ok());

        let err = GameConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_speed_for_level_clamps() {
        let config = GameConfig::default();
        assert_eq!(config.speed_for_level(1), 8.0);
        assert_eq!(config.speed_for_level(5), 27.0);
        assert_eq!(config.speed_for_level(0), 8.0);
        assert_eq!(config.speed_for_level(99), 27.0);
    }

    #[test]
    fn test_goal_target_depth() {
        let goal = GoalWindow::default();
        assert!((goal.target_depth() - 2.5).abs() < 1e-6);
        assert!(goal.contains_target(Vec3::new(1.0, 1.2, 2.5)));
        assert!(!goal.contains_target(Vec3::new(3.0, 1.2, 2.5)));
    }
}
