//! Published game state
//!
//! Everything collaborators may observe: the phase, a read-only snapshot and
//! the event stream. Nothing in here mutates the simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallId};
use super::collision::Hand;
use super::spawn::Countdown;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Main menu (initial)
    #[default]
    Menu,
    /// Balls are being launched
    Playing,
    /// Timers stopped, game can be continued
    Paused,
    /// Level quota reached, waiting for advance/retry
    LevelComplete,
    /// Last level passed
    GameComplete,
    /// Run ended on a failed level
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::LevelComplete => "LevelComplete",
            GamePhase::GameComplete => "GameComplete",
            GamePhase::GameOver => "GameOver",
        }
    }

    /// End of a single run
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameComplete | GamePhase::GameOver)
    }
}

/// Why a ball counted as a miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissReason {
    /// Renderer reported the ball reached the goal
    Arrived,
    /// No arrival report long after the expected flight duration
    Expired,
    /// Next spawn cycle replaced the ball before it resolved
    Superseded,
}

/// Color hint for feedback text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FeedbackTone {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// Feedback banner ("SAVE!", "MISS!", level results)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Feedback {
    pub text: String,
    pub tone: FeedbackTone,
    pub visible: bool,
}

impl Feedback {
    pub fn show(text: impl Into<String>, tone: FeedbackTone) -> Self {
        Self {
            text: text.into(),
            tone,
            visible: true,
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Push notifications, drained by collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    LevelStarted { level: u32 },
    CountdownStarted { value: u32 },
    CountdownTick { value: u32 },
    BallSpawned { ball: Ball },
    BallSaved { id: BallId, hand: Hand },
    BallMissed { id: BallId, reason: MissReason },
    LevelCompleted { level: u32, passed: bool, level_score: u32 },
    AudioToggled { enabled: bool },
}

/// Read-only view of everything the HUD, renderer and audio need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// 0 or 1 entries
    pub balls: Vec<Ball>,
    /// Last live position reported for the ball
    pub ball_position: Option<Vec3>,
    pub countdown: Countdown,
    pub feedback: Feedback,
    pub current_level: u32,
    pub level_count: u32,
    pub level_score: u32,
    pub total_score: u32,
    pub balls_spawned: u32,
    pub balls_completed: u32,
    pub level_passed: bool,
    pub has_saved_game: bool,
    pub audio_enabled: bool,
}
