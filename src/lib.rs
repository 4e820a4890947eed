//! Keeper - a reaction-based ball catching game
//!
//! Core modules:
//! - `sim`: Simulation engine (phases, timers, spawning, interception, scoring)
//! - `settings`: Data-driven game balance and level profiles

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, FailPolicy, GameConfig, GoalWindow, Profile, SpawnVolume};
pub use sim::{Game, GamePhase, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (collision poll runs every tick)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Balls launched per level
    pub const BALLS_PER_LEVEL: u32 = 10;
    /// Saves needed to pass a level
    pub const PASS_THRESHOLD: u32 = 5;
    /// Hand-to-ball distance that counts as a save
    pub const CAPTURE_RADIUS: f32 = 0.5;
    /// Approximate spawn-to-goal distance used for reaction feedback
    pub const FLIGHT_DISTANCE: f32 = 23.8;

    /// Countdown starts here and spawns instead of reaching 0
    pub const COUNTDOWN_FROM: u32 = 3;
    pub const COUNTDOWN_INTERVAL_SECS: f32 = 1.0;
    pub const SPAWN_CYCLE_SECS: f32 = 5.0;
    /// How long SAVE!/MISS! stays up
    pub const FEEDBACK_SECS: f32 = 1.0;
    /// Extra flight time before the core gives up on an arrival report
    pub const EXPIRY_GRACE_SECS: f32 = 1.0;

    /// Ball speed tiers (units/second), one per level
    pub const ARCADE_SPEEDS: [f32; 5] = [8.0, 15.0, 20.0, 24.0, 27.0];
    pub const CLASSIC_SPEEDS: [f32; 3] = [8.0, 15.0, 20.0];
}

/// Convert seconds to whole simulation ticks (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    ((secs * consts::TICK_RATE as f32).round() as u32).max(1)
}

/// Convert ticks back to seconds
#[inline]
pub fn ticks_to_secs(ticks: u32) -> f32 {
    ticks as f32 * consts::SIM_DT
}
