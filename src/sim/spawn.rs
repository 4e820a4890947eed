//! Countdown → spawn cycle
//!
//! The scheduler owns the countdown, the per-level spawn counter and the
//! seeded RNG that places balls. The controller owns the timers and calls
//! in here when they fire.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{TimerKind, Timers};
use crate::secs_to_ticks;
use crate::settings::{GameConfig, GoalWindow, SpawnVolume};

/// Countdown shown before each ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Countdown {
    pub value: u32,
    pub visible: bool,
}

/// Result of a countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Countdown moved to this value
    Tick(u32),
    /// Countdown finished; a ball should spawn now
    Launch,
    /// No countdown was running
    Idle,
}

/// Start and target of the next ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub start: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    pub countdown: Countdown,
    pub balls_spawned: u32,
    quota: u32,
    countdown_from: u32,
    countdown_ticks: u32,
    cycle_ticks: u32,
    volume: SpawnVolume,
    goal: GoalWindow,
    rng: Pcg32,
}

impl SpawnScheduler {
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        Self {
            countdown: Countdown::default(),
            balls_spawned: 0,
            quota: config.balls_per_level,
            countdown_from: config.countdown_from,
            countdown_ticks: secs_to_ticks(config.countdown_interval_secs),
            cycle_ticks: secs_to_ticks(config.spawn_cycle_secs),
            volume: config.spawn_volume,
            goal: config.goal,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reset the spawn counter and kick off the first countdown plus the cycle timer
    pub fn start_level(&mut self, timers: &mut Timers) {
        self.balls_spawned = 0;
        self.start_countdown(timers);
        timers.repeat(TimerKind::SpawnCycle, self.cycle_ticks);
    }

    /// Show the countdown from the top. Returns false once the quota is used up.
    pub fn start_countdown(&mut self, timers: &mut Timers) -> bool {
        if self.quota_reached() {
            return false;
        }
        self.countdown = Countdown {
            value: self.countdown_from,
            visible: true,
        };
        timers.repeat(TimerKind::Countdown, self.countdown_ticks);
        true
    }

    /// Handle a countdown timer fire
    pub fn on_countdown_tick(&mut self, timers: &mut Timers) -> CountdownStep {
        if !self.countdown.visible {
            timers.cancel(TimerKind::Countdown);
            return CountdownStep::Idle;
        }
        if self.countdown.value > 1 {
            self.countdown.value -= 1;
            return CountdownStep::Tick(self.countdown.value);
        }
        // Would drop below 1: hide and launch instead of showing 0
        timers.cancel(TimerKind::Countdown);
        self.countdown = Countdown::default();
        CountdownStep::Launch
    }

    /// Cancel countdown and cycle timers; counters are kept
    pub fn stop(&mut self, timers: &mut Timers) {
        timers.cancel(TimerKind::Countdown);
        timers.cancel(TimerKind::SpawnCycle);
        self.countdown = Countdown::default();
    }

    /// Re-arm the cycle timer only. The next ball waits for a fresh countdown.
    pub fn resume(&mut self, timers: &mut Timers) {
        timers.repeat(TimerKind::SpawnCycle, self.cycle_ticks);
    }

    pub fn quota_reached(&self) -> bool {
        self.balls_spawned >= self.quota
    }

    /// Count a spawn and draw its geometry. None once the quota is reached.
    pub fn next_launch(&mut self) -> Option<Launch> {
        if self.quota_reached() {
            return None;
        }
        self.balls_spawned += 1;
        Some(Launch {
            start: self.random_start(),
            target: self.random_target(),
        })
    }

    /// Give back a spawn that never got a chance to resolve
    pub fn refund(&mut self) {
        self.balls_spawned = self.balls_spawned.saturating_sub(1);
    }

    fn random_start(&mut self) -> Vec3 {
        let (min, max) = (self.volume.min, self.volume.max);
        Vec3::new(
            self.rng.random_range(min.x..=max.x),
            self.rng.random_range(min.y..=max.y),
            self.rng.random_range(min.z..=max.z),
        )
    }

    fn random_target(&mut self) -> Vec3 {
        let half_w = self.goal.width / 2.0;
        let half_h = self.goal.height / 2.0;
        let c = self.goal.center;
        Vec3::new(
            self.rng.random_range(c.x - half_w..=c.x + half_w),
            self.rng.random_range(c.y - half_h..=c.y + half_h),
            self.goal.target_depth(),
        )
    }
}
