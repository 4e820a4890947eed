//! Phase controller and fixed timestep loop
//!
//! [`Game`] is the single entry point for collaborators. Every mutation
//! (commands, timer fires, collision checks) goes through `&mut self`, so a
//! spawn can never race a pause.

use glam::Vec3;

use super::ball::{Ball, BallId, BallSlot};
use super::clock::{TimerKind, Timers};
use super::collision::{Hand, HandPositionProvider, check_interception};
use super::flight::{BallPositionProvider, FlightSample};
use super::reaction::level_result_text;
use super::scoring::{LevelProgress, LevelRules, ScoreBoard};
use super::spawn::{Countdown, CountdownStep, SpawnScheduler};
use super::state::{Feedback, FeedbackTone, GameEvent, GamePhase, MissReason, Snapshot};
use crate::consts::*;
use crate::settings::{FailPolicy, GameConfig};
use crate::{secs_to_ticks, ticks_to_secs};

/// The simulation engine
pub struct Game<H, B> {
    config: GameConfig,
    rules: LevelRules,
    phase: GamePhase,
    score: ScoreBoard,
    slot: BallSlot,
    scheduler: SpawnScheduler,
    timers: Timers,
    feedback: Feedback,
    /// Last live position reported by the renderer
    ball_position: Option<Vec3>,
    has_saved_game: bool,
    audio_enabled: bool,
    events: Vec<GameEvent>,
    hands: H,
    flight: B,
    accumulator: f32,
    time_ticks: u64,
}

impl<H: HandPositionProvider, B: BallPositionProvider> Game<H, B> {
    /// Create an engine in the Menu phase.
    ///
    /// `config` should already have passed [`GameConfig::validate`].
    pub fn new(config: GameConfig, seed: u64, hands: H, flight: B) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid game config");
        let rules = LevelRules {
            quota: config.balls_per_level,
            pass_threshold: config.pass_threshold,
            level_count: config.level_count(),
        };
        Self {
            scheduler: SpawnScheduler::new(&config, seed),
            config,
            rules,
            phase: GamePhase::Menu,
            score: ScoreBoard::new(),
            slot: BallSlot::new(),
            timers: Timers::new(),
            feedback: Feedback::default(),
            ball_position: None,
            has_saved_game: false,
            audio_enabled: true,
            events: Vec::new(),
            hands,
            flight,
            accumulator: 0.0,
            time_ticks: 0,
        }
    }

    // === Commands ===

    /// Full reset and start at level 1
    pub fn start_new_game(&mut self) {
        match self.phase {
            GamePhase::Menu
            | GamePhase::Paused
            | GamePhase::LevelComplete
            | GamePhase::GameComplete
            | GamePhase::GameOver => {}
            GamePhase::Playing => return,
        }
        self.halt();
        self.discard_ball();
        self.score = ScoreBoard::new();
        self.has_saved_game = false;
        self.feedback = Feedback::default();
        self.begin_level();
    }

    /// Resume a paused run without touching counters
    pub fn continue_game(&mut self) {
        if !self.has_saved_game || !matches!(self.phase, GamePhase::Menu | GamePhase::Paused) {
            return;
        }
        if self.score.is_level_complete(&self.rules) {
            // Left from the results screen; go back to it
            self.show_level_result(self.level_passed());
            self.set_phase(GamePhase::LevelComplete);
            return;
        }
        self.set_phase(GamePhase::Playing);
        // Fresh cycle; a countdown interrupted by the pause is not resumed
        self.scheduler.resume(&mut self.timers);
        self.timers.repeat(TimerKind::CollisionPoll, 1);
    }

    pub fn pause_game(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.halt();
        self.feedback.hide();
        self.has_saved_game = true;
        self.set_phase(GamePhase::Paused);
    }

    /// Valid from any phase
    pub fn return_to_menu(&mut self) {
        self.halt();
        if self.discard_ball().is_some() {
            // The ball never got to resolve, so it doesn't use up the quota
            self.scheduler.refund();
        }
        self.feedback.hide();
        self.set_phase(GamePhase::Menu);
    }

    /// Next level, or GameComplete after the last one. Requires a passed level.
    pub fn advance_level(&mut self) {
        if self.phase != GamePhase::LevelComplete || !self.level_passed() {
            return;
        }
        if !self.score.advance_level(&self.rules) {
            self.has_saved_game = false;
            self.feedback = Feedback::show("All levels complete!", FeedbackTone::Positive);
            log::info!("Game complete, total score {}", self.score.total_score);
            self.set_phase(GamePhase::GameComplete);
            return;
        }
        self.discard_ball();
        self.feedback = Feedback::default();
        self.begin_level();
    }

    /// Replay the current level from zero; total score is kept
    pub fn retry_level(&mut self) {
        if self.phase != GamePhase::LevelComplete {
            return;
        }
        self.score.retry_level();
        self.discard_ball();
        self.feedback = Feedback::default();
        self.begin_level();
    }

    pub fn toggle_audio(&mut self) {
        self.audio_enabled = !self.audio_enabled;
        self.events.push(GameEvent::AudioToggled {
            enabled: self.audio_enabled,
        });
    }

    // === Time ===

    /// Feed wall-clock frame time; runs as many fixed ticks as fit.
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiraling
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    /// Advance exactly one fixed tick
    pub fn tick(&mut self) {
        self.time_ticks += 1;
        for kind in TimerKind::ALL {
            if self.timers.step(kind) {
                self.on_timer(kind);
            }
        }
    }

    fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::CollisionPoll => self.poll_collision(),
            TimerKind::Countdown => match self.scheduler.on_countdown_tick(&mut self.timers) {
                CountdownStep::Tick(value) => self.events.push(GameEvent::CountdownTick { value }),
                CountdownStep::Launch => self.spawn_ball(),
                CountdownStep::Idle => {}
            },
            TimerKind::SpawnCycle => {
                if self.scheduler.start_countdown(&mut self.timers) {
                    self.events.push(GameEvent::CountdownStarted {
                        value: self.scheduler.countdown.value,
                    });
                } else {
                    log::trace!("spawn cycle: quota reached, nothing to do");
                }
            }
            TimerKind::Feedback => self.feedback.hide(),
        }
    }

    fn poll_collision(&mut self) {
        let Some(ball) = self.slot.current_mut() else {
            self.ball_position = None;
            return;
        };
        ball.flight_ticks += 1;
        let ball = *ball;

        match self.flight.sample(&ball, SIM_DT) {
            FlightSample::InFlight(pos) => {
                self.ball_position = Some(pos);
                if let Some(hit) = check_interception(pos, &self.hands, self.config.capture_radius) {
                    log::debug!("ball {:?} saved by {:?} at {:.3}", ball.id, hit.hand, hit.distance);
                    self.resolve_save(ball.id, hit.hand);
                    return;
                }
            }
            FlightSample::Arrived => {
                self.resolve_miss(ball.id, MissReason::Arrived);
                return;
            }
            // No position this tick means no capture this tick
            FlightSample::Unavailable => {}
        }

        let deadline = ball.flight_duration() + self.config.expiry_grace_secs;
        if ticks_to_secs(ball.flight_ticks) > deadline {
            log::debug!("ball {:?} expired without an arrival report", ball.id);
            self.resolve_miss(ball.id, MissReason::Expired);
        }
    }

    // === Level flow ===

    fn begin_level(&mut self) {
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::LevelStarted {
            level: self.score.level,
        });
        self.scheduler.start_level(&mut self.timers);
        self.events.push(GameEvent::CountdownStarted {
            value: self.scheduler.countdown.value,
        });
        self.timers.repeat(TimerKind::CollisionPoll, 1);
        log::info!(
            "Level {} started (speed {})",
            self.score.level,
            self.config.speed_for_level(self.score.level)
        );
    }

    fn spawn_ball(&mut self) {
        if self.scheduler.quota_reached() {
            return;
        }
        if let Some(stale) = self.slot.current().map(|b| b.id) {
            self.resolve_miss(stale, MissReason::Superseded);
            if self.phase != GamePhase::Playing {
                return;
            }
        }
        let Some(launch) = self.scheduler.next_launch() else {
            return;
        };
        let speed = self.config.speed_for_level(self.score.level);
        let (id, displaced) = self.slot.spawn(launch.start, launch.target, speed);
        debug_assert!(displaced.is_none());
        let Some(ball) = self.slot.current().copied() else {
            return;
        };
        self.flight.track(&ball);
        self.ball_position = Some(ball.start);
        log::debug!(
            "ball {:?} #{} launched {:?} -> {:?} at {} ({:.2}s)",
            id,
            self.scheduler.balls_spawned,
            ball.start,
            ball.target,
            speed,
            ball.flight_duration()
        );
        self.events.push(GameEvent::BallSpawned { ball });
    }

    fn resolve_save(&mut self, id: BallId, hand: Hand) {
        if self.slot.remove(id).is_none() {
            return;
        }
        self.flight.release(id);
        self.ball_position = None;
        self.flash_feedback("SAVE!", FeedbackTone::Positive);
        self.events.push(GameEvent::BallSaved { id, hand });
        let progress = self.score.ball_saved(&self.rules);
        self.after_resolution(progress);
    }

    fn resolve_miss(&mut self, id: BallId, reason: MissReason) {
        if self.slot.remove(id).is_none() {
            return;
        }
        self.flight.release(id);
        self.ball_position = None;
        log::debug!("ball {:?} missed ({:?})", id, reason);
        self.flash_feedback("MISS!", FeedbackTone::Negative);
        self.events.push(GameEvent::BallMissed { id, reason });
        let progress = self.score.ball_missed(&self.rules);
        self.after_resolution(progress);
    }

    fn after_resolution(&mut self, progress: LevelProgress) {
        if let LevelProgress::Complete { passed } = progress {
            self.complete_level(passed);
        }
    }

    fn complete_level(&mut self, passed: bool) {
        self.halt();
        self.discard_ball();
        let level = self.score.level;
        self.show_level_result(passed);
        self.events.push(GameEvent::LevelCompleted {
            level,
            passed,
            level_score: self.score.level_score,
        });
        log::info!(
            "Level {} {}: {}/{}",
            level,
            if passed { "passed" } else { "failed" },
            self.score.level_score,
            self.rules.quota
        );

        if !passed && self.config.fail_policy == FailPolicy::GameOver {
            self.has_saved_game = false;
            self.set_phase(GamePhase::GameOver);
        } else {
            self.set_phase(GamePhase::LevelComplete);
        }
    }

    /// Pass/fail banner with the reaction-time summary
    fn show_level_result(&mut self, passed: bool) {
        let text = level_result_text(&self.config, self.score.level, passed, self.score.level_score);
        let tone = if passed {
            FeedbackTone::Positive
        } else {
            FeedbackTone::Negative
        };
        self.feedback = Feedback::show(text, tone);
    }

    fn flash_feedback(&mut self, text: &str, tone: FeedbackTone) {
        self.feedback = Feedback::show(text, tone);
        self.timers
            .once(TimerKind::Feedback, secs_to_ticks(self.config.feedback_secs));
    }

    /// Stop every timer and hide the countdown
    fn halt(&mut self) {
        self.scheduler.stop(&mut self.timers);
        self.timers.cancel_all();
    }

    fn discard_ball(&mut self) -> Option<Ball> {
        let ball = self.slot.clear()?;
        self.flight.release(ball.id);
        self.ball_position = None;
        Some(ball)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    // === Published state ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.score
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_ball(&self) -> Option<&Ball> {
        self.slot.current()
    }

    pub fn ball_position(&self) -> Option<Vec3> {
        self.ball_position
    }

    pub fn countdown(&self) -> Countdown {
        self.scheduler.countdown
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn balls_spawned(&self) -> u32 {
        self.scheduler.balls_spawned
    }

    pub fn level_passed(&self) -> bool {
        self.score.level_passed(&self.rules)
    }

    pub fn has_saved_game(&self) -> bool {
        self.has_saved_game
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn hands(&self) -> &H {
        &self.hands
    }

    pub fn flight(&self) -> &B {
        &self.flight
    }

    /// Take all events published since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            balls: self.slot.current().copied().into_iter().collect(),
            ball_position: self.ball_position,
            countdown: self.scheduler.countdown,
            feedback: self.feedback.clone(),
            current_level: self.score.level,
            level_count: self.rules.level_count,
            level_score: self.score.level_score,
            total_score: self.score.total_score,
            balls_spawned: self.scheduler.balls_spawned,
            balls_completed: self.score.balls_completed,
            level_passed: self.level_passed(),
            has_saved_game: self.has_saved_game,
            audio_enabled: self.audio_enabled,
        }
    }
}
