//! Simulation engine
//!
//! All gameplay logic lives here and is driven by a fixed tick:
//! - Tick-counted timers only, no wall clock
//! - Seeded RNG only
//! - No rendering, sensing or audio dependencies (collaborators sit behind traits)

pub mod ball;
pub mod clock;
pub mod collision;
pub mod flight;
pub mod reaction;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallId, BallSlot};
pub use clock::{TimerKind, Timers};
pub use collision::{Hand, HandPositionProvider, Interception, SharedHands, check_interception};
pub use flight::{BallPositionProvider, Easing, FlightAnimator, FlightSample};
pub use reaction::{level_result_text, reaction_time};
pub use scoring::{LevelProgress, LevelRules, ScoreBoard};
pub use spawn::{Countdown, SpawnScheduler};
pub use state::{Feedback, FeedbackTone, GameEvent, GamePhase, MissReason, Snapshot};
pub use tick::Game;
