//! Tick-driven timer registry
//!
//! Timers are counted in fixed simulation ticks and keyed by purpose, so
//! the controller can cancel any of them (or all) atomically. Nothing here
//! knows about game rules.

use serde::{Deserialize, Serialize};

/// Purpose of a timer. Also the order timers are visited within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Hand/ball distance check (every tick while playing)
    CollisionPoll,
    /// 1 Hz pre-spawn countdown
    Countdown,
    /// Re-triggers the countdown for every subsequent ball
    SpawnCycle,
    /// Hides SAVE!/MISS! feedback
    Feedback,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::CollisionPoll,
        TimerKind::Countdown,
        TimerKind::SpawnCycle,
        TimerKind::Feedback,
    ];

    fn index(self) -> usize {
        match self {
            TimerKind::CollisionPoll => 0,
            TimerKind::Countdown => 1,
            TimerKind::SpawnCycle => 2,
            TimerKind::Feedback => 3,
        }
    }
}

/// A single armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub period_ticks: u32,
    pub remaining_ticks: u32,
    pub repeating: bool,
}

/// One slot per [`TimerKind`]; re-arming a kind replaces its previous timer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    slots: [Option<Timer>; 4],
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a repeating timer that first fires after one full period
    pub fn repeat(&mut self, kind: TimerKind, period_ticks: u32) {
        self.arm(kind, period_ticks, true);
    }

    /// Arm a timer that fires once and then disarms itself
    pub fn once(&mut self, kind: TimerKind, delay_ticks: u32) {
        self.arm(kind, delay_ticks, false);
    }

    fn arm(&mut self, kind: TimerKind, period_ticks: u32, repeating: bool) {
        let period_ticks = period_ticks.max(1);
        log::trace!("arm {:?} every {} ticks (repeat={})", kind, period_ticks, repeating);
        self.slots[kind.index()] = Some(Timer {
            period_ticks,
            remaining_ticks: period_ticks,
            repeating,
        });
    }

    /// Disarm a timer. It will not fire again, not even later in the current tick.
    pub fn cancel(&mut self, kind: TimerKind) {
        if self.slots[kind.index()].take().is_some() {
            log::trace!("cancel {:?}", kind);
        }
    }

    pub fn cancel_all(&mut self) {
        for kind in TimerKind::ALL {
            self.cancel(kind);
        }
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn any_active(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    pub fn get(&self, kind: TimerKind) -> Option<&Timer> {
        self.slots[kind.index()].as_ref()
    }

    /// Advance one timer by a single tick. Returns true if it fired.
    ///
    /// Call once per kind per tick, in [`TimerKind::ALL`] order, and run the
    /// handler before visiting the next kind; a handler that cancels a later
    /// kind therefore suppresses it for this tick.
    pub fn step(&mut self, kind: TimerKind) -> bool {
        let slot = &mut self.slots[kind.index()];
        let Some(timer) = slot.as_mut() else {
            return false;
        };
        timer.remaining_ticks = timer.remaining_ticks.saturating_sub(1);
        if timer.remaining_ticks > 0 {
            return false;
        }
        if timer.repeating {
            timer.remaining_ticks = timer.period_ticks;
        } else {
            *slot = None;
        }
        log::trace!("fire {:?}", kind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(timers: &mut Timers, kind: TimerKind, ticks: u32) -> u32 {
        (0..ticks).filter(|_| timers.step(kind)).count() as u32
    }

    #[test]
    fn test_repeating_fires_every_period() {
        let mut timers = Timers::new();
        timers.repeat(TimerKind::SpawnCycle, 300);
        assert_eq!(run(&mut timers, TimerKind::SpawnCycle, 299), 0);
        assert!(timers.step(TimerKind::SpawnCycle));
        assert_eq!(run(&mut timers, TimerKind::SpawnCycle, 900), 3);
        assert!(timers.is_active(TimerKind::SpawnCycle));
    }

    #[test]
    fn test_one_shot_disarms() {
        let mut timers = Timers::new();
        timers.once(TimerKind::Feedback, 2);
        assert!(!timers.step(TimerKind::Feedback));
        assert!(timers.step(TimerKind::Feedback));
        assert!(!timers.is_active(TimerKind::Feedback));
        assert_eq!(run(&mut timers, TimerKind::Feedback, 10), 0);
    }

    #[test]
    fn test_cancel_stops_all_ticks() {
        let mut timers = Timers::new();
        timers.repeat(TimerKind::Countdown, 60);
        run(&mut timers, TimerKind::Countdown, 59);
        timers.cancel(TimerKind::Countdown);
        assert_eq!(run(&mut timers, TimerKind::Countdown, 1000), 0);
    }

    #[test]
    fn test_cancel_from_earlier_handler_wins_the_tick() {
        let mut timers = Timers::new();
        timers.repeat(TimerKind::CollisionPoll, 1);
        timers.repeat(TimerKind::Countdown, 3);
        timers.repeat(TimerKind::SpawnCycle, 3);
        for _ in 0..2 {
            for kind in TimerKind::ALL {
                timers.step(kind);
            }
        }

        // Third tick: both are due, but the poll handler stops them first
        let mut fired = Vec::new();
        for kind in TimerKind::ALL {
            if timers.step(kind) {
                fired.push(kind);
                if kind == TimerKind::CollisionPoll {
                    timers.cancel(TimerKind::Countdown);
                    timers.cancel(TimerKind::SpawnCycle);
                }
            }
        }
        assert_eq!(fired, vec![TimerKind::CollisionPoll]);
    }

    #[test]
    fn test_rearm_restarts_period() {
        let mut timers = Timers::new();
        timers.repeat(TimerKind::SpawnCycle, 10);
        run(&mut timers, TimerKind::SpawnCycle, 9);
        timers.repeat(TimerKind::SpawnCycle, 10);
        assert!(!timers.step(TimerKind::SpawnCycle));
        assert_eq!(timers.get(TimerKind::SpawnCycle).map(|t| t.remaining_ticks), Some(9));
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::new();
        for kind in TimerKind::ALL {
            timers.repeat(kind, 1);
        }
        assert!(timers.any_active());
        timers.cancel_all();
        assert!(!timers.any_active());
        for kind in TimerKind::ALL {
            assert!(!timers.step(kind));
        }
    }

    #[test]
    fn test_zero_period_clamped() {
        let mut timers = Timers::new();
        timers.repeat(TimerKind::CollisionPoll, 0);
        assert!(timers.step(TimerKind::CollisionPoll));
        assert!(timers.step(TimerKind::CollisionPoll));
    }
}
