//! Ball entity and the single ball slot

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Unique ball identifier (never reused within a process)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// A launched ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub start: Vec3,
    pub target: Vec3,
    /// Units per second
    pub speed: f32,
    pub active: bool,
    /// Collision-poll ticks spent in flight (pauses don't count)
    #[serde(default)]
    pub flight_ticks: u32,
}

impl Ball {
    pub fn new(id: BallId, start: Vec3, target: Vec3, speed: f32) -> Self {
        Self {
            id,
            start,
            target,
            speed,
            active: true,
            flight_ticks: 0,
        }
    }

    fn retired(mut self) -> Self {
        self.active = false;
        self
    }

    /// Straight-line distance from start to target
    pub fn flight_distance(&self) -> f32 {
        self.start.distance(self.target)
    }

    /// Expected travel time in seconds
    pub fn flight_duration(&self) -> f32 {
        if self.speed <= 0.0 {
            return f32::INFINITY;
        }
        self.flight_distance() / self.speed
    }
}

/// Holds at most one ball. A new spawn discards whatever was there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallSlot {
    ball: Option<Ball>,
    next_id: u32,
}

impl Default for BallSlot {
    fn default() -> Self {
        Self {
            ball: None,
            next_id: 1,
        }
    }
}

impl BallSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot with a fresh ball.
    ///
    /// Returns the new id and the ball that was discarded, if any, so the
    /// caller can decide what the supersession means.
    pub fn spawn(&mut self, start: Vec3, target: Vec3, speed: f32) -> (BallId, Option<Ball>) {
        let id = BallId(self.next_id);
        self.next_id += 1;
        let previous = self.ball.replace(Ball::new(id, start, target, speed));
        (id, previous.map(Ball::retired))
    }

    /// Remove the ball if it matches `id`
    pub fn remove(&mut self, id: BallId) -> Option<Ball> {
        if self.ball.as_ref().is_some_and(|b| b.id == id) {
            self.clear()
        } else {
            None
        }
    }

    pub fn clear(&mut self) -> Option<Ball> {
        self.ball.take().map(Ball::retired)
    }

    pub fn current(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Ball> {
        self.ball.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.ball.is_none()
    }

    /// 0 or 1
    pub fn len(&self) -> usize {
        usize::from(self.ball.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_replaces_existing() {
        let mut slot = BallSlot::new();
        let (first, prev) = slot.spawn(Vec3::ZERO, Vec3::Z, 1.0);
        assert!(prev.is_none());
        let (second, prev) = slot.spawn(Vec3::ZERO, Vec3::X, 2.0);
        assert_eq!(prev.map(|b| b.id), Some(first));
        assert_ne!(first, second);
        assert_eq!(slot.len(), 1);
        assert_eq!(slot.current().map(|b| b.id), Some(second));
    }

    #[test]
    fn test_remove_is_noop_for_unknown_id() {
        let mut slot = BallSlot::new();
        let (id, _) = slot.spawn(Vec3::ZERO, Vec3::Z, 1.0);
        assert!(slot.remove(BallId(id.0 + 100)).is_none());
        assert_eq!(slot.len(), 1);
        let removed = slot.remove(id).expect("present");
        assert!(!removed.active);
        assert!(slot.is_empty());
        assert!(slot.remove(id).is_none());
    }

    #[test]
    fn test_flight_duration() {
        let ball = Ball::new(BallId(1), Vec3::new(0.0, 0.0, -20.0), Vec3::ZERO, 8.0);
        assert!((ball.flight_distance() - 20.0).abs() < 1e-5);
        assert!((ball.flight_duration() - 2.5).abs() < 1e-5);

        let stuck = Ball::new(BallId(2), Vec3::ZERO, Vec3::Z, 0.0);
        assert!(stuck.flight_duration().is_infinite());
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut slot = BallSlot::new();
        let (a, _) = slot.spawn(Vec3::ZERO, Vec3::Z, 1.0);
        slot.clear();
        let (b, _) = slot.spawn(Vec3::ZERO, Vec3::Z, 1.0);
        assert!(b > a);
    }
}
