//! Ball flight as seen by the renderer
//!
//! Only the rendering side knows where an animated ball actually is, so the
//! core asks a [`BallPositionProvider`] every poll tick. [`FlightAnimator`]
//! is the stand-in used by the headless driver and the tests.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallId};

/// What the renderer reports for a ball on a given tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightSample {
    /// Live interpolated position
    InFlight(Vec3),
    /// Flight duration elapsed; the ball reached the goal
    Arrived,
    /// Renderer has nothing for this ball (e.g. model still loading)
    Unavailable,
}

/// Rendering collaborator interface
pub trait BallPositionProvider {
    /// A new ball entered the slot
    fn track(&mut self, _ball: &Ball) {}

    /// Advance the ball's animation by `dt` seconds and report where it is
    fn sample(&mut self, ball: &Ball, dt: f32) -> FlightSample;

    /// The ball left the slot (saved, missed, superseded or cleared)
    fn release(&mut self, _id: BallId) {}
}

/// Animation curve along the flight path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    /// Fast launch, slowing into the goal
    #[default]
    EaseOut,
}

impl Easing {
    /// Map linear progress t ∈ [0, 1] onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Interpolates start → target over the ball's flight duration
#[derive(Debug, Clone, Default)]
pub struct FlightAnimator {
    pub easing: Easing,
    elapsed: HashMap<BallId, f32>,
}

impl FlightAnimator {
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            elapsed: HashMap::new(),
        }
    }

    /// Position at `elapsed` seconds into the flight
    pub fn position_at(&self, ball: &Ball, elapsed: f32) -> Vec3 {
        let duration = ball.flight_duration();
        let t = if duration.is_finite() && duration > 0.0 {
            elapsed / duration
        } else {
            0.0
        };
        ball.start.lerp(ball.target, self.easing.apply(t))
    }

    /// Number of balls currently being animated
    pub fn tracked(&self) -> usize {
        self.elapsed.len()
    }
}

impl BallPositionProvider for FlightAnimator {
    fn track(&mut self, ball: &Ball) {
        self.elapsed.insert(ball.id, 0.0);
    }

    fn sample(&mut self, ball: &Ball, dt: f32) -> FlightSample {
        let Some(elapsed) = self.elapsed.get_mut(&ball.id) else {
            return FlightSample::Unavailable;
        };
        *elapsed += dt;
        let elapsed = *elapsed;
        if elapsed >= ball.flight_duration() {
            FlightSample::Arrived
        } else {
            FlightSample::InFlight(self.position_at(ball, elapsed))
        }
    }

    fn release(&mut self, id: BallId) {
        self.elapsed.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball() -> Ball {
        // 10 units at 10 u/s = 1 second
        Ball::new(BallId(1), Vec3::new(0.0, 1.0, -10.0), Vec3::new(0.0, 1.0, 0.0), 10.0)
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert!(Easing::EaseOut.apply(0.5) > Easing::Linear.apply(0.5));
    }

    #[test]
    fn test_linear_flight_reaches_target() {
        let mut anim = FlightAnimator::new(Easing::Linear);
        let ball = ball();
        anim.track(&ball);

        match anim.sample(&ball, 0.5) {
            FlightSample::InFlight(p) => assert!((p.z + 5.0).abs() < 1e-4),
            other => panic!("expected in flight, got {:?}", other),
        }
        assert_eq!(anim.sample(&ball, 0.6), FlightSample::Arrived);
    }

    #[test]
    fn test_untracked_ball_unavailable() {
        let mut anim = FlightAnimator::default();
        let ball = ball();
        assert_eq!(anim.sample(&ball, 0.1), FlightSample::Unavailable);
        anim.track(&ball);
        anim.release(ball.id);
        assert_eq!(anim.tracked(), 0);
        assert_eq!(anim.sample(&ball, 0.1), FlightSample::Unavailable);
    }
}
