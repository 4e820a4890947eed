//! Hand/ball interception
//!
//! A save happens when a tracked hand comes within the capture radius of the
//! ball's live position. Untracked hands simply can't capture.

use std::sync::{Arc, RwLock};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which hand made contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Check order; the first hand in range wins a tie
    pub const PRIORITY: [Hand; 2] = [Hand::Left, Hand::Right];

    fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }
}

/// Hand sensing collaborator. Must never block.
pub trait HandPositionProvider {
    /// Latest cached sample, or None if the hand isn't tracked
    fn latest_position(&self, hand: Hand) -> Option<Vec3>;
}

/// Latest-sample cache shared between the sensing side and the engine.
///
/// Clones share the same storage: the sensor pushes through one handle, the
/// engine reads through another.
#[derive(Debug, Clone, Default)]
pub struct SharedHands {
    samples: Arc<RwLock<[Option<Vec3>; 2]>>,
}

impl SharedHands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the cached sample for a hand (None = lost tracking)
    pub fn push(&self, hand: Hand, position: Option<Vec3>) {
        if let Ok(mut samples) = self.samples.write() {
            samples[hand.index()] = position;
        }
    }

    pub fn clear(&self) {
        if let Ok(mut samples) = self.samples.write() {
            *samples = [None, None];
        }
    }
}

impl HandPositionProvider for SharedHands {
    fn latest_position(&self, hand: Hand) -> Option<Vec3> {
        // A poisoned lock reads as "untracked" rather than taking the tick loop down
        self.samples.read().ok().and_then(|s| s[hand.index()])
    }
}

/// Result of an interception check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interception {
    pub hand: Hand,
    pub distance: f32,
}

/// Check both hands against the ball, left first.
///
/// Returns the first hand strictly inside `capture_radius`.
pub fn check_interception(
    ball_pos: Vec3,
    hands: &impl HandPositionProvider,
    capture_radius: f32,
) -> Option<Interception> {
    Hand::PRIORITY.into_iter().find_map(|hand| {
        let hand_pos = hands.latest_position(hand)?;
        let distance = hand_pos.distance(ball_pos);
        (distance < capture_radius).then_some(Interception { hand, distance })
    })
}
