//! The player-side capability an agent perceives and pursues.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How the target is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gait {
    /// Standing still
    #[default]
    Idle,
    /// Normal walk
    Walking,
    /// Sprinting
    Sprinting,
    /// Crouched movement
    Crouching,
}

impl Gait {
    /// Whether the posture is lowered.
    #[must_use]
    pub const fn is_crouching(self) -> bool {
        matches!(self, Self::Crouching)
    }
}

/// Anything an agent can look for.
///
/// Handed to the agent each tick; the agent never stores it.
pub trait Target {
    /// Current world position.
    fn position(&self) -> Vec3;

    /// Current gait.
    fn gait(&self) -> Gait {
        Gait::Walking
    }

    /// Whether the target is crouching.
    fn is_crouching(&self) -> bool {
        self.gait().is_crouching()
    }
}

/// A target described by plain values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TargetSnapshot {
    /// World position
    pub position: Vec3,
    /// Movement gait
    pub gait: Gait,
}

impl TargetSnapshot {
    /// Creates a walking target at a position.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            gait: Gait::Walking,
        }
    }

    /// Sets the gait.
    #[must_use]
    pub const fn with_gait(mut self, gait: Gait) -> Self {
        self.gait = gait;
        self
    }
}

impl Target for TargetSnapshot {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn gait(&self) -> Gait {
        self.gait
    }
}
