//! Footstep noise emission.
//!
//! Turns a target's gait into periodic [`NoiseEvent`]s. The emitter only
//! produces events; delivering them to nearby agents is up to the host.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::noise::NoiseEvent;
use crate::target::Gait;

/// Footstep loudness and cadence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootstepConfig {
    /// Volume of a walking step
    pub walk_volume: f32,
    /// Volume of a sprinting step
    pub sprint_volume: f32,
    /// Volume of a crouched step
    pub crouch_volume: f32,
    /// Seconds between walking steps
    pub step_interval: f32,
    /// Interval multiplier while crouched
    pub crouch_interval_factor: f32,
    /// Interval multiplier while sprinting
    pub sprint_interval_factor: f32,
}

impl Default for FootstepConfig {
    fn default() -> Self {
        Self {
            walk_volume: 5.0,
            sprint_volume: 10.0,
            crouch_volume: 1.5,
            step_interval: 0.5,
            crouch_interval_factor: 1.5,
            sprint_interval_factor: 0.75,
        }
    }
}

impl FootstepConfig {
    /// Volume for `gait`, or `None` when standing still.
    #[must_use]
    pub fn volume(&self, gait: Gait) -> Option<f32> {
        match gait {
            Gait::Idle => None,
            Gait::Walking => Some(self.walk_volume),
            Gait::Sprinting => Some(self.sprint_volume),
            Gait::Crouching => Some(self.crouch_volume),
        }
    }

    /// Seconds between steps for `gait`.
    #[must_use]
    pub fn interval(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Crouching => self.step_interval * self.crouch_interval_factor,
            Gait::Sprinting => self.step_interval * self.sprint_interval_factor,
            Gait::Idle | Gait::Walking => self.step_interval,
        }
    }
}

/// Emits a noise every step interval while the target moves.
#[derive(Debug, Clone, Default)]
pub struct FootstepEmitter {
    config: FootstepConfig,
    timer: f32,
}

impl FootstepEmitter {
    /// Creates an emitter. The first step sounds as soon as movement starts.
    #[must_use]
    pub fn new(config: FootstepConfig) -> Self {
        Self { config, timer: 0.0 }
    }

    /// Advances the step clock and returns the step sounded this tick, if any.
    pub fn update(&mut self, dt: f32, position: Vec3, gait: Gait) -> Option<NoiseEvent> {
        let Some(volume) = self.config.volume(gait) else {
            self.timer = 0.0;
            return None;
        };

        if dt.is_finite() && dt > 0.0 {
            self.timer -= dt;
        }
        if self.timer > 0.0 {
            return None;
        }
        self.timer = self.config.interval(gait);
        Some(NoiseEvent::new(position, volume))
    }

    /// The emitter's settings.
    #[must_use]
    pub const fn config(&self) -> &FootstepConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_silent() {
        let mut emitter = FootstepEmitter::default();
        for _ in 0..10 {
            assert!(emitter.update(0.1, Vec3::ZERO, Gait::Idle).is_none());
        }
    }

    #[test]
    fn test_walking_cadence() {
        let mut emitter = FootstepEmitter::default();
        let steps = (0..16)
            .filter_map(|_| emitter.update(0.125, Vec3::ZERO, Gait::Walking))
            .count();
        // Immediate first step, then one every 0.5s over 2s
        assert_eq!(steps, 4);
    }

    #[test]
    fn test_gait_volumes() {
        let mut emitter = FootstepEmitter::default();
        let step = emitter.update(0.1, Vec3::X, Gait::Sprinting).expect("first step");
        assert_eq!(step.volume, 10.0);
        assert_eq!(step.source_position, Vec3::X);

        let mut emitter = FootstepEmitter::default();
        let step = emitter.update(0.1, Vec3::X, Gait::Crouching).expect("first step");
        assert_eq!(step.volume, 1.5);
    }

    #[test]
    fn test_crouch_is_slower_than_sprint() {
        let config = FootstepConfig::default();
        assert!(config.interval(Gait::Crouching) > config.interval(Gait::Walking));
        assert!(config.interval(Gait::Sprinting) < config.interval(Gait::Walking));
    }

    #[test]
    fn test_stopping_resets_cadence() {
        let mut emitter = FootstepEmitter::default();
        assert!(emitter.update(0.1, Vec3::ZERO, Gait::Walking).is_some());
        assert!(emitter.update(0.1, Vec3::ZERO, Gait::Walking).is_none());
        assert!(emitter.update(0.1, Vec3::ZERO, Gait::Idle).is_none());
        assert!(emitter.update(0.1, Vec3::ZERO, Gait::Walking).is_some());
    }
}
