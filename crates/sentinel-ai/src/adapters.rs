//! Interfaces to the navigation and animation systems.
//!
//! The core never moves or animates the NPC itself. It issues requests through
//! these traits, and the host engine decides how they are carried out.

use glam::Vec3;
use sentinel_common::{horizontal, EPSILON};

/// Animator parameter names the state machine drives.
pub mod params {
    /// Bool: the NPC is walking.
    pub const IS_WALKING: &str = "isWalking";
    /// Bool: the NPC is running.
    pub const IS_RUNNING: &str = "isRunning";
    /// Trigger: play the suspicious reaction.
    pub const IS_SUSPICIOUS: &str = "isSuspicious";
    /// Trigger: play the attack swing.
    pub const ATTACK: &str = "Attack";
    /// Float: current movement speed.
    pub const SPEED: &str = "speed";
}

/// Movement service owning the NPC's pose.
///
/// The adapter is the only writer of position and orientation. The core
/// reads the pose once per tick and asks for rotations through [`face`].
///
/// [`face`]: Navigator::face
pub trait Navigator {
    /// Requests movement toward a world position.
    fn set_destination(&mut self, position: Vec3);
    /// Halts movement in place.
    fn stop(&mut self);
    /// Sets the movement speed in world units per second.
    fn set_speed(&mut self, speed: f32);
    /// Distance left along the current path.
    fn remaining_distance(&self) -> f32;
    /// Whether a path request is still being computed.
    fn is_path_pending(&self) -> bool;
    /// Current world position.
    fn position(&self) -> Vec3;
    /// Current facing direction.
    fn forward(&self) -> Vec3;
    /// Turns the NPC to face a direction.
    fn face(&mut self, direction: Vec3);
}

/// Animation parameter sink.
pub trait Animator {
    /// Sets a float parameter.
    fn set_float(&mut self, parameter: &str, value: f32);
    /// Sets a bool parameter.
    fn set_bool(&mut self, parameter: &str, value: bool);
    /// Fires a one-shot trigger.
    fn trigger_once(&mut self, parameter: &str);
}

/// Animator that discards every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn set_float(&mut self, _parameter: &str, _value: f32) {}
    fn set_bool(&mut self, _parameter: &str, _value: bool) {}
    fn trigger_once(&mut self, _parameter: &str) {}
}

/// Navigator that walks in a straight line with no obstacles.
///
/// Useful for headless simulation and tests. Call [`advance`] once per frame
/// to move the NPC.
///
/// [`advance`]: KinematicNavigator::advance
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicNavigator {
    position: Vec3,
    forward: Vec3,
    destination: Option<Vec3>,
    speed: f32,
}

impl KinematicNavigator {
    /// Creates a navigator standing at `position` facing `forward`.
    #[must_use]
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: horizontal(forward).normalize_or_zero(),
            destination: None,
            speed: 0.0,
        }
    }

    /// Current destination, if moving.
    #[must_use]
    pub const fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Current speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Teleports the NPC.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Moves toward the destination for `dt` seconds, turning to face the
    /// direction of travel.
    pub fn advance(&mut self, dt: f32) {
        let Some(destination) = self.destination else {
            return;
        };
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let offset = destination - self.position;
        let distance = offset.length();
        if distance < EPSILON {
            return;
        }
        let step = (self.speed * dt).min(distance);
        let direction = offset / distance;
        self.position += direction * step;

        let heading = horizontal(direction).normalize_or_zero();
        if heading != Vec3::ZERO {
            self.forward = heading;
        }
    }
}

impl Navigator for KinematicNavigator {
    fn set_destination(&mut self, position: Vec3) {
        self.destination = Some(position);
    }

    fn stop(&mut self) {
        self.destination = None;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |destination| destination.distance(self.position))
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn face(&mut self, direction: Vec3) {
        let heading = horizontal(direction).normalize_or_zero();
        if heading != Vec3::ZERO {
            self.forward = heading;
        }
    }
}

/// One signal received by a [`RecordingAnimator`].
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorSignal {
    /// Float parameter set
    Float(String, f32),
    /// Bool parameter set
    Bool(String, bool),
    /// Trigger fired
    Trigger(String),
}

/// Animator that keeps every signal it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    signals: Vec<AnimatorSignal>,
}

impl RecordingAnimator {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every signal in arrival order.
    #[must_use]
    pub fn signals(&self) -> &[AnimatorSignal] {
        &self.signals
    }

    /// Number of times `parameter` was triggered.
    #[must_use]
    pub fn trigger_count(&self, parameter: &str) -> usize {
        self.signals
            .iter()
            .filter(|signal| matches!(signal, AnimatorSignal::Trigger(name) if name == parameter))
            .count()
    }

    /// Latest value written to a bool parameter.
    #[must_use]
    pub fn bool_value(&self, parameter: &str) -> Option<bool> {
        self.signals.iter().rev().find_map(|signal| match signal {
            AnimatorSignal::Bool(name, value) if name == parameter => Some(*value),
            _ => None,
        })
    }

    /// Drops recorded signals.
    pub fn clear(&mut self) {
        self.signals.clear();
    }
}

impl Animator for RecordingAnimator {
    fn set_float(&mut self, parameter: &str, value: f32) {
        self.signals
            .push(AnimatorSignal::Float(parameter.to_string(), value));
    }

    fn set_bool(&mut self, parameter: &str, value: bool) {
        self.signals
            .push(AnimatorSignal::Bool(parameter.to_string(), value));
    }

    fn trigger_once(&mut self, parameter: &str) {
        self.signals
            .push(AnimatorSignal::Trigger(parameter.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinematic_navigator_moves_and_arrives() {
        let mut nav = KinematicNavigator::new(Vec3::ZERO, Vec3::Z);
        nav.set_speed(2.0);
        nav.set_destination(Vec3::new(4.0, 0.0, 0.0));
        nav.advance(1.0);
        assert!((nav.position().x - 2.0).abs() < 1e-5);
        assert!((nav.forward() - Vec3::X).length() < 1e-5);
        assert!((nav.remaining_distance() - 2.0).abs() < 1e-5);

        nav.advance(5.0);
        assert!(nav.remaining_distance() < 1e-5);

        nav.stop();
        assert_eq!(nav.destination(), None);
        assert_eq!(nav.remaining_distance(), 0.0);
    }

    #[test]
    fn test_face_ignores_zero_direction() {
        let mut nav = KinematicNavigator::new(Vec3::ZERO, Vec3::Z);
        nav.face(Vec3::ZERO);
        assert_eq!(nav.forward(), Vec3::Z);
        nav.face(Vec3::new(0.0, 3.0, -2.0));
        assert!((nav.forward() + Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_teleport_keeps_destination() {
        let mut nav = KinematicNavigator::new(Vec3::ZERO, Vec3::Z);
        nav.set_destination(Vec3::new(0.0, 0.0, 10.0));
        nav.set_position(Vec3::new(0.0, 0.0, 7.0));
        assert!((nav.remaining_distance() - 3.0).abs() < 1e-5);
        assert!(!nav.is_path_pending());

        // Signals to a null animator go nowhere
        let mut animator = NullAnimator;
        animator.set_float(params::SPEED, nav.speed());
        animator.trigger_once(params::ATTACK);
    }

    #[test]
    fn test_recording_animator() {
        let mut animator = RecordingAnimator::new();
        animator.set_bool(params::IS_WALKING, true);
        animator.trigger_once(params::ATTACK);
        animator.set_bool(params::IS_WALKING, false);
        animator.trigger_once(params::ATTACK);
        assert_eq!(animator.trigger_count(params::ATTACK), 2);
        assert_eq!(animator.bool_value(params::IS_WALKING), Some(false));
        assert_eq!(animator.bool_value(params::IS_RUNNING), None);
    }
}
