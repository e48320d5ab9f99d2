//! Target motion estimation and pursuit aiming.
//!
//! Velocity comes from a single finite difference between the last two
//! sightings. Nothing is smoothed here; hosts that want a steadier estimate
//! average outside.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Velocity from two samples `dt` seconds apart.
///
/// Returns zero when `dt` is zero, negative or not finite.
#[must_use]
pub fn estimate_velocity(prev: Vec3, curr: Vec3, dt: f32) -> Vec3 {
    if !dt.is_finite() || dt <= 0.0 {
        return Vec3::ZERO;
    }
    let velocity = (curr - prev) / dt;
    if velocity.is_finite() {
        velocity
    } else {
        Vec3::ZERO
    }
}

/// Where a target at `curr` moving at `velocity` will be after `lead_time`.
#[must_use]
pub fn predict_position(curr: Vec3, velocity: Vec3, lead_time: f32) -> Vec3 {
    curr + velocity * lead_time
}

/// Earliest time at which a pursuer moving at `pursuer_speed` can meet a
/// target moving at constant `target_velocity`.
///
/// Solves `|target + v*t - pursuer| = speed * t` for the smallest
/// non-negative `t`. Returns `None` when the target cannot be caught.
#[must_use]
pub fn intercept_time(
    pursuer: Vec3,
    pursuer_speed: f32,
    target: Vec3,
    target_velocity: Vec3,
) -> Option<f32> {
    let offset = target - pursuer;
    let a = target_velocity.length_squared() - pursuer_speed * pursuer_speed;
    let b = 2.0 * offset.dot(target_velocity);
    let c = offset.length_squared();

    if c <= f32::EPSILON {
        return Some(0.0);
    }

    if a.abs() < 1e-6 {
        // Equal speeds: the quadratic degenerates to b*t + c = 0
        if b >= 0.0 {
            return None;
        }
        let t = -c / b;
        return (t >= 0.0 && t.is_finite()).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    [t1, t2]
        .into_iter()
        .filter(|t| *t >= 0.0 && t.is_finite())
        .reduce(f32::min)
}

/// How the pursuer chooses its destination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PursuitAim {
    /// Head for where the target is now
    Current,
    /// Head for where the target will be after a fixed lead time
    Lead {
        /// Seconds to predict ahead
        lead_time: f32,
    },
    /// Head for the computed meeting point, predicting at most `max_lead`
    Intercept {
        /// Upper bound on the prediction horizon in seconds
        max_lead: f32,
    },
}

impl Default for PursuitAim {
    fn default() -> Self {
        Self::Lead { lead_time: 0.5 }
    }
}

/// Running velocity estimate for the pursued target.
///
/// Holds only the most recent sighting. Forgetting the target drops the
/// sample so a later sighting does not produce a bogus jump.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionTracker {
    last_sample: Option<Vec3>,
    velocity: Vec3,
}

impl MotionTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_sample: None,
            velocity: Vec3::ZERO,
        }
    }

    /// Records a sighting taken `dt` seconds after the previous one.
    pub fn observe(&mut self, position: Vec3, dt: f32) {
        self.velocity = match self.last_sample {
            Some(prev) => estimate_velocity(prev, position, dt),
            None => Vec3::ZERO,
        };
        self.last_sample = Some(position);
    }

    /// Drops the sample history.
    pub fn forget(&mut self) {
        self.last_sample = None;
        self.velocity = Vec3::ZERO;
    }

    /// Latest velocity estimate.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Last recorded position, if any.
    #[must_use]
    pub const fn last_position(&self) -> Option<Vec3> {
        self.last_sample
    }

    /// Position predicted `lead_time` seconds ahead of the last sample.
    #[must_use]
    pub fn lead_point(&self, lead_time: f32) -> Option<Vec3> {
        self.last_sample
            .map(|position| predict_position(position, self.velocity, lead_time))
    }

    /// Destination for a pursuer at `pursuer` moving at `speed`.
    #[must_use]
    pub fn aim_point(&self, aim: PursuitAim, pursuer: Vec3, speed: f32) -> Option<Vec3> {
        let position = self.last_sample?;
        let point = match aim {
            PursuitAim::Current => position,
            PursuitAim::Lead { lead_time } => {
                predict_position(position, self.velocity, lead_time.max(0.0))
            },
            PursuitAim::Intercept { max_lead } => {
                let max_lead = max_lead.max(0.0);
                let t = intercept_time(pursuer, speed, position, self.velocity)
                    .map_or(max_lead, |t| t.min(max_lead));
                predict_position(position, self.velocity, t)
            },
        };
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_zero_dt_gives_zero_velocity() {
        let v = estimate_velocity(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), 0.0);
        assert_eq!(v, Vec3::ZERO);
        assert_eq!(estimate_velocity(Vec3::ZERO, Vec3::X, -0.1), Vec3::ZERO);
        assert_eq!(estimate_velocity(Vec3::ZERO, Vec3::X, f32::NAN), Vec3::ZERO);
    }

    #[test]
    fn test_finite_difference() {
        let v = estimate_velocity(Vec3::new(1.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 3.0), 0.5);
        assert!(approx(v, Vec3::new(2.0, 0.0, 4.0)));
    }

    #[test]
    fn test_predict_position() {
        let p = predict_position(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0), 1.5);
        assert!(approx(p, Vec3::new(1.0, 0.0, 3.0)));
    }

    #[test]
    fn test_intercept_head_on() {
        // Target walks straight at a stationary-start pursuer
        let t = intercept_time(Vec3::ZERO, 3.0, Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -2.0));
        let t = t.expect("closing target is catchable");
        assert!((t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_intercept_crossing() {
        let target = Vec3::new(0.0, 0.0, 10.0);
        let velocity = Vec3::new(2.0, 0.0, 0.0);
        let t = intercept_time(Vec3::ZERO, 4.0, target, velocity).expect("faster pursuer");
        let meet = predict_position(target, velocity, t);
        assert!((meet.length() - 4.0 * t).abs() < 1e-3);
    }

    #[test]
    fn test_intercept_impossible() {
        // Target runs away faster than the pursuer
        let t = intercept_time(Vec3::ZERO, 1.0, Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 3.0));
        assert!(t.is_none());
    }

    #[test]
    fn test_tracker_first_sample_has_no_velocity() {
        let mut tracker = MotionTracker::new();
        tracker.observe(Vec3::new(5.0, 0.0, 0.0), 0.1);
        assert_eq!(tracker.velocity(), Vec3::ZERO);
        tracker.observe(Vec3::new(5.5, 0.0, 0.0), 0.1);
        assert!(approx(tracker.velocity(), Vec3::new(5.0, 0.0, 0.0)));

        tracker.forget();
        assert!(tracker.last_position().is_none());
        tracker.observe(Vec3::new(20.0, 0.0, 0.0), 0.1);
        assert_eq!(tracker.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_aim_modes() {
        let mut tracker = MotionTracker::new();
        assert!(tracker.aim_point(PursuitAim::Current, Vec3::ZERO, 4.0).is_none());

        tracker.observe(Vec3::new(0.0, 0.0, 10.0), 0.5);
        tracker.observe(Vec3::new(1.0, 0.0, 10.0), 0.5);

        let current = tracker.aim_point(PursuitAim::Current, Vec3::ZERO, 4.0);
        assert_eq!(current, Some(Vec3::new(1.0, 0.0, 10.0)));

        let lead = tracker.aim_point(PursuitAim::Lead { lead_time: 1.0 }, Vec3::ZERO, 4.0);
        assert!(approx(lead.unwrap_or_default(), Vec3::new(3.0, 0.0, 10.0)));

        let capped = tracker.aim_point(PursuitAim::Intercept { max_lead: 0.25 }, Vec3::ZERO, 4.0);
        assert!(approx(capped.unwrap_or_default(), Vec3::new(1.5, 0.0, 10.0)));
    }
}
