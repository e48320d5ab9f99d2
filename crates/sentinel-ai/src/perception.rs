//! Vision probe: distance, view cone and line of sight.
//!
//! The probe is a pure function. Contextual scaling of the cone (a crouching
//! target, darkness) happens before it is called, see [`ViewCone::scaled`].

use glam::Vec3;
use sentinel_common::{angle_between, EPSILON};
use serde::{Deserialize, Serialize};

/// Line-of-sight query against level geometry.
pub trait OcclusionTest {
    /// Returns true if anything blocks the segment between the two points.
    fn is_occluded(&self, from: Vec3, to: Vec3) -> bool;
}

impl<F> OcclusionTest for F
where
    F: Fn(Vec3, Vec3) -> bool,
{
    fn is_occluded(&self, from: Vec3, to: Vec3) -> bool {
        self(from, to)
    }
}

/// Occlusion test for open ground: nothing ever blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearLineOfSight;

impl OcclusionTest for ClearLineOfSight {
    fn is_occluded(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }
}

/// Vision cone parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewCone {
    /// Maximum sight distance (exclusive)
    pub distance: f32,
    /// Half-angle of the cone in radians (exclusive)
    pub half_angle: f32,
}

impl ViewCone {
    /// Creates a cone from a distance and a half-angle in radians.
    #[must_use]
    pub const fn new(distance: f32, half_angle: f32) -> Self {
        Self {
            distance,
            half_angle,
        }
    }

    /// Creates a cone from a distance and a half-angle in degrees.
    #[must_use]
    pub fn from_degrees(distance: f32, half_angle_degrees: f32) -> Self {
        Self::new(distance, half_angle_degrees.to_radians())
    }

    /// Returns a copy with distance and angle multiplied by the given factors.
    #[must_use]
    pub fn scaled(self, distance_factor: f32, angle_factor: f32) -> Self {
        Self::new(
            self.distance * distance_factor,
            self.half_angle * angle_factor,
        )
    }
}

/// A single visibility question, built fresh each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptionQuery {
    /// Eye position of the observer
    pub observer_position: Vec3,
    /// Facing direction of the observer
    pub observer_forward: Vec3,
    /// Position being looked for
    pub target_position: Vec3,
    /// Cone to test against
    pub cone: ViewCone,
}

impl PerceptionQuery {
    /// Runs the probe.
    pub fn evaluate<O: OcclusionTest + ?Sized>(&self, occlusion: &O) -> bool {
        can_perceive(
            self.observer_position,
            self.observer_forward,
            self.target_position,
            self.cone.distance,
            self.cone.half_angle,
            occlusion,
        )
    }
}

/// Answers whether `target_position` is visible from the observer.
///
/// All three tests must pass:
/// - distance strictly below `view_distance`
/// - angle from `observer_forward` strictly below `view_half_angle` (radians)
/// - `occlusion` reports nothing between the two points
///
/// A target standing exactly on the observer counts as dead ahead. An
/// observer without a facing direction cannot see anything else. NaN
/// parameters never pass.
pub fn can_perceive<O: OcclusionTest + ?Sized>(
    observer_position: Vec3,
    observer_forward: Vec3,
    target_position: Vec3,
    view_distance: f32,
    view_half_angle: f32,
    occlusion: &O,
) -> bool {
    let to_target = target_position - observer_position;
    let distance = to_target.length();
    let in_range = distance < view_distance;
    if !in_range {
        return false;
    }

    let angle = if distance < EPSILON {
        0.0
    } else {
        match angle_between(observer_forward, to_target) {
            Some(angle) => angle,
            None => return false,
        }
    };
    let in_cone = angle < view_half_angle;
    if !in_cone {
        return false;
    }

    !occlusion.is_occluded(observer_position, target_position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(target: Vec3, cone: ViewCone) -> bool {
        PerceptionQuery {
            observer_position: Vec3::ZERO,
            observer_forward: Vec3::Z,
            target_position: target,
            cone,
        }
        .evaluate(&ClearLineOfSight)
    }

    #[test]
    fn test_visible_inside_cone_and_range() {
        let cone = ViewCone::from_degrees(8.0, 45.0);
        assert!(probe(Vec3::new(0.0, 0.0, 5.0), cone));
        assert!(!probe(Vec3::new(0.0, 0.0, 9.0), cone));
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        let cone = ViewCone::from_degrees(8.0, 45.0);
        assert!(!probe(Vec3::new(0.0, 0.0, 8.0), cone));
        assert!(probe(Vec3::new(0.0, 0.0, 7.99), cone));
    }

    #[test]
    fn test_behind_observer_not_visible() {
        let cone = ViewCone::from_degrees(8.0, 45.0);
        assert!(!probe(Vec3::new(0.0, 0.0, -3.0), cone));
        assert!(!probe(Vec3::new(4.0, 0.0, 0.5), cone));
    }

    #[test]
    fn test_occlusion_blocks_sight() {
        let wall = |_from: Vec3, _to: Vec3| true;
        assert!(!can_perceive(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::new(0.0, 0.0, 2.0),
            8.0,
            1.0,
            &wall,
        ));
    }

    #[test]
    fn test_occlusion_receives_endpoints() {
        let expected_to = Vec3::new(1.0, 0.0, 4.0);
        let check = move |from: Vec3, to: Vec3| {
            assert_eq!(from, Vec3::ZERO);
            assert_eq!(to, expected_to);
            false
        };
        assert!(can_perceive(Vec3::ZERO, Vec3::Z, expected_to, 8.0, 1.0, &check));
    }

    #[test]
    fn test_coincident_target_is_visible() {
        assert!(probe(Vec3::ZERO, ViewCone::from_degrees(8.0, 45.0)));
    }

    #[test]
    fn test_degenerate_inputs_never_pass() {
        let target = Vec3::new(0.0, 0.0, 2.0);
        assert!(!can_perceive(Vec3::ZERO, Vec3::ZERO, target, 8.0, 1.0, &ClearLineOfSight));
        assert!(!can_perceive(Vec3::ZERO, Vec3::Z, target, -1.0, 1.0, &ClearLineOfSight));
        assert!(!can_perceive(Vec3::ZERO, Vec3::Z, target, f32::NAN, 1.0, &ClearLineOfSight));
        assert!(!can_perceive(Vec3::ZERO, Vec3::Z, target, 8.0, f32::NAN, &ClearLineOfSight));
    }

    #[test]
    fn test_crouch_scaling_shrinks_cone() {
        let cone = ViewCone::from_degrees(10.0, 60.0);
        let crouched = cone.scaled(0.5, 0.7);
        let target = Vec3::new(0.0, 0.0, 7.0);
        assert!(probe(target, cone));
        assert!(!probe(target, crouched));
        assert!((crouched.half_angle - 42.0_f32.to_radians()).abs() < 1e-5);
    }
}
