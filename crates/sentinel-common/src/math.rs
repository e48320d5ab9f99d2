//! Ground-plane math helpers on top of `glam`.
//!
//! Conventions: `+Y` is up, yaw is measured around `+Y`, and a yaw of zero
//! faces `+Z`. Positive yaw turns `+Z` toward `+X`.

pub use glam::{Quat, Vec3};

use std::f32::consts::{PI, TAU};

/// Lengths below this are treated as zero.
pub const EPSILON: f32 = 1e-6;

/// Projects a vector onto the ground plane.
#[must_use]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Unit vector from `from` toward `to`, or zero when the points coincide.
#[must_use]
pub fn direction_to(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).normalize_or_zero()
}

/// Unsigned angle between two vectors in radians.
///
/// Returns `None` when either vector has no length.
#[must_use]
pub fn angle_between(a: Vec3, b: Vec3) -> Option<f32> {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom < EPSILON || !denom.is_finite() {
        return None;
    }
    Some((a.dot(b) / denom).clamp(-1.0, 1.0).acos())
}

/// Yaw of a vector in radians, in `(-PI, PI]`.
#[must_use]
pub fn yaw_of(v: Vec3) -> f32 {
    v.x.atan2(v.z)
}

/// Wraps an angle into `[-PI, PI]`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Signed yaw from `from` to `to`, in `[-PI, PI]`.
#[must_use]
pub fn signed_yaw_delta(from: Vec3, to: Vec3) -> f32 {
    wrap_angle(yaw_of(to) - yaw_of(from))
}

/// Rotates a vector around the up axis.
#[must_use]
pub fn rotate_about_y(v: Vec3, radians: f32) -> Vec3 {
    Quat::from_rotation_y(radians) * v
}

/// Turns `current` toward `target` on the ground plane by at most
/// `max_radians`, returning a unit heading.
///
/// A zero `target` leaves the heading unchanged; a zero `current` snaps to
/// `target`.
#[must_use]
pub fn rotate_towards(current: Vec3, target: Vec3, max_radians: f32) -> Vec3 {
    let current = horizontal(current).normalize_or_zero();
    let target = horizontal(target).normalize_or_zero();
    if target == Vec3::ZERO {
        return current;
    }
    if current == Vec3::ZERO {
        return target;
    }
    let max = max_radians.max(0.0);
    let delta = signed_yaw_delta(current, target);
    if delta.abs() <= max {
        return target;
    }
    rotate_about_y(current, delta.signum() * max).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_angle_between_zero_vector() {
        assert!(angle_between(Vec3::ZERO, Vec3::Z).is_none());
        let angle = angle_between(Vec3::Z, Vec3::X).unwrap_or_default();
        assert!((angle - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_positive_yaw_turns_toward_x() {
        let turned = rotate_about_y(Vec3::Z, FRAC_PI_2);
        assert!(approx(turned, Vec3::X));
        assert!((yaw_of(Vec3::X) - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_towards_is_bounded() {
        let step = rotate_towards(Vec3::Z, Vec3::X, 0.1);
        let turned = angle_between(Vec3::Z, step).unwrap_or_default();
        assert!((turned - 0.1).abs() < 1e-4);

        // Within reach: snaps onto the target
        assert!(approx(rotate_towards(Vec3::Z, Vec3::X, 2.0), Vec3::X));
    }

    #[test]
    fn test_rotate_towards_takes_short_way() {
        let start = rotate_about_y(Vec3::Z, 3.0);
        let goal = rotate_about_y(Vec3::Z, -3.0);
        let step = rotate_towards(start, goal, 0.1);
        // Crossing the +-PI seam is shorter than sweeping through zero
        assert!(angle_between(step, goal).unwrap_or_default() < 0.2);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-4 || (wrap_angle(3.0 * PI) + PI).abs() < 1e-4);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(-TAU + 0.5) - 0.5).abs() < 1e-5);
    }

    mod props {
        use crate::math::{angle_between, rotate_about_y, rotate_towards, wrap_angle};
        use glam::Vec3;
        use proptest::prelude::*;
        use std::f32::consts::PI;

        proptest! {
            #[test]
            fn wrapped_angles_stay_in_range(angle in -100.0f32..100.0) {
                let wrapped = wrap_angle(angle);
                prop_assert!(wrapped >= -PI - 1e-4 && wrapped <= PI + 1e-4);
                prop_assert!((wrapped.sin() - angle.sin()).abs() < 1e-3);
            }

            #[test]
            fn rotate_towards_never_overshoots(
                from in -PI..PI,
                to in -PI..PI,
                max in 0.0f32..1.0,
            ) {
                let current = rotate_about_y(Vec3::Z, from);
                let step = rotate_towards(current, rotate_about_y(Vec3::Z, to), max);
                let turned = angle_between(current, step).unwrap_or_default();
                prop_assert!(turned <= max + 1e-3);
                prop_assert!((step.length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
