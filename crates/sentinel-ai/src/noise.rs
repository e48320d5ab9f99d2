//! Noise arbitration.
//!
//! An agent holds at most one noise claim. A new noise only takes over when
//! it is strictly louder (after distance falloff) than the one being
//! investigated, and a chasing agent ignores noise altogether.

use glam::Vec3;
use sentinel_common::{direction_to, EPSILON};
use serde::{Deserialize, Serialize};

use crate::states::StateKind;

/// Distances below this count as this distance, so a noise at the agent's
/// feet has a finite priority that outranks every noise further away.
pub const MIN_HEARING_DISTANCE: f32 = EPSILON;

/// A sound emitted somewhere in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseEvent {
    /// Where the sound came from
    pub source_position: Vec3,
    /// Emitted volume
    pub volume: f32,
}

impl NoiseEvent {
    /// Creates a noise event.
    #[must_use]
    pub const fn new(source_position: Vec3, volume: f32) -> Self {
        Self {
            source_position,
            volume,
        }
    }

    /// Priority as heard from `observer`: volume divided by distance.
    ///
    /// Negative or non-finite volumes score zero and can never win a claim.
    #[must_use]
    pub fn priority_for(&self, observer: Vec3) -> f32 {
        if !self.volume.is_finite() || self.volume <= 0.0 {
            return 0.0;
        }
        let distance = self.source_position.distance(observer);
        let distance = if distance.is_finite() {
            distance.max(MIN_HEARING_DISTANCE)
        } else {
            return 0.0;
        };
        self.volume / distance
    }
}

/// The noise an agent is currently investigating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseClaim {
    /// Priority the claim was won with
    pub priority: f32,
    /// Where the noise came from
    pub source_position: Vec3,
    /// Unit direction from the agent toward the source at claim time
    pub direction: Vec3,
}

/// Why a noise was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Rejection {
    /// The agent is chasing and ignores ambient noise
    Chasing,
    /// The held claim is at least as strong
    Outranked {
        /// Priority of the rejected noise
        offered: f32,
        /// Priority of the held claim
        held: f32,
    },
}

/// Result of offering a noise to an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClaimOutcome {
    /// The noise replaces the held claim
    Accepted(NoiseClaim),
    /// The noise is dropped without effect
    Rejected(Rejection),
}

impl ClaimOutcome {
    /// Whether the noise won.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Decides whether `event` takes over from a claim held at `held_priority`.
pub fn try_claim(
    current_state: StateKind,
    held_priority: f32,
    event: &NoiseEvent,
    observer_position: Vec3,
) -> ClaimOutcome {
    if current_state == StateKind::Chase {
        return ClaimOutcome::Rejected(Rejection::Chasing);
    }

    let offered = event.priority_for(observer_position);
    if offered > held_priority {
        ClaimOutcome::Accepted(NoiseClaim {
            priority: offered,
            source_position: event.source_position,
            direction: direction_to(observer_position, event.source_position),
        })
    } else {
        ClaimOutcome::Rejected(Rejection::Outranked {
            offered,
            held: held_priority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn noise(distance: f32, volume: f32) -> NoiseEvent {
        NoiseEvent::new(Vec3::new(distance, 0.0, 0.0), volume)
    }

    #[test]
    fn test_priority_is_volume_over_distance() {
        assert!((noise(10.0, 20.0).priority_for(Vec3::ZERO) - 2.0).abs() < 1e-6);
        assert!((noise(10.0, 5.0).priority_for(Vec3::ZERO) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_priority_guards() {
        assert_eq!(noise(10.0, -5.0).priority_for(Vec3::ZERO), 0.0);
        assert_eq!(noise(10.0, f32::NAN).priority_for(Vec3::ZERO), 0.0);
        // Right on top of the observer: finite, and louder than anything near
        let underfoot = noise(0.0, 3.0).priority_for(Vec3::ZERO);
        assert!(underfoot.is_finite());
        assert!(underfoot > noise(0.01, 3.0).priority_for(Vec3::ZERO));
    }

    #[test]
    fn test_close_noises_keep_their_order() {
        let near = noise(0.5, 1.0);
        let farther = noise(0.8, 1.5);
        assert!((near.priority_for(Vec3::ZERO) - 2.0).abs() < 1e-5);
        assert!((farther.priority_for(Vec3::ZERO) - 1.875).abs() < 1e-5);

        let ClaimOutcome::Accepted(held) = try_claim(StateKind::Patrol, 0.0, &near, Vec3::ZERO)
        else {
            panic!("first noise should be accepted");
        };
        let second = try_claim(StateKind::Suspicious, held.priority, &farther, Vec3::ZERO);
        assert!(!second.is_accepted());
    }

    #[test]
    fn test_louder_noise_wins() {
        let first = try_claim(StateKind::Patrol, 0.0, &noise(10.0, 20.0), Vec3::ZERO);
        let ClaimOutcome::Accepted(claim) = first else {
            panic!("first noise should be accepted");
        };
        assert!((claim.priority - 2.0).abs() < 1e-6);
        assert_eq!(claim.direction, Vec3::X);

        let second = try_claim(StateKind::Patrol, claim.priority, &noise(10.0, 5.0), Vec3::ZERO);
        assert_eq!(
            second,
            ClaimOutcome::Rejected(Rejection::Outranked {
                offered: 0.5,
                held: 2.0
            })
        );
    }

    #[test]
    fn test_equal_priority_loses() {
        let outcome = try_claim(StateKind::Suspicious, 2.0, &noise(10.0, 20.0), Vec3::ZERO);
        assert!(!outcome.is_accepted());
    }

    #[test]
    fn test_chasing_ignores_noise() {
        let outcome = try_claim(StateKind::Chase, 0.0, &noise(1.0, 1000.0), Vec3::ZERO);
        assert_eq!(outcome, ClaimOutcome::Rejected(Rejection::Chasing));
    }

    #[test]
    fn test_silent_noise_never_wins() {
        let outcome = try_claim(StateKind::Patrol, 0.0, &noise(3.0, 0.0), Vec3::ZERO);
        assert!(!outcome.is_accepted());
    }

    fn state() -> impl Strategy<Value = StateKind> {
        prop_oneof![
            Just(StateKind::Patrol),
            Just(StateKind::Suspicious),
            Just(StateKind::Chase),
            Just(StateKind::Attack),
        ]
    }

    proptest! {
        #[test]
        fn prop_claim_accepted_iff_strictly_louder(
            current in state(),
            held in 0.0f32..50.0,
            x in -50.0f32..50.0,
            z in -50.0f32..50.0,
            volume in -10.0f32..100.0,
        ) {
            let event = NoiseEvent::new(Vec3::new(x, 0.0, z), volume);
            let offered = event.priority_for(Vec3::ZERO);
            let outcome = try_claim(current, held, &event, Vec3::ZERO);
            let expected = current != StateKind::Chase && offered > held;
            prop_assert_eq!(outcome.is_accepted(), expected);
            if let ClaimOutcome::Accepted(claim) = outcome {
                prop_assert!(claim.priority > held);
            }
        }
    }
}
