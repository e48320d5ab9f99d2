//! Behavior states.
//!
//! Each state carries its own timers. Leaving a state drops them and
//! entering it again starts from zero. States never switch themselves;
//! they return a [`StateRequest`] and the agent performs the transition.

mod attack;
mod chase;
mod patrol;
mod suspicious;

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use attack::AttackState;
pub use chase::ChaseState;
pub use patrol::{LookSweep, PatrolPhase, PatrolState};
pub use suspicious::{Investigation, InvestigationMode, SuspiciousState};

use crate::agent::{Blackboard, TickContext};

/// Discriminant of the active behavior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Walking the patrol route
    Patrol,
    /// Investigating a noise or a glimpse
    Suspicious,
    /// Pursuing a seen target
    Chase,
    /// Striking a target in reach
    Attack,
}

impl StateKind {
    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Patrol => "patrol",
            Self::Suspicious => "suspicious",
            Self::Chase => "chase",
            Self::Attack => "attack",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested change of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateRequest {
    /// Return to the patrol route
    Patrol,
    /// Investigate
    Suspicious(Investigation),
    /// Pursue the target
    Chase,
    /// Strike the target
    Attack,
}

impl StateRequest {
    /// State this request leads to.
    #[must_use]
    pub const fn kind(self) -> StateKind {
        match self {
            Self::Patrol => StateKind::Patrol,
            Self::Suspicious(_) => StateKind::Suspicious,
            Self::Chase => StateKind::Chase,
            Self::Attack => StateKind::Attack,
        }
    }
}

/// What perception produced this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sighting {
    /// Target position when visible
    pub target: Option<Vec3>,
    /// Distance from the agent to a visible target
    pub distance: f32,
}

impl Sighting {
    pub(crate) const fn unseen() -> Self {
        Self {
            target: None,
            distance: f32::INFINITY,
        }
    }

    pub(crate) fn seen(observer: Vec3, target: Vec3) -> Self {
        Self {
            target: Some(target),
            distance: observer.distance(target),
        }
    }

    pub(crate) const fn is_visible(&self) -> bool {
        self.target.is_some()
    }
}

/// The active state together with its private timers.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorState {
    /// Walking the patrol route
    Patrol(PatrolState),
    /// Investigating
    Suspicious(SuspiciousState),
    /// Pursuing
    Chase(ChaseState),
    /// Striking
    Attack(AttackState),
}

impl Default for BehaviorState {
    fn default() -> Self {
        Self::Patrol(PatrolState::default())
    }
}

impl BehaviorState {
    /// Discriminant of this state.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        match self {
            Self::Patrol(_) => StateKind::Patrol,
            Self::Suspicious(_) => StateKind::Suspicious,
            Self::Chase(_) => StateKind::Chase,
            Self::Attack(_) => StateKind::Attack,
        }
    }

    pub(crate) fn enter(
        request: StateRequest,
        board: &mut Blackboard,
        ctx: &mut TickContext<'_>,
    ) -> Self {
        match request {
            StateRequest::Patrol => Self::Patrol(PatrolState::enter(board, ctx)),
            StateRequest::Suspicious(investigation) => {
                Self::Suspicious(SuspiciousState::enter(investigation, board, ctx))
            },
            StateRequest::Chase => Self::Chase(ChaseState::enter(board, ctx)),
            StateRequest::Attack => Self::Attack(AttackState::enter(board, ctx)),
        }
    }

    pub(crate) fn update(
        &mut self,
        board: &mut Blackboard,
        sighting: &Sighting,
        ctx: &mut TickContext<'_>,
        dt: f32,
    ) -> Option<StateRequest> {
        match self {
            Self::Patrol(state) => state.update(board, sighting, ctx, dt),
            Self::Suspicious(state) => state.update(board, sighting, ctx, dt),
            Self::Chase(state) => state.update(board, sighting, ctx, dt),
            Self::Attack(state) => state.update(board, sighting, ctx, dt),
        }
    }

    pub(crate) fn exit(&mut self, board: &mut Blackboard, ctx: &mut TickContext<'_>) {
        match self {
            Self::Patrol(_) => PatrolState::exit(ctx),
            Self::Suspicious(_) => SuspiciousState::exit(ctx),
            Self::Chase(_) => ChaseState::exit(board, ctx),
            Self::Attack(state) => state.exit(board, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kinds() {
        assert_eq!(StateRequest::Patrol.kind(), StateKind::Patrol);
        assert_eq!(
            StateRequest::Suspicious(Investigation::Noise).kind(),
            StateKind::Suspicious
        );
        assert_eq!(StateRequest::Attack.kind(), StateKind::Attack);
    }

    #[test]
    fn test_default_state_is_patrol() {
        assert_eq!(BehaviorState::default().kind(), StateKind::Patrol);
        assert_eq!(StateKind::Chase.to_string(), "chase");
    }

    #[test]
    fn test_sighting_distance() {
        let seen = Sighting::seen(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0));
        assert!(seen.is_visible());
        assert!((seen.distance - 5.0).abs() < 1e-6);
        assert!(!Sighting::unseen().is_visible());
    }
}
