//! Attack: stand, face the target, swing on cooldown.

use sentinel_common::direction_to;
use tracing::debug;

use super::{Sighting, StateRequest};
use crate::adapters::params;
use crate::agent::{Blackboard, TickContext};
use crate::events::AgentEvent;

/// Attack state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttackState {
    windup: Option<f32>,
    cooldown: f32,
}

impl AttackState {
    /// Seconds until the current swing lands, if one is in progress.
    #[must_use]
    pub const fn windup_remaining(&self) -> Option<f32> {
        self.windup
    }

    /// Seconds until the next swing may start.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> f32 {
        self.cooldown
    }

    pub(crate) fn enter(board: &mut Blackboard, ctx: &mut TickContext<'_>) -> Self {
        ctx.navigator.stop();
        ctx.animator.set_bool(params::IS_WALKING, false);
        ctx.animator.set_bool(params::IS_RUNNING, false);

        let mut state = Self::default();
        state.swing(board, ctx);
        state
    }

    pub(crate) fn update(
        &mut self,
        board: &mut Blackboard,
        sighting: &Sighting,
        ctx: &mut TickContext<'_>,
        dt: f32,
    ) -> Option<StateRequest> {
        let Some(target) = sighting.target else {
            return Some(StateRequest::Chase);
        };
        if sighting.distance > board.config.attack_range {
            return Some(StateRequest::Chase);
        }

        board
            .suspicion
            .increase(board.config.suspicion_rise_rate, dt);
        ctx.navigator
            .face(direction_to(board.pose.position, target));

        if let Some(remaining) = self.windup {
            let remaining = remaining - dt;
            if remaining <= 0.0 {
                let aim = board
                    .tracker
                    .lead_point(board.config.strike_lead_time)
                    .unwrap_or(target);
                debug!(agent = %board.id, ?aim, "strike landed");
                board.publish(AgentEvent::StrikeLanded {
                    agent: board.id,
                    aim,
                });
                self.windup = None;
            } else {
                self.windup = Some(remaining);
            }
        }

        self.cooldown -= dt;
        if self.cooldown <= 0.0 && self.windup.is_none() {
            self.swing(board, ctx);
        }
        None
    }

    pub(crate) fn exit(&mut self, board: &Blackboard, ctx: &mut TickContext<'_>) {
        if self.windup.take().is_some() {
            debug!(agent = %board.id, "strike abandoned");
            board.publish(AgentEvent::StrikeAbandoned { agent: board.id });
        }
        ctx.animator.set_bool(params::IS_WALKING, false);
    }

    fn swing(&mut self, board: &mut Blackboard, ctx: &mut TickContext<'_>) {
        ctx.animator.trigger_once(params::ATTACK);
        self.windup = Some(board.config.attack_windup);
        self.cooldown = board.config.attack_cooldown;
        board.strike_clock = 0.0;
    }
}
