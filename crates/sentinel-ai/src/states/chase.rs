//! Chase: pursue the target, fall back to its last known position.

use super::{Investigation, Sighting, StateRequest};
use crate::adapters::params;
use crate::agent::{Blackboard, TickContext};
use crate::config::AgentConfig;

/// Chase state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChaseState {
    since_seen: f32,
    running: bool,
}

impl ChaseState {
    /// Seconds since the target was last visible.
    #[must_use]
    pub const fn time_since_seen(&self) -> f32 {
        self.since_seen
    }

    /// Whether the agent has broken into a run.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn enter(board: &mut Blackboard, ctx: &mut TickContext<'_>) -> Self {
        board.clear_noise_claim();
        ctx.set_pace(board.config.walk_speed);
        ctx.animator.set_bool(params::IS_WALKING, true);
        ctx.animator.set_bool(params::IS_RUNNING, false);
        if let Some(position) = board.last_known_target_position {
            ctx.navigator.set_destination(position);
        }
        Self::default()
    }

    pub(crate) fn update(
        &mut self,
        board: &mut Blackboard,
        sighting: &Sighting,
        ctx: &mut TickContext<'_>,
        dt: f32,
    ) -> Option<StateRequest> {
        let Some(target) = sighting.target else {
            if !board.config.hold_suspicion_in_chase {
                board
                    .suspicion
                    .decay(board.config.suspicion_decay_rate, dt);
            }
            self.since_seen += dt;
            if self.since_seen >= board.config.lose_sight_timeout {
                return Some(StateRequest::Suspicious(Investigation::LastKnownPosition));
            }
            if let Some(position) = board.last_known_target_position {
                ctx.navigator.set_destination(position);
            }
            return None;
        };

        self.since_seen = 0.0;
        board
            .suspicion
            .increase(board.config.suspicion_rise_rate, dt);

        let run = board.suspicion.fraction() >= board.config.run_threshold;
        if run != self.running {
            self.running = run;
            ctx.set_pace(self.speed(&board.config));
            ctx.animator.set_bool(params::IS_RUNNING, run);
            ctx.animator.set_bool(params::IS_WALKING, !run);
        }

        let speed = self.speed(&board.config);
        let destination = board
            .tracker
            .aim_point(board.config.pursuit, board.pose.position, speed)
            .unwrap_or(target);
        ctx.navigator.set_destination(destination);

        if sighting.distance <= board.config.attack_range && board.can_strike() {
            return Some(StateRequest::Attack);
        }
        None
    }

    pub(crate) fn exit(board: &Blackboard, ctx: &mut TickContext<'_>) {
        ctx.set_pace(board.config.walk_speed);
        ctx.animator.set_bool(params::IS_WALKING, false);
        ctx.animator.set_bool(params::IS_RUNNING, false);
    }

    fn speed(&self, config: &AgentConfig) -> f32 {
        if self.running {
            config.run_speed
        } else {
            config.walk_speed
        }
    }
}
