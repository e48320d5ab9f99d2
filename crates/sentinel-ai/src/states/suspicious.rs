//! Suspicious: turn toward a noise, or walk to where the target was last seen.

use glam::Vec3;
use sentinel_common::rotate_towards;
use tracing::debug;

use super::{Sighting, StateRequest};
use crate::adapters::params;
use crate::agent::{Blackboard, TickContext};
use crate::config::Escalation;

/// Why the agent became suspicious.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Investigation {
    /// A claimed noise
    Noise,
    /// A target that slipped out of view
    LastKnownPosition,
}

/// How the investigation is being carried out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvestigationMode {
    /// Standing still, turning toward a noise
    Noise {
        /// Which claim this look belongs to
        claim_serial: u64,
        /// Direction of the noise at claim time
        direction: Vec3,
        /// Seconds spent looking
        elapsed: f32,
    },
    /// Walking to the last known target position
    Search {
        /// Where the agent is heading, if the target was ever seen
        spot: Option<Vec3>,
        /// Whether the spot has been reached
        arrived: bool,
    },
}

/// Suspicious state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuspiciousState {
    mode: InvestigationMode,
}

impl SuspiciousState {
    /// Current investigation mode.
    #[must_use]
    pub const fn mode(&self) -> &InvestigationMode {
        &self.mode
    }

    pub(crate) fn enter(
        investigation: Investigation,
        board: &mut Blackboard,
        ctx: &mut TickContext<'_>,
    ) -> Self {
        ctx.animator.trigger_once(params::IS_SUSPICIOUS);
        ctx.animator.set_bool(params::IS_RUNNING, false);
        ctx.set_pace(board.config.walk_speed);

        let mut state = Self {
            mode: InvestigationMode::Search {
                spot: None,
                arrived: false,
            },
        };
        match investigation {
            Investigation::Noise => state.listen(board, ctx),
            Investigation::LastKnownPosition => state.search(board, ctx),
        }
        state
    }

    pub(crate) fn update(
        &mut self,
        board: &mut Blackboard,
        sighting: &Sighting,
        ctx: &mut TickContext<'_>,
        dt: f32,
    ) -> Option<StateRequest> {
        if let Some(target) = sighting.target {
            let was_full = board.suspicion.is_full();
            board
                .suspicion
                .increase(board.config.suspicion_rise_rate, dt);
            let escalate = match board.config.escalation {
                Escalation::Immediate => true,
                Escalation::OnFullSuspicion => board.suspicion.is_full(),
                Escalation::ConfirmAfterFull => was_full,
            };
            if escalate {
                return Some(StateRequest::Chase);
            }

            // A glimpse during a search moves the search to the new sighting
            if let InvestigationMode::Search { spot, .. } = self.mode {
                if spot != Some(target) {
                    self.search(board, ctx);
                }
            }

            let facing = rotate_towards(
                ctx.navigator.forward(),
                target - board.pose.position,
                board.config.turn_rate() * dt,
            );
            ctx.navigator.face(facing);
            return None;
        }

        board
            .suspicion
            .decay(board.config.suspicion_decay_rate, dt);

        match self.mode {
            InvestigationMode::Noise {
                claim_serial,
                direction,
                elapsed,
            } => {
                if claim_serial != board.claim_serial {
                    // A louder noise took over; start looking again
                    self.listen(board, ctx);
                    return None;
                }

                let facing = rotate_towards(
                    ctx.navigator.forward(),
                    direction,
                    board.config.turn_rate() * dt,
                );
                ctx.navigator.face(facing);

                let elapsed = elapsed + dt;
                if elapsed >= board.config.noise_look_duration {
                    board.clear_noise_claim();
                    return Some(StateRequest::Patrol);
                }
                self.mode = InvestigationMode::Noise {
                    claim_serial,
                    direction,
                    elapsed,
                };
                None
            },
            InvestigationMode::Search { spot, arrived } => {
                if board.noise_claim.is_some() {
                    self.listen(board, ctx);
                    return None;
                }
                if board.suspicion.is_empty() {
                    return Some(StateRequest::Patrol);
                }
                if !arrived && board.has_arrived(&*ctx.navigator) {
                    ctx.navigator.stop();
                    ctx.animator.set_bool(params::IS_WALKING, false);
                    self.mode = InvestigationMode::Search {
                        spot,
                        arrived: true,
                    };
                }
                None
            },
        }
    }

    pub(crate) fn exit(ctx: &mut TickContext<'_>) {
        ctx.animator.set_bool(params::IS_WALKING, false);
    }

    fn listen(&mut self, board: &Blackboard, ctx: &mut TickContext<'_>) {
        let Some(claim) = board.noise_claim else {
            self.search(board, ctx);
            return;
        };
        debug!(
            agent = %board.id,
            priority = claim.priority,
            "investigating noise"
        );
        ctx.navigator.stop();
        ctx.animator.set_bool(params::IS_WALKING, false);
        self.mode = InvestigationMode::Noise {
            claim_serial: board.claim_serial,
            direction: claim.direction,
            elapsed: 0.0,
        };
    }

    fn search(&mut self, board: &Blackboard, ctx: &mut TickContext<'_>) {
        if let Some(position) = board.last_known_target_position {
            ctx.navigator.set_destination(position);
            ctx.animator.set_bool(params::IS_WALKING, true);
            self.mode = InvestigationMode::Search {
                spot: Some(position),
                arrived: false,
            };
        } else {
            ctx.navigator.stop();
            ctx.animator.set_bool(params::IS_WALKING, false);
            self.mode = InvestigationMode::Search {
                spot: None,
                arrived: true,
            };
        }
    }
}
