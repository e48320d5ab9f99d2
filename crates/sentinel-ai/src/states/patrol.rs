//! Patrol: walk the route, look around at each waypoint.

use glam::Vec3;
use sentinel_common::rotate_about_y;
use tracing::trace;

use super::{Investigation, Sighting, StateRequest};
use crate::adapters::params;
use crate::agent::{Blackboard, TickContext};

/// Side-to-side look performed while dwelling at a waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookSweep {
    heading: Vec3,
    offset: f32,
    direction: f32,
    elapsed: f32,
}

impl LookSweep {
    fn new(heading: Vec3) -> Self {
        Self {
            heading,
            offset: 0.0,
            direction: 1.0,
            elapsed: 0.0,
        }
    }

    /// Heading the sweep swings around.
    #[must_use]
    pub const fn heading(&self) -> Vec3 {
        self.heading
    }

    /// Current yaw offset from the heading, in radians.
    #[must_use]
    pub const fn offset(&self) -> f32 {
        self.offset
    }

    /// Seconds spent sweeping.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    // Ping-pongs between -max_angle and +max_angle, returning the look direction.
    fn advance(&mut self, dt: f32, max_angle: f32, speed: f32) -> Vec3 {
        self.elapsed += dt;
        if max_angle > 0.0 {
            self.offset += speed * dt * self.direction;
            if self.offset >= max_angle {
                self.offset = max_angle;
                self.direction = -1.0;
            } else if self.offset <= -max_angle {
                self.offset = -max_angle;
                self.direction = 1.0;
            }
        }
        rotate_about_y(self.heading, self.offset)
    }
}

/// What the patrol is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PatrolPhase {
    /// Walking to the current waypoint
    #[default]
    Travelling,
    /// Dwelling at a waypoint
    Sweeping(LookSweep),
}

/// Patrol state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PatrolState {
    phase: PatrolPhase,
}

impl PatrolState {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &PatrolPhase {
        &self.phase
    }

    pub(crate) fn enter(board: &mut Blackboard, ctx: &mut TickContext<'_>) -> Self {
        ctx.set_pace(board.config.walk_speed);
        ctx.animator.set_bool(params::IS_RUNNING, false);

        let mut state = Self::default();
        state.head_to_waypoint(board, ctx);
        state
    }

    pub(crate) fn update(
        &mut self,
        board: &mut Blackboard,
        sighting: &Sighting,
        ctx: &mut TickContext<'_>,
        dt: f32,
    ) -> Option<StateRequest> {
        if sighting.is_visible() {
            board
                .suspicion
                .increase(board.config.suspicion_rise_rate, dt);
            return Some(StateRequest::Chase);
        }
        board
            .suspicion
            .decay(board.config.suspicion_decay_rate, dt);

        if board.noise_claim.is_some() {
            return Some(StateRequest::Suspicious(Investigation::Noise));
        }

        if matches!(self.phase, PatrolPhase::Travelling) {
            if board.has_arrived(&*ctx.navigator) {
                self.begin_sweep(board, ctx);
            }
            return None;
        }

        if let PatrolPhase::Sweeping(sweep) = &mut self.phase {
            let look = sweep.advance(
                dt,
                board.config.sweep_angle_degrees.to_radians(),
                board.config.sweep_speed_degrees.to_radians(),
            );
            if sweep.elapsed() < board.config.patrol_dwell {
                ctx.navigator.face(look);
                return None;
            }

            let heading = sweep.heading();
            ctx.navigator.face(heading);
            if board.route.is_empty() {
                *sweep = LookSweep::new(heading);
                return None;
            }
        }

        board.patrol_index = board.route.next_index(board.patrol_index);
        self.head_to_waypoint(board, ctx);
        None
    }

    pub(crate) fn exit(ctx: &mut TickContext<'_>) {
        ctx.animator.set_bool(params::IS_WALKING, false);
    }

    fn head_to_waypoint(&mut self, board: &Blackboard, ctx: &mut TickContext<'_>) {
        let Some(waypoint) = board.route.waypoint(board.patrol_index) else {
            self.begin_sweep(board, ctx);
            return;
        };
        trace!(agent = %board.id, index = board.patrol_index, "heading to waypoint");
        ctx.navigator.set_destination(waypoint);
        ctx.animator.set_bool(params::IS_WALKING, true);
        self.phase = PatrolPhase::Travelling;
    }

    fn begin_sweep(&mut self, board: &Blackboard, ctx: &mut TickContext<'_>) {
        ctx.navigator.stop();
        ctx.animator.set_bool(params::IS_WALKING, false);
        self.phase = PatrolPhase::Sweeping(LookSweep::new(board.pose.forward));
    }
}
