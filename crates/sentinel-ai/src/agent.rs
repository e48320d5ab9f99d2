//! The NPC agent.
//!
//! An [`Agent`] owns its behavior state and everything the states share
//! (suspicion, the noise claim, the patrol cursor, the target track). The
//! host drives it with two entry points:
//!
//! - [`Agent::on_perception_tick`] once per frame, with the navigation and
//!   animation adapters and the current target
//! - [`Agent::on_noise_event`] whenever a sound reaches the agent
//!
//! Everything is single-threaded and deterministic: the same sequence of
//! calls with the same inputs produces the same adapter calls and events.

use glam::Vec3;
use sentinel_common::{AgentId, ConfigError};
use tracing::{debug, warn};

use crate::adapters::{params, Animator, Navigator};
use crate::config::AgentConfig;
use crate::events::{AgentEvent, EventBus};
use crate::motion::MotionTracker;
use crate::noise::{try_claim, ClaimOutcome, NoiseClaim, NoiseEvent};
use crate::perception::{can_perceive, ClearLineOfSight, OcclusionTest};
use crate::route::PatrolRoute;
use crate::states::{BehaviorState, Sighting, StateKind, StateRequest};
use crate::suspicion::Suspicion;
use crate::target::Target;

static CLEAR_LINE_OF_SIGHT: ClearLineOfSight = ClearLineOfSight;

/// Position and facing of the agent, sampled from the navigator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World position
    pub position: Vec3,
    /// Facing direction
    pub forward: Vec3,
}

impl Pose {
    /// Creates a pose.
    #[must_use]
    pub const fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    fn sample(navigator: &dyn Navigator) -> Self {
        Self::new(navigator.position(), navigator.forward())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}

/// Collaborators for one tick.
///
/// Borrowed for the duration of the call only; the agent keeps no reference
/// to any of them.
pub struct TickContext<'a> {
    /// Movement service
    pub navigator: &'a mut dyn Navigator,
    /// Animation sink
    pub animator: &'a mut dyn Animator,
    /// The target to look for, if one exists
    pub target: Option<&'a dyn Target>,
    /// Line-of-sight test
    pub occlusion: &'a dyn OcclusionTest,
}

impl<'a> TickContext<'a> {
    /// Creates a context with no target and nothing blocking sight.
    pub fn new(navigator: &'a mut dyn Navigator, animator: &'a mut dyn Animator) -> Self {
        Self {
            navigator,
            animator,
            target: None,
            occlusion: &CLEAR_LINE_OF_SIGHT,
        }
    }

    /// Sets the target.
    pub fn with_target(mut self, target: &'a dyn Target) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the line-of-sight test.
    pub fn with_occlusion(mut self, occlusion: &'a dyn OcclusionTest) -> Self {
        self.occlusion = occlusion;
        self
    }

    // Movement speed and the animator's speed float always change together.
    pub(crate) fn set_pace(&mut self, speed: f32) {
        self.navigator.set_speed(speed);
        self.animator.set_float(params::SPEED, speed);
    }
}

/// State shared by all behavior states.
#[derive(Debug)]
pub(crate) struct Blackboard {
    pub id: AgentId,
    pub config: AgentConfig,
    pub route: PatrolRoute,
    pub suspicion: Suspicion,
    pub last_known_target_position: Option<Vec3>,
    pub noise_claim: Option<NoiseClaim>,
    /// Bumped on every accepted claim so an ongoing look can tell it was replaced
    pub claim_serial: u64,
    pub patrol_index: usize,
    pub tracker: MotionTracker,
    /// Seconds since the last swing, capped at the cooldown
    pub strike_clock: f32,
    pub pose: Pose,
    pub target_visible: bool,
    pub events: EventBus,
    warned_no_target: bool,
}

impl Blackboard {
    pub(crate) fn publish(&self, event: AgentEvent) {
        self.events.publish(event);
    }

    pub(crate) fn noise_priority(&self) -> f32 {
        self.noise_claim.map_or(0.0, |claim| claim.priority)
    }

    pub(crate) fn clear_noise_claim(&mut self) {
        self.noise_claim = None;
    }

    pub(crate) fn can_strike(&self) -> bool {
        self.strike_clock >= self.config.attack_cooldown
    }

    pub(crate) fn has_arrived(&self, navigator: &dyn Navigator) -> bool {
        !navigator.is_path_pending()
            && navigator.remaining_distance() <= self.config.arrival_tolerance
    }
}

/// A stealth-game NPC.
#[derive(Debug)]
pub struct Agent {
    state: BehaviorState,
    board: Blackboard,
    started: bool,
}

impl Agent {
    /// Creates an agent that will start patrolling `route` on its first tick.
    pub fn new(config: AgentConfig, route: PatrolRoute) -> Result<Self, ConfigError> {
        config.validate()?;
        let id = AgentId::new();
        if route.is_empty() {
            warn!(agent = %id, "patrol route is empty; agent will hold position");
        }
        let board = Blackboard {
            id,
            suspicion: Suspicion::new(config.max_suspicion),
            strike_clock: config.attack_cooldown,
            events: EventBus::new(config.event_capacity),
            config,
            route,
            last_known_target_position: None,
            noise_claim: None,
            claim_serial: 0,
            patrol_index: 0,
            tracker: MotionTracker::new(),
            pose: Pose::default(),
            target_visible: false,
            warned_no_target: false,
        };
        Ok(Self {
            state: BehaviorState::default(),
            board,
            started: false,
        })
    }

    /// Sets the pose used before the first tick samples the navigator.
    #[must_use]
    pub fn with_pose(mut self, position: Vec3, forward: Vec3) -> Self {
        self.board.pose = Pose::new(position, forward);
        self
    }

    /// This agent's id.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.board.id
    }

    /// Tuning parameters.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.board.config
    }

    /// Patrol route.
    #[must_use]
    pub const fn route(&self) -> &PatrolRoute {
        &self.board.route
    }

    /// Pose sampled at the start of the last tick.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.board.pose
    }

    /// Active state, including its timers.
    #[must_use]
    pub const fn state(&self) -> &BehaviorState {
        &self.state
    }

    /// Kind of the active state.
    #[must_use]
    pub const fn current_state(&self) -> StateKind {
        self.state.kind()
    }

    /// Suspicion accumulator.
    #[must_use]
    pub const fn suspicion(&self) -> &Suspicion {
        &self.board.suspicion
    }

    /// Suspicion as a fraction of its maximum, in `[0, 1]`.
    #[must_use]
    pub fn suspicion_fraction(&self) -> f32 {
        self.board.suspicion.fraction()
    }

    /// Where the target was last confirmed visible.
    #[must_use]
    pub const fn last_known_target_position(&self) -> Option<Vec3> {
        self.board.last_known_target_position
    }

    /// The noise being investigated, if any.
    #[must_use]
    pub const fn noise_claim(&self) -> Option<&NoiseClaim> {
        self.board.noise_claim.as_ref()
    }

    /// Priority of the held noise claim, zero when none is held.
    #[must_use]
    pub fn noise_priority(&self) -> f32 {
        self.board.noise_priority()
    }

    /// Index of the waypoint currently targeted.
    #[must_use]
    pub const fn patrol_index(&self) -> usize {
        self.board.patrol_index
    }

    /// Estimated velocity of the pursued target.
    #[must_use]
    pub const fn target_velocity(&self) -> Vec3 {
        self.board.tracker.velocity()
    }

    /// Whether the target was visible on the last tick.
    #[must_use]
    pub const fn is_target_visible(&self) -> bool {
        self.board.target_visible
    }

    /// Takes every event published since the last drain.
    pub fn drain_events(&self) -> Vec<AgentEvent> {
        self.board.events.drain()
    }

    /// Advances the agent by `dt` seconds.
    ///
    /// Negative or non-finite `dt` counts as zero: the agent still senses
    /// and may change state, but no timer or accumulator moves.
    pub fn on_perception_tick(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        self.board.pose = Pose::sample(&*ctx.navigator);
        if !self.started {
            self.started = true;
            self.state = BehaviorState::enter(StateRequest::Patrol, &mut self.board, ctx);
            debug!(agent = %self.board.id, "agent started");
        }

        self.board.strike_clock =
            (self.board.strike_clock + dt).min(self.board.config.attack_cooldown);

        let sighting = self.sense(ctx, dt);
        if let Some(request) = self.state.update(&mut self.board, &sighting, ctx, dt) {
            self.transition_to(request, ctx);
        }
    }

    /// Offers a noise heard at `source_position` with the given volume.
    pub fn on_noise_event(&mut self, source_position: Vec3, volume: f32) -> ClaimOutcome {
        self.hear(&NoiseEvent::new(source_position, volume))
    }

    /// Offers a noise event.
    pub fn hear(&mut self, event: &NoiseEvent) -> ClaimOutcome {
        let outcome = try_claim(
            self.state.kind(),
            self.board.noise_priority(),
            event,
            self.board.pose.position,
        );
        match outcome {
            ClaimOutcome::Accepted(claim) => {
                debug!(
                    agent = %self.board.id,
                    priority = claim.priority,
                    source = ?claim.source_position,
                    "noise claimed"
                );
                self.board.noise_claim = Some(claim);
                self.board.claim_serial += 1;
                self.board.publish(AgentEvent::NoiseClaimed {
                    agent: self.board.id,
                    priority: claim.priority,
                    source: claim.source_position,
                });
            },
            ClaimOutcome::Rejected(reason) => {
                debug!(agent = %self.board.id, ?reason, "noise rejected");
                self.board.publish(AgentEvent::NoiseRejected {
                    agent: self.board.id,
                    reason,
                });
            },
        }
        outcome
    }

    /// Switches to the requested state.
    ///
    /// Runs the current state's exit, then the new state's enter. Requesting
    /// the state the agent is already in does nothing and returns `false`.
    pub fn transition_to(&mut self, request: StateRequest, ctx: &mut TickContext<'_>) -> bool {
        let from = self.state.kind();
        let to = request.kind();
        if from == to {
            return false;
        }
        if self.started {
            self.state.exit(&mut self.board, ctx);
        } else {
            // The initial patrol was never entered, so there is nothing to exit
            self.started = true;
            self.board.pose = Pose::sample(&*ctx.navigator);
        }

        self.state = BehaviorState::enter(request, &mut self.board, ctx);
        debug!(agent = %self.board.id, %from, %to, "state transition");
        self.board.publish(AgentEvent::StateChanged {
            agent: self.board.id,
            from,
            to,
        });
        true
    }

    fn sense(&mut self, ctx: &TickContext<'_>, dt: f32) -> Sighting {
        let board = &mut self.board;
        let position = board.pose.position;

        let seen = match ctx.target {
            Some(target) => {
                let cone = if target.is_crouching() {
                    board.config.crouched_view_cone()
                } else {
                    board.config.view_cone()
                };
                let eye = position + Vec3::Y * board.config.eye_height;
                let target_position = target.position();
                can_perceive(
                    eye,
                    board.pose.forward,
                    target_position,
                    cone.distance,
                    cone.half_angle,
                    ctx.occlusion,
                )
                .then_some(target_position)
            },
            None => {
                if !board.warned_no_target {
                    board.warned_no_target = true;
                    warn!(agent = %board.id, "no target supplied; nothing to perceive");
                }
                None
            },
        };

        match seen {
            Some(target_position) => {
                if !board.target_visible {
                    debug!(agent = %board.id, position = ?target_position, "target sighted");
                    board.publish(AgentEvent::TargetSighted {
                        agent: board.id,
                        position: target_position,
                    });
                }
                board.target_visible = true;
                board.last_known_target_position = Some(target_position);
                if dt > 0.0 || board.tracker.last_position().is_none() {
                    board.tracker.observe(target_position, dt);
                }
                Sighting::seen(position, target_position)
            },
            None => {
                if board.target_visible {
                    if let Some(last_known) = board.last_known_target_position {
                        debug!(agent = %board.id, ?last_known, "target lost");
                        board.publish(AgentEvent::TargetLost {
                            agent: board.id,
                            last_known,
                        });
                    }
                }
                board.target_visible = false;
                board.tracker.forget();
                Sighting::unseen()
            },
        }
    }
}
