//! Headless world: walls, a scripted intruder, and the guards watching it.

use glam::Vec3;
use sentinel_ai::{
    Agent, Animator, FootstepEmitter, Gait, KinematicNavigator, Navigator, NoiseEvent,
    OcclusionTest, StateKind, Target, TickContext,
};
use sentinel_common::{AgentId, ConfigError, EPSILON};
use tracing::{debug, trace};

use crate::config::{IntruderConfig, SimConfig, WallConfig};
use crate::report::EventRecord;

/// Axis-aligned box that blocks sight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    min: Vec3,
    max: Vec3,
}

impl Wall {
    /// Creates a wall from two opposite corners in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Whether the segment from `from` to `to` touches the box.
    pub fn blocks(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let mut t_enter = 0.0_f32;
        let mut t_exit = 1.0_f32;

        for axis in 0..3 {
            let origin = from[axis];
            let d = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return false;
            }
        }
        true
    }
}

impl From<WallConfig> for Wall {
    fn from(config: WallConfig) -> Self {
        Self::new(config.min, config.max)
    }
}

/// Line-of-sight test against a set of walls.
#[derive(Debug, Clone, Default)]
pub struct WallOccluder {
    walls: Vec<Wall>,
}

impl WallOccluder {
    /// Creates an occluder over the given walls.
    pub fn new(walls: Vec<Wall>) -> Self {
        Self { walls }
    }

    /// Number of walls.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Whether there are no walls.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

impl OcclusionTest for WallOccluder {
    fn is_occluded(&self, from: Vec3, to: Vec3) -> bool {
        self.walls.iter().any(|wall| wall.blocks(from, to))
    }
}

/// The scripted intruder walking a fixed path.
#[derive(Debug, Clone)]
pub struct Intruder {
    position: Vec3,
    path: Vec<Vec3>,
    next: usize,
    speed: f32,
    gait: Gait,
    looping: bool,
    finished: bool,
    footsteps: FootstepEmitter,
}

impl Intruder {
    /// Creates the intruder at the first point of its path.
    pub fn new(config: &IntruderConfig) -> Self {
        let position = config.path.first().copied().unwrap_or(Vec3::ZERO);
        Self {
            position,
            path: config.path.clone(),
            next: 1,
            speed: config.speed,
            gait: config.gait,
            looping: config.looping,
            finished: config.path.len() < 2,
            footsteps: FootstepEmitter::new(config.footsteps),
        }
    }

    /// Whether the end of a non-looping path was reached.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Gait right now; idle once the walk is over.
    pub const fn current_gait(&self) -> Gait {
        if self.finished {
            Gait::Idle
        } else {
            self.gait
        }
    }

    /// Walks for `dt` seconds and returns the footstep made, if any.
    pub fn advance(&mut self, dt: f32) -> Option<NoiseEvent> {
        if !self.finished && dt > 0.0 {
            let mut budget = self.speed * dt;
            // at most one lap per step
            let mut hops = 0;
            while budget > 0.0 && !self.finished && hops <= self.path.len() {
                hops += 1;
                let Some(&waypoint) = self.path.get(self.next) else {
                    self.finished = true;
                    break;
                };
                let offset = waypoint - self.position;
                let distance = offset.length();
                if distance <= budget {
                    self.position = waypoint;
                    budget -= distance;
                    self.next += 1;
                    if self.next >= self.path.len() {
                        if self.looping {
                            self.next = 0;
                        } else {
                            self.finished = true;
                        }
                    }
                } else {
                    self.position += offset / distance * budget;
                    budget = 0.0;
                }
            }
        }
        self.footsteps.update(dt, self.position, self.current_gait())
    }
}

impl Target for Intruder {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn gait(&self) -> Gait {
        self.current_gait()
    }
}

/// Animator that writes every parameter change to the trace log.
#[derive(Debug, Clone, Copy)]
pub struct TracingAnimator {
    agent: AgentId,
}

impl TracingAnimator {
    /// Creates an animator logging on behalf of `agent`.
    pub const fn new(agent: AgentId) -> Self {
        Self { agent }
    }
}

impl Animator for TracingAnimator {
    fn set_float(&mut self, parameter: &str, value: f32) {
        trace!(agent = %self.agent, parameter, value, "animator float");
    }

    fn set_bool(&mut self, parameter: &str, value: bool) {
        trace!(agent = %self.agent, parameter, value, "animator bool");
    }

    fn trigger_once(&mut self, parameter: &str) {
        trace!(agent = %self.agent, parameter, "animator trigger");
    }
}

/// A guard with its movement and animation services.
#[derive(Debug)]
pub struct Guard {
    /// Name from the scenario
    pub name: String,
    /// Behavior
    pub agent: Agent,
    /// Movement
    pub navigator: KinematicNavigator,
    /// Animation sink
    pub animator: TracingAnimator,
}

/// Everything in the simulation.
#[derive(Debug)]
pub struct World {
    guards: Vec<Guard>,
    intruder: Intruder,
    occluder: WallOccluder,
    elapsed: f32,
}

impl World {
    /// Builds the world described by a scenario.
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        let mut guards = Vec::with_capacity(config.guards.len());
        for guard in &config.guards {
            let agent = Agent::new(guard.agent.clone(), guard.route.clone())?
                .with_pose(guard.position, guard.forward);
            let animator = TracingAnimator::new(agent.id());
            debug!(guard = %guard.name, agent = %agent.id(), "spawned guard");
            guards.push(Guard {
                name: guard.name.clone(),
                agent,
                navigator: KinematicNavigator::new(guard.position, guard.forward),
                animator,
            });
        }

        Ok(Self {
            guards,
            intruder: Intruder::new(&config.intruder),
            occluder: WallOccluder::new(config.walls.iter().copied().map(Wall::from).collect()),
            elapsed: 0.0,
        })
    }

    /// Guards in spawn order.
    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// The intruder.
    pub const fn intruder(&self) -> &Intruder {
        &self.intruder
    }

    /// Simulated seconds so far.
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current state of every guard.
    pub fn guard_states(&self) -> Vec<StateKind> {
        self.guards.iter().map(|g| g.agent.current_state()).collect()
    }

    /// Advances the world by `dt` seconds and returns the events raised.
    ///
    /// Footsteps reach a guard only when it stands within the step's volume
    /// of the source. Guards then tick and move.
    pub fn step(&mut self, dt: f32) -> Vec<EventRecord> {
        self.elapsed += dt;

        if let Some(step) = self.intruder.advance(dt) {
            for guard in &mut self.guards {
                let heard = guard.navigator.position().distance(step.source_position);
                if heard <= step.volume {
                    guard.agent.hear(&step);
                }
            }
        }

        let mut records = Vec::new();
        for guard in &mut self.guards {
            let mut ctx = TickContext::new(&mut guard.navigator, &mut guard.animator)
                .with_target(&self.intruder)
                .with_occlusion(&self.occluder);
            guard.agent.on_perception_tick(dt, &mut ctx);
            guard.navigator.advance(dt);

            records.extend(
                guard
                    .agent
                    .drain_events()
                    .into_iter()
                    .map(|event| EventRecord::new(self.elapsed, &guard.name, event)),
            );
        }
        records
    }
}
