//! # Sentinel AI
//!
//! Perception and behavior core for stealth-game guards.
//!
//! This crate provides everything an NPC needs to notice and pursue an
//! intruder, independent of any engine:
//! - Vision cone probe with pluggable occlusion
//! - Suspicion accumulator
//! - Noise arbitration (one claim at a time, loudest wins)
//! - Target motion tracking and pursuit aiming
//! - Behavior states: Patrol, Suspicious, Chase, Attack
//! - Navigation and animation adapter traits
//! - Footstep noise emission
//! - Event bus for hosts

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod adapters;
pub mod agent;
pub mod config;
pub mod events;
pub mod footsteps;
pub mod motion;
pub mod noise;
pub mod perception;
pub mod route;
pub mod states;
pub mod suspicion;
pub mod target;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapters::*;
    pub use crate::agent::*;
    pub use crate::config::*;
    pub use crate::events::*;
    pub use crate::footsteps::*;
    pub use crate::motion::*;
    pub use crate::noise::*;
    pub use crate::perception::*;
    pub use crate::route::*;
    pub use crate::states::*;
    pub use crate::suspicion::*;
    pub use crate::target::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Agent>();
    }

    #[test]
    fn test_new_agent_rejects_bad_config() {
        let config = AgentConfig {
            walk_speed: -1.0,
            ..AgentConfig::default()
        };
        assert!(Agent::new(config, PatrolRoute::empty()).is_err());
    }

    #[test]
    fn test_new_agent_starts_idle() {
        let agent = Agent::new(AgentConfig::default(), PatrolRoute::empty())
            .expect("default config is valid");
        assert_eq!(agent.current_state(), StateKind::Patrol);
        assert_eq!(agent.suspicion_fraction(), 0.0);
        assert_eq!(agent.noise_priority(), 0.0);
        assert!(agent.last_known_target_position().is_none());
        assert!(agent.drain_events().is_empty());
    }
}
