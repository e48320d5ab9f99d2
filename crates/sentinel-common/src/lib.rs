//! # Sentinel Common
//!
//! Common types, utilities, and shared abstractions for Sentinel.
//!
//! This crate provides foundational types used across the Sentinel crates:
//! - Agent identifiers
//! - Ground-plane math on top of `glam`
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_generation() {
        let id1 = AgentId::new();
        let id2 = AgentId::new();
        assert_ne!(id1, id2);
        assert!(id2.raw() > id1.raw());
    }

    #[test]
    fn test_config_error_wraps_into_top_level() {
        let err: SentinelError = ConfigError::NotPositive {
            field: "view_distance",
            value: -1.0,
        }
        .into();
        assert!(err.to_string().contains("view_distance"));
    }
}
