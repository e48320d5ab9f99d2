//! # Sentinel Sim
//!
//! Headless host for Sentinel guards. Loads a TOML scenario, steps guards
//! and a scripted intruder at a fixed rate, and reports what happened.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod report;
pub mod runner;
pub mod world;

pub use config::{SimConfig, CONFIG_FILE};
pub use report::{EventLog, EventRecord, Summary};
pub use runner::run;
pub use world::World;
