//! Scenario configuration.
//!
//! A scenario describes the level (walls), the guards with their routes and
//! tuning, and the intruder's scripted walk. It is read from and written to
//! TOML.

use glam::Vec3;
use sentinel_ai::{AgentConfig, FootstepConfig, Gait, PatrolRoute};
use sentinel_common::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default scenario file name.
pub const CONFIG_FILE: &str = "sentinel.toml";

/// Axis-aligned box that blocks sight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

/// One guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Display name used in logs
    pub name: String,
    /// Spawn position
    pub position: Vec3,
    /// Initial facing
    pub forward: Vec3,
    /// Patrol waypoints
    pub route: PatrolRoute,
    /// Tuning
    pub agent: AgentConfig,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            name: "guard".to_string(),
            position: Vec3::ZERO,
            forward: Vec3::Z,
            route: PatrolRoute::new(vec![
                Vec3::new(0.0, 0.0, 8.0),
                Vec3::new(8.0, 0.0, 8.0),
                Vec3::new(8.0, 0.0, 0.0),
                Vec3::ZERO,
            ]),
            agent: AgentConfig::default(),
        }
    }
}

/// The scripted intruder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntruderConfig {
    /// Walking speed
    pub speed: f32,
    /// Gait while moving
    pub gait: Gait,
    /// Start over from the first point after reaching the last
    pub looping: bool,
    /// Points visited in order; the first is the spawn point
    pub path: Vec<Vec3>,
    /// Footstep loudness and cadence
    pub footsteps: FootstepConfig,
}

impl Default for IntruderConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            gait: Gait::Walking,
            looping: false,
            path: vec![
                Vec3::new(-10.0, 0.0, 12.0),
                Vec3::new(12.0, 0.0, 12.0),
                Vec3::new(12.0, 0.0, -6.0),
            ],
            footsteps: FootstepConfig::default(),
        }
    }
}

/// Full scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Run Settings ===
    /// Simulated seconds
    pub duration: f32,
    /// Ticks per simulated second
    pub tick_rate: u32,
    /// Stop as soon as a strike lands
    pub stop_on_strike: bool,
    /// JSON-lines event output (None = no file)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_path: Option<PathBuf>,

    // === World ===
    /// Sight-blocking walls
    pub walls: Vec<WallConfig>,
    /// Guards
    pub guards: Vec<GuardConfig>,
    /// Intruder
    pub intruder: IntruderConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Run
            duration: 40.0,
            tick_rate: 30,
            stop_on_strike: true,
            events_path: None,

            // World
            walls: vec![WallConfig {
                min: Vec3::new(3.0, 0.0, 3.0),
                max: Vec3::new(5.0, 2.0, 5.0),
            }],
            guards: vec![GuardConfig::default()],
            intruder: IntruderConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load a scenario from a path.
    /// Returns the default scenario if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Scenario file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read scenario file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded scenario from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse scenario file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open scenario file: {e}");
                Self::default()
            },
        }
    }

    /// Save the scenario to a path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved scenario to {}", path.display());
        Ok(())
    }

    /// Seconds per tick.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Number of ticks to run.
    pub fn tick_count(&self) -> u64 {
        (self.duration.max(0.0) * self.tick_rate as f32).round() as u64
    }

    /// Checks run settings, the intruder, and every guard's tuning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_non_negative("duration", self.duration)?;
        if self.tick_rate == 0 {
            return Err(ConfigError::NotPositive {
                field: "tick_rate",
                value: 0.0,
            });
        }
        ConfigError::require_non_negative("intruder.speed", self.intruder.speed)?;
        if self.intruder.path.is_empty() {
            return Err(ConfigError::Inconsistent {
                field: "intruder.path",
                reason: "needs at least a spawn point".to_string(),
            });
        }
        ConfigError::require_positive(
            "intruder.footsteps.step_interval",
            self.intruder.footsteps.step_interval,
        )?;
        for guard in &self.guards {
            guard.agent.validate()?;
        }
        Ok(())
    }
}
