//! Agent tuning parameters.
//!
//! Every field has a default, so partial configuration files work. Angles are
//! stored in degrees for readability and converted where they are used.

use sentinel_common::ConfigError;
use serde::{Deserialize, Serialize};

use crate::motion::PursuitAim;
use crate::perception::ViewCone;

/// When a visible target in the Suspicious state escalates to a chase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Escalation {
    /// Chase as soon as the target is seen
    Immediate,
    /// Chase on the tick suspicion reaches its maximum
    #[default]
    OnFullSuspicion,
    /// Chase only when the target is still visible on a tick that starts
    /// with suspicion already at its maximum
    ConfirmAfterFull,
}

/// Tuning parameters for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    // === Vision ===
    /// Sight distance
    pub view_distance: f32,
    /// Full cone angle in degrees
    pub view_angle_degrees: f32,
    /// Eye height above the agent's position
    pub eye_height: f32,
    /// Sight distance multiplier against a crouching target
    pub crouch_distance_factor: f32,
    /// Cone angle multiplier against a crouching target
    pub crouch_angle_factor: f32,

    // === Suspicion ===
    /// Suspicion ceiling
    pub max_suspicion: f32,
    /// Suspicion gained per second of visual contact
    pub suspicion_rise_rate: f32,
    /// Suspicion lost per second without contact
    pub suspicion_decay_rate: f32,
    /// Escalation policy while suspicious
    pub escalation: Escalation,
    /// Keep suspicion level while a chased target is out of sight
    pub hold_suspicion_in_chase: bool,

    // === Movement ===
    /// Patrol and search speed
    pub walk_speed: f32,
    /// Chase speed once running
    pub run_speed: f32,
    /// Suspicion fraction at which a chase breaks into a run
    pub run_threshold: f32,
    /// Remaining path distance that counts as arrived
    pub arrival_tolerance: f32,
    /// Turn rate in degrees per second when facing a point of interest
    pub turn_rate_degrees: f32,

    // === Patrol ===
    /// Seconds spent looking around at each waypoint
    pub patrol_dwell: f32,
    /// Look sweep amplitude to either side, in degrees
    pub sweep_angle_degrees: f32,
    /// Look sweep speed in degrees per second
    pub sweep_speed_degrees: f32,

    // === Investigation ===
    /// Seconds spent looking toward a noise
    pub noise_look_duration: f32,
    /// Seconds without sight before a chase becomes a search
    pub lose_sight_timeout: f32,

    // === Attack ===
    /// Reach of an attack
    pub attack_range: f32,
    /// Minimum seconds between attacks
    pub attack_cooldown: f32,
    /// Seconds between starting a swing and the hit landing
    pub attack_windup: f32,
    /// Seconds of target motion to lead a strike by
    pub strike_lead_time: f32,
    /// How chase destinations are chosen
    pub pursuit: PursuitAim,

    // === Events ===
    /// Capacity of the agent's event channel
    pub event_capacity: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            // Vision
            view_distance: 10.0,
            view_angle_degrees: 120.0,
            eye_height: 0.0,
            crouch_distance_factor: 0.5,
            crouch_angle_factor: 0.7,

            // Suspicion
            max_suspicion: 5.0,
            suspicion_rise_rate: 1.0,
            suspicion_decay_rate: 1.0,
            escalation: Escalation::OnFullSuspicion,
            hold_suspicion_in_chase: false,

            // Movement
            walk_speed: 2.0,
            run_speed: 4.0,
            run_threshold: 0.5,
            arrival_tolerance: 0.2,
            turn_rate_degrees: 180.0,

            // Patrol
            patrol_dwell: 2.0,
            sweep_angle_degrees: 30.0,
            sweep_speed_degrees: 50.0,

            // Investigation
            noise_look_duration: 3.0,
            lose_sight_timeout: 3.0,

            // Attack
            attack_range: 1.5,
            attack_cooldown: 1.5,
            attack_windup: 0.4,
            strike_lead_time: 0.2,
            pursuit: PursuitAim::default(),

            event_capacity: 256,
        }
    }
}

impl AgentConfig {
    /// Cone used against a standing target.
    #[must_use]
    pub fn view_cone(&self) -> ViewCone {
        ViewCone::from_degrees(self.view_distance, self.view_angle_degrees * 0.5)
    }

    /// Cone used against a crouching target.
    #[must_use]
    pub fn crouched_view_cone(&self) -> ViewCone {
        self.view_cone()
            .scaled(self.crouch_distance_factor, self.crouch_angle_factor)
    }

    /// Turn rate in radians per second.
    #[must_use]
    pub fn turn_rate(&self) -> f32 {
        self.turn_rate_degrees.to_radians()
    }

    /// Checks every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_non_negative("view_distance", self.view_distance)?;
        ConfigError::require_range("view_angle_degrees", self.view_angle_degrees, 0.0, 360.0)?;
        ConfigError::require_non_negative("eye_height", self.eye_height)?;
        ConfigError::require_range("crouch_distance_factor", self.crouch_distance_factor, 0.0, 1.0)?;
        ConfigError::require_range("crouch_angle_factor", self.crouch_angle_factor, 0.0, 1.0)?;

        ConfigError::require_positive("max_suspicion", self.max_suspicion)?;
        ConfigError::require_non_negative("suspicion_rise_rate", self.suspicion_rise_rate)?;
        ConfigError::require_non_negative("suspicion_decay_rate", self.suspicion_decay_rate)?;

        ConfigError::require_positive("walk_speed", self.walk_speed)?;
        ConfigError::require_positive("run_speed", self.run_speed)?;
        ConfigError::require_range("run_threshold", self.run_threshold, 0.0, 1.0)?;
        ConfigError::require_non_negative("arrival_tolerance", self.arrival_tolerance)?;
        ConfigError::require_positive("turn_rate_degrees", self.turn_rate_degrees)?;

        ConfigError::require_non_negative("patrol_dwell", self.patrol_dwell)?;
        ConfigError::require_range("sweep_angle_degrees", self.sweep_angle_degrees, 0.0, 180.0)?;
        ConfigError::require_non_negative("sweep_speed_degrees", self.sweep_speed_degrees)?;

        ConfigError::require_non_negative("noise_look_duration", self.noise_look_duration)?;
        ConfigError::require_non_negative("lose_sight_timeout", self.lose_sight_timeout)?;

        ConfigError::require_non_negative("attack_range", self.attack_range)?;
        ConfigError::require_non_negative("attack_cooldown", self.attack_cooldown)?;
        ConfigError::require_non_negative("attack_windup", self.attack_windup)?;
        ConfigError::require_non_negative("strike_lead_time", self.strike_lead_time)?;

        if self.attack_windup > self.attack_cooldown {
            return Err(ConfigError::Inconsistent {
                field: "attack_windup",
                reason: format!(
                    "wind-up {} exceeds cooldown {}",
                    self.attack_windup, self.attack_cooldown
                ),
            });
        }

        match self.pursuit {
            PursuitAim::Current => {},
            PursuitAim::Lead { lead_time } => {
                ConfigError::require_non_negative("pursuit.lead_time", lead_time)?;
            },
            PursuitAim::Intercept { max_lead } => {
                ConfigError::require_non_negative("pursuit.max_lead", max_lead)?;
            },
        }

        if self.event_capacity == 0 {
            return Err(ConfigError::Inconsistent {
                field: "event_capacity",
                reason: "must hold at least one event".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(AgentConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_view_cone_halves_angle() {
        let config = AgentConfig::default();
        let cone = config.view_cone();
        assert!((cone.half_angle - 60.0_f32.to_radians()).abs() < 1e-6);

        let crouched = config.crouched_view_cone();
        assert!((crouched.distance - 5.0).abs() < 1e-6);
        assert!((crouched.half_angle - 42.0_f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn test_validate_reports_bad_field() {
        let config = AgentConfig {
            max_suspicion: 0.0,
            ..AgentConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "max_suspicion",
                value: 0.0
            })
        );

        let config = AgentConfig {
            attack_windup: 2.0,
            attack_cooldown: 1.0,
            ..AgentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Inconsistent {
                field: "attack_windup",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AgentConfig =
            serde_json::from_str(r#"{ "view_distance": 4.0, "escalation": "immediate" }"#)
                .expect("partial config parses");
        assert_eq!(config.view_distance, 4.0);
        assert_eq!(config.escalation, Escalation::Immediate);
        assert_eq!(config.attack_range, AgentConfig::default().attack_range);
    }

    #[test]
    fn test_pursuit_mode_is_tagged() {
        let config: AgentConfig =
            serde_json::from_str(r#"{ "pursuit": { "mode": "intercept", "max_lead": 1.5 } }"#)
                .expect("tagged pursuit parses");
        assert_eq!(config.pursuit, PursuitAim::Intercept { max_lead: 1.5 });
    }
}
