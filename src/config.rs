//! Tuning configuration for machines and the bundled agents.
//!
//! Every struct deserializes with `#[serde(default)]`, so a config file only
//! needs the fields it changes:
//!
//! ```rust
//! use statecraft::config::PlayerConfig;
//!
//! let config = PlayerConfig::from_json(r#"{ "dash_duration": 0.25 }"#).unwrap();
//! assert_eq!(config.dash_duration, 0.25);
//! assert_eq!(config.jump_duration, 0.5);
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn parse<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite value >= 0, got {value}"),
        })
    }
}

fn positive(field: &'static str, value: i32) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a value > 0, got {value}"),
        })
    }
}

/// State machine settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Number of state changes kept in the transition log (0 disables it)
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 32,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        parse(json)
    }
}

/// Player movement, jump, dash and attack tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    /// Upward velocity applied when a jump starts
    pub jump_force: f32,
    /// Seconds the jump keeps pushing upward
    pub jump_duration: f32,
    pub jump_cooldown: f32,
    pub gravity: f32,
    pub gravity_multiplier: f32,
    /// Speed multiplier while dashing
    pub dash_force: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Seconds the attack state lasts
    pub attack_cooldown: f32,
    pub attack_distance: f32,
    pub attack_damage: i32,
    /// Seconds per fixed-timestep tick
    pub fixed_delta: f32,
    /// Animation cross-fade length in seconds
    pub crossfade: f32,
    pub max_health: i32,
    pub machine: MachineConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            jump_force: 10.0,
            jump_duration: 0.5,
            jump_cooldown: 0.0,
            gravity: -9.81,
            gravity_multiplier: 3.0,
            dash_force: 10.0,
            dash_duration: 1.0,
            dash_cooldown: 2.0,
            attack_cooldown: 0.5,
            attack_distance: 1.0,
            attack_damage: 10,
            fixed_delta: 0.02,
            crossfade: 0.1,
            max_health: 100,
            machine: MachineConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = parse(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("move_speed", self.move_speed)?;
        non_negative("jump_duration", self.jump_duration)?;
        non_negative("jump_cooldown", self.jump_cooldown)?;
        non_negative("dash_duration", self.dash_duration)?;
        non_negative("dash_cooldown", self.dash_cooldown)?;
        non_negative("attack_cooldown", self.attack_cooldown)?;
        non_negative("attack_distance", self.attack_distance)?;
        non_negative("fixed_delta", self.fixed_delta)?;
        non_negative("crossfade", self.crossfade)?;
        positive("max_health", self.max_health)
    }
}

/// Enemy attack and health tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Seconds between strikes while in attack range
    pub attack_cooldown: f32,
    /// Lowest damage a strike rolls
    pub min_damage: i32,
    /// Highest damage a strike rolls (inclusive)
    pub max_damage: i32,
    pub crossfade: f32,
    pub max_health: i32,
    pub machine: MachineConfig,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            attack_cooldown: 1.0,
            min_damage: 5,
            max_damage: 9,
            crossfade: 0.1,
            max_health: 100,
            machine: MachineConfig::default(),
        }
    }
}

impl EnemyConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = parse(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("attack_cooldown", self.attack_cooldown)?;
        non_negative("crossfade", self.crossfade)?;
        positive("max_health", self.max_health)?;
        if self.min_damage > self.max_damage {
            return Err(ConfigError::Invalid {
                field: "min_damage",
                reason: format!(
                    "min_damage ({}) exceeds max_damage ({})",
                    self.min_damage, self.max_damage
                ),
            });
        }
        Ok(())
    }
}
