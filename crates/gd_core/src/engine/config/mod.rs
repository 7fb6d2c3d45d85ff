//! # Engine Configuration
//!
//! Tunable constants for kicking, clock and rule enforcement. The dice and
//! penalty tables carry the play-by-play balance; everything the tables do
//! not cover lives here.
//!
//! ## Usage
//! ```rust
//! use gd_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let arcade = EngineConfig::arcade();
//! assert!(arcade.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `GD_ENGINE_CONFIG_PATH`: JSON or YAML file replacing the defaults (see [`env`])

pub mod env;
mod kicking_config;
mod rules_config;

pub use kicking_config::{FieldGoalBand, KickingConfig};
pub use rules_config::{ClockConfig, RulesConfig};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub kicking: KickingConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl EngineConfig {
    /// Tabletop rules as printed (default)
    pub fn realistic() -> Self {
        Self::default()
    }

    /// More scoring: longer returns, friendlier kicks
    pub fn arcade() -> Self {
        Self {
            kicking: KickingConfig {
                return_yards_per_pip: 5,
                onside_recovery_chance: 0.30,
                pat_kick_success: 0.99,
                two_point_success: 0.55,
                ..KickingConfig::default()
            },
            rules: RulesConfig { fg_max_attempt_yards: 55, ..RulesConfig::default() },
            ..Self::default()
        }
    }

    /// Missing matchups resolve pseudo-randomly instead of failing
    pub fn degraded() -> Self {
        Self { rules: RulesConfig { degraded_mode: true, ..RulesConfig::default() }, ..Self::default() }
    }

    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "realistic" | "default" => Some(Self::realistic()),
            "arcade" => Some(Self::arcade()),
            "degraded" => Some(Self::degraded()),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| e.to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.clock.validate()?;
        self.kicking.validate()?;
        self.rules.validate()
    }
}

pub(crate) fn check_probability(name: &str, value: f64) -> Result<(), String> {
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{} must be in [0, 1], got {}", name, value));
    }
    Ok(())
}

pub(crate) fn check_yard_line(name: &str, value: i32) -> Result<(), String> {
    if !(1..=99).contains(&value) {
        return Err(format!("{} must be a yard line in 1..=99, got {}", name, value));
    }
    Ok(())
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.clock.quarter_seconds, 900);
        assert_eq!(cfg.kicking.touchback_yard_line, 25);
        assert_eq!(cfg.rules.default_penalty_yards, 10);
        assert!(!cfg.rules.degraded_mode);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_arcade_kicks_further() {
        let realistic = EngineConfig::realistic();
        let arcade = EngineConfig::arcade();

        assert!(arcade.kicking.return_yards_per_pip > realistic.kicking.return_yards_per_pip);
        assert!(arcade.rules.fg_max_attempt_yards > realistic.rules.fg_max_attempt_yards);
        assert!(arcade.validate().is_ok());
    }

    #[test]
    fn test_profiles() {
        assert_eq!(EngineConfig::from_profile("Arcade"), Some(EngineConfig::arcade()));
        assert!(EngineConfig::from_profile("degraded").unwrap().rules.degraded_mode);
        assert_eq!(EngineConfig::from_profile("simulation"), None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json(r#"{"rules": {"degraded_mode": true}}"#).unwrap();
        assert!(cfg.rules.degraded_mode);
        assert_eq!(cfg.rules.default_penalty_yards, 10);
        assert_eq!(cfg.kicking, KickingConfig::default());
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "kicking:\n  onside_recovery_chance: 0.25\nclock:\n  quarter_seconds: 600\n";
        let cfg = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.clock.quarter_seconds, 600);
        assert!((cfg.kicking.onside_recovery_chance - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_probability() {
        let mut cfg = EngineConfig::default();
        cfg.kicking.pat_kick_success = 1.5;
        assert!(cfg.validate().unwrap_err().contains("pat_kick_success"));
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::arcade();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, cfg);
    }
}
