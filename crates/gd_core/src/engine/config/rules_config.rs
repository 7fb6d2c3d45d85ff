//! Clock length and penalty / validation rule switches.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Seconds per quarter (default: 900)
    pub quarter_seconds: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { quarter_seconds: 900 }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.quarter_seconds == 0 {
            return Err("quarter_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Resolve missing matchups pseudo-randomly instead of failing
    pub degraded_mode: bool,
    /// Yardage for penalty slots that omit `yards`
    pub default_penalty_yards: i32,
    /// Offsetting fouls are always enforced at this distance
    pub offset_penalty_yards: i32,
    /// Cap enforcement at half the distance to the goal line
    pub half_distance: bool,
    /// Longest legal field-goal attempt
    pub fg_max_attempt_yards: i32,
    /// Added to distance-to-goal to get attempt length (7 snap + 10 end zone)
    pub fg_snap_offset: i32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            degraded_mode: false,
            default_penalty_yards: 10,
            offset_penalty_yards: 5,
            half_distance: true,
            fg_max_attempt_yards: 45,
            fg_snap_offset: 17,
        }
    }
}

impl RulesConfig {
    pub fn fg_attempt_yards(&self, distance_to_goal: i32) -> i32 {
        distance_to_goal + self.fg_snap_offset
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.default_penalty_yards <= 0 || self.offset_penalty_yards <= 0 {
            return Err("penalty yardage must be positive".to_string());
        }
        if self.fg_max_attempt_yards <= self.fg_snap_offset {
            return Err(format!(
                "fg_max_attempt_yards ({}) must exceed fg_snap_offset ({})",
                self.fg_max_attempt_yards, self.fg_snap_offset
            ));
        }
        Ok(())
    }
}
