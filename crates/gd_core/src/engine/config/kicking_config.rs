//! Kicking game: kickoffs, punts, field goals and tries.

use serde::{Deserialize, Serialize};

use super::{check_probability, check_yard_line};

/// Success chance for attempts up to `max_yards` (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGoalBand {
    pub max_yards: i32,
    pub success: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KickingConfig {
    // === Kickoff ===
    /// Receiving team's own yard line on a touchback (default: 25)
    pub touchback_yard_line: i32,
    /// d20 rolls at or under this are touchbacks (default: 11)
    pub touchback_max_roll: u32,
    /// Own yard line reached by the shortest return (default: 20)
    pub return_base_yard_line: i32,
    /// Extra yards per pip above the touchback range (default: 3)
    pub return_yards_per_pip: i32,
    /// A natural 20 returns to this own yard line (default: 50)
    pub breakaway_yard_line: i32,
    pub onside_recovery_chance: f64,
    /// Kicking team's own yard line after an onside kick, either way (default: 45)
    pub onside_spot_yard_line: i32,

    // === Punt ===
    pub punt_net_min: i32,
    pub punt_net_max: i32,
    pub punt_touchback_yard_line: i32,

    // === Field goal / try ===
    /// Ordered by `max_yards`; attempts beyond the last band always miss
    pub fg_bands: Vec<FieldGoalBand>,
    pub pat_kick_success: f64,
    pub two_point_success: f64,
}

impl Default for KickingConfig {
    fn default() -> Self {
        Self {
            touchback_yard_line: 25,
            touchback_max_roll: 11,
            return_base_yard_line: 20,
            return_yards_per_pip: 3,
            breakaway_yard_line: 50,
            onside_recovery_chance: 0.15,
            onside_spot_yard_line: 45,

            punt_net_min: 30,
            punt_net_max: 50,
            punt_touchback_yard_line: 20,

            fg_bands: vec![
                FieldGoalBand { max_yards: 29, success: 0.95 },
                FieldGoalBand { max_yards: 39, success: 0.85 },
                FieldGoalBand { max_yards: 45, success: 0.70 },
            ],
            pat_kick_success: 0.94,
            two_point_success: 0.45,
        }
    }
}

impl KickingConfig {
    pub fn field_goal_chance(&self, attempt_yards: i32) -> f64 {
        self.fg_bands
            .iter()
            .find(|band| attempt_yards <= band.max_yards)
            .map_or(0.0, |band| band.success)
    }

    pub fn validate(&self) -> Result<(), String> {
        check_yard_line("touchback_yard_line", self.touchback_yard_line)?;
        check_yard_line("return_base_yard_line", self.return_base_yard_line)?;
        check_yard_line("breakaway_yard_line", self.breakaway_yard_line)?;
        check_yard_line("onside_spot_yard_line", self.onside_spot_yard_line)?;
        check_yard_line("punt_touchback_yard_line", self.punt_touchback_yard_line)?;
        if self.touchback_max_roll > 20 {
            return Err(format!("touchback_max_roll must be <= 20, got {}", self.touchback_max_roll));
        }
        if self.return_yards_per_pip < 0 {
            return Err("return_yards_per_pip must be >= 0".to_string());
        }
        if self.punt_net_min < 0 || self.punt_net_min > self.punt_net_max {
            return Err(format!(
                "punt net range {}..={} is empty or negative",
                self.punt_net_min, self.punt_net_max
            ));
        }
        check_probability("onside_recovery_chance", self.onside_recovery_chance)?;
        check_probability("pat_kick_success", self.pat_kick_success)?;
        check_probability("two_point_success", self.two_point_success)?;
        for pair in self.fg_bands.windows(2) {
            if pair[0].max_yards >= pair[1].max_yards {
                return Err("fg_bands must be sorted by max_yards".to_string());
            }
        }
        for band in &self.fg_bands {
            check_probability("fg_bands.success", band.success)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_goal_bands() {
        let cfg = KickingConfig::default();
        assert!((cfg.field_goal_chance(20) - 0.95).abs() < 1e-9);
        assert!((cfg.field_goal_chance(29) - 0.95).abs() < 1e-9);
        assert!((cfg.field_goal_chance(30) - 0.85).abs() < 1e-9);
        assert!((cfg.field_goal_chance(45) - 0.70).abs() < 1e-9);
        assert_eq!(cfg.field_goal_chance(46), 0.0);
    }

    #[test]
    fn test_unsorted_bands_rejected() {
        let mut cfg = KickingConfig::default();
        cfg.fg_bands.reverse();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_punt_range_checked() {
        let cfg = KickingConfig { punt_net_min: 60, ..KickingConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
