// Settings module
// Planner configuration, persisted as TOML.

use serde::{Deserialize, Serialize};

use crate::models::day_window::HourWindow;
use crate::models::time_range::{
    SnapRules, DEFAULT_MIN_DURATION_MINUTES, DEFAULT_TICK_MINUTES,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub tick_minutes: u32,
    pub min_duration_minutes: u32,
    /// Pixel height of one hour cell.
    pub hour_height_px: f32,
    /// Show only the hours touched by scheduled items.
    pub compressed: bool,
    /// Commit a shifted drop even when the shift lands on another item.
    pub allow_residual_overlap: bool,
    /// Window new days start with. Kept last so it serializes as a TOML table.
    pub default_window: HourWindow,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            tick_minutes: DEFAULT_TICK_MINUTES,
            min_duration_minutes: DEFAULT_MIN_DURATION_MINUTES,
            hour_height_px: 60.0,
            compressed: false,
            allow_residual_overlap: false,
            default_window: HourWindow::default(),
        }
    }
}

impl PlannerSettings {
    pub fn snap_rules(&self) -> SnapRules {
        SnapRules {
            tick_minutes: self.tick_minutes,
            min_duration_minutes: self.min_duration_minutes,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tick_minutes == 0 || 60 % self.tick_minutes != 0 {
            return Err(format!(
                "tick_minutes must divide an hour evenly (got {})",
                self.tick_minutes
            ));
        }
        if self.min_duration_minutes == 0 || self.min_duration_minutes % self.tick_minutes != 0 {
            return Err(format!(
                "min_duration_minutes must be a positive multiple of {} (got {})",
                self.tick_minutes, self.min_duration_minutes
            ));
        }
        if !self.hour_height_px.is_finite() || self.hour_height_px <= 0.0 {
            return Err("hour_height_px must be a positive number".to_string());
        }
        self.default_window
            .validate()
            .map_err(|e| format!("default_window: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = PlannerSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.snap_rules(), SnapRules::default());
    }

    #[test]
    fn test_tick_must_divide_hour() {
        let settings = PlannerSettings {
            tick_minutes: 7,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_min_duration_must_align_with_tick() {
        let settings = PlannerSettings {
            tick_minutes: 15,
            min_duration_minutes: 20,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_hour_height_rejected() {
        let settings = PlannerSettings {
            hour_height_px: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
