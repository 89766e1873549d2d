//! Visible hour window of a day track.

use serde::{Deserialize, Serialize};

/// Half-open hour window `[start_hour, end_hour)` shown for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for HourWindow {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 24,
        }
    }
}

impl HourWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, WindowError> {
        if end_hour > 24 {
            return Err(WindowError::EndPastMidnight(end_hour));
        }
        if start_hour >= end_hour {
            return Err(WindowError::Empty {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn validate(&self) -> Result<(), WindowError> {
        Self::new(self.start_hour, self.end_hour).map(|_| ())
    }

    pub fn hours(&self) -> std::ops::Range<u32> {
        self.start_hour..self.end_hour
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        self.hours().contains(&hour)
    }
}

/// Named windows offered by the day header menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPreset {
    Dawn,
    Morning,
    Afternoon,
    Evening,
    Full,
    Custom { start_hour: u32, end_hour: u32 },
}

impl WindowPreset {
    pub fn window(&self) -> Result<HourWindow, WindowError> {
        match *self {
            WindowPreset::Dawn => HourWindow::new(0, 6),
            WindowPreset::Morning => HourWindow::new(6, 12),
            WindowPreset::Afternoon => HourWindow::new(12, 18),
            WindowPreset::Evening => HourWindow::new(18, 24),
            WindowPreset::Full => HourWindow::new(0, 24),
            WindowPreset::Custom {
                start_hour,
                end_hour,
            } => HourWindow::new(start_hour, end_hour),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("Hour window end {0} is past midnight")]
    EndPastMidnight(u32),
    #[error("Hour window start {start} must be before end {end}")]
    Empty { start: u32, end: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(WindowPreset::Dawn, 0, 6; "dawn")]
    #[test_case(WindowPreset::Morning, 6, 12; "morning")]
    #[test_case(WindowPreset::Afternoon, 12, 18; "afternoon")]
    #[test_case(WindowPreset::Evening, 18, 24; "evening")]
    #[test_case(WindowPreset::Full, 0, 24; "full day")]
    fn test_preset_windows(preset: WindowPreset, start: u32, end: u32) {
        let window = preset.window().unwrap();
        assert_eq!((window.start_hour, window.end_hour), (start, end));
    }

    #[test]
    fn test_custom_window_must_be_ordered() {
        let preset = WindowPreset::Custom {
            start_hour: 10,
            end_hour: 10,
        };
        assert_eq!(preset.window(), Err(WindowError::Empty { start: 10, end: 10 }));
    }

    #[test]
    fn test_window_rejects_end_past_midnight() {
        assert_eq!(HourWindow::new(8, 25), Err(WindowError::EndPastMidnight(25)));
    }

    #[test]
    fn test_default_window() {
        let window = HourWindow::default();
        assert_eq!(window.hours().count(), 17);
        assert!(window.contains_hour(7));
        assert!(!window.contains_hour(24));
    }
}
