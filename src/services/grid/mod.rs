//! Time grid configuration for the trip timeline.
//!
//! Holds the visible hour window of every day track, the pixel height of an
//! hour cell and the compressed display flag. Coordinate math lives in
//! [`coordinates`].

pub mod coordinates;

use chrono::NaiveDate;

use crate::models::day_window::{HourWindow, WindowError, WindowPreset};
use crate::models::settings::PlannerSettings;
use crate::models::time_range::TimeRange;
use crate::models::trip::{day_count, TripValidationError};

pub use coordinates::CoordinateMapper;

/// Hours shown in compressed mode when a day has nothing scheduled.
const COMPRESSED_FALLBACK_HOURS: u32 = 3;

/// A pointer position resolved to a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTarget {
    pub day_index: usize,
    pub hour: u32,
    /// Vertical offset of the pointer inside the hour cell.
    pub pixel_offset: f32,
}

impl CellTarget {
    pub fn new(day_index: usize, hour: u32, pixel_offset: f32) -> Self {
        Self {
            day_index,
            hour,
            pixel_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Day {day} is outside the trip ({total} days)")]
    DayOutOfRange { day: usize, total: usize },
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Trip(#[from] TripValidationError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    windows: Vec<HourWindow>,
    default_window: HourWindow,
    hour_height_px: f32,
    compressed: bool,
}

impl TimeGrid {
    pub fn new(day_count: usize, settings: &PlannerSettings) -> Self {
        Self {
            windows: vec![settings.default_window; day_count],
            default_window: settings.default_window,
            hour_height_px: settings.hour_height_px,
            compressed: settings.compressed,
        }
    }

    /// Rebuild a grid from persisted windows.
    pub fn from_windows(windows: Vec<HourWindow>, settings: &PlannerSettings) -> Self {
        let windows = windows
            .into_iter()
            .map(|w| match w.validate() {
                Ok(()) => w,
                Err(e) => {
                    log::warn!("Discarding invalid hour window {:?}: {}", w, e);
                    settings.default_window
                }
            })
            .collect();
        Self {
            windows,
            default_window: settings.default_window,
            hour_height_px: settings.hour_height_px,
            compressed: settings.compressed,
        }
    }

    pub fn day_count(&self) -> usize {
        self.windows.len()
    }

    pub fn windows(&self) -> &[HourWindow] {
        &self.windows
    }

    pub fn window(&self, day_index: usize) -> Option<HourWindow> {
        self.windows.get(day_index).copied()
    }

    pub fn hour_height(&self) -> f32 {
        self.hour_height_px
    }

    pub fn mapper(&self, tick: u32) -> CoordinateMapper {
        CoordinateMapper::new(self.hour_height_px, tick)
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    pub fn set_compressed(&mut self, compressed: bool) {
        self.compressed = compressed;
    }

    pub fn set_window(
        &mut self,
        day_index: usize,
        preset: WindowPreset,
    ) -> Result<HourWindow, GridError> {
        let total = self.day_count();
        let window = preset.window()?;
        let slot = self
            .windows
            .get_mut(day_index)
            .ok_or(GridError::DayOutOfRange {
                day: day_index,
                total,
            })?;
        *slot = window;
        log::debug!("Day {} window set to {:?}", day_index, window);
        Ok(window)
    }

    /// Recompute the day count from a new inclusive date range.
    ///
    /// On error nothing changes. Growing appends default windows; shrinking
    /// drops the trailing days' windows.
    pub fn apply_trip_dates(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize, GridError> {
        let count = day_count(start, end)?;
        self.windows.resize(count, self.default_window);
        Ok(count)
    }

    /// Hours rendered for a day.
    ///
    /// In compressed mode only the window hours touched by `scheduled`
    /// remain; an empty day falls back to the first three hours of its
    /// window so the grid never collapses.
    pub fn visible_hours<'a>(
        &self,
        day_index: usize,
        scheduled: impl IntoIterator<Item = &'a TimeRange>,
    ) -> Vec<u32> {
        let Some(window) = self.window(day_index) else {
            return Vec::new();
        };
        if !self.compressed {
            return window.hours().collect();
        }

        let mut touched = [false; 24];
        for range in scheduled {
            for hour in range.touched_hours() {
                if let Some(flag) = touched.get_mut(hour as usize) {
                    *flag = true;
                }
            }
        }
        let hours: Vec<u32> = window
            .hours()
            .filter(|h| touched[*h as usize])
            .collect();
        if hours.is_empty() {
            let end = (window.start_hour + COMPRESSED_FALLBACK_HOURS).min(window.end_hour);
            return (window.start_hour..end).collect();
        }
        hours
    }

    /// Validate a raw pointer location. `None` means "no day/hour matched".
    pub fn locate(&self, day_index: usize, hour: u32, pixel_offset: f32) -> Option<CellTarget> {
        let window = self.window(day_index)?;
        if !window.contains_hour(hour) || !pixel_offset.is_finite() {
            return None;
        }
        Some(CellTarget::new(day_index, hour, pixel_offset))
    }
}
