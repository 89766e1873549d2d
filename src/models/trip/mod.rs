// Trip module
// Title and inclusive date range; the day count of the planner derives from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shortest trip the planner accepts, in days.
pub const MIN_TRIP_DAYS: i64 = 1;
/// Longest trip the planner accepts, in days.
pub const MAX_TRIP_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripConfig {
    pub title: String,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
}

impl TripConfig {
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, TripValidationError> {
        let trip = Self {
            title: title.into(),
            start_date,
            end_date,
        };
        trip.validate()?;
        Ok(trip)
    }

    pub fn validate(&self) -> Result<(), TripValidationError> {
        if self.title.trim().is_empty() {
            return Err(TripValidationError::EmptyTitle);
        }
        day_count(self.start_date, self.end_date).map(|_| ())
    }

    /// Number of day tracks. Always within `[MIN_TRIP_DAYS, MAX_TRIP_DAYS]`
    /// for a validated trip.
    pub fn day_count(&self) -> usize {
        ((self.end_date - self.start_date).num_days() + 1).max(MIN_TRIP_DAYS) as usize
    }

    /// Calendar date of a day index, if it lies inside the trip.
    pub fn date_of(&self, day_index: usize) -> Option<NaiveDate> {
        if day_index >= self.day_count() {
            return None;
        }
        self.start_date
            .checked_add_days(chrono::Days::new(day_index as u64))
    }
}

/// Day count for an inclusive date range, validated against the trip limits.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> Result<usize, TripValidationError> {
    let days = (end - start).num_days() + 1;
    if days < MIN_TRIP_DAYS {
        return Err(TripValidationError::EndBeforeStart { start, end });
    }
    if days > MAX_TRIP_DAYS {
        return Err(TripValidationError::TooManyDays(days));
    }
    Ok(days as usize)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripValidationError {
    #[error("Trip title cannot be empty")]
    EmptyTitle,
    #[error("Trip end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("Trips can span at most {max} days (got {0})", max = MAX_TRIP_DAYS)]
    TooManyDays(i64),
}
