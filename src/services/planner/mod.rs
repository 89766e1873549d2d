//! Trip planner facade.
//!
//! Wires pointer gestures to the placement, conflict and resize engines and
//! commits their results to the schedule store. Everything runs on the
//! caller's thread inside gesture callbacks; there is exactly one gesture
//! session at a time.

mod gestures;
mod storage;

use chrono::NaiveDate;

use crate::models::day_window::{HourWindow, WindowPreset};
use crate::models::plan_item::{PlaceRef, PlanItem, PlanItemBuilder, PlanItemId};
use crate::models::settings::PlannerSettings;
use crate::models::time_range::{Placement, TimeRange};
use crate::models::trip::{TripConfig, TripValidationError};
use crate::services::conflict::{ConflictResolver, Resolution};
use crate::services::gesture::{GestureSession, GestureTracker};
use crate::services::grid::{GridError, TimeGrid};
use crate::services::notification::{Notice, NoticeKind, NoticeLevel, NoticeQueue};
use crate::services::placement::PlacementEngine;
use crate::services::resize::ResizeController;
use crate::services::schedule::{ScheduleStore, StoreError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Trip(#[from] TripValidationError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid settings: {0}")]
    Settings(String),
}

/// Live feedback while a gesture is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub placement: Placement,
    /// `HH:MM–HH:MM` of the placement.
    pub label: String,
    /// Set for moves when the candidate currently overlaps something.
    pub resolution: Option<Resolution>,
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    Placed {
        item_id: PlanItemId,
        placement: Placement,
        resolution: Resolution,
    },
    Resized {
        item_id: PlanItemId,
        placement: Placement,
    },
    Cancelled(CancelReason),
}

impl GestureOutcome {
    pub fn is_committed(&self) -> bool {
        !matches!(self, GestureOutcome::Cancelled(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Released with no session open.
    NoSession,
    /// Released outside any day/hour cell.
    NoTarget,
    /// The conflict shift found no room and residual overlaps are off.
    Blocked,
    /// Resize released without a change.
    Unchanged,
    /// The item vanished while the gesture was open.
    ItemGone,
}

pub struct Planner {
    settings: PlannerSettings,
    trip: TripConfig,
    grid: TimeGrid,
    store: ScheduleStore,
    gestures: GestureTracker,
    resolver: ConflictResolver,
    clone_source: Option<PlanItemId>,
    notices: NoticeQueue,
}

impl Planner {
    pub fn new(trip: TripConfig, settings: PlannerSettings) -> Result<Self, PlannerError> {
        settings.validate().map_err(PlannerError::Settings)?;
        trip.validate()?;
        let days = trip.day_count();
        Ok(Self {
            grid: TimeGrid::new(days, &settings),
            store: ScheduleStore::new(days),
            settings,
            trip,
            gestures: GestureTracker::new(),
            resolver: ConflictResolver::new(),
            clone_source: None,
            notices: NoticeQueue::new(),
        })
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn trip(&self) -> &TripConfig {
        &self.trip
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    pub fn session(&self) -> &GestureSession {
        self.gestures.active()
    }

    pub fn day_count(&self) -> usize {
        self.trip.day_count()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    fn placement_engine(&self) -> PlacementEngine {
        PlacementEngine::new(
            self.settings.snap_rules(),
            self.grid.mapper(self.settings.tick_minutes),
        )
    }

    fn resize_controller(&self) -> ResizeController {
        ResizeController::new(
            self.settings.snap_rules(),
            self.grid.mapper(self.settings.tick_minutes),
        )
    }

    pub fn add_item(&mut self, builder: PlanItemBuilder) -> Result<PlanItemId, PlannerError> {
        Ok(self.store.add_to_pool(builder)?)
    }

    pub fn item(&self, id: PlanItemId) -> Option<&PlanItem> {
        self.store.get(id)
    }

    /// Return a scheduled item to the pool.
    pub fn unschedule(&mut self, id: PlanItemId) -> Result<(), PlannerError> {
        self.drop_gesture_on(id);
        Ok(self.store.unschedule(id)?)
    }

    /// Delete an item permanently.
    pub fn remove(&mut self, id: PlanItemId) -> Result<PlanItem, PlannerError> {
        self.drop_gesture_on(id);
        if self.clone_source == Some(id) {
            self.clone_source = None;
        }
        Ok(self.store.remove(id)?)
    }

    fn drop_gesture_on(&mut self, id: PlanItemId) {
        if self.gestures.active().item_id() == Some(id) {
            self.gestures.cancel();
        }
    }

    /// Turn clone mode on for `source`, or off with `None`.
    pub fn set_clone_source(&mut self, source: Option<PlanItemId>) -> Result<(), PlannerError> {
        if let Some(id) = source {
            if !self.store.contains(id) {
                return Err(StoreError::UnknownItem(id).into());
            }
        }
        log::debug!("Clone source set to {:?}", source);
        self.clone_source = source;
        Ok(())
    }

    pub fn clone_source(&self) -> Option<PlanItemId> {
        self.clone_source
    }

    pub fn attach_place(&mut self, id: PlanItemId, place: PlaceRef) -> Result<(), PlannerError> {
        Ok(self.store.set_place(id, Some(place))?)
    }

    pub fn rename_trip(&mut self, title: impl Into<String>) -> Result<(), PlannerError> {
        let title = title.into();
        if title.trim().is_empty() {
            self.notices
                .push(Notice::validation(TripValidationError::EmptyTitle.to_string()));
            return Err(TripValidationError::EmptyTitle.into());
        }
        self.trip.title = title;
        Ok(())
    }

    pub fn set_day_window(
        &mut self,
        day_index: usize,
        preset: WindowPreset,
    ) -> Result<HourWindow, PlannerError> {
        self.grid.set_window(day_index, preset).map_err(|err| {
            self.notices.push(Notice::validation(err.to_string()));
            err.into()
        })
    }

    pub fn set_compressed(&mut self, compressed: bool) {
        self.grid.set_compressed(compressed);
    }

    /// Hours the grid shows for a day, honouring compressed mode.
    pub fn visible_hours(&self, day_index: usize) -> Vec<u32> {
        let ranges: Vec<TimeRange> = self
            .store
            .track(day_index)
            .into_iter()
            .map(|slot| slot.range)
            .collect();
        self.grid.visible_hours(day_index, &ranges)
    }

    /// Change the trip's date range.
    ///
    /// A range outside `[1, 14]` days is rejected with a validation notice
    /// and leaves days and windows as they were. Items on days that no
    /// longer exist return to the pool.
    pub fn apply_trip_dates(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize, PlannerError> {
        let count = match self.grid.apply_trip_dates(start, end) {
            Ok(count) => count,
            Err(err) => {
                self.notices.push(Notice::validation(err.to_string()));
                return Err(err.into());
            }
        };

        if self.gestures.is_active() {
            self.gestures.cancel();
        }
        self.trip.start_date = start;
        self.trip.end_date = end;

        let returned = self.store.set_day_count(count);
        if !returned.is_empty() {
            self.notices.push(Notice::new(
                format!("{} item(s) moved back to the pool", returned.len()),
                NoticeLevel::Info,
                NoticeKind::ReturnedToPool {
                    count: returned.len(),
                },
            ));
        }
        log::info!("Trip dates set to {}..={} ({} days)", start, end, count);
        Ok(count)
    }

    /// Release every gesture resource, e.g. when the view goes away.
    pub fn teardown(&mut self) {
        if self.gestures.cancel() {
            log::debug!("Planner torn down with an open gesture");
        }
    }
}
