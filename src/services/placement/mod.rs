//! Drop-position to candidate-interval conversion.
//!
//! The engine never touches the store: it only turns a grid cell and a
//! payload duration into a [`Candidate`] that the conflict resolver checks.

use crate::models::plan_item::PlanItemId;
use crate::models::time_range::{Placement, SnapRules, TimeRange, MINUTES_PER_DAY};
use crate::services::gesture::{MoveGesture, MoveOrigin};
use crate::services::grid::{CellTarget, CoordinateMapper};

/// A tentative placement plus the item whose previous slot is freed for the
/// overlap test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub placement: Placement,
    pub exclude: Option<PlanItemId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementEngine {
    rules: SnapRules,
    mapper: CoordinateMapper,
}

impl PlacementEngine {
    pub fn new(rules: SnapRules, mapper: CoordinateMapper) -> Self {
        Self { rules, mapper }
    }

    /// Interval for dropping `duration_minutes` worth of item on `target`.
    ///
    /// The start is `hour * 60` plus the snapped minute under the pointer;
    /// the duration is snapped and lifted to the minimum. A drop late in the
    /// day is pulled earlier so the interval ends by midnight.
    pub fn place(&self, target: CellTarget, duration_minutes: u32) -> Placement {
        let minute = self.mapper.pixel_to_minute(target.pixel_offset);
        let duration = self
            .rules
            .snap_duration(duration_minutes.min(MINUTES_PER_DAY) as i32)
            .min(MINUTES_PER_DAY);
        let start = (target.hour.min(23) * 60 + minute).min(MINUTES_PER_DAY - duration);
        Placement::new(target.day_index, TimeRange::new(start, duration))
    }

    /// Candidate for a move gesture. Moving an already scheduled item frees
    /// its own slot so it never conflicts with its previous position.
    pub fn candidate(&self, gesture: &MoveGesture, target: CellTarget) -> Candidate {
        let placement = self.place(target, gesture.duration_minutes);
        let exclude = match gesture.origin {
            MoveOrigin::Track(_) if !gesture.clone => Some(gesture.item_id),
            _ => None,
        };
        Candidate { placement, exclude }
    }
}
