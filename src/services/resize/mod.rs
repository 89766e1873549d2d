// Edge resize computation
//
// Turns an accumulated vertical pointer delta on the top or bottom edge of a
// scheduled item into a new interval. Frames that would leave the item
// shorter than the minimum are rejected; the caller keeps its last valid
// interval.

use crate::models::plan_item::PlanItemId;
use crate::models::time_range::{SnapRules, TimeRange, MINUTES_PER_DAY};
use crate::services::conflict::TrackSlot;
use crate::services::gesture::ResizeEdge;
use crate::services::grid::CoordinateMapper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResizeRejected {
    #[error("Duration {duration} min is below the {minimum} min minimum")]
    BelowMinimum { duration: u32, minimum: u32 },
}

/// Free space around the resized item on its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeBounds {
    /// Earliest start the top edge may reach.
    pub floor: u32,
    /// Latest end the bottom edge may reach.
    pub ceiling: u32,
}

impl Default for ResizeBounds {
    fn default() -> Self {
        Self {
            floor: 0,
            ceiling: MINUTES_PER_DAY,
        }
    }
}

impl ResizeBounds {
    /// Bounds for `item_id` at `original`: the end of the closest item above
    /// and the start of the closest item below.
    pub fn from_track(item_id: PlanItemId, original: TimeRange, track: &[TrackSlot]) -> Self {
        track
            .iter()
            .filter(|slot| slot.item_id != item_id)
            .fold(Self::default(), |mut bounds, slot| {
                if slot.range.end_minutes() <= original.start_minutes {
                    bounds.floor = bounds.floor.max(slot.range.end_minutes());
                } else if slot.range.start_minutes >= original.end_minutes() {
                    bounds.ceiling = bounds.ceiling.min(slot.range.start_minutes);
                }
                bounds
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeController {
    rules: SnapRules,
    mapper: CoordinateMapper,
}

impl ResizeController {
    pub fn new(rules: SnapRules, mapper: CoordinateMapper) -> Self {
        Self { rules, mapper }
    }

    /// Resize from a pointer delta in pixels (positive is downwards).
    pub fn resize_by_pixels(
        &self,
        edge: ResizeEdge,
        original: TimeRange,
        delta_px: f32,
        bounds: ResizeBounds,
    ) -> Result<TimeRange, ResizeRejected> {
        let delta = self.mapper.delta_to_minutes(delta_px);
        self.resize(edge, original, delta, bounds)
    }

    /// Bottom edge: `max(min, snap(duration + delta))`, start fixed, end
    /// capped at `bounds.ceiling`.
    ///
    /// Top edge: `max(min, snap(duration - delta))` with the end fixed; the
    /// start is recomputed, snapped and kept at or after `bounds.floor`.
    pub fn resize(
        &self,
        edge: ResizeEdge,
        original: TimeRange,
        delta_minutes: i32,
        bounds: ResizeBounds,
    ) -> Result<TimeRange, ResizeRejected> {
        let candidate = match edge {
            ResizeEdge::Bottom => {
                let duration = self
                    .rules
                    .snap_duration(original.duration_minutes as i32 + delta_minutes);
                let end = (original.start_minutes + duration).min(bounds.ceiling);
                TimeRange::new(
                    original.start_minutes,
                    end.saturating_sub(original.start_minutes),
                )
            }
            ResizeEdge::Top => {
                let end = original.end_minutes();
                let duration = self
                    .rules
                    .snap_duration(original.duration_minutes as i32 - delta_minutes);
                let raw_start = end.saturating_sub(duration).max(bounds.floor);
                let start = (self.rules.snap(raw_start as i32).max(0) as u32).max(bounds.floor);
                TimeRange::new(start, end.saturating_sub(start))
            }
        };

        if candidate.duration_minutes < self.rules.min_duration_minutes {
            log::debug!(
                "Rejected {:?} resize frame of {:?}: {:?}",
                edge,
                original,
                candidate
            );
            return Err(ResizeRejected::BelowMinimum {
                duration: candidate.duration_minutes,
                minimum: self.rules.min_duration_minutes,
            });
        }
        Ok(candidate)
    }
}
