//! Overlap detection and resolution for a single day track.
//!
//! Resolution is a pure function of the candidate and the track contents;
//! the same inputs always produce the same [`Resolution`].

use crate::models::plan_item::PlanItemId;
use crate::models::time_range::{TimeRange, MINUTES_PER_DAY};
use crate::services::placement::Candidate;
use crate::utils::date::format_clock;

/// One scheduled interval on a track, in track order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSlot {
    pub item_id: PlanItemId,
    pub range: TimeRange,
}

/// Outcome of checking a candidate against a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No overlap; the candidate stands.
    Clear(TimeRange),
    /// The candidate overlapped `conflicting` and was moved to its end.
    Shifted {
        original: TimeRange,
        resolved: TimeRange,
        conflicting: PlanItemId,
    },
    /// The single shift did not produce a free interval: it landed on
    /// `blocker`, or ran past midnight when `blocker` is `None`.
    Blocked {
        original: TimeRange,
        shifted: TimeRange,
        conflicting: PlanItemId,
        blocker: Option<PlanItemId>,
    },
}

impl Resolution {
    /// Interval the strategy settled on, blocked or not.
    pub fn range(&self) -> TimeRange {
        match *self {
            Resolution::Clear(range) => range,
            Resolution::Shifted { resolved, .. } => resolved,
            Resolution::Blocked { shifted, .. } => shifted,
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Resolution::Clear(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Resolution::Blocked { .. })
    }

    /// Short user-facing description, `None` when there was no conflict.
    pub fn describe(&self) -> Option<String> {
        match *self {
            Resolution::Clear(_) => None,
            Resolution::Shifted {
                original, resolved, ..
            } => Some(format!(
                "Time conflict: moved from {} to {}",
                format_clock(original.start_minutes),
                format_clock(resolved.start_minutes)
            )),
            Resolution::Blocked {
                original,
                blocker: Some(_),
                ..
            } => Some(format!(
                "Time conflict at {}: no free slot after the overlapping item",
                format_clock(original.start_minutes)
            )),
            Resolution::Blocked {
                original,
                blocker: None,
                ..
            } => Some(format!(
                "Time conflict at {}: shifting would run past midnight",
                format_clock(original.start_minutes)
            )),
        }
    }
}

/// A conflict resolution strategy.
pub trait ResolutionStrategy {
    fn resolve(&self, candidate: TimeRange, others: &[TrackSlot]) -> Resolution;
}

/// Greedy single shift: move the candidate to the end of the first
/// overlapping item in track order, keeping its duration. The shifted
/// interval is checked once more only to report `Blocked`; there is no
/// search for a later free slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstFitShift;

impl ResolutionStrategy for FirstFitShift {
    fn resolve(&self, candidate: TimeRange, others: &[TrackSlot]) -> Resolution {
        let Some(first) = others.iter().find(|slot| candidate.overlaps(&slot.range)) else {
            return Resolution::Clear(candidate);
        };

        let shifted = candidate.with_start(first.range.end_minutes());
        if shifted.end_minutes() > MINUTES_PER_DAY {
            return Resolution::Blocked {
                original: candidate,
                shifted,
                conflicting: first.item_id,
                blocker: None,
            };
        }

        match others.iter().find(|slot| shifted.overlaps(&slot.range)) {
            Some(blocker) => Resolution::Blocked {
                original: candidate,
                shifted,
                conflicting: first.item_id,
                blocker: Some(blocker.item_id),
            },
            None => Resolution::Shifted {
                original: candidate,
                resolved: shifted,
                conflicting: first.item_id,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver<S = FirstFitShift> {
    strategy: S,
}

impl ConflictResolver<FirstFitShift> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: ResolutionStrategy> ConflictResolver<S> {
    pub fn with_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    /// Check `candidate` against the slots of its day track. The item the
    /// candidate excludes (a moved item's old slot) is skipped.
    pub fn resolve(&self, candidate: &Candidate, track: &[TrackSlot]) -> Resolution {
        let others: Vec<TrackSlot> = track
            .iter()
            .copied()
            .filter(|slot| Some(slot.item_id) != candidate.exclude)
            .collect();
        let resolution = self.strategy.resolve(candidate.placement.range, &others);
        log::debug!(
            "Resolved candidate {:?} on day {}: {:?}",
            candidate.placement.range,
            candidate.placement.day_index,
            resolution
        );
        resolution
    }
}

/// First pair of overlapping slots on a track, if any.
pub fn find_overlap(track: &[TrackSlot]) -> Option<(PlanItemId, PlanItemId)> {
    for (i, a) in track.iter().enumerate() {
        for b in &track[i + 1..] {
            if a.range.overlaps(&b.range) {
                return Some((a.item_id, b.item_id));
            }
        }
    }
    None
}
