//! Authoritative storage of plan items.
//!
//! Items live in an arena keyed by their stable id. Each item is either in
//! the pool or on exactly one day track; moving between the two transfers
//! the entry, it never copies it. Tracks keep their items in commit order,
//! which is also the order the conflict resolver scans.
//!
//! `commit_*` calls do not check for overlaps. Callers pass placements
//! through the conflict resolver and resizes through the resize controller
//! first.

mod persistence;

use std::collections::HashMap;

use crate::models::plan_item::{
    PlaceRef, PlanItem, PlanItemBuilder, PlanItemId, PlanItemValidationError,
};
use crate::models::time_range::{Placement, SnapRules, TimeRange};
use crate::services::conflict::{find_overlap, TrackSlot};

pub use persistence::{
    load_snapshot, save_snapshot, PlannerSnapshot, ScheduledEntry, SNAPSHOT_VERSION,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Unknown plan item {0}")]
    UnknownItem(PlanItemId),
    #[error("Plan item {0} is not scheduled")]
    NotScheduled(PlanItemId),
    #[error("Day {day} is outside the trip ({total} days)")]
    DayOutOfRange { day: usize, total: usize },
    #[error(transparent)]
    Invalid(#[from] PlanItemValidationError),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    item: PlanItem,
    placement: Option<Placement>,
}

/// Why an entry was sent back to the pool while restoring a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreIssue {
    DayOutsideTrip { item_id: PlanItemId, day_index: usize },
    Overlapping { item_id: PlanItemId, other: PlanItemId },
    OffGrid { item_id: PlanItemId },
    DuplicateId { item_id: PlanItemId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleStore {
    entries: HashMap<PlanItemId, Entry>,
    pool: Vec<PlanItemId>,
    tracks: Vec<Vec<PlanItemId>>,
    next_id: u64,
}

impl ScheduleStore {
    pub fn new(day_count: usize) -> Self {
        Self {
            entries: HashMap::new(),
            pool: Vec::new(),
            tracks: vec![Vec::new(); day_count],
            next_id: 1,
        }
    }

    pub fn day_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    fn allocate_id(&mut self) -> PlanItemId {
        let id = PlanItemId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Build an item with a fresh id and put it in the pool.
    pub fn add_to_pool(&mut self, builder: PlanItemBuilder) -> Result<PlanItemId, StoreError> {
        let id = PlanItemId(self.next_id);
        let item = builder.build(id)?;
        self.next_id += 1;
        self.pool.push(id);
        self.entries.insert(id, Entry { item, placement: None });
        log::debug!("Added item {} to the pool", id);
        Ok(id)
    }

    pub fn get(&self, id: PlanItemId) -> Option<&PlanItem> {
        self.entries.get(&id).map(|e| &e.item)
    }

    pub fn contains(&self, id: PlanItemId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn placement(&self, id: PlanItemId) -> Option<Placement> {
        self.entries.get(&id).and_then(|e| e.placement)
    }

    pub fn is_scheduled(&self, id: PlanItemId) -> bool {
        self.placement(id).is_some()
    }

    /// Pool items in insertion order.
    pub fn pool(&self) -> impl Iterator<Item = &PlanItem> + '_ {
        self.pool.iter().filter_map(|id| self.get(*id))
    }

    /// Slots of a day track in commit order. Empty for unknown days.
    pub fn track(&self, day_index: usize) -> Vec<TrackSlot> {
        self.tracks
            .get(day_index)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| {
                        self.placement(*id).map(|p| TrackSlot {
                            item_id: *id,
                            range: p.range,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Items of a day sorted by start time, for rendering.
    pub fn day_items(&self, day_index: usize) -> Vec<(&PlanItem, TimeRange)> {
        let mut items: Vec<(&PlanItem, TimeRange)> = self
            .track(day_index)
            .into_iter()
            .filter_map(|slot| self.get(slot.item_id).map(|item| (item, slot.range)))
            .collect();
        items.sort_by_key(|(item, range)| (range.start_minutes, item.id));
        items
    }

    fn check_day(&self, day_index: usize) -> Result<(), StoreError> {
        if day_index >= self.tracks.len() {
            return Err(StoreError::DayOutOfRange {
                day: day_index,
                total: self.tracks.len(),
            });
        }
        Ok(())
    }

    /// Take `id` out of whatever collection currently holds it.
    fn detach(&mut self, id: PlanItemId) {
        match self.placement(id) {
            Some(p) => {
                if let Some(track) = self.tracks.get_mut(p.day_index) {
                    track.retain(|other| *other != id);
                }
            }
            None => self.pool.retain(|other| *other != id),
        }
    }

    /// Bind `id` to `placement`, moving it from the pool or from its old
    /// slot. The item joins the end of the target track's order and takes
    /// the placement's duration.
    pub fn commit_placement(
        &mut self,
        id: PlanItemId,
        placement: Placement,
    ) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::UnknownItem(id));
        }
        self.check_day(placement.day_index)?;

        self.detach(id);
        self.tracks[placement.day_index].push(id);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.placement = Some(placement);
            entry.item.duration_minutes = placement.range.duration_minutes;
        }
        log::info!(
            "Placed item {} on day {} at {:?}",
            id,
            placement.day_index,
            placement.range
        );
        Ok(())
    }

    /// Place a fresh copy of `source` at `placement`; the source stays put.
    pub fn commit_clone(
        &mut self,
        source: PlanItemId,
        placement: Placement,
    ) -> Result<PlanItemId, StoreError> {
        let item = self.get(source).ok_or(StoreError::UnknownItem(source))?.clone();
        self.check_day(placement.day_index)?;

        let id = self.allocate_id();
        let mut copy = item.cloned_as(id);
        copy.duration_minutes = placement.range.duration_minutes;
        self.entries.insert(
            id,
            Entry {
                item: copy,
                placement: Some(placement),
            },
        );
        self.tracks[placement.day_index].push(id);
        log::info!(
            "Cloned item {} as {} on day {} at {:?}",
            source,
            id,
            placement.day_index,
            placement.range
        );
        Ok(id)
    }

    /// Replace the interval of a scheduled item, keeping its track position.
    pub fn commit_resize(
        &mut self,
        id: PlanItemId,
        placement: Placement,
    ) -> Result<(), StoreError> {
        let current = self
            .entries
            .get(&id)
            .ok_or(StoreError::UnknownItem(id))?
            .placement
            .ok_or(StoreError::NotScheduled(id))?;
        if current.day_index != placement.day_index {
            return self.commit_placement(id, placement);
        }

        if let Some(entry) = self.entries.get_mut(&id) {
            entry.placement = Some(placement);
            entry.item.duration_minutes = placement.range.duration_minutes;
        }
        log::info!("Resized item {} to {:?}", id, placement.range);
        Ok(())
    }

    /// Return a scheduled item to the end of the pool.
    pub fn unschedule(&mut self, id: PlanItemId) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::UnknownItem(id));
        }
        if !self.is_scheduled(id) {
            return Ok(());
        }
        self.detach(id);
        self.pool.push(id);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.placement = None;
        }
        log::info!("Returned item {} to the pool", id);
        Ok(())
    }

    /// Delete an item permanently.
    pub fn remove(&mut self, id: PlanItemId) -> Result<PlanItem, StoreError> {
        if !self.contains(id) {
            return Err(StoreError::UnknownItem(id));
        }
        self.detach(id);
        let entry = self.entries.remove(&id).ok_or(StoreError::UnknownItem(id))?;
        log::info!("Removed item {}", id);
        Ok(entry.item)
    }

    pub fn set_place(&mut self, id: PlanItemId, place: Option<PlaceRef>) -> Result<(), StoreError> {
        let entry = self.entries.get_mut(&id).ok_or(StoreError::UnknownItem(id))?;
        entry.item.place = place;
        Ok(())
    }

    /// Change the number of day tracks. Items on dropped days go back to the
    /// pool; their ids are returned.
    pub fn set_day_count(&mut self, day_count: usize) -> Vec<PlanItemId> {
        let mut returned = Vec::new();
        if day_count < self.tracks.len() {
            for track in self.tracks.drain(day_count..) {
                returned.extend(track);
            }
            for id in &returned {
                if let Some(entry) = self.entries.get_mut(id) {
                    entry.placement = None;
                }
                self.pool.push(*id);
            }
        }
        self.tracks.resize(day_count, Vec::new());
        returned
    }

    /// First day with two overlapping items, if any.
    pub fn first_overlap(&self) -> Option<(usize, PlanItemId, PlanItemId)> {
        (0..self.tracks.len())
            .find_map(|day| find_overlap(&self.track(day)).map(|(a, b)| (day, a, b)))
    }

    /// Pool items followed by scheduled entries in per-day commit order.
    pub fn export(&self) -> (Vec<PlanItem>, Vec<ScheduledEntry>) {
        let pool = self.pool().cloned().collect();
        let scheduled = (0..self.tracks.len())
            .flat_map(|day| self.track(day))
            .filter_map(|slot| {
                let entry = self.entries.get(&slot.item_id)?;
                let placement = entry.placement?;
                Some(ScheduledEntry {
                    item: entry.item.clone(),
                    day_index: placement.day_index,
                    range: placement.range,
                })
            })
            .collect();
        (pool, scheduled)
    }

    /// Rebuild a store from exported items.
    ///
    /// Scheduled entries that fall outside the trip, are off the snap grid
    /// or overlap an entry restored before them go to the pool instead; the
    /// reasons are returned. Duplicate ids keep the first occurrence.
    pub fn restore(
        day_count: usize,
        pool: Vec<PlanItem>,
        scheduled: Vec<ScheduledEntry>,
        next_id: u64,
        rules: SnapRules,
    ) -> (Self, Vec<RestoreIssue>) {
        let mut store = Self::new(day_count);
        let mut issues = Vec::new();
        let mut highest = 0;

        let mut demoted = Vec::new();
        for entry in scheduled {
            let id = entry.item.id;
            if store.contains(id) {
                issues.push(RestoreIssue::DuplicateId { item_id: id });
                continue;
            }
            highest = highest.max(id.0);
            let placement = Placement::new(entry.day_index, entry.range);

            let issue = if entry.day_index >= day_count {
                Some(RestoreIssue::DayOutsideTrip {
                    item_id: id,
                    day_index: entry.day_index,
                })
            } else if !entry.range.fits_in_day() || !rules.admits(&entry.range) {
                Some(RestoreIssue::OffGrid { item_id: id })
            } else {
                store
                    .track(entry.day_index)
                    .iter()
                    .find(|slot| slot.range.overlaps(&entry.range))
                    .map(|slot| RestoreIssue::Overlapping {
                        item_id: id,
                        other: slot.item_id,
                    })
            };

            match issue {
                Some(issue) => {
                    issues.push(issue);
                    demoted.push(entry.item);
                }
                None => {
                    let mut item = entry.item;
                    item.duration_minutes = placement.range.duration_minutes;
                    store.entries.insert(
                        id,
                        Entry {
                            item,
                            placement: Some(placement),
                        },
                    );
                    store.tracks[entry.day_index].push(id);
                }
            }
        }

        for item in pool.into_iter().chain(demoted) {
            let id = item.id;
            if store.contains(id) {
                issues.push(RestoreIssue::DuplicateId { item_id: id });
                continue;
            }
            highest = highest.max(id.0);
            store.pool.push(id);
            store.entries.insert(id, Entry { item, placement: None });
        }

        store.next_id = next_id.max(highest.saturating_add(1));
        (store, issues)
    }
}
