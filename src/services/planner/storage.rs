use std::path::Path;

use anyhow::Result;

use super::{Planner, PlannerError};
use crate::models::settings::PlannerSettings;
use crate::services::conflict::ConflictResolver;
use crate::services::gesture::GestureTracker;
use crate::services::grid::TimeGrid;
use crate::services::notification::{Notice, NoticeKind, NoticeLevel, NoticeQueue};
use crate::services::schedule::{
    load_snapshot, save_snapshot, PlannerSnapshot, RestoreIssue, ScheduleStore, SNAPSHOT_VERSION,
};

impl Planner {
    /// Everything needed to rebuild this planner. Gesture state is not part
    /// of it.
    pub fn snapshot(&self) -> PlannerSnapshot {
        let (pool, scheduled) = self.store.export();
        PlannerSnapshot {
            version: SNAPSHOT_VERSION,
            trip: self.trip.clone(),
            windows: self.grid.windows().to_vec(),
            compressed: self.grid.is_compressed(),
            pool,
            scheduled,
            next_id: self.store.next_id(),
        }
    }

    /// Rebuild a planner from a snapshot.
    ///
    /// The trip must be valid. Entries that no longer fit (outside the trip,
    /// off the snap grid, overlapping) are moved to the pool and reported
    /// with one Info notice.
    pub fn from_snapshot(
        snapshot: PlannerSnapshot,
        settings: PlannerSettings,
    ) -> Result<Self, PlannerError> {
        settings.validate().map_err(PlannerError::Settings)?;
        snapshot.trip.validate()?;
        let days = snapshot.trip.day_count();

        let mut windows = snapshot.windows;
        if windows.len() != days {
            log::warn!(
                "Snapshot has {} day windows for a {} day trip",
                windows.len(),
                days
            );
            windows.resize(days, settings.default_window);
        }
        let mut grid = TimeGrid::from_windows(windows, &settings);
        grid.set_compressed(snapshot.compressed);

        let (store, issues) = ScheduleStore::restore(
            days,
            snapshot.pool,
            snapshot.scheduled,
            snapshot.next_id,
            settings.snap_rules(),
        );

        let mut notices = NoticeQueue::new();
        let demoted = issues
            .iter()
            .filter(|issue| !matches!(issue, RestoreIssue::DuplicateId { .. }))
            .count();
        for issue in &issues {
            log::warn!("Restore: {:?}", issue);
        }
        if demoted > 0 {
            notices.push(Notice::new(
                format!("{} saved item(s) no longer fit and were moved to the pool", demoted),
                NoticeLevel::Info,
                NoticeKind::ReturnedToPool { count: demoted },
            ));
        }

        log::info!(
            "Restored trip \"{}\" with {} item(s) over {} day(s)",
            snapshot.trip.title,
            store.len(),
            days
        );
        Ok(Self {
            settings,
            trip: snapshot.trip,
            grid,
            store,
            gestures: GestureTracker::new(),
            resolver: ConflictResolver::new(),
            clone_source: None,
            notices,
        })
    }

    /// Write the snapshot to `path`. A failure is reported as an Error
    /// notice as well as returned; the in-memory plan is unaffected.
    pub fn save_to_disk(&mut self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot();
        match save_snapshot(path, &snapshot) {
            Ok(()) => {
                log::info!("Saved trip plan to {}", path.display());
                Ok(())
            }
            Err(err) => {
                self.notices
                    .push(Notice::persistence(format!("Could not save the trip plan: {:#}", err)));
                Err(err)
            }
        }
    }

    /// Load a planner from `path`; `None` when the file does not exist.
    pub fn load_from_disk(path: &Path, settings: PlannerSettings) -> Result<Option<Self>> {
        let Some(snapshot) = load_snapshot(path)? else {
            return Ok(None);
        };
        let planner = Self::from_snapshot(snapshot, settings)?;
        Ok(Some(planner))
    }
}
