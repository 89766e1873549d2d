use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{self, Error as SerdeError};

use crate::models::day_window::HourWindow;
use crate::models::plan_item::PlanItem;
use crate::models::time_range::TimeRange;
use crate::models::trip::TripConfig;

pub const SNAPSHOT_VERSION: u32 = 1;

/// A scheduled item as it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEntry {
    pub item: PlanItem,
    pub day_index: usize,
    pub range: TimeRange,
}

/// Everything needed to rebuild a planner: trip, day windows, pool and
/// scheduled items in per-day commit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub trip: TripConfig,
    pub windows: Vec<HourWindow>,
    #[serde(default)]
    pub compressed: bool,
    #[serde(default)]
    pub pool: Vec<PlanItem>,
    #[serde(default)]
    pub scheduled: Vec<ScheduledEntry>,
    #[serde(default)]
    pub next_id: u64,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Read a snapshot. A missing file is not an error and yields `None`.
pub fn load_snapshot(path: &Path) -> Result<Option<PlannerSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read trip plan from {}", path.display()))?;
    let snapshot: PlannerSnapshot =
        serde_json::from_str(&data).map_err(|err| map_deser_error(err, path))?;
    if snapshot.version > SNAPSHOT_VERSION {
        log::warn!(
            "Trip plan {} has version {}, newer than supported {}",
            path.display(),
            snapshot.version,
            SNAPSHOT_VERSION
        );
    }
    Ok(Some(snapshot))
}

pub fn save_snapshot(path: &Path, snapshot: &PlannerSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }

    let data = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, data)
        .with_context(|| format!("failed to write trip plan to {}", path.display()))?;
    Ok(())
}

fn map_deser_error(err: SerdeError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!(
        "failed to deserialize trip plan from {}",
        path.display()
    ))
}
