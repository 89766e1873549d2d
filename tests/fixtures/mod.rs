// Test fixtures - reusable test data
// Trips, items and planners shared by the integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use trip_planner::models::plan_item::{PlanItem, PlanItemBuilder, PlanItemCategory, PlanItemId};
use trip_planner::models::settings::PlannerSettings;
use trip_planner::models::trip::TripConfig;
use trip_planner::services::planner::{GestureOutcome, Planner};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// May `day`, 2025
    pub fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }
}

/// Sample plan items for testing
pub mod items {
    use super::*;

    pub fn museum() -> PlanItemBuilder {
        PlanItem::builder()
            .title("Serralves Museum")
            .category(PlanItemCategory::Sightseeing)
            .duration(1, 0)
    }

    pub fn lunch() -> PlanItemBuilder {
        PlanItem::builder()
            .title("Francesinha lunch")
            .category(PlanItemCategory::Food)
            .duration(1, 0)
            .cost(14.5)
    }

    pub fn river_cruise() -> PlanItemBuilder {
        PlanItem::builder()
            .title("Six bridges cruise")
            .category(PlanItemCategory::Activity)
            .duration(1, 0)
    }

    pub fn with_minutes(title: &str, minutes: u32) -> PlanItemBuilder {
        PlanItem::builder()
            .title(title)
            .category(PlanItemCategory::Other)
            .duration_minutes(minutes)
    }
}

/// A planner for a trip of `days` days starting May 1st.
pub fn planner(days: u32) -> Planner {
    planner_with(days, PlannerSettings::default())
}

pub fn planner_with(days: u32, settings: PlannerSettings) -> Planner {
    let trip = TripConfig::new("Porto weekend", dates::may(1), dates::may(days)).unwrap();
    Planner::new(trip, settings).unwrap()
}

/// Drag `id` to `day`/`hour` with the pointer `offset` pixels into the cell
/// and release there.
pub fn drop_at(
    planner: &mut Planner,
    id: PlanItemId,
    day: usize,
    hour: u32,
    offset: f32,
) -> GestureOutcome {
    planner.begin_move(id).unwrap();
    let target = planner.grid().locate(day, hour, offset);
    planner.hover(target);
    planner.release(target)
}
