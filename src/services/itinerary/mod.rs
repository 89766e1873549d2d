// Itinerary text export
// Renders the planner as a plain-text day-by-day listing.

use std::fmt::Write;

use crate::models::plan_item::PlanItem;
use crate::services::planner::Planner;
use crate::utils::date::{day_label, format_duration, format_range};

/// Options for the text export
#[derive(Debug, Clone)]
pub struct ItineraryOptions {
    pub include_places: bool,
    pub include_memos: bool,
    pub include_costs: bool,
    /// Append the unscheduled pool after the days.
    pub include_pool: bool,
}

impl Default for ItineraryOptions {
    fn default() -> Self {
        Self {
            include_places: true,
            include_memos: false,
            include_costs: true,
            include_pool: true,
        }
    }
}

/// Render every day of the trip, items in start order.
pub fn render(planner: &Planner, options: &ItineraryOptions) -> String {
    let trip = planner.trip();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} – {})",
        trip.title,
        trip.start_date.format("%d %b %Y"),
        trip.end_date.format("%d %b %Y")
    );

    let mut total_cost = 0.0;
    for day in 0..planner.day_count() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", day_label(day, trip.date_of(day)));

        let items = planner.store().day_items(day);
        if items.is_empty() {
            let _ = writeln!(out, "  (nothing planned)");
            continue;
        }
        for (item, range) in items {
            let _ = writeln!(
                out,
                "  {}  {} [{}]",
                format_range(&range),
                item.title,
                item.category.label()
            );
            write_details(&mut out, item, options);
            total_cost += item.cost.unwrap_or(0.0);
        }
    }

    if options.include_pool {
        let pool: Vec<&PlanItem> = planner.store().pool().collect();
        if !pool.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Unscheduled");
            for item in pool {
                let _ = writeln!(
                    out,
                    "  {} ({})",
                    item.title,
                    format_duration(item.duration_minutes)
                );
            }
        }
    }

    if options.include_costs && total_cost > 0.0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "Scheduled cost: {:.2}", total_cost);
    }
    out
}

fn write_details(out: &mut String, item: &PlanItem, options: &ItineraryOptions) {
    if options.include_places {
        if let Some(place) = &item.place {
            if place.address.is_empty() {
                let _ = writeln!(out, "      📍 {}", place.name);
            } else {
                let _ = writeln!(out, "      📍 {}, {}", place.name, place.address);
            }
        }
    }
    if options.include_memos {
        if let Some(memo) = item.memo.as_deref().filter(|m| !m.is_empty()) {
            let _ = writeln!(out, "      {}", memo);
        }
    }
    if options.include_costs {
        if let Some(cost) = item.cost {
            let _ = writeln!(out, "      {:.2}", cost);
        }
    }
}
