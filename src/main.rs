// Trip Planner
// Prints the itinerary of a saved trip plan

use std::path::PathBuf;

use anyhow::{Context, Result};

use trip_planner::services::itinerary::{self, ItineraryOptions};
use trip_planner::services::planner::Planner;
use trip_planner::services::settings::{default_config_path, default_plan_path, load_settings};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let plan_path = args.next().map(PathBuf::from).unwrap_or_else(default_plan_path);
    let settings_path = args.next().map(PathBuf::from).unwrap_or_else(default_config_path);

    log::info!("Starting Trip Planner");

    let settings = match load_settings(&settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load settings: {:#}, using defaults", e);
            Default::default()
        }
    };

    let mut planner = Planner::load_from_disk(&plan_path, settings)
        .with_context(|| format!("failed to open trip plan {}", plan_path.display()))?
        .with_context(|| format!("no trip plan at {}", plan_path.display()))?;

    for notice in planner.drain_notices() {
        eprintln!("{}", notice.display());
    }
    print!("{}", itinerary::render(&planner, &ItineraryOptions::default()));
    Ok(())
}
