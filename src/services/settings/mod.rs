// Settings file service
// Loads and saves PlannerSettings as TOML under the platform config dir.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::PlannerSettings;

const CONFIG_FILE: &str = "settings.toml";

/// Platform config location, e.g. `~/.config/trip-planner/settings.toml`.
pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("com", "KenBoyle", "TripPlanner") {
        dirs.config_dir().join(CONFIG_FILE)
    } else {
        log::warn!("Unable to resolve project directory; using current dir for settings");
        PathBuf::from(CONFIG_FILE)
    }
}

/// Default location of the saved trip plan.
pub fn default_plan_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("com", "KenBoyle", "TripPlanner") {
        dirs.data_dir().join("trip.json")
    } else {
        log::warn!("Unable to resolve project directory; using current dir for the trip plan");
        PathBuf::from("trip.json")
    }
}

/// Read settings from `path`. A missing file gives the defaults; fields
/// absent from the file keep their default values.
pub fn load_settings(path: &Path) -> Result<PlannerSettings> {
    if !path.exists() {
        log::debug!("No settings at {}, using defaults", path.display());
        return Ok(PlannerSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings from {}", path.display()))?;
    let settings = parse_settings(&content)
        .with_context(|| format!("failed to load settings from {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

pub fn parse_settings(content: &str) -> Result<PlannerSettings> {
    let settings: PlannerSettings = toml::from_str(content)?;
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings: {}", e))?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &PlannerSettings) -> Result<()> {
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings: {}", e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(settings)?;
    fs::write(path, content)
        .with_context(|| format!("failed to write settings to {}", path.display()))?;
    Ok(())
}
