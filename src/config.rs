//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GanttError, Result};
use crate::timeline::{TimelineViewport, ViewMode};

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "DATASIGHT_LOG";

const SETTINGS_FILE: &str = "settings.json";

/// Zoom level remembered for each view mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelScale {
    pub day: f32,
    pub week: f32,
    pub month: f32,
}

impl Default for PixelScale {
    fn default() -> Self {
        Self {
            day: ViewMode::Day.default_pixels_per_unit(),
            week: ViewMode::Week.default_pixels_per_unit(),
            month: ViewMode::Month.default_pixels_per_unit(),
        }
    }
}

impl PixelScale {
    pub fn get(&self, view: ViewMode) -> f32 {
        match view {
            ViewMode::Day => self.day,
            ViewMode::Week => self.week,
            ViewMode::Month => self.month,
        }
    }

    pub fn set(&mut self, view: ViewMode, pixels_per_unit: f32) {
        match view {
            ViewMode::Day => self.day = pixels_per_unit,
            ViewMode::Week => self.week = pixels_per_unit,
            ViewMode::Month => self.month = pixels_per_unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_view: ViewMode,
    pub highlight_critical: bool,
    pub pixels_per_unit: PixelScale,
    pub last_project: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_view: ViewMode::Week,
            highlight_critical: true,
            pixels_per_unit: PixelScale::default(),
            last_project: None,
        }
    }
}

impl Settings {
    /// `<config dir>/DataSight/settings.json`, if the OS has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "DataSight")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Load from the default location. Missing or unreadable settings fall
    /// back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("no config directory available, using default settings");
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "no settings file yet");
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to read settings, using defaults");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
        serde_json::from_str(&json).map_err(|e| GanttError::Config(e.to_string()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()
            .ok_or_else(|| GanttError::Config("no config directory available".to_string()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| GanttError::io(dir, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| GanttError::io(path, e))
    }

    /// Viewport for `view` at its remembered zoom.
    pub fn viewport(&self, view: ViewMode) -> TimelineViewport {
        TimelineViewport::new(view, self.pixels_per_unit.get(view))
    }
}
