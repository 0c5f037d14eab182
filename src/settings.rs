//! Game settings and preferences
//!
//! Read from a JSON file next to the binary (or wherever
//! `ASTEROIDS_SETTINGS` points). Missing fields take their defaults; a
//! missing or broken file means all defaults. Physics constants are not
//! configurable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "ASTEROIDS_SETTINGS";
/// Settings file used when the variable is unset
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Run the adaptive heartbeat pulse
    pub heartbeat: bool,

    // === Run ===
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Let the demo autopilot fly the ship
    pub autopilot: bool,
    /// Length of a headless run in seconds
    pub demo_seconds: f32,
    /// Seconds between ASCII frame dumps at debug level (0 = never)
    pub ascii_frame_interval: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            heartbeat: true,

            // Run
            seed: None,
            autopilot: true,
            demo_seconds: 30.0,
            ascii_frame_interval: 5.0,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Load settings from a file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Where settings are read from
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Load settings, falling back to defaults
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{} - using default settings", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Clamp values into their usable ranges
    fn sanitize(&mut self) {
        self.master_volume = clamp_unit(self.master_volume);
        self.sfx_volume = clamp_unit(self.sfx_volume);
        self.demo_seconds = clamp_seconds(self.demo_seconds);
        self.ascii_frame_interval = clamp_seconds(self.ascii_frame_interval);
    }
}

/// Longest time setting accepted, so it always fits a `Duration`
const MAX_SECONDS: f32 = u32::MAX as f32;

fn clamp_seconds(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, MAX_SECONDS) } else { 0.0 }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}
