//! Game settings and preferences
//!
//! Stored as JSON next to the game data. Unknown or missing fields fall back
//! to their defaults so older settings files keep loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH, TICK_RATE, TILE_SIZE};
use crate::persistence::atomic_io;
use crate::sim::state::GameConfig;

/// Failure to read or write the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read/write settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Game and editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    /// Low-resolution game display in pixels
    pub display_width: u32,
    pub display_height: u32,
    /// Window the game display is scaled into
    pub window_width: u32,
    pub window_height: u32,
    /// Editor display and window
    pub editor_display_width: u32,
    pub editor_display_height: u32,
    pub editor_window_width: u32,
    pub editor_window_height: u32,
    /// Window pixels per editor display pixel
    pub render_scale: f32,

    // === Simulation ===
    /// Ticks per second
    pub tick_rate: u32,
    pub tile_size: i32,
    /// Seed for the simulation RNG
    pub seed: u64,
    pub cloud_count: usize,

    // === Data ===
    pub maps_dir: PathBuf,
    pub images_dir: PathBuf,
    /// Level loaded at startup, e.g. "02" for `maps/02.json`
    pub starting_level: String,
    /// Map file the editor opens and saves
    pub editor_map: PathBuf,

    // === Accessibility ===
    /// Screen shake on deaths and kills
    pub screen_shake: bool,
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_width: DISPLAY_WIDTH as u32,
            display_height: DISPLAY_HEIGHT as u32,
            window_width: 1920,
            window_height: 1080,
            editor_display_width: 320,
            editor_display_height: 240,
            editor_window_width: 640,
            editor_window_height: 480,
            render_scale: 2.0,

            tick_rate: TICK_RATE,
            tile_size: TILE_SIZE,
            seed: 0,
            cloud_count: 16,

            maps_dir: PathBuf::from("data/maps"),
            images_dir: PathBuf::from("data/images"),
            starting_level: "02".to_string(),
            editor_map: PathBuf::from("map.json"),

            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Map file for a level id
    pub fn level_path(&self, level_id: &str) -> PathBuf {
        self.maps_dir.join(format!("{level_id}.json"))
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Shake magnitude to present for a simulated shake
    pub fn shake_magnitude(&self, screenshake: f32) -> f32 {
        if self.effective_screen_shake() {
            screenshake
        } else {
            0.0
        }
    }

    /// World setup derived from these settings
    pub fn game_config(&self, cloud_images: usize) -> GameConfig {
        GameConfig {
            viewport: Vec2::new(self.display_width as f32, self.display_height as f32),
            cloud_count: self.cloud_count,
            cloud_images,
        }
    }

    /// Load settings from `path`; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = serde_json::from_str(&text).map_err(|source| SettingsError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(SettingsError::Encode)?;
        atomic_io::write_text_atomic(path, &json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
