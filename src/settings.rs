//! Game settings and preferences
//!
//! Read once at startup from an optional JSON file. A missing or broken file
//! never stops the game; defaults are used instead.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "rhythm_platformer.json";
/// Environment variable overriding the settings file path
pub const SETTINGS_ENV: &str = "RHYTHM_PLATFORMER_CONFIG";

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory holding `images/`, `audio.mp3` and `font.ttf`
    pub asset_dir: PathBuf,

    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub music_enabled: bool,

    // === Run ===
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === Display ===
    /// Window size multiplier over the 800x400 logical resolution
    pub window_scale: f32,
    /// Show FPS in the window title
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            music_volume: 0.5,
            music_enabled: true,
            seed: None,
            window_scale: 1.0,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse settings from JSON; unspecified fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Settings file path, honoring the environment override
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    /// Load settings, falling back to defaults
    pub fn load() -> Self {
        let path = Self::path();
        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Clamp values into their valid ranges
    pub fn sanitized(mut self) -> Self {
        self.music_volume = if self.music_volume.is_finite() {
            self.music_volume.clamp(0.0, 1.0)
        } else {
            Self::default().music_volume
        };
        if !self.window_scale.is_finite() || self.window_scale <= 0.0 {
            self.window_scale = 1.0;
        }
        self
    }

    /// Effective music volume (respects the enable switch)
    pub fn effective_music_volume(&self) -> f32 {
        if self.music_enabled {
            self.music_volume
        } else {
            0.0
        }
    }
}
