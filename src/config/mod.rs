//! Configuration module for the brainstorm board
//!
//! This module handles the tunables of the canvas engine:
//! - Zoom limits and wheel zoom step
//! - Placement jitter and placeholder text for new notes
//! - Default note color, grid spacing and note width
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.brainstorm-board/`
//! - **macOS**: `~/Library/Application Support/dev.brainstorm-board/`
//! - **Windows**: `%APPDATA%\dev.brainstorm-board\`
//!
//! # Files
//!
//! - `board.toml` - Canvas settings (every field optional)
//! - `sessions.json` - Session records holding each board snapshot
//!
//! # Example
//!
//! ```ignore
//! use brainstorm_board::config::CanvasSettings;
//!
//! let settings = CanvasSettings::load_or_default();
//! assert!(settings.zoom_limits.min > 0.0);
//! settings.save()?;
//! ```

use crate::board::NodeColor;
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.brainstorm-board";

/// Canvas settings filename
pub const SETTINGS_FILE: &str = "board.toml";

/// Session store filename
pub const SESSIONS_FILE: &str = "sessions.json";

/// Default lower zoom bound
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;

/// Default upper zoom bound
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;

/// Zoom multiplier applied per wheel notch
pub const DEFAULT_WHEEL_ZOOM_FACTOR: f64 = 1.1;

/// Full width of the random square new notes are scattered over
pub const DEFAULT_ADD_JITTER: f64 = 50.0;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        BoardError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            BoardError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the canvas settings file
pub fn settings_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(SETTINGS_FILE))
}

/// Get the path to the session store file
pub fn sessions_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(SESSIONS_FILE))
}

// ==================== Zoom Limits ====================

/// Inclusive bounds applied to every zoom change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    #[serde(default = "default_min_zoom")]
    pub min: f64,
    #[serde(default = "default_max_zoom")]
    pub max: f64,
}

fn default_min_zoom() -> f64 {
    DEFAULT_MIN_ZOOM
}

fn default_max_zoom() -> f64 {
    DEFAULT_MAX_ZOOM
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

impl ZoomLimits {
    /// Both bounds finite and positive, with `min <= max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    /// These limits if valid, otherwise the defaults.
    pub fn or_default(self) -> Self {
        if self.is_valid() {
            self
        } else {
            tracing::warn!(
                min = self.min,
                max = self.max,
                "Invalid zoom limits, using defaults"
            );
            Self::default()
        }
    }

    /// Clamp a requested zoom. Returns `None` when the request is unusable
    /// (non-finite or not positive).
    pub fn clamp(&self, zoom: f64) -> Option<f64> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return None;
        }
        // f64::clamp panics when min > max or a bound is NaN
        Some(zoom.max(self.min).min(self.max))
    }
}

// ==================== Canvas Settings ====================

/// Tunables for the canvas engine and its reference frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Zoom multiplier per wheel step (zoom in on negative delta)
    #[serde(default = "default_wheel_zoom_factor")]
    pub wheel_zoom_factor: f64,

    /// Width of the square new notes are randomly scattered over
    #[serde(default = "default_add_jitter")]
    pub add_jitter: f64,

    /// Color tag given to notes created without one
    #[serde(default)]
    pub default_color: NodeColor,

    /// Content of notes created from the canvas "+" control
    #[serde(default = "default_new_node_content")]
    pub new_node_content: String,

    /// Background grid spacing in world units
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f64,

    /// Note width in world units
    #[serde(default = "default_node_width")]
    pub node_width: f64,

    /// Zoom bounds
    #[serde(default)]
    pub zoom_limits: ZoomLimits,
}

fn default_wheel_zoom_factor() -> f64 {
    DEFAULT_WHEEL_ZOOM_FACTOR
}

fn default_add_jitter() -> f64 {
    DEFAULT_ADD_JITTER
}

fn default_new_node_content() -> String {
    "New Idea".to_string()
}

fn default_grid_spacing() -> f64 {
    20.0
}

fn default_node_width() -> f64 {
    224.0
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            wheel_zoom_factor: DEFAULT_WHEEL_ZOOM_FACTOR,
            add_jitter: DEFAULT_ADD_JITTER,
            default_color: NodeColor::default(),
            new_node_content: default_new_node_content(),
            grid_spacing: default_grid_spacing(),
            node_width: default_node_width(),
            zoom_limits: ZoomLimits::default(),
        }
    }
}

impl CanvasSettings {
    /// Check that the settings describe a usable canvas
    pub fn validate(&self) -> Result<()> {
        let limits = self.zoom_limits;
        if !(limits.min.is_finite() && limits.max.is_finite()) || limits.min <= 0.0 {
            return Err(BoardError::Config(format!(
                "zoom limits must be positive and finite, got [{}, {}]",
                limits.min, limits.max
            )));
        }
        if limits.min > limits.max {
            return Err(BoardError::Config(format!(
                "zoom_limits.min ({}) exceeds zoom_limits.max ({})",
                limits.min, limits.max
            )));
        }
        if !(self.wheel_zoom_factor.is_finite() && self.wheel_zoom_factor > 1.0) {
            return Err(BoardError::Config(format!(
                "wheel_zoom_factor must be greater than 1, got {}",
                self.wheel_zoom_factor
            )));
        }
        if !(self.add_jitter.is_finite() && self.add_jitter >= 0.0) {
            return Err(BoardError::Config(format!(
                "add_jitter must be non-negative, got {}",
                self.add_jitter
            )));
        }
        if !(self.grid_spacing > 0.0 && self.node_width > 0.0) {
            return Err(BoardError::Config(
                "grid_spacing and node_width must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| BoardError::Config(format!("Failed to parse canvas settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            BoardError::Config(format!("Failed to read settings {:?}: {}", path, e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Load settings from the default location
    pub fn load() -> Result<Self> {
        let path = settings_path().ok_or_else(|| {
            BoardError::Config("Could not determine settings path".to_string())
        })?;
        Self::load_from(path)
    }

    /// Load settings, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load canvas settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings to a file as TOML
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BoardError::Config(format!("Failed to create settings directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| BoardError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            BoardError::Config(format!("Failed to write settings {:?}: {}", path, e))
        })
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(SETTINGS_FILE))
    }
}
