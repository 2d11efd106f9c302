//! Configuration file support for markcrop.
//!
//! Settings are stored as versioned JSON. Every section falls back to its
//! defaults when missing, so a config file only needs the values it changes.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::ExportFormat;
use crate::constants::{
    CROP_HANDLE_SIZE, DEFAULT_BLUR_RADIUS, DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
    DRAW_THRESHOLD, HANDLE_SIZE, HANDLE_TOLERANCE, MAX_ZOOM, MIN_CROP_SIZE, MIN_SHAPE_SIZE,
    MIN_ZOOM, ZOOM_STEP,
};
use crate::coords::ZoomLimits;
use crate::hit_test::HandleModel;
use crate::interaction::{InteractionSettings, ToolSettings};
use crate::model::{ShapeKind, ShapeStyle};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,
    pub viewport: ViewportConfig,
    pub zoom: ZoomConfig,
    pub interaction: InteractionConfig,
    pub tool: ToolConfig,
    pub export: ExportConfig,
    pub blur: BlurConfig,
    /// Log verbosity level
    pub log_level: LogLevel,
}

/// Fit-to-viewport cap applied when an image is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_VIEWPORT_WIDTH,
            max_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: MIN_ZOOM,
            max: MAX_ZOOM,
            step: ZOOM_STEP,
        }
    }
}

/// Handle sizes and gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub handle_size: i32,
    pub handle_tolerance: i32,
    pub crop_handle_size: i32,
    pub min_shape_size: i32,
    pub min_crop_size: i32,
    pub draw_threshold: i32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            handle_size: HANDLE_SIZE,
            handle_tolerance: HANDLE_TOLERANCE,
            crop_handle_size: CROP_HANDLE_SIZE,
            min_shape_size: MIN_SHAPE_SIZE,
            min_crop_size: MIN_CROP_SIZE,
            draw_threshold: DRAW_THRESHOLD,
        }
    }
}

/// Initial drawing tool. Style fields sit next to `shape`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub shape: ShapeKind,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Gaussian sigma in source pixels
    pub radius: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BLUR_RADIUS,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            viewport: ViewportConfig::default(),
            zoom: ZoomConfig::default(),
            interaction: InteractionConfig::default(),
            tool: ToolConfig::default(),
            export: ExportConfig::default(),
            blur: BlurConfig::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "markcrop.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("markcrop").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("markcrop")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from the default path.
    /// Returns `Ok(None)` when there is no config location or no file there.
    pub fn load_from_default_path() -> Result<Option<Self>, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_if_exists(&path),
            None => Ok(None),
        }
    }

    /// Load `path` if it exists. A file that exists but cannot be read or
    /// parsed is an error, not a fallback to defaults.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.zoom.min,
            max: self.zoom.max,
            step: self.zoom.step,
        }
    }

    pub fn interaction_settings(&self) -> InteractionSettings {
        let i = &self.interaction;
        InteractionSettings {
            shape_handles: HandleModel {
                size: i.handle_size,
                tolerance: i.handle_tolerance,
            },
            crop_handles: HandleModel {
                size: i.crop_handle_size,
                tolerance: i.handle_tolerance,
            },
            min_shape_size: i.min_shape_size,
            min_crop_size: i.min_crop_size,
            draw_threshold: i.draw_threshold,
        }
    }

    pub fn tool_settings(&self) -> ToolSettings {
        ToolSettings::new(self.tool.shape, self.tool.style)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
