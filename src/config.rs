use crate::device_camera::interface::{CameraOptions, FacingMode};
use chrono::{FixedOffset, Offset, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CameraSource {
    Fake,
    Folder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ModelBackend {
    Color,
    Fake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LoggerBackend {
    Console,
    Tracing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub source: CameraSource,
    pub facing_mode: FacingMode,
    pub width: u32,
    pub height: u32,
    pub images_dir: Option<PathBuf>,
    /// How long the folder camera shows each image.
    pub folder_interval_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: CameraSource::Fake,
            facing_mode: FacingMode::Environment,
            width: 640,
            height: 400,
            images_dir: None,
            folder_interval_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub backend: ModelBackend,
    /// Neighbours consulted by the online classifier.
    pub knn_k: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Color,
            knn_k: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub flash_duration_ms: u64,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            flash_duration_ms: 200,
            window_width: 760.0,
            window_height: 820.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub backend: LoggerBackend,
    pub timezone_offset_hours: i32,
    pub filter: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            backend: LoggerBackend::Console,
            timezone_offset_hours: 0,
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub model: ModelConfig,
    pub ui: UiConfig,
    pub logger: LoggerConfig,
}

impl Config {
    /// Reads a TOML file; any section or key left out keeps its default.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.ui.flash_duration_ms)
    }

    pub fn folder_interval(&self) -> Duration {
        Duration::from_millis(self.camera.folder_interval_ms)
    }

    pub fn camera_options(&self) -> CameraOptions {
        CameraOptions {
            facing_mode: self.camera.facing_mode,
            width: self.camera.width,
            height: self.camera.height,
        }
    }

    pub fn logger_timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.logger.timezone_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}
