//! Configuration type definitions

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::parallel::{DEFAULT_MAX_WORKERS, DEFAULT_TASK_TIMEOUT};
use crate::domain::services::{DEFAULT_EXCLUSIONS, DEFAULT_INCLUSIONS};
use crate::domain::value_objects::DebounceInterval;
use crate::error::{TexforgeError, TexforgeResult};

use super::loader::{self, ConfigWarning};

/// LaTeX engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_command")]
    pub command: String,

    /// Extra arguments placed before the standard ones
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_engine_command(),
            args: Vec::new(),
        }
    }
}

fn default_engine_command() -> String {
    "pdflatex".to_string()
}

/// Build output and batch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Relative paths resolve against each template's directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Keep `.aux`, `.log` and friends after a build
    #[serde(default)]
    pub keep_aux: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_concurrency: default_max_concurrency(),
            timeout: default_timeout(),
            keep_aux: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_timeout() -> Duration {
    DEFAULT_TASK_TIMEOUT
}

/// Raster format produced by the image converter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Tiff,
}

impl ImageFormat {
    /// Converter flag selecting this format
    pub fn flag(&self) -> &'static str {
        match self {
            ImageFormat::Png => "-png",
            ImageFormat::Jpeg => "-jpeg",
            ImageFormat::Tiff => "-tiff",
        }
    }

    /// Extension of the files the converter writes
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Tiff => "tif",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Tiff => "tiff",
        };
        f.write_str(name)
    }
}

impl FromStr for ImageFormat {
    type Err = TexforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "tiff" | "tif" => Ok(ImageFormat::Tiff),
            other => Err(TexforgeError::InvalidArgument(format!(
                "unsupported image format '{other}' (expected png, jpeg or tiff)"
            ))),
        }
    }
}

/// PDF-to-image conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub format: ImageFormat,

    #[serde(default = "default_dpi")]
    pub dpi: u32,

    #[serde(default = "default_image_command")]
    pub command: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: ImageFormat::default(),
            dpi: default_dpi(),
            command: default_image_command(),
        }
    }
}

fn default_dpi() -> u32 {
    150
}

fn default_image_command() -> String {
    "pdftoppm".to_string()
}

/// Watch mode defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default)]
    pub debounce: DebounceInterval,

    #[serde(default = "default_exclusions")]
    pub exclude: Vec<String>,

    #[serde(default = "default_inclusions")]
    pub include: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce: DebounceInterval::default(),
            exclude: default_exclusions(),
            include: default_inclusions(),
        }
    }
}

fn default_exclusions() -> Vec<String> {
    DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_inclusions() -> Vec<String> {
    DEFAULT_INCLUSIONS.iter().map(|s| s.to_string()).collect()
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> TexforgeResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> TexforgeResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from project config, user config, or defaults
    pub fn load_or_default(project_root: Option<&Path>) -> TexforgeResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(project_root)
    }

    /// Apply environment variable overrides (TEXFORGE_* prefix)
    pub fn with_env_overrides(self) -> TexforgeResult<Self> {
        loader::with_env_overrides(self)
    }

    /// Reject values that would only fail later, mid-build
    pub fn validate(&self) -> TexforgeResult<()> {
        if self.engine.command.trim().is_empty() {
            return Err(TexforgeError::InvalidArgument(
                "engine.command must not be empty".to_string(),
            ));
        }
        if self.build.max_concurrency == 0 {
            return Err(TexforgeError::InvalidArgument(
                "build.max_concurrency must be greater than zero".to_string(),
            ));
        }
        if self.build.timeout.is_zero() {
            return Err(TexforgeError::InvalidArgument(
                "build.timeout must be greater than zero".to_string(),
            ));
        }
        if self.images.dpi == 0 {
            return Err(TexforgeError::InvalidArgument(
                "images.dpi must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
