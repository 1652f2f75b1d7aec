//! Configuration module for texforge
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (TEXFORGE_*)
//! 3. Project config (`texforge.toml` in the working directory)
//! 4. User config (`~/.config/texforge/config.toml`)
//! 5. Built-in defaults (lowest priority)
//!
//! Only the first config file found is read; files are not merged.

mod loader;
mod types;

pub use loader::{user_config_path, ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{BuildConfig, Config, EngineConfig, ImageFormat, ImagesConfig, WatchConfig};
