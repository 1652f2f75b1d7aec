//! Watch configuration and session state

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::ports::WatchDir;
use crate::domain::services::{DEFAULT_EXCLUSIONS, DEFAULT_INCLUSIONS};
use crate::domain::value_objects::DebounceInterval;

/// Everything a watch session needs to know up front
#[derive(Debug, Clone)]
pub struct WatchConfiguration {
    /// LaTeX template to rebuild
    pub template_file: PathBuf,
    /// YAML variables file
    pub config_file: PathBuf,
    pub debounce_interval: DebounceInterval,
    pub exclusion_patterns: Vec<String>,
    pub inclusion_patterns: Vec<String>,
    /// Extra directories (images, styles) watched recursively
    pub asset_dirs: Vec<PathBuf>,
}

impl WatchConfiguration {
    /// Create a configuration with default interval and pattern lists
    pub fn new(template_file: impl Into<PathBuf>, config_file: impl Into<PathBuf>) -> Self {
        Self {
            template_file: template_file.into(),
            config_file: config_file.into(),
            debounce_interval: DebounceInterval::default(),
            exclusion_patterns: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
            inclusion_patterns: DEFAULT_INCLUSIONS.iter().map(|s| s.to_string()).collect(),
            asset_dirs: Vec::new(),
        }
    }

    /// Set the debounce interval
    pub fn with_debounce(mut self, interval: DebounceInterval) -> Self {
        self.debounce_interval = interval;
        self
    }

    /// Replace the exclusion list
    pub fn with_exclusions(mut self, patterns: Vec<String>) -> Self {
        self.exclusion_patterns = patterns;
        self
    }

    /// Replace the inclusion list
    pub fn with_inclusions(mut self, patterns: Vec<String>) -> Self {
        self.inclusion_patterns = patterns;
        self
    }

    /// Add asset directories
    pub fn with_asset_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.asset_dirs.extend(dirs);
        self
    }

    /// Directories to register with the event source, without duplicates.
    ///
    /// The template and config directories are watched flat; asset
    /// directories recursively.
    pub fn watch_dirs(&self) -> Vec<WatchDir> {
        let mut dirs: Vec<WatchDir> = Vec::new();
        let mut push = |dir: WatchDir| {
            if !dirs.iter().any(|d| d.path == dir.path) {
                dirs.push(dir);
            }
        };

        push(WatchDir::flat(parent_dir(&self.template_file)));
        push(WatchDir::flat(parent_dir(&self.config_file)));
        for asset in &self.asset_dirs {
            push(WatchDir::recursive(asset.clone()));
        }
        dirs
    }
}

/// `Path::parent` of a bare file name is `""`; watch the cwd instead.
fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Lifecycle of a watch session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching,
    Rebuilding,
    Stopped,
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WatchState::Idle => "idle",
            WatchState::Watching => "watching",
            WatchState::Rebuilding => "rebuilding",
            WatchState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
