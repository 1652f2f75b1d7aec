//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::value_objects::{parse_duration, DebounceInterval};
use crate::error::{TexforgeError, TexforgeResult};

use super::types::Config;

/// File name looked up in the project directory
pub const PROJECT_CONFIG_FILE: &str = "texforge.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> TexforgeResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| TexforgeError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load the first config found (project, then user), then apply env overrides.
///
/// A config file that exists but does not parse is an error, not a silent
/// fallback to defaults.
pub fn load_or_default(project_root: Option<&Path>) -> TexforgeResult<(Config, Vec<ConfigWarning>)> {
    let candidates = project_root
        .map(|root| root.join(PROJECT_CONFIG_FILE))
        .into_iter()
        .chain(user_config_path());

    let (config, warnings) = match candidates.into_iter().find(|p| p.is_file()) {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_with_warnings(&path)?
        }
        None => (Config::default(), Vec::new()),
    };

    let config = with_env_overrides(config)?;
    config.validate()?;
    Ok((config, warnings))
}

/// `~/.config/texforge/config.toml` (platform equivalent via `dirs`)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("texforge").join("config.toml"))
}

/// Apply environment variable overrides (TEXFORGE_* prefix)
pub fn with_env_overrides(config: Config) -> TexforgeResult<Config> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

pub(crate) fn apply_overrides(
    mut config: Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> TexforgeResult<Config> {
    // TEXFORGE_ENGINE
    if let Some(engine) = lookup("TEXFORGE_ENGINE") {
        config.engine.command = engine;
    }

    // TEXFORGE_OUTPUT_DIR
    if let Some(dir) = lookup("TEXFORGE_OUTPUT_DIR") {
        config.build.output_dir = PathBuf::from(dir);
    }

    // TEXFORGE_MAX_CONCURRENCY
    if let Some(value) = lookup("TEXFORGE_MAX_CONCURRENCY") {
        config.build.max_concurrency = value.trim().parse().map_err(|_| {
            TexforgeError::InvalidArgument(format!(
                "TEXFORGE_MAX_CONCURRENCY must be a positive integer, got '{value}'"
            ))
        })?;
    }

    // TEXFORGE_TIMEOUT
    if let Some(value) = lookup("TEXFORGE_TIMEOUT") {
        config.build.timeout = parse_duration(&value)?;
    }

    // TEXFORGE_DEBOUNCE
    if let Some(value) = lookup("TEXFORGE_DEBOUNCE") {
        config.watch.debounce = value.parse::<DebounceInterval>()?;
    }

    // TEXFORGE_KEEP_AUX
    if let Some(value) = lookup("TEXFORGE_KEEP_AUX") {
        config.build.keep_aux = value.to_lowercase() != "false" && value != "0";
    }

    Ok(config)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "engine",
        "command",
        "args",
        "build",
        "output_dir",
        "max_concurrency",
        "timeout",
        "keep_aux",
        "images",
        "enabled",
        "format",
        "dpi",
        "watch",
        "debounce",
        "exclude",
        "include",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (*candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .and_then(|(candidate, dist)| (dist <= 2).then(|| candidate.to_string()))
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
