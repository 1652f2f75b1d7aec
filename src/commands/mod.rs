pub mod batch;
pub mod build;
pub mod clean;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use texforge::config::ConfigWarning;
use texforge::{CancellationToken, Config};

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;

/// Directory searched for `texforge.toml`: the parent of `path`, or the cwd
pub fn project_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Load config for `root`, printing unknown-key warnings to stderr
pub fn load_config(root: &Path, ui: &UiContext) -> Result<Config> {
    let (config, warnings) = Config::load_or_default(Some(root))?;
    for warning in &warnings {
        eprintln!("{}", render_config_warning(warning, ui));
    }
    Ok(config)
}

fn render_config_warning(warning: &ConfigWarning, ui: &UiContext) -> String {
    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    let mut message = format!(
        "{} unknown config key '{}' in {}",
        Icon::Warning.colored(ui.color, ui.unicode),
        warning.key,
        location
    );
    if let Some(suggestion) = &warning.suggestion {
        message.push_str(&format!(" (did you mean '{suggestion}'?)"));
    }
    message
}

/// Cancel `token` on Ctrl+C
pub fn cancel_on_interrupt(token: &CancellationToken) -> Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || token.cancel()).context("failed to set Ctrl+C handler")
}
