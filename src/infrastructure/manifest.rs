//! Batch manifest loader
//!
//! A manifest is a YAML list of documents to build:
//!
//! ```yaml
//! - template: letters/welcome.tex
//!   config: letters/ada.yaml
//!   priority: 10
//!   timeout: 2m
//! - template: letters/welcome.tex
//!   config: letters/grace.yaml
//! ```
//!
//! Relative paths resolve against the manifest's own directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::entities::CompilationTask;
use crate::error::{TexforgeError, TexforgeResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    template: PathBuf,
    config: PathBuf,
    #[serde(default)]
    priority: i32,
    #[serde(default, with = "humantime_serde")]
    timeout: Option<Duration>,
}

/// Parse a manifest file into compilation tasks, in file order
pub fn load_manifest(path: &Path) -> TexforgeResult<Vec<CompilationTask>> {
    let content = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    parse_manifest(&content, base).map_err(|message| TexforgeError::InvalidManifest {
        file: path.to_path_buf(),
        message,
    })
}

fn parse_manifest(content: &str, base: &Path) -> Result<Vec<CompilationTask>, String> {
    let entries: Option<Vec<ManifestEntry>> =
        serde_yaml_ng::from_str(content).map_err(|e| e.to_string())?;
    let entries = entries.unwrap_or_default();

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if entry.timeout.is_some_and(|t| t.is_zero()) {
                return Err(format!("entry {}: timeout must be greater than zero", index + 1));
            }
            let mut task =
                CompilationTask::new(base.join(&entry.template), base.join(&entry.config))
                    .with_priority(entry.priority);
            if let Some(timeout) = entry.timeout {
                task = task.with_timeout(timeout);
            }
            Ok(task)
        })
        .collect()
}
