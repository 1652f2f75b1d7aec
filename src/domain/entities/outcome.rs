//! Per-task build outcomes and the batch aggregate

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::BuildError;

/// A task that produced a PDF
#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    pub template_file: PathBuf,
    pub pdf_path: PathBuf,
    pub duration: Duration,
    pub timestamp: DateTime<Utc>,
}

/// A task that did not
#[derive(Debug, Clone, PartialEq)]
pub struct BuildFailure {
    pub template_file: PathBuf,
    pub error: BuildError,
    pub duration: Duration,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of a finished (or in-progress) batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParallelCompilationResult {
    pub successful_builds: Vec<BuildResult>,
    pub failed_builds: Vec<BuildFailure>,
    pub total_duration: Duration,
    pub success_count: usize,
    pub failure_count: usize,
}

impl ParallelCompilationResult {
    pub fn total_count(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// True if no task failed
    pub fn is_success(&self) -> bool {
        self.failure_count == 0
    }

    /// Every template that produced an outcome, successful or not
    pub fn templates(&self) -> BTreeSet<PathBuf> {
        self.successful_builds
            .iter()
            .map(|b| b.template_file.clone())
            .chain(self.failed_builds.iter().map(|f| f.template_file.clone()))
            .collect()
    }
}
