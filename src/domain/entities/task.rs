//! Compilation task entity - one requested document build

use std::path::{Path, PathBuf};
use std::time::Duration;

/// A template + variables pair to compile.
///
/// Immutable once built; the builder-style setters consume `self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationTask {
    template_file: PathBuf,
    config_file: PathBuf,
    priority: i32,
    timeout: Option<Duration>,
}

impl CompilationTask {
    pub fn new(template_file: impl Into<PathBuf>, config_file: impl Into<PathBuf>) -> Self {
        Self {
            template_file: template_file.into(),
            config_file: config_file.into(),
            priority: 0,
            timeout: None,
        }
    }

    /// Higher priorities are admitted to the worker pool first
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Override the pool-wide timeout for this task only
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn template_file(&self) -> &Path {
        &self.template_file
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_zero_priority_and_pool_timeout() {
        let task = CompilationTask::new("a.tex", "a.yaml");
        assert_eq!(task.priority(), 0);
        assert_eq!(task.timeout(), None);
        assert_eq!(task.template_file(), Path::new("a.tex"));
        assert_eq!(task.config_file(), Path::new("a.yaml"));
    }

    #[test]
    fn builder_sets_priority_and_timeout() {
        let task = CompilationTask::new("a.tex", "a.yaml")
            .with_priority(5)
            .with_timeout(Duration::from_secs(3));
        assert_eq!(task.priority(), 5);
        assert_eq!(task.timeout(), Some(Duration::from_secs(3)));
    }
}
