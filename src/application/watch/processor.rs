//! Change Processor: turns an accepted change into a rebuild

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::domain::entities::{FileChangeEvent, FileOperation};
use crate::domain::ports::{BuildPipeline, RebuildResult};
use crate::domain::value_objects::{BuildContext, CancellationToken};
use crate::error::BuildError;

/// Rebuilds one document whenever a relevant file is written
pub struct ChangeProcessor {
    pipeline: Arc<dyn BuildPipeline>,
    template_file: PathBuf,
    config_file: PathBuf,
    timeout: Option<Duration>,
    token: CancellationToken,
}

impl ChangeProcessor {
    pub fn new(
        pipeline: Arc<dyn BuildPipeline>,
        template_file: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pipeline,
            template_file: template_file.into(),
            config_file: config_file.into(),
            timeout: None,
            token: CancellationToken::new(),
        }
    }

    /// Bound each rebuild by a deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Share a cancellation token with the caller (e.g. Ctrl+C)
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn template_file(&self) -> &Path {
        &self.template_file
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Only content writes trigger a rebuild
    pub fn can_process(&self, event: &FileChangeEvent) -> bool {
        event.operation == FileOperation::Write
    }

    /// Rebuild the watched document.
    ///
    /// An engine failure comes back as `Ok` with `success == false`; `Err` is
    /// reserved for failures outside the document itself.
    pub fn process_change(&self, event: &FileChangeEvent) -> Result<RebuildResult, BuildError> {
        let template = absolute(&self.template_file)?;
        let config = absolute(&self.config_file)?;
        debug!(
            trigger = %event.path().display(),
            template = %template.display(),
            "rebuilding"
        );

        let root = BuildContext::with_token(self.token.clone());
        let ctx = match self.timeout {
            Some(timeout) => root.with_timeout(timeout),
            None => root,
        };
        self.pipeline.rebuild(&ctx, &template, &config)
    }
}

fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
    std::path::absolute(path).map_err(|e| BuildError::io(path, e))
}
