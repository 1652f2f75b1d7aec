//! Build Pipeline port
//!
//! The orchestration layer treats the pipeline as an opaque, possibly slow,
//! possibly failing operation. It imposes no retries of its own.

use std::path::{Path, PathBuf};

use crate::domain::entities::CompilationTask;
use crate::domain::value_objects::BuildContext;
use crate::error::BuildError;

/// Input for a single document build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub template_file: PathBuf,
    pub config_file: PathBuf,
    /// Overrides the pipeline's default output directory
    pub output_dir: Option<PathBuf>,
    /// Base name of the rendered source and the PDF; defaults to the template's stem
    pub output_name: Option<String>,
}

impl BuildRequest {
    pub fn new(template_file: impl Into<PathBuf>, config_file: impl Into<PathBuf>) -> Self {
        Self {
            template_file: template_file.into(),
            config_file: config_file.into(),
            output_dir: None,
            output_name: None,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// `output_name`, falling back to the template's file stem
    pub fn document_name(&self) -> Option<String> {
        self.output_name.clone().or_else(|| {
            self.template_file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
    }

    /// `<template stem>-<config stem>`, used when several requests share a template
    pub fn qualified_name(&self) -> Option<String> {
        let template = self.template_file.file_stem()?.to_string_lossy();
        let config = self.config_file.file_stem()?.to_string_lossy();
        Some(format!("{template}-{config}"))
    }
}

impl From<&CompilationTask> for BuildRequest {
    fn from(task: &CompilationTask) -> Self {
        Self::new(task.template_file(), task.config_file())
    }
}

/// Artifacts produced by a successful build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    pub pdf_path: PathBuf,
    /// Raster images, when image conversion is enabled
    pub images: Vec<PathBuf>,
}

/// Outcome of a watch-triggered rebuild
///
/// An engine failure is reported here with `success == false` rather than as
/// an `Err`, so the watch loop can show the engine's message and keep going.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildResult {
    pub pdf_path: Option<PathBuf>,
    pub success: bool,
    pub error: Option<String>,
}

impl RebuildResult {
    pub fn succeeded(pdf_path: impl Into<PathBuf>) -> Self {
        Self {
            pdf_path: Some(pdf_path.into()),
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            pdf_path: None,
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Something that can turn a template + variables into a PDF
pub trait BuildPipeline: Send + Sync {
    /// Build one document for a batch task
    fn build(&self, ctx: &BuildContext, request: &BuildRequest) -> Result<BuildOutput, BuildError>;

    /// Where `build` would write the PDF for `request`, when known up front.
    ///
    /// Batches use this to keep tasks from writing the same file.
    fn output_path(&self, _request: &BuildRequest) -> Option<PathBuf> {
        None
    }

    /// Rebuild the watched document after a change
    fn rebuild(
        &self,
        ctx: &BuildContext,
        template_file: &Path,
        config_file: &Path,
    ) -> Result<RebuildResult, BuildError>;
}
