//! Document build pipeline
//!
//! Turns a template + variables file into a PDF.
//!
//! ## Flow
//!
//! 1. Render the template into the output directory
//! 2. Run the LaTeX engine on the rendered file
//! 3. Optionally rasterize the PDF
//! 4. Remove engine byproducts unless `keep_aux` is set

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{Config, ImageFormat};
use crate::domain::ports::{
    BuildOutput, BuildPipeline, BuildRequest, CommandExecutor, CommandOutput, CommandSpec,
    RebuildResult,
};
use crate::domain::value_objects::BuildContext;
use crate::error::BuildError;
use crate::infrastructure::cleanup::remove_aux_files;
use crate::infrastructure::template::TemplateRenderer;

/// Lines of engine output kept in a failure message
const FAILURE_TAIL_LINES: usize = 20;

/// Image conversion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub command: String,
    pub format: ImageFormat,
    pub dpi: u32,
}

/// Pipeline settings, usually derived from [`Config`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub engine: String,
    pub engine_args: Vec<String>,
    /// Relative paths resolve against the template's directory
    pub output_dir: PathBuf,
    pub keep_aux: bool,
    pub images: Option<ImageOptions>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            engine: config.engine.command.clone(),
            engine_args: config.engine.args.clone(),
            output_dir: config.build.output_dir.clone(),
            keep_aux: config.build.keep_aux,
            images: config.images.enabled.then(|| ImageOptions {
                command: config.images.command.clone(),
                format: config.images.format,
                dpi: config.images.dpi,
            }),
        }
    }
}

/// Render → compile → (rasterize) → clean
pub struct DocumentPipeline {
    executor: Arc<dyn CommandExecutor>,
    renderer: TemplateRenderer,
    options: PipelineOptions,
}

impl DocumentPipeline {
    pub fn new(executor: Arc<dyn CommandExecutor>, options: PipelineOptions) -> Self {
        Self {
            executor,
            renderer: TemplateRenderer::new(),
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    fn output_dir_for(&self, request: &BuildRequest) -> PathBuf {
        let dir = request
            .output_dir
            .as_deref()
            .unwrap_or(&self.options.output_dir);
        if dir.is_absolute() || request.output_dir.is_some() {
            return dir.to_path_buf();
        }
        match request.template_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(dir),
            _ => dir.to_path_buf(),
        }
    }

    fn run(
        &self,
        ctx: &BuildContext,
        spec: &CommandSpec,
    ) -> Result<CommandOutput, BuildError> {
        let output = self.executor.execute(ctx, spec)?;
        if output.success() {
            return Ok(output);
        }
        Err(BuildError::CommandFailed {
            program: spec.program.clone(),
            status: output.status_label(),
            detail: output.tail(FAILURE_TAIL_LINES),
        })
    }

    fn engine_command(&self, source: &Path, output_dir: &Path, cwd: &Path) -> CommandSpec {
        CommandSpec::new(&self.options.engine)
            .args(self.options.engine_args.iter().cloned())
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg("-output-directory")
            .arg(output_dir.display().to_string())
            .arg(source.display().to_string())
            .current_dir(cwd)
    }

    fn rasterize(
        &self,
        ctx: &BuildContext,
        images: &ImageOptions,
        pdf: &Path,
        output_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, BuildError> {
        let prefix = output_dir.join(stem);
        let spec = CommandSpec::new(&images.command)
            .arg(images.format.flag())
            .arg("-r")
            .arg(images.dpi.to_string())
            .arg(pdf.display().to_string())
            .arg(prefix.display().to_string());
        self.run(ctx, &spec)?;
        collect_images(output_dir, stem, images.format.extension())
    }
}

impl BuildPipeline for DocumentPipeline {
    fn build(&self, ctx: &BuildContext, request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        ctx.check()?;

        let output_dir = absolute(&self.output_dir_for(request))?;
        let stem = request.document_name().ok_or_else(|| BuildError::Template {
            file: request.template_file.clone(),
            message: "template has no file name".to_string(),
        })?;
        let rendered = self.renderer.render_to(
            &request.template_file,
            &request.config_file,
            &output_dir,
            &stem,
        )?;

        // Relative \input and \includegraphics resolve against the template's directory.
        let cwd = match request.template_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => absolute(parent)?,
            _ => absolute(Path::new("."))?,
        };

        ctx.check()?;
        self.run(ctx, &self.engine_command(&rendered, &output_dir, &cwd))?;

        let pdf_path = output_dir.join(format!("{stem}.pdf"));
        if !pdf_path.is_file() {
            return Err(BuildError::Other(format!(
                "`{}` succeeded but {} was not produced",
                self.options.engine,
                pdf_path.display()
            )));
        }

        let images = match &self.options.images {
            Some(images) => {
                ctx.check()?;
                self.rasterize(ctx, images, &pdf_path, &output_dir, &stem)?
            }
            None => Vec::new(),
        };

        if !self.options.keep_aux {
            if let Err(e) = remove_aux_files(&output_dir, &stem) {
                warn!(dir = %output_dir.display(), "could not remove aux files: {e}");
            }
        }

        debug!(pdf = %pdf_path.display(), images = images.len(), "build complete");
        Ok(BuildOutput { pdf_path, images })
    }

    fn output_path(&self, request: &BuildRequest) -> Option<PathBuf> {
        let dir = absolute(&self.output_dir_for(request)).ok()?;
        Some(dir.join(format!("{}.pdf", request.document_name()?)))
    }

    fn rebuild(
        &self,
        ctx: &BuildContext,
        template_file: &Path,
        config_file: &Path,
    ) -> Result<RebuildResult, BuildError> {
        match self.build(ctx, &BuildRequest::new(template_file, config_file)) {
            Ok(output) => Ok(RebuildResult::succeeded(output.pdf_path)),
            // Problems in the document itself; the next save may fix them.
            Err(
                err @ (BuildError::CommandFailed { .. }
                | BuildError::Template { .. }
                | BuildError::Variables { .. }),
            ) => Ok(RebuildResult::failed(err.to_string())),
            Err(err) => Err(err),
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
    std::path::absolute(path).map_err(|e| BuildError::io(path, e))
}

/// Files named `<stem>-<page>.<ext>` or `<stem>.<ext>`, sorted by name
fn collect_images(dir: &Path, stem: &str, extension: &str) -> Result<Vec<PathBuf>, BuildError> {
    let paged = format!("{stem}-");
    let single = format!("{stem}.{extension}");

    let mut images: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| BuildError::io(dir, e))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            let matches_ext = path.extension().is_some_and(|e| e == extension);
            name == single || (matches_ext && name.starts_with(&paged))
        })
        .collect();
    images.sort();
    Ok(images)
}
