use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use texforge::config::ImageFormat;
use texforge::domain::value_objects::parse_duration;
use texforge::DebounceInterval;

/// texforge - render LaTeX templates into PDFs
#[derive(Parser, Debug)]
#[command(name = "texforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events on stdout instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv); TEXFORGE_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render and compile a single document
    Build(BuildArgs),

    /// Compile every document listed in a manifest, in parallel
    Batch(BatchArgs),

    /// Rebuild a document whenever its sources change
    Watch(WatchArgs),

    /// Remove LaTeX byproducts (.aux, .log, ...) from a directory
    Clean {
        /// Directory to clean
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// LaTeX template with {{ placeholders }}
    pub template: PathBuf,

    /// YAML file with the template variables
    pub config: PathBuf,

    /// Output directory (default: build.output_dir from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// LaTeX engine command (e.g. xelatex, lualatex)
    #[arg(long)]
    pub engine: Option<String>,

    /// Also rasterize the PDF (png, jpeg, tiff)
    #[arg(long, value_name = "FORMAT")]
    pub image: Option<ImageFormat>,

    /// Give up after this long (e.g. 30s, 2m)
    #[arg(long, value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// YAML manifest listing {template, config, priority?, timeout?}
    pub manifest: PathBuf,

    /// Maximum documents compiled at once
    #[arg(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,

    /// Default per-document timeout (e.g. 30s, 2m)
    #[arg(long, value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// Output directory shared by every document
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// LaTeX template with {{ placeholders }}
    pub template: PathBuf,

    /// YAML file with the template variables
    pub config: PathBuf,

    /// Quiet period between rebuilds (100ms to 10s)
    #[arg(long)]
    pub debounce: Option<DebounceInterval>,

    /// Extra glob to ignore (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Only react to paths matching this glob (repeatable)
    #[arg(long = "include", value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Additional directory watched recursively (repeatable)
    #[arg(long = "asset-dir", value_name = "DIR")]
    pub asset_dirs: Vec<PathBuf>,
}

fn parse_duration_arg(value: &str) -> Result<Duration, String> {
    let duration = parse_duration(value).map_err(|e| e.to_string())?;
    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}
