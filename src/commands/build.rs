use std::sync::Arc;

use anyhow::Result;
use texforge::application::PipelineOptions;
use texforge::domain::ports::{BuildPipeline, BuildRequest};
use texforge::{BuildContext, CancellationToken, DocumentPipeline, ProcessExecutor};

use crate::cli::BuildArgs;
use crate::ui::context::UiContext;
use crate::ui::views::build::{render_build_header, render_build_output};

pub fn cmd_build(args: BuildArgs, json: bool) -> Result<()> {
    let ui = UiContext::new(json);
    let mut config = super::load_config(&super::project_root(&args.template), &ui)?;

    if let Some(engine) = args.engine {
        config.engine.command = engine;
    }
    if let Some(format) = args.image {
        config.images.enabled = true;
        config.images.format = format;
    }
    let timeout = args.timeout.unwrap_or(config.build.timeout);

    if !json {
        print!(
            "{}",
            render_build_header(&args.template, &args.config, &config.engine.command, ui.color, ui.unicode)
        );
    }

    let pipeline = DocumentPipeline::new(Arc::new(ProcessExecutor::new()), PipelineOptions::from(&config));
    let mut request = BuildRequest::new(&args.template, &args.config);
    if let Some(dir) = args.output {
        request = request.with_output_dir(dir);
    }

    let token = CancellationToken::new();
    super::cancel_on_interrupt(&token)?;
    let ctx = BuildContext::with_token(token).with_timeout(timeout);

    match pipeline.build(&ctx, &request) {
        Ok(output) => {
            if json {
                let event = serde_json::json!({
                    "event": "build_complete",
                    "command": "build",
                    "template": args.template.display().to_string(),
                    "pdf": output.pdf_path.display().to_string(),
                    "images": output
                        .images
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>(),
                });
                println!("{}", event);
            } else {
                print!("{}", render_build_output(&output, ui.color, ui.unicode));
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let event = serde_json::json!({
                    "event": "build_failed",
                    "command": "build",
                    "template": args.template.display().to_string(),
                    "error": err.to_string(),
                });
                println!("{}", event);
            }
            Err(err.into())
        }
    }
}
