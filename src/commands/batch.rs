use std::sync::Arc;

use anyhow::{bail, Result};
use texforge::application::PipelineOptions;
use texforge::domain::ports::{BuildEvent, BuildEventSink};
use texforge::infrastructure::load_manifest;
use texforge::{
    BuildContext, CancellationToken, DocumentPipeline, JsonEventSink, ProcessExecutor, WorkerPool,
};

use crate::cli::BatchArgs;
use crate::ui::context::UiContext;
use crate::ui::views::batch::{render_batch_event, render_batch_header, render_batch_summary};

pub fn cmd_batch(args: BatchArgs, json: bool) -> Result<()> {
    let ui = UiContext::new(json);
    let config = super::load_config(&super::project_root(&args.manifest), &ui)?;
    let tasks = load_manifest(&args.manifest)?;

    let mut options = PipelineOptions::from(&config);
    if let Some(dir) = args.output {
        // Shared by every task, so pin it to the invocation directory.
        options.output_dir = std::path::absolute(&dir)?;
    }

    let events: Arc<dyn BuildEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        let (color, unicode) = (ui.color, ui.unicode);
        Arc::new(move |event: BuildEvent| {
            print!("{}", render_batch_event(&event, color, unicode));
        })
    };

    let pipeline = DocumentPipeline::new(Arc::new(ProcessExecutor::new()), options);
    let mut pool = WorkerPool::new(Arc::new(pipeline)).with_event_sink(events);
    pool.configure_concurrency(args.jobs.unwrap_or(config.build.max_concurrency))?;
    pool.configure_timeout(args.timeout.unwrap_or(config.build.timeout))?;

    if !json {
        print!(
            "{}",
            render_batch_header(&args.manifest, tasks.len(), pool.max_workers(), ui.color, ui.unicode)
        );
    }

    let token = CancellationToken::new();
    super::cancel_on_interrupt(&token)?;
    let result = pool.execute_parallel(&BuildContext::with_token(token), &tasks)?;

    if !json {
        print!("{}", render_batch_summary(&result, ui.color, ui.unicode));
    }

    if !result.is_success() {
        bail!(
            "{} of {} documents failed",
            result.failure_count,
            result.total_count()
        );
    }
    Ok(())
}
