use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use texforge::application::{ControlReply, PipelineOptions, WatchController, WatchState};
use texforge::domain::ports::{WatchEvent, WatchEventSink};
use texforge::{
    CancellationToken, DocumentPipeline, FileWatchService, JsonEventSink, NotifyEventSource,
    ProcessExecutor, WatchConfiguration,
};
use tracing::warn;

use crate::cli::WatchArgs;
use crate::ui::context::UiContext;
use crate::ui::views::watch::{render_control_reply, render_watch_event, render_watch_header};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn cmd_watch(args: WatchArgs, json: bool) -> Result<()> {
    let ui = UiContext::new(json);
    let config = super::load_config(&super::project_root(&args.template), &ui)?;

    let mut exclude = config.watch.exclude.clone();
    exclude.extend(args.exclude);
    let mut include = config.watch.include.clone();
    include.extend(args.include);
    let debounce = args.debounce.unwrap_or(config.watch.debounce);

    let watch_config = WatchConfiguration::new(&args.template, &args.config)
        .with_debounce(debounce)
        .with_exclusions(exclude)
        .with_inclusions(include)
        .with_asset_dirs(args.asset_dirs);

    let events: Arc<dyn WatchEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        let (color, unicode) = (ui.color, ui.unicode);
        Arc::new(move |event: WatchEvent| {
            let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
            let rendered = render_watch_event(&timestamp, &event, color, unicode);
            match event {
                WatchEvent::Error { .. } => eprint!("{rendered}"),
                _ => print!("{rendered}"),
            }
        })
    };

    let token = CancellationToken::new();
    let pipeline = DocumentPipeline::new(Arc::new(ProcessExecutor::new()), PipelineOptions::from(&config));
    let mut service = FileWatchService::new(Arc::new(pipeline), Box::new(NotifyEventSource::new()))
        .with_event_sink(events)
        .with_rebuild_timeout(config.build.timeout)
        .with_token(token.clone());

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
        token.cancel();
    })
    .context("failed to set Ctrl+C handler")?;

    if !json {
        print!(
            "{}",
            render_watch_header(
                &args.template.display().to_string(),
                &args.config.display().to_string(),
                &debounce.to_string(),
                ui.color,
                ui.unicode
            )
        );
    }

    service.start_watching(&watch_config)?;
    run_control_loop(&service.controller(), spawn_stdin_reader(), &running, &ui);
    service.stop_watching()?;
    Ok(())
}

/// Forward stdin lines to the control loop; the channel closes at EOF
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("texforge-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        warn!("control input unavailable: {e}");
    }
    rx
}

fn run_control_loop(
    controller: &WatchController,
    input: Receiver<String>,
    running: &AtomicBool,
    ui: &UiContext,
) {
    let mut input = Some(input);
    while running.load(Ordering::SeqCst) && controller.state() != WatchState::Stopped {
        let Some(rx) = &input else {
            thread::sleep(POLL_INTERVAL);
            continue;
        };
        let line = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                // stdin closed (e.g. redirected from /dev/null); only Ctrl+C stops us now.
                input = None;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match controller.execute(&line) {
            Ok(ControlReply::Quit) => break,
            Ok(ControlReply::Message(message)) => reply(&message, false, ui),
            Err(e) => reply(&e.to_string(), true, ui),
        }
    }
}

fn reply(message: &str, is_error: bool, ui: &UiContext) {
    if ui.json {
        let event = serde_json::json!({
            "event": if is_error { "control_error" } else { "control" },
            "command": "watch",
            "message": message,
        });
        println!("{}", event);
    } else if is_error {
        eprint!("{}", render_control_reply(message, ui.color, ui.unicode));
    } else {
        print!("{}", render_control_reply(message, ui.color, ui.unicode));
    }
}
