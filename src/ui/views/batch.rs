//! Batch command UI views

use std::path::Path;
use std::time::Duration;

use texforge::domain::entities::ParallelCompilationResult;
use texforge::domain::ports::BuildEvent;
use texforge::domain::value_objects::format_duration;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_batch_header(
    manifest: &Path,
    tasks: usize,
    max_workers: usize,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let documents = if tasks == 1 { "document" } else { "documents" };
    let workers = if max_workers == 1 { "worker" } else { "workers" };
    CommandHeader::new(Icon::Batch, "texforge batch")
        .with_detail(format!("{tasks} {documents}, {max_workers} {workers}"))
        .row("Manifest", manifest.display().to_string())
        .with_hint("Ctrl+C cancels documents that have not finished")
        .render(supports_color, supports_unicode)
}

/// One progress line per finished task; other events render nothing
pub fn render_batch_event(event: &BuildEvent, supports_color: bool, supports_unicode: bool) -> String {
    match event {
        BuildEvent::TaskSucceeded {
            template,
            pdf,
            duration_ms,
        } => format!(
            "  {} {} -> {} ({})\n",
            Icon::Success.colored(supports_color, supports_unicode),
            template,
            pdf,
            format_duration(Duration::from_millis(*duration_ms))
        ),
        BuildEvent::TaskFailed {
            template, error, ..
        } => format!(
            "  {} {}: {}\n",
            Icon::Error.colored(supports_color, supports_unicode),
            template,
            first_line(error)
        ),
        BuildEvent::BatchStarted { .. }
        | BuildEvent::TaskStarted { .. }
        | BuildEvent::BatchCompleted { .. } => String::new(),
    }
}

pub fn render_batch_summary(
    result: &ParallelCompilationResult,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let elapsed = format_duration(Duration::from_millis(
        u64::try_from(result.total_duration.as_millis()).unwrap_or(u64::MAX),
    ));
    if result.is_success() {
        let title = ColoredText::success(format!(
            "{} of {} documents built in {}",
            result.success_count,
            result.total_count(),
            elapsed
        ))
        .bold()
        .render(supports_color);
        return format!("\n{} {}\n", Icon::Success.colored(supports_color, supports_unicode), title);
    }

    let title = ColoredText::warning(format!(
        "{} built, {} failed in {}",
        result.success_count, result.failure_count, elapsed
    ))
    .bold()
    .render(supports_color);
    let mut out = format!(
        "\n{} {}\n",
        Icon::Warning.colored(supports_color, supports_unicode),
        title
    );
    for failure in &result.failed_builds {
        out.push_str(&format!(
            "  - {}: {}\n",
            failure.template_file.display(),
            failure.error
        ));
    }
    out
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}
