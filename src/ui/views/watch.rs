use std::time::Duration;

use texforge::domain::ports::WatchEvent;
use texforge::domain::value_objects::format_duration;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;

pub fn render_watch_header(
    template: &str,
    config: &str,
    debounce: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    CommandHeader::new(Icon::Watch, "texforge watch")
        .with_detail(format!("debounce {debounce}"))
        .row("Template", template)
        .row("Variables", config)
        .with_hint("Type `status`, `interval <duration>` or `quit`; Ctrl+C stops")
        .render(supports_color, supports_unicode)
}

pub fn render_watch_event(
    timestamp: &str,
    event: &WatchEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = format!("[{}]", timestamp);

    match event {
        WatchEvent::WatchStarted { watching, .. } => format!(
            "{} {} Watching: {}\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode),
            watching.join(", ")
        ),
        WatchEvent::FileChanged { path, operation } => format!(
            "{} {} Changed ({}): {}\n",
            prefix,
            Icon::Arrow.colored(supports_color, supports_unicode),
            operation,
            path
        ),
        WatchEvent::RebuildStarted => format!(
            "{} {} Rebuilding...\n",
            prefix,
            Icon::Progress.colored(supports_color, supports_unicode)
        ),
        WatchEvent::RebuildComplete { pdf, duration_ms } => format!(
            "{} {} Built {} in {}\n",
            prefix,
            Icon::Success.colored(supports_color, supports_unicode),
            pdf,
            format_duration(Duration::from_millis(*duration_ms))
        ),
        WatchEvent::RebuildFailed { message } => format!(
            "{} {} Rebuild failed: {}\n",
            prefix,
            Icon::Warning.colored(supports_color, supports_unicode),
            message
        ),
        WatchEvent::Error { message } => format!(
            "{} {} Error: {}\n",
            prefix,
            Icon::Error.colored(supports_color, supports_unicode),
            message
        ),
        WatchEvent::Shutdown => format!(
            "\n{} {} Watch stopped.\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode)
        ),
    }
}

/// Reply to a stdin control command
pub fn render_control_reply(message: &str, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} {}\n",
        Icon::Arrow.colored(supports_color, supports_unicode),
        message
    )
}
