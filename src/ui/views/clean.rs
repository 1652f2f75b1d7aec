//! Clean command UI views

use std::path::{Path, PathBuf};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_clean_header(dir: &Path, supports_color: bool, supports_unicode: bool) -> String {
    CommandHeader::new(Icon::Clean, "texforge clean")
        .row("Directory", dir.display().to_string())
        .render(supports_color, supports_unicode)
}

pub fn render_clean_result(removed: &[PathBuf], supports_color: bool, supports_unicode: bool) -> String {
    if removed.is_empty() {
        return format!(
            "{}\n",
            ColoredText::dim("Nothing to clean.").render(supports_color)
        );
    }

    let mut out = String::new();
    for path in removed {
        out.push_str(&format!("  - {}\n", path.display()));
    }
    out.push_str(&format!(
        "{} Removed {} file(s)\n",
        Icon::Success.colored(supports_color, supports_unicode),
        removed.len()
    ));
    out
}
