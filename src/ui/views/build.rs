use std::path::Path;

use texforge::domain::ports::BuildOutput;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;

pub fn render_build_header(
    template: &Path,
    config: &Path,
    engine: &str,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    CommandHeader::new(Icon::Build, "texforge build")
        .row("Template", template.display().to_string())
        .row("Variables", config.display().to_string())
        .row("Engine", engine)
        .render(supports_color, supports_unicode)
}

pub fn render_build_output(output: &BuildOutput, supports_color: bool, supports_unicode: bool) -> String {
    let mut out = format!(
        "{} {}\n",
        Icon::Success.colored(supports_color, supports_unicode),
        output.pdf_path.display()
    );
    for image in &output.images {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Arrow.colored(supports_color, supports_unicode),
            image.display()
        ));
    }
    out
}
