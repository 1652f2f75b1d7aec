//! Command header: a title line, aligned `label  value` rows, and an optional hint

use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

#[derive(Debug, Clone)]
pub struct CommandHeader {
    icon: Icon,
    title: String,
    detail: Option<String>,
    rows: Vec<(String, String)>,
    hint: Option<String>,
}

impl CommandHeader {
    pub fn new(icon: Icon, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            detail: None,
            rows: Vec::new(),
            hint: None,
        }
    }

    /// Short summary shown after the title, e.g. `3 documents, 2 workers`
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let title = ColoredText::info(self.title.as_str())
            .bold()
            .render(supports_color);
        let mut out = format!("{} {}", self.icon.colored(supports_color, supports_unicode), title);
        if let Some(detail) = &self.detail {
            out.push_str(&format!(
                " {}",
                ColoredText::dim(format!("({detail})")).render(supports_color)
            ));
        }
        out.push('\n');

        let width = self.rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            out.push_str(&format!("  {label:<width$}  {value}\n"));
        }
        if let Some(hint) = &self.hint {
            out.push_str(&format!("  {}\n", ColoredText::dim(hint.as_str()).render(supports_color)));
        }
        out
    }
}
