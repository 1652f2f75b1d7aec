use std::path::Path;

use anyhow::Result;
use texforge::infrastructure::cleanup::clean_dir;

use crate::ui::context::UiContext;
use crate::ui::views::clean::{render_clean_header, render_clean_result};

/// Clean `dir` and, if present, its configured build output directory
pub fn cmd_clean(dir: &Path, json: bool) -> Result<()> {
    let ui = UiContext::new(json);
    let config = super::load_config(dir, &ui)?;

    if !json {
        print!("{}", render_clean_header(dir, ui.color, ui.unicode));
    }

    let mut removed = clean_dir(dir)?;
    let output_dir = dir.join(&config.build.output_dir);
    if output_dir.is_dir() && output_dir != dir {
        removed.extend(clean_dir(&output_dir)?);
    }

    if json {
        let event = serde_json::json!({
            "event": "clean_complete",
            "command": "clean",
            "removed": removed
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
        });
        println!("{}", event);
    } else {
        print!("{}", render_clean_result(&removed, ui.color, ui.unicode));
    }
    Ok(())
}
