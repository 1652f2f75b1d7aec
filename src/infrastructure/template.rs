//! Template renderer
//!
//! Substitutes `{{ key }}` placeholders in a LaTeX template with values from
//! a YAML variables file. Dotted keys (`{{ author.name }}`) walk nested
//! mappings; sequences render as `a, b, c`. A backslash before the opening
//! braces (`\{{`) emits a literal `{{`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::BuildError;

/// Renders templates and writes the result next to the build outputs
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `template_file` with `config_file` into `<output_dir>/<name>.tex`
    pub fn render_to(
        &self,
        template_file: &Path,
        config_file: &Path,
        output_dir: &Path,
        name: &str,
    ) -> Result<PathBuf, BuildError> {
        let variables = load_variables(config_file)?;
        let source = fs::read_to_string(template_file).map_err(|e| BuildError::io(template_file, e))?;
        let rendered = render(&source, &variables).map_err(|message| BuildError::Template {
            file: template_file.to_path_buf(),
            message,
        })?;

        fs::create_dir_all(output_dir).map_err(|e| BuildError::io(output_dir, e))?;
        let destination = output_dir.join(format!("{name}.tex"));

        if same_file(&destination, template_file) {
            return Err(BuildError::Template {
                file: template_file.to_path_buf(),
                message: format!(
                    "rendering into {} would overwrite the template",
                    output_dir.display()
                ),
            });
        }

        write_atomic(&destination, rendered.as_bytes())?;
        debug!(template = %template_file.display(), output = %destination.display(), "rendered template");
        Ok(destination)
    }
}

/// Load a YAML variables file; the document must be a mapping.
pub fn load_variables(path: &Path) -> Result<Value, BuildError> {
    let content = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    let value: Value = serde_yaml_ng::from_str(&content).map_err(|e| BuildError::Variables {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(_) => Ok(value),
        Value::Null => Ok(Value::Mapping(Default::default())),
        _ => Err(BuildError::Variables {
            file: path.to_path_buf(),
            message: "expected a mapping at the top level".to_string(),
        }),
    }
}

/// Substitute every placeholder in `template`.
///
/// Fails with a message naming every undefined key, or the line of an
/// unclosed placeholder.
pub fn render(template: &str, variables: &Value) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut missing: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(found) = rest.find("{{") {
        if let Some(literal) = rest[..found].strip_suffix('\\') {
            out.push_str(literal);
            out.push_str("{{");
            rest = &rest[found + 2..];
            continue;
        }

        // `{{{ x }}}` is a LaTeX group around a placeholder.
        let mut start = found;
        while rest[start + 2..].starts_with('{') {
            start += 1;
        }
        out.push_str(&rest[..start]);
        let after = &rest[start..];

        let Some(end) = after.find("}}") else {
            let offset = template.len() - rest.len() + start;
            let line = template[..offset].matches('\n').count() + 1;
            return Err(format!("unclosed placeholder on line {line}"));
        };
        let key = after[2..end].trim();
        match lookup(variables, key).and_then(scalar_text) {
            Some(text) => out.push_str(&text),
            None => {
                if !missing.iter().any(|k| k == key) {
                    missing.push(key.to_string());
                }
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);

    if missing.is_empty() {
        Ok(out)
    } else {
        Err(format!("undefined variables: {}", missing.join(", ")))
    }
}

fn lookup<'a>(variables: &'a Value, key: &str) -> Option<&'a Value> {
    if key.is_empty() {
        return None;
    }
    key.split('.')
        .try_fold(variables, |value, segment| value.get(segment))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Sequence(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(", ")),
        _ => None,
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write via a temp file in the same directory, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<(), BuildError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| BuildError::io(dir, e))?;
    file.write_all(content)
        .map_err(|e| BuildError::io(file.path(), e))?;
    file.persist(path)
        .map_err(|e| BuildError::io(path, e.error))?;
    Ok(())
}
