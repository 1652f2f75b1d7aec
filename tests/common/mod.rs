//! Common test utilities for texforge integration tests.
//!
//! - `TestEnv`: isolated project + home directories and a CLI runner
//! - `fake_engine`: a shell script standing in for pdflatex
//! - Fixtures: template and variables content

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub const TEMPLATE: &str = "\\documentclass{article}\n\\begin{document}\nHello {{ name }}\n\\end{document}\n";

pub const FAILING_TEMPLATE: &str = "\\documentclass{article}\n% FAIL\n{{ name }}\n";

/// Result of running the texforge binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Parse stdout as NDJSON
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
            .collect()
    }
}

/// Isolated project and home directories
pub struct TestEnv {
    pub project_root: TempDir,
    pub home_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().unwrap(),
            home_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// A document `<stem>.tex` + `<stem>.yaml` greeting `name`
    pub fn document(&self, stem: &str, template: &str, name: &str) -> (PathBuf, PathBuf) {
        (
            self.write(&format!("{stem}.tex"), template),
            self.write(&format!("{stem}.yaml"), &format!("name: {name}\n")),
        )
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_texforge"));
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("HOME", self.home_dir.path())
            .env("XDG_CONFIG_HOME", self.home_dir.path().join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("TEXFORGE_LOG");
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("failed to execute texforge");
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Write an executable script that behaves like a LaTeX engine:
/// it writes `<out>/<stem>.pdf` and `<out>/<stem>.aux`, and fails with a
/// TeX-style message when the source contains `FAIL`.
#[cfg(unix)]
pub fn fake_engine(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-latex");
    fs::write(
        &script,
        r#"#!/bin/sh
out=.
while [ $# -gt 1 ]; do
  if [ "$1" = "-output-directory" ]; then out="$2"; fi
  shift
done
src="$1"
stem=$(basename "$src" .tex)
if grep -q FAIL "$src"; then
  echo "! Forced failure."
  exit 1
fi
{ printf '%%PDF-1.4\n'; cat "$src"; } > "$out/$stem.pdf"
echo aux > "$out/$stem.aux"
echo log > "$out/$stem.log"
"#,
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}
