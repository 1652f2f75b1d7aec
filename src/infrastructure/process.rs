//! Process executor
//!
//! Runs external binaries with captured output. The child is polled rather
//! than waited on, so a deadline or cancellation can kill it mid-run.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::ports::{CommandExecutor, CommandOutput, CommandSpec};
use crate::domain::value_objects::BuildContext;
use crate::error::BuildError;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Executor backed by `std::process`
#[derive(Debug, Clone, Copy)]
pub struct ProcessExecutor {
    poll_interval: Duration,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, ctx: &BuildContext, spec: &CommandSpec) -> Result<CommandOutput, BuildError> {
        ctx.check()?;

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        debug!(command = %spec, "spawning");
        let mut child = command.spawn().map_err(|e| BuildError::Spawn {
            program: spec.program.clone(),
            message: e.to_string(),
        })?;

        // Drain both pipes concurrently; a full pipe would block the child forever.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    terminate(&mut child, &spec.program);
                    return Err(BuildError::Other(format!(
                        "failed to wait for `{}`: {e}",
                        spec.program
                    )));
                }
            }

            if let Some(err) = ctx.err() {
                warn!(command = %spec.program, "stopping: {err}");
                // Grandchildren may still hold the pipes; leave the drain threads detached.
                terminate(&mut child, &spec.program);
                return Err(err);
            }
            thread::sleep(self.poll_interval);
        };

        Ok(CommandOutput {
            status: status.code(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn terminate(child: &mut Child, program: &str) {
    if let Err(e) = child.kill() {
        debug!(command = %program, "kill failed: {e}");
    }
    let _ = child.wait();
}
