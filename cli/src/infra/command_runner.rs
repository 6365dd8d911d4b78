//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs supervisor commands as child processes with a hard
//! deadline: a command that outlives its timeout is killed and reported as an
//! error instead of blocking the switch.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::application::ports::CommandRunner;

/// Default timeout for supervisor commands (stop, start, daemon-reload, ...).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Production `CommandRunner` backed by `tokio::process`.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let line = command_line(program, args);
        tracing::debug!(command = %line, ?timeout, "running supervisor command");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn `{line}`"))?;

        // Both pipes are drained while waiting so a long `systemctl status`
        // cannot block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let finished = async {
            let (status, stdout, stderr) = tokio::join!(child.wait(), stdout, stderr);
            status.map(|status| Output {
                status,
                stdout,
                stderr,
            })
        };

        match tokio::time::timeout(timeout, finished).await {
            Ok(output) => output.with_context(|| format!("waiting for `{line}`")),
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!("`{line}` timed out after {timeout:?} and was killed")
            }
        }
    }
}

/// `program arg1 arg2`, as shown in logs and errors.
fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read a child pipe to the end; a read error keeps what arrived so far.
async fn drain(pipe: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}
