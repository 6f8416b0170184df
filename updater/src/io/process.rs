//! Helpers for running a child process with the launcher's own stdio.

use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::types::{SpawnFailure, StepStatus};

/// Run `cmd` to completion with stdin/stdout/stderr inherited.
///
/// The child's output reaches the caller unmodified. When `timeout` is set and
/// the child outlives it, the child is killed, reaped and reported as
/// [`StepStatus::TimedOut`]. A spawn error is an outcome, not an `Err`: it is
/// returned as [`StepStatus::SpawnFailed`] so the caller can map it to an
/// exit code. `Err` is reserved for failures while waiting on a started child.
#[instrument(skip_all, fields(program = ?cmd.get_program(), timeout_secs = timeout.map(|t| t.as_secs())))]
pub fn run_inherited(mut cmd: Command, timeout: Option<Duration>) -> Result<StepStatus> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Ok(StepStatus::SpawnFailed {
                reason: SpawnFailure::from_io(&e),
            });
        }
    };

    let status = match timeout {
        None => child.wait().context("wait for command")?,
        Some(limit) => match child.wait_timeout(limit).context("wait for command")? {
            Some(status) => status,
            None => {
                warn!(timeout_secs = limit.as_secs(), "command timed out, killing");
                child.kill().context("kill command")?;
                child.wait().context("wait command after kill")?;
                return Ok(StepStatus::TimedOut);
            }
        },
    };

    let status = status_from_exit(status);
    debug!(?status, "command finished");
    Ok(status)
}

#[cfg(unix)]
fn status_from_exit(status: ExitStatus) -> StepStatus {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => StepStatus::Exited { code },
        (None, Some(signal)) => StepStatus::Signaled { signal },
        (None, None) => StepStatus::Exited { code: 1 },
    }
}

#[cfg(not(unix))]
fn status_from_exit(status: ExitStatus) -> StepStatus {
    StepStatus::Exited {
        code: status.code().unwrap_or(1),
    }
}
