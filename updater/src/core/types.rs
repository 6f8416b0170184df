//! Shared types describing how a step ended.

use serde::{Deserialize, Serialize};

/// Why a child process could not be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnFailure {
    /// The program does not exist.
    NotFound,
    /// The program exists but could not be executed.
    PermissionDenied,
    /// Any other spawn error.
    Other,
}

impl SpawnFailure {
    pub fn from_io(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound,
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Other,
        }
    }
}

/// Terminal state of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepStatus {
    /// The child exited normally with this code.
    Exited { code: i32 },
    /// The child was terminated by a signal (unix only).
    Signaled { signal: i32 },
    /// The child outlived the configured step timeout and was killed.
    TimedOut,
    /// The child was never started.
    SpawnFailed { reason: SpawnFailure },
}

impl StepStatus {
    pub fn success() -> Self {
        Self::Exited { code: 0 }
    }

    pub fn exited(code: i32) -> Self {
        Self::Exited { code }
    }
}
