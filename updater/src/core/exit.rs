//! Exit-code derivation.
//!
//! Codes follow what a POSIX shell reports for the same situation, so callers
//! (cron, wrappers) see the value the old shell launcher produced.

use crate::core::types::{SpawnFailure, StepStatus};

/// `timeout(1)` convention for a killed-on-deadline child.
pub const TIMED_OUT: i32 = 124;
/// Program exists but could not be executed.
pub const NOT_EXECUTABLE: i32 = 126;
/// Program not found.
pub const NOT_FOUND: i32 = 127;
/// Base added to the signal number for signal-terminated children.
pub const SIGNAL_BASE: i32 = 128;

/// Exit code the launcher reports for a step that ended with `status`.
pub fn exit_code_for(status: StepStatus) -> i32 {
    match status {
        StepStatus::Exited { code } => code,
        StepStatus::Signaled { signal } => SIGNAL_BASE + signal,
        StepStatus::TimedOut => TIMED_OUT,
        StepStatus::SpawnFailed { reason } => match reason {
            SpawnFailure::NotFound => NOT_FOUND,
            SpawnFailure::PermissionDenied | SpawnFailure::Other => NOT_EXECUTABLE,
        },
    }
}

/// Only a clean zero exit lets the pipeline continue.
pub fn is_success(status: StepStatus) -> bool {
    matches!(status, StepStatus::Exited { code: 0 })
}
