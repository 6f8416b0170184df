//! Stable exit codes for the launcher itself.
//!
//! A failing step does not use these: its own exit code is propagated instead
//! (see [`crate::core::exit`]).

/// Every step succeeded, or a dry run finished.
pub const OK: i32 = 0;
/// The launcher could not run the pipeline (bad launcher config, unresolvable
/// executable path, unwritable report).
pub const INVALID: i32 = 1;
