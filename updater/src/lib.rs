//! Fail-fast launcher for the nightly update pipeline.
//!
//! The launcher runs three maintenance programs in a fixed order
//! (`refresh_cache`, `update_games`, `update_search`), handing each the same
//! configuration file, and stops at the first one that fails. The crate keeps
//! the usual split:
//!
//! - **[`core`]**: Pure, deterministic logic (the step plan, exit-code derivation).
//! - **[`io`]**: Side-effecting operations (path layout, launcher config, child
//!   processes, run reports).
//!
//! [`pipeline`] coordinates the two to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod pipeline;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
