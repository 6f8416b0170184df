//! I/O helpers for the launcher.

pub mod config;
pub mod launcher;
pub mod layout;
pub mod process;
pub mod report;
