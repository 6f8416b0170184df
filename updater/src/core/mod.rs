//! Pure, deterministic launcher logic. No I/O.

pub mod exit;
pub mod outcome;
pub mod steps;
pub mod types;
