//! What a run produced: one record per launched step.

use serde::{Deserialize, Serialize};

use crate::core::exit::is_success;
use crate::core::steps::Step;
use crate::core::types::StepStatus;

/// Record of one step that was launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    /// Shell-style rendering of the invocation.
    pub command: String,
    pub status: StepStatus,
    pub exit_code: i32,
    pub started_at: String,
    pub ended_at: String,
    pub duration_ms: u64,
}

/// Result of a run. Only steps that were launched have a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub records: Vec<StepRecord>,
    pub started_at: String,
    pub ended_at: String,
    pub duration_ms: u64,
}

impl PipelineOutcome {
    /// The step that stopped the run, if any.
    pub fn failed_step(&self) -> Option<Step> {
        self.first_failure().map(|record| record.step)
    }

    /// `0` when every step succeeded, otherwise the first failing step's code.
    pub fn exit_code(&self) -> i32 {
        self.first_failure().map_or(0, |record| record.exit_code)
    }

    pub fn completed(&self) -> bool {
        self.failed_step().is_none() && self.records.len() == Step::ALL.len()
    }

    fn first_failure(&self) -> Option<&StepRecord> {
        self.records.iter().find(|record| !is_success(record.status))
    }
}
