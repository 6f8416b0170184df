//! JSON run report written after a pipeline run (`--report <path>`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::outcome::{PipelineOutcome, StepRecord};
use crate::core::steps::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    Completed,
    Failed,
}

/// Serialized summary of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: String,
    pub ended_at: String,
    pub duration_ms: u64,
    pub outcome: ReportOutcome,
    pub exit_code: i32,
    pub failed_step: Option<Step>,
    /// Steps that actually ran, in order. Steps skipped after a failure are absent.
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    pub fn from_outcome(outcome: &PipelineOutcome) -> Self {
        let failed_step = outcome.failed_step();
        Self {
            started_at: outcome.started_at.clone(),
            ended_at: outcome.ended_at.clone(),
            duration_ms: outcome.duration_ms,
            outcome: if failed_step.is_some() {
                ReportOutcome::Failed
            } else {
                ReportOutcome::Completed
            },
            exit_code: outcome.exit_code(),
            failed_step,
            steps: outcome.records.clone(),
        }
    }
}

/// Atomically write the report (temp file + rename).
pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    debug!(path = %path.display(), outcome = ?report.outcome, "writing run report");
    let mut buf = serde_json::to_string_pretty(report).context("serialize run report")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

pub fn load_report(path: &Path) -> Result<RunReport> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read run report {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse run report {}", path.display()))
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp report {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace report {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::StepStatus;

    fn record(step: Step, status: StepStatus) -> StepRecord {
        StepRecord {
            step,
            command: format!("python3 {} development.ini", step.script_file()),
            status,
            exit_code: crate::core::exit::exit_code_for(status),
            started_at: "2024-01-01T00:00:00Z".to_string(),
            ended_at: "2024-01-01T00:00:01Z".to_string(),
            duration_ms: 1000,
        }
    }

    fn outcome(records: Vec<StepRecord>) -> PipelineOutcome {
        PipelineOutcome {
            records,
            started_at: "2024-01-01T00:00:00Z".to_string(),
            ended_at: "2024-01-01T00:00:02Z".to_string(),
            duration_ms: 2000,
        }
    }

    #[test]
    fn failed_run_names_the_failing_step() {
        let report = RunReport::from_outcome(&outcome(vec![
            record(Step::RefreshCache, StepStatus::success()),
            record(Step::UpdateGames, StepStatus::exited(3)),
        ]));

        assert_eq!(report.outcome, ReportOutcome::Failed);
        assert_eq!(report.exit_code, 3);
        assert_eq!(report.failed_step, Some(Step::UpdateGames));
        assert_eq!(report.steps.len(), 2);
    }

    #[test]
    fn write_creates_parent_dirs_and_leaves_no_temp_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("reports").join("last.json");
        let report = RunReport::from_outcome(&outcome(
            Step::ALL
                .into_iter()
                .map(|step| record(step, StepStatus::success()))
                .collect(),
        ));

        write_report(&path, &report).expect("write");

        assert!(path.is_file());
        assert!(!path.with_extension("json.tmp").exists());
        let loaded = load_report(&path).expect("load");
        assert_eq!(loaded.outcome, ReportOutcome::Completed);
        assert_eq!(loaded.exit_code, 0);
        assert_eq!(loaded.failed_step, None);
    }
}
