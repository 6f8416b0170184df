//! Orchestration for one pipeline run.
//!
//! Steps run strictly in [`Step::ALL`] order, one at a time. The first step
//! that does not exit cleanly ends the run; later steps are never launched.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use tracing::{info, instrument, warn};

use crate::core::exit::{exit_code_for, is_success};
use crate::core::outcome::{PipelineOutcome, StepRecord};
use crate::core::steps::Step;
use crate::io::config::load_config;
use crate::io::launcher::{LaunchRequest, StepLauncher};
use crate::io::layout::{Layout, default_scripts_dir};

/// Settings that apply to every step of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Kill a step that runs longer than this. `None` waits forever.
    pub step_timeout: Option<Duration>,
}

/// Resolve the layout and options for a run.
///
/// `scripts_dir` overrides the default anchor (the launcher's own directory).
/// `updater.toml` is read from whichever directory is used.
pub fn prepare(scripts_dir: Option<&Path>) -> Result<(Layout, PipelineOptions)> {
    let scripts_dir = match scripts_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_scripts_dir()?,
    };
    let cfg = load_config(&scripts_dir).context("load launcher config")?;
    let layout = Layout::resolve(&scripts_dir, &cfg)?;
    let options = PipelineOptions {
        step_timeout: cfg.step_timeout(),
    };
    Ok((layout, options))
}

/// Command lines the run would execute, in order.
pub fn plan(layout: &Layout) -> Vec<String> {
    Step::ALL
        .into_iter()
        .map(|step| layout.display_command(step))
        .collect()
}

/// Run every step in order, stopping at the first failure.
///
/// `on_step` is called after each launched step. A failing step is not an
/// `Err`: it is recorded and ends the run. `Err` means the launcher itself
/// could not continue.
#[instrument(skip_all, fields(scripts_dir = %layout.scripts_dir.display()))]
pub fn run_pipeline<L: StepLauncher, F: FnMut(&StepRecord)>(
    layout: &Layout,
    launcher: &L,
    options: &PipelineOptions,
    mut on_step: F,
) -> Result<PipelineOutcome> {
    let run_start = Instant::now();
    let started_at = timestamp();
    let mut records = Vec::with_capacity(Step::ALL.len());

    for step in Step::ALL {
        let request = LaunchRequest::new(layout, step, options.step_timeout);
        let step_start = Instant::now();
        let step_started_at = timestamp();

        let status = launcher
            .launch(&request)
            .with_context(|| format!("run step {step}"))?;

        let record = StepRecord {
            step,
            command: layout.display_command(step),
            status,
            exit_code: exit_code_for(status),
            started_at: step_started_at,
            ended_at: timestamp(),
            duration_ms: elapsed_ms(step_start),
        };
        on_step(&record);
        let failed = !is_success(status);
        records.push(record);

        if failed {
            warn!(
                %step,
                ?status,
                exit_code = exit_code_for(status),
                "step failed, stopping pipeline"
            );
            break;
        }
        info!(%step, "step succeeded");
    }

    Ok(PipelineOutcome {
        records,
        started_at,
        ended_at: timestamp(),
        duration_ms: elapsed_ms(run_start),
    })
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
