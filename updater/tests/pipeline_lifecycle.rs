//! Library-level runs of the pipeline against a fake deployment.
//!
//! These drive `run_pipeline` with the real process launcher, so they cover
//! layout resolution, process spawning and record keeping together.

#![cfg(unix)]

use updater::core::steps::Step;
use updater::core::types::{SpawnFailure, StepStatus};
use updater::io::launcher::ProcessLauncher;
use updater::pipeline::{prepare, run_pipeline};
use updater::test_support::FakeDeployment;

#[test]
fn records_every_step_of_a_clean_run() {
    let deployment = FakeDeployment::new().expect("deployment");
    let (layout, options) = prepare(Some(&deployment.scripts_dir())).expect("prepare");

    let outcome = run_pipeline(&layout, &ProcessLauncher, &options, |_| {}).expect("run");

    assert!(outcome.completed());
    let steps: Vec<Step> = outcome.records.iter().map(|record| record.step).collect();
    assert_eq!(steps, Step::ALL.to_vec());
    assert!(
        outcome
            .records
            .iter()
            .all(|record| record.status == StepStatus::success())
    );
}

#[test]
fn middle_failure_stops_before_search_update() {
    let deployment = FakeDeployment::new().expect("deployment");
    deployment
        .set_exit_code(Step::UpdateGames, 42)
        .expect("exit code");
    let (layout, options) = prepare(Some(&deployment.scripts_dir())).expect("prepare");

    let outcome = run_pipeline(&layout, &ProcessLauncher, &options, |_| {}).expect("run");

    assert_eq!(outcome.exit_code(), 42);
    assert_eq!(outcome.failed_step(), Some(Step::UpdateGames));
    assert_eq!(
        deployment.invoked_steps().expect("calls"),
        vec!["refresh_cache", "update_games"]
    );
}

#[test]
fn unexecutable_interpreter_is_a_spawn_failure() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let deployment = FakeDeployment::new().expect("deployment");
    fs::set_permissions(
        deployment.interpreter_path(),
        fs::Permissions::from_mode(0o644),
    )
    .expect("chmod");
    let (layout, options) = prepare(Some(&deployment.scripts_dir())).expect("prepare");

    let outcome = run_pipeline(&layout, &ProcessLauncher, &options, |_| {}).expect("run");

    assert_eq!(
        outcome.records[0].status,
        StepStatus::SpawnFailed {
            reason: SpawnFailure::PermissionDenied
        }
    );
    assert_eq!(outcome.exit_code(), 126);
    assert_eq!(outcome.records.len(), 1);
}
