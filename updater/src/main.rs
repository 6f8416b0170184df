//! Entry point for the update pipeline launcher.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use updater::exit_codes;
use updater::io::launcher::ProcessLauncher;
use updater::io::report::{RunReport, write_report};
use updater::logging;
use updater::pipeline::{plan, prepare, run_pipeline};

#[derive(Parser)]
#[command(
    name = "updater",
    version,
    about = "Run refresh_cache, update_games and update_search in order, stopping at the first failure"
)]
struct Cli {
    /// Directory holding the step programs. Defaults to the launcher's own directory.
    #[arg(long, env = "UPDATER_SCRIPTS_DIR", value_name = "DIR")]
    scripts_dir: Option<PathBuf>,

    /// Print the commands that would run, then exit without running them.
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON run report to this path once the run ends.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => ExitCode::from(clamp_exit_code(code)),
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::from(clamp_exit_code(exit_codes::INVALID))
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let (layout, options) = prepare(cli.scripts_dir.as_deref())?;

    if cli.dry_run {
        for line in plan(&layout) {
            println!("{line}");
        }
        return Ok(exit_codes::OK);
    }

    let outcome = run_pipeline(&layout, &ProcessLauncher, &options, |record| {
        info!(
            step = %record.step,
            exit_code = record.exit_code,
            duration_ms = record.duration_ms,
            "step finished"
        );
    })?;

    let report = match &cli.report {
        Some(path) => write_report(path, &RunReport::from_outcome(&outcome)),
        None => Ok(()),
    };

    match outcome.failed_step() {
        Some(step) => {
            // The failing step's exit code wins over a report error.
            if let Err(err) = report {
                error!(err = %format!("{err:#}"), "failed to write run report");
            }
            error!(%step, exit_code = outcome.exit_code(), "pipeline failed");
            Ok(outcome.exit_code())
        }
        None => {
            report?;
            Ok(exit_codes::OK)
        }
    }
}

/// Exit codes outside `0..=255` cannot be reported by a process; clamp like a shell would.
fn clamp_exit_code(code: i32) -> u8 {
    (code & 0xff) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_arguments() {
        let cli = Cli::parse_from(["updater"]);
        assert!(cli.scripts_dir.is_none());
        assert!(!cli.dry_run);
        assert!(cli.report.is_none());
    }

    #[test]
    fn parse_all_flags() {
        let cli = Cli::parse_from([
            "updater",
            "--scripts-dir",
            "/srv/app/scripts",
            "--dry-run",
            "--report",
            "run.json",
        ]);
        assert_eq!(cli.scripts_dir, Some(PathBuf::from("/srv/app/scripts")));
        assert!(cli.dry_run);
        assert_eq!(cli.report, Some(PathBuf::from("run.json")));
    }

    #[test]
    fn exit_code_wraps_like_a_shell() {
        assert_eq!(clamp_exit_code(0), 0);
        assert_eq!(clamp_exit_code(137), 137);
        assert_eq!(clamp_exit_code(256 + 4), 4);
    }
}
