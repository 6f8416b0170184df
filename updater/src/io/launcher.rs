//! Launcher abstraction for step invocation.
//!
//! The [`StepLauncher`] trait decouples pipeline orchestration from process
//! spawning. Tests use scripted launchers that return predetermined statuses
//! without spawning anything.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, instrument};

use crate::core::steps::Step;
use crate::core::types::StepStatus;
use crate::io::layout::Layout;
use crate::io::process::run_inherited;

/// Parameters for one step invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub step: Step,
    /// Interpreter binary.
    pub program: PathBuf,
    /// Program path followed by the shared config path.
    pub args: Vec<OsString>,
    /// Kill the child after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl LaunchRequest {
    pub fn new(layout: &Layout, step: Step, timeout: Option<Duration>) -> Self {
        Self {
            step,
            program: layout.interpreter.clone(),
            args: layout.args_for(step),
            timeout,
        }
    }
}

/// Abstraction over how a step is actually run.
pub trait StepLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<StepStatus>;
}

/// Launcher that spawns the interpreter as a child process.
pub struct ProcessLauncher;

impl StepLauncher for ProcessLauncher {
    #[instrument(skip_all, fields(step = %request.step))]
    fn launch(&self, request: &LaunchRequest) -> Result<StepStatus> {
        info!(program = %request.program.display(), "starting step");
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args);

        run_inherited(cmd, request.timeout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::io::config::LauncherConfig;
    use std::path::Path;

    #[test]
    fn request_carries_interpreter_and_single_config_arg() {
        let layout = Layout::resolve(Path::new("/srv/app/scripts"), &LauncherConfig::default())
            .expect("layout");
        let request = LaunchRequest::new(&layout, Step::UpdateGames, None);

        assert_eq!(request.program, layout.interpreter);
        assert_eq!(
            request.args,
            vec![
                OsString::from("/srv/app/scripts/update_games.py"),
                OsString::from("/srv/app/scripts/../development.ini"),
            ]
        );
    }

    #[test]
    fn process_launcher_reports_child_exit() {
        let request = LaunchRequest {
            step: Step::RefreshCache,
            program: PathBuf::from("sh"),
            args: vec![OsString::from("-c"), OsString::from("exit 4")],
            timeout: None,
        };
        let status = ProcessLauncher.launch(&request).expect("launch");
        assert_eq!(status, StepStatus::exited(4));
    }
}
