//! Deployment layout: where the interpreter, the shared config and the step
//! programs live.
//!
//! Everything is resolved against the scripts directory (by default the
//! directory holding the launcher executable), never against the caller's
//! working directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::steps::Step;
use crate::io::config::LauncherConfig;

/// Resolved paths for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub scripts_dir: PathBuf,
    pub interpreter: PathBuf,
    pub config: PathBuf,
}

impl Layout {
    /// Resolve the layout around `scripts_dir`.
    ///
    /// Relative paths in `cfg` are joined onto `scripts_dir`; absolute ones are
    /// kept. Nothing is checked for existence: a missing interpreter shows up
    /// as a spawn failure of the first step.
    pub fn resolve(scripts_dir: &Path, cfg: &LauncherConfig) -> Result<Self> {
        let scripts_dir = std::path::absolute(scripts_dir)
            .with_context(|| format!("resolve scripts dir {}", scripts_dir.display()))?;
        let layout = Self {
            interpreter: scripts_dir.join(&cfg.interpreter),
            config: scripts_dir.join(&cfg.config),
            scripts_dir,
        };
        debug!(
            scripts_dir = %layout.scripts_dir.display(),
            interpreter = %layout.interpreter.display(),
            config = %layout.config.display(),
            "layout resolved"
        );
        Ok(layout)
    }

    pub fn script_path(&self, step: Step) -> PathBuf {
        self.scripts_dir.join(step.script_file())
    }

    /// Arguments passed to the interpreter for `step`: the program, then the
    /// shared config path as its only argument.
    pub fn args_for(&self, step: Step) -> Vec<OsString> {
        vec![
            self.script_path(step).into_os_string(),
            self.config.clone().into_os_string(),
        ]
    }

    /// Shell-style rendering of the command line, for logs and dry runs.
    pub fn display_command(&self, step: Step) -> String {
        format!(
            "{} {} {}",
            self.interpreter.display(),
            self.script_path(step).display(),
            self.config.display()
        )
    }
}

/// Directory containing the running launcher, with symlinks resolved.
pub fn default_scripts_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locate launcher executable")?;
    let exe = exe
        .canonicalize()
        .with_context(|| format!("canonicalize {}", exe.display()))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("launcher executable {} has no parent", exe.display()))
}
