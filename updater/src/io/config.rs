//! Launcher configuration stored in `updater.toml` next to the launcher.
//!
//! This is the launcher's own file. The shared configuration handed to the
//! maintenance programs (`development.ini` by default) is never read here.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File name looked up in the scripts directory.
pub const CONFIG_FILE_NAME: &str = "updater.toml";

/// Launcher configuration (TOML).
///
/// Every field is optional. Missing fields reproduce the fixed deployment
/// layout: `../env/bin/python3` and `../development.ini`, relative to the
/// scripts directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// Interpreter used to run each step. Relative paths are joined onto the
    /// scripts directory.
    pub interpreter: PathBuf,

    /// Configuration file passed to every step. Relative paths are joined
    /// onto the scripts directory.
    pub config: PathBuf,

    /// Kill a step that runs longer than this. Unset means wait forever.
    pub step_timeout_secs: Option<u64>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            interpreter: Path::new("..").join("env").join("bin").join("python3"),
            config: Path::new("..").join("development.ini"),
            step_timeout_secs: None,
        }
    }
}

impl LauncherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interpreter.as_os_str().is_empty() {
            return Err(anyhow!("interpreter must be a non-empty path"));
        }
        if self.config.as_os_str().is_empty() {
            return Err(anyhow!("config must be a non-empty path"));
        }
        if self.step_timeout_secs == Some(0) {
            return Err(anyhow!("step_timeout_secs must be > 0 when set"));
        }
        Ok(())
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }
}

/// Load `updater.toml` from `scripts_dir`.
///
/// If the file is missing, returns `LauncherConfig::default()`.
pub fn load_config(scripts_dir: &Path) -> Result<LauncherConfig> {
    let path = scripts_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        debug!(path = %path.display(), "no launcher config, using defaults");
        return Ok(LauncherConfig::default());
    }
    let contents = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LauncherConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    debug!(path = %path.display(), ?cfg, "launcher config loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(temp.path()).expect("load");
        assert_eq!(cfg, LauncherConfig::default());
        assert_eq!(cfg.step_timeout(), None);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "config = \"../production.ini\"\nstep_timeout_secs = 600\n",
        )
        .expect("write config");

        let cfg = load_config(temp.path()).expect("load");
        assert_eq!(cfg.config, PathBuf::from("../production.ini"));
        assert_eq!(cfg.interpreter, LauncherConfig::default().interpreter);
        assert_eq!(cfg.step_timeout(), Some(Duration::from_secs(600)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(CONFIG_FILE_NAME), "step_timeout_secs = 0\n")
            .expect("write config");

        let err = load_config(temp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("step_timeout_secs must be > 0"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(CONFIG_FILE_NAME), "retries = 3\n").expect("write config");

        let err = load_config(temp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }
}
