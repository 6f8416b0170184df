//! Test-only helpers: a scripted launcher and a throwaway deployment layout.

use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::{Result, anyhow, bail};

use crate::core::steps::Step;
use crate::core::types::StepStatus;
use crate::io::launcher::{LaunchRequest, StepLauncher};

#[cfg(unix)]
pub use fake_deployment::{FakeDeployment, Invocation};

/// Launcher that returns queued statuses in order and records every request.
pub struct ScriptedLauncher {
    queue: RefCell<VecDeque<StepStatus>>,
    requests: RefCell<Vec<LaunchRequest>>,
}

impl ScriptedLauncher {
    pub fn new(statuses: Vec<StepStatus>) -> Self {
        Self {
            queue: RefCell::new(statuses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LaunchRequest> {
        self.requests.borrow().clone()
    }

    pub fn launched_steps(&self) -> Vec<Step> {
        self.requests.borrow().iter().map(|r| r.step).collect()
    }

    /// Fails if queued statuses were never consumed.
    pub fn assert_drained(&self) -> Result<()> {
        let remaining = self.queue.borrow().len();
        if remaining > 0 {
            bail!("scripted launcher has {remaining} unused statuses");
        }
        Ok(())
    }
}

impl StepLauncher for ScriptedLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<StepStatus> {
        self.requests.borrow_mut().push(request.clone());
        self.queue
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("scripted launcher exhausted at {}", request.step))
    }
}

#[cfg(unix)]
mod fake_deployment {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};

    use crate::core::steps::Step;

    /// One recorded call of the fake interpreter.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Invocation {
        /// Step name derived from the program file name.
        pub step: String,
        /// Arguments after the program path.
        pub args: Vec<String>,
    }

    /// A temp directory shaped like a real deployment:
    ///
    /// ```text
    /// <root>/
    /// ├── development.ini
    /// ├── env/bin/python3      (shell script that logs its calls)
    /// └── scripts/
    ///     ├── refresh_cache.py
    ///     ├── update_games.py
    ///     └── update_search.py
    /// ```
    ///
    /// The fake interpreter appends one line per call to `<root>/calls.log` and
    /// exits with the code stored in `<root>/exit_codes/<step>` (0 if absent).
    pub struct FakeDeployment {
        dir: tempfile::TempDir,
    }

    impl FakeDeployment {
        pub fn new() -> Result<Self> {
            let dir = tempfile::tempdir().context("create deployment tempdir")?;
            let deployment = Self { dir };
            let root = deployment.root().to_path_buf();

            fs::create_dir_all(root.join("env").join("bin")).context("create env/bin")?;
            fs::create_dir_all(deployment.scripts_dir()).context("create scripts dir")?;
            fs::create_dir_all(root.join("exit_codes")).context("create exit_codes dir")?;
            fs::write(deployment.config_path(), "[app:main]\n").context("write config")?;
            for step in Step::ALL {
                fs::write(
                    deployment.scripts_dir().join(step.script_file()),
                    "raise SystemExit(0)\n",
                )
                .with_context(|| format!("write {}", step.script_file()))?;
            }

            let interpreter = deployment.interpreter_path();
            fs::write(&interpreter, fake_interpreter(&root)).context("write fake python3")?;
            fs::set_permissions(&interpreter, fs::Permissions::from_mode(0o755))
                .context("chmod fake python3")?;
            Ok(deployment)
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn scripts_dir(&self) -> PathBuf {
            self.root().join("scripts")
        }

        pub fn interpreter_path(&self) -> PathBuf {
            self.root().join("env").join("bin").join("python3")
        }

        pub fn config_path(&self) -> PathBuf {
            self.root().join("development.ini")
        }

        /// Make `step` exit with `code`.
        pub fn set_exit_code(&self, step: Step, code: i32) -> Result<()> {
            let path = self.root().join("exit_codes").join(step.name());
            fs::write(&path, code.to_string()).with_context(|| format!("write {}", path.display()))
        }

        /// Copy a launcher binary into `scripts/` so it resolves this layout on its own.
        pub fn install_launcher(&self, binary: &Path) -> Result<PathBuf> {
            let dest = self.scripts_dir().join("updater");
            fs::copy(binary, &dest).with_context(|| format!("copy {}", binary.display()))?;
            fs::set_permissions(&dest, fs::Permissions::from_mode(0o755))
                .context("chmod launcher")?;
            Ok(dest)
        }

        /// Calls made to the fake interpreter so far, in order.
        pub fn invocations(&self) -> Result<Vec<Invocation>> {
            let path = self.root().join("calls.log");
            if !path.exists() {
                return Ok(Vec::new());
            }
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            Ok(contents
                .lines()
                .filter(|line| !line.is_empty())
                .map(|line| {
                    let mut fields = line.split('\t').map(str::to_string);
                    let step = fields.next().unwrap_or_default();
                    Invocation {
                        step,
                        args: fields.collect(),
                    }
                })
                .collect())
        }

        pub fn invoked_steps(&self) -> Result<Vec<String>> {
            Ok(self.invocations()?.into_iter().map(|i| i.step).collect())
        }
    }

    fn fake_interpreter(root: &Path) -> String {
        let root = root.display();
        format!(
            r#"#!/bin/sh
name=$(basename "$1" .py)
shift
line="$name"
for arg in "$@"; do
    line="$line	$arg"
done
printf '%s\n' "$line" >> "{root}/calls.log"
if [ -f "{root}/exit_codes/$name" ]; then
    exit "$(cat "{root}/exit_codes/$name")"
fi
exit 0
"#
        )
    }
}
