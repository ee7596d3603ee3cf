//! Setup script execution.
//!
//! [`LocalScriptRunner`] runs scripts as real subprocesses with inherited
//! standard streams, blocking until they exit. `sudo` elevation prefixes
//! the invocation. There is no timeout: a hung script blocks the whole
//! pipeline.
//!
//! [`RecordingScriptRunner`] captures invocations for tests.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use kiln_core::application::ApplicationError;
use kiln_core::application::ports::ScriptRunner;
use kiln_core::error::KilnResult;

/// Runs scripts as subprocesses via `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalScriptRunner;

impl LocalScriptRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptRunner for LocalScriptRunner {
    fn run(&self, script: &Path, as_sudo: bool, working_dir: &Path) -> KilnResult<()> {
        let mut command = if as_sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(script);
            cmd
        } else {
            Command::new(script)
        };
        command.current_dir(working_dir);

        info!(script = %script.display(), sudo = as_sudo, "running setup script");

        // Standard streams are inherited by default, so the script talks
        // directly to the user's terminal.
        let status = command
            .status()
            .map_err(|e| ApplicationError::ScriptFailure {
                script: script.display().to_string(),
                reason: format!("failed to launch: {e}"),
            })?;

        if !status.success() {
            return Err(ApplicationError::ScriptFailure {
                script: script.display().to_string(),
                reason: match status.code() {
                    Some(code) => format!("exit status {code}"),
                    None => "terminated by signal".into(),
                },
            }
            .into());
        }

        debug!(script = %script.display(), "script finished");
        Ok(())
    }
}

/// One recorded invocation of [`RecordingScriptRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInvocation {
    pub script: PathBuf,
    pub as_sudo: bool,
    pub working_dir: PathBuf,
}

/// Test double that records invocations instead of spawning processes.
///
/// Clones share the record, so a test can keep a handle after boxing a
/// clone into the materializer.
#[derive(Debug, Clone, Default)]
pub struct RecordingScriptRunner {
    invocations: Arc<Mutex<Vec<ScriptInvocation>>>,
    fail_on: Option<String>,
}

impl RecordingScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any script whose path ends with `name`.
    pub fn failing_on(name: impl Into<String>) -> Self {
        Self {
            invocations: Arc::default(),
            fail_on: Some(name.into()),
        }
    }

    pub fn invocations(&self) -> Vec<ScriptInvocation> {
        self.invocations.lock().unwrap().clone()
    }
}

impl ScriptRunner for RecordingScriptRunner {
    fn run(&self, script: &Path, as_sudo: bool, working_dir: &Path) -> KilnResult<()> {
        if let Some(fail) = &self.fail_on {
            if script.ends_with(fail) {
                return Err(ApplicationError::ScriptFailure {
                    script: script.display().to_string(),
                    reason: "exit status 1".into(),
                }
                .into());
            }
        }
        self.invocations.lock().unwrap().push(ScriptInvocation {
            script: script.to_path_buf(),
            as_sudo,
            working_dir: working_dir.to_path_buf(),
        });
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::error::KilnError;

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).unwrap();
            path
        }

        #[test]
        fn successful_script_runs_in_working_dir() {
            let temp = TempDir::new().unwrap();
            let script = write_script(temp.path(), "touch.sh", "touch created-here");

            LocalScriptRunner::new()
                .run(&script, false, temp.path())
                .unwrap();
            assert!(temp.path().join("created-here").exists());
        }

        #[test]
        fn nonzero_exit_is_script_failure() {
            let temp = TempDir::new().unwrap();
            let script = write_script(temp.path(), "fail.sh", "exit 3");

            let err = LocalScriptRunner::new()
                .run(&script, false, temp.path())
                .unwrap_err();
            let KilnError::Application(ApplicationError::ScriptFailure { reason, .. }) = err
            else {
                panic!("expected ScriptFailure");
            };
            assert!(reason.contains('3'));
        }
    }

    #[test]
    fn missing_script_is_a_launch_failure() {
        let err = LocalScriptRunner::new()
            .run(Path::new("/absolutely/does/not/exist.sh"), false, Path::new("/tmp"))
            .unwrap_err();
        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::ScriptFailure { .. })
        ));
    }

    #[test]
    fn recorder_captures_order_and_elevation() {
        let runner = RecordingScriptRunner::new();
        runner
            .run(Path::new("/s/global.sh"), true, Path::new("/p"))
            .unwrap();
        runner
            .run(Path::new("/s/local.sh"), false, Path::new("/p"))
            .unwrap();

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 2);
        assert!(invocations[0].as_sudo);
        assert_eq!(invocations[1].script, PathBuf::from("/s/local.sh"));
    }

    #[test]
    fn recorder_fail_on_matches_file_name() {
        let runner = RecordingScriptRunner::failing_on("bad.sh");
        assert!(runner.run(Path::new("/s/ok.sh"), false, Path::new("/p")).is_ok());
        assert!(
            runner
                .run(Path::new("/s/bad.sh"), false, Path::new("/p"))
                .is_err()
        );
    }
}
