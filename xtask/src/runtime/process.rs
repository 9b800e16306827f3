//! Shared process execution helpers.

use crate::runtime::error::{XtaskError, XtaskResult};
use std::path::Path;
use std::process::{Command, Stdio};

const WASM_TARGET: &str = "wasm32-unknown-unknown";

/// Shared process runner used by command modules.
///
/// Commands are echoed in a stable `+ ...` format and non-zero exits are normalized into
/// [`XtaskError`] categories.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a process runner.
    pub fn new() -> Self {
        Self
    }

    /// Return whether the given program is available by checking `--version`.
    pub fn command_available(&self, program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Require a command to exist.
    pub fn ensure_command(&self, program: &str, hint: &str) -> XtaskResult<()> {
        if self.command_available(program) {
            Ok(())
        } else {
            Err(XtaskError::environment(format!(
                "required command `{program}` not found"
            ))
            .with_hint(hint))
        }
    }

    /// Return whether rustup reports the wasm target as installed.
    pub fn wasm_target_installed(&self) -> bool {
        let Ok(output) = Command::new("rustup")
            .args(["target", "list", "--installed"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
        else {
            return false;
        };

        output.status.success()
            && String::from_utf8_lossy(&output.stdout)
                .lines()
                .any(|line| line.trim() == WASM_TARGET)
    }

    /// Install the wasm target through rustup.
    pub fn add_wasm_target(&self, root: &Path) -> XtaskResult<()> {
        self.run(root, "rustup", vec!["target", "add", WASM_TARGET])
    }

    /// Run a process with borrowed string arguments.
    pub fn run(&self, root: &Path, program: &str, args: Vec<&str>) -> XtaskResult<()> {
        let owned = args.into_iter().map(ToString::to_string).collect();
        self.run_owned(root, program, owned)
    }

    /// Run a process with owned string arguments, inheriting the terminal stdio streams.
    pub fn run_owned(&self, root: &Path, program: &str, args: Vec<String>) -> XtaskResult<()> {
        self.print_command(program, &args);
        let status = Command::new(program)
            .current_dir(root)
            .args(&args)
            .status()
            .map_err(|err| {
                XtaskError::process_launch(format!("failed to start `{program}`: {err}"))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(XtaskError::process_exit(format!(
                "`{program}` exited with status {status}"
            )))
        }
    }

    /// Run `trunk` from `cwd`.
    pub fn run_trunk(&self, cwd: &Path, args: Vec<String>) -> XtaskResult<()> {
        self.run_owned(cwd, "trunk", args)
            .map_err(|err| err.with_operation("trunk"))
    }

    /// Print a command in the shared `+ program args` format.
    pub fn print_command(&self, program: &str, args: &[String]) {
        if args.is_empty() {
            println!("+ {program}");
        } else {
            println!("+ {program} {}", args.join(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_is_an_environment_error_with_hint() {
        let runner = ProcessRunner::new();
        let err = runner
            .ensure_command("definitely-not-a-real-xtask-tool", "install it")
            .expect_err("missing");
        assert_eq!(
            err.category,
            crate::runtime::error::XtaskErrorCategory::Environment
        );
        assert_eq!(err.hint.as_deref(), Some("install it"));
    }

    #[test]
    fn launch_failure_is_reported_as_process_launch() {
        let runner = ProcessRunner::new();
        let err = runner
            .run(
                &std::env::temp_dir(),
                "definitely-not-a-real-xtask-tool",
                vec![],
            )
            .expect_err("launch");
        assert_eq!(
            err.category,
            crate::runtime::error::XtaskErrorCategory::ProcessLaunch
        );
    }
}
