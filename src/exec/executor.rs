/// Public execution entry points.
///
/// Every entry point applies the signal policy first, then performs its own
/// fork/exec/wait. Three result shapes are offered:
/// - `Runner` methods return `Result<ExecutionOutcome>` with structured errors
/// - `*_outcome` functions fold errors into `ExecutionOutcome::LaunchFailure`
/// - `run_*` functions return `true` only for a clean exit with status 0
use crate::config::loader::RunnerConfig;
use crate::config::types::{ExecutionOutcome, RedirectTarget, Result, RunnerError};
use crate::exec::launcher::{spawn, ExecImage};
use crate::exec::redirect::launch_redirected;
use crate::exec::shell::run_shell;
use crate::kernel::signal;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a command line through the configured shell.
    pub fn system(&self, command_line: &str) -> Result<ExecutionOutcome> {
        signal::apply_policy();
        run_shell(&self.config.shell, command_line)
    }

    /// Launch `args[0]` (absolute path) with `args` as its argument vector.
    pub fn exec<S: AsRef<str>>(&self, args: &[S]) -> Result<ExecutionOutcome> {
        signal::apply_policy();
        let image = ExecImage::new(args).map_err(log_failure)?;
        spawn(&image, None)?.wait()
    }

    /// Like [`Runner::exec`], with the child's stdout written to `output_path`.
    pub fn exec_redirect<P: AsRef<Path>, S: AsRef<str>>(
        &self,
        output_path: P,
        args: &[S],
    ) -> Result<ExecutionOutcome> {
        signal::apply_policy();
        let image = ExecImage::new(args).map_err(log_failure)?;
        let target = RedirectTarget::new(output_path).with_mode(self.config.output_mode);
        launch_redirected(&target, &image)
    }
}

/// Rejections made before any fork are logged here; later failures are logged
/// where they occur.
fn log_failure(err: RunnerError) -> RunnerError {
    log::error!("{}", err);
    err
}

pub fn apply_signal_policy() {
    signal::apply_policy();
}

pub fn run_via_shell_outcome(command_line: &str) -> ExecutionOutcome {
    Runner::default().system(command_line).into()
}

pub fn run_via_shell(command_line: &str) -> bool {
    run_via_shell_outcome(command_line).is_success()
}

pub fn run_direct_outcome<S: AsRef<str>>(args: &[S]) -> ExecutionOutcome {
    Runner::default().exec(args).into()
}

pub fn run_direct<S: AsRef<str>>(args: &[S]) -> bool {
    run_direct_outcome(args).is_success()
}

pub fn run_direct_redirected_outcome<P: AsRef<Path>, S: AsRef<str>>(
    output_path: P,
    args: &[S],
) -> ExecutionOutcome {
    Runner::default().exec_redirect(output_path, args).into()
}

pub fn run_direct_redirected<P: AsRef<Path>, S: AsRef<str>>(output_path: P, args: &[S]) -> bool {
    run_direct_redirected_outcome(output_path, args).is_success()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_true_and_false() {
        assert!(run_direct(&["/bin/true"]));
        assert!(!run_direct(&["/bin/false"]));
    }

    #[test]
    fn test_nonzero_exit_code_is_preserved_in_outcome() {
        assert_eq!(
            run_direct_outcome(&["/bin/sh", "-c", "exit 3"]),
            ExecutionOutcome::NormalExit(3)
        );
    }

    #[test]
    fn test_relative_path_is_policy_violation() {
        let runner = Runner::default();
        assert!(matches!(
            runner.exec(&["relative/path"]),
            Err(RunnerError::PolicyViolation(_))
        ));
        assert!(!run_direct(&["relative/path"]));
    }

    #[test]
    fn test_shell_success_requires_zero_exit() {
        assert!(run_via_shell("exit 0"));
        assert!(!run_via_shell("exit 1"));
        assert!(!run_via_shell("procrun-definitely-not-a-command-xyz"));
    }

    #[test]
    fn test_runner_uses_configured_shell() {
        let runner = Runner::new(RunnerConfig {
            shell: "/nonexistent/sh".into(),
            ..RunnerConfig::default()
        });
        assert!(matches!(
            runner.system("true"),
            Err(RunnerError::ImageReplacement { .. })
        ));
    }

    #[test]
    fn test_runner_applies_configured_output_mode() {
        use std::os::unix::fs::PermissionsExt;

        let path = std::env::temp_dir().join(format!("procrun-mode-{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let runner = Runner::new(RunnerConfig {
            output_mode: 0o600,
            ..RunnerConfig::default()
        });

        let outcome = runner.exec_redirect(&path, &["/bin/echo", "x"]).unwrap();

        assert!(outcome.is_success());
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        let _ = std::fs::remove_file(&path);
    }
}
