/// Shell-mediated command execution: `<shell> -c <command line>`.
///
/// The command line is passed through verbatim; quoting, globbing and
/// expansion are entirely the shell's business.
use crate::config::types::{ExecutionOutcome, Result, RunnerError, SHELL_COMMAND_NOT_FOUND};
use crate::exec::launcher::{spawn, ExecImage};
use std::path::Path;

pub fn run_shell(shell: &Path, command_line: &str) -> Result<ExecutionOutcome> {
    let shell = shell.to_str().ok_or_else(|| {
        log::error!("Shell path is not valid UTF-8: {}", shell.display());
        RunnerError::Config(format!("shell path is not valid UTF-8: {}", shell.display()))
    })?;

    let image = ExecImage::new(&[shell, "-c", command_line]).map_err(|e| {
        log::error!("Rejected shell command {:?}: {}", command_line, e);
        e
    })?;
    let outcome = spawn(&image, None)?.wait()?;

    if outcome == ExecutionOutcome::NormalExit(SHELL_COMMAND_NOT_FOUND) {
        log::error!("Shell could not execute the command, it may not be found: {}", command_line);
        return Err(RunnerError::CommandNotFound(command_line.to_string()));
    }

    log::info!("Shell command {:?} {}", command_line, outcome);
    Ok(outcome)
}
