/// Wait-status classification
///
/// Pure mapping from the kernel's wait status to an [`ExecutionOutcome`], plus the
/// log line each outcome deserves. No process state is touched here.
use crate::config::types::ExecutionOutcome;
use nix::sys::wait::WaitStatus;

/// Classify a wait status. Returns `None` for states that carry no outcome
/// (`StillAlive`, ptrace stops), which callers treat as "wait again".
pub fn classify(status: WaitStatus) -> Option<ExecutionOutcome> {
    match status {
        WaitStatus::Exited(_, code) => Some(ExecutionOutcome::NormalExit(code)),
        WaitStatus::Signaled(_, sig, _) => Some(ExecutionOutcome::Signaled(sig as i32)),
        WaitStatus::Stopped(_, sig) => Some(ExecutionOutcome::Stopped(sig as i32)),
        WaitStatus::Continued(_) => Some(ExecutionOutcome::Continued),
        _ => None,
    }
}

/// Whether an outcome ends the wait loop.
pub fn is_terminal(outcome: &ExecutionOutcome) -> bool {
    !matches!(outcome, ExecutionOutcome::Continued)
}

/// Emit the operational log entry for a child's outcome.
pub fn log_outcome(pid: i32, outcome: &ExecutionOutcome) {
    match outcome {
        ExecutionOutcome::NormalExit(0) | ExecutionOutcome::Continued => {
            log::info!("Child with pid {} {}", pid, outcome)
        }
        ExecutionOutcome::NormalExit(_) => log::warn!("Child with pid {} {}", pid, outcome),
        _ => log::error!("Child with pid {} {}", pid, outcome),
    }
}
