/// Launch with the child's standard output bound to a file.
///
/// The target is opened before the fork. The parent's `File` is dropped when
/// this function returns, on success and on every error path alike.
use crate::config::types::{ExecutionOutcome, RedirectTarget, Result};
use crate::exec::launcher::{spawn, ExecImage};

pub fn launch_redirected(target: &RedirectTarget, image: &ExecImage) -> Result<ExecutionOutcome> {
    let output = target.open().map_err(|e| {
        log::error!("{}", e);
        e
    })?;

    log::info!(
        "Redirecting stdout of {} to {}",
        image.program(),
        target.path.display()
    );

    let child = spawn(image, Some(&output))?;
    child.wait()
}
