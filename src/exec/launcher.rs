/// Direct process launching: fork, exec by absolute path, wait for the specific pid.
///
/// The parent side is [`spawn`] returning a [`ChildHandle`]; the child side is
/// [`child_entry`], which never returns. Everything the child needs (argv
/// pointers, the redirect fd, the status pipe) is prepared before the fork so
/// the child performs only async-signal-safe calls.
///
/// Exec failures are reported back through a close-on-exec status pipe: EOF
/// means the new image is running, an 8-byte record means setup failed.
use crate::config::types::{ExecutionOutcome, Result, RunnerError, CHILD_SETUP_FAILURE};
use crate::kernel::signal::restore_child_defaults;
use crate::verdict::outcome::{classify, is_terminal, log_outcome};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::waitpid;
use nix::unistd::{fork, pipe2, ForkResult, Pid};
use std::ffi::CString;
use std::fs::File;
use std::io::Read;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

/// Stage at which a forked child gave up before its program started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
enum ChildStage {
    Redirect = 1,
    Exec = 2,
}

impl ChildStage {
    fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::Redirect),
            2 => Some(Self::Exec),
            _ => None,
        }
    }
}

const REPORT_LEN: usize = 8;

/// Program image and NULL-terminated argument vector, owned by the parent and
/// only read by the child.
pub struct ExecImage {
    program: CString,
    display: String,
    _args: Vec<CString>,
    argv: Vec<*const libc::c_char>,
}

impl ExecImage {
    /// Build an image for a direct launch. `args[0]` must be an absolute path.
    pub fn new<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let first = args
            .first()
            .ok_or_else(|| RunnerError::InvalidArgument("empty command".to_string()))?
            .as_ref();

        if !first.starts_with('/') {
            return Err(RunnerError::PolicyViolation(format!(
                "Command path is not absolute: {}",
                first
            )));
        }

        let owned = args
            .iter()
            .map(|arg| {
                CString::new(arg.as_ref()).map_err(|_| {
                    RunnerError::InvalidArgument(format!(
                        "Argument contains NUL byte: {:?}",
                        arg.as_ref()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut argv: Vec<*const libc::c_char> = owned.iter().map(|arg| arg.as_ptr()).collect();
        argv.push(std::ptr::null());

        Ok(Self {
            program: owned[0].clone(),
            display: first.to_string(),
            _args: owned,
            argv,
        })
    }

    pub fn program(&self) -> &str {
        &self.display
    }

    pub fn argc(&self) -> usize {
        self.argv.len() - 1
    }
}

/// Parent-side handle of a child whose image is already running.
#[derive(Debug)]
#[must_use = "a spawned child must be waited for"]
pub struct ChildHandle {
    pid: Pid,
    program: String,
}

impl ChildHandle {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Block until the child terminates. Continue notifications and
    /// interrupted waits are absorbed by waiting again.
    ///
    /// The wait does not request stop reports, so a child stopped by job
    /// control keeps this call blocked until it is continued or killed;
    /// `ExecutionOutcome::Stopped` never comes out of here.
    pub fn wait(self) -> Result<ExecutionOutcome> {
        log::info!(
            "Parent process waiting for child with pid {} ({}) to finish",
            self.pid,
            self.program
        );

        loop {
            match waitpid(self.pid, None) {
                Ok(status) => {
                    let Some(outcome) = classify(status) else {
                        continue;
                    };
                    log_outcome(self.pid.as_raw(), &outcome);
                    if is_terminal(&outcome) {
                        return Ok(outcome);
                    }
                }
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    log::error!("Failed to wait for child process with pid {}: {}", self.pid, e);
                    return Err(RunnerError::Wait {
                        pid: self.pid.as_raw(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}

fn status_pipe() -> Result<(OwnedFd, OwnedFd)> {
    pipe2(OFlag::O_CLOEXEC).map_err(|e| {
        log::error!("Unable to create status pipe: {}", e);
        RunnerError::Launch(format!("pipe2(status): {}", e))
    })
}

/// Fork and exec `image`, optionally binding `stdout` to the child's fd 1.
///
/// Returns once the child's new image is running, or with an error once the
/// failed child has been reaped.
pub fn spawn(image: &ExecImage, stdout: Option<&File>) -> Result<ChildHandle> {
    let stdout_fd = stdout.map(|file| file.as_raw_fd());
    let (report_read, report_write) = status_pipe()?;

    // SAFETY: the child branch only calls async-signal-safe functions on data
    // prepared before the fork, and never returns.
    let pid = match unsafe { fork() } {
        Ok(ForkResult::Child) => child_entry(image, stdout_fd, report_write.as_raw_fd()),
        Ok(ForkResult::Parent { child }) => child,
        Err(e) => {
            log::error!("Unable to create child process, fork failed: {}", e);
            return Err(RunnerError::Launch(format!("fork: {}", e)));
        }
    };

    log::info!("Created child process with pid {} for {}", pid, image.program());

    // Our copy of the write end must go, or the read below never sees EOF.
    drop(report_write);

    let mut report = Vec::with_capacity(REPORT_LEN);
    if let Err(e) = File::from(report_read).read_to_end(&mut report) {
        log::warn!("Failed to read launch status of pid {}: {}", pid, e);
    }

    if report.is_empty() {
        return Ok(ChildHandle {
            pid,
            program: image.program().to_string(),
        });
    }

    reap(pid);
    Err(decode_report(&report, image.program()))
}

fn decode_report(report: &[u8], program: &str) -> RunnerError {
    if report.len() != REPORT_LEN {
        return RunnerError::Launch(format!(
            "malformed launch report ({} bytes) from child running {}",
            report.len(),
            program
        ));
    }

    let stage = u32::from_ne_bytes([report[0], report[1], report[2], report[3]]);
    let errno = i32::from_ne_bytes([report[4], report[5], report[6], report[7]]);
    let reason = std::io::Error::from_raw_os_error(errno).to_string();

    match ChildStage::from_raw(stage) {
        Some(ChildStage::Redirect) => {
            log::error!("Unable to redirect stdout for {}: {}", program, reason);
            RunnerError::Resource(format!("dup2(stdout) for {}: {}", program, reason))
        }
        Some(ChildStage::Exec) => {
            log::error!("Unable to execute {}: {}", program, reason);
            RunnerError::ImageReplacement {
                program: program.to_string(),
                reason,
            }
        }
        None => RunnerError::Launch(format!("unknown launch stage {} for {}", stage, program)),
    }
}

/// Collect a child that failed before exec so it does not linger as a zombie.
fn reap(pid: Pid) {
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                if classify(status).as_ref().map_or(false, is_terminal) {
                    return;
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => {
                log::warn!("Failed to reap child {}: {}", pid, e);
                return;
            }
        }
    }
}

/// Child side of the fork. Binds stdout if requested, restores signal defaults
/// and replaces the image. Any failure is reported to the parent and the child
/// exits immediately; control never returns to the caller's stack.
fn child_entry(image: &ExecImage, stdout: Option<RawFd>, report_fd: RawFd) -> ! {
    restore_child_defaults();

    if let Some(fd) = stdout {
        // SAFETY: plain descriptor syscalls on fds inherited from the parent.
        let bound = unsafe {
            if fd == libc::STDOUT_FILENO {
                // dup2 onto itself keeps FD_CLOEXEC, so clear it explicitly.
                libc::fcntl(fd, libc::F_SETFD, 0)
            } else {
                libc::dup2(fd, libc::STDOUT_FILENO)
            }
        };
        if bound < 0 {
            report_and_exit(report_fd, ChildStage::Redirect);
        }
    }

    // SAFETY: program and argv point into CStrings owned by `image`, and argv
    // is NULL-terminated.
    unsafe {
        libc::execv(image.program.as_ptr(), image.argv.as_ptr());
    }
    report_and_exit(report_fd, ChildStage::Exec)
}

fn report_and_exit(report_fd: RawFd, stage: ChildStage) -> ! {
    let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
    let mut record = [0u8; REPORT_LEN];
    record[..4].copy_from_slice(&(stage as u32).to_ne_bytes());
    record[4..].copy_from_slice(&errno.to_ne_bytes());

    // SAFETY: write and _exit are async-signal-safe; the record lives on our stack.
    unsafe {
        libc::write(
            report_fd,
            record.as_ptr() as *const libc::c_void,
            record.len(),
        );
        libc::_exit(CHILD_SETUP_FAILURE)
    }
}
