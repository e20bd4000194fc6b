/// Shared type definitions for procrun
///
/// Error taxonomy, execution outcome, and the redirect target's creation policy.
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default permission bits for redirect targets: rwxr-xr-- before umask.
pub const DEFAULT_OUTPUT_MODE: u32 = 0o754;

/// Exit status the shell reports when the command could not be found or run.
pub const SHELL_COMMAND_NOT_FOUND: i32 = 127;

/// Exit status a forked child uses when it fails before its program starts.
pub const CHILD_SETUP_FAILURE: i32 = 127;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A direct launcher was handed a program path it refuses to run.
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    /// The process-creation primitive itself failed.
    #[error("Launch failure: {0}")]
    Launch(String),

    #[error("Failed to start {program}: {reason}")]
    ImageReplacement { program: String, reason: String },

    #[error("Failed to wait for child {pid}: {reason}")]
    Wait { pid: i32, reason: String },

    /// The output file could not be opened or bound to the child's stdout.
    #[error("Resource failure: {0}")]
    Resource(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Lock error: {0}")]
    Lock(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;

/// Classified result of waiting on a child.
///
/// Exactly one variant is produced per invocation. `Continued` is reported by
/// classification but never returned by the launchers, which keep waiting.
/// `Stopped` is likewise classification-only: launchers do not ask for stop
/// reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    NormalExit(i32),
    Signaled(i32),
    Stopped(i32),
    Continued,
    LaunchFailure(String),
}

impl ExecutionOutcome {
    /// Only a clean exit with status 0 counts as success.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::NormalExit(0))
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionOutcome::NormalExit(code) => Some(*code),
            _ => None,
        }
    }

    pub fn signal(&self) -> Option<i32> {
        match self {
            ExecutionOutcome::Signaled(sig) | ExecutionOutcome::Stopped(sig) => Some(*sig),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionOutcome::NormalExit(code) => write!(f, "exited with status {}", code),
            ExecutionOutcome::Signaled(sig) => write!(f, "terminated by signal {}", sig),
            ExecutionOutcome::Stopped(sig) => write!(f, "stopped by signal {}", sig),
            ExecutionOutcome::Continued => write!(f, "continued"),
            ExecutionOutcome::LaunchFailure(reason) => write!(f, "launch failed: {}", reason),
        }
    }
}

impl From<Result<ExecutionOutcome>> for ExecutionOutcome {
    fn from(result: Result<ExecutionOutcome>) -> Self {
        result.unwrap_or_else(|e| ExecutionOutcome::LaunchFailure(e.to_string()))
    }
}

/// File that receives a child's standard output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectTarget {
    pub path: PathBuf,
    pub mode: u32,
}

impl RedirectTarget {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mode: DEFAULT_OUTPUT_MODE,
        }
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Open write-only, creating if absent and truncating if present.
    /// The descriptor is close-on-exec; the child gets its own copy via dup2.
    pub fn open(&self) -> Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(self.mode)
            .open(&self.path)
            .map_err(|e| {
                RunnerError::Resource(format!(
                    "Failed to open output file {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}
