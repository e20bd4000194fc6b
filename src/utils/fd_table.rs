/// Descriptor table inspection via /proc/self/fd.
///
/// Used to check that launches leave no descriptors behind.
use crate::config::types::{Result, RunnerError};
use std::fs;

const FD_DIR: &str = "/proc/self/fd";

/// Sorted list of descriptors open in this process.
///
/// The descriptor used to read the directory itself is included in the
/// listing, so two calls from the same thread are comparable.
pub fn open_fds() -> Result<Vec<i32>> {
    let entries = fs::read_dir(FD_DIR)
        .map_err(|e| RunnerError::Filesystem(format!("Failed to read {}: {}", FD_DIR, e)))?;

    let mut fds: Vec<i32> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| name.parse::<i32>().ok())
        .collect();

    fds.sort_unstable();
    Ok(fds)
}

pub fn open_fd_count() -> Result<usize> {
    open_fds().map(|fds| fds.len())
}
