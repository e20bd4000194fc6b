/// Write-with-result helper and its progress indicator.
///
/// The spinner runs on its own thread and stops when its cancellation channel
/// fires or disconnects; there is no shared "running" flag.
use crate::config::types::{Result, RunnerError};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use log::{debug, error, info};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const FRAMES: [&str; 3] = [".", "..", "..."];
const FRAME_INTERVAL: Duration = Duration::from_millis(500);

/// Background "in progress" indicator.
pub struct ProgressIndicator {
    cancel: Sender<()>,
    handle: JoinHandle<usize>,
}

impl ProgressIndicator {
    /// Start a spinner on stderr.
    pub fn start(label: &str) -> Self {
        Self::start_with_sink(label, std::io::stderr(), FRAME_INTERVAL)
    }

    pub fn start_with_sink<W: Write + Send + 'static>(
        label: &str,
        mut sink: W,
        interval: Duration,
    ) -> Self {
        let (cancel, cancelled) = bounded::<()>(1);
        let label = label.to_string();

        let handle = thread::spawn(move || {
            let mut frames = 0usize;
            loop {
                let _ = write!(
                    sink,
                    "\rProcessing in directory: {} {}",
                    label,
                    FRAMES[frames % FRAMES.len()]
                );
                let _ = sink.flush();
                frames += 1;

                match cancelled.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            let _ = writeln!(sink, "\rProcessing in directory: {} Done!", label);
            let _ = sink.flush();
            info!("Processing in directory: {} Done!", label);
            frames
        });

        Self { cancel, handle }
    }

    /// Stop the spinner and wait for it. Returns the number of frames drawn.
    pub fn finish(self) -> usize {
        let _ = self.cancel.send(());
        self.handle.join().unwrap_or(0)
    }
}

/// Create parent directories, truncate `path` and write `content`.
pub fn try_write_text(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                RunnerError::Filesystem(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    debug!("Writing '{}' to {}", content, path.display());
    fs::write(path, content).map_err(|e| {
        RunnerError::Filesystem(format!("Error writing file {}: {}", path.display(), e))
    })?;

    info!("File written successfully: {}", path.display());
    Ok(())
}

pub fn write_text(path: &Path, content: &str) -> bool {
    match try_write_text(path, content) {
        Ok(()) => true,
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}

/// [`try_write_text`] with a spinner on stderr while the write is in flight.
pub fn try_write_text_with_progress(path: &Path, content: &str) -> Result<()> {
    let progress = ProgressIndicator::start(&path.display().to_string());
    let written = try_write_text(path, content);
    progress.finish();
    written
}

pub fn write_text_with_progress(path: &Path, content: &str) -> bool {
    match try_write_text_with_progress(path, content) {
        Ok(()) => true,
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}
