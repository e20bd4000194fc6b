/// Delayed, timed mutex acquisition.
///
/// Wait, lock, hold, release; any lock failure is reported with its reason.
use crate::config::types::{Result, RunnerError};
use log::{error, info};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Sleep `delay_before`, take `mutex`, hold it for `hold`, then release it.
///
/// A poisoned mutex is the only lock failure std can report. Release cannot
/// fail: the guard is dropped at the end of the hold.
pub fn acquire_after<T>(mutex: &Mutex<T>, delay_before: Duration, hold: Duration) -> Result<()> {
    thread::sleep(delay_before);

    let guard = mutex.lock().map_err(|e| {
        error!(
            "Failed to lock mutex in thread {:?}: {}",
            thread::current().id(),
            e
        );
        RunnerError::Lock(format!("mutex poisoned: {}", e))
    })?;

    thread::sleep(hold);
    drop(guard);

    info!(
        "Thread {:?} held the mutex for {:?} after waiting {:?}",
        thread::current().id(),
        hold,
        delay_before
    );
    Ok(())
}

/// Run [`acquire_after`] on a new thread. Fails only if the thread cannot be spawned.
pub fn start_thread_obtaining_mutex<T: Send + 'static>(
    mutex: Arc<Mutex<T>>,
    wait_to_obtain_ms: u64,
    wait_to_release_ms: u64,
) -> Result<JoinHandle<Result<()>>> {
    let handle = thread::Builder::new()
        .name("procrun-lock".to_string())
        .spawn(move || {
            acquire_after(
                &mutex,
                Duration::from_millis(wait_to_obtain_ms),
                Duration::from_millis(wait_to_release_ms),
            )
        })
        .map_err(|e| {
            error!("Failed to create thread: {}", e);
            RunnerError::Lock(format!("failed to spawn lock thread: {}", e))
        })?;

    info!("Started lock thread {:?}", handle.thread().id());
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_acquire_after_waits_and_holds() {
        let mutex = Mutex::new(());
        let start = Instant::now();

        acquire_after(&mutex, Duration::from_millis(20), Duration::from_millis(20)).unwrap();

        assert!(start.elapsed() >= Duration::from_millis(40));
        assert!(mutex.try_lock().is_ok(), "mutex must be released");
    }

    #[test]
    fn test_thread_blocks_while_mutex_held() {
        let mutex = Arc::new(Mutex::new(()));
        let guard = mutex.lock().unwrap();

        let handle = start_thread_obtaining_mutex(Arc::clone(&mutex), 0, 0).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished(), "thread should wait for the held mutex");

        drop(guard);
        assert!(handle.join().unwrap().is_ok());
    }

    #[test]
    fn test_poisoned_mutex_reports_failure() {
        let mutex = Arc::new(Mutex::new(()));
        let poisoner = Arc::clone(&mutex);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the mutex");
        })
        .join();

        let handle = start_thread_obtaining_mutex(mutex, 0, 0).unwrap();
        assert!(matches!(handle.join().unwrap(), Err(RunnerError::Lock(_))));
    }
}
