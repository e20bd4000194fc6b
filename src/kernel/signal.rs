//! Signal policy applied before any child is launched.
//!
//! SIGCHLD, SIGINT and SIGQUIT are blocked in the calling thread, and SIGINT/SIGQUIT
//! are additionally ignored, so a keyboard interrupt cannot tear the parent down
//! while fork/wait bookkeeping is in flight. Failures are logged and never fatal.
use log::{info, warn};
use nix::sys::signal::{self, SigHandler, SigSet, SigmaskHow, Signal};

/// Signals blocked for the duration of process bookkeeping.
pub const BLOCKED_SIGNALS: [Signal; 3] = [Signal::SIGCHLD, Signal::SIGINT, Signal::SIGQUIT];

/// Signals whose disposition is set to ignore.
pub const IGNORED_SIGNALS: [Signal; 2] = [Signal::SIGINT, Signal::SIGQUIT];

fn blocked_set() -> SigSet {
    let mut mask = SigSet::empty();
    for sig in BLOCKED_SIGNALS {
        mask.add(sig);
    }
    mask
}

/// Apply the signal policy to the calling process. Safe to call repeatedly.
pub fn apply_policy() {
    let mask = blocked_set();

    match signal::sigprocmask(SigmaskHow::SIG_BLOCK, Some(&mask), None) {
        Ok(()) => info!("Signal policy applied: SIGCHLD, SIGINT, SIGQUIT blocked"),
        Err(e) => warn!("Failed to block SIGCHLD/SIGINT/SIGQUIT, continuing: {}", e),
    }

    for sig in IGNORED_SIGNALS {
        // SAFETY: SIG_IGN installs no handler code.
        if let Err(e) = unsafe { signal::signal(sig, SigHandler::SigIgn) } {
            warn!("Failed to ignore {}, continuing: {}", sig, e);
        }
    }
}

/// Current signal mask of the calling thread.
pub fn current_mask() -> nix::Result<SigSet> {
    SigSet::thread_get_mask()
}

/// Undo the policy inside a freshly forked child, right before exec.
///
/// Only async-signal-safe calls are made here: the raw `signal` and
/// `sigprocmask` wrappers. Errors are ignored because the child has nowhere
/// to report them and the exec must still be attempted.
pub(crate) fn restore_child_defaults() {
    // SAFETY: both calls are async-signal-safe and touch only this process.
    unsafe {
        let mut set: libc::sigset_t = std::mem::zeroed();
        libc::sigemptyset(&mut set);
        for sig in BLOCKED_SIGNALS {
            libc::sigaddset(&mut set, sig as libc::c_int);
        }
        libc::sigprocmask(libc::SIG_UNBLOCK, &set, std::ptr::null_mut());

        for sig in IGNORED_SIGNALS {
            libc::signal(sig as libc::c_int, libc::SIG_DFL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_blocks_expected_signals() {
        apply_policy();
        let mask = current_mask().unwrap();
        for sig in BLOCKED_SIGNALS {
            assert!(mask.contains(sig), "{} should be blocked", sig);
        }
    }

    #[test]
    fn test_policy_is_idempotent() {
        apply_policy();
        let first = current_mask().unwrap();
        apply_policy();
        let second = current_mask().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_policy_ignores_interrupt_and_quit() {
        apply_policy();
        for sig in IGNORED_SIGNALS {
            // SAFETY: reads the disposition back by re-installing SIG_IGN.
            let previous = unsafe { signal::signal(sig, SigHandler::SigIgn) }.unwrap();
            assert_eq!(previous, SigHandler::SigIgn);
        }
    }
}
