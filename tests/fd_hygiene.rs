//! Descriptor and process-table leak check for launches
//!
//! Kept in its own test binary with a single test so no concurrent test can
//! open descriptors or fork children between the snapshots.

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::Pid;
use procrun::utils::fd_table::open_fds;
use procrun::{run_direct, run_direct_redirected, run_via_shell};

#[test]
fn test_launches_leave_no_descriptors_or_children_behind() {
    let out = std::env::temp_dir().join(format!("procrun-fd-{}.txt", std::process::id()));
    let before = open_fds().unwrap();

    assert!(run_direct_redirected(&out, &["/bin/echo", "hello"]));
    assert!(!run_direct_redirected(&out, &["/bin/false"]));
    assert!(!run_direct_redirected(&out, &["/nonexistent/procrun-program"]));
    assert!(!run_direct_redirected(
        "/nonexistent-procrun-dir/out.txt",
        &["/bin/true"]
    ));
    assert!(!run_direct(&["/nonexistent/procrun-program"]));
    assert!(!run_direct(&["/bin/sh", "-c", "kill -KILL $$"]));
    assert!(!run_via_shell("procrun-no-such-command-xyz"));
    assert!(run_direct(&["/bin/true"]));
    assert!(run_via_shell("true"));

    let after = open_fds().unwrap();
    assert_eq!(before, after, "descriptor table changed across launches");

    // Every child, including ones that failed before exec, has been reaped.
    assert_eq!(
        waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)),
        Err(Errno::ECHILD)
    );
    let _ = std::fs::remove_file(&out);
}
