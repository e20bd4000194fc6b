//! Integration tests for the public launch entry points
//!
//! These exercise real fork/exec/wait cycles against standard system binaries.

use procrun::{
    run_direct, run_direct_outcome, run_direct_redirected, run_direct_redirected_outcome,
    run_via_shell, run_via_shell_outcome, ExecutionOutcome, Runner, RunnerError,
};
use std::path::PathBuf;

fn scratch(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("procrun-it-{}-{}", tag, std::process::id()))
}

#[test]
fn test_direct_true_and_false() {
    assert!(run_direct(&["/bin/true"]));
    // Non-zero normal exit maps to false
    assert!(!run_direct(&["/bin/false"]));
    assert_eq!(run_direct_outcome(&["/bin/false"]), ExecutionOutcome::NormalExit(1));
}

#[test]
fn test_relative_path_spawns_nothing() {
    // If a process were spawned, touch would leave the marker behind.
    let marker = scratch("relative-marker");
    let _ = std::fs::remove_file(&marker);
    let marker_arg = marker.to_str().unwrap();
    let out = scratch("relative-out");

    assert!(!run_direct(&["usr/bin/touch", marker_arg]));
    assert!(!run_direct_redirected(&out, &["usr/bin/touch", marker_arg]));

    let result = Runner::default().exec(&["usr/bin/touch", marker_arg]);
    assert!(matches!(result, Err(RunnerError::PolicyViolation(_))));
    assert!(!marker.exists());
    // The policy check runs before the output file is opened.
    assert!(!out.exists());
}

#[test]
fn test_redirected_echo_writes_exact_output() {
    let out = scratch("echo.txt");

    assert!(run_direct_redirected(&out, &["/bin/echo", "hello"]));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "hello\n");
    let _ = std::fs::remove_file(&out);
}

#[test]
fn test_uncreatable_output_spawns_nothing() {
    let marker = scratch("uncreatable-marker");
    let _ = std::fs::remove_file(&marker);

    let outcome = run_direct_redirected_outcome(
        "/nonexistent-procrun-dir/out.txt",
        &["/usr/bin/touch", marker.to_str().unwrap()],
    );

    assert!(matches!(outcome, ExecutionOutcome::LaunchFailure(_)));
    assert!(!marker.exists(), "no child may run when the output cannot be opened");
}

#[test]
fn test_signal_termination_fails_both_launchers() {
    let kill_self = ["/bin/sh", "-c", "kill -KILL $$"];

    assert!(!run_direct(&kill_self));
    assert_eq!(
        run_direct_outcome(&kill_self),
        ExecutionOutcome::Signaled(libc::SIGKILL)
    );

    let out = scratch("signaled.txt");
    assert!(!run_direct_redirected(&out, &kill_self));
    assert_eq!(
        run_direct_redirected_outcome(&out, &kill_self),
        ExecutionOutcome::Signaled(libc::SIGKILL)
    );
    let _ = std::fs::remove_file(&out);
}

#[test]
fn test_missing_program_is_launch_failure() {
    let result = Runner::default().exec(&["/nonexistent/procrun-program"]);
    assert!(matches!(result, Err(RunnerError::ImageReplacement { .. })));
    assert!(!run_direct(&["/nonexistent/procrun-program"]));
}

#[test]
fn test_shell_runner_normalization() {
    assert!(run_via_shell("true"));
    assert!(!run_via_shell("false"));
    assert_eq!(run_via_shell_outcome("exit 42"), ExecutionOutcome::NormalExit(42));
    assert!(matches!(
        run_via_shell_outcome("procrun-definitely-not-a-command-xyz"),
        ExecutionOutcome::LaunchFailure(_)
    ));
}

#[test]
fn test_shell_runner_passes_command_verbatim() {
    let out = scratch("shell-verbatim.txt");
    let command = format!("printf '%s|%s' 'a b' c > {}", out.display());

    assert!(run_via_shell(&command));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "a b|c");
    let _ = std::fs::remove_file(&out);
}

#[test]
fn test_arguments_are_not_word_split() {
    let out = scratch("argv.txt");

    assert!(run_direct_redirected(
        &out,
        &["/bin/sh", "-c", "printf '%s\\n' \"$#\"", "sh", "one two", "*"]
    ));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "2\n");
    let _ = std::fs::remove_file(&out);
}
