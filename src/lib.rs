//! procrun: process execution primitives over fork/exec/wait
//!
//! # Architecture
//!
//! ## Kernel State ([`kernel`])
//! - [`kernel::signal`]: Signal policy applied before every launch
//!
//! ## Execution Control ([`exec`])
//! - [`exec::executor`]: Public entry points and the configurable [`Runner`]
//! - [`exec::launcher`]: fork, exec by absolute path, wait on the specific child
//! - [`exec::redirect`]: Launch with stdout bound to a file
//! - [`exec::shell`]: `<shell> -c <command>` execution
//!
//! ## Outcome ([`verdict`])
//! - [`verdict::outcome`]: Wait status to [`ExecutionOutcome`] classification
//!
//! ## Configuration ([`config`])
//! - [`config::loader`]: `procrun.json` loading
//! - [`config::types`]: Error taxonomy, outcomes, redirect targets
//!
//! ## Helpers ([`safety`], [`utils`])
//! - [`safety::scoped_lock`]: Delayed, timed mutex acquisition
//! - [`utils::writer`]: Write-with-result and progress indicator
//! - [`utils::fd_table`]: Descriptor table inspection
//!
//! # Result shapes
//!
//! Only a normal exit with status 0 counts as success. The boolean functions
//! ([`run_direct`], [`run_direct_redirected`], [`run_via_shell`]) collapse
//! everything else to `false`; the `*_outcome` variants keep the classified
//! [`ExecutionOutcome`]; [`Runner`] methods return structured [`RunnerError`]s.

// Kernel State
pub mod kernel;

// Execution Control
pub mod exec;

// Outcome classification
pub mod verdict;

// Configuration
pub mod config;

// Helpers
pub mod safety;
pub mod utils;

// CLI entrypoints shared by the procrun and writer binaries.
pub mod cli;

pub use config::loader::RunnerConfig;
pub use config::types::{ExecutionOutcome, RedirectTarget, Result, RunnerError};
pub use exec::executor::{
    apply_signal_policy, run_direct, run_direct_outcome, run_direct_redirected,
    run_direct_redirected_outcome, run_via_shell, run_via_shell_outcome, Runner,
};
pub use safety::scoped_lock::{acquire_after, start_thread_obtaining_mutex};
pub use utils::writer::{write_text, write_text_with_progress};
