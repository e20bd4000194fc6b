//! Execution control
//!
//! fork/exec/wait for direct launches, redirected launches and shell commands.

pub mod executor;
pub mod launcher;
pub mod redirect;
pub mod shell;
