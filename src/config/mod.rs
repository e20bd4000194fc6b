//! Configuration and shared types
//!
//! Runner settings, the error taxonomy, and execution outcomes.

pub mod loader;
pub mod types;
