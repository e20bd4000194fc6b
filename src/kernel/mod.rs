//! Thin wrappers around process-wide kernel state.
//!
//! All `unsafe` signal code is concentrated here with explicit SAFETY comments.

pub mod signal;
