//! Outcome classification
//!
//! Maps raw wait statuses to execution outcomes.

pub mod outcome;
