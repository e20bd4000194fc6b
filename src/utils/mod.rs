//! Utilities
//!
//! Descriptor table inspection and the file writer.

pub mod fd_table;
pub mod writer;
