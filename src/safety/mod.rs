//! Synchronization helpers

pub mod scoped_lock;
