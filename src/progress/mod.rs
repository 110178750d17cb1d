//! Progress reporting module

pub mod reporter;

pub use reporter::{ProgressReporter, ProgressSnapshot, READY_STATUS};
