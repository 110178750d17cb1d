//! CLI module for motioncheck
//!
//! Command-line argument parsing and terminal rendering of results.

pub mod args;
pub mod display;

pub use args::{Args, CheckOptions, Commands, Verbosity};
pub use display::ReportDisplay;
