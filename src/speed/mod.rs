//! Speed evaluation module
//!
//! Pure comparison of two sampled world positions against the configured
//! speed threshold.

pub mod evaluator;

pub use evaluator::{evaluate, movement_speed, Severity, SpeedSample};
