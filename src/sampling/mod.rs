//! Frame sampling module
//!
//! Turns a host timeline range and a stride into the ordered frame pairs
//! that the speed evaluator compares.

pub mod sampler;

pub use sampler::{FramePair, FramePairs, FrameSampler};
