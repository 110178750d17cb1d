//! Problem registry module
//!
//! Hierarchical store of recorded violations (armature, then bone, then
//! frame) and the shared handle the worker publishes through.

pub mod problem;
pub mod store;
pub mod shared;

pub use problem::{ProblemEntry, ProblemGroup};
pub use shared::SharedRegistry;
pub use store::{ArmatureProblems, ProblemRegistry};
