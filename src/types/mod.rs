//! Type definitions module
//!
//! Host-owned references and the frame/position primitives shared by every
//! analysis stage.

pub mod refs;

pub use refs::{ArmatureRef, BoneKey, BoneRef, FrameIndex, WorldPosition};
