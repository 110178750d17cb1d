//! Host collaborator module
//!
//! The analysis core asks the host for armatures, bones, timeline bounds and
//! bone world positions. How those are produced is the host's business.

pub mod scene;
pub mod rig;
pub mod baked;

pub use baked::{BakedArmature, BakedBone, BakedScene};
pub use rig::{filter_roblox_bones, is_roblox_bone, ROBLOX_BONES};
pub use scene::SceneHost;
