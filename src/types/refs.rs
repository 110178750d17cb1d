//! Opaque references into the host scene
//!
//! The core never owns armatures or bones; it only carries the names the
//! host handed out and asks the host to resolve them again later.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Frame number on the host timeline
pub type FrameIndex = i64;

/// World-space bone head position supplied by the host
pub type WorldPosition = glam::DVec3;

/// Reference to a rig in the host scene
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArmatureRef(String);

/// Reference to a bone, scoped to an armature
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoneRef(String);

impl ArmatureRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl BoneRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArmatureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for BoneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArmatureRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&str> for BoneRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The unit of analysis and grouping: one bone of one armature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoneKey {
    pub armature: ArmatureRef,
    pub bone: BoneRef,
}

impl BoneKey {
    pub fn new(armature: impl Into<ArmatureRef>, bone: impl Into<BoneRef>) -> Self {
        Self {
            armature: armature.into(),
            bone: bone.into(),
        }
    }
}

impl fmt::Display for BoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.armature, self.bone)
    }
}
