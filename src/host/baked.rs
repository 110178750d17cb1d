//! In-memory scene host
//!
//! A scene whose bone world positions were sampled ahead of time, one
//! position per frame from `frame_start`. Used by the CLI and the tests.

use crate::errors::{CheckError, Result};
use crate::host::rig::filter_roblox_bones;
use crate::host::scene::SceneHost;
use crate::types::{ArmatureRef, BoneRef, FrameIndex, WorldPosition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sampled world positions of one bone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BakedBone {
    pub name: BoneRef,
    /// `positions[i]` is the position at `frame_start + i`
    pub positions: Vec<[f64; 3]>,
}

impl BakedBone {
    pub fn new(name: impl Into<BoneRef>, positions: Vec<WorldPosition>) -> Self {
        Self {
            name: name.into(),
            positions: positions.into_iter().map(|p| p.to_array()).collect(),
        }
    }

    /// Bake positions by evaluating `f` for every frame in `start..=end`
    pub fn from_fn<F>(name: impl Into<BoneRef>, start: FrameIndex, end: FrameIndex, f: F) -> Self
    where
        F: Fn(FrameIndex) -> WorldPosition,
    {
        Self::new(name, (start..=end).map(f).collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BakedArmature {
    pub name: ArmatureRef,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub bones: Vec<BakedBone>,
}

impl BakedArmature {
    pub fn new(name: impl Into<ArmatureRef>) -> Self {
        Self {
            name: name.into(),
            selected: false,
            bones: Vec::new(),
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_bone(mut self, bone: BakedBone) -> Self {
        self.bones.push(bone);
        self
    }
}

/// Pre-sampled scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BakedScene {
    pub frame_start: FrameIndex,
    pub frame_end: FrameIndex,
    #[serde(default)]
    pub armatures: Vec<BakedArmature>,
}

impl BakedScene {
    pub fn new(frame_start: FrameIndex, frame_end: FrameIndex) -> Self {
        Self {
            frame_start,
            frame_end,
            armatures: Vec::new(),
        }
    }

    pub fn with_armature(mut self, armature: BakedArmature) -> Self {
        self.armatures.push(armature);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene dump from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn armature(&self, name: &ArmatureRef) -> Option<&BakedArmature> {
        self.armatures.iter().find(|a| &a.name == name)
    }

    fn stale(armature: &ArmatureRef, bone: &BoneRef) -> CheckError {
        CheckError::StaleReference {
            armature: armature.to_string(),
            bone: bone.to_string(),
        }
    }
}

#[async_trait]
impl SceneHost for BakedScene {
    async fn list_armatures(&self, selected_only: bool) -> Result<Vec<ArmatureRef>> {
        Ok(self
            .armatures
            .iter()
            .filter(|a| !selected_only || a.selected)
            .map(|a| a.name.clone())
            .collect())
    }

    async fn list_bones(&self, armature: &ArmatureRef, roblox_only: bool) -> Result<Vec<BoneRef>> {
        let baked = self
            .armature(armature)
            .ok_or_else(|| Self::stale(armature, &BoneRef::new("*")))?;
        let bones = baked.bones.iter().map(|b| b.name.clone());
        if roblox_only {
            Ok(filter_roblox_bones(bones))
        } else {
            Ok(bones.collect())
        }
    }

    async fn world_position(
        &self,
        armature: &ArmatureRef,
        bone: &BoneRef,
        frame: FrameIndex,
    ) -> Result<WorldPosition> {
        let baked = self
            .armature(armature)
            .and_then(|a| a.bones.iter().find(|b| &b.name == bone))
            .ok_or_else(|| Self::stale(armature, bone))?;

        let offset = frame - self.frame_start;
        if offset < 0 {
            return Err(Self::stale(armature, bone));
        }
        baked
            .positions
            .get(offset as usize)
            .map(|p| WorldPosition::from_array(*p))
            .ok_or_else(|| Self::stale(armature, bone))
    }

    async fn timeline_bounds(&self) -> Result<(FrameIndex, FrameIndex)> {
        Ok((self.frame_start, self.frame_end))
    }
}
