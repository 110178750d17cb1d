//! Host scene trait

use crate::errors::Result;
use crate::types::{ArmatureRef, BoneRef, FrameIndex, WorldPosition};
use async_trait::async_trait;

/// Scene access supplied by the host application
///
/// `world_position` fails with `CheckError::StaleReference` when the
/// armature or bone can no longer be resolved; any other failure is treated
/// the same way by the scheduler.
#[async_trait]
pub trait SceneHost: Send + Sync {
    /// Armatures to analyse, optionally restricted to the host selection
    async fn list_armatures(&self, selected_only: bool) -> Result<Vec<ArmatureRef>>;

    /// Bones of an armature, optionally restricted to the Roblox rig names
    async fn list_bones(&self, armature: &ArmatureRef, roblox_only: bool) -> Result<Vec<BoneRef>>;

    /// World-space position of a bone at a frame
    async fn world_position(
        &self,
        armature: &ArmatureRef,
        bone: &BoneRef,
        frame: FrameIndex,
    ) -> Result<WorldPosition>;

    /// Inclusive timeline range
    async fn timeline_bounds(&self) -> Result<(FrameIndex, FrameIndex)>;
}
