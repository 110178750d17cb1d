//! Target resolution
//!
//! Turns a scope and config into the armature/bone work list plus the frame
//! sampler every bone is walked with.

use crate::config::AnalysisConfig;
use crate::errors::{CheckError, Result};
use crate::host::{is_roblox_bone, SceneHost};
use crate::sampling::FrameSampler;
use crate::scheduler::job::JobScope;
use crate::types::{ArmatureRef, BoneKey, BoneRef};
use log::{debug, warn};

/// Bones to analyse on one armature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmatureTarget {
    pub armature: ArmatureRef,
    pub bones: Vec<BoneRef>,
}

/// Resolved work list for one job
#[derive(Debug, Clone)]
pub struct WorkPlan {
    pub scope: JobScope,
    pub targets: Vec<ArmatureTarget>,
    pub sampler: FrameSampler,
}

impl WorkPlan {
    /// Resolve targets against the host
    ///
    /// Fails with `NoArmatures`/`NoBones` when nothing is left to check and
    /// with `InvalidRange` when the timeline cannot be sampled.
    pub async fn resolve(
        host: &dyn SceneHost,
        config: &AnalysisConfig,
        scope: JobScope,
    ) -> Result<Self> {
        let targets = match &scope {
            JobScope::Full => Self::resolve_full(host, config).await?,
            JobScope::SingleBone(key) => Self::resolve_single(host, config, key).await?,
        };

        let (start, end) = host.timeline_bounds().await?;
        let sampler = FrameSampler::new(start, end, config.frame_step)?;

        let plan = Self {
            scope,
            targets,
            sampler,
        };
        debug!(
            "resolved {} armatures, {} bones, {} units",
            plan.targets.len(),
            plan.bone_count(),
            plan.total_units()
        );
        Ok(plan)
    }

    async fn resolve_full(
        host: &dyn SceneHost,
        config: &AnalysisConfig,
    ) -> Result<Vec<ArmatureTarget>> {
        let armatures = host.list_armatures(config.selected_only).await?;
        if armatures.is_empty() {
            return Err(CheckError::NoArmatures);
        }

        let mut targets = Vec::with_capacity(armatures.len());
        for armature in armatures {
            match host.list_bones(&armature, config.roblox_bones_only).await {
                Ok(bones) if !bones.is_empty() => targets.push(ArmatureTarget { armature, bones }),
                Ok(_) => debug!("armature {} has no bones to check", armature),
                Err(e) => warn!("skipping armature {}: {}", armature, e),
            }
        }

        if targets.is_empty() {
            return Err(CheckError::NoBones);
        }
        Ok(targets)
    }

    async fn resolve_single(
        host: &dyn SceneHost,
        config: &AnalysisConfig,
        key: &BoneKey,
    ) -> Result<Vec<ArmatureTarget>> {
        let armatures = host.list_armatures(false).await?;
        if !armatures.contains(&key.armature) {
            return Err(CheckError::NoArmatures);
        }

        if config.roblox_bones_only && !is_roblox_bone(key.bone.as_str()) {
            return Err(CheckError::NoBones);
        }

        let bones = match host.list_bones(&key.armature, false).await {
            Ok(bones) => bones,
            Err(e) => {
                warn!("cannot list bones of {}: {}", key.armature, e);
                return Err(CheckError::NoBones);
            }
        };
        if !bones.contains(&key.bone) {
            return Err(CheckError::NoBones);
        }

        Ok(vec![ArmatureTarget {
            armature: key.armature.clone(),
            bones: vec![key.bone.clone()],
        }])
    }

    pub fn bone_count(&self) -> usize {
        self.targets.iter().map(|t| t.bones.len()).sum()
    }

    /// Frame pairs across every bone
    pub fn total_units(&self) -> usize {
        self.bone_count() * self.sampler.pair_count()
    }

    /// Bone at a cursor position
    pub fn bone_at(&self, armature_index: usize, bone_index: usize) -> Option<BoneKey> {
        let target = self.targets.get(armature_index)?;
        let bone = target.bones.get(bone_index)?;
        Some(BoneKey::new(target.armature.clone(), bone.clone()))
    }

    pub fn bones_in(&self, armature_index: usize) -> usize {
        self.targets
            .get(armature_index)
            .map(|t| t.bones.len())
            .unwrap_or(0)
    }
}
