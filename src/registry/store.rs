//! Problem registry storage
//!
//! Armatures and bones keep the order in which they were first recorded so
//! display stays stable across rechecks. Only bones with at least one
//! violation are stored; replacing a bone with an empty group removes it.

use crate::registry::problem::{ProblemEntry, ProblemGroup};
use crate::types::{ArmatureRef, BoneKey, BoneRef};
use serde::{Deserialize, Serialize};

/// Problems recorded for one armature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmatureProblems {
    pub armature: ArmatureRef,
    pub bones: Vec<(BoneRef, ProblemGroup)>,
}

impl ArmatureProblems {
    fn new(armature: ArmatureRef) -> Self {
        Self {
            armature,
            bones: Vec::new(),
        }
    }

    fn position(&self, bone: &BoneRef) -> Option<usize> {
        self.bones.iter().position(|(b, _)| b == bone)
    }

    pub fn get(&self, bone: &BoneRef) -> Option<&ProblemGroup> {
        self.position(bone).map(|idx| &self.bones[idx].1)
    }

    pub fn problem_count(&self) -> usize {
        self.bones.iter().map(|(_, g)| g.len()).sum()
    }
}

/// Armature -> bone -> violations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemRegistry {
    armatures: Vec<ArmatureProblems>,
}

impl ProblemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole registry
    pub fn replace_all(&mut self, other: ProblemRegistry) {
        *self = other;
    }

    /// Replace one bone's group, inserting it at the end if it is new
    pub fn replace_bone(&mut self, armature: &ArmatureRef, bone: &BoneRef, group: ProblemGroup) {
        let arm_idx = match self.armatures.iter().position(|a| &a.armature == armature) {
            Some(idx) => idx,
            None if group.is_empty() => return,
            None => {
                self.armatures.push(ArmatureProblems::new(armature.clone()));
                self.armatures.len() - 1
            }
        };

        let entry = &mut self.armatures[arm_idx];
        match (entry.position(bone), group.is_empty()) {
            (Some(idx), false) => entry.bones[idx].1 = group,
            (Some(idx), true) => {
                entry.bones.remove(idx);
            }
            (None, false) => entry.bones.push((bone.clone(), group)),
            (None, true) => {}
        }

        if self.armatures[arm_idx].bones.is_empty() {
            self.armatures.remove(arm_idx);
        }
    }

    pub fn get(&self, armature: &ArmatureRef, bone: &BoneRef) -> Option<&ProblemGroup> {
        self.armatures
            .iter()
            .find(|a| &a.armature == armature)
            .and_then(|a| a.get(bone))
    }

    /// Owned copy for display
    pub fn snapshot(&self) -> ProblemRegistry {
        self.clone()
    }

    pub fn clear(&mut self) {
        self.armatures.clear();
    }

    pub fn armatures(&self) -> &[ArmatureProblems] {
        &self.armatures
    }

    /// Every stored group in display order
    pub fn groups(&self) -> impl Iterator<Item = (BoneKey, &ProblemGroup)> + '_ {
        self.armatures.iter().flat_map(|a| {
            a.bones
                .iter()
                .map(move |(bone, group)| (BoneKey::new(a.armature.clone(), bone.clone()), group))
        })
    }

    /// Every entry flattened in display order
    pub fn iter_entries(&self) -> impl Iterator<Item = (BoneKey, &ProblemEntry)> + '_ {
        self.groups()
            .flat_map(|(key, group)| group.entries().iter().map(move |e| (key.clone(), e)))
    }

    pub fn problem_count(&self) -> usize {
        self.armatures.iter().map(ArmatureProblems::problem_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.armatures.is_empty()
    }
}
