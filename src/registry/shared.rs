//! Shared registry handle
//!
//! Readers take an `Arc` snapshot; the worker builds a modified copy and
//! swaps it in under the write lock, so a reader never sees a group that is
//! half way through an update.

use crate::registry::problem::ProblemGroup;
use crate::registry::store::ProblemRegistry;
use crate::types::{ArmatureRef, BoneRef};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
pub struct SharedRegistry {
    current: RwLock<Arc<ProblemRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable view of the last published state
    pub fn snapshot(&self) -> Arc<ProblemRegistry> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Apply `update` to a copy and publish it as one swap
    pub fn publish<F>(&self, update: F)
    where
        F: FnOnce(&mut ProblemRegistry),
    {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = ProblemRegistry::clone(&guard);
        update(&mut next);
        *guard = Arc::new(next);
    }

    pub fn replace_all(&self, registry: ProblemRegistry) {
        self.publish(|current| current.replace_all(registry));
    }

    pub fn replace_bone(&self, armature: &ArmatureRef, bone: &BoneRef, group: ProblemGroup) {
        self.publish(|current| current.replace_bone(armature, bone, group));
    }

    /// Replace several groups in a single swap
    pub fn replace_bones(&self, updates: Vec<(ArmatureRef, BoneRef, ProblemGroup)>) {
        if updates.is_empty() {
            return;
        }
        self.publish(|current| {
            for (armature, bone, group) in updates {
                current.replace_bone(&armature, &bone, group);
            }
        });
    }

    pub fn clear(&self) {
        self.publish(ProblemRegistry::clear);
    }
}
