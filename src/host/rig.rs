//! Roblox R15 rig bone names

use crate::types::BoneRef;

/// Bones that matter for Roblox character animation
pub const ROBLOX_BONES: [&str; 17] = [
    "Root",
    "HumanoidRootPart",
    "LowerTorso",
    "RightUpperLeg",
    "RightLowerLeg",
    "RightFoot",
    "LeftUpperLeg",
    "LeftLowerLeg",
    "LeftFoot",
    "UpperTorso",
    "RightUpperArm",
    "RightLowerArm",
    "RightHand",
    "LeftUpperArm",
    "LeftLowerArm",
    "LeftHand",
    "Head",
];

pub fn is_roblox_bone(name: &str) -> bool {
    ROBLOX_BONES.contains(&name)
}

/// Keep only rig bones, preserving the input order
pub fn filter_roblox_bones(bones: impl IntoIterator<Item = BoneRef>) -> Vec<BoneRef> {
    bones
        .into_iter()
        .filter(|b| is_roblox_bone(b.as_str()))
        .collect()
}
