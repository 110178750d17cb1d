//! Speed evaluator
//!
//! Speed is the Euclidean distance between the two sampled positions
//! multiplied by the frame step. A sample is a violation only when the
//! speed is strictly greater than the threshold.

use crate::types::{BoneKey, FrameIndex, WorldPosition};
use serde::{Deserialize, Serialize};

/// Excess above which a violation is rated high
pub const HIGH_SEVERITY_EXCESS: f64 = 2.0;

/// Excess above which a violation is rated medium
pub const MEDIUM_SEVERITY_EXCESS: f64 = 1.0;

/// One evaluated frame pair for one bone
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSample {
    pub bone: BoneKey,
    pub frame: FrameIndex,
    pub speed: f64,
    pub threshold: f64,
    /// Host returned a non-finite position for either frame
    pub invalid_position: bool,
}

impl SpeedSample {
    /// Whether this sample must be recorded as a problem
    pub fn is_violation(&self) -> bool {
        self.invalid_position || self.speed > self.threshold
    }

    /// Amount by which the speed exceeds the threshold
    pub fn excess(&self) -> f64 {
        self.speed - self.threshold
    }
}

/// `|curr - prev| * step`, or `None` if either position is not finite
pub fn movement_speed(prev: WorldPosition, curr: WorldPosition, step: i64) -> Option<f64> {
    if !prev.is_finite() || !curr.is_finite() {
        return None;
    }
    Some(prev.distance(curr) * step as f64)
}

/// Evaluate one frame pair
///
/// Invalid positions never drop the frame: they come back as a violation
/// with infinite speed and the `invalid_position` marker set.
pub fn evaluate(
    bone: &BoneKey,
    frame: FrameIndex,
    prev: WorldPosition,
    curr: WorldPosition,
    step: i64,
    threshold: f64,
) -> SpeedSample {
    match movement_speed(prev, curr, step) {
        Some(speed) => SpeedSample {
            bone: bone.clone(),
            frame,
            speed,
            threshold,
            invalid_position: false,
        },
        None => SpeedSample {
            bone: bone.clone(),
            frame,
            speed: f64::INFINITY,
            threshold,
            invalid_position: true,
        },
    }
}

/// Display rating of how far a violation overshoots the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_excess(excess: f64) -> Self {
        if excess > HIGH_SEVERITY_EXCESS {
            Severity::High
        } else if excess > MEDIUM_SEVERITY_EXCESS {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use quickcheck_macros::quickcheck;

    fn key() -> BoneKey {
        BoneKey::new("Rig", "Head")
    }

    #[test]
    fn test_scenario_positions() {
        let p1 = DVec3::new(0.0, 0.0, 0.0);
        let p2 = DVec3::new(0.0, 0.0, 2.0);
        let p3 = DVec3::new(0.0, 0.0, 2.1);

        let fast = evaluate(&key(), 2, p1, p2, 1, 1.0);
        assert!(fast.is_violation());
        assert!((fast.speed - 2.0).abs() < 1e-12);

        let slow = evaluate(&key(), 3, p2, p3, 1, 1.0);
        assert!(!slow.is_violation());
        assert!((slow.speed - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_is_not_violation() {
        let sample = evaluate(&key(), 1, DVec3::ZERO, DVec3::new(1.0, 0.0, 0.0), 1, 1.0);
        assert_eq!(sample.speed, 1.0);
        assert!(!sample.is_violation());
    }

    #[test]
    fn test_step_scales_distance() {
        let sample = evaluate(&key(), 3, DVec3::ZERO, DVec3::new(0.0, 0.5, 0.0), 3, 1.0);
        assert!((sample.speed - 1.5).abs() < 1e-12);
        assert!(sample.is_violation());
    }

    #[test]
    fn test_nan_position_is_flagged() {
        let sample = evaluate(
            &key(),
            4,
            DVec3::ZERO,
            DVec3::new(f64::NAN, 0.0, 0.0),
            1,
            1.0,
        );
        assert!(sample.invalid_position);
        assert!(sample.is_violation());
        assert!(sample.speed.is_infinite());
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::from_excess(0.2), Severity::Low);
        assert_eq!(Severity::from_excess(1.0), Severity::Low);
        assert_eq!(Severity::from_excess(1.5), Severity::Medium);
        assert_eq!(Severity::from_excess(2.5), Severity::High);
        assert!(Severity::High > Severity::Medium);
    }

    #[quickcheck]
    fn prop_violation_iff_scaled_distance_exceeds(
        a: (i8, i8, i8),
        b: (i8, i8, i8),
        step: u8,
        threshold: u8,
    ) -> bool {
        let prev = DVec3::new(a.0 as f64, a.1 as f64, a.2 as f64) / 8.0;
        let curr = DVec3::new(b.0 as f64, b.1 as f64, b.2 as f64) / 8.0;
        let step = (step % 10) as i64 + 1;
        let threshold = threshold as f64 / 16.0 + 0.1;
        let sample = evaluate(&key(), 0, prev, curr, step, threshold);
        sample.is_violation() == (prev.distance(curr) * step as f64 > threshold)
    }
}
