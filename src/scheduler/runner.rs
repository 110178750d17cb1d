//! Bounded-slice job runner
//!
//! Walks the work plan one frame pair at a time. A slice stops after
//! `slice_units` pairs or once the slice budget is spent, whichever comes
//! first, and always finishes the unit it is on. No state is left half
//! written between slices: the report carries whole groups to publish.

use crate::config::{AnalysisConfig, SchedulerSettings};
use crate::errors::{CheckError, Result};
use crate::host::SceneHost;
use crate::registry::{ProblemEntry, ProblemGroup};
use crate::sampling::FramePair;
use crate::scheduler::job::{JobCursor, JobScope};
use crate::scheduler::plan::WorkPlan;
use crate::speed::evaluate;
use crate::types::{ArmatureRef, BoneKey, BoneRef, FrameIndex, WorldPosition};
use log::warn;
use std::time::Instant;

/// A unit the host could not serve
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedUnit {
    pub bone: BoneKey,
    pub frame: FrameIndex,
    pub reason: String,
}

/// Result of one slice
#[derive(Debug, Default)]
pub struct SliceReport {
    /// Units processed, skipped ones included
    pub units: usize,
    /// Groups to publish, each complete up to the last processed unit
    pub updates: Vec<(ArmatureRef, BoneRef, ProblemGroup)>,
    pub skipped: Vec<SkippedUnit>,
    /// Violations recorded in this slice
    pub violations: usize,
    pub exhausted: bool,
}

/// Incremental executor for one job
#[derive(Debug)]
pub struct JobRunner {
    plan: WorkPlan,
    max_speed: f64,
    cursor: JobCursor,
    /// Position at the current pair's `prev` frame, carried over from the last unit
    carried: Option<WorldPosition>,
    group: ProblemGroup,
    /// Whether partial groups are published after every slice
    publish_partial: bool,
}

impl JobRunner {
    pub fn new(plan: WorkPlan, config: &AnalysisConfig) -> Self {
        let publish_partial = matches!(plan.scope, JobScope::Full);
        let mut runner = Self {
            plan,
            max_speed: config.max_speed,
            cursor: JobCursor::default(),
            carried: None,
            group: ProblemGroup::new(),
            publish_partial,
        };
        runner.skip_empty_armatures();
        runner
    }

    pub fn plan(&self) -> &WorkPlan {
        &self.plan
    }

    pub fn cursor(&self) -> JobCursor {
        self.cursor
    }

    pub fn total_units(&self) -> usize {
        self.plan.total_units()
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_bone().is_none()
    }

    /// Group being built for the bone under the cursor
    pub fn current_group(&self) -> &ProblemGroup {
        &self.group
    }

    fn current_bone(&self) -> Option<BoneKey> {
        self.plan
            .bone_at(self.cursor.armature_index, self.cursor.bone_index)
    }

    /// Process one slice
    pub async fn run_slice(
        &mut self,
        host: &dyn SceneHost,
        settings: &SchedulerSettings,
    ) -> SliceReport {
        let started = Instant::now();
        let budget = settings.slice_budget();
        let mut report = SliceReport::default();

        while report.units < settings.slice_units
            && (report.units == 0 || started.elapsed() < budget)
        {
            let Some(bone) = self.current_bone() else {
                break;
            };
            let Some(pair) = self.plan.sampler.pair_at(self.cursor.frame_index) else {
                self.finish_bone(bone, &mut report);
                continue;
            };

            self.process_unit(host, &bone, pair, &mut report).await;
            self.cursor.frame_index += 1;
            report.units += 1;

            if self.cursor.frame_index >= self.plan.sampler.pair_count() {
                self.finish_bone(bone, &mut report);
            }
        }

        if self.publish_partial && self.cursor.frame_index > 0 {
            if let Some(bone) = self.current_bone() {
                report
                    .updates
                    .push((bone.armature, bone.bone, self.group.clone()));
            }
        }

        report.exhausted = self.is_exhausted();
        report
    }

    async fn process_unit(
        &mut self,
        host: &dyn SceneHost,
        bone: &BoneKey,
        pair: FramePair,
        report: &mut SliceReport,
    ) {
        let prev = match self.carried.take() {
            Some(position) => Ok(position),
            None => host.world_position(&bone.armature, &bone.bone, pair.prev).await,
        };
        let curr = host.world_position(&bone.armature, &bone.bone, pair.curr).await;

        match (prev, curr) {
            (Ok(prev), Ok(curr)) => {
                let sample = evaluate(
                    bone,
                    pair.curr,
                    prev,
                    curr,
                    self.plan.sampler.step(),
                    self.max_speed,
                );
                if sample.invalid_position {
                    let err = CheckError::InvalidPosition {
                        armature: bone.armature.to_string(),
                        bone: bone.bone.to_string(),
                        frame: pair.curr,
                    };
                    warn!("{}; recorded as a violation", err);
                }
                if sample.is_violation() && self.group.push(ProblemEntry::from(&sample)) {
                    report.violations += 1;
                }
                self.carried = Some(curr);
            }
            (prev, curr) => {
                let err = Self::first_error(&prev, &curr);
                warn!("skipping {} frame {}: {}", bone, pair.curr, err);
                report.skipped.push(SkippedUnit {
                    bone: bone.clone(),
                    frame: pair.curr,
                    reason: err,
                });
                self.carried = curr.ok();
            }
        }
    }

    fn first_error(prev: &Result<WorldPosition>, curr: &Result<WorldPosition>) -> String {
        match (prev, curr) {
            (Err(e), _) | (_, Err(e)) => e.to_string(),
            _ => String::new(),
        }
    }

    /// Emit the finished bone's group and move the cursor to the next bone
    fn finish_bone(&mut self, bone: BoneKey, report: &mut SliceReport) {
        let group = std::mem::take(&mut self.group);
        report.updates.push((bone.armature, bone.bone, group));
        self.carried = None;
        self.cursor.frame_index = 0;
        self.cursor.bone_index += 1;
        self.skip_empty_armatures();
    }

    fn skip_empty_armatures(&mut self) {
        while self.cursor.armature_index < self.plan.targets.len()
            && self.cursor.bone_index >= self.plan.bones_in(self.cursor.armature_index)
        {
            self.cursor.armature_index += 1;
            self.cursor.bone_index = 0;
        }
    }
}
