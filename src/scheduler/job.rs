//! Analysis job record

use crate::errors::Result;
use crate::scheduler::state::{JobEvent, JobState};
use crate::types::BoneKey;
use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

/// What a job analyses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobScope {
    Full,
    SingleBone(BoneKey),
}

impl JobScope {
    pub fn target_bone(&self) -> Option<&BoneKey> {
        match self {
            JobScope::Full => None,
            JobScope::SingleBone(key) => Some(key),
        }
    }
}

/// Position of the next unit: armature, bone within it, frame pair within the bone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCursor {
    pub armature_index: usize,
    pub bone_index: usize,
    pub frame_index: usize,
}

/// One analysis run
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub id: Uuid,
    pub state: JobState,
    pub scope: JobScope,
    pub cursor: JobCursor,
    pub total_units: usize,
    pub completed_units: usize,
    pub started_at: DateTime<Utc>,
}

impl AnalysisJob {
    pub fn new(scope: JobScope, total_units: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: JobState::Idle,
            scope,
            cursor: JobCursor::default(),
            total_units,
            completed_units: 0,
            started_at: Utc::now(),
        }
    }

    /// Placeholder record when no job exists
    pub fn idle() -> Self {
        Self::new(JobScope::Full, 0)
    }

    pub fn transition(&mut self, event: JobEvent) -> Result<JobState> {
        let next = self.state.transition(event)?;
        if next != self.state {
            debug!("job {} {:?} -> {:?}", self.id, self.state, next);
        }
        self.state = next;
        Ok(next)
    }

    /// Count finished units, never past the total
    pub fn record_units(&mut self, units: usize) {
        self.completed_units = (self.completed_units + units).min(self.total_units);
    }
}

/// Final report of a finished job
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job_id: Uuid,
    pub state: JobState,
    pub scope: JobScope,
    pub completed_units: usize,
    pub total_units: usize,
    /// Problems recorded by this job (whole registry for a full run, one group for a recheck)
    pub problems_found: usize,
    pub cancelled: bool,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_lifecycle() {
        let mut job = AnalysisJob::new(JobScope::Full, 6);
        assert_eq!(job.state, JobState::Idle);
        job.transition(JobEvent::Start).unwrap();
        job.record_units(4);
        job.record_units(4);
        assert_eq!(job.completed_units, 6);
        job.transition(JobEvent::WorkExhausted).unwrap();
        assert_eq!(job.state, JobState::Completed);
    }

    #[test]
    fn test_invalid_transition_keeps_state() {
        let mut job = AnalysisJob::idle();
        assert!(job.transition(JobEvent::CancelAcknowledged).is_err());
        assert_eq!(job.state, JobState::Idle);
    }

    #[test]
    fn test_scope_target() {
        let key = BoneKey::new("Rig", "Head");
        assert_eq!(JobScope::SingleBone(key.clone()).target_bone(), Some(&key));
        assert_eq!(JobScope::Full.target_bone(), None);
    }
}
