//! Job state machine
//!
//! Valid transitions:
//! 1. Idle       → Running     (on: Start)
//! 2. Running    → Cancelling  (on: CancelRequested)
//! 3. Running    → Completed   (on: WorkExhausted)
//! 4. Running    → Failed      (on: Fault)
//! 5. Cancelling → Completed   (on: CancelAcknowledged | WorkExhausted)
//! 6. Cancelling → Failed      (on: Fault)
//! 7. Completed | Failed → Idle (on: Discard)
//!
//! Terminal states ignore every other event.

use crate::errors::{CheckError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    Idle,
    Running,
    Cancelling,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    Start,
    CancelRequested,
    CancelAcknowledged,
    WorkExhausted,
    Fault,
    Discard,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// Running or winding down after a cancel request
    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Running | JobState::Cancelling)
    }

    pub fn transition(&self, event: JobEvent) -> Result<JobState> {
        use JobEvent::*;
        use JobState::*;

        let next = match (self, event) {
            (Idle, Start) => Running,

            (Running, CancelRequested) => Cancelling,
            (Running, WorkExhausted) => Completed,
            (Running, Fault) => Failed,

            (Cancelling, CancelAcknowledged) => Completed,
            (Cancelling, WorkExhausted) => Completed,
            (Cancelling, Fault) => Failed,

            (Completed, Discard) | (Failed, Discard) => Idle,
            (Completed, _) => Completed,
            (Failed, _) => Failed,

            (from, event) => {
                return Err(CheckError::InvalidTransition {
                    from: format!("{:?}", from),
                    event: format!("{:?}", event),
                });
            }
        };

        Ok(next)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            JobState::Idle => "Idle",
            JobState::Running => "Running",
            JobState::Cancelling => "Cancelling",
            JobState::Completed => "Completed",
            JobState::Failed => "Failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert_eq!(JobState::Idle.transition(JobEvent::Start).unwrap(), JobState::Running);
        assert_eq!(
            JobState::Running.transition(JobEvent::CancelRequested).unwrap(),
            JobState::Cancelling
        );
        assert_eq!(
            JobState::Cancelling
                .transition(JobEvent::CancelAcknowledged)
                .unwrap(),
            JobState::Completed
        );
        assert_eq!(
            JobState::Running.transition(JobEvent::WorkExhausted).unwrap(),
            JobState::Completed
        );
        assert_eq!(JobState::Running.transition(JobEvent::Fault).unwrap(), JobState::Failed);
        assert_eq!(JobState::Failed.transition(JobEvent::Discard).unwrap(), JobState::Idle);
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(JobState::Running.transition(JobEvent::Start).is_err());
        assert!(JobState::Idle.transition(JobEvent::WorkExhausted).is_err());
        assert!(JobState::Idle.transition(JobEvent::CancelRequested).is_err());
        assert!(JobState::Cancelling.transition(JobEvent::Start).is_err());
    }

    #[test]
    fn test_terminal_self_loops() {
        assert_eq!(
            JobState::Completed.transition(JobEvent::Start).unwrap(),
            JobState::Completed
        );
        assert_eq!(JobState::Failed.transition(JobEvent::Fault).unwrap(), JobState::Failed);
    }

    #[test]
    fn test_activity() {
        assert!(JobState::Running.is_active());
        assert!(JobState::Cancelling.is_active());
        assert!(!JobState::Idle.is_active());
        assert!(!JobState::Completed.is_active());
        assert!(JobState::Completed.is_terminal());
        assert!(!JobState::Cancelling.is_terminal());
    }
}
