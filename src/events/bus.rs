//! Event bus for analysis updates

use crate::types::BoneKey;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Channel capacity; events beyond it are dropped rather than blocking the worker
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Job lifecycle and progress events
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    Started {
        job_id: Uuid,
        total_units: usize,
        single_bone: Option<BoneKey>,
    },
    Progress {
        job_id: Uuid,
        completed_units: usize,
        total_units: usize,
    },
    /// A unit was skipped because the host could not resolve the bone
    UnitSkipped {
        job_id: Uuid,
        bone: BoneKey,
        frame: i64,
        reason: String,
    },
    Completed {
        job_id: Uuid,
        problems_found: usize,
        status: String,
    },
    Cancelled {
        job_id: Uuid,
        completed_units: usize,
    },
    Failed {
        job_id: Uuid,
        error: String,
    },
}

impl AnalysisEvent {
    pub fn job_id(&self) -> Uuid {
        match self {
            AnalysisEvent::Started { job_id, .. }
            | AnalysisEvent::Progress { job_id, .. }
            | AnalysisEvent::UnitSkipped { job_id, .. }
            | AnalysisEvent::Completed { job_id, .. }
            | AnalysisEvent::Cancelled { job_id, .. }
            | AnalysisEvent::Failed { job_id, .. } => *job_id,
        }
    }

    /// Whether this event ends a job
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AnalysisEvent::Completed { .. }
                | AnalysisEvent::Cancelled { .. }
                | AnalysisEvent::Failed { .. }
        )
    }
}

/// Slots kept free for terminal events
pub const TERMINAL_EVENT_RESERVE: usize = 1;

/// Event bus publishing analysis events to one subscriber
///
/// `emit` never blocks the worker. Progress and skip events are dropped
/// once the channel is down to its reserved slot, so a job's terminal
/// event still fits when the subscriber lags. A subscriber that stops
/// draining across several jobs can still miss a terminal event;
/// `MotionCheckSession::wait` and `job_state` remain authoritative.
pub struct EventBus {
    sender: mpsc::Sender<AnalysisEvent>,
}

impl EventBus {
    /// Create new event bus with bounded channel
    pub fn new() -> (Self, mpsc::Receiver<AnalysisEvent>) {
        let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (EventBus { sender }, receiver)
    }

    /// Emit without waiting; dropped if the channel is full or closed
    pub fn emit(&self, event: AnalysisEvent) {
        if !event.is_terminal() && self.sender.capacity() <= TERMINAL_EVENT_RESERVE {
            return;
        }
        let _ = self.sender.try_send(event);
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        EventBus {
            sender: self.sender.clone(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new().0
    }
}
