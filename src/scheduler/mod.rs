//! Analysis scheduler module
//!
//! Job state machine, target resolution, the bounded-slice runner and the
//! worker task that drives it.

pub mod state;
pub mod job;
pub mod plan;
pub mod runner;
pub mod worker;

pub use job::{AnalysisJob, JobCursor, JobOutcome, JobScope};
pub use plan::{ArmatureTarget, WorkPlan};
pub use runner::{JobRunner, SkippedUnit, SliceReport};
pub use state::{JobEvent, JobState};
pub use worker::{run_job, supervise_job, JobContext};
