//! motioncheck - bone motion speed checker
//!
//! Scans baked character animation for bones whose per-frame movement
//! exceeds a speed threshold, without blocking the host while long
//! timelines are processed.
//!
//! # Architecture
//!
//! - **Sampling + speed**: frame pairs and per-pair speed evaluation
//! - **Registry + progress**: published results and job progress
//! - **Scheduler**: job state machine and the sliced worker task
//! - **Session**: the operations a host UI calls

pub mod errors;
pub mod types;
pub mod config;

pub mod sampling;
pub mod speed;
pub mod registry;
pub mod progress;

pub mod host;
pub mod events;
pub mod scheduler;
pub mod session;

pub mod cli;

// Re-export commonly used types
pub use config::{AnalysisConfig, SchedulerSettings, Settings};
pub use errors::{CheckError, Result};
pub use events::AnalysisEvent;
pub use host::{BakedScene, SceneHost};
pub use registry::{ProblemEntry, ProblemGroup, ProblemRegistry};
pub use scheduler::{JobOutcome, JobState};
pub use session::MotionCheckSession;
pub use types::{ArmatureRef, BoneKey, BoneRef, FrameIndex, WorldPosition};
