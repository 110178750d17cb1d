//! Analysis session
//!
//! The context object a host keeps for the lifetime of its process: it owns
//! the problem registry, the progress reporter and the current job, and
//! exposes the operations the host UI calls. There is no global state; a
//! host that wants a fresh session calls [`MotionCheckSession::reset`] or
//! builds a new one.

use crate::config::{AnalysisConfig, SchedulerSettings};
use crate::errors::{CheckError, Result};
use crate::events::{AnalysisEvent, EventBus};
use crate::host::SceneHost;
use crate::progress::{ProgressReporter, ProgressSnapshot, READY_STATUS};
use crate::registry::{ProblemRegistry, SharedRegistry};
use crate::scheduler::worker::{apply, fail, lock};
use crate::scheduler::{
    supervise_job, AnalysisJob, JobContext, JobEvent, JobOutcome, JobRunner, JobScope, JobState,
    WorkPlan,
};
use crate::types::{ArmatureRef, BoneKey, BoneRef, FrameIndex};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

struct ActiveJob {
    id: Uuid,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<JobOutcome>,
}

/// Session state and host-facing operations
pub struct MotionCheckSession {
    host: Arc<dyn SceneHost>,
    settings: SchedulerSettings,
    config: AnalysisConfig,
    registry: Arc<SharedRegistry>,
    progress: Arc<Mutex<ProgressReporter>>,
    job: Arc<Mutex<AnalysisJob>>,
    events: EventBus,
    active: Option<ActiveJob>,
}

impl MotionCheckSession {
    /// Create a session with an empty registry
    ///
    /// Returns the receiving end of the event channel alongside it.
    pub fn new(
        host: Arc<dyn SceneHost>,
        settings: SchedulerSettings,
    ) -> (Self, mpsc::Receiver<AnalysisEvent>) {
        let (events, receiver) = EventBus::new();
        let session = Self {
            host,
            settings,
            config: AnalysisConfig::default(),
            registry: Arc::new(SharedRegistry::new()),
            progress: Arc::new(Mutex::new(ProgressReporter::new())),
            job: Arc::new(Mutex::new(AnalysisJob::idle())),
            events,
            active: None,
        };
        (session, receiver)
    }

    /// Config used by the last start, and by rechecks
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Analyse every resolved armature and bone, replacing all results
    pub async fn start_analysis(&mut self, config: AnalysisConfig) -> Result<Uuid> {
        self.ensure_no_active_job()?;
        config.validate()?;
        self.config = config.clone();
        self.launch(JobScope::Full, config).await
    }

    /// Re-analyse one bone; its group is replaced only if the job completes
    pub async fn recheck_bone(
        &mut self,
        armature: impl Into<ArmatureRef>,
        bone: impl Into<BoneRef>,
    ) -> Result<Uuid> {
        self.ensure_no_active_job()?;
        let key = BoneKey::new(armature, bone);
        let config = self.config.clone();
        self.launch(JobScope::SingleBone(key), config).await
    }

    /// Ask the running job to stop at its next slice boundary
    ///
    /// Moves the job to Cancelling. Returns false (and does nothing)
    /// unless a job is running.
    pub fn cancel_analysis(&self) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let mut job = lock(&self.job);
        if job.state != JobState::Running {
            return false;
        }
        apply(&mut job, JobEvent::CancelRequested);
        info!("cancel requested for job {}", active.id);
        active.cancel.store(true, Ordering::Relaxed);
        true
    }

    /// Empty the registry; refused while a job is active
    pub fn clear_results(&self) -> Result<()> {
        self.ensure_no_active_job()?;
        self.registry.clear();
        lock(&self.progress).reset(0, READY_STATUS);
        Ok(())
    }

    pub fn get_progress(&self) -> ProgressSnapshot {
        lock(&self.progress).snapshot()
    }

    /// Snapshot reflecting fully processed units only
    pub fn get_problems(&self) -> Arc<ProblemRegistry> {
        self.registry.snapshot()
    }

    /// Frame to navigate to for a recorded problem, if it exists
    pub fn jump_target(
        &self,
        armature: &ArmatureRef,
        bone: &BoneRef,
        frame: FrameIndex,
    ) -> Option<FrameIndex> {
        self.registry
            .snapshot()
            .get(armature, bone)
            .and_then(|group| group.get(frame))
            .map(|entry| entry.frame)
    }

    /// Copy of the current job record
    pub fn job(&self) -> AnalysisJob {
        lock(&self.job).clone()
    }

    pub fn job_state(&self) -> JobState {
        lock(&self.job).state
    }

    pub fn is_running(&self) -> bool {
        self.job_state().is_active()
    }

    /// Wait for the current job to finish
    ///
    /// Returns `None` if no job was started since the last wait.
    pub async fn wait(&mut self) -> Option<JobOutcome> {
        let active = self.active.take()?;
        match active.handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                let ctx = self.context(Arc::clone(&active.cancel));
                Some(fail(&ctx, active.id, e.to_string()))
            }
        }
    }

    /// Cancel any job and return to an empty session
    ///
    /// Waits for the worker to stop before clearing, so nothing from the
    /// discarded job lands in the fresh state.
    pub async fn reset(&mut self) {
        if let Some(active) = &self.active {
            {
                let mut job = lock(&self.job);
                if job.state == JobState::Running {
                    apply(&mut job, JobEvent::CancelRequested);
                }
            }
            active.cancel.store(true, Ordering::Relaxed);
            self.wait().await;
        }
        self.registry.clear();
        lock(&self.progress).reset(0, READY_STATUS);
        let mut job = lock(&self.job);
        if job.state.is_terminal() {
            apply(&mut job, JobEvent::Discard);
        }
        *job = AnalysisJob::idle();
    }

    fn ensure_no_active_job(&self) -> Result<()> {
        if self.job_state().is_active() {
            return Err(CheckError::AlreadyRunning);
        }
        Ok(())
    }

    async fn launch(&mut self, scope: JobScope, config: AnalysisConfig) -> Result<Uuid> {
        let plan = match WorkPlan::resolve(self.host.as_ref(), &config, scope.clone()).await {
            Ok(plan) => plan,
            Err(e) => {
                info!("analysis not started: {}", e);
                *lock(&self.job) = AnalysisJob::idle();
                lock(&self.progress).reset(0, e.to_string());
                return Err(e);
            }
        };

        let total_units = plan.total_units();
        let mut job = AnalysisJob::new(scope.clone(), total_units);
        job.transition(JobEvent::Start)?;
        let job_id = job.id;

        let status = match &scope {
            JobScope::Full => {
                self.registry.clear();
                "Checking...".to_string()
            }
            JobScope::SingleBone(key) => format!("Rechecking bone {}...", key.bone),
        };
        lock(&self.progress).reset(total_units, status);
        *lock(&self.job) = job;

        self.events.emit(AnalysisEvent::Started {
            job_id,
            total_units,
            single_bone: scope.target_bone().cloned(),
        });

        let cancel = Arc::new(AtomicBool::new(false));
        let ctx = self.context(Arc::clone(&cancel));
        let runner = JobRunner::new(plan, &config);
        let handle = tokio::spawn(supervise_job(ctx, runner));

        self.active = Some(ActiveJob {
            id: job_id,
            cancel,
            handle,
        });
        Ok(job_id)
    }

    fn context(&self, cancel: Arc<AtomicBool>) -> JobContext {
        JobContext {
            host: Arc::clone(&self.host),
            registry: Arc::clone(&self.registry),
            progress: Arc::clone(&self.progress),
            job: Arc::clone(&self.job),
            cancel,
            events: self.events.clone(),
            settings: self.settings.clone(),
        }
    }
}
