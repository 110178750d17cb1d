//! Worker task driving a job
//!
//! One task per job. After every slice the worker publishes the slice's
//! groups in a single registry swap, updates the job record and progress,
//! then checks the cancel flag before yielding back to the runtime.

use crate::config::SchedulerSettings;
use crate::events::{AnalysisEvent, EventBus};
use crate::host::SceneHost;
use crate::progress::ProgressReporter;
use crate::registry::SharedRegistry;
use crate::scheduler::job::{AnalysisJob, JobOutcome, JobScope};
use crate::scheduler::runner::JobRunner;
use crate::scheduler::state::{JobEvent, JobState};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Status text after a cancelled job
pub const CANCELLED_STATUS: &str = "Check cancelled";

/// Shared handles a worker needs
#[derive(Clone)]
pub struct JobContext {
    pub host: Arc<dyn SceneHost>,
    pub registry: Arc<SharedRegistry>,
    pub progress: Arc<Mutex<ProgressReporter>>,
    pub job: Arc<Mutex<AnalysisJob>>,
    pub cancel: Arc<AtomicBool>,
    pub events: EventBus,
    pub settings: SchedulerSettings,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn apply(job: &mut AnalysisJob, event: JobEvent) -> JobState {
    if let Err(e) = job.transition(event) {
        warn!("job {}: {}", job.id, e);
    }
    job.state
}

/// Run a job on its own task and record a failure if that task dies
///
/// The job record reaches `Failed` without anyone awaiting the returned
/// outcome, so a polling host is never left with a stuck `Running` job.
pub async fn supervise_job(ctx: JobContext, runner: JobRunner) -> JobOutcome {
    let job_id = lock(&ctx.job).id;
    match tokio::spawn(run_job(ctx.clone(), runner)).await {
        Ok(outcome) => outcome,
        Err(e) => fail(&ctx, job_id, e.to_string()),
    }
}

/// Move the job to `Failed` and report it
pub(crate) fn fail(ctx: &JobContext, job_id: Uuid, error: String) -> JobOutcome {
    let job = {
        let mut job = lock(&ctx.job);
        apply(&mut job, JobEvent::Fault);
        job.clone()
    };
    let status = format!("Check failed: {}", error);
    warn!("job {}: {}", job_id, status);
    lock(&ctx.progress).set_status(status.clone());
    ctx.events.emit(AnalysisEvent::Failed { job_id, error });

    JobOutcome {
        job_id,
        state: job.state,
        scope: job.scope,
        completed_units: job.completed_units,
        total_units: job.total_units,
        problems_found: 0,
        cancelled: false,
        status,
    }
}

/// Run a job to completion or cancellation
pub async fn run_job(ctx: JobContext, mut runner: JobRunner) -> JobOutcome {
    let (job_id, scope) = {
        let job = lock(&ctx.job);
        (job.id, job.scope.clone())
    };
    info!("job {} started with {} units", job_id, runner.total_units());

    loop {
        let report = runner.run_slice(ctx.host.as_ref(), &ctx.settings).await;

        ctx.registry.replace_bones(report.updates);
        for skipped in report.skipped {
            ctx.events.emit(AnalysisEvent::UnitSkipped {
                job_id,
                bone: skipped.bone,
                frame: skipped.frame,
                reason: skipped.reason,
            });
        }

        let (completed, total) = {
            let mut job = lock(&ctx.job);
            job.record_units(report.units);
            job.cursor = runner.cursor();
            if report.exhausted {
                apply(&mut job, JobEvent::WorkExhausted);
            }
            (job.completed_units, job.total_units)
        };
        lock(&ctx.progress).advance_to(completed);

        if report.exhausted {
            return complete(&ctx, job_id, scope, completed, total);
        }

        debug!("job {} slice done: {}/{}", job_id, completed, total);
        ctx.events.emit(AnalysisEvent::Progress {
            job_id,
            completed_units: completed,
            total_units: total,
        });

        if ctx.cancel.load(Ordering::Relaxed) {
            return cancel(&ctx, job_id, scope, completed, total);
        }

        let pause = ctx.settings.slice_pause();
        if pause.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(pause).await;
        }
    }
}

fn complete(
    ctx: &JobContext,
    job_id: Uuid,
    scope: JobScope,
    completed: usize,
    total: usize,
) -> JobOutcome {
    let snapshot = ctx.registry.snapshot();
    let mut progress = lock(&ctx.progress);
    let elapsed = progress.elapsed().as_secs_f64();

    let (problems_found, status) = match &scope {
        JobScope::Full => {
            let found = snapshot.problem_count();
            (
                found,
                format!("Check complete: {} problems found in {:.1}s", found, elapsed),
            )
        }
        JobScope::SingleBone(key) => {
            let found = snapshot
                .get(&key.armature, &key.bone)
                .map(|g| g.len())
                .unwrap_or(0);
            (
                found,
                format!(
                    "Recheck complete: {} problems found on {} in {:.1}s",
                    found, key.bone, elapsed
                ),
            )
        }
    };
    progress.set_status(status.clone());
    drop(progress);

    info!("job {}: {}", job_id, status);
    ctx.events.emit(AnalysisEvent::Completed {
        job_id,
        problems_found,
        status: status.clone(),
    });

    JobOutcome {
        job_id,
        state: JobState::Completed,
        scope,
        completed_units: completed,
        total_units: total,
        problems_found,
        cancelled: false,
        status,
    }
}

fn cancel(
    ctx: &JobContext,
    job_id: Uuid,
    scope: JobScope,
    completed: usize,
    total: usize,
) -> JobOutcome {
    let state = {
        let mut job = lock(&ctx.job);
        if job.state == JobState::Running {
            apply(&mut job, JobEvent::CancelRequested);
        }
        apply(&mut job, JobEvent::CancelAcknowledged)
    };
    lock(&ctx.progress).set_status(CANCELLED_STATUS);

    let problems_found = match &scope {
        JobScope::Full => ctx.registry.snapshot().problem_count(),
        JobScope::SingleBone(_) => 0,
    };

    info!("job {} cancelled at {}/{}", job_id, completed, total);
    ctx.events.emit(AnalysisEvent::Cancelled {
        job_id,
        completed_units: completed,
    });

    JobOutcome {
        job_id,
        state,
        scope,
        completed_units: completed,
        total_units: total,
        problems_found,
        cancelled: true,
        status: CANCELLED_STATUS.to_string(),
    }
}
