use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::error::{DispatchError, Result};
use crate::scheduler::{CompletionRecord, Job};
use crate::worker::status::WorkerStatus;

/// A worker with a fixed per-job processing time.
///
/// Status is derived from the held job: the worker is working exactly when
/// it holds one.
#[derive(Debug)]
pub struct Worker {
    name: String,
    average_duration: Duration,
    current_job: Mutex<Option<Job>>,
}

impl Worker {
    pub fn new(name: impl Into<String>, average_duration: Duration) -> Self {
        Self {
            name: name.into(),
            average_duration,
            current_job: Mutex::new(None),
        }
    }

    /// Build a worker from a duration in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidDuration`] if `secs` is negative, NaN or infinite.
    pub fn from_secs(name: impl Into<String>, secs: f64) -> Result<Self> {
        let duration =
            Duration::try_from_secs_f64(secs).map_err(|_| DispatchError::InvalidDuration(secs))?;
        Ok(Self::new(name, duration))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn average_duration(&self) -> Duration {
        self.average_duration
    }

    pub fn set_average_duration(&mut self, average_duration: Duration) {
        self.average_duration = average_duration;
    }

    pub fn status(&self) -> WorkerStatus {
        if self.lock_job().is_some() {
            WorkerStatus::Working
        } else {
            WorkerStatus::Idle
        }
    }

    /// Snapshot of the job being processed, if any
    pub fn current_job(&self) -> Option<Job> {
        self.lock_job().clone()
    }

    pub fn is_available(&self) -> bool {
        self.status() == WorkerStatus::Idle
    }

    /// Start processing `job`.
    ///
    /// The worker becomes [`WorkerStatus::Working`] and the start time is
    /// taken before this returns, not when the future is first polled, so a
    /// caller that checks [`is_available`](Self::is_available) again right
    /// after will see the worker as busy. The future sleeps for the average
    /// duration, returns the worker to idle and resolves with the record.
    /// Dropping the future early (an aborted task, a dropped run) also
    /// returns the worker to idle; no record is produced in that case.
    ///
    /// Callers must only invoke this while the worker is available.
    pub fn process(
        self: &Arc<Self>,
        job: Job,
    ) -> impl Future<Output = CompletionRecord> + Send + 'static {
        let started = Instant::now();
        let started_at = Utc::now();
        {
            let mut current = self.lock_job();
            debug_assert!(current.is_none(), "worker {} assigned while busy", self.name);
            *current = Some(job.clone());
        }

        tracing::info!(
            worker = %self.name,
            job_id = %job.id,
            subject = job.subject(),
            category = %job.category(),
            "Job started"
        );

        let claim = Claim(Arc::clone(self));
        async move {
            tokio::time::sleep(claim.0.average_duration).await;

            let duration = started.elapsed();
            let worker = claim.release();

            let record = CompletionRecord::new(&worker.name, &job, started_at, duration);
            tracing::info!(
                worker = %worker.name,
                job_id = %job.id,
                subject = job.subject(),
                category = %job.category(),
                duration_secs = record.duration_secs(),
                "Job completed"
            );
            record
        }
    }

    fn lock_job(&self) -> MutexGuard<'_, Option<Job>> {
        // Only ever holds a single Option write, so a poisoned value is still consistent
        self.current_job
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds a worker busy; dropping it clears the current job.
struct Claim(Arc<Worker>);

impl Claim {
    fn release(self) -> Arc<Worker> {
        Arc::clone(&self.0)
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        if let Some(job) = self.0.lock_job().take() {
            tracing::debug!(worker = %self.0.name, job_id = %job.id, "Worker released");
        }
    }
}
