use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::config::{DispatchConfig, EmptyPoolPolicy};
use crate::error::{DispatchError, Result};
use crate::report::RunReport;
use crate::scheduler::job::Job;
use crate::scheduler::queue::JobQueue;
use crate::scheduler::record::CompletionRecord;
use crate::worker::Worker;

/// Matches queued jobs to idle workers and collects their completion records.
pub struct Dispatcher {
    name: String,
    location: String,
    workers: Vec<Arc<Worker>>,
    // Held for the whole of a run; a failed try_lock means a run is in progress
    queue: Mutex<JobQueue>,
    records: RwLock<Vec<CompletionRecord>>,
    config: DispatchConfig,
    cancel: CancellationToken,
}

impl Dispatcher {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        workers: Vec<Worker>,
        jobs: Vec<Job>,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            workers: workers.into_iter().map(Arc::new).collect(),
            queue: Mutex::new(JobQueue::new(jobs)),
            records: RwLock::new(Vec::new()),
            config: DispatchConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop offering jobs once `token` is cancelled. Jobs already started
    /// are still awaited.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn workers(&self) -> &[Arc<Worker>] {
        &self.workers
    }

    /// Snapshot of the records collected so far, in completion order.
    pub fn repair_records(&self) -> Vec<CompletionRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Dispatch every queued job and wait for all of them to finish.
    ///
    /// Jobs are offered in queue order to the first idle worker, in worker
    /// order. A started job is not awaited before the next one is offered.
    /// When every worker is busy the dispatcher waits for an in-flight job
    /// to finish, then retries the same job.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::AlreadyRunning`] if another run on this dispatcher
    ///   has not finished.
    /// - [`DispatchError::NoWorkersAvailable`] if the pool is empty, jobs are
    ///   queued and the policy is [`EmptyPoolPolicy::Reject`].
    /// - [`DispatchError::WorkerTask`] if a job task panicked. No further
    ///   jobs are offered, but every job already started is still awaited
    ///   and recorded before the error is returned.
    pub async fn run(&self) -> Result<RunReport> {
        let mut queue = self
            .queue
            .try_lock()
            .map_err(|_| DispatchError::AlreadyRunning)?;

        let started = Instant::now();
        let started_at = Utc::now();
        let records_before = self.record_count();

        tracing::info!(
            dispatcher = %self.name,
            location = %self.location,
            workers = self.workers.len(),
            queued = queue.remaining(),
            "Dispatcher operating"
        );

        if self.workers.is_empty() {
            let abandoned = queue.abandon();
            if abandoned > 0 {
                tracing::warn!(
                    dispatcher = %self.name,
                    abandoned,
                    "No workers in pool, queued jobs abandoned"
                );
                if self.config.empty_pool_policy == EmptyPoolPolicy::Reject {
                    return Err(DispatchError::NoWorkersAvailable { abandoned });
                }
            }
            return Ok(self.report(started, started_at, records_before, abandoned, false));
        }

        let mut in_flight = JoinSet::new();
        let mut poll = tokio::time::interval(self.config.poll_interval());
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut cancelled = false;
        // First failed job task; no new jobs are offered once set
        let mut failure: Option<JoinError> = None;

        while !queue.is_exhausted() && failure.is_none() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            // No await between the idle check and process(): process() marks
            // the worker busy before returning.
            if let Some(worker) = self.workers.iter().find(|w| w.is_available()) {
                if let Some(job) = queue.advance() {
                    in_flight.spawn(worker.process(job));
                }
                while let Some(joined) = in_flight.try_join_next() {
                    self.collect(joined, &mut failure);
                }
                continue;
            }

            tracing::debug!(
                dispatcher = %self.name,
                in_flight = in_flight.len(),
                "All workers busy, waiting for one to become idle"
            );

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                Some(joined) = in_flight.join_next() => {
                    self.collect(joined, &mut failure);
                }
                // Workers busy with jobs this dispatcher did not start
                _ = poll.tick(), if in_flight.is_empty() => {}
            }
        }

        let abandoned = queue.remaining();
        if cancelled {
            tracing::info!(
                dispatcher = %self.name,
                offered = queue.offered(),
                abandoned,
                in_flight = in_flight.len(),
                "Dispatch cancelled, draining in-flight jobs"
            );
        }

        self.drain(&mut in_flight, &mut failure).await;

        if let Some(err) = failure {
            tracing::warn!(
                dispatcher = %self.name,
                offered = queue.offered(),
                abandoned,
                "Dispatch stopped after a job task failed"
            );
            return Err(DispatchError::WorkerTask(err));
        }

        let report = self.report(started, started_at, records_before, abandoned, cancelled);
        tracing::info!(
            dispatcher = %self.name,
            completed = report.completed,
            abandoned = report.abandoned,
            elapsed_secs = report.elapsed_secs(),
            "All jobs completed"
        );
        Ok(report)
    }

    /// Wait for every in-flight job, recording each one that finishes.
    async fn drain(
        &self,
        in_flight: &mut JoinSet<CompletionRecord>,
        failure: &mut Option<JoinError>,
    ) {
        while let Some(joined) = in_flight.join_next().await {
            self.collect(joined, failure);
        }
    }

    /// Append a finished job's record, or keep the first task failure.
    fn collect(
        &self,
        joined: std::result::Result<CompletionRecord, JoinError>,
        failure: &mut Option<JoinError>,
    ) {
        match joined {
            Ok(record) => self
                .records
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record),
            Err(err) => {
                tracing::error!(dispatcher = %self.name, error = %err, "Job task failed");
                failure.get_or_insert(err);
            }
        }
    }

    fn record_count(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn report(
        &self,
        started: Instant,
        started_at: chrono::DateTime<Utc>,
        records_before: usize,
        abandoned: usize,
        cancelled: bool,
    ) -> RunReport {
        RunReport {
            dispatcher: self.name.clone(),
            started_at,
            finished_at: Utc::now(),
            elapsed: started.elapsed(),
            completed: self.record_count() - records_before,
            abandoned,
            cancelled,
        }
    }
}
