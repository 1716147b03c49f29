use std::str::FromStr;
use std::time::Duration;

use crate::error::DispatchError;

/// What a run does when the worker set is empty but jobs are queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPoolPolicy {
    /// Abandon the queue and complete normally with zero records.
    #[default]
    Drop,
    /// Abandon the queue and fail the run with
    /// [`DispatchError::NoWorkersAvailable`].
    Reject,
}

/// Tuning for a [`Dispatcher`](crate::scheduler::Dispatcher) run.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Re-check interval used while every worker is busy and none of them
    /// is running a job started by this dispatcher.
    pub poll_interval_ms: u64,
    pub empty_pool_policy: EmptyPoolPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            empty_pool_policy: EmptyPoolPolicy::Drop,
        }
    }
}

impl DispatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    pub fn with_empty_pool_policy(mut self, policy: EmptyPoolPolicy) -> Self {
        self.empty_pool_policy = policy;
        self
    }
}

/// A worker definition in `name:seconds` form, as accepted on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSpec {
    pub name: String,
    pub average_secs: f64,
}

impl WorkerSpec {
    pub fn new(name: impl Into<String>, average_secs: f64) -> Self {
        Self {
            name: name.into(),
            average_secs,
        }
    }
}

impl FromStr for WorkerSpec {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DispatchError::InvalidWorkerSpec(s.to_string());

        // Split on the last colon so names may contain colons
        let (name, secs) = s.trim().rsplit_once(':').ok_or_else(invalid)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid());
        }
        let average_secs: f64 = secs.trim().parse().map_err(|_| invalid())?;
        if !average_secs.is_finite() || average_secs < 0.0 {
            return Err(DispatchError::InvalidDuration(average_secs));
        }

        Ok(Self::new(name, average_secs))
    }
}

/// Inputs for the demo binary: who works and how many jobs to synthesize.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub workers: Vec<WorkerSpec>,
    pub job_count: usize,
    /// Seed for category generation. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            workers: vec![WorkerSpec::new("Dalton", 15.0), WorkerSpec::new("Wapol", 25.0)],
            job_count: 10,
            seed: None,
        }
    }
}
