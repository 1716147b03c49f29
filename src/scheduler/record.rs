use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scheduler::job::{Category, Job};

/// Immutable result of one finished job.
///
/// `duration` is measured on a monotonic clock and `finished_at` is derived
/// from it, so `finished_at >= started_at` holds even if the wall clock
/// steps backwards mid-job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub job_id: Uuid,
    pub worker: String,
    pub subject: String,
    pub category: Category,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration: Duration,
}

impl CompletionRecord {
    pub fn new(worker: &str, job: &Job, started_at: DateTime<Utc>, duration: Duration) -> Self {
        let finished_at = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|d| started_at.checked_add_signed(d))
            .unwrap_or(started_at);

        Self {
            job_id: job.id,
            worker: worker.to_string(),
            subject: job.subject().to_string(),
            category: job.category(),
            started_at,
            finished_at,
            duration,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}
