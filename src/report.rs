//! Read-only views over a finished run.
//!
//! Nothing in here feeds back into dispatching; it only summarises
//! [`CompletionRecord`]s that have already been collected.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scheduler::{Category, CompletionRecord};

/// Outcome of one [`Dispatcher::run`](crate::scheduler::Dispatcher::run).
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dispatcher: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Records produced by this run
    pub completed: usize,
    /// Jobs never offered to a worker (empty pool or cancellation)
    pub abandoned: usize,
    pub cancelled: bool,
}

impl RunReport {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkerStats {
    pub jobs: usize,
    pub total: Duration,
}

impl WorkerStats {
    pub fn average_secs(&self) -> f64 {
        if self.jobs == 0 {
            0.0
        } else {
            self.total.as_secs_f64() / self.jobs as f64
        }
    }
}

/// Per-worker and per-category totals, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub by_worker: BTreeMap<String, WorkerStats>,
    pub by_category: BTreeMap<Category, usize>,
}

impl RunSummary {
    pub fn from_records(records: &[CompletionRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            let stats = summary.by_worker.entry(record.worker.clone()).or_default();
            stats.jobs += 1;
            stats.total += record.duration;
            *summary.by_category.entry(record.category).or_insert(0) += 1;
        }
        summary
    }

    /// Include workers that finished nothing, so every pool member shows up
    pub fn with_workers<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            self.by_worker.entry(name.to_string()).or_default();
        }
        self
    }
}

/// One line per record, in completion order.
pub fn render_records_table(records: &[CompletionRecord]) -> String {
    let mut out = format!(
        "{:<4} {:<16} {:<20} {:<10} {:>10}\n",
        "#", "WORKER", "SUBJECT", "CATEGORY", "DURATION"
    );
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<16} {:<20} {:<10} {:>9.1}s\n",
            i + 1,
            record.worker,
            record.subject,
            record.category,
            record.duration_secs()
        ));
    }
    out
}

pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = format!("{:<16} {:>6} {:>10}\n", "WORKER", "JOBS", "AVG");
    for (name, stats) in &summary.by_worker {
        out.push_str(&format!(
            "{:<16} {:>6} {:>9.1}s\n",
            name,
            stats.jobs,
            stats.average_secs()
        ));
    }
    out.push('\n');
    out.push_str(&format!("{:<16} {:>6}\n", "CATEGORY", "JOBS"));
    for (category, count) in &summary.by_category {
        out.push_str(&format!("{:<16} {:>6}\n", category, count));
    }
    out
}
