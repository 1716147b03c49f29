//! Workers that process dispatched jobs.
//!
//! A [`Worker`] handles one job at a time and takes a fixed amount of time
//! per job. It does not decide what to work on: the
//! [`Dispatcher`](crate::scheduler::Dispatcher) checks
//! [`Worker::is_available`] and then calls [`Worker::process`].
//!
//! # Processing Flow
//!
//! 1. `process` marks the worker [`WorkerStatus::Working`] as soon as it is
//!    called, before the returned future is polled
//! 2. The future sleeps for the worker's average duration
//! 3. The worker goes back to [`WorkerStatus::Idle`]
//! 4. The future resolves with a
//!    [`CompletionRecord`](crate::scheduler::CompletionRecord)

pub mod executor;
pub mod status;

pub use executor::Worker;
pub use status::WorkerStatus;
