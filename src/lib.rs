pub mod config;
pub mod error;
pub mod report;
pub mod scheduler;
pub mod shutdown;
pub mod worker;

pub use error::{DispatchError, Result};
pub use scheduler::{Category, CompletionRecord, Dispatcher, Job};
pub use worker::{Worker, WorkerStatus};
