use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Dispatcher is already running")]
    AlreadyRunning,

    #[error("No workers available, {abandoned} job(s) abandoned")]
    NoWorkersAvailable { abandoned: usize },

    #[error("Invalid processing duration: {0} (expected a finite, non-negative number of seconds)")]
    InvalidDuration(f64),

    #[error("Invalid worker spec '{0}', expected name:seconds")]
    InvalidWorkerSpec(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Worker task failed: {0}")]
    WorkerTask(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
