pub mod dispatcher;
pub mod job;
pub mod queue;
pub mod record;

pub use dispatcher::Dispatcher;
pub use job::{demo_jobs, Category, Job};
pub use queue::JobQueue;
pub use record::CompletionRecord;
