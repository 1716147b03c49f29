use crate::scheduler::job::Job;

/// Jobs in arrival order plus a cursor that only moves forward.
///
/// Jobs before the cursor have been offered to a worker; jobs at or after it
/// are still waiting. Nothing is ever reordered or skipped.
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: Vec<Job>,
    cursor: usize,
}

impl JobQueue {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs, cursor: 0 }
    }

    /// Take the job at the cursor and move past it
    pub fn advance(&mut self) -> Option<Job> {
        let job = self.jobs.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(job)
    }

    /// Move the cursor past every remaining job. Returns how many were skipped.
    pub fn abandon(&mut self) -> usize {
        let remaining = self.remaining();
        self.cursor = self.jobs.len();
        remaining
    }

    /// Number of jobs not yet offered
    pub fn remaining(&self) -> usize {
        self.jobs.len() - self.cursor
    }

    /// Number of jobs already offered
    pub fn offered(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns true once every job has been offered
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.jobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::job::Category;

    fn three_jobs() -> Vec<Job> {
        vec![
            Job::new("Customer 1", Category::Jaguar),
            Job::new("Customer 2", Category::Leopard),
            Job::new("Customer 3", Category::Lion),
        ]
    }

    #[test]
    fn advance_walks_front_to_back() {
        let mut queue = JobQueue::new(three_jobs());
        assert_eq!(queue.remaining(), 3);

        let subjects: Vec<String> = std::iter::from_fn(|| queue.advance())
            .map(|j| j.subject().to_string())
            .collect();
        assert_eq!(subjects, ["Customer 1", "Customer 2", "Customer 3"]);
        assert!(queue.is_exhausted());
        assert!(queue.advance().is_none());
        assert_eq!(queue.offered(), 3);
    }

    #[test]
    fn offered_counts_jobs_taken() {
        let mut queue = JobQueue::new(three_jobs());
        assert_eq!(queue.offered(), 0);

        queue.advance();
        assert_eq!(queue.offered(), 1);
        assert_eq!(queue.remaining(), 2);
    }

    #[test]
    fn abandon_skips_remaining_jobs() {
        let mut queue = JobQueue::new(three_jobs());
        queue.advance();

        assert_eq!(queue.abandon(), 2);
        assert!(queue.is_exhausted());
        assert_eq!(queue.remaining(), 0);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.abandon(), 0);
    }

    #[test]
    fn empty_queue_is_exhausted() {
        let mut queue = JobQueue::default();
        assert!(queue.is_empty());
        assert!(queue.is_exhausted());
        assert!(queue.advance().is_none());
    }
}
