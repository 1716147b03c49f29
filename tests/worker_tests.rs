
use std::sync::Arc;
use std::time::{Duration, Instant};

use repair_dispatch::error::DispatchError;
use repair_dispatch::scheduler::{Category, Job};
use repair_dispatch::worker::{Worker, WorkerStatus};
use test_harness::worker_ms;

#[test]
fn test_worker_starts_idle() {
    let worker = Worker::new("Dalton", Duration::from_secs(15));

    assert_eq!(worker.name(), "Dalton");
    assert_eq!(worker.average_duration(), Duration::from_secs(15));
    assert_eq!(worker.status(), WorkerStatus::Idle);
    assert!(worker.is_available());
    assert!(worker.current_job().is_none());
}

#[test]
fn test_worker_setters() {
    let mut worker = Worker::new("Dalton", Duration::from_secs(15));
    worker.set_name("Wapol");
    worker.set_average_duration(Duration::from_secs(25));

    assert_eq!(worker.name(), "Wapol");
    assert_eq!(worker.average_duration(), Duration::from_secs(25));
}

#[test]
fn test_worker_from_secs() {
    let worker = Worker::from_secs("Fast", 0.5).unwrap();
    assert_eq!(worker.average_duration(), Duration::from_millis(500));

    let worker = Worker::from_secs("Instant", 0.0).unwrap();
    assert_eq!(worker.average_duration(), Duration::ZERO);
}

#[test]
fn test_worker_from_secs_rejects_invalid() {
    for secs in [-1.0, f64::NAN, f64::INFINITY] {
        let err = Worker::from_secs("Broken", secs).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDuration(_)));
    }
}

#[tokio::test]
async fn test_process_marks_worker_busy_before_polling() {
    let worker = Arc::new(worker_ms("Dalton", 100));
    let job = Job::new("Customer 1", Category::Jaguar);

    // Not yet awaited: the worker must already be claimed
    let pending = worker.process(job.clone());

    assert_eq!(worker.status(), WorkerStatus::Working);
    assert!(!worker.is_available());
    assert_eq!(worker.current_job(), Some(job));

    pending.await;
    assert!(worker.is_available());
}

#[tokio::test]
async fn test_process_returns_record() {
    let worker = Arc::new(worker_ms("Dalton", 100));
    let job = Job::new("Customer 1", Category::Leopard);
    let job_id = job.id;

    let started = Instant::now();
    let record = worker.process(job).await;
    let elapsed = started.elapsed();

    assert_eq!(record.job_id, job_id);
    assert_eq!(record.worker, "Dalton");
    assert_eq!(record.subject, "Customer 1");
    assert_eq!(record.category, Category::Leopard);
    assert!(record.duration >= Duration::from_millis(100));
    assert!(record.duration <= elapsed);
    assert!(record.finished_at >= record.started_at);
    assert!(record.duration_secs() >= 0.1);
}

#[tokio::test]
async fn test_process_returns_worker_to_idle() {
    let worker = Arc::new(worker_ms("Dalton", 50));

    worker
        .process(Job::new("Customer 1", Category::Lion))
        .await;

    assert_eq!(worker.status(), WorkerStatus::Idle);
    assert!(worker.current_job().is_none());
}

#[tokio::test]
async fn test_process_zero_duration() {
    let worker = Arc::new(Worker::new("Instant", Duration::ZERO));

    let record = worker
        .process(Job::new("Customer 1", Category::Jaguar))
        .await;

    assert!(record.duration < Duration::from_millis(100));
    assert!(record.finished_at >= record.started_at);
    assert!(worker.is_available());
}

#[tokio::test]
async fn test_process_runs_independently_when_spawned() {
    let worker = Arc::new(worker_ms("Dalton", 100));
    let handle = tokio::spawn(worker.process(Job::new("Customer 1", Category::Lion)));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!worker.is_available());

    let record = handle.await.unwrap();
    assert_eq!(record.subject, "Customer 1");
    assert!(worker.is_available());
}

#[test]
fn test_worker_status_display() {
    assert_eq!(WorkerStatus::Idle.to_string(), "idle");
    assert_eq!(WorkerStatus::Working.to_string(), "working");
}

#[tokio::test]
async fn test_aborted_process_returns_worker_to_idle() {
    let worker = Arc::new(worker_ms("Dalton", 500));
    let handle = tokio::spawn(worker.process(Job::new("Customer 1", Category::Lion)));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!worker.is_available());

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    assert!(worker.is_available());
    assert!(worker.current_job().is_none());
}

#[tokio::test]
async fn test_dropped_process_future_returns_worker_to_idle() {
    let worker = Arc::new(worker_ms("Dalton", 500));

    let pending = worker.process(Job::new("Customer 1", Category::Jaguar));
    assert!(!worker.is_available());

    drop(pending);
    assert!(worker.is_available());
}
