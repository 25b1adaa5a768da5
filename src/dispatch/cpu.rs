//! CPU-bound worker pool
//!
//! A small pool of dedicated OS threads for encode work, fed by a bounded
//! job queue. Jobs are closures paired with a oneshot reply channel, so the
//! async side submits without blocking and awaits the result cooperatively.
//! Closing the pool drops the queue sender: workers finish what was already
//! queued and then exit, while new submissions fail fast.

use std::sync::Mutex;
use std::thread::JoinHandle;

use tokio::sync::oneshot;

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Bounded pool of encode worker threads
pub struct CpuPool {
    jobs: Mutex<Option<flume::Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl CpuPool {
    /// Spawn `workers` threads behind a queue of `queue_depth` jobs
    pub fn new(workers: usize, queue_depth: usize) -> Result<Self> {
        let workers = workers.max(1);
        let queue_depth = queue_depth.max(1);
        let (tx, rx) = flume::bounded::<Job>(queue_depth);
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let rx = rx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("encode-worker-{}", id))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        job();
                    }
                    tracing::debug!(worker = id, "Encode worker exiting");
                })?;
            handles.push(handle);
        }
        tracing::debug!(workers = workers, queue_depth = queue_depth, "CPU pool started");
        Ok(Self {
            jobs: Mutex::new(Some(tx)),
            workers: Mutex::new(handles),
        })
    }

    /// Run `f` on a worker thread and await its result
    ///
    /// Suspends (bounded queue backpressure) rather than blocking the
    /// calling task. Fails with `PoolClosed` once `close` has been called;
    /// a submission racing with `close` may still be accepted and is then
    /// drained like any other queued job.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let sender = {
            let guard = match self.jobs.lock() {
                Ok(guard) => guard,
                Err(_) => return Err(Error::PoolClosed),
            };
            match guard.as_ref() {
                Some(sender) => sender.clone(),
                None => return Err(Error::PoolClosed),
            }
        };
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            let _ = tx.send(f());
        });
        sender
            .send_async(job)
            .await
            .map_err(|_| Error::PoolClosed)?;
        rx.await.map_err(|_| Error::PoolClosed)
    }

    /// Stop accepting jobs; already-queued jobs still run
    pub fn close(&self) {
        let taken = match self.jobs.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if taken.is_some() {
            tracing::debug!("CPU pool queue closed");
        }
    }

    /// Join all worker threads; blocking, call off the async runtime
    ///
    /// Returns once workers have drained the queue and exited. Callers
    /// bound the wait with a timeout; an abandoned join leaves the workers
    /// finishing in the background, which only matters at process exit.
    pub fn join_workers(&self) {
        let handles: Vec<_> = {
            let mut guard = match self.workers.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_runs_job_and_returns_result() {
        let pool = CpuPool::new(2, 4).unwrap();
        let result = pool.run(|| 21 * 2).await.unwrap();
        assert_eq!(result, 42);
        pool.close();
        pool.join_workers();
    }

    #[tokio::test]
    async fn test_submission_after_close_fails_fast() {
        let pool = CpuPool::new(1, 2).unwrap();
        pool.close();
        let err = pool.run(|| 1).await.unwrap_err();
        assert!(matches!(err, Error::PoolClosed));
        pool.join_workers();
    }

    #[tokio::test]
    async fn test_queued_job_drains_after_close() {
        let pool = std::sync::Arc::new(CpuPool::new(1, 2).unwrap());
        let first = tokio::spawn({
            let pool = pool.clone();
            async move {
                pool.run(|| {
                    std::thread::sleep(Duration::from_millis(50));
                    7
                })
                .await
            }
        });
        let second = tokio::spawn({
            let pool = pool.clone();
            async move { pool.run(|| 8).await }
        });
        // Give both jobs a chance to enter the queue, then close it.
        tokio::time::sleep(Duration::from_millis(10)).await;
        pool.close();
        assert_eq!(first.await.unwrap().unwrap(), 7);
        assert_eq!(second.await.unwrap().unwrap(), 8);
        pool.join_workers();
    }

    #[tokio::test]
    async fn test_join_does_not_hang_after_close() {
        let pool = std::sync::Arc::new(CpuPool::new(2, 2).unwrap());
        pool.close();
        let joined = tokio::task::spawn_blocking({
            let pool = pool.clone();
            move || pool.join_workers()
        });
        tokio::time::timeout(Duration::from_secs(1), joined)
            .await
            .expect("workers should exit promptly")
            .unwrap();
    }
}
