//! Offload dispatch
//!
//! Two routes off the async runtime: `run_io` sends device-bound blocking
//! calls to the runtime's blocking thread pool, `run_cpu` sends encode work
//! to the crate's own worker pool. Both suspend the calling task instead of
//! blocking it, so the request loop stays free while reads and encodes are
//! in flight.
//!
//! Within one caller the two offloads complete in the order they were
//! awaited (a request reads, then encodes); across concurrent callers there
//! is no ordering. Once `shutdown` begins, further submissions on either
//! route fail fast with `PoolClosed` instead of hanging.

pub mod cpu;

pub use cpu::CpuPool;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

/// Routes blocking and CPU-bound work off the async runtime
///
/// Cloning shares the same pools and shutdown state.
#[derive(Clone)]
pub struct Dispatcher {
    cpu: Arc<CpuPool>,
    closed: Arc<AtomicBool>,
    grace: Duration,
}

impl Dispatcher {
    /// Create a dispatcher with `encode_workers` CPU threads behind a queue
    /// of `queue_depth`, draining for at most `grace` at shutdown
    pub fn new(encode_workers: usize, queue_depth: usize, grace: Duration) -> Result<Self> {
        Ok(Self {
            cpu: Arc::new(CpuPool::new(encode_workers, queue_depth)?),
            closed: Arc::new(AtomicBool::new(false)),
            grace,
        })
    }

    /// Run a blocking (device-bound) call on the IO pool and await it
    pub async fn run_io<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::PoolClosed);
        }
        match tokio::task::spawn_blocking(f).await {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_panic() {
                    tracing::warn!("Offloaded blocking call panicked");
                }
                Err(Error::PoolClosed)
            }
        }
    }

    /// Run a CPU-bound call on the encode pool and await it
    pub async fn run_cpu<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::PoolClosed);
        }
        self.cpu.run(f).await
    }

    /// Whether shutdown has begun
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close both routes and drain the encode pool
    ///
    /// Idempotent: only the first call performs the drain. Queued encode
    /// jobs finish; if the drain exceeds the grace period the workers are
    /// left to finish in the background and shutdown proceeds.
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Shutting down offload pools");
        self.cpu.close();
        let pool = self.cpu.clone();
        let drained = tokio::task::spawn_blocking(move || pool.join_workers());
        match tokio::time::timeout(self.grace, drained).await {
            Ok(_) => tracing::debug!("Encode workers drained"),
            Err(_) => tracing::warn!(
                grace_ms = self.grace.as_millis() as u64,
                "Encode workers still draining after grace period"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(1, 4, Duration::from_millis(500)).unwrap()
    }

    #[tokio::test]
    async fn test_io_and_cpu_routes_deliver_results() {
        let dispatcher = dispatcher();
        assert_eq!(dispatcher.run_io(|| 1 + 1).await.unwrap(), 2);
        assert_eq!(dispatcher.run_cpu(|| 2 + 2).await.unwrap(), 4);
        dispatcher.shutdown().await;
    }

    #[tokio::test]
    async fn test_submissions_fail_fast_after_shutdown() {
        let dispatcher = dispatcher();
        dispatcher.shutdown().await;
        assert!(matches!(
            dispatcher.run_io(|| ()).await,
            Err(Error::PoolClosed)
        ));
        assert!(matches!(
            dispatcher.run_cpu(|| ()).await,
            Err(Error::PoolClosed)
        ));
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let dispatcher = dispatcher();
        dispatcher.shutdown().await;
        dispatcher.shutdown().await;
        assert!(dispatcher.is_closed());
    }

    #[tokio::test]
    async fn test_shutdown_drains_in_flight_encode() {
        let dispatcher = dispatcher();
        let in_flight = tokio::spawn({
            let dispatcher = dispatcher.clone();
            async move {
                dispatcher
                    .run_cpu(|| {
                        std::thread::sleep(Duration::from_millis(50));
                        9
                    })
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        dispatcher.shutdown().await;
        assert_eq!(in_flight.await.unwrap().unwrap(), 9);
    }

    #[tokio::test]
    async fn test_clones_share_shutdown_state() {
        let dispatcher = dispatcher();
        let clone = dispatcher.clone();
        dispatcher.shutdown().await;
        assert!(clone.is_closed());
        assert!(matches!(clone.run_cpu(|| ()).await, Err(Error::PoolClosed)));
    }
}
