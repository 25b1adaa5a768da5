//! Shutdown sequencing
//!
//! One handle that tears the pipeline down in a fixed order: stop accepting
//! requests and drain in-flight responses, deactivate serving, release the
//! capture device, then drain the offload pools. The device mutex
//! serializes release against any read still running on the IO pool; a
//! read that acquires the lock after release sees the closed device and
//! resolves to the placeholder like any other missing-data case.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::pipeline::PipelineContext;

/// Sequences pipeline teardown; idempotent
///
/// Cloning shares the same sequencer state, so a signal task and an
/// embedding application can both hold one safely.
#[derive(Clone)]
pub struct ShutdownHandle {
    ctx: PipelineContext,
    drain: Arc<Notify>,
    terminated: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub(crate) fn new(ctx: PipelineContext) -> Self {
        Self {
            ctx,
            drain: Arc::new(Notify::new()),
            terminated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether termination has begun
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Future resolving once termination has been requested
    ///
    /// Handed to the HTTP server as its graceful-shutdown signal. A single
    /// stored permit means the future resolves even if termination was
    /// requested before anyone awaited it.
    pub(crate) fn drain_signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let drain = self.drain.clone();
        async move { drain.notified().await }
    }

    /// Run the shutdown sequence
    ///
    /// Only the first call performs the teardown; repeated termination
    /// signals return immediately without double-releasing the device or
    /// re-draining the pools.
    pub async fn terminate(&self) {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Shutdown started");

        // Stop accepting connections; in-flight responses finish.
        self.drain.notify_one();

        // No new capture or encode work from here on.
        self.ctx.liveness.set(false);

        // Release the device off the async runtime; an in-flight read holds
        // the device lock until it finishes.
        let source = self.ctx.source.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || source.release()).await {
            if e.is_panic() {
                tracing::warn!("Capture release panicked");
            }
        }
        tracing::info!("Capture device released");

        self.ctx.dispatcher.shutdown().await;

        let snapshot = self.ctx.stats.snapshot();
        tracing::info!(
            requests = snapshot.requests,
            live_frames = snapshot.live_frames,
            placeholders = snapshot.placeholders,
            uptime_s = snapshot.uptime.as_secs(),
            "Pipeline stopped"
        );
    }
}
