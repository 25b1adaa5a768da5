//! Frame server
//!
//! Owns the pipeline context, binds the HTTP listener, and serves the frame
//! endpoint until shut down. Shutdown always runs the full sequencer, both
//! on signal and when the listener fails on its own.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::capture::{CaptureSource, SharedSource};
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::pipeline::{Liveness, PipelineContext};
use crate::server::config::ServerConfig;
use crate::server::routes::create_router;
use crate::server::shutdown::ShutdownHandle;

/// HTTP server for the frame pipeline
pub struct FrameServer {
    config: ServerConfig,
    ctx: Arc<PipelineContext>,
    shutdown: ShutdownHandle,
}

impl FrameServer {
    /// Create a server around a capture source
    ///
    /// Spawns the encode pool immediately; failure to do so is a startup
    /// error, like failing to bind later.
    pub fn new(config: ServerConfig, source: Box<dyn CaptureSource>) -> Result<Self> {
        let dispatcher = Dispatcher::new(
            config.encode_workers,
            config.encode_queue_depth,
            config.shutdown_grace,
        )?;
        let ctx = PipelineContext::new(
            SharedSource::new(source),
            dispatcher,
            Liveness::new(config.start_active),
            config.jpeg_quality,
        );
        let shutdown = ShutdownHandle::new(ctx.clone());
        Ok(Self {
            config,
            ctx: Arc::new(ctx),
            shutdown,
        })
    }

    /// Shared pipeline state, for embedding applications and tests
    pub fn context(&self) -> Arc<PipelineContext> {
        self.ctx.clone()
    }

    /// Handle for triggering shutdown from outside `run`
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                // Without signal delivery the server can only stop through
                // a listener error, so park this branch forever.
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run the server with a caller-provided shutdown future
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "Frame server listening");

        let app = create_router(self.ctx.clone());
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(self.shutdown.drain_signal())
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                self.shutdown.terminate().await;
                // In-flight responses get a bounded window to finish.
                match tokio::time::timeout(self.config.shutdown_grace, &mut serve).await {
                    Ok(result) => result.map_err(Error::from),
                    Err(_) => {
                        tracing::warn!("Connections still draining at exit");
                        Ok(())
                    }
                }
            }
            result = &mut serve => {
                // Listener exited on its own; still run the sequencer.
                self.shutdown.terminate().await;
                result.map_err(Error::from)
            }
        }
    }
}
