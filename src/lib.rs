//! Non-blocking webcam frame serving over HTTP
//!
//! A single GET endpoint returns the current camera frame as JPEG, or a
//! fixed placeholder PNG whenever no live frame is available. The blocking
//! device read and the CPU-bound JPEG encode both run off the async
//! runtime, so concurrent requests never stall each other.
//!
//! # Architecture
//!
//! ```text
//!  GET /video/frame                Arc<PipelineContext>
//!        │                  ┌──────────────────────────────┐
//!        ▼                  │ liveness: AtomicBool         │
//!   grab_frame() ◄──────────┤ source:   SharedSource       │
//!        │                  │ stats:    PipelineStats      │
//!        │                  └──────────────────────────────┘
//!        ├─ liveness off? ──► placeholder PNG
//!        ├─ device closed? ─► placeholder PNG
//!        │
//!        ├──► Dispatcher::run_io ───► [blocking pool] source.read()
//!        │         (no frame? ─────► placeholder PNG)
//!        │
//!        └──► Dispatcher::run_cpu ──► [encode workers] encode_jpeg()
//!                  (inactive or failed? ──► placeholder PNG)
//! ```
//!
//! Shutdown runs one idempotent sequence: drain HTTP, deactivate serving,
//! release the device, drain the pools.
//!
//! # Example
//!
//! ```no_run
//! use framegrab_rs::{FrameServer, ServerConfig, TestPatternSource};
//!
//! #[tokio::main]
//! async fn main() -> framegrab_rs::Result<()> {
//!     let config = ServerConfig::default();
//!     let source = Box::new(TestPatternSource::new(640, 480));
//!     let server = FrameServer::new(config, source)?;
//!     server.run().await
//! }
//! ```

pub mod capture;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod pipeline;
pub mod server;
pub mod stats;

pub use capture::{CaptureSource, Frame, PixelFormat, ReadOutcome, SharedSource, TestPatternSource};
#[cfg(feature = "camera-nokhwa")]
pub use capture::NokhwaSource;
pub use dispatch::Dispatcher;
pub use encode::{EncodedImage, MEDIA_TYPE_JPEG, MEDIA_TYPE_PNG, PLACEHOLDER_PNG};
pub use error::{Error, Result};
pub use pipeline::{grab_frame, Liveness, PipelineContext};
pub use server::{create_router, FrameServer, ServerConfig, ShutdownHandle, FRAME_PATH};
pub use stats::{PipelineStats, StatsSnapshot};
