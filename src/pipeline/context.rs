//! Pipeline context
//!
//! The process-scoped bundle of shared pipeline state: the capture handle,
//! the offload dispatcher, the liveness flag, and the counters. Everything
//! the frame endpoint and the shutdown sequencer touch goes through a
//! context value instead of globals, so tests can substitute fake sources
//! and private dispatchers freely.

use std::sync::Arc;

use crate::capture::SharedSource;
use crate::dispatch::Dispatcher;
use crate::pipeline::liveness::Liveness;
use crate::stats::PipelineStats;

/// Shared state for one frame-serving pipeline
///
/// Cloning shares the same source, dispatcher, flag, and counters.
#[derive(Clone)]
pub struct PipelineContext {
    /// Serialized handle to the capture device
    pub source: SharedSource,

    /// Offload routes for blocking reads and CPU-bound encodes
    pub dispatcher: Dispatcher,

    /// Whether serving is currently active
    pub liveness: Liveness,

    /// Request and offload counters
    pub stats: Arc<PipelineStats>,

    /// JPEG quality for live frames (1..=100)
    pub jpeg_quality: u8,
}

impl PipelineContext {
    /// Create a context around a capture handle and dispatcher
    pub fn new(
        source: SharedSource,
        dispatcher: Dispatcher,
        liveness: Liveness,
        jpeg_quality: u8,
    ) -> Self {
        Self {
            source,
            dispatcher,
            liveness,
            stats: Arc::new(PipelineStats::new()),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }
}
