//! Frame endpoint
//!
//! The per-request pipeline: check liveness, check the device, offload a
//! blocking read, offload a liveness-gated encode, respond. Every
//! missing-data condition falls through to the placeholder image; nothing
//! here surfaces an error to the HTTP layer. "No frame yet" is a normal
//! answer, not a failure.

use crate::capture::ReadOutcome;
use crate::encode::{encode_jpeg, EncodedImage};
use crate::pipeline::context::PipelineContext;

/// Produce one response image for a frame request
///
/// Runs read-then-encode for this request in order, suspending at both
/// offload points so concurrent requests interleave freely. Requests
/// arriving while serving is inactive, while the device is closed, or
/// while shutdown is racing the offload pools all resolve to the
/// placeholder.
pub async fn grab_frame(ctx: &PipelineContext) -> EncodedImage {
    ctx.stats.record_request();

    if !ctx.liveness.is_active() {
        ctx.stats.record_placeholder();
        return EncodedImage::placeholder();
    }

    // Cached open state; the authoritative check runs under the device
    // lock inside the offloaded read.
    if !ctx.source.is_opened() {
        ctx.stats.record_placeholder();
        return EncodedImage::placeholder();
    }

    ctx.stats.record_capture_read();
    let source = ctx.source.clone();
    let frame = match ctx.dispatcher.run_io(move || source.read_blocking()).await {
        Ok(ReadOutcome::Frame(frame)) => frame,
        Ok(ReadOutcome::NoFrame) | Ok(ReadOutcome::NotOpened) => {
            ctx.stats.record_placeholder();
            return EncodedImage::placeholder();
        }
        Err(e) => {
            // Shutdown raced this request; the connection is going away too.
            tracing::debug!(error = %e, "Read offload rejected, serving placeholder");
            ctx.stats.record_placeholder();
            return EncodedImage::placeholder();
        }
    };

    ctx.stats.record_encode_job();
    let liveness = ctx.liveness.clone();
    let stats = ctx.stats.clone();
    let quality = ctx.jpeg_quality;
    let encoded = ctx
        .dispatcher
        .run_cpu(move || {
            // Re-checked after crossing onto the worker thread, so an
            // encode submitted just before deactivation does no work.
            if !liveness.is_active() {
                stats.record_encode_skip();
                return None;
            }
            encode_jpeg(frame, quality)
        })
        .await;

    match encoded {
        Ok(Some(data)) => {
            ctx.stats.record_live_frame();
            EncodedImage::jpeg(data)
        }
        Ok(None) => {
            ctx.stats.record_placeholder();
            EncodedImage::placeholder()
        }
        Err(e) => {
            tracing::debug!(error = %e, "Encode offload rejected, serving placeholder");
            ctx.stats.record_placeholder();
            EncodedImage::placeholder()
        }
    }
}
