//! JPEG frame encoding
//!
//! One pure function from a raw frame to compressed bytes. Deterministic
//! for a given quality setting, and total: malformed input yields `None`,
//! never a panic, because the request path treats every encode miss as
//! "no data" and falls back to the placeholder.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::capture::frame::{Frame, PixelFormat};

/// Encode a raw frame as JPEG at the given quality (clamped to 1..=100)
///
/// Consumes the frame; the returned buffer is independently owned.
pub fn encode_jpeg(frame: Frame, quality: u8) -> Option<Bytes> {
    if !frame.is_valid() {
        tracing::debug!(
            width = frame.width,
            height = frame.height,
            len = frame.data.len(),
            "Rejecting malformed frame"
        );
        return None;
    }
    let color_type = match frame.format {
        PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
        PixelFormat::Luma8 => ExtendedColorType::L8,
    };
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    match encoder.encode(&frame.data, frame.width, frame.height, color_type) {
        Ok(()) => Some(Bytes::from(buffer)),
        Err(e) => {
            tracing::debug!(error = %e, "JPEG encode failed");
            None
        }
    }
}
