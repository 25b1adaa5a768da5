//! Encoded image type and the placeholder constant
//!
//! `EncodedImage` pairs compressed bytes with their media type; it is what
//! the endpoint hands to the HTTP layer. The placeholder is a 1x1 PNG
//! embedded at compile time and served whenever no live frame is available,
//! so a placeholder response allocates nothing per request.

use bytes::Bytes;

/// Media type for live JPEG frames
pub const MEDIA_TYPE_JPEG: &str = "image/jpeg";

/// Media type for the placeholder
pub const MEDIA_TYPE_PNG: &str = "image/png";

/// A 1x1 black PNG, served when no live frame is available
pub const PLACEHOLDER_PNG: [u8; 83] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x01, 0x73, 0x52, 0x47, 0x42, 0x00, 0xAE, 0xCE, 0x1C,
    0xE9, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x18, 0x57, 0x63, 0x60, 0x60, 0x60,
    0xF8, 0x0F, 0x00, 0x01, 0x04, 0x01, 0x00, 0x70, 0x20, 0x65, 0x0B, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Compressed image bytes plus their media type
///
/// Cheap to clone: the data is reference-counted, and the placeholder
/// variant points at static memory.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Compressed image data
    pub data: Bytes,
    /// MIME type of `data`
    pub media_type: &'static str,
}

impl EncodedImage {
    /// Wrap JPEG bytes produced by the encoder
    pub fn jpeg(data: Bytes) -> Self {
        Self {
            data,
            media_type: MEDIA_TYPE_JPEG,
        }
    }

    /// The fixed placeholder image
    pub fn placeholder() -> Self {
        Self {
            data: Bytes::from_static(&PLACEHOLDER_PNG),
            media_type: MEDIA_TYPE_PNG,
        }
    }

    /// Whether this is the placeholder rather than a live frame
    pub fn is_placeholder(&self) -> bool {
        self.media_type == MEDIA_TYPE_PNG
    }
}
