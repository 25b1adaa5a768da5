//! Frame encoding
//!
//! This module provides:
//! - Pure raw-frame to JPEG encoding
//! - The `EncodedImage` response payload type
//! - The embedded placeholder image and media type constants

pub mod jpeg;
pub mod placeholder;

pub use jpeg::encode_jpeg;
pub use placeholder::{EncodedImage, MEDIA_TYPE_JPEG, MEDIA_TYPE_PNG, PLACEHOLDER_PNG};
