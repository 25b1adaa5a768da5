//! Frame capture
//!
//! This module provides:
//! - Raw frame and pixel format types
//! - The `CaptureSource` device abstraction and the shared, serialized
//!   handle the pipeline holds
//! - A synthetic test-pattern source for demos and tests
//! - An optional real webcam backend (`camera-nokhwa` feature)

pub mod frame;
#[cfg(feature = "camera-nokhwa")]
pub mod nokhwa;
pub mod pattern;
pub mod source;

pub use frame::{Frame, PixelFormat};
#[cfg(feature = "camera-nokhwa")]
pub use nokhwa::NokhwaSource;
pub use pattern::TestPatternSource;
pub use source::{CaptureSource, ReadOutcome, SharedSource};
