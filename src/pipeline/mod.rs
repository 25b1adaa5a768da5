//! Frame-serving pipeline
//!
//! This module provides:
//! - The process-scoped `PipelineContext` shared by requests and shutdown
//! - The `Liveness` flag gating all capture and encode work
//! - `grab_frame`, the read-then-encode request algorithm with placeholder
//!   fallback

pub mod context;
pub mod endpoint;
pub mod liveness;

pub use context::PipelineContext;
pub use endpoint::grab_frame;
pub use liveness::Liveness;
