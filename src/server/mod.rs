//! HTTP serving and lifecycle
//!
//! This module provides:
//! - `ServerConfig` for tuning bind address, encoding, and shutdown
//! - The single-endpoint router serving frames
//! - `FrameServer` tying capture, dispatch, and HTTP together
//! - `ShutdownHandle`, the idempotent teardown sequencer

pub mod config;
pub mod listener;
pub mod routes;
pub mod shutdown;

pub use config::ServerConfig;
pub use listener::FrameServer;
pub use routes::{create_router, FRAME_PATH};
pub use shutdown::ShutdownHandle;
