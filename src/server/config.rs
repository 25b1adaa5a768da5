//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// JPEG quality for live frames (1..=100)
    pub jpeg_quality: u8,

    /// Capture width requested from the device
    pub capture_width: u32,

    /// Capture height requested from the device
    pub capture_height: u32,

    /// Worker threads in the encode pool
    pub encode_workers: usize,

    /// Queued encode jobs before submitters feel backpressure
    pub encode_queue_depth: usize,

    /// How long shutdown waits for in-flight work to drain, applied to
    /// the encode pool and to open HTTP connections separately
    pub shutdown_grace: Duration,

    /// Whether frame serving starts active
    pub start_active: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            jpeg_quality: 85,
            capture_width: 640,
            capture_height: 480,
            encode_workers: 2,
            encode_queue_depth: 8,
            shutdown_grace: Duration::from_secs(1),
            start_active: true,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set JPEG quality (clamped to 1..=100)
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the capture dimensions requested from the device
    pub fn capture_size(mut self, width: u32, height: u32) -> Self {
        self.capture_width = width;
        self.capture_height = height;
        self
    }

    /// Set the number of encode worker threads
    pub fn encode_workers(mut self, workers: usize) -> Self {
        self.encode_workers = workers.max(1);
        self
    }

    /// Set the encode queue depth
    pub fn encode_queue_depth(mut self, depth: usize) -> Self {
        self.encode_queue_depth = depth.max(1);
        self
    }

    /// Set the shutdown grace period
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Start with frame serving inactive until something activates it
    pub fn start_inactive(mut self) -> Self {
        self.start_active = false;
        self
    }
}
