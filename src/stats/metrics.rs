//! Pipeline counters
//!
//! Shared atomic counters for the frame pipeline. Every request touches
//! these from concurrent tasks, so they are plain relaxed atomics behind an
//! `Arc` rather than a locked struct. `snapshot` flattens them into an
//! ordinary value for logging and assertions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters for the frame-serving pipeline
#[derive(Debug)]
pub struct PipelineStats {
    /// Requests handled by the frame endpoint
    requests: AtomicU64,
    /// Responses carrying a live encoded frame
    live_frames: AtomicU64,
    /// Responses carrying the placeholder
    placeholders: AtomicU64,
    /// Device reads submitted to the IO pool
    capture_reads: AtomicU64,
    /// Encode jobs submitted to the CPU pool
    encode_jobs: AtomicU64,
    /// Encode jobs that short-circuited because serving went inactive
    encode_skips: AtomicU64,
    /// When this pipeline started
    started_at: Instant,
}

impl PipelineStats {
    /// Create a zeroed counter set
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            live_frames: AtomicU64::new(0),
            placeholders: AtomicU64::new(0),
            capture_reads: AtomicU64::new(0),
            encode_jobs: AtomicU64::new(0),
            encode_skips: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record a request arriving at the endpoint
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a live frame response
    pub fn record_live_frame(&self) {
        self.live_frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a placeholder response
    pub fn record_placeholder(&self) {
        self.placeholders.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a device read submitted to the IO pool
    pub fn record_capture_read(&self) {
        self.capture_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an encode job submitted to the CPU pool
    pub fn record_encode_job(&self) {
        self.encode_jobs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an encode job that skipped work because serving was inactive
    pub fn record_encode_skip(&self) {
        self.encode_skips.fetch_add(1, Ordering::Relaxed);
    }

    /// Current values as a plain struct
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            live_frames: self.live_frames.load(Ordering::Relaxed),
            placeholders: self.placeholders.load(Ordering::Relaxed),
            capture_reads: self.capture_reads.load(Ordering::Relaxed),
            encode_jobs: self.encode_jobs.load(Ordering::Relaxed),
            encode_skips: self.encode_skips.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the pipeline counters
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    /// Requests handled by the frame endpoint
    pub requests: u64,
    /// Responses carrying a live encoded frame
    pub live_frames: u64,
    /// Responses carrying the placeholder
    pub placeholders: u64,
    /// Device reads submitted to the IO pool
    pub capture_reads: u64,
    /// Encode jobs submitted to the CPU pool
    pub encode_jobs: u64,
    /// Encode jobs that short-circuited because serving went inactive
    pub encode_skips: u64,
    /// Time since the pipeline started
    pub uptime: Duration,
}
