//! Capture source abstraction
//!
//! `CaptureSource` is the seam between the pipeline and whatever actually
//! produces frames: a real webcam backend, the synthetic test pattern, or a
//! test fake. `SharedSource` is the process-wide handle the pipeline holds;
//! it serializes device access (capture hardware is single-reader) and keeps
//! a cached open flag so the request path can pre-check availability without
//! touching the device from the event loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::frame::Frame;

/// A stateful video capture device
///
/// `read` may block for up to a frame interval, so the pipeline only calls
/// it from the blocking offload pool. Implementations do not need internal
/// locking; `SharedSource` serializes all access.
pub trait CaptureSource: Send {
    /// Whether the device is open and able to produce frames
    fn is_opened(&self) -> bool;

    /// Read one frame, blocking until the device produces it
    ///
    /// `None` means "temporarily no data" (device warming up, transient
    /// read failure), not an error. The pipeline resolves it to the
    /// placeholder image.
    fn read(&mut self) -> Option<Frame>;

    /// Release the device handle; must be idempotent
    fn release(&mut self);
}

/// Outcome of an offloaded read against a shared source
#[derive(Debug)]
pub enum ReadOutcome {
    /// Device is not open (never opened, already released, or unusable)
    NotOpened,
    /// Device is open but produced no frame this time
    NoFrame,
    /// One frame
    Frame(Frame),
}

/// Thread-safe handle to a single capture device
///
/// Cloning shares the same underlying device. The cached open flag may lag
/// the device by one read; the authoritative check runs under the lock
/// inside `read_blocking`.
#[derive(Clone)]
pub struct SharedSource {
    inner: Arc<Mutex<Box<dyn CaptureSource>>>,
    opened: Arc<AtomicBool>,
    released: Arc<AtomicBool>,
}

impl SharedSource {
    /// Wrap a capture device
    pub fn new(source: Box<dyn CaptureSource>) -> Self {
        let opened = source.is_opened();
        Self {
            inner: Arc::new(Mutex::new(source)),
            opened: Arc::new(AtomicBool::new(opened)),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cached open state, safe to call from the event loop
    pub fn is_opened(&self) -> bool {
        self.opened.load(Ordering::Relaxed)
    }

    /// Read one frame; blocking, call only from the IO offload pool
    pub fn read_blocking(&self) -> ReadOutcome {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            // A reader panicked mid-read; the device state is unknown,
            // treat it as gone instead of propagating the panic.
            Err(_) => {
                self.opened.store(false, Ordering::Relaxed);
                return ReadOutcome::NotOpened;
            }
        };
        if !guard.is_opened() {
            self.opened.store(false, Ordering::Relaxed);
            return ReadOutcome::NotOpened;
        }
        match guard.read() {
            Some(frame) => ReadOutcome::Frame(frame),
            None => ReadOutcome::NoFrame,
        }
    }

    /// Release the device; idempotent, safe to call during in-flight reads
    ///
    /// The device is released at most once no matter how many times this is
    /// called. The mutex serializes release against any read still running
    /// on the offload pool: a read that acquires the lock afterwards
    /// observes the closed device and reports `NotOpened`.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.release();
        self.opened.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::frame::PixelFormat;
    use std::sync::atomic::AtomicU64;

    struct ScriptedSource {
        opened: bool,
        frames: Vec<Option<Frame>>,
        releases: Arc<AtomicU64>,
    }

    impl ScriptedSource {
        fn new(opened: bool, frames: Vec<Option<Frame>>) -> (Self, Arc<AtomicU64>) {
            let releases = Arc::new(AtomicU64::new(0));
            (
                Self {
                    opened,
                    frames,
                    releases: releases.clone(),
                },
                releases,
            )
        }
    }

    impl CaptureSource for ScriptedSource {
        fn is_opened(&self) -> bool {
            self.opened
        }

        fn read(&mut self) -> Option<Frame> {
            if self.frames.is_empty() {
                None
            } else {
                self.frames.remove(0)
            }
        }

        fn release(&mut self) {
            self.opened = false;
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn tiny_frame() -> Frame {
        Frame::new(vec![1, 2, 3], 1, 1, PixelFormat::Rgb8)
    }

    #[test]
    fn test_read_returns_frame_then_no_frame() {
        let (source, _) = ScriptedSource::new(true, vec![Some(tiny_frame()), None]);
        let shared = SharedSource::new(Box::new(source));
        assert!(shared.is_opened());
        assert!(matches!(shared.read_blocking(), ReadOutcome::Frame(_)));
        assert!(matches!(shared.read_blocking(), ReadOutcome::NoFrame));
    }

    #[test]
    fn test_closed_device_reports_not_opened() {
        let (source, _) = ScriptedSource::new(false, vec![Some(tiny_frame())]);
        let shared = SharedSource::new(Box::new(source));
        assert!(!shared.is_opened());
        assert!(matches!(shared.read_blocking(), ReadOutcome::NotOpened));
    }

    #[test]
    fn test_release_is_idempotent() {
        let (source, releases) = ScriptedSource::new(true, Vec::new());
        let shared = SharedSource::new(Box::new(source));
        shared.release();
        shared.release();
        assert_eq!(releases.load(Ordering::SeqCst), 1);
        assert!(!shared.is_opened());
        assert!(matches!(shared.read_blocking(), ReadOutcome::NotOpened));
    }

    #[test]
    fn test_read_after_release_sees_closed_device() {
        let (source, _) = ScriptedSource::new(true, vec![Some(tiny_frame())]);
        let shared = SharedSource::new(Box::new(source));
        let clone = shared.clone();
        shared.release();
        assert!(matches!(clone.read_blocking(), ReadOutcome::NotOpened));
    }
}
