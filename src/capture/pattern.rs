//! Synthetic capture source
//!
//! A camera stand-in that renders a moving gradient. The demo binary uses
//! it when no camera backend is compiled in, and tests use it whenever they
//! need a deterministic device that always produces frames.

use std::time::Instant;

use super::frame::{Frame, PixelFormat};
use super::source::CaptureSource;

/// Capture source producing a procedurally generated moving pattern
pub struct TestPatternSource {
    width: u32,
    height: u32,
    tick: u64,
    started: Instant,
    opened: bool,
}

impl TestPatternSource {
    /// Create a pattern source with the given frame dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
            started: Instant::now(),
            opened: true,
        }
    }
}

impl CaptureSource for TestPatternSource {
    fn is_opened(&self) -> bool {
        self.opened
    }

    fn read(&mut self) -> Option<Frame> {
        if !self.opened {
            return None;
        }
        let shift = (self.tick % 256) as u32;
        self.tick += 1;
        let mut data =
            Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                data.push(((x + shift) % 256) as u8);
                data.push(((y + shift) % 256) as u8);
                data.push(((x + y) % 256) as u8);
            }
        }
        Some(Frame::with_timestamp(
            data,
            self.width,
            self.height,
            PixelFormat::Rgb8,
            self.started.elapsed().as_millis() as u64,
        ))
    }

    fn release(&mut self) {
        self.opened = false;
    }
}
