//! Webcam capture backend
//!
//! Real camera support via `nokhwa`, compiled in with the `camera-nokhwa`
//! feature. Frames are decoded to RGB before leaving this module so the
//! encoder never sees a backend-specific pixel layout.

use std::time::Instant;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;

use crate::capture::frame::{Frame, PixelFormat};
use crate::capture::source::CaptureSource;
use crate::error::{Error, Result};

/// Capture source backed by a physical camera
pub struct NokhwaSource {
    camera: Camera,
    started: Instant,
    opened: bool,
}

impl NokhwaSource {
    /// Open the camera at `device` and start streaming
    ///
    /// Requests the closest available MJPEG format to the given dimensions;
    /// the device may settle on different ones, which the produced frames
    /// report faithfully. Failure here is fatal to startup, the one error
    /// in the pipeline that does not degrade to the placeholder.
    pub fn open(device: u32, width: u32, height: u32) -> Result<Self> {
        let format = CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));
        let mut camera = Camera::new(CameraIndex::Index(device), requested)
            .map_err(|e| Error::Camera(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| Error::Camera(e.to_string()))?;
        tracing::info!(
            device = device,
            format = %camera.camera_format(),
            "Camera stream opened"
        );
        Ok(Self {
            camera,
            started: Instant::now(),
            opened: true,
        })
    }
}

impl CaptureSource for NokhwaSource {
    fn is_opened(&self) -> bool {
        self.opened && self.camera.is_stream_open()
    }

    fn read(&mut self) -> Option<Frame> {
        let buffer = match self.camera.frame() {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::debug!(error = %e, "Camera read produced no frame");
                return None;
            }
        };
        let decoded = match buffer.decode_image::<RgbFormat>() {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(error = %e, "Camera frame decode failed");
                return None;
            }
        };
        let (width, height) = (decoded.width(), decoded.height());
        Some(Frame::with_timestamp(
            decoded.into_raw(),
            width,
            height,
            PixelFormat::Rgb8,
            self.started.elapsed().as_millis() as u64,
        ))
    }

    fn release(&mut self) {
        if !self.opened {
            return;
        }
        self.opened = false;
        if let Err(e) = self.camera.stop_stream() {
            tracing::warn!(error = %e, "Camera stream did not stop cleanly");
        }
    }
}
