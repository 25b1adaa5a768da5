//! Raw frame types
//!
//! This module defines the in-memory raster frame handed from a capture
//! source to the encoder. The frame owns its pixel buffer exclusively; the
//! encoder consumes it and produces an independent byte buffer, so no pixel
//! data is shared or mutated after handoff.

/// Pixel layout of a raw frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGB, 3 bytes per pixel, row-major
    Rgb8,
    /// 8-bit grayscale, 1 byte per pixel, row-major
    Luma8,
}

impl PixelFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Luma8 => 1,
        }
    }
}

/// A single uncompressed frame read from a capture source
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data, `width * height * bytes_per_pixel` bytes
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel layout of `data`
    pub format: PixelFormat,
    /// Capture timestamp in milliseconds since an arbitrary epoch
    pub timestamp_ms: u64,
}

impl Frame {
    /// Create a frame from raw pixel data
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
            timestamp_ms: 0,
        }
    }

    /// Create a frame carrying a capture timestamp
    pub fn with_timestamp(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            data,
            width,
            height,
            format,
            timestamp_ms,
        }
    }

    /// Create an all-black RGB frame of the given dimensions
    pub fn black(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * PixelFormat::Rgb8.bytes_per_pixel();
        Self::new(vec![0u8; len], width, height, PixelFormat::Rgb8)
    }

    /// Whether the buffer length matches the declared dimensions and format
    ///
    /// The encoder rejects frames that fail this check instead of panicking
    /// on a short buffer.
    pub fn is_valid(&self) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let expected =
            self.width as usize * self.height as usize * self.format.bytes_per_pixel();
        self.data.len() == expected
    }
}
