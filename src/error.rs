//! Crate error types
//!
//! Errors surfaced by the frame pipeline. Transient "no data" conditions
//! (device not ready, serving inactive) are not errors; they resolve to the
//! placeholder image inside the pipeline. The variants here cover the cases
//! that callers can actually act on: startup failures and submissions to a
//! dispatcher that has already shut down.

/// Error type for frame server operations
#[derive(Debug)]
pub enum Error {
    /// I/O failure (listener bind, socket accept)
    Io(std::io::Error),
    /// Work was submitted after the offload pools began shutting down
    PoolClosed,
    /// Capture device could not be opened or configured
    Camera(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::PoolClosed => write!(f, "Offload pool is closed"),
            Error::Camera(msg) => write!(f, "Camera error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Result alias for frame server operations
pub type Result<T> = std::result::Result<T, Error>;
