//! Error types for frameconn.

use std::io;

use bytes::Bytes;
use thiserror::Error;

/// Main error type for all frame connection operations.
#[derive(Debug, Error)]
pub enum FrameError {
    /// I/O error while writing, flushing, or shutting down the underlying
    /// stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A frame read failed before a delimiter arrived.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Operation attempted after the connection was closed.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Error returned when a read fails or the stream ends mid-frame.
///
/// Carries the bytes accumulated before the failure. The partial data has no
/// terminating delimiter and must not be treated as a valid frame; it is
/// exposed so callers can log or inspect it before discarding.
#[derive(Debug, Error)]
#[error("frame read failed with {} undelimited byte(s) buffered: {source}", partial.len())]
pub struct ReadError {
    /// Bytes received before the failure, delimiter not included.
    pub partial: Bytes,
    /// The underlying I/O failure. End-of-stream surfaces as
    /// [`io::ErrorKind::UnexpectedEof`].
    #[source]
    pub source: io::Error,
}

impl ReadError {
    /// True when the stream ended before a delimiter arrived.
    pub fn is_eof(&self) -> bool {
        self.source.kind() == io::ErrorKind::UnexpectedEof
    }
}

/// Result type alias using FrameError.
pub type Result<T> = std::result::Result<T, FrameError>;
