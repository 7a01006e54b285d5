//! Delimiter-based frame connection.
//!
//! [`FrameConn`] wraps a bidirectional byte stream and exchanges discrete
//! messages ("frames") separated by a single sentinel byte. The read half is
//! wrapped in a `BufReader`, the write half in a `BufWriter`, and each half
//! sits behind its own mutex: reads are serialized against reads, writes
//! against writes, and a read and a write proceed concurrently.
//!
//! # Example
//!
//! ```ignore
//! use frameconn::FrameConn;
//!
//! let stream = tokio::net::UnixStream::connect("/tmp/app.sock").await?;
//! let conn = FrameConn::new(b'\n', stream);
//!
//! conn.write_frame(b"hello").await?;
//! let reply = conn.read_frame().await?;
//! ```

use std::io;

use bytes::Bytes;
use tokio::io::{
    split, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, ReadHalf,
    WriteHalf,
};
use tokio::sync::{watch, Mutex};

use crate::error::{FrameError, ReadError, Result};

/// A framed view over a byte stream, delimited by a single sentinel byte.
///
/// The wire format is `payload + delimiter`, repeated. There is no length
/// prefix, no checksum, and no escaping: payloads handed to
/// [`write_frame`](Self::write_frame) must not contain the delimiter byte,
/// or framing for subsequent reads is silently corrupted.
pub struct FrameConn<S> {
    delimiter: u8,
    reader: Mutex<BufReader<ReadHalf<S>>>,
    writer: Mutex<BufWriter<WriteHalf<S>>>,
    // Close signal: flips to true exactly once. Every operation races its
    // I/O against this channel so close() reaches in-flight calls too.
    closed: watch::Sender<bool>,
}

impl<S> FrameConn<S>
where
    S: AsyncRead + AsyncWrite,
{
    /// Wrap an already-open stream in a frame connection.
    ///
    /// Performs no I/O. The stream is split into its read and write halves;
    /// the connection owns both from here on (see
    /// [`into_inner`](Self::into_inner) to get the stream back).
    pub fn new(delimiter: u8, stream: S) -> Self {
        let (read_half, write_half) = split(stream);
        let (closed, _) = watch::channel(false);
        Self {
            delimiter,
            reader: Mutex::new(BufReader::new(read_half)),
            writer: Mutex::new(BufWriter::new(write_half)),
            closed,
        }
    }

    /// Read the next frame, resolving once a full delimited message arrived.
    ///
    /// Keeps pulling bytes from the stream until a delimiter byte is seen.
    /// The returned frame excludes the delimiter; bytes beyond it stay
    /// buffered for the next call.
    ///
    /// On an I/O error or end-of-stream before a delimiter, the bytes
    /// accumulated so far travel with the error as [`ReadError::partial`].
    /// They are not a valid frame and must be discarded; consumed bytes are
    /// not replayable.
    ///
    /// Concurrent `read_frame` calls are serialized; writes are unaffected.
    /// A call blocked mid-frame is unblocked by [`close`](Self::close) and
    /// fails with [`FrameError::ConnectionClosed`].
    pub async fn read_frame(&self) -> Result<Bytes> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow() {
            return Err(FrameError::ConnectionClosed);
        }

        let mut reader = self.reader.lock().await;
        let mut buf = Vec::new();

        let result = tokio::select! {
            res = Self::read_until_delimiter(&mut *reader, self.delimiter, &mut buf) => res,
            _ = closed.wait_for(|closed| *closed) => {
                return Err(FrameError::ConnectionClosed);
            }
        };

        match result {
            Ok(()) => Ok(Bytes::from(buf)),
            Err(source) => Err(ReadError {
                partial: Bytes::from(buf),
                source,
            }
            .into()),
        }
    }

    /// Pull bytes from the stream until a delimiter lands in `buf`, then
    /// strip it. Loops on "no delimiter found yet": `read_until` appends
    /// everything it consumed, so partial progress accumulates across
    /// iterations and survives cancellation.
    async fn read_until_delimiter(
        reader: &mut BufReader<ReadHalf<S>>,
        delimiter: u8,
        buf: &mut Vec<u8>,
    ) -> io::Result<()> {
        loop {
            match reader.read_until(delimiter, buf).await? {
                // Stream ended before a delimiter arrived.
                0 => return Err(io::ErrorKind::UnexpectedEof.into()),
                _ => {
                    if buf.last() == Some(&delimiter) {
                        buf.pop();
                        return Ok(());
                    }
                    // Bytes arrived but the stream hit EOF mid-frame; the
                    // next iteration reports it, partials staying in buf.
                }
            }
        }
    }

    /// Write one frame: the payload followed by exactly one delimiter byte,
    /// flushed to the stream before returning.
    ///
    /// On success the complete framed message has been handed to the
    /// stream's write path (handed off, not peer-acknowledged). If appending
    /// the payload fails, no delimiter is written and nothing is flushed.
    /// A flush failure is propagated; after any write error the framing
    /// state of the connection is undefined and it should be closed.
    ///
    /// The payload must not contain the delimiter byte. No validation is
    /// performed; a delimiter inside the payload corrupts every subsequent
    /// frame on the receiving side.
    ///
    /// Concurrent `write_frame` calls are serialized, so two frames can
    /// never interleave their bytes on the wire. Reads are unaffected.
    /// A call stalled on peer backpressure is unblocked by
    /// [`close`](Self::close) and fails with
    /// [`FrameError::ConnectionClosed`].
    pub async fn write_frame(&self, payload: &[u8]) -> Result<()> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow() {
            return Err(FrameError::ConnectionClosed);
        }

        let mut writer = self.writer.lock().await;
        tokio::select! {
            res = async {
                writer.write_all(payload).await?;
                writer.write_u8(self.delimiter).await?;
                writer.flush().await
            } => {
                res?;
                Ok(())
            }
            _ = closed.wait_for(|closed| *closed) => Err(FrameError::ConnectionClosed),
        }
    }

    /// Close the connection.
    ///
    /// Fires the close signal before touching any lock, so in-flight
    /// `read_frame`/`write_frame` calls (including one blocked mid-frame or
    /// stalled on peer backpressure) unblock and fail with
    /// [`FrameError::ConnectionClosed`], as do all subsequent calls. The
    /// underlying write half is then shut down without flushing
    /// buffered-but-unwritten bytes (`write_frame` flushes on every call, so
    /// the buffer is only non-empty after a prior write error); the peer
    /// observes end-of-stream. Closing an already-closed connection is a
    /// no-op. The read half is released when the `FrameConn` is dropped.
    pub async fn close(&self) -> Result<()> {
        if self.closed.send_replace(true) {
            return Ok(());
        }

        // Any in-flight writer has aborted on the signal by the time this
        // lock is granted, so close() cannot hang behind a stalled write.
        let mut writer = self.writer.lock().await;
        // get_mut bypasses the BufWriter so its buffer is not flushed.
        writer.get_mut().shutdown().await?;
        Ok(())
    }

    /// The delimiter byte this connection frames with.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Consume the connection and return the underlying stream.
    ///
    /// Use this to inspect addressing or set deadlines on the raw stream.
    /// Taking ownership is deliberate: reading or writing the raw stream
    /// while the framed connection is live would desynchronize its buffers.
    /// Bytes buffered in either direction are discarded.
    pub fn into_inner(self) -> S
    where
        S: Unpin,
    {
        let read_half = self.reader.into_inner().into_inner();
        let write_half = self.writer.into_inner().into_inner();
        read_half.unsplit(write_half)
    }
}
