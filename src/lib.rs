//! # frameconn
//!
//! Delimiter-based message framing over any async byte stream.
//!
//! This crate turns an unbounded, unframed stream of bytes into a sequence
//! of discrete messages ("frames") separated by a single sentinel byte. It
//! is the thinnest possible message-boundary layer: higher-level protocol
//! code exchanges whole frames without handling stream buffering, partial
//! reads, or write atomicity itself.
//!
//! ## Architecture
//!
//! ```text
//! write_frame(payload) ─► BufWriter ─► payload + delimiter ─► stream
//! read_frame()         ◄─ BufReader ◄─ bytes until delimiter ◄─ stream
//! ```
//!
//! Reads are serialized against reads and writes against writes, while a
//! read and a write proceed concurrently on the two halves of the stream.
//! Frame contents are opaque: no length prefix, no checksum, no escaping of
//! the delimiter byte.
//!
//! ## Example
//!
//! ```ignore
//! use frameconn::FrameConn;
//!
//! #[tokio::main]
//! async fn main() -> frameconn::Result<()> {
//!     let stream = tokio::net::TcpStream::connect("127.0.0.1:9000").await?;
//!     let conn = FrameConn::new(b'\n', stream);
//!
//!     conn.write_frame(b"hello").await?;
//!     let reply = conn.read_frame().await?;
//!     println!("got {} bytes", reply.len());
//!
//!     conn.close().await
//! }
//! ```

pub mod conn;
pub mod error;

pub use conn::FrameConn;
pub use error::{FrameError, ReadError, Result};
