//! Transport module - the byte-channel abstraction and socket impls.
//!
//! [`ByteChannel`] is the only surface the protocol core touches: a
//! synchronous, unbuffered byte stream primitive. No framing lives
//! here, so readers and writers can be tested against an in-memory
//! fake without real sockets.

mod socket;

pub use socket::TcpChannel;
#[cfg(unix)]
pub use socket::UnixChannel;

use std::io;

/// A synchronous bidirectional byte stream.
///
/// `read` follows the [`std::io::Read`] convention: `Ok(0)` means end
/// of stream. `write` may accept fewer bytes than offered; callers that
/// need full delivery loop (see the partial-write handling in
/// [`MessageWriter`](crate::protocol::MessageWriter)).
pub trait ByteChannel {
    /// Read available bytes into `buf`, blocking until at least one
    /// byte arrives or the stream ends. Returns the byte count, 0 on EOF.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write bytes from `buf`, returning how many were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Whether the channel is still usable.
    fn is_open(&self) -> bool;

    /// Close the channel. Any in-progress reassembly on the peer is
    /// abandoned.
    fn close(&mut self) -> io::Result<()>;
}
