//! Part-splitting message writer.
//!
//! [`MessageWriter`] frames one logical message into one or more wire
//! parts, each at most `max_message_part_size` bytes of payload. Every
//! part but the last sets the header's `more_data` flag so the peer's
//! reader knows to keep accumulating.
//!
//! Short writes from the channel are expected and retried; a write
//! failure propagates immediately with no internal retry, leaving
//! recovery to the caller.

use tracing::trace;

use super::limits::MessageLimits;
use super::wire_format::Header;
use crate::error::{IpcError, Result};
use crate::transport::ByteChannel;

/// Frames outbound messages within the configured limits.
///
/// Holds no connection state of its own; the channel is borrowed per
/// call so it can be shared with the read side of the connection.
#[derive(Debug, Clone, Copy)]
pub struct MessageWriter {
    limits: MessageLimits,
}

impl MessageWriter {
    /// Create a writer enforcing `limits`.
    pub fn new(limits: MessageLimits) -> Self {
        Self { limits }
    }

    /// Frame and send one logical message.
    ///
    /// Fails before writing anything if the payload is empty or exceeds
    /// `max_message_size`. On success the peer's reader reassembles
    /// exactly `payload`, from the minimum number of parts the part
    /// size limit allows.
    pub fn write_message<C: ByteChannel>(&self, channel: &mut C, payload: &[u8]) -> Result<()> {
        if payload.is_empty() {
            return Err(IpcError::EmptyMessage);
        }
        if payload.len() > self.limits.max_message_size {
            return Err(IpcError::LimitExceeded {
                what: "message size",
                actual: payload.len(),
                max: self.limits.max_message_size,
            });
        }
        // The wire encodes part sizes as i32.
        let part_size = self.limits.max_message_part_size.min(i32::MAX as usize);
        if part_size == 0 {
            return Err(IpcError::LimitExceeded {
                what: "message part size",
                actual: payload.len(),
                max: 0,
            });
        }

        let mut remaining = payload;
        while !remaining.is_empty() {
            let take = remaining.len().min(part_size);
            let (chunk, rest) = remaining.split_at(take);
            let more_data = !rest.is_empty();

            let header = Header::full(take as u32, more_data);
            trace!(message_size = take, more_data, "write part header");
            write_all(channel, &header.encode())?;
            write_all(channel, chunk)?;

            remaining = rest;
        }
        Ok(())
    }

    /// Send a bare minimal header (a handshake/ping frame, no payload).
    pub fn write_minimal<C: ByteChannel>(&self, channel: &mut C) -> Result<()> {
        trace!("write minimal header");
        write_all(channel, &Header::minimal().encode())
    }

    /// The limits this writer enforces.
    pub fn limits(&self) -> &MessageLimits {
        &self.limits
    }
}

/// Write the whole of `buf`, looping over short writes.
fn write_all<C: ByteChannel>(channel: &mut C, mut buf: &[u8]) -> Result<()> {
    while !buf.is_empty() {
        let written = channel.write(buf)?;
        if written == 0 {
            return Err(IpcError::Io(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "channel accepted 0 bytes",
            )));
        }
        buf = &buf[written..];
    }
    Ok(())
}
