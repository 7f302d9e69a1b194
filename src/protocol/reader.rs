//! Incremental message reader.
//!
//! [`MessageReader`] consumes arbitrarily fragmented byte chunks and
//! reassembles them into logical messages, invoking a caller-supplied
//! callback once per completed message. It never blocks waiting for
//! input: when the buffered bytes run out mid-header or mid-payload it
//! returns and picks up where it left off on the next
//! [`process_data`](MessageReader::process_data) call.
//!
//! A logical message may arrive as a chain of parts, each with its own
//! header; every part but the last sets the `more_data` flag. The reader
//! appends part payloads to an internal reassembly buffer and only fires
//! the callback when the chain terminates.
//!
//! Any malformed header or limit violation is fatal: the reader moves to
//! [`ReadState::Error`], drops all buffered data, and rejects further
//! input. Discard the instance and the connection with it.

use bytes::{Buf, Bytes, BytesMut};
use tracing::trace;

use super::limits::MessageLimits;
use super::wire_format::{Header, MinimalHeader, MIN_HEADER_SIZE};
use crate::error::{IpcError, Result};

/// Observable reader state, advanced by [`MessageReader::process_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    /// No header in progress; ready for a new part.
    NewMessage,
    /// Minimal header decoded; waiting for the rest of the header.
    MinHeaderRead,
    /// Full header decoded; waiting for the part payload.
    FullHeaderRead,
    /// A previous fatal error; all further input is rejected.
    Error,
}

/// Internal state, carrying the decoded header fields between calls.
#[derive(Debug, Clone, Copy)]
enum State {
    NewMessage,
    MinHeaderRead {
        min: MinimalHeader,
    },
    FullHeaderRead {
        message_size: usize,
        more_data: bool,
    },
    Error,
}

/// State machine reassembling framed parts into logical messages.
///
/// One instance per connection direction; not internally synchronized.
///
/// # Example
///
/// ```
/// use thermo_ipc::protocol::{Header, MessageLimits, MessageReader};
///
/// let mut wire = Header::full(5, false).encode();
/// wire.extend_from_slice(b"hello");
///
/// let mut got = Vec::new();
/// let mut reader = MessageReader::new(MessageLimits::default(), |msg| got.push(msg));
/// reader.process_data(&wire).unwrap();
/// drop(reader);
///
/// assert_eq!(got.len(), 1);
/// assert_eq!(&got[0][..], b"hello");
/// ```
pub struct MessageReader<F: FnMut(Bytes)> {
    /// Unconsumed input carried over between calls.
    buffer: BytesMut,
    /// Payloads of completed parts of the in-progress logical message.
    assembled: BytesMut,
    state: State,
    limits: MessageLimits,
    on_message: F,
}

impl<F: FnMut(Bytes)> MessageReader<F> {
    /// Create a reader with the given limits and completion callback.
    pub fn new(limits: MessageLimits, on_message: F) -> Self {
        Self {
            buffer: BytesMut::new(),
            assembled: BytesMut::new(),
            state: State::NewMessage,
            limits,
            on_message,
        }
    }

    /// Feed newly received bytes to the reader.
    ///
    /// Parses as many parts and messages as `data` (plus carried-over
    /// bytes) allows, firing the callback once per completed logical
    /// message, in order. Returns without error when input is exhausted
    /// mid-header or mid-payload.
    ///
    /// # Errors
    ///
    /// Malformed headers and limit violations are fatal: buffered data
    /// is discarded, the reader enters [`ReadState::Error`], and every
    /// later call fails with [`IpcError::ReaderPoisoned`].
    pub fn process_data(&mut self, data: &[u8]) -> Result<()> {
        if let State::Error = self.state {
            return Err(IpcError::ReaderPoisoned);
        }
        self.buffer.extend_from_slice(data);

        match self.drain() {
            Ok(()) => Ok(()),
            Err(e) => {
                // Fatal: discard partial state to bound memory and stop
                // this reader from processing more data.
                self.state = State::Error;
                self.buffer.clear();
                self.assembled.clear();
                Err(e)
            }
        }
    }

    fn drain(&mut self) -> Result<()> {
        loop {
            match self.state {
                State::NewMessage => {
                    if self.buffer.len() < MIN_HEADER_SIZE {
                        return Ok(());
                    }
                    let min = MinimalHeader::decode(&self.buffer[..MIN_HEADER_SIZE])?;
                    if min.header_size as usize > self.limits.max_header_size {
                        return Err(IpcError::LimitExceeded {
                            what: "header size",
                            actual: min.header_size as usize,
                            max: self.limits.max_header_size,
                        });
                    }
                    self.buffer.advance(MIN_HEADER_SIZE);
                    if min.trailer_len() == 0 {
                        // Bare minimal header: handshake/ping frame with
                        // no payload. Does not disturb an in-progress chain.
                        trace!(version = min.version, "read minimal header");
                        continue;
                    }
                    self.state = State::MinHeaderRead { min };
                }
                State::MinHeaderRead { min } => {
                    let trailer_len = min.trailer_len();
                    if self.buffer.len() < trailer_len {
                        return Ok(());
                    }
                    let Header::Full {
                        message_size,
                        more_data,
                        ..
                    } = min.decode_trailer(&self.buffer[..trailer_len])?
                    else {
                        return Err(IpcError::MalformedHeader("missing trailer"));
                    };
                    self.buffer.advance(trailer_len);

                    let message_size = message_size as usize;
                    trace!(
                        version = min.version,
                        message_size,
                        more_data,
                        "read part header"
                    );
                    if message_size > self.limits.max_message_part_size {
                        return Err(IpcError::LimitExceeded {
                            what: "message part size",
                            actual: message_size,
                            max: self.limits.max_message_part_size,
                        });
                    }
                    // Cumulative across all chained parts, checked before
                    // the part payload is buffered.
                    let total = self.assembled.len() + message_size;
                    if total > self.limits.max_message_size {
                        return Err(IpcError::LimitExceeded {
                            what: "message size",
                            actual: total,
                            max: self.limits.max_message_size,
                        });
                    }
                    self.state = State::FullHeaderRead {
                        message_size,
                        more_data,
                    };
                }
                State::FullHeaderRead {
                    message_size,
                    more_data,
                } => {
                    if self.buffer.len() < message_size {
                        return Ok(());
                    }
                    if !more_data && self.assembled.is_empty() {
                        // Single-part shortcut: hand the payload over
                        // without copying through the reassembly buffer.
                        let message = self.buffer.split_to(message_size).freeze();
                        self.state = State::NewMessage;
                        (self.on_message)(message);
                    } else {
                        let part = self.buffer.split_to(message_size);
                        self.assembled.extend_from_slice(&part);
                        self.state = State::NewMessage;
                        if !more_data {
                            let message = self.assembled.split().freeze();
                            (self.on_message)(message);
                        }
                    }
                }
                State::Error => return Err(IpcError::ReaderPoisoned),
            }
        }
    }

    /// EOF hook: verify the stream ended at a logical message boundary.
    ///
    /// An error means the peer closed mid-header, mid-payload, or with
    /// an unterminated `more_data` chain; buffered partial data is
    /// unrecoverable.
    pub fn finish(&self) -> Result<()> {
        match self.state {
            State::Error => Err(IpcError::ReaderPoisoned),
            State::NewMessage if self.buffer.is_empty() && self.assembled.is_empty() => Ok(()),
            _ => Err(IpcError::TruncatedMessage),
        }
    }

    /// Current state, for tests and diagnostics.
    pub fn state(&self) -> ReadState {
        match self.state {
            State::NewMessage => ReadState::NewMessage,
            State::MinHeaderRead { .. } => ReadState::MinHeaderRead,
            State::FullHeaderRead { .. } => ReadState::FullHeaderRead,
            State::Error => ReadState::Error,
        }
    }

    /// The limits this reader enforces.
    pub fn limits(&self) -> &MessageLimits {
        &self.limits
    }
}
