//! # thermo-ipc
//!
//! Framed binary IPC transport for agent-side backends.
//!
//! Logical messages travel as one or more length-prefixed parts, each
//! introduced by a fixed-format header (magic, protocol version, header
//! size, message size, more-data flag). The crate provides:
//!
//! - **Header codec** - two-phase encode/decode of the part header
//! - **Incremental reader** - a state machine reassembling arbitrarily
//!   fragmented input into logical messages without blocking
//! - **Writer** - splits oversized payloads into chained parts and
//!   tolerates short writes
//! - **Limits** - caller-supplied ceilings on header, part, and total
//!   message size, enforced on both sides
//! - **Byte channel** - a minimal synchronous transport abstraction,
//!   with TCP and Unix socket impls and trivially fakeable for tests
//!
//! Payloads are opaque byte sequences; content semantics, channel
//! authentication, and connection management belong to the caller.
//!
//! ## Example
//!
//! ```
//! use thermo_ipc::{MessageLimits, MessageReader, Header};
//!
//! // Writer side produced: header (17 bytes) + payload
//! let mut wire = Header::full(5, false).encode();
//! wire.extend_from_slice(b"hello");
//!
//! // Reader side reassembles, however the bytes were fragmented
//! let mut got = Vec::new();
//! let mut reader = MessageReader::new(MessageLimits::default(), |m| got.push(m));
//! reader.process_data(&wire[..9]).unwrap();
//! reader.process_data(&wire[9..]).unwrap();
//! drop(reader);
//!
//! assert_eq!(&got[0][..], b"hello");
//! ```

pub mod channel;
pub mod error;
pub mod protocol;
pub mod transport;

pub use channel::MessageChannel;
pub use error::{IpcError, Result};
pub use protocol::{Header, MessageLimits, MessageReader, MessageWriter, ReadState};
