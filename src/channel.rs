//! Message channel - blocking read/write of whole logical messages.
//!
//! [`MessageChannel`] is the convenience layer most callers want: it
//! pairs one [`MessageReader`] and one [`MessageWriter`] over a single
//! [`ByteChannel`] and exposes message-at-a-time operations. One
//! instance per connection, driven by one thread; callers needing
//! concurrent access provide their own synchronization.
//!
//! # Example
//!
//! ```no_run
//! use thermo_ipc::{MessageChannel, MessageLimits};
//! use thermo_ipc::transport::TcpChannel;
//!
//! # fn main() -> thermo_ipc::Result<()> {
//! let socket = TcpChannel::connect("127.0.0.1:9001")?;
//! let mut channel = MessageChannel::new(socket, MessageLimits::default());
//!
//! channel.write_message(b"ping")?;
//! while let Some(message) = channel.read_message()? {
//!     println!("got {} bytes", message.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::mpsc;

use bytes::Bytes;
use tracing::debug;

use crate::error::Result;
use crate::protocol::{MessageLimits, MessageReader, MessageWriter};
use crate::transport::ByteChannel;

/// Size of the scratch buffer for channel reads.
const READ_BUFFER_SIZE: usize = 4096;

type Callback = Box<dyn FnMut(Bytes) + Send>;

/// Whole-message framing over a [`ByteChannel`].
pub struct MessageChannel<C: ByteChannel> {
    channel: C,
    writer: MessageWriter,
    reader: MessageReader<Callback>,
    /// Messages reassembled but not yet handed to the caller; one
    /// channel read can complete several.
    inbox: mpsc::Receiver<Bytes>,
    scratch: Vec<u8>,
}

impl<C: ByteChannel> MessageChannel<C> {
    /// Wrap a connected channel, enforcing `limits` in both directions.
    pub fn new(channel: C, limits: MessageLimits) -> Self {
        let (tx, inbox) = mpsc::channel();
        let reader = MessageReader::new(
            limits,
            Box::new(move |message| {
                let _ = tx.send(message);
            }) as Callback,
        );
        Self {
            channel,
            writer: MessageWriter::new(limits),
            reader,
            inbox,
            scratch: vec![0u8; READ_BUFFER_SIZE],
        }
    }

    /// Read the next logical message, blocking until it is complete.
    ///
    /// Returns `Ok(None)` when the peer closes the stream cleanly at a
    /// message boundary. EOF mid-header, mid-payload, or mid-chain is a
    /// [`TruncatedMessage`](crate::IpcError::TruncatedMessage) error, as
    /// is any protocol violation from the underlying reader.
    pub fn read_message(&mut self) -> Result<Option<Bytes>> {
        loop {
            if let Ok(message) = self.inbox.try_recv() {
                return Ok(Some(message));
            }
            let n = self.channel.read(&mut self.scratch)?;
            if n == 0 {
                debug!("peer closed message channel");
                self.reader.finish()?;
                return Ok(None);
            }
            self.reader.process_data(&self.scratch[..n])?;
        }
    }

    /// Frame and send one logical message.
    pub fn write_message(&mut self, payload: &[u8]) -> Result<()> {
        self.writer.write_message(&mut self.channel, payload)
    }

    /// Send a bare minimal header (handshake/ping frame).
    pub fn write_minimal(&mut self) -> Result<()> {
        self.writer.write_minimal(&mut self.channel)
    }

    /// Whether the underlying channel is still usable.
    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    /// Close the underlying channel, abandoning any partial reassembly.
    pub fn close(&mut self) -> Result<()> {
        self.channel.close()?;
        Ok(())
    }

    /// Consume the wrapper and return the underlying channel.
    pub fn into_inner(self) -> C {
        self.channel
    }
}
