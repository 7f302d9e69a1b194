//! Error types for thermo-ipc.

use thiserror::Error;

/// Main error type for all protocol and transport operations.
#[derive(Debug, Error)]
pub enum IpcError {
    /// I/O error from the underlying byte channel.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed frame header (bad magic, non-positive version,
    /// non-positive size, or truncated fields).
    #[error("malformed header: {0}")]
    MalformedHeader(&'static str),

    /// A configured size ceiling was exceeded.
    #[error("{what} of {actual} bytes exceeds maximum of {max} bytes")]
    LimitExceeded {
        /// Which quantity blew the limit.
        what: &'static str,
        /// Observed size.
        actual: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// The stream ended mid-header, mid-payload, or mid-chain.
    #[error("stream ended before message was complete")]
    TruncatedMessage,

    /// Empty payloads cannot be framed; a part's message size must be
    /// positive on the wire.
    #[error("cannot write an empty message")]
    EmptyMessage,

    /// The reader hit a fatal error earlier and rejects further input.
    #[error("reader state corrupted by previous fatal error")]
    ReaderPoisoned,
}

/// Result type alias using IpcError.
pub type Result<T> = std::result::Result<T, IpcError>;
