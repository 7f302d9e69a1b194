//! Protocol module - wire format, limits, reader, and writer.
//!
//! This module implements the framed message protocol:
//! - fixed-format header encoding/decoding (two-phase)
//! - caller-supplied size limits
//! - incremental reader reassembling fragmented and chained parts
//! - writer splitting oversized payloads into chained parts

mod limits;
mod reader;
mod wire_format;
mod writer;

pub use limits::{
    MessageLimits, DEFAULT_MAX_HEADER_SIZE, DEFAULT_MAX_MESSAGE_PART_SIZE,
    DEFAULT_MAX_MESSAGE_SIZE,
};
pub use reader::{MessageReader, ReadState};
pub use wire_format::{
    Header, MinimalHeader, DEFAULT_HEADER_SIZE, DEFAULT_PROTOCOL_VERSION, MAGIC, MIN_HEADER_SIZE,
    V1_TRAILER_SIZE,
};
pub use writer::MessageWriter;
