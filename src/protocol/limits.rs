//! Size limits enforced by reader and writer.

use serde::{Deserialize, Serialize};

/// Default maximum header size (1 KiB).
pub const DEFAULT_MAX_HEADER_SIZE: usize = 1024;

/// Default maximum per-part payload size (8 KiB).
pub const DEFAULT_MAX_MESSAGE_PART_SIZE: usize = 8192;

/// Default maximum reassembled message size (1 MiB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Caller-supplied size ceilings, read by both reader and writer.
///
/// Immutable once constructed. The two peers of a connection must be
/// configured compatibly out-of-band; nothing on the wire negotiates
/// limits. Derives serde traits so deployments can load limits from
/// agent configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageLimits {
    /// Maximum byte length of a single part header.
    pub max_header_size: usize,
    /// Maximum payload byte length of a single part.
    pub max_message_part_size: usize,
    /// Maximum byte length of one logical message, cumulative across
    /// all chained parts.
    pub max_message_size: usize,
}

impl MessageLimits {
    /// Create limits with explicit ceilings.
    pub fn new(
        max_header_size: usize,
        max_message_part_size: usize,
        max_message_size: usize,
    ) -> Self {
        Self {
            max_header_size,
            max_message_part_size,
            max_message_size,
        }
    }
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            max_header_size: DEFAULT_MAX_HEADER_SIZE,
            max_message_part_size: DEFAULT_MAX_MESSAGE_PART_SIZE,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
