//! Wire format encoding and decoding.
//!
//! Every message part on the wire starts with a header:
//! ```text
//! ┌─────────┬──────────┬────────────┬─────────────┬──────────┐
//! │ Magic   │ Version  │ Header size│ Message size│ More data│
//! │ 4 bytes │ 4 bytes  │ 4 bytes    │ 4 bytes     │ 1 byte   │
//! │ "THER"  │ int32 BE │ int32 BE   │ int32 BE    │ 0 or 1   │
//! └─────────┴──────────┴────────────┴─────────────┴──────────┘
//!            ◄──── minimal header ────►◄─── v1 trailer ───►
//! ```
//!
//! All multi-byte integers are signed 32-bit Big Endian; non-positive
//! values are invalid everywhere they appear. The first 12 bytes are
//! self-describing: `header_size` tells the receiver how many bytes the
//! whole header occupies, so the trailer can be decoded in a second
//! phase once that many bytes have arrived. A header of exactly 12
//! bytes carries no trailer and no payload (handshake/ping frames).

use crate::error::{IpcError, Result};

/// Magic marker opening every header.
pub const MAGIC: [u8; 4] = *b"THER";

/// Size of the minimal, self-describing header prefix
/// (magic + version + header size).
pub const MIN_HEADER_SIZE: usize = 12;

/// Size of the version-1 trailer (message size + more-data flag).
pub const V1_TRAILER_SIZE: usize = 5;

/// Header size written for full headers (minimal prefix + v1 trailer).
pub const DEFAULT_HEADER_SIZE: usize = MIN_HEADER_SIZE + V1_TRAILER_SIZE;

/// Protocol version written by this crate.
pub const DEFAULT_PROTOCOL_VERSION: u32 = 1;

/// The minimal header prefix, decoded from the first 12 bytes of a part.
///
/// This is phase one of the two-phase decode: once `header_size` total
/// bytes are available, [`MinimalHeader::decode_trailer`] upgrades it to
/// a [`Header::Full`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimalHeader {
    /// Protocol version (always > 0).
    pub version: u32,
    /// Total byte length of the header, including these 12 bytes.
    pub header_size: u32,
}

impl MinimalHeader {
    /// Decode the minimal prefix from the first 12 bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use thermo_ipc::protocol::{Header, MinimalHeader};
    ///
    /// let bytes = Header::full(5, false).encode();
    /// let min = MinimalHeader::decode(&bytes[..12]).unwrap();
    /// assert_eq!(min.version, 1);
    /// assert_eq!(min.header_size, 17);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < MIN_HEADER_SIZE {
            return Err(IpcError::MalformedHeader("truncated minimal header"));
        }
        if buf[0..4] != MAGIC {
            return Err(IpcError::MalformedHeader("bad magic"));
        }
        let version = read_positive_i32(&buf[4..8], "bad protocol version")?;
        let header_size = read_positive_i32(&buf[8..12], "bad header size")?;
        if (header_size as usize) < MIN_HEADER_SIZE {
            return Err(IpcError::MalformedHeader("bad header size"));
        }
        Ok(Self {
            version,
            header_size,
        })
    }

    /// Number of header bytes remaining after the minimal prefix.
    #[inline]
    pub fn trailer_len(&self) -> usize {
        self.header_size as usize - MIN_HEADER_SIZE
    }

    /// Phase two: decode the version-specific trailer.
    ///
    /// `buf` holds the header bytes following the minimal prefix
    /// (`trailer_len()` of them); any bytes beyond the known trailer
    /// fields are ignored for forward compatibility.
    pub fn decode_trailer(self, buf: &[u8]) -> Result<Header> {
        if buf.len() < V1_TRAILER_SIZE {
            return Err(IpcError::MalformedHeader("truncated trailer"));
        }
        let message_size = read_positive_i32(&buf[0..4], "bad message size")?;
        let more_data = buf[4] != 0;
        Ok(Header::Full {
            version: self.version,
            header_size: self.header_size,
            message_size,
            more_data,
        })
    }
}

/// A fully decoded (or to-be-encoded) part header.
///
/// The two variants make the decode phase explicit instead of signalling
/// "trailer not present" with sentinel values: `Minimal` is a bare
/// 12-byte header with no payload, `Full` describes one payload part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    /// Minimal header only; no trailer, no payload.
    Minimal(MinimalHeader),
    /// Minimal prefix plus the version-1 trailer.
    Full {
        /// Protocol version (always > 0).
        version: u32,
        /// Total header length in bytes.
        header_size: u32,
        /// Byte length of this part's payload (always > 0).
        message_size: u32,
        /// True if another part of the same logical message follows.
        more_data: bool,
    },
}

impl Header {
    /// A bare minimal header (handshake/ping frame).
    pub fn minimal() -> Self {
        Header::Minimal(MinimalHeader {
            version: DEFAULT_PROTOCOL_VERSION,
            header_size: MIN_HEADER_SIZE as u32,
        })
    }

    /// A full header for one payload part, using the default version
    /// and header size.
    pub fn full(message_size: u32, more_data: bool) -> Self {
        Header::Full {
            version: DEFAULT_PROTOCOL_VERSION,
            header_size: DEFAULT_HEADER_SIZE as u32,
            message_size,
            more_data,
        }
    }

    /// Protocol version.
    #[inline]
    pub fn version(&self) -> u32 {
        match *self {
            Header::Minimal(min) => min.version,
            Header::Full { version, .. } => version,
        }
    }

    /// Total header length in bytes.
    #[inline]
    pub fn header_size(&self) -> usize {
        match *self {
            Header::Minimal(min) => min.header_size as usize,
            Header::Full { header_size, .. } => header_size as usize,
        }
    }

    /// Payload length of the part this header describes, if any.
    #[inline]
    pub fn message_size(&self) -> Option<usize> {
        match *self {
            Header::Minimal(_) => None,
            Header::Full { message_size, .. } => Some(message_size as usize),
        }
    }

    /// True if another part of the same logical message follows.
    #[inline]
    pub fn more_data(&self) -> bool {
        match *self {
            Header::Minimal(_) => false,
            Header::Full { more_data, .. } => more_data,
        }
    }

    /// Encode to bytes (Big Endian), exactly `header_size()` long.
    ///
    /// # Example
    ///
    /// ```
    /// use thermo_ipc::protocol::Header;
    ///
    /// assert_eq!(Header::minimal().encode().len(), 12);
    /// assert_eq!(Header::full(5, false).encode().len(), 17);
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.header_size());
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&(self.version() as i32).to_be_bytes());
        buf.extend_from_slice(&(self.header_size() as i32).to_be_bytes());
        if let Header::Full {
            message_size,
            more_data,
            ..
        } = *self
        {
            buf.extend_from_slice(&(message_size as i32).to_be_bytes());
            buf.push(more_data as u8);
        }
        buf
    }
}

fn read_positive_i32(buf: &[u8], what: &'static str) -> Result<u32> {
    let value = i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if value <= 0 {
        return Err(IpcError::MalformedHeader(what));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_header(version: i32, header_size: i32, message_size: i32, more_data: bool) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.extend_from_slice(&version.to_be_bytes());
        buf.extend_from_slice(&header_size.to_be_bytes());
        buf.extend_from_slice(&message_size.to_be_bytes());
        buf.push(more_data as u8);
        buf
    }

    #[test]
    fn test_minimal_header_encode() {
        let bytes = Header::minimal().encode();
        assert_eq!(bytes.len(), MIN_HEADER_SIZE);
        assert_eq!(&bytes[0..4], b"THER");
        assert_eq!(&bytes[4..8], &1i32.to_be_bytes());
        assert_eq!(&bytes[8..12], &12i32.to_be_bytes());
    }

    #[test]
    fn test_full_header_encode() {
        let bytes = Header::full(8000, true).encode();
        assert_eq!(bytes, raw_header(1, 17, 8000, true));
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let header = Header::full(50, true);
        let bytes = header.encode();

        let min = MinimalHeader::decode(&bytes[..MIN_HEADER_SIZE]).unwrap();
        assert_eq!(min.version, 1);
        assert_eq!(min.trailer_len(), V1_TRAILER_SIZE);

        let decoded = min.decode_trailer(&bytes[MIN_HEADER_SIZE..]).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.message_size(), Some(50));
        assert!(decoded.more_data());
    }

    #[test]
    fn test_decode_short_buffer() {
        let result = MinimalHeader::decode(b"THE");
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("truncated minimal header"))
        ));
    }

    #[test]
    fn test_decode_bad_magic() {
        let mut bytes = raw_header(1, 17, 5, false);
        bytes[0] = b'X';
        let result = MinimalHeader::decode(&bytes);
        assert!(matches!(result, Err(IpcError::MalformedHeader("bad magic"))));
    }

    #[test]
    fn test_decode_zero_version() {
        let bytes = raw_header(0, 17, 5, false);
        let result = MinimalHeader::decode(&bytes);
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("bad protocol version"))
        ));
    }

    #[test]
    fn test_decode_negative_version() {
        let bytes = raw_header(-4, 17, 5, false);
        let result = MinimalHeader::decode(&bytes);
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("bad protocol version"))
        ));
    }

    #[test]
    fn test_decode_zero_header_size() {
        let bytes = raw_header(5, 0, 5, false);
        let result = MinimalHeader::decode(&bytes);
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("bad header size"))
        ));
    }

    #[test]
    fn test_decode_negative_header_size() {
        let bytes = raw_header(5, -22, 5, false);
        let result = MinimalHeader::decode(&bytes);
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("bad header size"))
        ));
    }

    #[test]
    fn test_decode_header_size_below_minimum() {
        let bytes = raw_header(5, 8, 5, false);
        let result = MinimalHeader::decode(&bytes);
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("bad header size"))
        ));
    }

    #[test]
    fn test_decode_trailer_short() {
        let bytes = Header::full(20, true).encode();
        let min = MinimalHeader::decode(&bytes).unwrap();
        // One byte short of the full trailer
        let result = min.decode_trailer(&bytes[MIN_HEADER_SIZE..bytes.len() - 1]);
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("truncated trailer"))
        ));
    }

    #[test]
    fn test_decode_trailer_zero_message_size() {
        let bytes = raw_header(1, 17, 0, true);
        let min = MinimalHeader::decode(&bytes).unwrap();
        let result = min.decode_trailer(&bytes[MIN_HEADER_SIZE..]);
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("bad message size"))
        ));
    }

    #[test]
    fn test_decode_trailer_negative_message_size() {
        let bytes = raw_header(1, 17, -20, true);
        let min = MinimalHeader::decode(&bytes).unwrap();
        let result = min.decode_trailer(&bytes[MIN_HEADER_SIZE..]);
        assert!(matches!(
            result,
            Err(IpcError::MalformedHeader("bad message size"))
        ));
    }

    #[test]
    fn test_decode_trailer_ignores_extra_bytes() {
        // A 20-byte header from a newer peer: 5 known trailer bytes
        // plus 3 unknown ones.
        let mut bytes = raw_header(5, 20, 64, false);
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let min = MinimalHeader::decode(&bytes).unwrap();
        assert_eq!(min.trailer_len(), 8);

        let header = min.decode_trailer(&bytes[MIN_HEADER_SIZE..]).unwrap();
        assert_eq!(header.message_size(), Some(64));
        assert_eq!(header.header_size(), 20);
        assert!(!header.more_data());
    }

    #[test]
    fn test_minimal_header_accessors() {
        let header = Header::minimal();
        assert_eq!(header.version(), DEFAULT_PROTOCOL_VERSION);
        assert_eq!(header.header_size(), MIN_HEADER_SIZE);
        assert_eq!(header.message_size(), None);
        assert!(!header.more_data());
    }
}
