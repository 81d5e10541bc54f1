//! Extended type header.
//!
//! Every extended value starts with one word-aligned 4-byte tag naming its
//! kind. The payload follows immediately.

use tracing::debug;

use crate::error::{CodecError, Result};

use super::buffer::{read_u32, BufferExt};

/// Size of the header tag in bytes.
pub const HEADER_SIZE: usize = 4;

/// Tag identifying an extended value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ExtTag {
    /// Signed 64-bit integer.
    Integer = 0,
    /// IEEE-754 double.
    Float = 1,
    /// Vertex composite.
    Vertex = 2,
    /// Edge composite.
    Edge = 3,
    /// Path composite.
    Path = 4,
}

impl ExtTag {
    /// The wire value of the tag.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Whether the payload is a nested container.
    #[inline]
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Vertex | Self::Edge | Self::Path)
    }
}

impl TryFrom<u32> for ExtTag {
    type Error = CodecError;

    fn try_from(raw: u32) -> Result<Self> {
        match raw {
            0 => Ok(Self::Integer),
            1 => Ok(Self::Float),
            2 => Ok(Self::Vertex),
            3 => Ok(Self::Edge),
            4 => Ok(Self::Path),
            other => Err(CodecError::CorruptHeader(other)),
        }
    }
}

/// Pad `buf` to word alignment and append the tag. Returns the padding added.
pub fn write_header(buf: &mut Vec<u8>, tag: ExtTag) -> usize {
    let padlen = buf.pad_to_word();
    buf.extend_from_slice(&tag.as_u32().to_ne_bytes());
    padlen
}

/// Read the tag stored at `at`, which the caller has already aligned.
///
/// # Errors
///
/// Returns [`CodecError::CorruptHeader`] for an unknown tag and
/// [`CodecError::MalformedContainer`] when the header lies past the input.
pub fn read_header(bytes: &[u8], at: usize) -> Result<ExtTag> {
    let raw = read_u32(bytes, at).ok_or_else(|| CodecError::truncated("extended header"))?;
    ExtTag::try_from(raw).map_err(|err| {
        debug!(tag = raw, at, "unknown extended header tag");
        err
    })
}
