//! Entry descriptors and container header words.
//!
//! # Entry layout
//!
//! ```text
//!  31        28 27                                0
//! +--+--------+----------------------------------+
//! |H |  kind  |         offset / length          |
//! +--+--------+----------------------------------+
//! ```
//!
//! `H` set means the low 28 bits hold the *end offset* of the child rather
//! than its length. The serializer sets it on every [`OFFSET_STRIDE`]th
//! child so that random access never sums more than a stride of lengths.
//!
//! # Container header
//!
//! The first word of a container holds the child count in its low 28 bits
//! and the [`F_SCALAR`], [`F_OBJECT`], [`F_ARRAY`] flags above it. An object
//! of `n` pairs has `2n` entries: all keys, then all values.

/// Mask for the offset/length field.
pub const OFFLEN_MASK: u32 = 0x0FFF_FFFF;
/// Mask for the kind bits.
pub const KIND_MASK: u32 = 0x7000_0000;
/// Set when the offset/length field holds an end offset.
pub const HAS_OFF: u32 = 0x8000_0000;

/// Largest length an entry can describe.
pub const MAX_LEN: usize = OFFLEN_MASK as usize;

/// Every child whose index is a multiple of this stores an end offset.
pub const OFFSET_STRIDE: usize = 32;

/// Count mask of a container header.
pub const COUNT_MASK: u32 = 0x0FFF_FFFF;
/// Container is a one-element array boxing a root scalar.
pub const F_SCALAR: u32 = 0x1000_0000;
/// Container is an object.
pub const F_OBJECT: u32 = 0x2000_0000;
/// Container is an array.
pub const F_ARRAY: u32 = 0x4000_0000;

/// What an entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// UTF-8 bytes, unpadded.
    String,
    /// `false`, zero bytes.
    BoolFalse,
    /// `true`, zero bytes.
    BoolTrue,
    /// `null`, zero bytes.
    Null,
    /// A nested array or object, preceded by alignment padding.
    Container,
    /// An extended type: padding, header tag, payload.
    Extended,
}

impl EntryKind {
    const fn bits(self) -> u32 {
        match self {
            Self::String => 0x0000_0000,
            Self::BoolFalse => 0x2000_0000,
            Self::BoolTrue => 0x3000_0000,
            Self::Null => 0x4000_0000,
            Self::Container => 0x5000_0000,
            Self::Extended => 0x7000_0000,
        }
    }

    const fn from_bits(bits: u32) -> Option<Self> {
        match bits & KIND_MASK {
            0x0000_0000 => Some(Self::String),
            0x2000_0000 => Some(Self::BoolFalse),
            0x3000_0000 => Some(Self::BoolTrue),
            0x4000_0000 => Some(Self::Null),
            0x5000_0000 => Some(Self::Container),
            0x7000_0000 => Some(Self::Extended),
            _ => None,
        }
    }
}

/// A child entry descriptor: kind bits plus a 28-bit offset or length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgtEntry(u32);

impl AgtEntry {
    /// Build an entry of `kind` describing `len` bytes.
    ///
    /// `len` must already be checked against [`MAX_LEN`].
    #[inline]
    #[must_use]
    pub const fn new(kind: EntryKind, len: u32) -> Self {
        Self(kind.bits() | (len & OFFLEN_MASK))
    }

    /// Wrap a raw word read from an entry table.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw word.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The entry kind, or `None` for kind bits this codec does not know.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> Option<EntryKind> {
        EntryKind::from_bits(self.0)
    }

    /// The offset/length field.
    #[inline]
    #[must_use]
    pub const fn offlen(self) -> usize {
        (self.0 & OFFLEN_MASK) as usize
    }

    /// Whether the offset/length field holds an end offset.
    #[inline]
    #[must_use]
    pub const fn has_off(self) -> bool {
        self.0 & HAS_OFF != 0
    }

    /// Whether the entry is flagged as an extended type.
    #[inline]
    #[must_use]
    pub const fn is_extended(self) -> bool {
        matches!(self.kind(), Some(EntryKind::Extended))
    }

    /// Whether the entry points at a nested container.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self.kind(), Some(EntryKind::Container))
    }

    /// Replace the length with an end offset, keeping the kind.
    #[inline]
    #[must_use]
    pub(crate) const fn with_end_offset(self, end: u32) -> Self {
        Self((self.0 & KIND_MASK) | (end & OFFLEN_MASK) | HAS_OFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_packs_kind_and_length() {
        let e = AgtEntry::new(EntryKind::Extended, 12);
        assert!(e.is_extended());
        assert!(!e.is_container());
        assert!(!e.has_off());
        assert_eq!(e.offlen(), 12);
        assert_eq!(e.raw(), 0x7000_000C);
    }

    #[test]
    fn end_offset_keeps_kind() {
        let e = AgtEntry::new(EntryKind::String, 3).with_end_offset(40);
        assert!(e.has_off());
        assert_eq!(e.kind(), Some(EntryKind::String));
        assert_eq!(e.offlen(), 40);
    }

    #[test]
    fn unknown_kind_bits() {
        assert_eq!(AgtEntry::from_raw(0x1000_0000).kind(), None);
        assert_eq!(AgtEntry::from_raw(0x6000_0000).kind(), None);
        assert_eq!(AgtEntry::from_raw(0xC000_0004).kind(), Some(EntryKind::Null));
    }
}
