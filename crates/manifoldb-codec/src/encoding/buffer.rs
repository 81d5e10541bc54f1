//! Aligned append buffer and bounds-checked word reads.
//!
//! All multi-byte fields use the platform's native byte order. Alignment is
//! always measured from the start of the buffer, so a document must be
//! decoded from the same base it was encoded at.

use crate::error::{CodecError, Result};

/// Alignment, in bytes, of headers and container starts.
pub const WORD_ALIGN: usize = 4;

/// Round `n` up to the next multiple of [`WORD_ALIGN`].
#[inline]
#[must_use]
pub const fn int_align(n: usize) -> usize {
    (n + (WORD_ALIGN - 1)) & !(WORD_ALIGN - 1)
}

/// Append-side operations on an encode buffer.
pub trait BufferExt {
    /// Append zero bytes until the length is word-aligned. Returns the number added.
    fn pad_to_word(&mut self) -> usize;

    /// Append `n` zero bytes and return the offset of the first one.
    fn reserve_bytes(&mut self, n: usize) -> usize;

    /// Overwrite a previously reserved word.
    fn write_u32_at(&mut self, offset: usize, value: u32) -> Result<()>;
}

impl BufferExt for Vec<u8> {
    fn pad_to_word(&mut self) -> usize {
        let padlen = int_align(self.len()) - self.len();
        self.resize(self.len() + padlen, 0);
        padlen
    }

    fn reserve_bytes(&mut self, n: usize) -> usize {
        let offset = self.len();
        self.resize(offset + n, 0);
        offset
    }

    fn write_u32_at(&mut self, offset: usize, value: u32) -> Result<()> {
        let slot = self
            .get_mut(offset..offset.saturating_add(4))
            .ok_or_else(|| CodecError::MalformedContainer(format!("no reserved word at {offset}")))?;
        slot.copy_from_slice(&value.to_ne_bytes());
        Ok(())
    }
}

/// Read a native-endian `u32` at `at`, if it lies within `bytes`.
#[inline]
pub(crate) fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let end = at.checked_add(4)?;
    let word: [u8; 4] = bytes.get(at..end)?.try_into().ok()?;
    Some(u32::from_ne_bytes(word))
}

/// Read 8 native-endian bytes at `at`, if they lie within `bytes`.
#[inline]
pub(crate) fn read_8(bytes: &[u8], at: usize) -> Option<[u8; 8]> {
    let end = at.checked_add(8)?;
    bytes.get(at..end)?.try_into().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn int_align_rounds_up() {
        assert_eq!(int_align(0), 0);
        assert_eq!(int_align(1), 4);
        assert_eq!(int_align(4), 4);
        assert_eq!(int_align(5), 8);
    }

    #[test]
    fn pad_to_word_reports_padding() {
        let mut buf = vec![1u8, 2, 3];
        assert_eq!(buf.pad_to_word(), 1);
        assert_eq!(buf, vec![1, 2, 3, 0]);
        assert_eq!(buf.pad_to_word(), 0);
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn reserve_then_write() {
        let mut buf = vec![9u8];
        let at = buf.reserve_bytes(4);
        assert_eq!(at, 1);
        buf.write_u32_at(at, 0xDEAD_BEEF).unwrap();
        assert_eq!(read_u32(&buf, at), Some(0xDEAD_BEEF));
        assert!(buf.write_u32_at(3, 0).is_err());
    }

    #[test]
    fn reads_are_bounds_checked() {
        let bytes = [0u8; 6];
        assert!(read_u32(&bytes, 2).is_some());
        assert!(read_u32(&bytes, 3).is_none());
        assert!(read_8(&bytes, 0).is_none());
        assert!(read_u32(&bytes, usize::MAX).is_none());
    }
}
