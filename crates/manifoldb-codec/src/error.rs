//! Error types for the codec crate.

use thiserror::Error;

/// Maximum length for value display in error messages.
const MAX_VALUE_DISPLAY_LEN: usize = 100;

/// Errors that can occur while encoding or decoding graph values.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value kind has no extended encoding.
    ///
    /// This is the only non-fatal variant: callers may fall back to the
    /// generic container encoding for the value.
    #[error("unsupported value kind for extended encoding: {0}")]
    UnsupportedKind(&'static str),

    /// An extended type header holds an unknown tag, or lies outside the input.
    #[error("corrupt extended type header: {0:#x}")]
    CorruptHeader(u32),

    /// A vertex, edge, or path body does not have the expected shape.
    #[error("malformed composite: {0}")]
    MalformedComposite(String),

    /// A generic container is structurally invalid or points outside its bytes.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// An encoded length does not fit the 28-bit length field.
    #[error("encoded size {size} exceeds the maximum of {max} bytes")]
    TooLarge {
        /// The size that was requested.
        size: usize,
        /// The largest size an entry can describe.
        max: usize,
    },

    /// Values are nested deeper than the configured limit.
    #[error("nesting depth exceeds the limit of {limit}")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },
}

impl CodecError {
    /// Returns `true` if the error must abort the current call.
    ///
    /// Only [`CodecError::UnsupportedKind`] is recoverable.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnsupportedKind(_))
    }

    /// Creates a malformed composite error naming the offending field.
    ///
    /// The rendered value is truncated to 100 characters for display.
    #[must_use]
    pub fn mistyped_field(field: &str, expected: &str, value: impl std::fmt::Display) -> Self {
        let value_str = value.to_string();
        let truncated = if value_str.len() > MAX_VALUE_DISPLAY_LEN {
            let mut end = MAX_VALUE_DISPLAY_LEN;
            while !value_str.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &value_str[..end])
        } else {
            value_str
        };
        Self::MalformedComposite(format!("field {field} must be {expected}, got {truncated}"))
    }

    pub(crate) fn truncated(what: &str) -> Self {
        Self::MalformedContainer(format!("unexpected end of input reading {what}"))
    }
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unsupported_kind_is_recoverable() {
        assert!(!CodecError::UnsupportedKind("string").is_fatal());
        assert!(CodecError::CorruptHeader(9).is_fatal());
        assert!(CodecError::MalformedComposite("x".to_owned()).is_fatal());
        assert!(CodecError::DepthExceeded { limit: 1 }.is_fatal());
    }

    #[test]
    fn mistyped_field_truncates_long_values() {
        let long = "é".repeat(200);
        let err = CodecError::mistyped_field("label", "a string", &long);
        let msg = err.to_string();
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 200);
    }
}
