//! Utilities used by the chunk parser: parse error type and byte readers.
use thiserror::Error;

/// Error type returned by the parsing helpers in this module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An attempted read was outside the available buffer range.
    ///
    /// - `offset` is the index that was attempted to be accessed.
    /// - `needed` is the number of bytes required for the operation.
    /// - `available` is the current buffer length.
    /// - `context` optionally names the logical location (for example
    ///   `"chunk header"` or `"FMT_ INFO"`) where the access was attempted.
    #[error(
        "offset out of range{}: 0x{offset:X} (needed {needed} bytes, available {available})",
        fmt_context(.context)
    )]
    OffsetOutOfRange {
        offset: usize,
        needed: usize,
        available: usize,
        context: Option<String>,
    },

    /// A four-byte tag did not match the expected value.
    ///
    /// The contained array is the raw 4 bytes that were read.
    #[error("invalid ident: {0:?}")]
    InvalidIdent([u8; 4]),

    /// A chunk declared a size reaching past the end of its parent.
    #[error("chunk '{tag}' at 0x{position:X} declares {size} bytes but only {available} remain")]
    ChunkOverrun {
        tag: String,
        position: usize,
        size: u32,
        available: usize,
    },
}

fn fmt_context(context: &Option<String>) -> String {
    context
        .as_deref()
        .map(|c| format!(" at {c}"))
        .unwrap_or_default()
}

impl ParseError {
    /// Attach a context label to an `OffsetOutOfRange` error.
    pub fn with_context(self, ctx: &str) -> Self {
        match self {
            ParseError::OffsetOutOfRange {
                offset,
                needed,
                available,
                ..
            } => ParseError::OffsetOutOfRange {
                offset,
                needed,
                available,
                context: Some(ctx.to_string()),
            },
            other => other,
        }
    }
}

/// Read a 32-bit little-endian unsigned integer from `bytes` at `off`.
///
/// Returns `Err(ParseError::OffsetOutOfRange)` when the buffer is too short.
pub fn read_u32_le_at(bytes: &[u8], off: usize) -> Result<u32, ParseError> {
    let s = read_slice(bytes, off, 4)?;
    let mut tmp: [u8; 4] = [0; 4];
    tmp.copy_from_slice(s);
    Ok(u32::from_le_bytes(tmp))
}

/// Read a 16-bit little-endian unsigned integer from `bytes` at `off`.
pub fn read_u16_le_at(bytes: &[u8], off: usize) -> Result<u16, ParseError> {
    let s = read_slice(bytes, off, 2)?;
    Ok(u16::from_le_bytes([s[0], s[1]]))
}

/// Read a four-byte tag from `bytes` at `off`.
pub fn read_tag_at(bytes: &[u8], off: usize) -> Result<[u8; 4], ParseError> {
    let s = read_slice(bytes, off, 4)?;
    let mut tag = [0u8; 4];
    tag.copy_from_slice(s);
    Ok(tag)
}

/// Return a borrowed slice of length `len` starting at `off` from `bytes`.
///
/// Returns `Err(ParseError::OffsetOutOfRange)` when the requested range
/// exceeds the available buffer. `available` reports the number of bytes
/// remaining from `off` to the end of the buffer.
pub fn read_slice(bytes: &[u8], off: usize, len: usize) -> Result<&[u8], ParseError> {
    match off.checked_add(len) {
        Some(end) if end <= bytes.len() => Ok(&bytes[off..end]),
        _ => Err(ParseError::OffsetOutOfRange {
            offset: off,
            needed: len,
            available: bytes.len().saturating_sub(off),
            context: None,
        }),
    }
}

/// Round `n` up to the next multiple of four.
pub fn align4(n: usize) -> usize {
    n.saturating_add(3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_u32_reports_remaining_bytes() {
        let bytes = [1u8, 2, 3];
        match read_u32_le_at(&bytes, 1) {
            Err(ParseError::OffsetOutOfRange {
                offset,
                needed,
                available,
                ..
            }) => {
                assert_eq!((offset, needed, available), (1, 4, 2));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn context_is_rendered_in_message() {
        let err = read_slice(&[0u8; 2], 0, 8)
            .unwrap_err()
            .with_context("chunk header");
        assert_eq!(
            err.to_string(),
            "offset out of range at chunk header: 0x0 (needed 8 bytes, available 2)"
        );
    }

    #[test]
    fn align4_rounds_up() {
        assert_eq!(align4(0), 0);
        assert_eq!(align4(1), 4);
        assert_eq!(align4(4), 4);
        assert_eq!(align4(13), 16);
    }
}
