//! Binary/ASCII format detection.
//!
//! The decision looks at the first 84 bytes and the total input length:
//!
//! 1. Shorter than 84 bytes: ASCII when it starts with `solid`, otherwise an
//!    error (no binary STL is that short).
//! 2. Starts with `solid` and the whole prefix is text: ASCII. The facet
//!    count field of a real binary file almost always contains NUL bytes, so
//!    binary files whose header happens to start with `solid` are not caught
//!    here.
//! 3. `84 + 50 * count` equals the total length: binary.
//! 4. Otherwise ASCII if the prefix is text, else the binary data is
//!    truncated or padded and reported as [`IoError::SizeMismatch`].

use crate::error::{IoError, IoResult};

/// Binary STL header size in bytes.
pub const HEADER_SIZE: usize = 80;

/// Header plus the little-endian `u32` facet count.
pub const PREFIX_SIZE: usize = HEADER_SIZE + 4;

/// Size of one binary facet record: normal, 3 vertices, 2 attribute bytes.
pub const FACET_SIZE: usize = 50;

/// The two STL encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StlFormat {
    /// Fixed-layout little-endian records.
    Binary,
    /// Keyword-delimited text records.
    Ascii,
}

impl std::fmt::Display for StlFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::Ascii => write!(f, "ascii"),
        }
    }
}

/// Byte length of a binary STL holding `facets` records.
#[must_use]
pub const fn binary_len(facets: u32) -> u64 {
    PREFIX_SIZE as u64 + FACET_SIZE as u64 * facets as u64
}

/// Decide the encoding from the leading bytes and the total input length.
///
/// # Errors
///
/// Returns [`IoError::TooShort`] for short non-text input and
/// [`IoError::SizeMismatch`] for binary input whose declared facet count
/// disagrees with its length.
///
/// # Example
///
/// ```
/// use strata_stl::{detect_format, StlFormat};
///
/// let text = b"solid cube\n  facet normal 0 0 1\n";
/// assert_eq!(detect_format(text, text.len() as u64).ok(), Some(StlFormat::Ascii));
/// ```
pub fn detect_format(prefix: &[u8], total_len: u64) -> IoResult<StlFormat> {
    let marker = starts_with_solid(prefix);
    let text = looks_like_text(prefix);

    if prefix.len() < PREFIX_SIZE {
        return if marker {
            Ok(StlFormat::Ascii)
        } else {
            Err(IoError::TooShort { len: total_len })
        };
    }

    if marker && text {
        return Ok(StlFormat::Ascii);
    }

    let declared = u32::from_le_bytes([
        prefix[HEADER_SIZE],
        prefix[HEADER_SIZE + 1],
        prefix[HEADER_SIZE + 2],
        prefix[HEADER_SIZE + 3],
    ]);
    let expected = binary_len(declared);

    if expected == total_len {
        Ok(StlFormat::Binary)
    } else if text {
        Ok(StlFormat::Ascii)
    } else {
        Err(IoError::SizeMismatch {
            declared,
            expected,
            actual: total_len,
        })
    }
}

/// Whether the bytes start with the `solid` keyword (after whitespace).
pub(crate) fn starts_with_solid(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let rest = &bytes[start..];
    if rest.len() < 5 || !rest[..5].eq_ignore_ascii_case(b"solid") {
        return false;
    }
    rest.get(5).is_none_or(u8::is_ascii_whitespace)
}

/// Whether the bytes contain no control characters other than whitespace.
///
/// Bytes above 0x7f are accepted so UTF-8 solid names do not count as binary.
pub(crate) fn looks_like_text(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| matches!(b, b'\t' | b'\n' | b'\r' | 0x0c) || (b >= 0x20 && b != 0x7f))
}
