//! Error types for STL ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for STL ingestion.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading an STL stream.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Input too short to be either STL variant.
    #[error("input too short to be an STL file: {len} bytes")]
    TooShort {
        /// Total input length.
        len: u64,
    },

    /// Binary-looking input whose length disagrees with its facet count.
    #[error(
        "binary STL declares {declared} facets ({expected} bytes) but the input has {actual} bytes"
    )]
    SizeMismatch {
        /// Facet count from the header.
        declared: u32,
        /// Byte length implied by the facet count.
        expected: u64,
        /// Actual byte length.
        actual: u64,
    },

    /// Binary facet block cut short.
    #[error("truncated binary STL: expected {expected} facets, got {got}")]
    Truncated {
        /// Declared number of facets.
        expected: u32,
        /// Facets read before the data ran out.
        got: u32,
    },

    /// A numeric field in an ASCII record could not be parsed.
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// Structurally invalid ASCII content.
    #[error("line {line}: {message}")]
    InvalidContent {
        /// 1-based line number.
        line: usize,
        /// Description of what was invalid.
        message: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `InvalidContent` error at `line`.
    #[must_use]
    pub fn invalid_content(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            line,
            message: message.into(),
        }
    }
}
