//! STL ingestion for strata.
//!
//! Reads binary and ASCII STL into [`strata_types::TriangleSoup`], or streams
//! facets one at a time through [`StlReader`]. The encoding is detected from
//! the content, never from the file extension.
//!
//! # Example
//!
//! ```no_run
//! use strata_stl::load_stl;
//!
//! let soup = load_stl("part.stl").unwrap();
//! println!("{} facets", soup.len());
//! ```
//!
//! Malformed input is reported as an [`IoError`] carrying a line number for
//! ASCII content or the facet count for truncated binary data.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod ascii;
mod binary;
mod detect;
mod error;
mod reader;

pub use detect::{FACET_SIZE, HEADER_SIZE, PREFIX_SIZE, StlFormat, binary_len, detect_format};
pub use error::{IoError, IoResult};
pub use reader::StlReader;

use std::io::BufRead;
use std::path::Path;

use strata_types::TriangleSoup;

/// Load an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<TriangleSoup> {
    StlReader::open(path)?.into_soup()
}

/// Read STL from a buffered reader whose total length is `total_len`.
///
/// # Errors
///
/// Returns an error if the stream cannot be read or is not valid STL.
pub fn read_stl<R: BufRead>(reader: R, total_len: u64) -> IoResult<TriangleSoup> {
    StlReader::new(reader, total_len)?.into_soup()
}

/// Parse STL held in memory.
///
/// # Errors
///
/// Returns an error if the bytes are not valid STL.
///
/// # Example
///
/// ```
/// use strata_stl::parse_stl;
///
/// let soup = parse_stl(b"solid empty\nendsolid empty\n").unwrap();
/// assert!(soup.is_empty());
/// assert_eq!(soup.name.as_deref(), Some("empty"));
/// ```
pub fn parse_stl(bytes: &[u8]) -> IoResult<TriangleSoup> {
    read_stl(bytes, bytes.len() as u64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_binary() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let soup = parse_stl(&bytes).unwrap();
        assert!(soup.is_empty());
        assert_eq!(soup.name, None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_stl(&[0xff; 10]).is_err());
        assert!(parse_stl(&[0x01; 200]).is_err());
    }

    #[test]
    fn missing_file() {
        let err = load_stl("/nonexistent/path/part.stl").unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
