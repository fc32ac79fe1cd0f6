//! Streaming reader over either STL encoding.

use std::fs::File;
use std::io::{BufRead, BufReader, Chain, Cursor, Read};
use std::path::Path;

use strata_types::{Triangle, TriangleSoup};
use tracing::debug;

use crate::ascii::AsciiFacets;
use crate::binary::{BinaryFacets, header_name};
use crate::detect::{HEADER_SIZE, PREFIX_SIZE, StlFormat, detect_format};
use crate::error::{IoError, IoResult};

enum Facets<R> {
    Binary(BinaryFacets<R>),
    Ascii(AsciiFacets<Chain<Cursor<Vec<u8>>, R>>),
}

/// Reads facets from an STL stream one at a time.
///
/// The encoding is detected from the first 84 bytes and the total length
/// when the reader is created. Iteration yields `Ok(triangle)` per facet and
/// stops after the first error.
///
/// # Example
///
/// ```
/// use strata_stl::{StlFormat, StlReader};
///
/// let text = "solid tri
///   facet normal 0 0 1
///     outer loop
///       vertex 0 0 0
///       vertex 1 0 0
///       vertex 0 1 0
///     endloop
///   endfacet
/// endsolid tri
/// ";
///
/// let mut reader = StlReader::new(text.as_bytes(), text.len() as u64).unwrap();
/// assert_eq!(reader.format(), StlFormat::Ascii);
/// assert_eq!(reader.by_ref().filter(Result::is_ok).count(), 1);
/// assert_eq!(reader.solid_name(), Some("tri"));
/// ```
pub struct StlReader<R: BufRead> {
    format: StlFormat,
    header_name: Option<String>,
    facets: Facets<R>,
}

impl<R: BufRead> StlReader<R> {
    /// Detect the encoding and prepare to stream facets.
    ///
    /// `total_len` is the byte length of the whole input, used to tell binary
    /// files from text.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix cannot be read or format detection
    /// fails.
    pub fn new(mut reader: R, total_len: u64) -> IoResult<Self> {
        let mut prefix = Vec::with_capacity(PREFIX_SIZE);
        reader
            .by_ref()
            .take(PREFIX_SIZE as u64)
            .read_to_end(&mut prefix)?;

        let format = detect_format(&prefix, total_len)?;
        debug!(%format, total_len, "Detected STL format");

        let (header_name, facets) = match format {
            StlFormat::Binary => {
                let declared = u32::from_le_bytes([
                    prefix[HEADER_SIZE],
                    prefix[HEADER_SIZE + 1],
                    prefix[HEADER_SIZE + 2],
                    prefix[HEADER_SIZE + 3],
                ]);
                (
                    header_name(&prefix[..HEADER_SIZE]),
                    Facets::Binary(BinaryFacets::new(reader, declared)),
                )
            }
            StlFormat::Ascii => (
                None,
                Facets::Ascii(AsciiFacets::new(Cursor::new(prefix).chain(reader))),
            ),
        };

        Ok(Self {
            format,
            header_name,
            facets,
        })
    }

    /// The detected encoding.
    #[must_use]
    pub const fn format(&self) -> StlFormat {
        self.format
    }

    /// Name of the solid.
    ///
    /// For binary input this comes from the header. For ASCII input it is
    /// the name of the first `solid` line read so far, so it is only final
    /// once iteration has started.
    #[must_use]
    pub fn solid_name(&self) -> Option<&str> {
        match &self.facets {
            Facets::Binary(_) => self.header_name.as_deref(),
            Facets::Ascii(facets) => facets.name(),
        }
    }

    /// Facet count declared by a binary header.
    #[must_use]
    pub const fn declared_facets(&self) -> Option<u32> {
        match &self.facets {
            Facets::Binary(facets) => Some(facets.declared()),
            Facets::Ascii(_) => None,
        }
    }

    /// Read every remaining facet into a [`TriangleSoup`] carrying the solid
    /// name.
    ///
    /// # Errors
    ///
    /// Returns the first facet error.
    pub fn into_soup(mut self) -> IoResult<TriangleSoup> {
        let capacity = self.declared_facets().map_or(0, |n| n as usize);
        let mut soup = TriangleSoup::with_capacity(capacity);
        for triangle in &mut self {
            soup.push(triangle?);
        }
        soup.name = self.solid_name().map(str::to_owned);

        if let Facets::Ascii(facets) = &self.facets {
            debug!(
                triangles = soup.len(),
                solids = facets.solids(),
                "Read ASCII STL"
            );
        } else {
            debug!(triangles = soup.len(), "Read binary STL");
        }
        Ok(soup)
    }
}

impl StlReader<BufReader<File>> {
    /// Open a file for streaming.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if the path does not exist, or any
    /// error from [`StlReader::new`].
    pub fn open<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IoError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                IoError::Io(e)
            }
        })?;
        let len = file.metadata()?.len();
        Self::new(BufReader::new(file), len)
    }
}

impl<R: BufRead> Iterator for StlReader<R> {
    type Item = IoResult<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.facets {
            Facets::Binary(facets) => facets.next(),
            Facets::Ascii(facets) => facets.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.facets {
            Facets::Binary(facets) => facets.size_hint(),
            Facets::Ascii(_) => (0, None),
        }
    }
}

impl<R: BufRead> std::fmt::Debug for StlReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StlReader")
            .field("format", &self.format)
            .field("solid_name", &self.solid_name())
            .finish_non_exhaustive()
    }
}
