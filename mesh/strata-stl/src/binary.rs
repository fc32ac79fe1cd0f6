//! Binary STL records.
//!
//! ```text
//! UINT8[80]    – Header (free text, sometimes the solid name)
//! UINT32       – Number of facets
//! foreach facet
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```

use std::io::{ErrorKind, Read};

use strata_types::{Point3, Triangle, Vector3};

use crate::detect::FACET_SIZE;
use crate::error::{IoError, IoResult};

/// Streams the facet records that follow the 84-byte prefix.
#[derive(Debug)]
pub(crate) struct BinaryFacets<R> {
    reader: R,
    declared: u32,
    read: u32,
}

impl<R: Read> BinaryFacets<R> {
    pub(crate) const fn new(reader: R, declared: u32) -> Self {
        Self {
            reader,
            declared,
            read: 0,
        }
    }

    pub(crate) const fn declared(&self) -> u32 {
        self.declared
    }
}

impl<R: Read> Iterator for BinaryFacets<R> {
    type Item = IoResult<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.read >= self.declared {
            return None;
        }

        let mut buf = [0u8; FACET_SIZE];
        if let Err(e) = self.reader.read_exact(&mut buf) {
            let got = self.read;
            self.read = self.declared;
            return Some(Err(if e.kind() == ErrorKind::UnexpectedEof {
                IoError::Truncated {
                    expected: self.declared,
                    got,
                }
            } else {
                IoError::Io(e)
            }));
        }

        self.read += 1;
        Some(Ok(decode_facet(&buf)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.declared - self.read) as usize;
        (0, Some(remaining))
    }
}

fn decode_facet(buf: &[u8; FACET_SIZE]) -> Triangle {
    let normal = read_vector(&buf[0..12]);
    let vertices = [
        Point3::from(read_vector(&buf[12..24])),
        Point3::from(read_vector(&buf[24..36])),
        Point3::from(read_vector(&buf[36..48])),
    ];
    Triangle::with_normal(normal, vertices)
}

/// Read three little-endian f32s.
fn read_vector(buf: &[u8]) -> Vector3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vector3::new(f64::from(x), f64::from(y), f64::from(z))
}

/// Solid name carried in a binary header, if any.
///
/// Takes the leading run of printable characters, drops a `solid` keyword
/// and surrounding whitespace. Returns `None` when nothing is left.
pub(crate) fn header_name(header: &[u8]) -> Option<String> {
    let end = header
        .iter()
        .position(|&b| !(b == b'\t' || (0x20..0x7f).contains(&b)))
        .unwrap_or(header.len());
    let text = String::from_utf8_lossy(&header[..end]);
    let mut name = text.trim();
    if name.len() >= 5 && name[..5].eq_ignore_ascii_case("solid") {
        let rest = &name[5..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            name = rest.trim_start();
        }
    }
    (!name.is_empty()).then(|| name.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn record(vertices: [[f32; 3]; 3]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FACET_SIZE);
        for c in [0.0f32, 0.0, 1.0] {
            bytes.extend_from_slice(&c.to_le_bytes());
        }
        for v in vertices {
            for c in v {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes
    }

    #[test]
    fn decodes_records() {
        let data = record([[0.0, 0.0, 0.0], [1.0, 0.0, 0.5], [0.0, 2.0, 0.25]]);
        let mut facets = BinaryFacets::new(data.as_slice(), 1);
        let tri = facets.next().unwrap().unwrap();
        assert_eq!(tri.vertices[1], Point3::new(1.0, 0.0, 0.5));
        assert_eq!(tri.vertices[2].z, 0.25);
        assert_eq!(tri.normal, Vector3::new(0.0, 0.0, 1.0));
        assert!(facets.next().is_none());
    }

    #[test]
    fn short_record_is_truncation() {
        let mut data = record([[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        data.extend_from_slice(&[0u8; 20]);
        let mut facets = BinaryFacets::new(data.as_slice(), 3);
        assert!(facets.next().unwrap().is_ok());
        let err = facets.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            IoError::Truncated {
                expected: 3,
                got: 1
            }
        ));
        assert!(facets.next().is_none());
    }

    #[test]
    fn header_names() {
        let mut header = [0u8; 80];
        header[..14].copy_from_slice(b"solid bracket ");
        assert_eq!(header_name(&header).as_deref(), Some("bracket"));

        assert_eq!(header_name(b"  exported part\x00\x01junk").as_deref(), Some("exported part"));
        assert_eq!(header_name(b"solid").as_deref(), None);
        assert_eq!(header_name(&[0u8; 80]), None);
        assert_eq!(header_name(b"solidworks").as_deref(), Some("solidworks"));
    }
}
