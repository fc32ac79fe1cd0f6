//! ASCII STL records.
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```
//!
//! Keywords are case-insensitive and a file may hold several solids back to
//! back.

use std::io::{BufRead, Lines};

use strata_types::{Point3, Triangle, Vector3};

use crate::error::{IoError, IoResult};

/// A facet whose `endfacet` has not been seen yet.
struct OpenFacet {
    line: usize,
    normal: Vector3<f64>,
    vertices: Vec<Point3<f64>>,
    in_loop: bool,
}

/// Streams facets out of ASCII STL text.
///
/// The first error ends the stream.
pub(crate) struct AsciiFacets<R> {
    lines: Lines<R>,
    line: usize,
    name: Option<String>,
    solids: usize,
    done: bool,
}

impl<R: BufRead> AsciiFacets<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            name: None,
            solids: 0,
            done: false,
        }
    }

    /// Name of the first solid seen so far.
    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of `solid` blocks seen so far.
    pub(crate) const fn solids(&self) -> usize {
        self.solids
    }

    fn fail(&mut self, err: IoError) -> Option<IoResult<Triangle>> {
        self.done = true;
        Some(Err(err))
    }
}

impl<R: BufRead> Iterator for AsciiFacets<R> {
    type Item = IoResult<Triangle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut facet: Option<OpenFacet> = None;
        loop {
            let Some(text) = self.lines.next() else {
                self.done = true;
                return facet
                    .map(|f| Err(IoError::invalid_content(f.line, "facet is missing endfacet")));
            };
            self.line += 1;
            let line = self.line;
            let text = match text {
                Ok(text) => text,
                Err(e) => return self.fail(e.into()),
            };

            let mut tokens = text.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };
            let keyword = keyword.to_ascii_lowercase();

            match (keyword.as_str(), facet.as_mut()) {
                ("solid", None) => {
                    self.solids += 1;
                    if self.name.is_none() {
                        let rest = text.trim_start().get(5..).unwrap_or("").trim();
                        if !rest.is_empty() {
                            self.name = Some(rest.to_owned());
                        }
                    }
                }
                ("endsolid", None) => {}
                ("facet", None) => {
                    let normal = match tokens.next() {
                        None => Vector3::zeros(),
                        Some(word) if word.eq_ignore_ascii_case("normal") => {
                            match parse_triple(&mut tokens, line, "facet normal") {
                                Ok([x, y, z]) => Vector3::new(x, y, z),
                                Err(e) => return self.fail(e),
                            }
                        }
                        Some(word) => {
                            return self.fail(IoError::invalid_content(
                                line,
                                format!("expected `normal` after `facet`, found {word:?}"),
                            ));
                        }
                    };
                    facet = Some(OpenFacet {
                        line,
                        normal,
                        vertices: Vec::with_capacity(3),
                        in_loop: false,
                    });
                }
                ("outer", Some(open)) if !open.in_loop && open.vertices.is_empty() => {
                    open.in_loop = true;
                }
                ("vertex", Some(open)) if open.in_loop => {
                    if open.vertices.len() == 3 {
                        return self.fail(IoError::invalid_content(
                            line,
                            "facet has more than 3 vertices",
                        ));
                    }
                    match parse_triple(&mut tokens, line, "vertex") {
                        Ok(coords) => open.vertices.push(Point3::from(coords)),
                        Err(e) => return self.fail(e),
                    }
                }
                ("endloop", Some(open)) if open.in_loop => {
                    open.in_loop = false;
                }
                ("endfacet", Some(open)) if !open.in_loop => {
                    let count = open.vertices.len();
                    if count != 3 {
                        return self.fail(IoError::invalid_content(
                            line,
                            format!("facet has {count} vertices, expected 3"),
                        ));
                    }
                    let vertices = [open.vertices[0], open.vertices[1], open.vertices[2]];
                    return Some(Ok(Triangle::with_normal(open.normal, vertices)));
                }
                (other, _) => {
                    return self.fail(IoError::invalid_content(
                        line,
                        format!("unexpected `{other}`"),
                    ));
                }
            }
        }
    }
}

fn parse_triple<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> IoResult<[f64; 3]> {
    let mut out = [0.0; 3];
    for slot in &mut out {
        let token = tokens.next().ok_or_else(|| {
            IoError::invalid_content(line, format!("{what} needs 3 coordinates"))
        })?;
        *slot = token.parse().map_err(|_| IoError::InvalidNumber {
            line,
            token: token.to_owned(),
        })?;
    }
    Ok(out)
}
