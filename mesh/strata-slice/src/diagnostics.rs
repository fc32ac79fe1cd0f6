//! Topology diagnostics for one layer.
//!
//! A closed 2-manifold cut by a plane gives every point exactly two
//! neighbours. Anything else points at a defect in the mesh:
//!
//! - **branch**: more than two neighbours (non-manifold edge or vertex);
//! - **termination**: fewer than two neighbours (a hole in the surface);
//! - **fault**: a neighbour that has no adjacency entry of its own.
//!
//! Diagnostics are advisory. Slicing never fails because of them.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::canon::Canonicalizer;
use crate::geometry::{Point, PointKey, Segment};

/// Point adjacency within one layer.
///
/// Neighbour sets are de-duplicated and never contain the point itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighborMap {
    map: BTreeMap<PointKey, BTreeSet<PointKey>>,
}

impl NeighborMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Symmetric adjacency of a layer's segments.
    #[must_use]
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut map = Self::new();
        for s in segments {
            map.connect(s.a, s.b);
        }
        map
    }

    /// Record `to` as a neighbour of `from` only.
    pub fn insert(&mut self, from: PointKey, to: PointKey) {
        let entry = self.map.entry(from).or_default();
        if from != to {
            entry.insert(to);
        }
    }

    /// Record `a` and `b` as neighbours of each other.
    pub fn connect(&mut self, a: PointKey, b: PointKey) {
        self.insert(a, b);
        self.insert(b, a);
    }

    /// Neighbours of `p`.
    #[must_use]
    pub fn neighbors(&self, p: PointKey) -> Option<&BTreeSet<PointKey>> {
        self.map.get(&p)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Classify every point of a layer at height `z`.
    #[must_use]
    pub fn analyze(&self, z: f64, canon: &Canonicalizer) -> Diagnostics {
        let mut out = Diagnostics::default();
        for (&point, neighbors) in &self.map {
            let junction = || Junction {
                z,
                point: canon.point(point),
                neighbors: neighbors.iter().map(|&n| canon.point(n)).collect(),
            };
            match neighbors.len() {
                0 | 1 => out.terminations.push(junction()),
                2 => {}
                _ => out.branches.push(junction()),
            }
            for &n in neighbors {
                if !self.map.contains_key(&n) {
                    out.faults.push(Fault {
                        z,
                        point: canon.point(point),
                        missing: canon.point(n),
                    });
                }
            }
        }
        out
    }
}

/// A point with an unexpected number of neighbours.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Junction {
    /// Layer height.
    pub z: f64,
    /// The point.
    pub point: Point,
    /// Its distinct neighbours.
    pub neighbors: Vec<Point>,
}

/// A neighbour reference with no adjacency entry of its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fault {
    /// Layer height.
    pub z: f64,
    /// The point holding the reference.
    pub point: Point,
    /// The neighbour missing from the map.
    pub missing: Point,
}

/// Branch, termination and fault reports, in layer order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    /// Points with more than two neighbours.
    pub branches: Vec<Junction>,
    /// Points with fewer than two neighbours.
    pub terminations: Vec<Junction>,
    /// Dangling neighbour references.
    pub faults: Vec<Fault>,
}

impl Diagnostics {
    /// Whether nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.terminations.is_empty() && self.faults.is_empty()
    }

    /// Total number of reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len() + self.terminations.len() + self.faults.len()
    }

    /// Append another layer's reports.
    pub fn append(&mut self, other: &mut Self) {
        self.branches.append(&mut other.branches);
        self.terminations.append(&mut other.terminations);
        self.faults.append(&mut other.faults);
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} branches, {} terminations, {} faults",
            self.branches.len(),
            self.terminations.len(),
            self.faults.len()
        )
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn seg(a: (i64, i64), b: (i64, i64)) -> Segment {
        Segment::new(PointKey(a.0, a.1), PointKey(b.0, b.1), false).unwrap_or(Segment {
            a: PointKey(a.0, a.1),
            b: PointKey(b.0, b.1),
            grazing: false,
            above: true,
            below: true,
        })
    }

    fn canon() -> Canonicalizer {
        Canonicalizer::default()
    }

    #[test]
    fn closed_square_is_clean() {
        let segments = [
            seg((0, 0), (1, 0)),
            seg((1, 0), (1, 1)),
            seg((1, 1), (0, 1)),
            seg((0, 1), (0, 0)),
        ];
        let map = NeighborMap::from_segments(&segments);
        assert_eq!(map.len(), 4);
        assert!(map.analyze(0.0, &canon()).is_empty());
    }

    #[test]
    fn open_chain_has_two_terminations() {
        let segments = [seg((0, 0), (1, 0)), seg((1, 0), (2, 0))];
        let diagnostics = NeighborMap::from_segments(&segments).analyze(0.5, &canon());
        assert_eq!(diagnostics.terminations.len(), 2);
        assert!(diagnostics.branches.is_empty());
        assert!(diagnostics.terminations.iter().all(|j| j.z == 0.5 && j.neighbors.len() == 1));
    }

    #[test]
    fn shared_vertex_is_a_branch() {
        // Two triangles of segments touching at the origin.
        let segments = [
            seg((0, 0), (1, 0)),
            seg((1, 0), (1, 1)),
            seg((1, 1), (0, 0)),
            seg((0, 0), (-1, 0)),
            seg((-1, 0), (-1, -1)),
            seg((-1, -1), (0, 0)),
        ];
        let diagnostics = NeighborMap::from_segments(&segments).analyze(0.0, &canon());
        assert_eq!(diagnostics.branches.len(), 1);
        assert_eq!(diagnostics.branches[0].neighbors.len(), 4);
        assert!(diagnostics.terminations.is_empty());
    }

    #[test]
    fn self_and_duplicate_neighbours_are_ignored() {
        let mut map = NeighborMap::new();
        let p = PointKey(0, 0);
        let q = PointKey(1, 0);
        map.connect(p, q);
        map.connect(p, q);
        map.insert(p, p);
        assert_eq!(map.neighbors(p).map(BTreeSet::len), Some(1));
    }

    #[test]
    fn dangling_reference_is_a_fault() {
        let mut map = NeighborMap::new();
        map.insert(PointKey(0, 0), PointKey(1, 0));
        let diagnostics = map.analyze(0.0, &canon());
        assert_eq!(diagnostics.faults.len(), 1);
        assert_eq!(diagnostics.faults[0].missing, canon().point(PointKey(1, 0)));
        assert_eq!(diagnostics.terminations.len(), 1);
    }

    #[test]
    fn append_and_display() {
        let mut all = Diagnostics::default();
        let mut layer = NeighborMap::from_segments(&[seg((0, 0), (1, 0))]).analyze(0.0, &canon());
        all.append(&mut layer);
        assert_eq!(all.len(), 2);
        assert!(layer.is_empty());
        assert_eq!(format!("{all}"), "0 branches, 2 terminations, 0 faults");
    }
}
