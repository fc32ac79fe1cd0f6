//! Planar value types shared by the slicing stages.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer grid key of a canonical 2-D point.
///
/// Ordering is lexicographic on `(x, y)`, which gives every layer a
/// deterministic segment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointKey(pub i64, pub i64);

impl PointKey {
    /// Squared distance in grid units.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i128 {
        let dx = i128::from(self.0) - i128::from(other.0);
        let dy = i128::from(self.1) - i128::from(other.1);
        dx * dx + dy * dy
    }
}

/// A canonical 2-D coordinate in model units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An undirected segment between two distinct points of one layer.
///
/// Stored normalized with `a < b`, so `{a, b}` and `{b, a}` compare equal.
///
/// `above` and `below` record which sides of the plane the producing
/// triangles reach. A crossing reaches both; a grazing edge reaches only the
/// side its off-plane vertex is on, unless triangles from both sides share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    /// Smaller endpoint.
    pub a: PointKey,
    /// Larger endpoint.
    pub b: PointKey,
    /// Both endpoints are mesh vertices lying on the cutting plane.
    pub grazing: bool,
    /// Some producing triangle extends above the plane.
    pub above: bool,
    /// Some producing triangle extends below the plane.
    pub below: bool,
}

impl Segment {
    /// Create a normalized segment, or `None` when the endpoints coincide.
    ///
    /// The segment is marked as reaching both sides of the plane; use
    /// [`Segment::with_sides`] to narrow that.
    #[must_use]
    pub fn new(p: PointKey, q: PointKey, grazing: bool) -> Option<Self> {
        let (a, b) = match p.cmp(&q) {
            std::cmp::Ordering::Less => (p, q),
            std::cmp::Ordering::Greater => (q, p),
            std::cmp::Ordering::Equal => return None,
        };
        Some(Self {
            a,
            b,
            grazing,
            above: true,
            below: true,
        })
    }

    /// Set which sides of the plane the producing triangle reaches.
    #[must_use]
    pub const fn with_sides(mut self, above: bool, below: bool) -> Self {
        self.above = above;
        self.below = below;
        self
    }

    /// Whether material lies on both sides of the plane along this segment.
    #[must_use]
    pub const fn spans_plane(&self) -> bool {
        self.above && self.below
    }

    /// Fold a duplicate of this segment (same endpoints) into it.
    ///
    /// The result is grazing only if both were, and reaches every side
    /// either reached.
    pub const fn absorb(&mut self, other: &Self) {
        self.grazing &= other.grazing;
        self.above |= other.above;
        self.below |= other.below;
    }

    /// The endpoint opposite `p`, if `p` is an endpoint.
    #[must_use]
    pub fn other(&self, p: PointKey) -> Option<PointKey> {
        if p == self.a {
            Some(self.b)
        } else if p == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// Endpoints ignoring the flags.
    #[must_use]
    pub const fn endpoints(&self) -> (PointKey, PointKey) {
        (self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_undirected() {
        let p = PointKey(0, 5);
        let q = PointKey(3, -1);
        assert_eq!(Segment::new(p, q, false), Segment::new(q, p, false));
        assert_eq!(Segment::new(q, p, false).map(|s| s.a), Some(p));
        assert!(Segment::new(p, p, false).is_none());
    }

    #[test]
    fn other_endpoint() {
        let s = Segment::new(PointKey(0, 0), PointKey(1, 0), false);
        let s = s.unwrap_or(Segment {
            a: PointKey(0, 0),
            b: PointKey(0, 0),
            grazing: false,
            above: true,
            below: true,
        });
        assert_eq!(s.other(PointKey(0, 0)), Some(PointKey(1, 0)));
        assert_eq!(s.other(PointKey(1, 0)), Some(PointKey(0, 0)));
        assert_eq!(s.other(PointKey(2, 2)), None);
    }

    #[test]
    fn absorbing_a_duplicate_merges_sides() {
        let p = PointKey(0, 0);
        let q = PointKey(1, 0);
        let mut upper = Segment::new(p, q, true).map(|s| s.with_sides(true, false));
        let lower = Segment::new(q, p, true).map(|s| s.with_sides(false, true));
        assert!(upper.is_some_and(|s| !s.spans_plane()));

        if let (Some(u), Some(l)) = (upper.as_mut(), lower) {
            u.absorb(&l);
        }
        assert!(upper.is_some_and(|s| s.grazing && s.spans_plane()));

        let mut crossing = Segment::new(p, q, false);
        if let (Some(c), Some(l)) = (crossing.as_mut(), lower) {
            c.absorb(&l);
        }
        assert!(crossing.is_some_and(|s| !s.grazing));
    }

    #[test]
    fn key_distance() {
        assert_eq!(PointKey(0, 0).distance_squared(PointKey(3, 4)), 25);
        assert!((Point::new(0.0, 0.0).distance(&Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }
}
