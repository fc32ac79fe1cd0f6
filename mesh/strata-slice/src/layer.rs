//! Layer types for sliced meshes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds2;
use crate::geometry::Point;

/// One polygon of a layer: a closed ring or an open chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    /// Points in traversal order. A closed ring does not repeat its first
    /// point; see [`Region::closed_ring`].
    pub points: Vec<Point>,

    /// Whether the chain closed on itself. Open regions mark a hole or a
    /// non-manifold spot in the mesh.
    pub closed: bool,

    /// Bounding box of the points.
    pub bounds: Bounds2,
}

impl Region {
    /// Create a region, or `None` when there are no points or a closed ring
    /// has fewer than three.
    #[must_use]
    pub fn new(points: Vec<Point>, closed: bool) -> Option<Self> {
        if closed && points.len() < 3 {
            return None;
        }
        let bounds = Bounds2::from_points(&points)?;
        Some(Self {
            points,
            closed,
            bounds,
        })
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the region has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The points with the first one repeated at the end for closed rings.
    #[must_use]
    pub fn closed_ring(&self) -> Vec<Point> {
        let mut ring = self.points.clone();
        if self.closed {
            if let Some(&first) = self.points.first() {
                ring.push(first);
            }
        }
        ring
    }

    /// Shoelace area, positive for counter-clockwise rings. Zero for open
    /// chains.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        if !self.closed {
            return 0.0;
        }
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                p.x.mul_add(q.y, -(q.x * p.y))
            })
            .sum();
        twice / 2.0
    }

    /// Enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Length of the chain, including the closing edge of a ring.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        self.closed_ring()
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }
}

/// A single layer of the sliced mesh.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layer {
    /// Layer index (0 = lowest sample height).
    pub index: usize,

    /// Canonical sample height.
    pub z: f64,

    /// Surviving regions, ascending by point count.
    pub regions: Vec<Region>,

    /// Union of the region boxes, `None` without regions.
    pub bounds: Option<Bounds2>,

    /// Number of distinct segments cut at this height.
    pub segment_count: usize,

    /// No regions, or no segment has material on both sides of the plane
    /// (the layer only grazes the rim of a horizontal face).
    pub degenerate: bool,

    /// Branch exploration hit the state limit.
    pub exploration_truncated: bool,

    /// Points with more than two neighbours.
    pub branch_count: usize,

    /// Points with fewer than two neighbours.
    pub termination_count: usize,

    /// Dangling neighbour references.
    pub fault_count: usize,
}

impl Layer {
    /// A layer with nothing cut at height `z`.
    #[must_use]
    pub const fn empty(index: usize, z: f64) -> Self {
        Self {
            index,
            z,
            regions: Vec::new(),
            bounds: None,
            segment_count: 0,
            degenerate: true,
            exploration_truncated: false,
            branch_count: 0,
            termination_count: 0,
            fault_count: 0,
        }
    }

    /// Check if the layer has no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Get the number of regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Whether any region failed to close.
    #[must_use]
    pub fn has_open_regions(&self) -> bool {
        self.regions.iter().any(|r| !r.closed)
    }

    /// Whether the topology diagnostics reported anything.
    #[must_use]
    pub const fn has_defects(&self) -> bool {
        self.branch_count + self.termination_count + self.fault_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(closed: bool) -> Region {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        Region::new(points, closed).unwrap_or_else(|| unreachable!())
    }

    #[test]
    fn test_region_measures() {
        let ring = square(true);
        assert_relative_eq!(ring.signed_area(), 4.0);
        assert_relative_eq!(ring.perimeter(), 8.0);
        assert_relative_eq!(ring.bounds.width(), 2.0);

        let chain = square(false);
        assert_relative_eq!(chain.area(), 0.0);
        assert_relative_eq!(chain.perimeter(), 6.0);
    }

    #[test]
    fn test_clockwise_ring_has_negative_signed_area() {
        let mut ring = square(true);
        ring.points.reverse();
        assert_relative_eq!(ring.signed_area(), -4.0);
        assert_relative_eq!(ring.area(), 4.0);
    }

    #[test]
    fn test_closed_ring_ends_where_it_starts() {
        let ring = square(true).closed_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(square(false).closed_ring().len(), 4);
    }

    #[test]
    fn test_region_rejects_short_rings() {
        let two = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert!(Region::new(two.clone(), true).is_none());
        assert!(Region::new(two, false).is_some());
        assert!(Region::new(Vec::new(), false).is_none());
    }

    #[test]
    fn test_empty_layer() {
        let layer = Layer::empty(3, 0.6);
        assert!(layer.is_empty());
        assert!(layer.degenerate);
        assert!(!layer.has_open_regions());
        assert!(!layer.has_defects());
        assert_eq!(layer.region_count(), 0);
    }
}
