//! Unindexed triangle collection.

use crate::{Aabb, Triangle};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle soup: facets with no shared vertex indexing.
///
/// This is what STL files describe. Two facets that share an edge each store
/// their own copy of the edge's vertices, so adjacency is only implied by
/// equal coordinates.
///
/// # Example
///
/// ```
/// use strata_types::{Point3, TriangleSoup};
///
/// let cube = TriangleSoup::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
/// assert_eq!(cube.len(), 12);
/// assert_eq!(cube.z_range(), Some((0.0, 1.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleSoup {
    /// Name of the solid, when the source provides one.
    pub name: Option<String>,

    /// The facets, in source order.
    pub triangles: Vec<Triangle>,
}

impl TriangleSoup {
    /// Create an empty soup.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            triangles: Vec::new(),
        }
    }

    /// Create an empty soup with room for `capacity` facets.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            name: None,
            triangles: Vec::with_capacity(capacity),
        }
    }

    /// Create a soup from existing facets.
    #[inline]
    #[must_use]
    pub const fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            name: None,
            triangles,
        }
    }

    /// Number of facets.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the soup has no facets.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterate over the facets.
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Append a facet.
    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append a planar quad `a, b, c, d` (counter-clockwise) as the two
    /// triangles `a, b, c` and `a, c, d`.
    pub fn push_quad(&mut self, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>, d: Point3<f64>) {
        self.triangles.push(Triangle::new(a, b, c));
        self.triangles.push(Triangle::new(a, c, d));
    }

    /// Bounding box over every vertex. Empty for an empty soup.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.triangles.iter().flat_map(|t| t.vertices.iter()))
    }

    /// `(min_z, max_z)` over every vertex, or `None` for an empty soup.
    #[must_use]
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let bounds = self.bounds();
        if bounds.is_empty() {
            None
        } else {
            Some((bounds.min.z, bounds.max.z))
        }
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for triangle in &mut self.triangles {
            for v in &mut triangle.vertices {
                *v += offset;
            }
        }
    }

    /// A closed axis-aligned box between two corners, 12 outward-facing
    /// triangles.
    #[must_use]
    pub fn cuboid(a: Point3<f64>, b: Point3<f64>) -> Self {
        let bounds = Aabb::new(a, b);
        let (lo, hi) = (bounds.min, bounds.max);
        let corner = |bits: u8| {
            Point3::new(
                if bits & 0b100 == 0 { lo.x } else { hi.x },
                if bits & 0b010 == 0 { lo.y } else { hi.y },
                if bits & 0b001 == 0 { lo.z } else { hi.z },
            )
        };

        // Corner bits read as `xyz`: 0b101 is (max x, min y, max z)
        let faces: [[u8; 4]; 6] = [
            [0b000, 0b010, 0b110, 0b100], // bottom
            [0b001, 0b101, 0b111, 0b011], // top
            [0b000, 0b100, 0b101, 0b001], // front
            [0b010, 0b011, 0b111, 0b110], // back
            [0b000, 0b001, 0b011, 0b010], // left
            [0b100, 0b110, 0b111, 0b101], // right
        ];

        let mut soup = Self::with_capacity(12);
        for [a, b, c, d] in faces {
            soup.push_quad(corner(a), corner(b), corner(c), corner(d));
        }
        soup
    }
}

impl FromIterator<Triangle> for TriangleSoup {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self::from_triangles(iter.into_iter().collect())
    }
}

impl Extend<Triangle> for TriangleSoup {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        self.triangles.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TriangleSoup {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

impl IntoIterator for TriangleSoup {
    type Item = Triangle;
    type IntoIter = std::vec::IntoIter<Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.into_iter()
    }
}
