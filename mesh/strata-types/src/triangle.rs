//! Triangle type for facets read from a mesh file.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One triangular facet of a mesh.
///
/// Facets are stored unindexed: each carries its own three vertex positions
/// plus the normal declared by the source file. The normal is informational;
/// slicing only looks at the vertices.
///
/// # Example
///
/// ```
/// use strata_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// assert!((tri.normal.z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// Facet normal as declared by the source (zero when unknown).
    pub normal: Vector3<f64>,
    /// The three vertices, counter-clockwise seen from outside.
    pub vertices: [Point3<f64>; 3],
}

impl Triangle {
    /// Create a triangle from three points, computing its normal from the
    /// winding order.
    ///
    /// Degenerate triangles get a zero normal.
    #[must_use]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        let vertices = [v0, v1, v2];
        let normal = Self::winding_normal(&vertices).unwrap_or_else(Vector3::zeros);
        Self { normal, vertices }
    }

    /// Create a triangle with an explicit normal, as read from a file.
    #[inline]
    #[must_use]
    pub const fn with_normal(normal: Vector3<f64>, vertices: [Point3<f64>; 3]) -> Self {
        Self { normal, vertices }
    }

    /// Create a triangle from coordinate arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use strata_types::Triangle;
    ///
    /// let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
    /// assert_eq!(tri.z_range(), (0.0, 1.0));
    /// ```
    #[must_use]
    pub fn from_arrays(v0: [f64; 3], v1: [f64; 3], v2: [f64; 3]) -> Self {
        Self::new(Point3::from(v0), Point3::from(v1), Point3::from(v2))
    }

    fn winding_normal(vertices: &[Point3<f64>; 3]) -> Option<Vector3<f64>> {
        let n = (vertices[1] - vertices[0]).cross(&(vertices[2] - vertices[0]));
        let len_sq = n.norm_squared();
        if len_sq > f64::EPSILON {
            Some(n / len_sq.sqrt())
        } else {
            None
        }
    }

    /// Unit normal computed from the vertex winding.
    ///
    /// Returns `None` for degenerate (zero-area) triangles. This ignores the
    /// declared [`normal`](Self::normal), which files often get wrong.
    #[must_use]
    pub fn computed_normal(&self) -> Option<Vector3<f64>> {
        Self::winding_normal(&self.vertices)
    }

    /// Area of the triangle.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        let [v0, v1, v2] = self.vertices;
        (v1 - v0).cross(&(v2 - v0)).norm() * 0.5
    }

    /// Lowest vertex height.
    #[inline]
    #[must_use]
    pub fn min_z(&self) -> f64 {
        let [v0, v1, v2] = self.vertices;
        v0.z.min(v1.z).min(v2.z)
    }

    /// Highest vertex height.
    #[inline]
    #[must_use]
    pub fn max_z(&self) -> f64 {
        let [v0, v1, v2] = self.vertices;
        v0.z.max(v1.z).max(v2.z)
    }

    /// `(min_z, max_z)` of the triangle.
    #[inline]
    #[must_use]
    pub fn z_range(&self) -> (f64, f64) {
        (self.min_z(), self.max_z())
    }

    /// Whether all three vertices share exactly the same height.
    #[inline]
    #[must_use]
    #[allow(clippy::float_cmp)] // exact comparison is the definition of a flat facet
    pub fn is_horizontal(&self) -> bool {
        let [v0, v1, v2] = self.vertices;
        v0.z == v1.z && v1.z == v2.z
    }

    /// Whether every vertex coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.x.is_finite() && v.y.is_finite() && v.z.is_finite())
    }

    /// The three edges as `(start, end)` pairs: `v0→v1`, `v1→v2`, `v2→v0`.
    #[must_use]
    pub fn edges(&self) -> [(Point3<f64>, Point3<f64>); 3] {
        let [v0, v1, v2] = self.vertices;
        [(v0, v1), (v1, v2), (v2, v0)]
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_computes_normal_from_winding() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        assert_relative_eq!(tri.normal.z, -1.0);
    }

    #[test]
    fn degenerate_triangle_has_zero_normal() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert_eq!(tri.normal, Vector3::zeros());
        assert!(tri.computed_normal().is_none());
        assert_relative_eq!(tri.area(), 0.0);
    }

    #[test]
    fn declared_normal_is_kept() {
        let declared = Vector3::new(0.0, 0.0, 5.0);
        let tri = Triangle::with_normal(
            declared,
            [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
        );
        assert_eq!(tri.normal, declared);
        assert_relative_eq!(tri.computed_normal().map_or(0.0, |n| n.z), 1.0);
    }

    #[test]
    fn z_range_and_flatness() {
        let tri = Triangle::from_arrays([0.0, 0.0, 2.0], [1.0, 0.0, -1.0], [0.0, 1.0, 0.5]);
        assert_eq!(tri.z_range(), (-1.0, 2.0));
        assert!(!tri.is_horizontal());

        let flat = Triangle::from_arrays([0.0, 0.0, 3.0], [1.0, 0.0, 3.0], [0.0, 1.0, 3.0]);
        assert!(flat.is_horizontal());
    }

    #[test]
    fn non_finite_detection() {
        let tri = Triangle::from_arrays([0.0, 0.0, f64::NAN], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(!tri.is_finite());
        let ok = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(ok.is_finite());
    }

    #[test]
    fn edges_cycle_through_vertices() {
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let edges = tri.edges();
        assert_eq!(edges[0].0, tri.vertices[0]);
        assert_eq!(edges[2].1, tri.vertices[0]);
    }
}
