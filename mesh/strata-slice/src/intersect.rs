//! Plane–triangle intersection.

use std::cmp::Ordering;

use strata_types::{Point3, Triangle};

use crate::canon::Canonicalizer;
use crate::geometry::{PointKey, Segment};

/// Outcome of cutting one triangle with one horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneHit {
    /// No contact, or a flat facet lying in the plane.
    Miss,
    /// The plane only touches a single point (usually a vertex).
    Touch(PointKey),
    /// The plane cuts the triangle along a segment.
    Cut(Segment),
}

impl PlaneHit {
    /// The segment, if the plane cuts the triangle.
    #[must_use]
    pub const fn segment(self) -> Option<Segment> {
        match self {
            Self::Cut(segment) => Some(segment),
            Self::Miss | Self::Touch(_) => None,
        }
    }
}

/// Up to six candidate points (two per edge), de-duplicated by key.
struct Candidates {
    points: [(PointKey, bool); 6],
    len: usize,
}

impl Candidates {
    const fn new() -> Self {
        Self {
            points: [(PointKey(0, 0), false); 6],
            len: 0,
        }
    }

    fn push(&mut self, key: PointKey, on_plane_vertex: bool) {
        if let Some(existing) = self.points[..self.len].iter_mut().find(|(k, _)| *k == key) {
            existing.1 |= on_plane_vertex;
            return;
        }
        self.points[self.len] = (key, on_plane_vertex);
        self.len += 1;
    }

    fn as_slice(&self) -> &[(PointKey, bool)] {
        &self.points[..self.len]
    }
}

/// Order edge endpoints by canonical height, then x, then y.
///
/// Two triangles sharing an edge then interpolate it from the same end, so
/// the edge's crossing point is bit-identical in both.
fn order_edge(
    p: (Point3<f64>, i64),
    q: (Point3<f64>, i64),
) -> ((Point3<f64>, i64), (Point3<f64>, i64)) {
    let ordering = p
        .1
        .cmp(&q.1)
        .then_with(|| p.0.x.total_cmp(&q.0.x))
        .then_with(|| p.0.y.total_cmp(&q.0.y));
    if ordering == Ordering::Greater {
        (q, p)
    } else {
        (p, q)
    }
}

/// Intersect `triangle` with the plane at height `z`.
///
/// Vertex heights are canonicalized before they are classified, so a vertex
/// within half a grid unit of `z` counts as lying on the plane. A triangle
/// whose three canonical heights are equal is a flat facet and never
/// contributes; its non-flat neighbours describe the boundary.
///
/// # Example
///
/// ```
/// use strata_slice::{Canonicalizer, PlaneHit, intersect};
/// use strata_types::Triangle;
///
/// let canon = Canonicalizer::default();
/// let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 2.0]);
///
/// assert!(matches!(intersect(&tri, 1.0, &canon), PlaneHit::Cut(_)));
/// assert!(matches!(intersect(&tri, 2.0, &canon), PlaneHit::Touch(_)));
/// assert_eq!(intersect(&tri, 3.0, &canon), PlaneHit::Miss);
/// ```
#[must_use]
pub fn intersect(triangle: &Triangle, z: f64, canon: &Canonicalizer) -> PlaneHit {
    let plane = canon.key(z);
    let plane_z = canon.value(plane);
    let vertices = triangle.vertices.map(|v| (v, canon.key(v.z)));

    if vertices[0].1 == vertices[1].1 && vertices[1].1 == vertices[2].1 {
        return PlaneHit::Miss;
    }

    let mut found = Candidates::new();
    for (i, &p) in vertices.iter().enumerate() {
        let q = vertices[(i + 1) % 3];
        let ((lo, lo_key), (hi, hi_key)) = order_edge(p, q);

        if plane < lo_key || plane > hi_key {
            continue;
        }

        if lo_key == hi_key {
            found.push(canon.point_key(lo.x, lo.y), true);
            found.push(canon.point_key(hi.x, hi.y), true);
        } else if plane == lo_key {
            found.push(canon.point_key(lo.x, lo.y), true);
        } else if plane == hi_key {
            found.push(canon.point_key(hi.x, hi.y), true);
        } else {
            let lo_z = canon.value(lo_key);
            let hi_z = canon.value(hi_key);
            let f = (plane_z - lo_z) / (hi_z - lo_z);
            let x = f.mul_add(hi.x - lo.x, lo.x);
            let y = f.mul_add(hi.y - lo.y, lo.y);
            found.push(canon.point_key(x, y), false);
        }
    }

    let above = vertices.iter().any(|v| v.1 > plane);
    let below = vertices.iter().any(|v| v.1 < plane);
    match *found.as_slice() {
        [] => PlaneHit::Miss,
        [(p, _)] => PlaneHit::Touch(p),
        [(p, p_on), (q, q_on)] => Segment::new(p, q, p_on && q_on)
            .map_or(PlaneHit::Miss, |s| PlaneHit::Cut(s.with_sides(above, below))),
        ref many => match farthest_pair(many) {
            PlaneHit::Cut(s) => PlaneHit::Cut(s.with_sides(above, below)),
            other => other,
        },
    }
}

/// Segment between the two candidates farthest apart; first pair wins ties.
fn farthest_pair(points: &[(PointKey, bool)]) -> PlaneHit {
    let mut best: Option<(i128, usize, usize)> = None;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = points[i].0.distance_squared(points[j].0);
            if best.is_none_or(|(bd, _, _)| d > bd) {
                best = Some((d, i, j));
            }
        }
    }
    best.and_then(|(_, i, j)| {
        let (p, p_on) = points[i];
        let (q, q_on) = points[j];
        Segment::new(p, q, p_on && q_on)
    })
    .map_or(PlaneHit::Miss, PlaneHit::Cut)
}
