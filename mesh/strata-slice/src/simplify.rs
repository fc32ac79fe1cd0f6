//! Collinear point merging.
//!
//! Adjacent side-face triangles cut a straight wall into several collinear
//! pieces. Merging drops every point that lies on the straight line between
//! its neighbours, within one grid unit.

use crate::geometry::PointKey;

/// Whether `p` lies strictly between `a` and `b`, at most one grid unit off
/// the line through them.
fn is_between(a: PointKey, p: PointKey, b: PointKey) -> bool {
    let (ax, ay) = (i128::from(a.0), i128::from(a.1));
    let (px, py) = (i128::from(p.0), i128::from(p.1));
    let (bx, by) = (i128::from(b.0), i128::from(b.1));

    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0 {
        return false;
    }

    let cross = dx * (py - ay) - dy * (px - ax);
    let ahead = dx * (px - ax) + dy * (py - ay);
    let behind = dx * (bx - px) + dy * (by - py);

    // distance = |cross| / len <= 1  <=>  cross^2 <= len^2
    ahead > 0 && behind > 0 && cross.checked_mul(cross).is_some_and(|c2| c2 <= len_sq)
}

/// Drop collinear interior points from a chain or ring.
///
/// Open chains keep both endpoints. Closed rings are examined across the
/// wrap-around as well, and a ring reduced below three points comes back
/// empty.
///
/// # Example
///
/// ```
/// use strata_slice::{PointKey, merge_collinear};
///
/// let ring = [PointKey(0, 0), PointKey(5, 0), PointKey(10, 0), PointKey(10, 10), PointKey(0, 10)];
/// assert_eq!(merge_collinear(&ring, true).len(), 4);
/// ```
#[must_use]
pub fn merge_collinear(points: &[PointKey], closed: bool) -> Vec<PointKey> {
    let mut out: Vec<PointKey> = Vec::with_capacity(points.len());
    for &p in points {
        while let &[.., a, m] = out.as_slice() {
            if is_between(a, m, p) {
                out.pop();
            } else {
                break;
            }
        }
        out.push(p);
    }

    if !closed {
        return out;
    }

    loop {
        let n = out.len();
        if n < 3 {
            return Vec::new();
        }
        if is_between(out[n - 2], out[n - 1], out[0]) {
            out.pop();
        } else if is_between(out[n - 1], out[0], out[1]) {
            out.remove(0);
        } else {
            return out;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(points: &[(i64, i64)]) -> Vec<PointKey> {
        points.iter().map(|&(x, y)| PointKey(x, y)).collect()
    }

    #[test]
    fn octagon_of_midpoints_becomes_square() {
        let ring = keys(&[
            (0, 0),
            (0, 5),
            (0, 10),
            (5, 10),
            (10, 10),
            (10, 5),
            (10, 0),
            (5, 0),
        ]);
        assert_eq!(
            merge_collinear(&ring, true),
            keys(&[(0, 0), (0, 10), (10, 10), (10, 0)])
        );
    }

    #[test]
    fn ring_starting_mid_edge() {
        let ring = keys(&[(5, 0), (0, 0), (0, 10), (10, 10), (10, 0)]);
        assert_eq!(
            merge_collinear(&ring, true),
            keys(&[(0, 0), (0, 10), (10, 10), (10, 0)])
        );
    }

    #[test]
    fn open_chain_keeps_endpoints() {
        let chain = keys(&[(0, 0), (3, 0), (6, 0), (6, 4)]);
        assert_eq!(merge_collinear(&chain, false), keys(&[(0, 0), (6, 0), (6, 4)]));
    }

    #[test]
    fn near_collinear_within_one_unit() {
        let chain = keys(&[(0, 0), (500, 1), (1000, 0)]);
        assert_eq!(merge_collinear(&chain, false), keys(&[(0, 0), (1000, 0)]));

        let chain = keys(&[(0, 0), (500, 3), (1000, 0)]);
        assert_eq!(merge_collinear(&chain, false).len(), 3);
    }

    #[test]
    fn backtracking_point_is_kept() {
        // (10, 0) is collinear but not between its neighbours.
        let chain = keys(&[(0, 0), (10, 0), (5, 0)]);
        assert_eq!(merge_collinear(&chain, false).len(), 3);
    }

    #[test]
    fn degenerate_ring_is_dropped() {
        let ring = keys(&[(0, 0), (5, 0), (10, 0)]);
        assert!(merge_collinear(&ring, true).is_empty());
    }
}
