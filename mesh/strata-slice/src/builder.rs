//! Layer builder: cuts every triangle at every sample height it spans.

// Layer indices fit comfortably in i64/usize for any mesh that passes the
// layer cap.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use rayon::prelude::*;
use strata_types::Triangle;
use tracing::debug;

use crate::canon::Canonicalizer;
use crate::error::{SliceError, SliceResult};
use crate::geometry::Segment;
use crate::intersect::intersect;

/// Ratios this close to an integer are treated as that integer.
const SNAP: f64 = 1e-9;

/// Segments collected at one sample height.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSegments {
    /// Multiple of the layer height this layer sits at (`z = k * step`).
    pub ordinal: i64,
    /// Canonical sample height.
    pub z: f64,
    /// Sorted, de-duplicated segments.
    pub segments: Vec<Segment>,
}

fn tolerant_ceil(ratio: f64) -> f64 {
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= SNAP {
        nearest
    } else {
        ratio.ceil()
    }
}

fn tolerant_floor(ratio: f64) -> f64 {
    let nearest = ratio.round();
    if (ratio - nearest).abs() <= SNAP {
        nearest
    } else {
        ratio.floor()
    }
}

/// Inclusive range of ordinals `k` with `lo <= k * step <= hi`.
fn ordinal_range(lo: f64, hi: f64, step: f64) -> Option<(i64, i64)> {
    let first = tolerant_ceil(lo / step) as i64;
    let last = tolerant_floor(hi / step) as i64;
    (first <= last).then_some((first, last))
}

fn height(ordinal: i64, step: f64, canon: &Canonicalizer) -> f64 {
    canon.canon(ordinal as f64 * step)
}

/// Sample heights between `z_min` and `z_max`, inclusive.
///
/// Heights are the canonical multiples of `step` inside the range. A range
/// bound within `1e-9` steps of a multiple includes that multiple.
///
/// # Example
///
/// ```
/// use strata_slice::{Canonicalizer, layer_heights};
///
/// let canon = Canonicalizer::default();
/// assert_eq!(layer_heights(0.0, 0.9, 0.3, &canon), vec![0.0, 0.3, 0.6, 0.9]);
/// assert_eq!(layer_heights(0.05, 0.25, 0.1, &canon), vec![0.1, 0.2]);
/// ```
#[must_use]
pub fn layer_heights(z_min: f64, z_max: f64, step: f64, canon: &Canonicalizer) -> Vec<f64> {
    ordinal_range(z_min, z_max, step)
        .map(|(first, last)| (first..=last).map(|k| height(k, step, canon)).collect())
        .unwrap_or_default()
}

/// Segments a single triangle contributes, tagged with their layer slot.
fn triangle_hits<'a>(
    triangle: &'a Triangle,
    range: (i64, i64),
    step: f64,
    canon: &'a Canonicalizer,
) -> impl Iterator<Item = (usize, Segment)> + 'a {
    let (first, last) = range;
    let lo = canon.canon(triangle.min_z());
    let hi = canon.canon(triangle.max_z());
    ordinal_range(lo, hi, step)
        .map(|(a, b)| (a.max(first), b.min(last)))
        .into_iter()
        .flat_map(|(a, b)| a..=b)
        .filter_map(move |k| {
            let z = height(k, step, canon);
            intersect(triangle, z, canon)
                .segment()
                .map(|segment| ((k - first) as usize, segment))
        })
}

/// Reject non-finite and out-of-grid vertices; returns the vertex height
/// range, `None` for no triangles.
fn checked_z_range(
    triangles: &[Triangle],
    canon: &Canonicalizer,
) -> SliceResult<Option<(f64, f64)>> {
    if let Some(triangle) = triangles.iter().position(|t| !t.is_finite()) {
        return Err(SliceError::NonFiniteVertex { triangle });
    }

    let mut z_min = f64::INFINITY;
    let mut z_max = f64::NEG_INFINITY;
    for v in triangles.iter().flat_map(|t| t.vertices.iter()) {
        if !(canon.fits(v.x) && canon.fits(v.y) && canon.fits(v.z)) {
            return Err(SliceError::InvalidPrecision(format!(
                "coordinate ({}, {}, {}) is too large for {}",
                v.x,
                v.y,
                v.z,
                canon.precision()
            )));
        }
        z_min = z_min.min(v.z);
        z_max = z_max.max(v.z);
    }
    Ok((!triangles.is_empty()).then_some((z_min, z_max)))
}

fn sort_and_dedup<T: Ord + Send>(
    items: &mut Vec<T>,
    parallel: bool,
    same: impl FnMut(&mut T, &mut T) -> bool,
) {
    if parallel {
        items.par_sort_unstable();
    } else {
        items.sort_unstable();
    }
    items.dedup_by(same);
}

/// Sorted, de-duplicated segments of `triangles` cut at the single height `z`.
///
/// `z` is canonicalized first. Vertices are checked the same way as in
/// [`build_layers`].
///
/// # Errors
///
/// Returns [`SliceError::NonFiniteVertex`] or [`SliceError::InvalidPrecision`]
/// for unusable vertex coordinates.
pub fn segments_at_height(
    triangles: &[Triangle],
    z: f64,
    canon: &Canonicalizer,
    parallel: bool,
) -> SliceResult<Vec<Segment>> {
    checked_z_range(triangles, canon)?;
    let z = canon.canon(z);
    let cut = |t: &Triangle| intersect(t, z, canon).segment();

    let mut segments: Vec<Segment> = if parallel {
        triangles.par_iter().filter_map(cut).collect()
    } else {
        triangles.iter().filter_map(cut).collect()
    };
    sort_and_dedup(&mut segments, parallel, |next, kept| {
        let same = next.endpoints() == kept.endpoints();
        if same {
            kept.absorb(next);
        }
        same
    });
    Ok(segments)
}

/// Cut `triangles` at every multiple of `step` inside their height range.
///
/// Returns one entry per sample height, bottom to top, including heights
/// where nothing was cut. The result does not depend on triangle order or on
/// `parallel`.
///
/// # Errors
///
/// Returns [`SliceError::NonFiniteVertex`] for NaN or infinite coordinates,
/// [`SliceError::InvalidPrecision`] when coordinates overflow the key grid,
/// and [`SliceError::TooManyLayers`] when the range needs more than
/// `max_layers` heights.
pub fn build_layers(
    triangles: &[Triangle],
    step: f64,
    canon: &Canonicalizer,
    parallel: bool,
    max_layers: usize,
) -> SliceResult<Vec<LayerSegments>> {
    let Some((z_min, z_max)) = checked_z_range(triangles, canon)? else {
        return Ok(Vec::new());
    };

    let Some(range) = ordinal_range(canon.canon(z_min), canon.canon(z_max), step) else {
        debug!(z_min, z_max, step, "No sample height inside the model");
        return Ok(Vec::new());
    };
    let (first, last) = range;

    let count = i128::from(last) - i128::from(first) + 1;
    if count > max_layers as i128 {
        return Err(SliceError::TooManyLayers {
            count: u64::try_from(count).unwrap_or(u64::MAX),
            limit: max_layers,
        });
    }

    let mut hits: Vec<(usize, Segment)> = if parallel {
        triangles
            .par_iter()
            .flat_map_iter(|t| triangle_hits(t, range, step, canon))
            .collect()
    } else {
        triangles
            .iter()
            .flat_map(|t| triangle_hits(t, range, step, canon))
            .collect()
    };

    sort_and_dedup(&mut hits, parallel, |next, kept| {
        let same = next.0 == kept.0 && next.1.endpoints() == kept.1.endpoints();
        if same {
            kept.1.absorb(&next.1);
        }
        same
    });

    let mut layers: Vec<LayerSegments> = (first..=last)
        .map(|ordinal| LayerSegments {
            ordinal,
            z: height(ordinal, step, canon),
            segments: Vec::new(),
        })
        .collect();
    for (slot, segment) in hits {
        layers[slot].segments.push(segment);
    }

    debug!(
        layers = layers.len(),
        segments = layers.iter().map(|l| l.segments.len()).sum::<usize>(),
        "Built layer segments"
    );
    Ok(layers)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use strata_types::{Point3, TriangleSoup};

    fn unit_cube() -> TriangleSoup {
        TriangleSoup::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn heights_snap_to_multiples() {
        let canon = Canonicalizer::default();
        assert_eq!(layer_heights(0.0, 1.0, 0.5, &canon), vec![0.0, 0.5, 1.0]);
        assert_eq!(layer_heights(0.3, 0.3, 0.1, &canon), vec![0.3]);
        assert_eq!(layer_heights(-0.25, 0.25, 0.2, &canon), vec![-0.2, 0.0, 0.2]);
        assert!(layer_heights(0.01, 0.09, 0.1, &canon).is_empty());
    }

    #[test]
    fn cube_layers() {
        let canon = Canonicalizer::default();
        let cube = unit_cube();
        let layers = build_layers(&cube.triangles, 0.5, &canon, false, 100).unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[1].z, 0.5);
        assert_eq!(layers[1].ordinal, 1);
        // Four side faces, two triangles each.
        assert_eq!(layers[1].segments.len(), 8);
        assert!(layers[1].segments.iter().all(|s| !s.grazing));
        // Bottom rim comes from side triangles with an edge in the plane,
        // all of them above it.
        assert_eq!(layers[0].segments.len(), 4);
        assert!(layers[0].segments.iter().all(|s| s.grazing && !s.below));
        assert!(layers[2].segments.iter().all(|s| s.grazing && !s.above));
    }

    #[test]
    fn triangle_order_does_not_matter() {
        let canon = Canonicalizer::default();
        let cube = unit_cube();
        let mut reversed = cube.triangles.clone();
        reversed.reverse();
        let a = build_layers(&cube.triangles, 0.25, &canon, false, 100).unwrap();
        let b = build_layers(&reversed, 0.25, &canon, true, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_triangles_are_merged() {
        let canon = Canonicalizer::default();
        let tri = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let layers = build_layers(&[tri, tri], 0.5, &canon, false, 100).unwrap();
        assert_eq!(layers[1].segments.len(), 1);
    }

    #[test]
    fn shared_in_plane_edge_reaches_both_sides() {
        // Two triangles hinged on the edge (0,0,0)-(1,0,0), one rising and one
        // falling away from the plane z = 0.
        let canon = Canonicalizer::default();
        let up = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 1.0]);
        let down = Triangle::from_arrays([1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, -1.0, -1.0]);
        for parallel in [false, true] {
            let layers = build_layers(&[down, up], 1.0, &canon, parallel, 100).unwrap();
            let rim = &layers[1].segments;
            assert_eq!(layers[1].z, 0.0);
            assert_eq!(rim.len(), 1);
            assert!(rim[0].grazing && rim[0].spans_plane());

            let segments = segments_at_height(&[up, down], 0.0, &canon, parallel).unwrap();
            assert_eq!(segments.as_slice(), rim.as_slice());
        }
    }

    #[test]
    fn errors() {
        let canon = Canonicalizer::default();
        let bad = Triangle::from_arrays([0.0, 0.0, f64::NAN], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let ok = Triangle::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert_eq!(
            build_layers(&[ok, bad], 0.5, &canon, false, 100),
            Err(SliceError::NonFiniteVertex { triangle: 1 })
        );
        assert!(matches!(
            build_layers(&[ok], 0.001, &canon, false, 100),
            Err(SliceError::TooManyLayers {
                count: 1001,
                limit: 100
            })
        ));
        let huge = Triangle::from_arrays([0.0, 0.0, 0.0], [1e12, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert!(matches!(
            build_layers(&[huge], 0.5, &canon, false, 100),
            Err(SliceError::InvalidPrecision(_))
        ));
    }

    #[test]
    fn empty_input() {
        let canon = Canonicalizer::default();
        assert!(build_layers(&[], 0.2, &canon, true, 10).unwrap().is_empty());
    }

    #[test]
    fn single_height() {
        let canon = Canonicalizer::default();
        let cube = unit_cube();
        let segments = segments_at_height(&cube.triangles, 0.5, &canon, true).unwrap();
        assert_eq!(segments.len(), 8);
        assert!(segments.windows(2).all(|w| w[0] < w[1]));
        assert!(segments_at_height(&cube.triangles, 2.0, &canon, false).unwrap().is_empty());
    }
}
