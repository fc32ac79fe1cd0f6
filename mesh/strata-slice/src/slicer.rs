//! Main slicing implementation.
//!
//! Runs the full pipeline: build per-height segment sets, then for every
//! layer record topology diagnostics, assemble loops, clean them and turn
//! the survivors into regions.

use rayon::prelude::*;
use strata_types::{Triangle, TriangleSoup};
use tracing::{debug, info, warn};

use crate::assemble::assemble;
use crate::bounds::{Bounds2, ModelBounds};
use crate::builder::{build_layers, segments_at_height};
use crate::canon::{Canonicalizer, Precision};
use crate::clean::clean;
use crate::diagnostics::{Diagnostics, NeighborMap};
use crate::error::SliceResult;
use crate::geometry::Segment;
use crate::layer::{Layer, Region};
use crate::params::SliceParams;
use crate::result::SliceResult as SliceOutput;
use crate::simplify::merge_collinear;

/// Slice a mesh into layers.
///
/// # Arguments
///
/// * `mesh` - The triangle soup to slice
/// * `params` - Slicing parameters
///
/// # Returns
///
/// A [`SliceOutput`] with one layer per multiple of the layer height inside
/// the mesh's height range. An empty mesh gives an empty output.
///
/// # Errors
///
/// Returns an error for invalid parameters, non-finite vertices, coordinates
/// too large for the precision grid, or more layers than
/// [`SliceParams::max_layers`]. Mesh defects are never errors.
///
/// # Example
///
/// ```
/// use strata_slice::{Point3, SliceParams, slice_mesh};
/// use strata_types::TriangleSoup;
///
/// let cube = TriangleSoup::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
/// let output = slice_mesh(&cube, &SliceParams::default().with_layer_height(0.5)).unwrap();
/// assert_eq!(output.layer_count(), 3);
/// assert_eq!(output.non_degenerate_layers().count(), 1);
/// ```
pub fn slice_mesh(mesh: &TriangleSoup, params: &SliceParams) -> SliceResult<SliceOutput> {
    slice_triangles(&mesh.triangles, params)
}

/// Slice raw triangles with default parameters apart from `step` and
/// `precision`.
///
/// # Errors
///
/// Same as [`slice_mesh`].
pub fn slice(triangles: &[Triangle], step: f64, precision: Precision) -> SliceResult<SliceOutput> {
    let params = SliceParams::default()
        .with_layer_height(step)
        .with_precision(precision);
    slice_triangles(triangles, &params)
}

/// Slice a mesh at one height only.
///
/// `z` need not be a multiple of the layer height. The layer has index 0.
///
/// # Errors
///
/// Same as [`slice_mesh`], except that the layer cap does not apply.
///
/// # Example
///
/// ```
/// use strata_slice::{Point3, SliceParams, slice_at_height};
/// use strata_types::TriangleSoup;
///
/// let cube = TriangleSoup::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 10.0));
/// let layer = slice_at_height(&cube, 5.0, &SliceParams::default()).unwrap();
/// assert_eq!(layer.region_count(), 1);
/// assert!(layer.regions[0].area() > 99.0);
/// ```
pub fn slice_at_height(mesh: &TriangleSoup, z: f64, params: &SliceParams) -> SliceResult<Layer> {
    params.validate()?;
    let canon = Canonicalizer::new(params.precision)?;
    let z = canon.canon(z);
    let segments = segments_at_height(&mesh.triangles, z, &canon, params.parallel)?;
    let (layer, _) = process_layer(0, z, &segments, &canon, params);
    Ok(layer)
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn slice_triangles(triangles: &[Triangle], params: &SliceParams) -> SliceResult<SliceOutput> {
    params.validate()?;
    let canon = Canonicalizer::new(params.precision)?;

    info!(
        triangles = triangles.len(),
        layer_height = params.layer_height,
        precision = %params.precision,
        parallel = params.parallel,
        "Starting mesh slicing"
    );

    let raw = build_layers(
        triangles,
        params.layer_height,
        &canon,
        params.parallel,
        params.max_layers,
    )?;
    if raw.is_empty() {
        info!("Nothing to slice");
        return Ok(SliceOutput::empty(params.clone()));
    }

    let processed: Vec<(Layer, Diagnostics)> = if params.parallel {
        raw.par_iter()
            .enumerate()
            .map(|(i, l)| process_layer(i, l.z, &l.segments, &canon, params))
            .collect()
    } else {
        raw.iter()
            .enumerate()
            .map(|(i, l)| process_layer(i, l.z, &l.segments, &canon, params))
            .collect()
    };

    let mut layers = Vec::with_capacity(processed.len());
    let mut diagnostics = Diagnostics::default();
    for (layer, mut reports) in processed {
        diagnostics.append(&mut reports);
        layers.push(layer);
    }

    let bounds = match (layers.first(), layers.last()) {
        (Some(bottom), Some(top)) => Some(ModelBounds {
            bottom: bottom.z,
            top: top.z,
            plan: Bounds2::union_all(layers.iter().filter_map(|l| l.bounds.as_ref())),
        }),
        _ => None,
    };

    let output = SliceOutput {
        layers,
        bounds,
        diagnostics,
        params: params.clone(),
    };
    info!(
        layers = output.layer_count(),
        regions = output.region_count(),
        defects = output.diagnostics.len(),
        "Slicing complete"
    );
    Ok(output)
}

/// Turn one layer's segments into regions.
fn process_layer(
    index: usize,
    z: f64,
    segments: &[Segment],
    canon: &Canonicalizer,
    params: &SliceParams,
) -> (Layer, Diagnostics) {
    let diagnostics = NeighborMap::from_segments(segments).analyze(z, canon);

    let assembly = assemble(segments, params.max_branch_states);
    if assembly.truncated {
        warn!(
            layer = index,
            z,
            forks = assembly.forks,
            "Branch exploration truncated"
        );
    }

    let regions: Vec<Region> = clean(assembly.candidates)
        .into_iter()
        .filter_map(|candidate| {
            let keys = if params.merge_collinear {
                merge_collinear(&candidate.points, candidate.closed)
            } else {
                candidate.points
            };
            let points = keys.into_iter().map(|k| canon.point(k)).collect();
            Region::new(points, candidate.closed)
        })
        .collect();

    if !diagnostics.is_empty() {
        warn!(layer = index, z, %diagnostics, "Layer has topology defects");
    }
    debug!(
        layer = index,
        z,
        segments = segments.len(),
        regions = regions.len(),
        "Processed layer"
    );

    let layer = Layer {
        index,
        z,
        bounds: Bounds2::union_all(regions.iter().map(|r| &r.bounds)),
        degenerate: regions.is_empty() || !segments.iter().any(Segment::spans_plane),
        regions,
        segment_count: segments.len(),
        exploration_truncated: assembly.truncated,
        branch_count: diagnostics.branches.len(),
        termination_count: diagnostics.terminations.len(),
        fault_count: diagnostics.faults.len(),
    };
    (layer, diagnostics)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::SliceError;
    use approx::assert_relative_eq;
    use strata_types::Point3;

    fn create_test_cube() -> TriangleSoup {
        TriangleSoup::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 10.0))
    }

    #[test]
    fn test_slice_mesh() {
        let mesh = create_test_cube();
        let result = slice_mesh(&mesh, &SliceParams::default().with_layer_height(1.0)).unwrap();

        assert_eq!(result.layer_count(), 11);
        let bounds = result.bounds.unwrap();
        assert_relative_eq!(bounds.height(), 10.0);
        assert_relative_eq!(bounds.plan.unwrap().width(), 10.0);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_only_interior_layers_are_real() {
        let mesh = create_test_cube();
        let result = slice_mesh(&mesh, &SliceParams::default().with_layer_height(2.5)).unwrap();

        let real: Vec<f64> = result.non_degenerate_layers().map(|l| l.z).collect();
        assert_eq!(real, vec![2.5, 5.0, 7.5]);
        assert!(result.layers[0].degenerate);
        assert!(result.layers[4].degenerate);
    }

    #[test]
    fn test_collinear_merge() {
        let mesh = create_test_cube();
        let merged = slice_at_height(&mesh, 5.0, &SliceParams::default()).unwrap();
        assert_eq!(merged.regions[0].len(), 4);

        let raw = slice_at_height(&mesh, 5.0, &SliceParams::exact()).unwrap();
        assert_eq!(raw.regions[0].len(), 8);
        assert_relative_eq!(raw.regions[0].area(), merged.regions[0].area());
    }

    #[test]
    fn test_slice_at_height_between_layers() {
        let mesh = create_test_cube();
        let layer = slice_at_height(&mesh, 3.33, &SliceParams::default()).unwrap();

        assert_eq!(layer.index, 0);
        assert_eq!(layer.z, 3.33);
        assert!(!layer.degenerate);
        assert_relative_eq!(layer.regions[0].perimeter(), 40.0);
    }

    #[test]
    fn test_empty_mesh_slice() {
        let result = slice_mesh(&TriangleSoup::new(), &SliceParams::default()).unwrap();
        assert!(result.is_empty());
        assert!(result.bounds.is_none());
    }

    #[test]
    fn test_slice_with_precision() {
        let mesh = create_test_cube();
        let triangles: Vec<Triangle> = mesh.iter().copied().collect();
        let result = slice(&triangles, 5.0, Precision::Epsilon(0.001)).unwrap();

        assert_eq!(result.layer_count(), 3);
        assert_eq!(result.params.precision, Precision::Epsilon(0.001));
    }

    #[test]
    fn test_invalid_params() {
        let mesh = create_test_cube();
        assert_eq!(
            slice_mesh(&mesh, &SliceParams::default().with_layer_height(0.0)),
            Err(SliceError::InvalidLayerHeight(0.0))
        );
        assert_eq!(
            slice_at_height(&mesh, 1.0, &SliceParams::default().with_max_branch_states(0)),
            Err(SliceError::InvalidBranchLimit)
        );
    }
}
