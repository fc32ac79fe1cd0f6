//! Plane slicing of triangle soups into closed 2D loops.
//!
//! This crate cuts a triangulated surface at regular heights and turns each
//! height's unordered segments into polygon regions, reporting where the mesh
//! is not a clean 2-manifold.
//!
//! # Features
//!
//! - **Canonicalization**: every coordinate snaps to an integer grid
//!   ([`Precision`]), so shared edges produce identical points
//! - **Plane intersection**: flat facets are skipped, grazing edges flagged
//! - **Layer building**: triangles are cut in parallel with `rayon`
//! - **Loop assembly**: exhaustive branch exploration with a state cap
//! - **Loop cleaning**: duplicate and stitched loops are removed
//! - **Diagnostics**: branches, terminations and faults per layer
//!
//! # Pipeline
//!
//! ```text
//! TriangleSoup -> build_layers -> assemble -> clean -> merge_collinear -> SliceOutput
//! ```
//!
//! # Example
//!
//! ```
//! use strata_slice::{Point3, SliceParams, slice_mesh};
//! use strata_types::TriangleSoup;
//!
//! let cube = TriangleSoup::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
//! let output = slice_mesh(&cube, &SliceParams::default().with_layer_height(0.5)).unwrap();
//!
//! let middle = output.layer_at_height(0.5).unwrap();
//! assert_eq!(middle.regions.len(), 1);
//! assert_eq!(middle.regions[0].points.len(), 4);
//! assert!(middle.regions[0].closed);
//! println!("{output}");
//! ```
//!
//! # Layer 1 Crate
//!
//! Depends on `strata-types` only; mesh ingestion lives in `strata-stl`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod assemble;
mod bounds;
mod builder;
mod canon;
mod clean;
mod diagnostics;
mod error;
mod geometry;
mod intersect;
mod layer;
mod params;
mod result;
mod simplify;
mod slicer;

// Re-export main types and functions
pub use assemble::{Assembly, Candidate, assemble};
pub use bounds::{Bounds2, ModelBounds};
pub use builder::{LayerSegments, build_layers, layer_heights, segments_at_height};
pub use canon::{Canonicalizer, MAX_DECIMALS, Precision};
pub use clean::clean;
pub use diagnostics::{Diagnostics, Fault, Junction, NeighborMap};
pub use error::{SliceError, SliceResult};
pub use geometry::{Point, PointKey, Segment};
pub use intersect::{PlaneHit, intersect};
pub use layer::{Layer, Region};
pub use params::SliceParams;
pub use result::SliceResult as SliceOutput;
pub use simplify::merge_collinear;
pub use slicer::{slice, slice_at_height, slice_mesh};

// Re-export mesh types for convenience
pub use strata_types::{Point3, Triangle, TriangleSoup};
