//! Core mesh types for the strata slicer.
//!
//! This crate provides the value types shared by ingestion and slicing:
//!
//! - [`Triangle`] - One facet: a normal and three vertex positions
//! - [`TriangleSoup`] - An unindexed collection of facets, as read from STL
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Layer 0 Crate
//!
//! This crate depends only on `nalgebra` (and optionally `serde`). It can be
//! used from CLI tools, servers or WASM without pulling in the slicer.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**:
//! - X: width (left/right)
//! - Y: depth (back/front)
//! - Z: height (up/down, print direction)
//!
//! # Example
//!
//! ```
//! use strata_types::{Point3, Triangle, TriangleSoup};
//!
//! let mut soup = TriangleSoup::new();
//! soup.push(Triangle::new(
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 1.0),
//! ));
//!
//! assert_eq!(soup.len(), 1);
//! assert_eq!(soup.z_range(), Some((0.0, 1.0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod soup;
mod triangle;

pub use bounds::Aabb;
pub use soup::TriangleSoup;
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
