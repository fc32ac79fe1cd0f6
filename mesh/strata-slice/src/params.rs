//! Slicing parameters and presets.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::canon::Precision;
use crate::error::{SliceError, SliceResult};

/// Parameters for slicing operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SliceParams {
    /// Distance between sample heights, in model units.
    pub layer_height: f64,

    /// Canonicalization grid for coordinates and heights.
    pub precision: Precision,

    /// Drop points lying on the straight line between their neighbours.
    pub merge_collinear: bool,

    /// Use rayon across triangles and across layers.
    pub parallel: bool,

    /// Maximum number of forked branch states per layer.
    pub max_branch_states: usize,

    /// Maximum number of layers one call may produce.
    pub max_layers: usize,
}

impl Default for SliceParams {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            precision: Precision::default(),
            merge_collinear: true,
            parallel: true,
            max_branch_states: 4096,
            max_layers: 1_000_000,
        }
    }
}

impl SliceParams {
    /// Parameters for fine layers (0.1 units).
    #[must_use]
    pub fn fine() -> Self {
        Self {
            layer_height: 0.1,
            ..Default::default()
        }
    }

    /// Parameters for coarse draft layers (0.3 units).
    #[must_use]
    pub fn draft() -> Self {
        Self {
            layer_height: 0.3,
            ..Default::default()
        }
    }

    /// Raw traced loops: no collinear merge, single-threaded.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            merge_collinear: false,
            parallel: false,
            ..Default::default()
        }
    }

    /// Set layer height.
    #[must_use]
    pub const fn with_layer_height(mut self, height: f64) -> Self {
        self.layer_height = height;
        self
    }

    /// Set canonicalization precision.
    #[must_use]
    pub const fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Enable or disable collinear point merging.
    #[must_use]
    pub const fn with_merge_collinear(mut self, merge: bool) -> Self {
        self.merge_collinear = merge;
        self
    }

    /// Enable or disable parallel processing.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the per-layer branch state cap.
    #[must_use]
    pub const fn with_max_branch_states(mut self, limit: usize) -> Self {
        self.max_branch_states = limit;
        self
    }

    /// Set the layer count cap.
    #[must_use]
    pub const fn with_max_layers(mut self, limit: usize) -> Self {
        self.max_layers = limit;
        self
    }

    /// Check the parameters, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::InvalidLayerHeight`], [`SliceError::InvalidPrecision`]
    /// or [`SliceError::InvalidBranchLimit`].
    pub fn validate(&self) -> SliceResult<()> {
        if !(self.layer_height.is_finite() && self.layer_height > 0.0) {
            return Err(SliceError::InvalidLayerHeight(self.layer_height));
        }
        self.precision.validate()?;
        if self.max_branch_states == 0 {
            return Err(SliceError::InvalidBranchLimit);
        }
        Ok(())
    }
}
