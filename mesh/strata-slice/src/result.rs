//! Slice result types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::ModelBounds;
use crate::diagnostics::Diagnostics;
use crate::layer::Layer;
use crate::params::SliceParams;

/// Result of a slicing operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SliceResult {
    /// Individual layers from bottom to top.
    pub layers: Vec<Layer>,

    /// Height range and planar extent of the layers. `None` without layers.
    pub bounds: Option<ModelBounds>,

    /// Every layer's topology reports, in layer order.
    pub diagnostics: Diagnostics,

    /// Slice parameters used.
    pub params: SliceParams,
}

impl SliceResult {
    /// Create an empty result.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Diagnostics::default() is not const
    pub fn empty(params: SliceParams) -> Self {
        Self {
            layers: Vec::new(),
            bounds: None,
            diagnostics: Diagnostics::default(),
            params,
        }
    }

    /// Check if the result is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of regions across all layers.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.layers.iter().map(Layer::region_count).sum()
    }

    /// Get a specific layer by index.
    #[must_use]
    pub fn get_layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Get the layer within half a layer height of `z`.
    #[must_use]
    pub fn layer_at_height(&self, z: f64) -> Option<&Layer> {
        let half_thickness = self.params.layer_height / 2.0;
        self.layers
            .iter()
            .find(|l| z >= l.z - half_thickness && z <= l.z + half_thickness)
    }

    /// Layers that carry real cross-sections.
    pub fn non_degenerate_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| !l.degenerate)
    }
}

impl std::fmt::Display for SliceResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let height = self.bounds.map_or(0.0, |b| b.height());
        write!(
            f,
            "SliceOutput: {} layers, {} regions, {:.3} height, {}",
            self.layer_count(),
            self.region_count(),
            height,
            self.diagnostics
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = SliceResult::empty(SliceParams::default());
        assert!(result.is_empty());
        assert_eq!(result.layer_count(), 0);
        assert!(result.bounds.is_none());
        assert_eq!(result.non_degenerate_layers().count(), 0);
    }

    #[test]
    fn test_display() {
        let result = SliceResult::empty(SliceParams::default());
        let display = format!("{result}");
        assert!(display.contains("0 layers"));
        assert!(display.contains("0 branches"));
    }

    #[test]
    fn test_layer_at_height() {
        let mut result = SliceResult::empty(SliceParams::default().with_layer_height(0.5));
        result.layers = vec![Layer::empty(0, 0.0), Layer::empty(1, 0.5)];
        assert_eq!(result.layer_at_height(0.6).map(|l| l.index), Some(1));
        assert_eq!(result.layer_at_height(0.1).map(|l| l.index), Some(0));
        assert!(result.layer_at_height(1.2).is_none());
    }
}
