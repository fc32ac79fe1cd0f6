//! Error types for slicing operations.

use thiserror::Error;

/// Errors that can occur during slicing.
///
/// Geometric defects in the mesh are never errors; they are reported through
/// [`crate::Diagnostics`] and open regions instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SliceError {
    /// Layer height is not a positive finite number.
    #[error("Invalid layer height: {0} (must be finite and > 0)")]
    InvalidLayerHeight(f64),

    /// Precision cannot be turned into a usable quantization unit.
    #[error("Invalid precision: {0}")]
    InvalidPrecision(String),

    /// A vertex coordinate is NaN or infinite.
    #[error("Triangle {triangle} has a non-finite vertex")]
    NonFiniteVertex {
        /// Index of the offending triangle.
        triangle: usize,
    },

    /// The model height divided by the layer height exceeds the layer cap.
    #[error("Slicing would produce {count} layers (limit {limit})")]
    TooManyLayers {
        /// Number of layers the mesh would need.
        count: u64,
        /// Configured maximum.
        limit: usize,
    },

    /// Branch exploration limit of zero.
    #[error("Branch state limit must be at least 1")]
    InvalidBranchLimit,
}

/// Result type for slicing operations.
pub type SliceResult<T> = std::result::Result<T, SliceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SliceError::InvalidLayerHeight(-0.1);
        assert!(format!("{err}").contains("-0.1"));

        let err = SliceError::TooManyLayers {
            count: 5_000_000,
            limit: 1_000_000,
        };
        assert_eq!(
            format!("{err}"),
            "Slicing would produce 5000000 layers (limit 1000000)"
        );

        let err = SliceError::NonFiniteVertex { triangle: 7 };
        assert!(format!("{err}").contains('7'));
    }
}
