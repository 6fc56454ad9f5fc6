//! Error types for the shortwave absorber.

use thiserror::Error;

/// Errors detected when a column is handed to the absorber.
///
/// All checks happen once at entry; the attenuation loops themselves never
/// fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShortwaveError {
    /// An input array does not have the expected length.
    #[error("Dimension mismatch in {field}: expected {expected}, got {actual}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Only one of the TKE sink and ∂SV/∂T was supplied.
    #[error("TKE sink and specific volume derivative must be supplied together")]
    MismatchedTkeArguments,

    /// A sorted traversal order names a layer outside the column.
    #[error("Sorted order refers to layer {layer}, column has {n_layers} layers")]
    InvalidOrder { layer: usize, n_layers: usize },
}

impl ShortwaveError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            field,
            expected,
            actual,
        }
    }

    /// Check a length, producing a dimension mismatch on disagreement.
    pub(crate) fn check_len(
        field: &'static str,
        expected: usize,
        actual: usize,
    ) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::dimension_mismatch(field, expected, actual))
        }
    }
}
