//! Borrowed views of a single water column.
//!
//! Layers are indexed `0..nk` from the surface down and interfaces
//! `0..=nk`; interface `k` bounds layer `k - 1` above and layer `k` below.
//! Interface positions are measured positive downward from the surface, so
//! a well-formed column has non-decreasing positions.

use std::fmt;

/// Horizontal position of a column on the model grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ColumnId {
    /// Index in the x direction
    pub i: usize,
    /// Index in the y direction
    pub j: usize,
}

impl ColumnId {
    /// Create a column identifier.
    #[inline]
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// Interface and layer profiles of one column.
///
/// Only the interface arrays are read from lateral neighbors; the layer
/// thicknesses are needed for the target column.
#[derive(Clone, Copy, Debug)]
pub struct ColumnProfile<'a> {
    /// Interface positions, length nk + 1 [H]
    pub interface_heights: &'a [f64],
    /// Temperature at interfaces, length nk + 1 [degC]
    pub interface_temperature: &'a [f64],
    /// Salinity at interfaces, length nk + 1 [PSU]
    pub interface_salinity: &'a [f64],
    /// Layer thicknesses, length nk [H]
    pub layer_thickness: &'a [f64],
}

impl<'a> ColumnProfile<'a> {
    /// Bundle the column arrays.
    pub fn new(
        interface_heights: &'a [f64],
        interface_temperature: &'a [f64],
        interface_salinity: &'a [f64],
        layer_thickness: &'a [f64],
    ) -> Self {
        Self {
            interface_heights,
            interface_temperature,
            interface_salinity,
            layer_thickness,
        }
    }

    /// Number of layers, taken from the thickness array.
    #[inline]
    pub fn n_layers(&self) -> usize {
        self.layer_thickness.len()
    }

    /// Check that every array agrees with `n_layers`.
    ///
    /// Returns the name and length of the first array that disagrees.
    pub fn check_shape(&self, n_layers: usize) -> Result<(), (&'static str, usize, usize)> {
        let checks = [
            ("interface_heights", self.interface_heights.len(), n_layers + 1),
            (
                "interface_temperature",
                self.interface_temperature.len(),
                n_layers + 1,
            ),
            ("interface_salinity", self.interface_salinity.len(), n_layers + 1),
            ("layer_thickness", self.layer_thickness.len(), n_layers),
        ];
        for (name, actual, expected) in checks {
            if actual != expected {
                return Err((name, expected, actual));
            }
        }
        Ok(())
    }

    /// Same check for a lateral neighbor, which need not carry thicknesses.
    pub fn check_interface_shape(
        &self,
        n_layers: usize,
    ) -> Result<(), (&'static str, usize, usize)> {
        let checks = [
            ("interface_heights", self.interface_heights.len()),
            ("interface_temperature", self.interface_temperature.len()),
            ("interface_salinity", self.interface_salinity.len()),
        ];
        for (name, actual) in checks {
            if actual != n_layers + 1 {
                return Err((name, n_layers + 1, actual));
            }
        }
        Ok(())
    }

    /// Position of the bottom interface.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.interface_heights[self.interface_heights.len() - 1]
    }
}

/// Whether a sequence of interface positions is non-decreasing downward.
pub fn is_monotonic(positions: &[f64]) -> bool {
    positions.windows(2).all(|w| w[1] >= w[0])
}

/// Layer thicknesses implied by interface positions.
pub fn thickness_from_interfaces(positions: &[f64]) -> Vec<f64> {
    positions.windows(2).map(|w| w[1] - w[0]).collect()
}
