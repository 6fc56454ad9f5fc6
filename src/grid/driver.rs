//! Apply the column kernels across a horizontal field.
//!
//! Every column is independent once its neighbors' pre-regrid profiles are
//! known, so the `_parallel` variants (feature `parallel`) only change how
//! columns are scheduled.

use log::debug;

use super::columns::ColumnGrid;
use crate::equations::DensityDerivatives;
use crate::shortwave::{
    AbsorbInputs, AbsorbOutcome, AbsorbState, AbsorbStep, Optics, ShortwaveConfig,
    ShortwaveError, absorb_remaining,
};
use crate::types::ColumnId;
use crate::vertical::{AdaptControl, AdaptError};

/// New interface positions of one column. Land keeps its input heights.
fn regrid_column(
    control: &AdaptControl,
    grid: &ColumnGrid,
    eos: &dyn DensityDerivatives,
    id: ColumnId,
) -> Result<Vec<f64>, AdaptError> {
    match grid.column(id) {
        Some(column) => control.build_adapted_column(
            eos,
            id,
            &grid.neighbors(id),
            &column,
            grid.local_depth(id),
        ),
        None => Ok(grid.interface_heights(id).to_vec()),
    }
}

/// Regrid every column of `grid`, returning interface positions in storage
/// order.
pub fn regrid_all(
    control: &AdaptControl,
    grid: &ColumnGrid,
    eos: &dyn DensityDerivatives,
) -> Result<Vec<Vec<f64>>, AdaptError> {
    debug!(
        "regridding {} of {} columns with {}",
        grid.wet_count(),
        grid.n_columns(),
        eos.name()
    );
    grid.ids()
        .map(|id| regrid_column(control, grid, eos, id))
        .collect()
}

/// Parallel version of [`regrid_all`] using Rayon.
#[cfg(feature = "parallel")]
pub fn regrid_all_parallel(
    control: &AdaptControl,
    grid: &ColumnGrid,
    eos: &dyn DensityDerivatives,
) -> Result<Vec<Vec<f64>>, AdaptError> {
    use rayon::prelude::*;

    debug!(
        "regridding {} of {} columns in parallel with {}",
        grid.wet_count(),
        grid.n_columns(),
        eos.name()
    );
    (0..grid.n_columns())
        .into_par_iter()
        .map(|idx| regrid_column(control, grid, eos, grid.id(idx)))
        .collect()
}

/// One column handed to the shortwave absorber.
#[derive(Clone, Debug)]
pub struct ShortwaveColumn {
    /// Layer thickness [H]
    pub thickness: Vec<f64>,
    /// Layer temperature [degC]
    pub temperature: Vec<f64>,
    /// Per-band irradiance at the surface [K H], drained by absorption
    pub irradiance: Vec<f64>,
    pub optics: Optics,
}

impl ShortwaveColumn {
    pub fn new(thickness: Vec<f64>, temperature: Vec<f64>, irradiance: Vec<f64>, optics: Optics) -> Self {
        Self {
            thickness,
            temperature,
            irradiance,
            optics,
        }
    }

    /// Absorb this column's remaining radiation.
    pub fn absorb(
        &mut self,
        config: &ShortwaveConfig,
        step: &AbsorbStep,
    ) -> Result<AbsorbOutcome, ShortwaveError> {
        absorb_remaining(
            config,
            &self.optics,
            &AbsorbInputs::new(&self.thickness),
            step,
            &mut AbsorbState::new(&mut self.temperature, &mut self.irradiance),
        )
    }
}

/// Absorb shortwave radiation in every column.
pub fn absorb_all_columns(
    config: &ShortwaveConfig,
    columns: &mut [ShortwaveColumn],
    step: &AbsorbStep,
) -> Result<Vec<AbsorbOutcome>, ShortwaveError> {
    debug!("absorbing shortwave in {} columns", columns.len());
    columns
        .iter_mut()
        .map(|column| column.absorb(config, step))
        .collect()
}

/// Parallel version of [`absorb_all_columns`] using Rayon.
#[cfg(feature = "parallel")]
pub fn absorb_all_columns_parallel(
    config: &ShortwaveConfig,
    columns: &mut [ShortwaveColumn],
    step: &AbsorbStep,
) -> Result<Vec<AbsorbOutcome>, ShortwaveError> {
    use rayon::prelude::*;

    debug!("absorbing shortwave in {} columns in parallel", columns.len());
    columns
        .par_iter_mut()
        .map(|column| column.absorb(config, step))
        .collect()
}
