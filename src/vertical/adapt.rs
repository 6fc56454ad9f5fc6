//! Adaptive vertical coordinate driven by neutral density curvature.
//!
//! Interfaces are nudged toward neutral density surfaces that are flat with
//! respect to the four lateral neighbors, then smoothed by implicit vertical
//! diffusion of interface position. Optionally a HYCOM-style floor keeps
//! every layer at least as thick as a stretched nominal profile.
//!
//! # Lifecycle
//!
//! [`AdaptControl`] is created uninitialized and initialized exactly once
//! with the layer count and nominal resolution. Parameters may be updated
//! afterwards. Initializing twice, or updating or building a column before
//! initialization, is a caller bug and is reported as [`AdaptError`]; the
//! driver is expected to abort on it.
//!
//! # Algorithm
//!
//! For every interior interface K of the target column:
//!
//! 1. Sum `∂ρ/∂T·(T_n − T) + ∂ρ/∂S·(S_n − S)` over the valid neighbors n,
//!    with derivatives at the mean T, S, p of the pair.
//! 2. Scale by the mean adjacent thickness and divide by the vertical density
//!    difference (floored at 1e-20), multiply by `alpha / 2` and limit the
//!    move to half the thinner adjacent layer.
//! 3. Solve `(I + D) z = z*` where `D` is the interface diffusion operator
//!    with per-layer diffusivity
//!    `ratio·nk²·depth·(c_zoom/(d_zoom + z_mid) + c_buoy·Δρ/Δρ₀ + max(1 − c_zoom − c_buoy, 0)/depth)`.
//! 4. With the floor enabled, `z[K] = min(max(z[K], z_nom[K]), z_bottom)`.
//!
//! # Example
//!
//! ```
//! use ocean_column::equations::LinearEquationOfState;
//! use ocean_column::types::{ColumnId, ColumnProfile, LateralNeighbors};
//! use ocean_column::vertical::AdaptControl;
//!
//! let mut control = AdaptControl::new();
//! control.init(4, vec![25.0; 4]).unwrap();
//!
//! let z = [0.0, 25.0, 50.0, 75.0, 100.0];
//! let t = [20.0, 15.0, 10.0, 6.0, 4.0];
//! let s = [35.0; 5];
//! let h = [25.0; 4];
//! let column = ColumnProfile::new(&z, &t, &s, &h);
//!
//! let z_new = control
//!     .build_adapted_column(
//!         &LinearEquationOfState::new(),
//!         ColumnId::new(0, 0),
//!         &LateralNeighbors::none(),
//!         &column,
//!         100.0,
//!     )
//!     .unwrap();
//! assert_eq!(z_new[0], 0.0);
//! assert_eq!(z_new[4], 100.0);
//! ```

use log::{debug, error, info, trace};
use thiserror::Error;

use crate::equations::{DensityDerivatives, G, RHO_0};
use crate::numerics::{TridiagonalSystem, fold_boundaries};
use crate::types::{ColumnId, ColumnProfile, LateralNeighbors};

/// Floor on the vertical density difference used to turn curvature into
/// a displacement (kg/m³).
pub const MIN_VERTICAL_DRHO: f64 = 1e-20;

/// Errors from the adaptive coordinate.
///
/// `AlreadyInitialized` and `NotInitialized` indicate a logic error in the
/// caller and should abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdaptError {
    /// `init` called on an initialized control.
    #[error("Adaptive coordinate control is already initialized")]
    AlreadyInitialized,

    /// Parameters updated or a column built before `init`.
    #[error("Adaptive coordinate control used before initialization: {0}")]
    NotInitialized(&'static str),

    /// A column array does not match the configured layer count.
    #[error("Dimension mismatch in {field}: expected {expected}, got {actual}")]
    DimensionMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Nominal resolution unusable.
    #[error("Invalid nominal resolution: {0}")]
    InvalidResolution(String),
}

impl AdaptError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(field: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }
}

/// Tunable coefficients of the adaptive coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptParams {
    /// Ratio of the optimization time scale to the diffusion time scale.
    pub time_ratio: f64,
    /// Strength of the curvature forcing (nondim).
    pub alpha: f64,
    /// Depth scale of near-surface zooming [H].
    pub zoom_depth: f64,
    /// Weight of the zooming diffusivity (nondim).
    pub zoom_coeff: f64,
    /// Weight of the stratification-dependent diffusivity (nondim).
    pub buoy_coeff: f64,
    /// Reference density difference for the stratification term (kg/m³).
    pub drho0: f64,
    /// Enforce the nominal minimum thickness floor.
    pub do_min: bool,
    /// Pressure per unit interface height handed to the equation of state (Pa/H).
    pub pressure_per_h: f64,
}

impl Default for AdaptParams {
    fn default() -> Self {
        Self {
            time_ratio: 1e-1,
            alpha: 1.0,
            zoom_depth: 200.0,
            zoom_coeff: 0.0,
            buoy_coeff: 0.0,
            drho0: 0.5,
            do_min: false,
            pressure_per_h: RHO_0 * G,
        }
    }
}

impl AdaptParams {
    /// Set the optimization/diffusion time-scale ratio.
    pub fn with_time_ratio(mut self, time_ratio: f64) -> Self {
        self.time_ratio = time_ratio;
        self
    }

    /// Set the curvature forcing strength.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the zoom depth and coefficient.
    pub fn with_zoom(mut self, zoom_depth: f64, zoom_coeff: f64) -> Self {
        self.zoom_depth = zoom_depth;
        self.zoom_coeff = zoom_coeff;
        self
    }

    /// Set the buoyancy coefficient and reference density difference.
    pub fn with_buoyancy(mut self, buoy_coeff: f64, drho0: f64) -> Self {
        self.buoy_coeff = buoy_coeff;
        self.drho0 = drho0;
        self
    }

    /// Enable or disable the minimum thickness floor.
    pub fn with_min_thickness(mut self, do_min: bool) -> Self {
        self.do_min = do_min;
        self
    }

    /// Background share of the diffusivity (nondim).
    #[inline]
    pub fn background_coeff(&self) -> f64 {
        (1.0 - self.zoom_coeff - self.buoy_coeff).max(0.0)
    }
}

/// A partial parameter update; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdaptParamsUpdate {
    /// New [`AdaptParams::time_ratio`].
    pub time_ratio: Option<f64>,
    /// New [`AdaptParams::alpha`].
    pub alpha: Option<f64>,
    /// New [`AdaptParams::zoom_depth`].
    pub zoom_depth: Option<f64>,
    /// New [`AdaptParams::zoom_coeff`].
    pub zoom_coeff: Option<f64>,
    /// New [`AdaptParams::buoy_coeff`].
    pub buoy_coeff: Option<f64>,
    /// New [`AdaptParams::drho0`].
    pub drho0: Option<f64>,
    /// Switch the minimum thickness floor on or off.
    pub do_min: Option<bool>,
    /// New [`AdaptParams::pressure_per_h`].
    pub pressure_per_h: Option<f64>,
}

impl AdaptParamsUpdate {
    /// Write every present field into `params`.
    pub fn apply_to(&self, params: &mut AdaptParams) {
        if let Some(v) = self.time_ratio {
            params.time_ratio = v;
        }
        if let Some(v) = self.alpha {
            params.alpha = v;
        }
        if let Some(v) = self.zoom_depth {
            params.zoom_depth = v;
        }
        if let Some(v) = self.zoom_coeff {
            params.zoom_coeff = v;
        }
        if let Some(v) = self.buoy_coeff {
            params.buoy_coeff = v;
        }
        if let Some(v) = self.drho0 {
            params.drho0 = v;
        }
        if let Some(v) = self.do_min {
            params.do_min = v;
        }
        if let Some(v) = self.pressure_per_h {
            params.pressure_per_h = v;
        }
    }
}

/// Configuration established by [`AdaptControl::init`].
#[derive(Clone, Debug)]
struct AdaptGrid {
    n_layers: usize,
    resolution: Vec<f64>,
    params: AdaptParams,
}

/// Control structure of the adaptive coordinate.
#[derive(Clone, Debug, Default)]
pub struct AdaptControl {
    grid: Option<AdaptGrid>,
}

impl AdaptControl {
    /// An uninitialized control.
    pub fn new() -> Self {
        Self { grid: None }
    }

    /// Create and initialize in one step.
    pub fn initialized(n_layers: usize, resolution: Vec<f64>) -> Result<Self, AdaptError> {
        let mut control = Self::new();
        control.init(n_layers, resolution)?;
        Ok(control)
    }

    /// Whether [`init`](Self::init) has been called.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.grid.is_some()
    }

    /// Set the layer count and nominal per-layer resolution [H].
    ///
    /// Parameters start at [`AdaptParams::default`].
    pub fn init(&mut self, n_layers: usize, resolution: Vec<f64>) -> Result<(), AdaptError> {
        if self.grid.is_some() {
            error!("adaptive coordinate initialized twice");
            return Err(AdaptError::AlreadyInitialized);
        }
        if n_layers == 0 {
            return Err(AdaptError::InvalidResolution(
                "at least one layer is required".to_string(),
            ));
        }
        if resolution.len() != n_layers {
            return Err(AdaptError::dimension_mismatch(
                "resolution",
                n_layers,
                resolution.len(),
            ));
        }
        if let Some(bad) = resolution.iter().find(|dz| !(**dz >= 0.0) || !dz.is_finite()) {
            return Err(AdaptError::InvalidResolution(format!(
                "layer resolution must be finite and non-negative, got {}",
                bad
            )));
        }

        info!(
            "adaptive coordinate: {} layers, nominal depth {:.1}",
            n_layers,
            resolution.iter().sum::<f64>()
        );
        self.grid = Some(AdaptGrid {
            n_layers,
            resolution,
            params: AdaptParams::default(),
        });
        Ok(())
    }

    /// Change any subset of the tunable parameters.
    pub fn set_params(&mut self, update: &AdaptParamsUpdate) -> Result<(), AdaptError> {
        let grid = self.grid.as_mut().ok_or_else(|| {
            error!("adaptive coordinate parameters set before initialization");
            AdaptError::NotInitialized("set_params")
        })?;
        update.apply_to(&mut grid.params);
        debug!("adaptive coordinate parameters: {:?}", grid.params);
        Ok(())
    }

    /// Current parameters.
    pub fn params(&self) -> Result<&AdaptParams, AdaptError> {
        Ok(&self.grid("params")?.params)
    }

    /// Configured number of layers.
    pub fn n_layers(&self) -> Result<usize, AdaptError> {
        Ok(self.grid("n_layers")?.n_layers)
    }

    /// Nominal per-layer resolution [H].
    pub fn resolution(&self) -> Result<&[f64], AdaptError> {
        Ok(&self.grid("resolution")?.resolution)
    }

    fn grid(&self, caller: &'static str) -> Result<&AdaptGrid, AdaptError> {
        self.grid.as_ref().ok_or_else(|| {
            error!("adaptive coordinate used before initialization ({})", caller);
            AdaptError::NotInitialized(caller)
        })
    }

    /// Compute new interface positions for one column.
    ///
    /// # Arguments
    /// * `eos` - Source of density derivatives
    /// * `id` - Grid position, for diagnostics
    /// * `neighbors` - Lateral neighbors; `None` marks a land or absent point
    /// * `column` - Target column profile
    /// * `local_depth` - Nominal bottom depth of the column [H]
    ///
    /// # Returns
    /// Interface positions, length nk + 1, with the surface and bottom
    /// entries copied from the input.
    pub fn build_adapted_column(
        &self,
        eos: &dyn DensityDerivatives,
        id: ColumnId,
        neighbors: &LateralNeighbors<Option<ColumnProfile<'_>>>,
        column: &ColumnProfile<'_>,
        local_depth: f64,
    ) -> Result<Vec<f64>, AdaptError> {
        let grid = self.grid("build_adapted_column")?;
        let nk = grid.n_layers;
        let params = &grid.params;

        column.check_shape(nk).map_err(|(field, expected, actual)| {
            AdaptError::dimension_mismatch(field, expected, actual)
        })?;
        for (direction, neighbor) in neighbors.iter() {
            if let Some(n) = neighbor {
                n.check_interface_shape(nk).map_err(|(field, expected, actual)| {
                    AdaptError::dimension_mismatch(
                        format!("{} neighbor {}", direction, field),
                        expected,
                        actual,
                    )
                })?;
            }
        }

        let del2sigma = neutral_curvature(eos, params.pressure_per_h, column, neighbors);

        // Derivatives of the target column alone, at every interface
        let mut drho_dt = vec![0.0; nk + 1];
        let mut drho_ds = vec![0.0; nk + 1];
        let pressure: Vec<f64> = column
            .interface_heights
            .iter()
            .map(|z| z * params.pressure_per_h)
            .collect();
        eos.density_derivatives(
            column.interface_temperature,
            column.interface_salinity,
            &pressure,
            &mut drho_dt,
            &mut drho_ds,
        );

        let dz = displacement_from_curvature(params.alpha, column, &del2sigma, &drho_dt, &drho_ds);

        let mut z_next: Vec<f64> = column
            .interface_heights
            .iter()
            .zip(&dz)
            .map(|(z, d)| z + d)
            .collect();

        if log::log_enabled!(log::Level::Trace) {
            let max_move = dz.iter().fold(0.0_f64, |m, d| m.max(d.abs()));
            trace!(
                "column {}: {} neighbors, max curvature displacement {:.3e}",
                id,
                neighbors.count_present(),
                max_move
            );
        }

        let kappa = layer_diffusivity(params, local_depth, &z_next, column, &drho_dt, &drho_ds);
        diffuse_interfaces(&kappa, &mut z_next);

        if params.do_min {
            apply_thickness_floor(&grid.resolution, local_depth, &mut z_next);
        }

        Ok(z_next)
    }
}

/// Neutral density curvature at every interface.
///
/// Entry K is the sum over valid neighbors of
/// `∂ρ/∂T·(T_n[K] − T[K]) + ∂ρ/∂S·(S_n[K] − S[K])`, with derivatives at the
/// mean temperature, salinity and pressure of the pair. Surface and bottom
/// entries are zero. A positive value means the column is light compared to
/// its surroundings.
pub fn neutral_curvature(
    eos: &dyn DensityDerivatives,
    pressure_per_h: f64,
    column: &ColumnProfile<'_>,
    neighbors: &LateralNeighbors<Option<ColumnProfile<'_>>>,
) -> Vec<f64> {
    let nk = column.interface_heights.len().saturating_sub(1);
    let mut del2sigma = vec![0.0; column.interface_heights.len()];
    if nk < 2 {
        return del2sigma;
    }

    let n_interior = nk - 1;
    let mut t_avg = vec![0.0; n_interior];
    let mut s_avg = vec![0.0; n_interior];
    let mut p_avg = vec![0.0; n_interior];
    let mut drho_dt = vec![0.0; n_interior];
    let mut drho_ds = vec![0.0; n_interior];

    for (_, neighbor) in neighbors.iter() {
        let Some(n) = neighbor else { continue };

        for i in 0..n_interior {
            let k = i + 1;
            t_avg[i] = 0.5 * (column.interface_temperature[k] + n.interface_temperature[k]);
            s_avg[i] = 0.5 * (column.interface_salinity[k] + n.interface_salinity[k]);
            p_avg[i] =
                0.5 * (column.interface_heights[k] + n.interface_heights[k]) * pressure_per_h;
        }
        eos.density_derivatives(&t_avg, &s_avg, &p_avg, &mut drho_dt, &mut drho_ds);

        for i in 0..n_interior {
            let k = i + 1;
            del2sigma[k] += drho_dt[i]
                * (n.interface_temperature[k] - column.interface_temperature[k])
                + drho_ds[i] * (n.interface_salinity[k] - column.interface_salinity[k]);
        }
    }

    del2sigma
}

/// Interface displacement implied by a density curvature.
///
/// `drho_dt`/`drho_ds` are the target column's derivatives at its
/// interfaces. Positive displacements deepen an interface. The magnitude is
/// limited to half the thinner of the two adjacent layers so interfaces
/// cannot cross and two-grid-point oscillations are damped.
pub fn displacement_from_curvature(
    alpha: f64,
    column: &ColumnProfile<'_>,
    del2sigma: &[f64],
    drho_dt: &[f64],
    drho_ds: &[f64],
) -> Vec<f64> {
    let nk = column.layer_thickness.len();
    let t = column.interface_temperature;
    let s = column.interface_salinity;
    let h = column.layer_thickness;

    let mut dz = vec![0.0; nk + 1];
    for k in 1..nk {
        let h_above = h[k - 1];
        let h_below = h[k];
        // Centred across the interface, spanning both adjacent layers
        let drho_dk = (0.5
            * (drho_dt[k] * (t[k + 1] - t[k - 1]) + drho_ds[k] * (s[k + 1] - s[k - 1])))
            .max(MIN_VERTICAL_DRHO);

        let raw = 0.5 * alpha * del2sigma[k] * (0.5 * (h_above + h_below)) / drho_dk;
        let limit = 0.5 * h_above.min(h_below);
        dz[k] = raw.max(-limit).min(limit);
    }
    dz
}

/// Non-dimensional grid diffusivity of every layer.
///
/// `z` holds the provisional interface positions (length nk + 1).
pub fn layer_diffusivity(
    params: &AdaptParams,
    local_depth: f64,
    z: &[f64],
    column: &ColumnProfile<'_>,
    drho_dt: &[f64],
    drho_ds: &[f64],
) -> Vec<f64> {
    let nk = column.layer_thickness.len();
    let t = column.interface_temperature;
    let s = column.interface_salinity;
    let scale = params.time_ratio * (nk * nk) as f64 * local_depth;
    let background = if local_depth > 0.0 {
        params.background_coeff() / local_depth
    } else {
        0.0
    };

    (0..nk)
        .map(|k| {
            // Density difference across the layer; unstable layers get no
            // buoyancy contribution
            let drdc = (0.5
                * ((drho_dt[k] + drho_dt[k + 1]) * (t[k + 1] - t[k])
                    + (drho_ds[k] + drho_ds[k + 1]) * (s[k + 1] - s[k])))
                .max(0.0);
            let zoom = params.zoom_coeff / (params.zoom_depth + 0.5 * (z[k] + z[k + 1]));
            let buoy = params.buoy_coeff * drdc / params.drho0;
            (scale * (zoom + buoy + background)).max(0.0)
        })
        .collect()
}

/// Implicit diffusion of the interior interfaces, end points fixed.
///
/// `z` (length nk + 1) holds the provisional positions on entry and the
/// smoothed positions on return.
pub fn diffuse_interfaces(kappa: &[f64], z: &mut [f64]) {
    let nk = kappa.len();
    if nk < 2 {
        return;
    }
    let system = TridiagonalSystem::interface_diffusion(kappa);
    let mut rhs = z[1..nk].to_vec();
    fold_boundaries(&mut rhs, kappa, z[0], z[nk]);
    system.solve(&mut rhs);
    z[1..nk].copy_from_slice(&rhs);
}

/// HYCOM-style minimum thickness floor.
///
/// The nominal resolution is stretched by `z_bottom / local_depth`, and each
/// interior interface is pushed down to at least the cumulative stretched
/// depth, then limited to the bottom interface.
pub fn apply_thickness_floor(resolution: &[f64], local_depth: f64, z: &mut [f64]) {
    let nk = resolution.len();
    let bottom = z[nk];
    let stretching = if local_depth > 0.0 {
        bottom / local_depth
    } else {
        1.0
    };

    let mut nominal_z = z[0];
    for k in 1..nk {
        nominal_z += resolution[k - 1] * stretching;
        z[k] = z[k].max(nominal_z).min(bottom);
    }
}
