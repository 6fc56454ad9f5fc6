//! Equation of state for seawater density and its partial derivatives.
//!
//! The regridder only needs ∂ρ/∂T and ∂ρ/∂S at given temperature, salinity
//! and pressure. That requirement is expressed by the [`DensityDerivatives`]
//! trait so a host model can plug in its own equation of state; two
//! implementations are provided here:
//!
//! - [`EquationOfState`]: UNESCO EOS-80, optionally with the secant bulk
//!   modulus pressure correction
//! - [`LinearEquationOfState`]: ρ = ρ₀(1 − α(T − T₀) + β(S − S₀))
//!
//! # References
//!
//! - UNESCO (1981): Tenth report of the joint panel on oceanographic tables and standards.
//! - Millero & Poisson (1981): International one-atmosphere equation of state of seawater.
//!
//! # Units
//!
//! - Temperature: °C
//! - Salinity: PSU
//! - Pressure: Pa at the trait boundary (dbar inside the UNESCO formulae)
//! - Density: kg/m³

/// Reference density for seawater (kg/m³).
pub const RHO_0: f64 = 1025.0;

/// Gravitational acceleration (m/s²).
pub const G: f64 = 9.81;

/// Pascals per decibar.
const PA_PER_DBAR: f64 = 1.0e4;

/// Source of density partial derivatives.
///
/// Implementations fill `drho_dt[k]` and `drho_ds[k]` for every `k` in the
/// input slices, which all have the same length.
pub trait DensityDerivatives: Send + Sync {
    /// Compute ∂ρ/∂T (kg m⁻³ °C⁻¹) and ∂ρ/∂S (kg m⁻³ PSU⁻¹).
    fn density_derivatives(
        &self,
        temperature: &[f64],
        salinity: &[f64],
        pressure: &[f64],
        drho_dt: &mut [f64],
        drho_ds: &mut [f64],
    );

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Equation of State calculator for seawater.
#[derive(Clone, Debug)]
pub struct EquationOfState {
    /// Reference density (kg/m³)
    pub rho_0: f64,
    /// Include pressure effects (if false, uses surface pressure only)
    pub include_pressure: bool,
    /// Temperature step for the centred derivative (°C)
    pub dt_fd: f64,
    /// Salinity step for the centred derivative (PSU)
    pub ds_fd: f64,
}

impl Default for EquationOfState {
    fn default() -> Self {
        Self::new()
    }
}

impl EquationOfState {
    /// Surface-pressure equation of state with default reference density.
    pub fn new() -> Self {
        Self {
            rho_0: RHO_0,
            include_pressure: false,
            dt_fd: 0.01,
            ds_fd: 0.01,
        }
    }

    /// Create with pressure effects included.
    pub fn with_pressure() -> Self {
        Self {
            include_pressure: true,
            ..Self::new()
        }
    }

    /// Compute seawater density at surface pressure (p = 0).
    ///
    /// # Example
    /// ```
    /// use ocean_column::equations::EquationOfState;
    ///
    /// let eos = EquationOfState::new();
    /// let rho = eos.density_surface(8.0, 34.0);
    /// assert!((rho - 1026.4).abs() < 0.5);
    ///
    /// // Fresh water at 4°C (maximum density)
    /// let rho_fresh = eos.density_surface(4.0, 0.0);
    /// assert!((rho_fresh - 1000.0).abs() < 0.1);
    /// ```
    pub fn density_surface(&self, temperature: f64, salinity: f64) -> f64 {
        let t = temperature;
        // Clamp so the S^1.5 term stays defined under finite differencing
        let s = salinity.max(0.0);

        // Pure water density (Bigg formula)
        let rho_w = 999.842594 + 6.793952e-2 * t - 9.095290e-3 * t.powi(2)
            + 1.001685e-4 * t.powi(3)
            - 1.120083e-6 * t.powi(4)
            + 6.536336e-9 * t.powi(5);

        let a = 8.24493e-1 - 4.0899e-3 * t + 7.6438e-5 * t.powi(2) - 8.2467e-7 * t.powi(3)
            + 5.3875e-9 * t.powi(4);
        let b = -5.72466e-3 + 1.0227e-4 * t - 1.6546e-6 * t.powi(2);
        let c0 = 4.8314e-4;

        rho_w + a * s + b * s.powf(1.5) + c0 * s.powi(2)
    }

    /// Compute seawater density at a pressure given in dbar.
    pub fn density(&self, temperature: f64, salinity: f64, pressure_dbar: f64) -> f64 {
        if !self.include_pressure || pressure_dbar.abs() < 1e-6 {
            return self.density_surface(temperature, salinity);
        }

        let rho_surface = self.density_surface(temperature, salinity);
        let k = self.secant_bulk_modulus(temperature, salinity.max(0.0), pressure_dbar);
        rho_surface / (1.0 - pressure_dbar / k)
    }

    /// Secant bulk modulus K(S, T, p), p in dbar.
    fn secant_bulk_modulus(&self, temperature: f64, salinity: f64, pressure: f64) -> f64 {
        let t = temperature;
        let s = salinity;
        // The UNESCO fit is in bar
        let p = pressure / 10.0;

        let kw = 19652.21 + 148.4206 * t - 2.327105 * t.powi(2) + 1.360477e-2 * t.powi(3)
            - 5.155288e-5 * t.powi(4);

        let k0 = kw
            + s * (54.6746 - 0.603459 * t + 1.09987e-2 * t.powi(2) - 6.1670e-5 * t.powi(3))
            + s.powf(1.5) * (7.944e-2 + 1.6483e-2 * t - 5.3009e-4 * t.powi(2));

        let aw = 3.239908 + 1.43713e-3 * t + 1.16092e-4 * t.powi(2) - 5.77905e-7 * t.powi(3);
        let a =
            aw + s * (2.2838e-3 - 1.0981e-5 * t - 1.6078e-6 * t.powi(2)) + s.powf(1.5) * 1.91075e-4;

        let bw = 8.50935e-5 - 6.12293e-6 * t + 5.2787e-8 * t.powi(2);
        let b = bw + s * (-9.9348e-7 + 2.0816e-8 * t + 9.1697e-10 * t.powi(2));

        // Returned in dbar to match the caller's pressure
        10.0 * (k0 + p * (a + b * p))
    }

    /// ∂ρ/∂T at a point, by centred difference.
    pub fn drho_dt(&self, temperature: f64, salinity: f64, pressure_dbar: f64) -> f64 {
        let h = self.dt_fd;
        (self.density(temperature + h, salinity, pressure_dbar)
            - self.density(temperature - h, salinity, pressure_dbar))
            / (2.0 * h)
    }

    /// ∂ρ/∂S at a point, by centred difference.
    pub fn drho_ds(&self, temperature: f64, salinity: f64, pressure_dbar: f64) -> f64 {
        let h = self.ds_fd;
        (self.density(temperature, salinity + h, pressure_dbar)
            - self.density(temperature, salinity - h, pressure_dbar))
            / (2.0 * h)
    }
}

impl DensityDerivatives for EquationOfState {
    fn density_derivatives(
        &self,
        temperature: &[f64],
        salinity: &[f64],
        pressure: &[f64],
        drho_dt: &mut [f64],
        drho_ds: &mut [f64],
    ) {
        for k in 0..temperature.len() {
            let p = pressure[k] / PA_PER_DBAR;
            drho_dt[k] = self.drho_dt(temperature[k], salinity[k], p);
            drho_ds[k] = self.drho_ds(temperature[k], salinity[k], p);
        }
    }

    fn name(&self) -> &'static str {
        "unesco_eos80"
    }
}

/// Linear equation of state.
///
/// ρ = ρ₀ * (1 - α(T - T₀) + β(S - S₀))
///
/// Derivatives are constant, which makes it the natural choice for tests
/// and idealized configurations.
#[derive(Clone, Debug)]
pub struct LinearEquationOfState {
    /// Reference density (kg/m³)
    pub rho_0: f64,
    /// Reference temperature (°C)
    pub t_0: f64,
    /// Reference salinity (PSU)
    pub s_0: f64,
    /// Thermal expansion coefficient (1/°C)
    pub alpha: f64,
    /// Haline contraction coefficient (1/PSU)
    pub beta: f64,
}

impl Default for LinearEquationOfState {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearEquationOfState {
    /// Reference state T₀ = 8°C, S₀ = 34 PSU.
    pub fn new() -> Self {
        Self {
            rho_0: 1026.0,
            t_0: 8.0,
            s_0: 34.0,
            alpha: 1.7e-4,
            beta: 7.6e-4,
        }
    }

    /// Create with custom reference state and coefficients.
    pub fn with_params(rho_0: f64, t_0: f64, s_0: f64, alpha: f64, beta: f64) -> Self {
        Self {
            rho_0,
            t_0,
            s_0,
            alpha,
            beta,
        }
    }

    /// Compute density using linear approximation.
    pub fn density(&self, temperature: f64, salinity: f64) -> f64 {
        self.rho_0
            * (1.0 - self.alpha * (temperature - self.t_0) + self.beta * (salinity - self.s_0))
    }
}

impl DensityDerivatives for LinearEquationOfState {
    fn density_derivatives(
        &self,
        temperature: &[f64],
        _salinity: &[f64],
        _pressure: &[f64],
        drho_dt: &mut [f64],
        drho_ds: &mut [f64],
    ) {
        let dt = -self.rho_0 * self.alpha;
        let ds = self.rho_0 * self.beta;
        for k in 0..temperature.len() {
            drho_dt[k] = dt;
            drho_ds[k] = ds;
        }
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}
