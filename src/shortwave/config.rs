//! Shortwave absorber configuration.
//!
//! Plain struct with defaults and chained setters; nothing here is read
//! from parameter files.

use crate::equations::{G, RHO_0};

/// Default minimum thickness that receives heating [H]: two Ångström plus
/// a subroundoff thickness.
pub const DEFAULT_MIN_HEATING_THICKNESS: f64 = 2.0e-10;

/// Default heating rate below which remaining radiation is absorbed
/// outright [K H s⁻¹]. About 0.08 K·m per century.
pub const DEFAULT_FLUX_ABSORB: f64 = 2.5e-11;

/// Default thickness over which a minimal flux is absorbed [H].
pub const DEFAULT_ABSORB_MIN_THICKNESS: f64 = 1.0;

/// Optical depth above which the exact upward-redistribution fraction is used.
pub const SWA_TAYLOR_THRESHOLD: f64 = 1e-5;

/// Optical depth above which the exact TKE integral is used.
pub const TKE_TAYLOR_THRESHOLD: f64 = 1e-2;

/// Configuration of the shortwave absorber.
#[derive(Clone, Debug, PartialEq)]
pub struct ShortwaveConfig {
    /// Layers no thicker than this are not heated; layers between one and two
    /// times this thickness are heated with a linear taper [H].
    pub min_heating_thickness: f64,
    /// Remaining heating rate that is absorbed in place rather than carried
    /// further down [K H s⁻¹].
    pub flux_absorb: f64,
    /// Thickness over which that minimal flux is absorbed [H].
    pub absorb_min_thickness: f64,
    /// Conversion from heat × ∂SV/∂T × thickness to TKE (g·(H→mass)²).
    pub tke_conversion: f64,
}

impl Default for ShortwaveConfig {
    fn default() -> Self {
        Self {
            min_heating_thickness: DEFAULT_MIN_HEATING_THICKNESS,
            flux_absorb: DEFAULT_FLUX_ABSORB,
            absorb_min_thickness: DEFAULT_ABSORB_MIN_THICKNESS,
            tke_conversion: G * RHO_0 * RHO_0,
        }
    }
}

impl ShortwaveConfig {
    /// Set the minimum heating thickness.
    pub fn with_min_heating_thickness(mut self, h_min: f64) -> Self {
        self.min_heating_thickness = h_min.max(0.0);
        self
    }

    /// Set the small-flux absorption rate.
    pub fn with_flux_absorb(mut self, flux_absorb: f64) -> Self {
        self.flux_absorb = flux_absorb;
        self
    }

    /// Set the small-flux absorption thickness.
    pub fn with_absorb_min_thickness(mut self, thickness: f64) -> Self {
        self.absorb_min_thickness = thickness;
        self
    }

    /// Set the TKE conversion factor.
    pub fn with_tke_conversion(mut self, factor: f64) -> Self {
        self.tke_conversion = factor;
        self
    }

    /// Inverse of the absorption thickness [H⁻¹].
    #[inline]
    pub fn absorb_inverse_length(&self) -> f64 {
        if self.absorb_min_thickness > 0.0 {
            1.0 / self.absorb_min_thickness
        } else {
            f64::INFINITY
        }
    }

    /// Heating weight of a layer of thickness `h`.
    ///
    /// 0 at or below the minimum heating thickness, 1 at or above twice it,
    /// `2 − 2·h_min/h` in between. `h × weight` is the layer's contribution
    /// to the heated thickness.
    #[inline]
    pub fn heating_weight(&self, h: f64) -> f64 {
        let h_min = self.min_heating_thickness;
        if h >= 2.0 * h_min {
            1.0
        } else if h > h_min {
            2.0 - 2.0 * h_min / h
        } else {
            0.0
        }
    }
}
