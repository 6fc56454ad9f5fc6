//! Banded shortwave absorption in a layered column.
//!
//! Two entry points share one attenuation law:
//!
//! - [`absorb_remaining`] heats the column in place, drains the per-band
//!   irradiance and optionally moves heat upward, accumulates a TKE sink and
//!   redistributes radiation reaching the bottom
//! - [`integrate_penetrating_flux`] returns the net flux at every interface
//!   without mutating anything
//!
//! Per band and layer the transmitted fraction is `exp(−h·κ)`. When the flux
//! passed on would heat the water below by less than
//! [`ShortwaveConfig::flux_absorb`], it is absorbed in the current layer
//! instead. Layers thinner than [`ShortwaveConfig::min_heating_thickness`]
//! are transparent, and layers up to twice that thickness are heated with a
//! linear taper.
//!
//! # Example
//!
//! ```
//! use ocean_column::shortwave::{
//!     AbsorbInputs, AbsorbState, AbsorbStep, Optics, ShortwaveConfig, absorb_remaining,
//! };
//!
//! let config = ShortwaveConfig::default();
//! let optics = Optics::uniform(&[0.01], 1);
//! let h = [100.0];
//! let mut t = [0.0];
//! let mut pen = [50.0];
//!
//! absorb_remaining(
//!     &config,
//!     &optics,
//!     &AbsorbInputs::new(&h),
//!     &AbsorbStep::new(3600.0, 0.0),
//!     &mut AbsorbState::new(&mut t, &mut pen),
//! )
//! .unwrap();
//! assert!((t[0] - 0.316).abs() < 1e-3);
//! ```

mod absorb;
mod attenuation;
mod config;
mod error;
mod optics;
mod penetration;

pub use absorb::{
    AbsorbInputs, AbsorbOutcome, AbsorbPolicy, AbsorbState, AbsorbStep, absorb_remaining,
};
pub use config::{
    DEFAULT_ABSORB_MIN_THICKNESS, DEFAULT_FLUX_ABSORB, DEFAULT_MIN_HEATING_THICKNESS,
    SWA_TAYLOR_THRESHOLD, ShortwaveConfig, TKE_TAYLOR_THRESHOLD,
};
pub use error::ShortwaveError;
pub use optics::{Optics, WavelengthBand};
pub use penetration::{PenetratingFlux, integrate_penetrating_flux};
