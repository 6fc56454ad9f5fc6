//! Net penetrating shortwave flux at every interface of a column.
//!
//! Uses the same per-layer attenuation as [`absorb_remaining`] without
//! touching any state, for boundary-layer schemes that need the flux
//! profile rather than the heating.
//!
//! [`absorb_remaining`]: super::absorb_remaining

use log::trace;

use super::attenuation::attenuate;
use super::config::ShortwaveConfig;
use super::error::ShortwaveError;
use super::optics::Optics;

/// Flux profile returned by [`integrate_penetrating_flux`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PenetratingFlux {
    /// Net downward flux at each interface, surface first [K H]
    pub net: Vec<f64>,
    /// Flux reaching the bottom before any redistribution [K H]
    pub bottom_residual: f64,
    /// Part of the residual folded back into the column [K H]
    pub redistributed_heat: f64,
    /// Part of the residual dropped by the limiter [K H]
    pub discarded_heat: f64,
}

impl PenetratingFlux {
    /// Heat deposited in layer `k`.
    pub fn layer_heating(&self, k: usize) -> f64 {
        self.net[k] - self.net[k + 1]
    }

    pub fn n_layers(&self) -> usize {
        self.net.len().saturating_sub(1)
    }
}

/// Integrate the net penetrating flux through a column.
///
/// `incident` holds the per-band irradiance at the surface. With
/// `absorb_all` the bottom residual is folded back into the profile in
/// proportion to the heated thickness above each interface, so the flux at
/// the bottom interface equals the part dropped by the `flux_limit_depth`
/// limiter (zero when the heated thickness reaches it).
pub fn integrate_penetrating_flux(
    config: &ShortwaveConfig,
    optics: &Optics,
    thickness: &[f64],
    incident: &[f64],
    dt: f64,
    flux_limit_depth: f64,
    absorb_all: bool,
) -> Result<PenetratingFlux, ShortwaveError> {
    let nk = thickness.len();
    let nsw = optics.n_bands();
    ShortwaveError::check_len("opacity layers", nk, optics.n_layers())?;
    ShortwaveError::check_len("irradiance", nsw, incident.len())?;

    let mut pen = incident.to_vec();
    let mut net = vec![0.0; nk + 1];
    let mut heated_above = vec![0.0; nk + 1];
    net[0] = pen.iter().sum();

    let mut h_heat = 0.0;
    for (k, &h) in thickness.iter().enumerate() {
        let weight = config.heating_weight(h);
        if weight > 0.0 {
            for (n, pen_n) in pen.iter_mut().enumerate() {
                if *pen_n <= 0.0 {
                    continue;
                }
                let att = attenuate(config, nsw, *pen_n, optics.opacity(n, k), h, weight, dt);
                *pen_n -= att.heat;
            }
        }
        net[k + 1] = pen.iter().sum();
        h_heat += weight * h;
        heated_above[k + 1] = h_heat;
    }

    let mut flux = PenetratingFlux {
        bottom_residual: net[nk],
        ..Default::default()
    };

    if absorb_all && flux.bottom_residual > 0.0 && h_heat > 0.0 {
        let remaining = flux.bottom_residual;
        let fraction = if flux_limit_depth <= 0.0 || h_heat >= flux_limit_depth {
            1.0
        } else {
            h_heat / flux_limit_depth
        };
        flux.redistributed_heat = remaining * fraction;
        flux.discarded_heat = remaining - flux.redistributed_heat;
        for k in 1..=nk {
            net[k] -= flux.redistributed_heat * heated_above[k] / h_heat;
        }
        net[nk] = flux.discarded_heat;
    }

    trace!(
        "penetrating flux: surface={:.3e} bottom={:.3e}",
        net[0], net[nk]
    );

    flux.net = net;
    Ok(flux)
}
