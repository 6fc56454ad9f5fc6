//! Single-layer, single-band attenuation shared by both absorber contracts.

use super::config::{SWA_TAYLOR_THRESHOLD, ShortwaveConfig, TKE_TAYLOR_THRESHOLD};

/// Attenuation of one band through one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LayerAttenuation {
    /// Optical depth `h × opacity`
    pub opt_depth: f64,
    /// `exp(−opt_depth)`
    pub exp_od: f64,
    /// Heat absorbed in the layer [K H], already tapered for thin layers
    pub heat: f64,
}

/// Attenuate `pen` through a layer of thickness `h`.
///
/// When the transmitted flux would heat the water below by less than the
/// configured minimum, the whole incoming flux is absorbed here instead.
#[inline]
pub(crate) fn attenuate(
    config: &ShortwaveConfig,
    n_bands: usize,
    pen: f64,
    opacity: f64,
    h: f64,
    weight: f64,
    dt: f64,
) -> LayerAttenuation {
    let opt_depth = h * opacity;
    let exp_od = (-opt_depth).exp();
    let mut sw_trans = exp_od;

    let min_sw_heat = config.flux_absorb * dt;
    if (n_bands as f64) * pen * sw_trans
        < min_sw_heat * (config.absorb_inverse_length() * h).min(1.0)
    {
        sw_trans = 0.0;
    }

    LayerAttenuation {
        opt_depth,
        exp_od,
        heat: weight * pen * (1.0 - sw_trans),
    }
}

/// Fraction of the heat absorbed in a layer of thickness `h` that is moved
/// into the `h_heat` of already-heated water above, before clamping.
#[inline]
pub(crate) fn upward_fraction(opt_depth: f64, opacity: f64, h: f64, h_heat: f64) -> f64 {
    if opt_depth > SWA_TAYLOR_THRESHOLD {
        // (od + (od + 2)·e − 2) / ((od + κ·h_heat)(1 − e)), written around
        // expm1 so the numerator keeps its digits near the threshold
        let em1 = (-opt_depth).exp_m1();
        ((opt_depth + 2.0) * (em1 + opt_depth) - opt_depth * opt_depth)
            / ((opt_depth + opacity * h_heat) * -em1)
    } else {
        h * opt_depth * (60.0 - opt_depth * opt_depth) / (360.0 * (h_heat + h))
    }
}

/// Clamp the upward fraction so the water above warms no more than the
/// layer itself.
///
/// Returns `(swa, co_fraction)`: the clamped fraction and the share of the
/// absorbed heat that stays subject to the TKE sink.
#[inline]
pub(crate) fn clamp_upward_fraction(swa: f64, h: f64, h_heat: f64) -> (f64, f64) {
    let total = swa * (h_heat + h);
    if total > h_heat {
        (h_heat / (h_heat + h), (total - h_heat) / total)
    } else {
        (swa, 0.0)
    }
}

/// Dimensionless shape factor of the TKE needed to mix heat absorbed
/// exponentially through a layer of optical depth `opt_depth` evenly over
/// the layer.
#[inline]
pub(crate) fn tke_shape(opt_depth: f64, exp_od: f64) -> f64 {
    if opt_depth > TKE_TAYLOR_THRESHOLD {
        (opt_depth * (1.0 + exp_od) - 2.0 * (1.0 - exp_od)) / (opt_depth * (1.0 - exp_od))
    } else {
        opt_depth * (1.0 / 6.0) * (1.0 - opt_depth * opt_depth * (1.0 / 60.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attenuate_exact_fraction() {
        let config = ShortwaveConfig::default();
        let att = attenuate(&config, 1, 50.0, 0.01, 100.0, 1.0, 3600.0);
        assert!((att.opt_depth - 1.0).abs() < 1e-14);
        let expected = 50.0 * (1.0 - (-1.0_f64).exp());
        assert!((att.heat - expected).abs() < 1e-12);
    }

    #[test]
    fn test_attenuate_snaps_small_flux() {
        let config = ShortwaveConfig::default();
        // Transmitted flux far below flux_absorb × dt
        let att = attenuate(&config, 1, 1e-10, 1e-3, 1.0, 1.0, 3600.0);
        assert_eq!(att.heat, 1e-10);
    }

    #[test]
    fn test_attenuate_applies_weight() {
        let config = ShortwaveConfig::default();
        let full = attenuate(&config, 1, 10.0, 0.1, 5.0, 1.0, 60.0);
        let half = attenuate(&config, 1, 10.0, 0.1, 5.0, 0.5, 60.0);
        assert!((half.heat - 0.5 * full.heat).abs() < 1e-14);
    }

    #[test]
    fn test_upward_fraction_branches_meet() {
        let h = 10.0;
        let h_heat = 30.0;
        let eps = 1e-9;
        for &od in &[SWA_TAYLOR_THRESHOLD - eps, SWA_TAYLOR_THRESHOLD + eps] {
            let opacity = od / h;
            let v = upward_fraction(od, opacity, h, h_heat);
            let leading = od * h / (6.0 * (h + h_heat));
            assert!((v - leading).abs() < 1e-4 * leading, "od={od}: {v} vs {leading}");
        }
        // Opaque layer with nothing above: (od − 2) / od
        let od = 50.0;
        let v = upward_fraction(od, od / h, h, 0.0);
        assert!((v - (od - 2.0) / od).abs() < 1e-12);
    }

    #[test]
    fn test_tke_shape_branches_meet() {
        let below = TKE_TAYLOR_THRESHOLD * (1.0 - 1e-9);
        let above = TKE_TAYLOR_THRESHOLD * (1.0 + 1e-9);
        let a = tke_shape(below, (-below).exp());
        let b = tke_shape(above, (-above).exp());
        assert!((a - b).abs() < 1e-7 * a.abs(), "{a} vs {b}");
        // Large optical depth approaches 1 − 2/od
        let od = 50.0;
        assert!((tke_shape(od, (-od).exp()) - (1.0 - 2.0 / od)).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_upward_fraction() {
        // Unclamped
        let (swa, co) = clamp_upward_fraction(0.1, 10.0, 10.0);
        assert_eq!((swa, co), (0.1, 0.0));
        // Would warm the water above more than the layer
        let (swa, co) = clamp_upward_fraction(0.9, 10.0, 10.0);
        assert!((swa - 0.5).abs() < 1e-15);
        assert!((co - (18.0 - 10.0) / 18.0).abs() < 1e-15);
    }
}
