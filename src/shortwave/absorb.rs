//! In-place absorption of the shortwave radiation remaining in a column.
//!
//! A downward pass attenuates every band through each visited layer, heats
//! the layer, drains the per-band irradiance and optionally defers part of
//! the heat to the water above and accumulates a TKE sink. An optional
//! upward pass then hands out the deferred heat and, with `absorb_all`,
//! whatever reached the bottom.

use log::{trace, warn};

use super::attenuation::{attenuate, clamp_upward_fraction, tke_shape, upward_fraction};
use super::config::ShortwaveConfig;
use super::error::ShortwaveError;
use super::optics::Optics;

/// Policy switches for [`absorb_remaining`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AbsorbPolicy {
    /// Move part of each layer's heating into the heated water above, so the
    /// heating is consistent with a pressure-averaged profile.
    pub adjust_absorption_profile: bool,
    /// Redistribute radiation reaching the bottom through the heated column
    /// instead of letting it escape.
    pub absorb_all: bool,
}

impl AbsorbPolicy {
    /// Set [`AbsorbPolicy::adjust_absorption_profile`].
    pub fn with_adjust_absorption_profile(mut self, adjust: bool) -> Self {
        self.adjust_absorption_profile = adjust;
        self
    }

    /// Set [`AbsorbPolicy::absorb_all`].
    pub fn with_absorb_all(mut self, absorb_all: bool) -> Self {
        self.absorb_all = absorb_all;
        self
    }
}

/// Time step and limiter depth of one absorption call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbsorbStep {
    /// Time step [s]
    pub dt: f64,
    /// Heated thickness below which bottom radiation is only partly
    /// redistributed [H]. Non-positive disables the limiter.
    pub flux_limit_depth: f64,
    /// Profile adjustment and bottom redistribution switches.
    pub policy: AbsorbPolicy,
}

impl AbsorbStep {
    /// Step with the default policy (no adjustment, residual escapes).
    pub fn new(dt: f64, flux_limit_depth: f64) -> Self {
        Self {
            dt,
            flux_limit_depth,
            policy: AbsorbPolicy::default(),
        }
    }

    /// Set the absorption policy.
    pub fn with_policy(mut self, policy: AbsorbPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Read-only inputs of one column.
#[derive(Clone, Copy, Debug)]
pub struct AbsorbInputs<'a> {
    /// Layer thickness [H]
    pub thickness: &'a [f64],
    /// Minimum thickness each layer retains; layers no thicker than 1.5× this
    /// are transparent.
    pub min_retained_thickness: Option<&'a [f64]>,
    /// Layers to visit, top to bottom. Unlisted layers are skipped.
    pub sorted_order: Option<&'a [usize]>,
    /// Thickness of an already-heated mixed layer above the column [H].
    pub mixed_layer_thickness: Option<f64>,
    /// ∂(specific volume)/∂T per layer; required with a TKE sink.
    pub dsv_dt: Option<&'a [f64]>,
}

impl<'a> AbsorbInputs<'a> {
    pub fn new(thickness: &'a [f64]) -> Self {
        Self {
            thickness,
            min_retained_thickness: None,
            sorted_order: None,
            mixed_layer_thickness: None,
            dsv_dt: None,
        }
    }

    pub fn with_min_retained_thickness(mut self, eps: &'a [f64]) -> Self {
        self.min_retained_thickness = Some(eps);
        self
    }

    pub fn with_sorted_order(mut self, order: &'a [usize]) -> Self {
        self.sorted_order = Some(order);
        self
    }

    pub fn with_mixed_layer_thickness(mut self, htot: f64) -> Self {
        self.mixed_layer_thickness = Some(htot);
        self
    }

    pub fn with_dsv_dt(mut self, dsv_dt: &'a [f64]) -> Self {
        self.dsv_dt = Some(dsv_dt);
        self
    }
}

/// Mutable state of one column.
#[derive(Debug)]
pub struct AbsorbState<'a> {
    /// Layer temperature [°C], heated in place
    pub temperature: &'a mut [f64],
    /// Per-band irradiance entering the column [K H], drained in place
    pub irradiance: &'a mut [f64],
    /// TKE sink per layer; decreased by the energy needed to mix the heating
    pub tke: Option<&'a mut [f64]>,
    /// Temperature integral of the mixed layer [K H]; updated only when a
    /// mixed-layer thickness is given
    pub mixed_layer_temperature: Option<&'a mut f64>,
}

impl<'a> AbsorbState<'a> {
    pub fn new(temperature: &'a mut [f64], irradiance: &'a mut [f64]) -> Self {
        Self {
            temperature,
            irradiance,
            tke: None,
            mixed_layer_temperature: None,
        }
    }

    pub fn with_tke(mut self, tke: &'a mut [f64]) -> Self {
        self.tke = Some(tke);
        self
    }

    pub fn with_mixed_layer_temperature(mut self, ttot: &'a mut f64) -> Self {
        self.mixed_layer_temperature = Some(ttot);
        self
    }
}

/// Bookkeeping returned by [`absorb_remaining`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AbsorbOutcome {
    /// Heated thickness of the column including any mixed layer [H]
    pub heated_thickness: f64,
    /// Radiation left after the downward pass, summed over bands [K H]
    pub bottom_residual: f64,
    /// Part of the residual handed back to the column [K H]
    pub redistributed_heat: f64,
    /// Part of the residual dropped by the limiter [K H]
    pub discarded_heat: f64,
}

/// Absorb the shortwave radiation remaining in one column.
///
/// `irradiance` holds one entry per band of `optics` and is drained as the
/// radiation is absorbed. With `absorb_all` and a positive heated thickness
/// the residual is distributed in proportion to the heated thickness of each
/// layer; if that thickness is below `flux_limit_depth` only the fraction
/// `h_heat / flux_limit_depth` is kept and the rest is reported as
/// [`AbsorbOutcome::discarded_heat`]. In both cases the irradiance ends at
/// zero.
///
/// # Errors
///
/// Mismatched array lengths, a TKE sink without ∂SV/∂T (or the reverse) and
/// a sorted order naming a missing layer.
pub fn absorb_remaining(
    config: &ShortwaveConfig,
    optics: &Optics,
    inputs: &AbsorbInputs<'_>,
    step: &AbsorbStep,
    state: &mut AbsorbState<'_>,
) -> Result<AbsorbOutcome, ShortwaveError> {
    let nk = inputs.thickness.len();
    let nsw = optics.n_bands();
    validate(optics, inputs, state, nk)?;

    let order: Vec<usize> = match inputs.sorted_order {
        Some(order) => order.to_vec(),
        None => (0..nk).collect(),
    };
    let policy = step.policy;

    let mut h_heat = inputs.mixed_layer_thickness.unwrap_or(0.0);
    let mut t_chg_above = vec![0.0; nk];

    for &k in &order {
        let h = inputs.thickness[k];
        let eps = inputs.min_retained_thickness.map_or(0.0, |e| e[k]);
        let weight = config.heating_weight(h);

        if h > 1.5 * eps && weight > 0.0 {
            for n in 0..nsw {
                let pen = state.irradiance[n];
                if pen <= 0.0 {
                    continue;
                }
                let opacity = optics.opacity(n, k);
                let att = attenuate(config, nsw, pen, opacity, h, weight, step.dt);

                let co_frac = if policy.adjust_absorption_profile && h_heat > 0.0 {
                    let swa = upward_fraction(att.opt_depth, opacity, h, h_heat);
                    let (swa, co_frac) = clamp_upward_fraction(swa, h, h_heat);
                    t_chg_above[k] += swa * att.heat / h_heat;
                    state.temperature[k] += (1.0 - swa) * att.heat / h;
                    co_frac
                } else {
                    state.temperature[k] += att.heat / h;
                    1.0
                };

                if let (Some(tke), Some(dsv_dt)) = (state.tke.as_deref_mut(), inputs.dsv_dt) {
                    tke[k] -= co_frac
                        * att.heat
                        * dsv_dt[k]
                        * (0.5 * h * config.tke_conversion)
                        * tke_shape(att.opt_depth, att.exp_od);
                }

                state.irradiance[n] = pen - att.heat;
            }
        }

        h_heat += weight * h;
    }

    let mut outcome = AbsorbOutcome {
        heated_thickness: h_heat,
        bottom_residual: state.irradiance.iter().sum(),
        ..Default::default()
    };

    if !(policy.absorb_all || policy.adjust_absorption_profile) {
        return Ok(outcome);
    }

    let mut t_chg = 0.0;
    if policy.absorb_all && outcome.bottom_residual > 0.0 && h_heat > 0.0 {
        let remaining = outcome.bottom_residual;
        let limit = step.flux_limit_depth;
        if limit <= 0.0 || h_heat >= limit {
            t_chg = remaining / h_heat;
            outcome.redistributed_heat = remaining;
        } else {
            t_chg = remaining / limit;
            outcome.redistributed_heat = remaining * h_heat / limit;
            outcome.discarded_heat = remaining - outcome.redistributed_heat;
            warn!(
                "heated thickness {h_heat:.3e} below limiter depth {limit:.3e}, \
                 discarding {:.3e} of bottom shortwave",
                outcome.discarded_heat
            );
        }
        state.irradiance.iter_mut().for_each(|pen| *pen = 0.0);
    }

    for &k in order.iter().rev() {
        if t_chg > 0.0 {
            state.temperature[k] += t_chg * config.heating_weight(inputs.thickness[k]);
        }
        t_chg += t_chg_above[k];
    }

    if let (Some(htot), Some(ttot)) = (
        inputs.mixed_layer_thickness,
        state.mixed_layer_temperature.as_deref_mut(),
    ) {
        *ttot += t_chg * htot;
    }

    trace!(
        "absorbed column: h_heat={:.3e} residual={:.3e} redistributed={:.3e}",
        outcome.heated_thickness, outcome.bottom_residual, outcome.redistributed_heat
    );

    Ok(outcome)
}

fn validate(
    optics: &Optics,
    inputs: &AbsorbInputs<'_>,
    state: &AbsorbState<'_>,
    nk: usize,
) -> Result<(), ShortwaveError> {
    ShortwaveError::check_len("temperature", nk, state.temperature.len())?;
    ShortwaveError::check_len("opacity layers", nk, optics.n_layers())?;
    ShortwaveError::check_len("irradiance", optics.n_bands(), state.irradiance.len())?;
    if let Some(eps) = inputs.min_retained_thickness {
        ShortwaveError::check_len("min_retained_thickness", nk, eps.len())?;
    }
    match (&state.tke, inputs.dsv_dt) {
        (Some(tke), Some(dsv_dt)) => {
            ShortwaveError::check_len("tke", nk, tke.len())?;
            ShortwaveError::check_len("dsv_dt", nk, dsv_dt.len())?;
        }
        (None, None) => {}
        _ => return Err(ShortwaveError::MismatchedTkeArguments),
    }
    if let Some(order) = inputs.sorted_order {
        if let Some(&layer) = order.iter().find(|&&k| k >= nk) {
            return Err(ShortwaveError::InvalidOrder { layer, n_layers: nk });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn column_heat(t_new: &[f64], t_old: &[f64], h: &[f64]) -> f64 {
        t_new
            .iter()
            .zip(t_old)
            .zip(h)
            .map(|((a, b), h)| (a - b) * h)
            .sum()
    }

    #[test]
    fn test_single_layer_single_band() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.01], 1);
        let h = [100.0];
        let mut t = [0.0];
        let mut pen = [50.0];

        let outcome = absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h),
            &AbsorbStep::new(3600.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen),
        )
        .unwrap();

        let absorbed = 50.0 * (1.0 - (-1.0_f64).exp());
        assert!((t[0] - absorbed / 100.0).abs() < TOL);
        assert!((t[0] - 0.316).abs() < 1e-3);
        assert!((pen[0] - (50.0 - absorbed)).abs() < TOL);
        assert!((outcome.bottom_residual - pen[0]).abs() < TOL);
        assert_eq!(outcome.heated_thickness, 100.0);
    }

    #[test]
    fn test_zero_irradiance_changes_nothing() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.1, 0.01], 3);
        let h = [5.0, 10.0, 20.0];
        let dsv = [2e-7; 3];
        let mut t = [10.0, 9.0, 8.0];
        let mut pen = [0.0, 0.0];
        let mut tke = [0.0; 3];
        let policy = AbsorbPolicy::default()
            .with_adjust_absorption_profile(true)
            .with_absorb_all(true);

        let outcome = absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h).with_dsv_dt(&dsv),
            &AbsorbStep::new(600.0, 10.0).with_policy(policy),
            &mut AbsorbState::new(&mut t, &mut pen).with_tke(&mut tke),
        )
        .unwrap();

        assert_eq!(t, [10.0, 9.0, 8.0]);
        assert_eq!(tke, [0.0; 3]);
        assert_eq!(outcome.redistributed_heat, 0.0);
    }

    #[test]
    fn test_adjusted_profile_conserves_heat() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.2, 0.02], 4);
        let h = [2.0, 5.0, 10.0, 40.0];
        let t0 = [20.0, 19.0, 18.0, 15.0];
        let mut t = t0;
        let mut pen = [30.0, 70.0];
        let policy = AbsorbPolicy::default().with_adjust_absorption_profile(true);

        absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h),
            &AbsorbStep::new(3600.0, 0.0).with_policy(policy),
            &mut AbsorbState::new(&mut t, &mut pen),
        )
        .unwrap();

        let heat = column_heat(&t, &t0, &h);
        assert!((heat + pen.iter().sum::<f64>() - 100.0).abs() < 1e-10);
        // Deferred heating raises the top layer above its direct share
        let direct = 30.0 * (1.0 - (-0.4_f64).exp()) + 70.0 * (1.0 - (-0.04_f64).exp());
        assert!((t[0] - t0[0]) * h[0] > direct);
    }

    #[test]
    fn test_mixed_layer_integral_receives_deferred_heat() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.05], 2);
        let h = [10.0, 10.0];
        let t0 = [12.0, 11.0];
        let mut t = t0;
        let mut pen = [40.0];
        let mut ttot = 0.0;
        let policy = AbsorbPolicy::default().with_adjust_absorption_profile(true);

        absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h).with_mixed_layer_thickness(5.0),
            &AbsorbStep::new(3600.0, 0.0).with_policy(policy),
            &mut AbsorbState::new(&mut t, &mut pen).with_mixed_layer_temperature(&mut ttot),
        )
        .unwrap();

        assert!(ttot > 0.0);
        let heat = column_heat(&t, &t0, &h) + ttot;
        assert!((heat + pen[0] - 40.0).abs() < 1e-10);
    }

    #[test]
    fn test_tke_sink_is_negative_for_positive_expansion() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.1], 2);
        let h = [10.0, 10.0];
        let dsv = [2e-7, 2e-7];
        let mut t = [10.0, 10.0];
        let mut pen = [100.0];
        let mut tke = [0.0, 0.0];

        absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h).with_dsv_dt(&dsv),
            &AbsorbStep::new(3600.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen).with_tke(&mut tke),
        )
        .unwrap();

        assert!(tke[0] < 0.0);
        assert!(tke[1] < 0.0);
    }

    #[test]
    fn test_tke_sink_value_single_layer() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.01], 1);
        let h = [100.0];
        let dsv = [2e-7];
        let mut t = [0.0];
        let mut pen = [50.0];
        let mut tke = [0.0];

        absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h).with_dsv_dt(&dsv),
            &AbsorbStep::new(3600.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen).with_tke(&mut tke),
        )
        .unwrap();

        let od = 1.0_f64;
        let e = (-od).exp();
        let heat = 50.0 * (1.0 - e);
        let shape = (od * (1.0 + e) - 2.0 * (1.0 - e)) / (od * (1.0 - e));
        let expected = -heat * dsv[0] * 0.5 * h[0] * config.tke_conversion * shape;
        assert!(
            (tke[0] - expected).abs() < 1e-10 * expected.abs(),
            "tke = {}, expected {}",
            tke[0],
            expected
        );
    }

    #[test]
    fn test_tke_arguments_come_in_pairs() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.1], 1);
        let h = [10.0];
        let mut t = [10.0];
        let mut pen = [1.0];
        let mut tke = [0.0];

        let err = absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h),
            &AbsorbStep::new(60.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen).with_tke(&mut tke),
        )
        .unwrap_err();
        assert_eq!(err, ShortwaveError::MismatchedTkeArguments);

        let dsv = [1e-7];
        let err = absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h).with_dsv_dt(&dsv),
            &AbsorbStep::new(60.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen),
        )
        .unwrap_err();
        assert_eq!(err, ShortwaveError::MismatchedTkeArguments);
    }

    #[test]
    fn test_dimension_checks() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.1, 0.2], 2);
        let h = [10.0, 10.0];
        let mut t = [10.0, 10.0];
        let mut pen = [1.0];

        let err = absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h),
            &AbsorbStep::new(60.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen),
        )
        .unwrap_err();
        assert_eq!(err, ShortwaveError::dimension_mismatch("irradiance", 2, 1));
    }

    #[test]
    fn test_sorted_order_skips_unlisted_layers() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.05], 3);
        let h = [10.0, 10.0, 10.0];
        let order = [2, 0];
        let mut t = [0.0; 3];
        let mut pen = [10.0];

        absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h).with_sorted_order(&order),
            &AbsorbStep::new(3600.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen),
        )
        .unwrap();

        assert_eq!(t[1], 0.0);
        // Layer 2 is visited first and sees the full flux
        assert!(t[2] > t[0]);

        let bad = [0, 3];
        let err = absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h).with_sorted_order(&bad),
            &AbsorbStep::new(3600.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen),
        )
        .unwrap_err();
        assert_eq!(err, ShortwaveError::InvalidOrder { layer: 3, n_layers: 3 });
    }

    #[test]
    fn test_retained_thickness_makes_layer_transparent() {
        let config = ShortwaveConfig::default();
        let optics = Optics::uniform(&[0.05], 2);
        let h = [1.0, 10.0];
        let eps = [1.0, 0.0];
        let mut t = [0.0; 2];
        let mut pen = [10.0];

        absorb_remaining(
            &config,
            &optics,
            &AbsorbInputs::new(&h).with_min_retained_thickness(&eps),
            &AbsorbStep::new(3600.0, 0.0),
            &mut AbsorbState::new(&mut t, &mut pen),
        )
        .unwrap();

        assert_eq!(t[0], 0.0);
        let expected = 10.0 * (1.0 - (-0.5_f64).exp()) / 10.0;
        assert!((t[1] - expected).abs() < TOL);
    }
}
