//! Per-column optical properties for banded shortwave radiation.
//!
//! Opacity is stored with the band index fastest, so the bands of one layer
//! are contiguous. Wavelength bounds are optional metadata and play no part
//! in the attenuation itself.

use std::fmt;

use super::error::ShortwaveError;

/// Wavelength bounds of one shortwave band [nm].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavelengthBand {
    pub min_wavelength: f64,
    pub max_wavelength: f64,
}

impl WavelengthBand {
    pub fn new(min_wavelength: f64, max_wavelength: f64) -> Self {
        Self {
            min_wavelength,
            max_wavelength,
        }
    }

    /// Band centre [nm].
    pub fn center(&self) -> f64 {
        0.5 * (self.min_wavelength + self.max_wavelength)
    }
}

impl fmt::Display for WavelengthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} nm", self.min_wavelength, self.max_wavelength)
    }
}

/// Opacity field of one column.
#[derive(Clone, Debug, PartialEq)]
pub struct Optics {
    n_bands: usize,
    n_layers: usize,
    /// Opacity [H⁻¹], index `layer * n_bands + band`
    opacity: Vec<f64>,
    bands: Vec<WavelengthBand>,
}

impl Optics {
    /// Create from a flattened opacity array (band index fastest).
    pub fn new(n_bands: usize, n_layers: usize, opacity: Vec<f64>) -> Result<Self, ShortwaveError> {
        ShortwaveError::check_len("opacity", n_bands * n_layers, opacity.len())?;
        Ok(Self {
            n_bands,
            n_layers,
            opacity,
            bands: Vec::new(),
        })
    }

    /// Same opacity in every layer, one value per band.
    pub fn uniform(band_opacity: &[f64], n_layers: usize) -> Self {
        Self::from_fn(band_opacity.len(), n_layers, |band, _| band_opacity[band])
    }

    /// Build from a function of (band, layer).
    pub fn from_fn<F>(n_bands: usize, n_layers: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut opacity = Vec::with_capacity(n_bands * n_layers);
        for k in 0..n_layers {
            for n in 0..n_bands {
                opacity.push(f(n, k));
            }
        }
        Self {
            n_bands,
            n_layers,
            opacity,
            bands: Vec::new(),
        }
    }

    /// Attach wavelength bounds, one per band.
    pub fn with_wavelengths(mut self, bands: Vec<WavelengthBand>) -> Result<Self, ShortwaveError> {
        ShortwaveError::check_len("wavelength bands", self.n_bands, bands.len())?;
        self.bands = bands;
        Ok(self)
    }

    #[inline]
    pub fn n_bands(&self) -> usize {
        self.n_bands
    }

    #[inline]
    pub fn n_layers(&self) -> usize {
        self.n_layers
    }

    /// Wavelength bounds, empty if none were attached.
    pub fn wavelengths(&self) -> &[WavelengthBand] {
        &self.bands
    }

    /// Opacity of `band` in `layer` [H⁻¹].
    #[inline]
    pub fn opacity(&self, band: usize, layer: usize) -> f64 {
        self.opacity[layer * self.n_bands + band]
    }

    /// Opacities of all bands in `layer`.
    #[inline]
    pub fn layer_opacity(&self, layer: usize) -> &[f64] {
        let start = layer * self.n_bands;
        &self.opacity[start..start + self.n_bands]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        let optics = Optics::uniform(&[0.1, 0.02], 3);
        assert_eq!(optics.n_bands(), 2);
        assert_eq!(optics.n_layers(), 3);
        for k in 0..3 {
            assert_eq!(optics.opacity(0, k), 0.1);
            assert_eq!(optics.opacity(1, k), 0.02);
            assert_eq!(optics.layer_opacity(k), &[0.1, 0.02]);
        }
    }

    #[test]
    fn test_from_fn_band_fastest() {
        let optics = Optics::from_fn(2, 2, |n, k| (10 * k + n) as f64);
        assert_eq!(optics.opacity(1, 0), 1.0);
        assert_eq!(optics.opacity(0, 1), 10.0);
        assert_eq!(optics.layer_opacity(1), &[10.0, 11.0]);
    }

    #[test]
    fn test_new_checks_length() {
        let err = Optics::new(2, 3, vec![0.0; 5]).unwrap_err();
        assert_eq!(err, ShortwaveError::dimension_mismatch("opacity", 6, 5));
        assert!(Optics::new(2, 3, vec![0.0; 6]).is_ok());
    }

    #[test]
    fn test_wavelength_metadata() {
        let optics = Optics::uniform(&[0.05, 0.5], 1)
            .with_wavelengths(vec![WavelengthBand::new(400.0, 550.0), WavelengthBand::new(550.0, 700.0)])
            .unwrap();
        assert_eq!(optics.wavelengths().len(), 2);
        assert_eq!(optics.wavelengths()[0].center(), 475.0);
        assert_eq!(format!("{}", optics.wavelengths()[1]), "550-700 nm");

        let bad = Optics::uniform(&[0.05], 1).with_wavelengths(vec![]);
        assert!(bad.is_err());
    }
}
