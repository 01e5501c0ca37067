//! Aerosol optical properties from an Ångström parameterisation.

use serde::{Deserialize, Serialize};

use crate::errors::{SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::interpolate::LinearInterpolator;
use crate::profile::Profile;
use crate::warehouse::Warehouse;

use super::state::RadiatorState;

/// Aerosol configuration.
///
/// The spectral dependence of the column optical depth follows the Ångström
/// law τ(λ) = τ_ref · (λ/λ_ref)^(−α), and the vertical distribution an
/// exponential decay with scale height `H`, so a layer `[z_lo, z_hi]` carries
/// the column fraction `exp(−z_lo/H) − exp(−z_hi/H)`.
///
/// Single-scattering albedo and asymmetry factor are uniform unless spectral
/// tables are supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AerosolConfig {
    /// Column optical depth at the reference wavelength.
    pub optical_depth_ref: f64,
    /// Reference wavelength [nm].
    pub wavelength_ref: f64,
    /// Ångström exponent (typically 0.5–2.5).
    pub angstrom_exponent: f64,
    /// Scale height of the aerosol layer [km].
    pub scale_height: f64,
    /// Uniform single-scattering albedo, used when `ssa_wavelengths` is empty.
    pub single_scattering_albedo: f64,
    /// Uniform asymmetry factor, used when `g_wavelengths` is empty.
    pub asymmetry_factor: f64,
    /// Optional spectral single-scattering albedo table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssa_wavelengths: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssa_values: Vec<f64>,
    /// Optional spectral asymmetry-factor table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub g_wavelengths: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub g_values: Vec<f64>,
}

impl Default for AerosolConfig {
    /// Background continental aerosol: τ = 0.1 at 550 nm, α = 1.3,
    /// H = 2 km, ω = 0.9, g = 0.7.
    fn default() -> Self {
        Self {
            optical_depth_ref: 0.1,
            wavelength_ref: 550.0,
            angstrom_exponent: 1.3,
            scale_height: 2.0,
            single_scattering_albedo: 0.9,
            asymmetry_factor: 0.7,
            ssa_wavelengths: Vec::new(),
            ssa_values: Vec::new(),
            g_wavelengths: Vec::new(),
            g_values: Vec::new(),
        }
    }
}

impl AerosolConfig {
    fn validate(&self) -> SkyradResult<()> {
        if !(0.0..=1.0).contains(&self.single_scattering_albedo) {
            return Err(SkyradError::bounds(
                "aerosol single-scattering albedo",
                self.single_scattering_albedo,
            ));
        }
        if !(-1.0..=1.0).contains(&self.asymmetry_factor) {
            return Err(SkyradError::bounds(
                "aerosol asymmetry factor",
                self.asymmetry_factor,
            ));
        }
        if self.scale_height <= 0.0 {
            return Err(SkyradError::bounds(
                "aerosol scale height",
                self.scale_height,
            ));
        }
        if self.optical_depth_ref < 0.0 {
            return Err(SkyradError::bounds(
                "aerosol reference optical depth",
                self.optical_depth_ref,
            ));
        }
        if self.ssa_wavelengths.len() != self.ssa_values.len() {
            return Err(SkyradError::dimension(
                "aerosol spectral albedo table",
                self.ssa_wavelengths.len(),
                self.ssa_values.len(),
            ));
        }
        if self.g_wavelengths.len() != self.g_values.len() {
            return Err(SkyradError::dimension(
                "aerosol spectral asymmetry table",
                self.g_wavelengths.len(),
                self.g_values.len(),
            ));
        }
        Ok(())
    }
}

/// Aerosol radiator with configurable spectral and vertical structure.
#[derive(Debug, Clone)]
pub struct AerosolRadiator {
    config: AerosolConfig,
    wavelength_grid_name: String,
    altitude_grid_name: String,
    state: RadiatorState,
}

impl AerosolRadiator {
    /// Construct with a validated configuration.
    pub fn new(config: AerosolConfig) -> SkyradResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            wavelength_grid_name: "wavelength".to_string(),
            altitude_grid_name: "altitude".to_string(),
            state: RadiatorState::empty(),
        })
    }

    pub fn name(&self) -> &str {
        "aerosol"
    }

    pub fn config(&self) -> &AerosolConfig {
        &self.config
    }

    pub fn state(&self) -> &RadiatorState {
        &self.state
    }

    pub fn update_state(
        &mut self,
        grids: &Warehouse<Grid>,
        _profiles: &Warehouse<Profile>,
    ) -> SkyradResult<()> {
        let wl_grid = grids.get(&self.wavelength_grid_name, "nm")?;
        let alt_grid = grids.get(&self.altitude_grid_name, "km")?;

        let n_layers = alt_grid.n_cells();
        let n_wavelengths = wl_grid.n_cells();

        let wavelengths = wl_grid.midpoints();
        let edges = alt_grid.edges();
        let h = self.config.scale_height;

        let mut state = RadiatorState::new(n_layers, n_wavelengths);
        for i in 0..n_layers {
            let mut z_lo = edges[i];
            let mut z_hi = edges[i + 1];
            if z_lo > z_hi {
                std::mem::swap(&mut z_lo, &mut z_hi);
            }
            // Fraction of the exponential column in this layer
            let weight = (-z_lo / h).exp() - (-z_hi / h).exp();

            for j in 0..n_wavelengths {
                let ratio = wavelengths[j] / self.config.wavelength_ref;
                let tau_spectral =
                    self.config.optical_depth_ref * ratio.powf(-self.config.angstrom_exponent);

                state.set(
                    i,
                    j,
                    tau_spectral * weight,
                    self.ssa_at(wavelengths[j]),
                    self.g_at(wavelengths[j]),
                );
            }
        }
        self.state = state;
        Ok(())
    }

    fn ssa_at(&self, wavelength_nm: f64) -> f64 {
        if self.config.ssa_wavelengths.is_empty() {
            return self.config.single_scattering_albedo;
        }
        LinearInterpolator::new()
            .interpolate_one(
                wavelength_nm,
                &self.config.ssa_wavelengths,
                &self.config.ssa_values,
            )
            .clamp(0.0, 1.0)
    }

    fn g_at(&self, wavelength_nm: f64) -> f64 {
        if self.config.g_wavelengths.is_empty() {
            return self.config.asymmetry_factor;
        }
        LinearInterpolator::new()
            .interpolate_one(
                wavelength_nm,
                &self.config.g_wavelengths,
                &self.config.g_values,
            )
            .clamp(-1.0, 1.0)
    }
}
