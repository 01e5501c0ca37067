//! Per-species optical-property blocks.

use ndarray::Array2;

use crate::errors::{SkyradError, SkyradResult};

/// Wavelength-resolved optical properties of one radiator across all layers.
///
/// Three arrays of shape `[n_layers][n_wavelengths]`:
///
/// - **optical depth** τ = σ·N·Δz,
/// - **single-scattering albedo** ω ∈ [0, 1] (0 = pure absorber,
///   1 = conservative scatterer),
/// - **asymmetry factor** g ∈ [−1, 1] (0 = isotropic, +1 = forward).
///
/// States accumulate by the standard mixing rules: extinction adds, ω is the
/// τ-weighted average, and g is the scattering-optical-depth-weighted average.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiatorState {
    optical_depth: Array2<f64>,
    single_scattering_albedo: Array2<f64>,
    asymmetry_factor: Array2<f64>,
}

impl RadiatorState {
    /// Zero-initialised state for the given dimensions.
    pub fn new(n_layers: usize, n_wavelengths: usize) -> Self {
        Self {
            optical_depth: Array2::zeros((n_layers, n_wavelengths)),
            single_scattering_albedo: Array2::zeros((n_layers, n_wavelengths)),
            asymmetry_factor: Array2::zeros((n_layers, n_wavelengths)),
        }
    }

    /// An empty (0 × 0) state; accumulating into it adopts the other state.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn n_layers(&self) -> usize {
        self.optical_depth.nrows()
    }

    pub fn n_wavelengths(&self) -> usize {
        self.optical_depth.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.optical_depth.is_empty()
    }

    pub fn optical_depth(&self) -> &Array2<f64> {
        &self.optical_depth
    }

    pub fn single_scattering_albedo(&self) -> &Array2<f64> {
        &self.single_scattering_albedo
    }

    pub fn asymmetry_factor(&self) -> &Array2<f64> {
        &self.asymmetry_factor
    }

    /// Set the optical properties of one cell.
    pub fn set(&mut self, layer: usize, wavelength: usize, tau: f64, omega: f64, g: f64) {
        self.optical_depth[[layer, wavelength]] = tau;
        self.single_scattering_albedo[[layer, wavelength]] = omega;
        self.asymmetry_factor[[layer, wavelength]] = g;
    }

    /// Optical properties of one cell as `(τ, ω, g)`.
    pub fn get(&self, layer: usize, wavelength: usize) -> (f64, f64, f64) {
        (
            self.optical_depth[[layer, wavelength]],
            self.single_scattering_albedo[[layer, wavelength]],
            self.asymmetry_factor[[layer, wavelength]],
        )
    }

    /// Accumulate another radiator's state into this one, cell-wise:
    ///
    /// - τ' = τ₁ + τ₂
    /// - ω' = (τ₁ω₁ + τ₂ω₂) / τ'  (0 when τ' = 0)
    /// - g' = (τ₁ω₁g₁ + τ₂ω₂g₂) / (τ₁ω₁ + τ₂ω₂)  (0 when the denominator is 0)
    ///
    /// Accumulating an empty state is a no-op; accumulating into an empty
    /// state adopts `other`. Fails with [`SkyradError::InvalidDimension`] on
    /// shape mismatch.
    pub fn accumulate(&mut self, other: &RadiatorState) -> SkyradResult<()> {
        if other.is_empty() {
            return Ok(());
        }
        if self.is_empty() {
            *self = other.clone();
            return Ok(());
        }

        if self.n_layers() != other.n_layers() || self.n_wavelengths() != other.n_wavelengths() {
            return Err(SkyradError::dimension(
                "radiator state accumulation",
                self.n_layers() * self.n_wavelengths(),
                other.n_layers() * other.n_wavelengths(),
            ));
        }

        for i in 0..self.n_layers() {
            for j in 0..self.n_wavelengths() {
                let (tau_1, omega_1, g_1) = self.get(i, j);
                let (tau_2, omega_2, g_2) = other.get(i, j);

                let tau = tau_1 + tau_2;
                let omega = if tau > 0.0 {
                    (tau_1 * omega_1 + tau_2 * omega_2) / tau
                } else {
                    0.0
                };

                let scatter_1 = tau_1 * omega_1;
                let scatter_2 = tau_2 * omega_2;
                let scatter = scatter_1 + scatter_2;
                let g = if scatter > 0.0 {
                    (scatter_1 * g_1 + scatter_2 * g_2) / scatter
                } else {
                    0.0
                };

                self.set(i, j, tau, omega, g);
            }
        }
        Ok(())
    }

    /// Scale all optical depths uniformly.
    pub fn scale_optical_depth(&mut self, factor: f64) {
        self.optical_depth.mapv_inplace(|tau| tau * factor);
    }

    /// Total column optical depth at each wavelength.
    pub fn total_optical_depth(&self) -> Vec<f64> {
        (0..self.n_wavelengths())
            .map(|j| self.optical_depth.column(j).sum())
            .collect()
    }
}
