//! Molecular absorption cross-sections σ(λ, T).
//!
//! Cross-sections have units of cm²/molecule and are evaluated on the
//! midpoints of a wavelength grid at a given temperature. The set of physics
//! types is small and well-known, so the public type is a closed enum
//! ([`CrossSection`]) with an extension variant for species that need a
//! bespoke parameterisation ([`CrossSectionModel`]).
//!
//! Evaluation rules shared by all variants:
//!
//! - values outside the reference wavelength range are exactly zero;
//! - results are clamped to be non-negative;
//! - temperature-dependent tables interpolate linearly between the two
//!   bracketing reference temperatures and use the nearest row outside the
//!   tabulated range (no extrapolation).

use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::{ensure_finite, SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::interpolate::LinearInterpolator;
use crate::profile::Profile;

/// Extension point for cross-sections that cannot be expressed as a lookup
/// table (e.g. band models with analytic temperature dependence).
pub trait CrossSectionModel: Debug + Send + Sync {
    /// Species or reaction name (e.g. `"O3"`).
    fn name(&self) -> &str;

    /// Cross-section at each wavelength-grid midpoint [cm²/molecule].
    ///
    /// The returned vector has `wavelength_grid.n_cells()` elements.
    fn calculate(&self, wavelength_grid: &Grid, temperature: f64) -> Vec<f64>;
}

/// A wavelength- (and optionally temperature-) dependent absorption
/// cross-section.
#[derive(Debug, Clone)]
pub enum CrossSection {
    /// Lookup table, optionally tabulated at several reference temperatures.
    Tabulated(TabulatedCrossSection),
    /// Custom parameterisation supplied by the caller.
    Custom(Arc<dyn CrossSectionModel>),
}

impl CrossSection {
    /// Wrap a custom parameterisation.
    pub fn custom(model: impl CrossSectionModel + 'static) -> Self {
        CrossSection::Custom(Arc::new(model))
    }

    /// Species or reaction name.
    pub fn name(&self) -> &str {
        match self {
            CrossSection::Tabulated(t) => &t.name,
            CrossSection::Custom(m) => m.name(),
        }
    }

    /// Cross-section at each wavelength-grid midpoint [cm²/molecule].
    pub fn calculate(&self, wavelength_grid: &Grid, temperature: f64) -> Vec<f64> {
        match self {
            CrossSection::Tabulated(t) => t.calculate(wavelength_grid, temperature),
            CrossSection::Custom(m) => {
                let mut values = m.calculate(wavelength_grid, temperature);
                for v in &mut values {
                    if *v < 0.0 {
                        *v = 0.0;
                    }
                }
                values
            }
        }
    }

    /// Cross-section at every altitude layer, using the local temperature.
    ///
    /// Returns `[n_layers][n_wavelengths]`. Fails with
    /// [`SkyradError::InvalidDimension`] if the temperature profile does not
    /// match the altitude grid.
    pub fn calculate_profile(
        &self,
        wavelength_grid: &Grid,
        altitude_grid: &Grid,
        temperature_profile: &Profile,
    ) -> SkyradResult<Vec<Vec<f64>>> {
        let n_layers = altitude_grid.n_cells();
        if temperature_profile.n_cells() != n_layers {
            return Err(SkyradError::dimension(
                "temperature profile for cross-section evaluation",
                n_layers,
                temperature_profile.n_cells(),
            ));
        }

        let temperatures = temperature_profile.mid_values();
        Ok((0..n_layers)
            .map(|i| self.calculate(wavelength_grid, temperatures[i]))
            .collect())
    }
}

impl From<TabulatedCrossSection> for CrossSection {
    fn from(t: TabulatedCrossSection) -> Self {
        CrossSection::Tabulated(t)
    }
}

/// Lookup-table cross-section with optional temperature dependence.
///
/// Holds σ at reference wavelengths, either as a single row (temperature
/// independent) or as one row per reference temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedCrossSection {
    name: String,
    wavelengths: Vec<f64>,
    temperatures: Vec<f64>,
    /// Cross-section data, one row per reference temperature:
    /// `data[t][λ]` [cm²/molecule].
    data: Vec<Vec<f64>>,
}

impl TabulatedCrossSection {
    /// Construct a temperature-independent cross-section.
    ///
    /// The single data row is nominally assigned to 298 K.
    pub fn new(
        name: impl Into<String>,
        wavelengths: Vec<f64>,
        values: Vec<f64>,
    ) -> SkyradResult<Self> {
        Self::with_temperatures(name, wavelengths, vec![298.0], vec![values])
    }

    /// Construct a temperature-dependent cross-section.
    ///
    /// `temperatures` must be sorted ascending; `data` must hold one row of
    /// `wavelengths.len()` values per reference temperature.
    pub fn with_temperatures(
        name: impl Into<String>,
        wavelengths: Vec<f64>,
        temperatures: Vec<f64>,
        data: Vec<Vec<f64>>,
    ) -> SkyradResult<Self> {
        let name = name.into();
        if wavelengths.is_empty() {
            return Err(SkyradError::dimension(
                format!("cross-section \"{name}\" reference wavelengths"),
                1,
                0,
            ));
        }
        if temperatures.is_empty() {
            return Err(SkyradError::dimension(
                format!("cross-section \"{name}\" reference temperatures"),
                1,
                0,
            ));
        }
        if data.len() != temperatures.len() {
            return Err(SkyradError::dimension(
                format!("cross-section \"{name}\" temperature rows"),
                temperatures.len(),
                data.len(),
            ));
        }
        for row in &data {
            if row.len() != wavelengths.len() {
                return Err(SkyradError::dimension(
                    format!("cross-section \"{name}\" data row"),
                    wavelengths.len(),
                    row.len(),
                ));
            }
            ensure_finite("cross-section values", row)?;
        }
        ensure_finite("cross-section reference wavelengths", &wavelengths)?;
        ensure_finite("cross-section reference temperatures", &temperatures)?;
        if temperatures.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SkyradError::bounds(
                format!("cross-section \"{name}\" reference temperatures must ascend"),
                f64::NAN,
            ));
        }

        Ok(Self {
            name,
            wavelengths,
            temperatures,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference_wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn reference_temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    /// Whether more than one reference temperature is tabulated.
    pub fn is_temperature_dependent(&self) -> bool {
        self.temperatures.len() > 1
    }

    /// Evaluate on the midpoints of `wavelength_grid` at `temperature`.
    pub fn calculate(&self, wavelength_grid: &Grid, temperature: f64) -> Vec<f64> {
        let at_temperature = if self.temperatures.len() == 1 {
            self.data[0].clone()
        } else {
            interpolate_temperature_rows(temperature, &self.temperatures, &self.data)
        };

        let targets = wavelength_grid.midpoints();
        let mut result =
            LinearInterpolator::new().interpolate(targets, &self.wavelengths, &at_temperature);

        let wl_min = self.wavelengths[0];
        let wl_max = self.wavelengths[self.wavelengths.len() - 1];
        for (value, &wl) in result.iter_mut().zip(targets) {
            if wl < wl_min || wl > wl_max {
                *value = 0.0;
            } else if *value < 0.0 {
                *value = 0.0;
            }
        }
        result
    }
}

/// Interpolate between tabulated rows at the two reference temperatures
/// bracketing `temperature`, clamping to the nearest row outside the range.
pub(crate) fn interpolate_temperature_rows(
    temperature: f64,
    temperatures: &[f64],
    rows: &[Vec<f64>],
) -> Vec<f64> {
    debug_assert_eq!(temperatures.len(), rows.len());

    let n = temperatures.len();
    if temperature <= temperatures[0] {
        return rows[0].clone();
    }
    if temperature >= temperatures[n - 1] {
        return rows[n - 1].clone();
    }

    let upper = temperatures.partition_point(|&t| t < temperature);
    let lower = upper - 1;
    let t0 = temperatures[lower];
    let t1 = temperatures[upper];
    let weight = (temperature - t0) / (t1 - t0);

    rows[lower]
        .iter()
        .zip(&rows[upper])
        .map(|(a, b)| a + weight * (b - a))
        .collect()
}
