//! Photochemical quantum yields φ(λ, T, n_air).
//!
//! The quantum yield is the probability that an absorbed photon leads to a
//! particular product channel; it is dimensionless and clamped to [0, 1].
//! Yields may depend on wavelength, temperature (internal energy), and air
//! density (collisional quenching).
//!
//! Like cross-sections, the public type is a closed enum with an extension
//! variant: the constant and tabulated forms cover most reactions, the
//! [`QuantumYield::Complement`] form expresses a product channel as `1 − φ` of
//! its sibling (e.g. O(³P) complementing O(¹D)), and [`QuantumYieldModel`]
//! admits analytic parameterisations.

use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::{ensure_finite, SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::interpolate::LinearInterpolator;
use crate::profile::Profile;

/// Extension point for quantum yields with analytic wavelength, temperature,
/// or pressure dependence.
pub trait QuantumYieldModel: Debug + Send + Sync {
    /// Reaction name (e.g. `"O3->O(1D)+O2"`).
    fn name(&self) -> &str;

    /// Quantum yield at each wavelength-grid midpoint, in [0, 1].
    ///
    /// `air_density` [molecules/cm³] is used for pressure-dependent
    /// quenching; pass 0.0 when not applicable.
    fn calculate(&self, wavelength_grid: &Grid, temperature: f64, air_density: f64) -> Vec<f64>;
}

/// A photolysis quantum yield.
#[derive(Debug, Clone)]
pub enum QuantumYield {
    /// The same value at every wavelength, temperature, and air density.
    Constant { name: String, value: f64 },
    /// Wavelength-dependent lookup table.
    Tabulated(TabulatedQuantumYield),
    /// `1 − φ` of a base yield computed on the same grid.
    Complement {
        name: String,
        base: Box<QuantumYield>,
    },
    /// Custom parameterisation supplied by the caller.
    Custom(Arc<dyn QuantumYieldModel>),
}

impl QuantumYield {
    /// A constant yield, validated to lie in [0, 1].
    pub fn constant(name: impl Into<String>, value: f64) -> SkyradResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(SkyradError::bounds("constant quantum yield", value));
        }
        Ok(QuantumYield::Constant {
            name: name.into(),
            value,
        })
    }

    /// The complementary channel `1 − φ_base`.
    pub fn complement(name: impl Into<String>, base: QuantumYield) -> Self {
        QuantumYield::Complement {
            name: name.into(),
            base: Box::new(base),
        }
    }

    /// Wrap a custom parameterisation.
    pub fn custom(model: impl QuantumYieldModel + 'static) -> Self {
        QuantumYield::Custom(Arc::new(model))
    }

    /// Reaction name.
    pub fn name(&self) -> &str {
        match self {
            QuantumYield::Constant { name, .. } => name,
            QuantumYield::Tabulated(t) => &t.name,
            QuantumYield::Complement { name, .. } => name,
            QuantumYield::Custom(m) => m.name(),
        }
    }

    /// Quantum yield at each wavelength-grid midpoint, clamped to [0, 1].
    pub fn calculate(
        &self,
        wavelength_grid: &Grid,
        temperature: f64,
        air_density: f64,
    ) -> Vec<f64> {
        match self {
            QuantumYield::Constant { value, .. } => {
                vec![*value; wavelength_grid.n_cells()]
            }
            QuantumYield::Tabulated(t) => t.calculate(wavelength_grid),
            QuantumYield::Complement { base, .. } => {
                let mut values = base.calculate(wavelength_grid, temperature, air_density);
                for v in &mut values {
                    *v = (1.0 - *v).clamp(0.0, 1.0);
                }
                values
            }
            QuantumYield::Custom(m) => {
                let mut values = m.calculate(wavelength_grid, temperature, air_density);
                for v in &mut values {
                    *v = v.clamp(0.0, 1.0);
                }
                values
            }
        }
    }

    /// Quantum yield at every altitude layer, using local temperature and air
    /// density.
    ///
    /// Returns `[n_layers][n_wavelengths]`. The air-density profile is
    /// optional; 0.0 is used when it is absent.
    pub fn calculate_profile(
        &self,
        wavelength_grid: &Grid,
        altitude_grid: &Grid,
        temperature_profile: &Profile,
        air_density_profile: Option<&Profile>,
    ) -> SkyradResult<Vec<Vec<f64>>> {
        let n_layers = altitude_grid.n_cells();
        if temperature_profile.n_cells() != n_layers {
            return Err(SkyradError::dimension(
                "temperature profile for quantum-yield evaluation",
                n_layers,
                temperature_profile.n_cells(),
            ));
        }
        if let Some(air) = air_density_profile {
            if air.n_cells() != n_layers {
                return Err(SkyradError::dimension(
                    "air density profile for quantum-yield evaluation",
                    n_layers,
                    air.n_cells(),
                ));
            }
        }

        let temperatures = temperature_profile.mid_values();
        Ok((0..n_layers)
            .map(|i| {
                let n_air = air_density_profile.map_or(0.0, |p| p.mid_values()[i]);
                self.calculate(wavelength_grid, temperatures[i], n_air)
            })
            .collect())
    }
}

impl From<TabulatedQuantumYield> for QuantumYield {
    fn from(t: TabulatedQuantumYield) -> Self {
        QuantumYield::Tabulated(t)
    }
}

/// Wavelength-dependent quantum yield from a lookup table.
///
/// Interpolates linearly in wavelength, clamps to [0, 1], and returns zero
/// outside the reference wavelength range.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedQuantumYield {
    name: String,
    wavelengths: Vec<f64>,
    yields: Vec<f64>,
}

impl TabulatedQuantumYield {
    pub fn new(
        name: impl Into<String>,
        wavelengths: Vec<f64>,
        yields: Vec<f64>,
    ) -> SkyradResult<Self> {
        let name = name.into();
        if wavelengths.len() != yields.len() {
            return Err(SkyradError::dimension(
                format!("quantum yield \"{name}\" values"),
                wavelengths.len(),
                yields.len(),
            ));
        }
        if wavelengths.is_empty() {
            return Err(SkyradError::dimension(
                format!("quantum yield \"{name}\" reference wavelengths"),
                1,
                0,
            ));
        }
        ensure_finite("quantum yield reference wavelengths", &wavelengths)?;
        ensure_finite("quantum yield values", &yields)?;

        Ok(Self {
            name,
            wavelengths,
            yields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference_wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    fn calculate(&self, wavelength_grid: &Grid) -> Vec<f64> {
        let targets = wavelength_grid.midpoints();
        let mut result =
            LinearInterpolator::new().interpolate(targets, &self.wavelengths, &self.yields);

        let wl_min = self.wavelengths[0];
        let wl_max = self.wavelengths[self.wavelengths.len() - 1];
        for (value, &wl) in result.iter_mut().zip(targets) {
            if wl < wl_min || wl > wl_max {
                *value = 0.0;
            } else {
                *value = value.clamp(0.0, 1.0);
            }
        }
        result
    }
}
