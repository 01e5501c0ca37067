//! Photolysis rate coefficients J(z).
//!
//! The photolysis rate coefficient of a reaction is the wavelength integral
//! of actinic flux × absorption cross-section × quantum yield:
//!
//! ```text
//! J(z) = Σ_λ F_a(z, λ) · σ(λ, T(z)) · φ(λ, T(z), n_air(z)) · |Δλ|   [s⁻¹]
//! ```
//!
//! evaluated at every level of the computed radiation field, with the
//! cross-section and quantum yield re-evaluated at the local temperature.

use crate::cross_section::CrossSection;
use crate::grid::Grid;
use crate::quantum_yield::QuantumYield;
use crate::radiation::RadiationField;

/// Temperature assumed when no profile is supplied [K].
const DEFAULT_TEMPERATURE: f64 = 298.0;

/// A tagged photolysis reaction: name, absorption cross-section, and quantum
/// yield for the product channel.
#[derive(Debug, Clone)]
pub struct PhotolysisReaction {
    name: String,
    cross_section: CrossSection,
    quantum_yield: QuantumYield,
}

impl PhotolysisReaction {
    pub fn new(
        name: impl Into<String>,
        cross_section: CrossSection,
        quantum_yield: QuantumYield,
    ) -> Self {
        Self {
            name: name.into(),
            cross_section,
            quantum_yield,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cross_section(&self) -> &CrossSection {
        &self.cross_section
    }

    pub fn quantum_yield(&self) -> &QuantumYield {
        &self.quantum_yield
    }

    /// Compute J at every level of the radiation field.
    ///
    /// `temperatures` and `air_densities` are layer-midpoint profiles; level
    /// `l > 0` uses layer `l − 1` and the surface level uses the lowest
    /// layer. When absent, 298 K and zero air density are assumed.
    pub fn calculate(
        &self,
        field: &RadiationField,
        wavelength_grid: &Grid,
        temperatures: Option<&[f64]>,
        air_densities: Option<&[f64]>,
    ) -> PhotolysisRates {
        let n_levels = field.n_levels();
        let n_wavelengths = field.n_wavelengths().min(wavelength_grid.n_cells());
        let deltas = wavelength_grid.deltas();

        let mut rates = vec![0.0; n_levels];
        for (level, rate) in rates.iter_mut().enumerate() {
            let layer = level.saturating_sub(1);
            let temperature = temperatures
                .and_then(|t| t.get(layer).copied())
                .unwrap_or(DEFAULT_TEMPERATURE);
            let air_density = air_densities.and_then(|n| n.get(layer).copied()).unwrap_or(0.0);

            let sigma = self.cross_section.calculate(wavelength_grid, temperature);
            let phi = self
                .quantum_yield
                .calculate(wavelength_grid, temperature, air_density);
            let actinic = field.total_actinic_flux(level);

            *rate = (0..n_wavelengths)
                .map(|j| actinic[j] * sigma[j] * phi[j] * deltas[j].abs())
                .sum();
        }

        PhotolysisRates {
            reaction_name: self.name.clone(),
            rates,
        }
    }

    /// Compute J at a single level from its total actinic flux.
    pub fn calculate_at_level(
        &self,
        actinic_flux: &[f64],
        wavelength_grid: &Grid,
        temperature: f64,
        air_density: f64,
    ) -> f64 {
        let sigma = self.cross_section.calculate(wavelength_grid, temperature);
        let phi = self
            .quantum_yield
            .calculate(wavelength_grid, temperature, air_density);
        let deltas = wavelength_grid.deltas();

        let n = actinic_flux.len().min(sigma.len()).min(deltas.len());
        (0..n)
            .map(|j| actinic_flux[j] * sigma[j] * phi[j] * deltas[j].abs())
            .sum()
    }
}

/// Photolysis rates at every level for one reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotolysisRates {
    pub reaction_name: String,
    /// J at each level, surface first [s⁻¹].
    pub rates: Vec<f64>,
}

impl PhotolysisRates {
    pub fn n_levels(&self) -> usize {
        self.rates.len()
    }

    /// J at the surface (level 0).
    pub fn surface_rate(&self) -> f64 {
        self.rates.first().copied().unwrap_or(0.0)
    }

    /// Maximum J over all levels (typically at TOA).
    pub fn max_rate(&self) -> f64 {
        self.rates.iter().copied().fold(0.0, f64::max)
    }
}

/// The set of photolysis reactions registered with a model.
#[derive(Debug, Clone, Default)]
pub struct PhotolysisSet {
    reactions: Vec<PhotolysisReaction>,
}

impl PhotolysisSet {
    pub fn new() -> Self {
        Self {
            reactions: Vec::new(),
        }
    }

    pub fn add(&mut self, reaction: PhotolysisReaction) {
        self.reactions.push(reaction);
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn reaction_names(&self) -> Vec<&str> {
        self.reactions.iter().map(|r| r.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhotolysisReaction> {
        self.reactions.iter()
    }

    /// Compute J profiles for every reaction.
    pub fn calculate_all(
        &self,
        field: &RadiationField,
        wavelength_grid: &Grid,
        temperatures: Option<&[f64]>,
        air_densities: Option<&[f64]>,
    ) -> Vec<PhotolysisRates> {
        self.reactions
            .iter()
            .map(|r| r.calculate(field, wavelength_grid, temperatures, air_densities))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cross_section::TabulatedCrossSection;
    use crate::grid::GridSpec;
    use is_close::is_close;

    fn wavelength_grid() -> Grid {
        Grid::equally_spaced(GridSpec::new("wavelength", "nm", 2), 300.0, 320.0).unwrap()
    }

    fn flat_reaction(sigma: f64, phi: f64) -> PhotolysisReaction {
        let xs = TabulatedCrossSection::new("X", vec![290.0, 330.0], vec![sigma, sigma]).unwrap();
        PhotolysisReaction::new(
            "X + hv -> products",
            xs.into(),
            QuantumYield::constant("X + hv -> products", phi).unwrap(),
        )
    }

    fn uniform_field(n_levels: usize, n_wl: usize, direct: f64, diffuse: f64) -> RadiationField {
        let mut field = RadiationField::new(n_levels, n_wl);
        for i in 0..n_levels {
            for j in 0..n_wl {
                field.set(i, j, direct, 0.0, 0.0, direct, diffuse);
            }
        }
        field
    }

    #[test]
    fn j_integrates_flux_sigma_phi_dlambda() {
        let grid = wavelength_grid();
        let reaction = flat_reaction(1.0e-19, 0.5);
        let field = uniform_field(2, 2, 1.0e14, 0.0);

        let result = reaction.calculate(&field, &grid, None, None);
        // Two 10 nm bins: J = 2 · F·σ·φ·Δλ
        let expected = 2.0 * 1.0e14 * 1.0e-19 * 0.5 * 10.0;
        for rate in &result.rates {
            assert!(is_close!(*rate, expected, rel_tol = 1e-12));
        }
        assert_eq!(result.reaction_name, "X + hv -> products");
    }

    #[test]
    fn j_is_linear_in_flux() {
        let grid = wavelength_grid();
        let reaction = flat_reaction(1.0e-19, 1.0);

        let base = reaction.calculate(&uniform_field(3, 2, 1.0e14, 1.0e13), &grid, None, None);
        let scaled =
            reaction.calculate(&uniform_field(3, 2, 3.0e14, 3.0e13), &grid, None, None);

        for (b, s) in base.rates.iter().zip(&scaled.rates) {
            assert!(is_close!(*s, 3.0 * b, rel_tol = 1e-12));
        }
    }

    #[test]
    fn j_is_zero_when_sigma_or_phi_vanishes() {
        let grid = wavelength_grid();
        let field = uniform_field(2, 2, 1.0e14, 1.0e13);

        let no_absorption = flat_reaction(0.0, 1.0).calculate(&field, &grid, None, None);
        assert!(no_absorption.rates.iter().all(|&j| j == 0.0));

        let no_yield = flat_reaction(1.0e-19, 0.0).calculate(&field, &grid, None, None);
        assert!(no_yield.rates.iter().all(|&j| j == 0.0));
    }

    #[test]
    fn level_temperature_mapping_uses_layer_below() {
        // Temperature-dependent cross-section doubles between the two rows
        let xs = TabulatedCrossSection::with_temperatures(
            "T-dep",
            vec![290.0, 330.0],
            vec![200.0, 300.0],
            vec![vec![1.0e-19, 1.0e-19], vec![2.0e-19, 2.0e-19]],
        )
        .unwrap();
        let reaction = PhotolysisReaction::new(
            "T-dep",
            xs.into(),
            QuantumYield::constant("T-dep", 1.0).unwrap(),
        );

        let grid = wavelength_grid();
        let field = uniform_field(3, 2, 1.0e14, 0.0);
        // Two layers: cold below, warm above
        let result = reaction.calculate(&field, &grid, Some(&[200.0, 300.0]), None);

        // Levels 0 and 1 use layer 0 (200 K); level 2 uses layer 1 (300 K)
        assert!(is_close!(result.rates[0], result.rates[1], rel_tol = 1e-12));
        assert!(is_close!(result.rates[2], 2.0 * result.rates[0], rel_tol = 1e-12));
    }

    #[test]
    fn default_temperature_without_profile() {
        let grid = wavelength_grid();
        let field = uniform_field(2, 2, 1.0e14, 0.0);
        let reaction = flat_reaction(1.0e-19, 1.0);

        let with_default = reaction.calculate(&field, &grid, None, None);
        let with_298 = reaction.calculate(&field, &grid, Some(&[298.0]), None);
        assert_eq!(with_default.rates, with_298.rates);
    }

    #[test]
    fn surface_and_max_accessors() {
        let rates = PhotolysisRates {
            reaction_name: "X".to_string(),
            rates: vec![1.0, 3.0, 5.0],
        };
        assert_eq!(rates.surface_rate(), 1.0);
        assert_eq!(rates.max_rate(), 5.0);
        assert_eq!(rates.n_levels(), 3);
    }

    #[test]
    fn set_calculates_all_reactions() {
        let grid = wavelength_grid();
        let field = uniform_field(2, 2, 1.0e14, 0.0);

        let mut set = PhotolysisSet::new();
        set.add(flat_reaction(1.0e-19, 1.0));
        set.add(flat_reaction(2.0e-19, 0.5));

        let results = set.calculate_all(&field, &grid, None, None);
        assert_eq!(results.len(), 2);
        assert_eq!(set.reaction_names().len(), 2);
        // σφ products are equal for the two reactions
        assert!(is_close!(
            results[0].rates[0],
            results[1].rates[0],
            rel_tol = 1e-12
        ));
    }
}
