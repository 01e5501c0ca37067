//! Molecular absorber driven by an absorption cross-section.

use crate::constants::KM_TO_CM;
use crate::cross_section::CrossSection;
use crate::errors::{SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::profile::Profile;
use crate::warehouse::Warehouse;

use super::state::RadiatorState;

/// Radiator for a molecular absorber such as O3 or NO2.
///
/// Optical depth is built from the species cross-section and number density:
///
/// ```text
/// τ[i][j] = σ(T[i], λ[j]) · N[i] · |Δz[i]| · 10⁵
/// ```
///
/// with the 10⁵ factor converting layer thickness from km to cm. A pure
/// absorber scatters nothing, so ω = 0 and g = 0 everywhere.
#[derive(Debug, Clone)]
pub struct AbsorberRadiator {
    name: String,
    cross_section: CrossSection,
    density_profile_name: String,
    temperature_profile_name: String,
    wavelength_grid_name: String,
    altitude_grid_name: String,
    state: RadiatorState,
}

impl AbsorberRadiator {
    /// Create an absorber named `name` whose number density lives in the
    /// profile warehouse under `density_profile_name` (units molecules/cm³).
    pub fn new(
        name: impl Into<String>,
        cross_section: CrossSection,
        density_profile_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cross_section,
            density_profile_name: density_profile_name.into(),
            temperature_profile_name: "temperature".to_string(),
            wavelength_grid_name: "wavelength".to_string(),
            altitude_grid_name: "altitude".to_string(),
            state: RadiatorState::empty(),
        }
    }

    /// Override the temperature profile name (default `"temperature"`).
    pub fn with_temperature_profile(mut self, name: impl Into<String>) -> Self {
        self.temperature_profile_name = name.into();
        self
    }

    /// Override the grid names (defaults `"wavelength"` and `"altitude"`).
    pub fn with_grids(
        mut self,
        wavelength_grid_name: impl Into<String>,
        altitude_grid_name: impl Into<String>,
    ) -> Self {
        self.wavelength_grid_name = wavelength_grid_name.into();
        self.altitude_grid_name = altitude_grid_name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cross_section(&self) -> &CrossSection {
        &self.cross_section
    }

    pub fn density_profile_name(&self) -> &str {
        &self.density_profile_name
    }

    pub fn state(&self) -> &RadiatorState {
        &self.state
    }

    pub fn update_state(
        &mut self,
        grids: &Warehouse<Grid>,
        profiles: &Warehouse<Profile>,
    ) -> SkyradResult<()> {
        let wl_grid = grids.get(&self.wavelength_grid_name, "nm")?;
        let alt_grid = grids.get(&self.altitude_grid_name, "km")?;
        let density = profiles.get(&self.density_profile_name, "molecules/cm^3")?;
        let temperature = profiles.get(&self.temperature_profile_name, "K")?;

        let n_layers = alt_grid.n_cells();
        let n_wavelengths = wl_grid.n_cells();
        if density.n_cells() != n_layers {
            return Err(SkyradError::dimension(
                format!("density profile \"{}\"", self.density_profile_name),
                n_layers,
                density.n_cells(),
            ));
        }

        let sigma = self
            .cross_section
            .calculate_profile(wl_grid, alt_grid, temperature)?;

        let deltas = alt_grid.deltas();
        let densities = density.mid_values();

        let mut state = RadiatorState::new(n_layers, n_wavelengths);
        for i in 0..n_layers {
            let column = densities[i] * deltas[i].abs() * KM_TO_CM;
            for j in 0..n_wavelengths {
                state.set(i, j, sigma[i][j] * column, 0.0, 0.0);
            }
        }
        self.state = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cross_section::TabulatedCrossSection;
    use crate::grid::GridSpec;
    use crate::profile::ProfileSpec;
    use is_close::is_close;

    fn setup() -> (Warehouse<Grid>, Warehouse<Profile>) {
        let mut grids = Warehouse::new();
        grids
            .add(Grid::equally_spaced(GridSpec::new("wavelength", "nm", 2), 300.0, 320.0).unwrap())
            .unwrap();
        grids
            .add(Grid::equally_spaced(GridSpec::new("altitude", "km", 2), 0.0, 2.0).unwrap())
            .unwrap();

        let mut profiles = Warehouse::new();
        profiles
            .add(
                Profile::from_midpoints(
                    ProfileSpec::new("O3", "molecules/cm^3", 2),
                    vec![1.0e12, 5.0e11],
                )
                .unwrap(),
            )
            .unwrap();
        profiles
            .add(
                Profile::from_midpoints(ProfileSpec::new("temperature", "K", 2), vec![288.0, 275.0])
                    .unwrap(),
            )
            .unwrap();
        (grids, profiles)
    }

    fn flat_cross_section(sigma: f64) -> CrossSection {
        TabulatedCrossSection::new("O3", vec![290.0, 330.0], vec![sigma, sigma])
            .unwrap()
            .into()
    }

    #[test]
    fn optical_depth_follows_sigma_n_dz() {
        let (grids, profiles) = setup();
        let mut radiator = AbsorberRadiator::new("O3", flat_cross_section(1.0e-19), "O3");
        radiator.update_state(&grids, &profiles).unwrap();

        let state = radiator.state();
        assert_eq!(state.n_layers(), 2);
        assert_eq!(state.n_wavelengths(), 2);

        // τ = σ·n·Δz with Δz = 1 km = 1e5 cm
        let (tau, omega, g) = state.get(0, 0);
        assert!(is_close!(tau, 1.0e-19 * 1.0e12 * 1.0e5));
        assert_eq!(omega, 0.0);
        assert_eq!(g, 0.0);

        // Upper layer has half the density
        assert!(is_close!(state.get(1, 0).0, tau / 2.0));
    }

    #[test]
    fn missing_profile_is_reported() {
        let (grids, _) = setup();
        let profiles: Warehouse<Profile> = Warehouse::new();
        let mut radiator = AbsorberRadiator::new("O3", flat_cross_section(1.0e-19), "O3");
        assert!(matches!(
            radiator.update_state(&grids, &profiles),
            Err(SkyradError::MissingEntity { .. })
        ));
    }

    #[test]
    fn missing_grid_is_reported() {
        let (_, profiles) = setup();
        let grids: Warehouse<Grid> = Warehouse::new();
        let mut radiator = AbsorberRadiator::new("O3", flat_cross_section(1.0e-19), "O3");
        assert!(matches!(
            radiator.update_state(&grids, &profiles),
            Err(SkyradError::MissingEntity { .. })
        ));
    }

    #[test]
    fn density_grid_size_mismatch_is_reported() {
        let (grids, mut profiles) = setup();
        // A stray profile of the wrong length under a different key
        profiles
            .add(
                Profile::from_midpoints(
                    ProfileSpec::new("NO2", "molecules/cm^3", 3),
                    vec![1.0e10; 3],
                )
                .unwrap(),
            )
            .unwrap();

        let mut radiator = AbsorberRadiator::new("NO2", flat_cross_section(1.0e-19), "NO2");
        assert!(matches!(
            radiator.update_state(&grids, &profiles),
            Err(SkyradError::InvalidDimension { .. })
        ));
    }
}
