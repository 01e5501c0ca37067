//! Rayleigh (molecular) scattering.

use crate::constants::KM_TO_CM;
use crate::errors::{SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::profile::Profile;
use crate::warehouse::Warehouse;

use super::state::RadiatorState;

/// Rayleigh scattering radiator.
///
/// Molecular scattering is conservative (ω = 1) and isotropic (g = 0), with a
/// cross-section close to λ⁻⁴. The parameterisation used here,
///
/// ```text
/// σ_R(λ) = 4.02·10⁻²⁸ · (1000 / λ_nm)^4.04  [cm²]
/// ```
///
/// follows Bodhaine et al. (1999); the 0.04 excess over the pure λ⁻⁴ law
/// accounts for the dispersion of the refractive index of air.
#[derive(Debug, Clone)]
pub struct RayleighRadiator {
    air_density_profile_name: String,
    wavelength_grid_name: String,
    altitude_grid_name: String,
    state: RadiatorState,
}

impl Default for RayleighRadiator {
    fn default() -> Self {
        Self::new()
    }
}

impl RayleighRadiator {
    pub fn new() -> Self {
        Self {
            air_density_profile_name: "air_density".to_string(),
            wavelength_grid_name: "wavelength".to_string(),
            altitude_grid_name: "altitude".to_string(),
            state: RadiatorState::empty(),
        }
    }

    /// Override the air density profile name (default `"air_density"`).
    pub fn with_air_density_profile(mut self, name: impl Into<String>) -> Self {
        self.air_density_profile_name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        "rayleigh"
    }

    pub fn state(&self) -> &RadiatorState {
        &self.state
    }

    /// Rayleigh scattering cross-section [cm²/molecule] at `wavelength_nm`.
    pub fn cross_section(wavelength_nm: f64) -> f64 {
        const SIGMA_REF: f64 = 4.02e-28;
        const LAMBDA_REF: f64 = 1000.0;
        const EXPONENT: f64 = 4.04;
        SIGMA_REF * (LAMBDA_REF / wavelength_nm).powf(EXPONENT)
    }

    pub fn update_state(
        &mut self,
        grids: &Warehouse<Grid>,
        profiles: &Warehouse<Profile>,
    ) -> SkyradResult<()> {
        let wl_grid = grids.get(&self.wavelength_grid_name, "nm")?;
        let alt_grid = grids.get(&self.altitude_grid_name, "km")?;
        let air = profiles.get(&self.air_density_profile_name, "molecules/cm^3")?;

        let n_layers = alt_grid.n_cells();
        let n_wavelengths = wl_grid.n_cells();
        if air.n_cells() != n_layers {
            return Err(SkyradError::dimension(
                format!("air density profile \"{}\"", self.air_density_profile_name),
                n_layers,
                air.n_cells(),
            ));
        }

        let wavelengths = wl_grid.midpoints();
        let deltas = alt_grid.deltas();
        let densities = air.mid_values();

        let mut state = RadiatorState::new(n_layers, n_wavelengths);
        for i in 0..n_layers {
            let column = densities[i] * deltas[i].abs() * KM_TO_CM;
            for j in 0..n_wavelengths {
                let tau = Self::cross_section(wavelengths[j]) * column;
                state.set(i, j, tau, 1.0, 0.0);
            }
        }
        self.state = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;
    use crate::profile::ProfileSpec;
    use is_close::is_close;

    #[test]
    fn cross_section_magnitude_at_400nm() {
        // Literature value for standard air is ≈ 1.7e-26 cm² at 400 nm
        let sigma = RayleighRadiator::cross_section(400.0);
        assert!(sigma > 1.0e-26 && sigma < 2.5e-26, "sigma = {sigma}");
    }

    #[test]
    fn cross_section_decreases_with_wavelength() {
        assert!(
            RayleighRadiator::cross_section(300.0) > RayleighRadiator::cross_section(600.0)
        );
        // Close to λ⁻⁴: halving the wavelength grows σ by ~2^4.04
        let ratio =
            RayleighRadiator::cross_section(300.0) / RayleighRadiator::cross_section(600.0);
        assert!(is_close!(ratio, 2.0_f64.powf(4.04), rel_tol = 1e-12));
    }

    #[test]
    fn state_is_conservative_and_isotropic() {
        let mut grids = Warehouse::new();
        grids
            .add(Grid::equally_spaced(GridSpec::new("wavelength", "nm", 3), 300.0, 600.0).unwrap())
            .unwrap();
        grids
            .add(Grid::equally_spaced(GridSpec::new("altitude", "km", 2), 0.0, 10.0).unwrap())
            .unwrap();

        let mut profiles = Warehouse::new();
        profiles
            .add(
                Profile::from_midpoints(
                    ProfileSpec::new("air_density", "molecules/cm^3", 2),
                    vec![2.0e19, 1.0e19],
                )
                .unwrap(),
            )
            .unwrap();

        let mut radiator = RayleighRadiator::new();
        radiator.update_state(&grids, &profiles).unwrap();

        let state = radiator.state();
        for i in 0..2 {
            for j in 0..3 {
                let (tau, omega, g) = state.get(i, j);
                assert!(tau > 0.0);
                assert_eq!(omega, 1.0);
                assert_eq!(g, 0.0);
            }
        }

        // Denser lower layer has larger optical depth
        assert!(state.get(0, 0).0 > state.get(1, 0).0);
        // Shorter wavelengths scatter more
        assert!(state.get(0, 0).0 > state.get(0, 2).0);
    }
}
