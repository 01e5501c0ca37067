//! Model orchestration.
//!
//! A [`Model`] wires the pieces together: it owns the wavelength and altitude
//! grids, the atmospheric profiles, the registered radiators and photolysis
//! reactions, and the solver. A `calculate` call assembles the combined
//! optical state, computes slant paths, solves the radiative transfer
//! equation, integrates photolysis rates, and returns a [`ModelOutput`].
//!
//! The model is deliberately thin assembly code; the physics lives in the
//! grid/profile/radiator/solver/photolysis modules. Each call either returns
//! a complete output or a single aggregated error; partial results are never
//! returned.

mod config;
mod output;

#[cfg(test)]
mod tests;

pub use config::ModelConfig;
pub use output::ModelOutput;

use tracing::debug;

use crate::errors::{SkyradError, SkyradResult};
use crate::geometry::SphericalGeometry;
use crate::grid::{Grid, GridSpec};
use crate::photolysis::{PhotolysisReaction, PhotolysisSet};
use crate::profile::{Profile, ProfileSpec};
use crate::radiator::{Radiator, RadiatorSet, RadiatorState};
use crate::solar::{self, ExtraterrestrialFlux};
use crate::solver::{DeltaEddingtonSolver, Solver, SolverInput};
use crate::warehouse::Warehouse;

/// Radiative-transfer and photolysis model.
pub struct Model {
    config: ModelConfig,
    wavelength_grid: Grid,
    altitude_grid: Grid,
    radiators: RadiatorSet,
    reactions: PhotolysisSet,
    solver: Box<dyn Solver>,
    extraterrestrial_flux: Option<ExtraterrestrialFlux>,
    extra_profiles: Vec<Profile>,
}

impl Model {
    /// Build a model from a validated configuration.
    pub fn new(config: ModelConfig) -> SkyradResult<Self> {
        config.validate()?;

        let wavelength_grid = build_wavelength_grid(&config)?;
        let altitude_grid = build_altitude_grid(&config)?;

        debug!(
            n_wavelengths = wavelength_grid.n_cells(),
            n_layers = altitude_grid.n_cells(),
            "model initialised"
        );

        Ok(Self {
            config,
            wavelength_grid,
            altitude_grid,
            radiators: RadiatorSet::new(),
            reactions: PhotolysisSet::new(),
            solver: Box::new(DeltaEddingtonSolver::new()),
            extraterrestrial_flux: None,
            extra_profiles: Vec::new(),
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn wavelength_grid(&self) -> &Grid {
        &self.wavelength_grid
    }

    pub fn altitude_grid(&self) -> &Grid {
        &self.altitude_grid
    }

    pub fn radiators(&self) -> &RadiatorSet {
        &self.radiators
    }

    pub fn reactions(&self) -> &PhotolysisSet {
        &self.reactions
    }

    /// Register a radiator.
    pub fn add_radiator(&mut self, radiator: impl Into<Radiator>) -> SkyradResult<&mut Self> {
        self.radiators.add(radiator)?;
        Ok(self)
    }

    /// Register a photolysis reaction.
    pub fn add_reaction(&mut self, reaction: PhotolysisReaction) -> &mut Self {
        self.reactions.add(reaction);
        self
    }

    /// Register an additional named profile (beyond the built-in
    /// temperature/pressure/air-density/ozone slots) for radiators to look
    /// up.
    pub fn add_profile(&mut self, profile: Profile) -> &mut Self {
        self.extra_profiles.push(profile);
        self
    }

    /// Supply the extraterrestrial flux spectrum. Without one, a unit
    /// spectrum (1 photon/cm²/s/nm in every bin) is assumed, which is
    /// convenient for transmittance-style tests.
    pub fn set_extraterrestrial_flux(&mut self, flux: ExtraterrestrialFlux) -> &mut Self {
        self.extraterrestrial_flux = Some(flux);
        self
    }

    /// Replace the solver (default: delta-Eddington).
    pub fn set_solver(&mut self, solver: Box<dyn Solver>) -> &mut Self {
        self.solver = solver;
        self
    }

    /// Replace the temperature profile [K at layer midpoints].
    pub fn set_temperature_profile(&mut self, values: Vec<f64>) -> &mut Self {
        self.config.temperature_profile = values;
        self
    }

    /// Replace the pressure profile [hPa at layer midpoints].
    pub fn set_pressure_profile(&mut self, values: Vec<f64>) -> &mut Self {
        self.config.pressure_profile = values;
        self
    }

    /// Replace the air density profile [molecules/cm³ at layer midpoints].
    pub fn set_air_density_profile(&mut self, values: Vec<f64>) -> &mut Self {
        self.config.air_density_profile = values;
        self
    }

    /// Replace the ozone profile [molecules/cm³ at layer midpoints].
    pub fn set_ozone_profile(&mut self, values: Vec<f64>) -> &mut Self {
        self.config.ozone_profile = values;
        self
    }

    /// Calculate at the configured solar zenith angle.
    pub fn calculate(&mut self) -> SkyradResult<ModelOutput> {
        self.calculate_at_zenith(self.config.solar_zenith_angle)
    }

    /// Calculate for a specific solar zenith angle [degrees].
    pub fn calculate_at_zenith(&mut self, solar_zenith_angle: f64) -> SkyradResult<ModelOutput> {
        if !(0.0..=180.0).contains(&solar_zenith_angle) || !solar_zenith_angle.is_finite() {
            return Err(SkyradError::bounds("solar zenith angle", solar_zenith_angle));
        }

        let n_layers = self.altitude_grid.n_cells();
        let n_wavelengths = self.wavelength_grid.n_cells();
        debug!(solar_zenith_angle, n_layers, n_wavelengths, "starting solve");

        let earth_sun_distance = self.config.effective_earth_sun_distance();

        // Slant paths through the curved atmosphere
        let slant_path = if self.config.use_spherical_geometry {
            let geometry =
                SphericalGeometry::with_earth_radius(&self.altitude_grid, self.config.earth_radius);
            Some(geometry.calculate(solar_zenith_angle)?)
        } else {
            None
        };

        // Extraterrestrial flux with the 1/d² distance correction
        let distance_factor = 1.0 / (earth_sun_distance * earth_sun_distance);
        let solar_flux = match &self.extraterrestrial_flux {
            Some(flux) => flux.calculate(&self.wavelength_grid, distance_factor),
            None => vec![1.0; n_wavelengths],
        };

        // Surface albedo spectrum
        let surface_albedo = if self.config.surface_albedo_spectrum.is_empty() {
            vec![self.config.surface_albedo; n_wavelengths]
        } else {
            if self.config.surface_albedo_spectrum.len() != n_wavelengths {
                return Err(SkyradError::dimension(
                    "surface albedo spectrum",
                    n_wavelengths,
                    self.config.surface_albedo_spectrum.len(),
                ));
            }
            self.config.surface_albedo_spectrum.clone()
        };

        // Combined optical properties from all radiators
        let combined_state = if self.radiators.is_empty() {
            RadiatorState::new(n_layers, n_wavelengths)
        } else {
            let grids = self.build_grid_warehouse()?;
            let profiles = self.build_profile_warehouse()?;
            self.radiators.update_all(&grids, &profiles)?;
            self.radiators.combined_state()?
        };

        let input = SolverInput {
            radiator_state: &combined_state,
            solar_zenith_angle,
            extraterrestrial_flux: Some(&solar_flux),
            surface_albedo: Some(&surface_albedo),
            slant_path: slant_path.as_ref(),
        };
        let radiation_field = self.solver.solve(&input);

        let temperatures = non_empty(&self.config.temperature_profile);
        let air_densities = non_empty(&self.config.air_density_profile);
        let photolysis_rates = self.reactions.calculate_all(
            &radiation_field,
            &self.wavelength_grid,
            temperatures,
            air_densities,
        );

        debug!(
            n_reactions = photolysis_rates.len(),
            "solve finished"
        );

        Ok(ModelOutput {
            solar_zenith_angle,
            day_of_year: self.config.day_of_year,
            earth_sun_distance,
            is_daytime: solar_zenith_angle < 90.0,
            used_spherical_geometry: self.config.use_spherical_geometry,
            wavelength_grid: self.wavelength_grid.clone(),
            altitude_grid: self.altitude_grid.clone(),
            radiation_field,
            photolysis_rates,
        })
    }

    /// Calculate for a UTC date, time, and location; the solar position
    /// determines the zenith angle and the date the distance correction.
    #[allow(clippy::too_many_arguments)]
    pub fn calculate_at(
        &mut self,
        year: i32,
        month: u32,
        day: u32,
        hour: f64,
        latitude: f64,
        longitude: f64,
    ) -> SkyradResult<ModelOutput> {
        let position = solar::solar_position(year, month, day, hour, latitude, longitude);

        self.config.solar_zenith_angle = position.zenith_angle;
        self.config.day_of_year = solar::day_of_year(year, month, day);
        self.config.latitude = latitude;
        self.config.longitude = longitude;

        self.calculate_at_zenith(position.zenith_angle)
    }

    /// Grid warehouse holding the wavelength and altitude grids.
    pub fn build_grid_warehouse(&self) -> SkyradResult<Warehouse<Grid>> {
        let mut grids = Warehouse::new();
        grids.add(self.wavelength_grid.clone())?;
        grids.add(self.altitude_grid.clone())?;
        Ok(grids)
    }

    /// Profile warehouse holding whichever atmospheric profiles are
    /// configured, plus any caller-registered extras.
    pub fn build_profile_warehouse(&self) -> SkyradResult<Warehouse<Profile>> {
        let n_layers = self.altitude_grid.n_cells();
        let mut profiles = Warehouse::new();

        let slots = [
            ("temperature", "K", &self.config.temperature_profile),
            (
                "air_density",
                "molecules/cm^3",
                &self.config.air_density_profile,
            ),
            ("pressure", "hPa", &self.config.pressure_profile),
            ("O3", "molecules/cm^3", &self.config.ozone_profile),
        ];
        for (name, units, values) in slots {
            if !values.is_empty() {
                profiles.add(Profile::from_midpoints(
                    ProfileSpec::new(name, units, n_layers),
                    values.clone(),
                )?)?;
            }
        }
        for profile in &self.extra_profiles {
            profiles.add(profile.clone())?;
        }
        Ok(profiles)
    }
}

fn build_wavelength_grid(config: &ModelConfig) -> SkyradResult<Grid> {
    if !config.wavelength_edges.is_empty() {
        let spec = GridSpec::new("wavelength", "nm", config.wavelength_edges.len() - 1);
        return Grid::from_edges(spec, config.wavelength_edges.clone());
    }
    Grid::equally_spaced(
        GridSpec::new("wavelength", "nm", config.n_wavelength_bins),
        config.wavelength_min,
        config.wavelength_max,
    )
}

fn build_altitude_grid(config: &ModelConfig) -> SkyradResult<Grid> {
    if !config.altitude_edges.is_empty() {
        let spec = GridSpec::new("altitude", "km", config.altitude_edges.len() - 1);
        return Grid::from_edges(spec, config.altitude_edges.clone());
    }
    Grid::equally_spaced(
        GridSpec::new("altitude", "km", config.n_altitude_layers),
        config.altitude_min,
        config.altitude_max,
    )
}

fn non_empty(values: &[f64]) -> Option<&[f64]> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
