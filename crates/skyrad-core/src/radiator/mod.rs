//! Radiators: per-species generators of layer optical properties.
//!
//! A radiator turns atmospheric profiles into a [`RadiatorState`], the
//! `(τ, ω, g)` block the solver consumes. Three built-in kinds cover the
//! standard atmosphere:
//!
//! - [`AbsorberRadiator`]: molecular absorber from a cross-section (ω = 0),
//! - [`RayleighRadiator`]: conservative isotropic molecular scattering,
//! - [`AerosolRadiator`]: Ångström-parameterised particulate extinction,
//!
//! with [`RadiatorModel`] as the extension point for anything else. The
//! [`RadiatorSet`] owns the registered radiators and produces the combined
//! optical state by the mixing rules of [`RadiatorState::accumulate`].

mod absorber;
mod aerosol;
mod rayleigh;
mod state;

pub use absorber::AbsorberRadiator;
pub use aerosol::{AerosolConfig, AerosolRadiator};
pub use rayleigh::RayleighRadiator;
pub use state::RadiatorState;

use std::fmt::Debug;

use crate::errors::{SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::profile::Profile;
use crate::warehouse::Warehouse;

/// Extension point for custom radiators.
pub trait RadiatorModel: Debug + Send + Sync {
    /// Radiator name, unique within a [`RadiatorSet`].
    fn name(&self) -> &str;

    /// Recompute the optical state from the current grids and profiles.
    fn update_state(
        &mut self,
        grids: &Warehouse<Grid>,
        profiles: &Warehouse<Profile>,
    ) -> SkyradResult<()>;

    /// The optical state from the last update.
    fn state(&self) -> &RadiatorState;

    /// Clone into a boxed trait object.
    fn clone_box(&self) -> Box<dyn RadiatorModel>;
}

/// A registered radiator of any kind.
#[derive(Debug)]
pub enum Radiator {
    Absorber(AbsorberRadiator),
    Rayleigh(RayleighRadiator),
    Aerosol(AerosolRadiator),
    Custom(Box<dyn RadiatorModel>),
}

impl Radiator {
    /// Wrap a custom radiator implementation.
    pub fn custom(model: impl RadiatorModel + 'static) -> Self {
        Radiator::Custom(Box::new(model))
    }

    pub fn name(&self) -> &str {
        match self {
            Radiator::Absorber(r) => r.name(),
            Radiator::Rayleigh(r) => r.name(),
            Radiator::Aerosol(r) => r.name(),
            Radiator::Custom(r) => r.name(),
        }
    }

    pub fn update_state(
        &mut self,
        grids: &Warehouse<Grid>,
        profiles: &Warehouse<Profile>,
    ) -> SkyradResult<()> {
        match self {
            Radiator::Absorber(r) => r.update_state(grids, profiles),
            Radiator::Rayleigh(r) => r.update_state(grids, profiles),
            Radiator::Aerosol(r) => r.update_state(grids, profiles),
            Radiator::Custom(r) => r.update_state(grids, profiles),
        }
    }

    pub fn state(&self) -> &RadiatorState {
        match self {
            Radiator::Absorber(r) => r.state(),
            Radiator::Rayleigh(r) => r.state(),
            Radiator::Aerosol(r) => r.state(),
            Radiator::Custom(r) => r.state(),
        }
    }
}

impl Clone for Radiator {
    fn clone(&self) -> Self {
        match self {
            Radiator::Absorber(r) => Radiator::Absorber(r.clone()),
            Radiator::Rayleigh(r) => Radiator::Rayleigh(r.clone()),
            Radiator::Aerosol(r) => Radiator::Aerosol(r.clone()),
            Radiator::Custom(r) => Radiator::Custom(r.clone_box()),
        }
    }
}

impl From<AbsorberRadiator> for Radiator {
    fn from(r: AbsorberRadiator) -> Self {
        Radiator::Absorber(r)
    }
}

impl From<RayleighRadiator> for Radiator {
    fn from(r: RayleighRadiator) -> Self {
        Radiator::Rayleigh(r)
    }
}

impl From<AerosolRadiator> for Radiator {
    fn from(r: AerosolRadiator) -> Self {
        Radiator::Aerosol(r)
    }
}

/// Ordered collection of the radiators registered with a model.
#[derive(Debug, Clone, Default)]
pub struct RadiatorSet {
    radiators: Vec<Radiator>,
}

impl RadiatorSet {
    pub fn new() -> Self {
        Self {
            radiators: Vec::new(),
        }
    }

    /// Register a radiator. Names must be unique within the set.
    pub fn add(&mut self, radiator: impl Into<Radiator>) -> SkyradResult<()> {
        let radiator = radiator.into();
        if self.radiators.iter().any(|r| r.name() == radiator.name()) {
            return Err(SkyradError::DuplicateEntity {
                kind: "radiator",
                key: radiator.name().to_string(),
            });
        }
        self.radiators.push(radiator);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.radiators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radiators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Radiator> {
        self.radiators.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Radiator> {
        self.radiators.iter().find(|r| r.name() == name)
    }

    /// Update every radiator from the current grids and profiles.
    pub fn update_all(
        &mut self,
        grids: &Warehouse<Grid>,
        profiles: &Warehouse<Profile>,
    ) -> SkyradResult<()> {
        for radiator in &mut self.radiators {
            radiator.update_state(grids, profiles)?;
        }
        Ok(())
    }

    /// Combine the states of all radiators into one optical-property block.
    ///
    /// Returns an empty state if no radiators are registered.
    pub fn combined_state(&self) -> SkyradResult<RadiatorState> {
        let mut combined = RadiatorState::empty();
        for radiator in &self.radiators {
            combined.accumulate(radiator.state())?;
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cross_section::TabulatedCrossSection;
    use crate::grid::GridSpec;
    use crate::profile::ProfileSpec;
    use is_close::is_close;

    fn warehouse_fixture() -> (Warehouse<Grid>, Warehouse<Profile>) {
        let mut grids = Warehouse::new();
        grids
            .add(Grid::equally_spaced(GridSpec::new("wavelength", "nm", 2), 300.0, 500.0).unwrap())
            .unwrap();
        grids
            .add(Grid::equally_spaced(GridSpec::new("altitude", "km", 3), 0.0, 30.0).unwrap())
            .unwrap();

        let mut profiles = Warehouse::new();
        profiles
            .add(
                Profile::from_midpoints(
                    ProfileSpec::new("air_density", "molecules/cm^3", 3),
                    vec![2.0e19, 5.0e18, 1.0e18],
                )
                .unwrap(),
            )
            .unwrap();
        profiles
            .add(
                Profile::from_midpoints(
                    ProfileSpec::new("O3", "molecules/cm^3", 3),
                    vec![5.0e11, 3.0e12, 1.0e12],
                )
                .unwrap(),
            )
            .unwrap();
        profiles
            .add(
                Profile::from_midpoints(
                    ProfileSpec::new("temperature", "K", 3),
                    vec![288.0, 225.0, 230.0],
                )
                .unwrap(),
            )
            .unwrap();
        (grids, profiles)
    }

    fn o3_radiator() -> AbsorberRadiator {
        let xs = TabulatedCrossSection::new("O3", vec![280.0, 520.0], vec![1.0e-19, 1.0e-21])
            .unwrap();
        AbsorberRadiator::new("O3", xs.into(), "O3")
    }

    #[test]
    fn duplicate_radiator_names_are_rejected() {
        let mut set = RadiatorSet::new();
        set.add(o3_radiator()).unwrap();
        assert!(matches!(
            set.add(o3_radiator()),
            Err(SkyradError::DuplicateEntity { .. })
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn combined_state_mixes_absorber_and_scatterer() {
        let (grids, profiles) = warehouse_fixture();

        let mut set = RadiatorSet::new();
        set.add(o3_radiator()).unwrap();
        set.add(RayleighRadiator::new()).unwrap();
        set.update_all(&grids, &profiles).unwrap();

        let combined = set.combined_state().unwrap();
        assert_eq!(combined.n_layers(), 3);
        assert_eq!(combined.n_wavelengths(), 2);

        let o3_state = set.get("O3").unwrap().state();
        let rayleigh_state = set.get("rayleigh").unwrap().state();

        for i in 0..3 {
            for j in 0..2 {
                let (tau, omega, g) = combined.get(i, j);
                let tau_o3 = o3_state.get(i, j).0;
                let tau_ray = rayleigh_state.get(i, j).0;

                assert!(is_close!(tau, tau_o3 + tau_ray, rel_tol = 1e-12));
                // ω is the scattering fraction of the total extinction
                assert!(is_close!(omega, tau_ray / (tau_o3 + tau_ray), rel_tol = 1e-12));
                assert_eq!(g, 0.0);
            }
        }
    }

    #[test]
    fn combined_state_of_empty_set_is_empty() {
        let set = RadiatorSet::new();
        assert!(set.combined_state().unwrap().is_empty());
    }

    #[test]
    fn custom_radiator_participates() {
        #[derive(Debug, Clone)]
        struct Fixed {
            state: RadiatorState,
        }

        impl RadiatorModel for Fixed {
            fn name(&self) -> &str {
                "fixed"
            }

            fn update_state(
                &mut self,
                _grids: &Warehouse<Grid>,
                _profiles: &Warehouse<Profile>,
            ) -> SkyradResult<()> {
                let mut state = RadiatorState::new(3, 2);
                for i in 0..3 {
                    for j in 0..2 {
                        state.set(i, j, 0.1, 0.5, 0.2);
                    }
                }
                self.state = state;
                Ok(())
            }

            fn state(&self) -> &RadiatorState {
                &self.state
            }

            fn clone_box(&self) -> Box<dyn RadiatorModel> {
                Box::new(self.clone())
            }
        }

        let (grids, profiles) = warehouse_fixture();
        let mut set = RadiatorSet::new();
        set.add(Radiator::custom(Fixed {
            state: RadiatorState::empty(),
        }))
        .unwrap();
        set.update_all(&grids, &profiles).unwrap();

        let combined = set.combined_state().unwrap();
        assert!(is_close!(combined.get(0, 0).0, 0.1));
        assert!(is_close!(combined.get(0, 0).1, 0.5));
    }
}
