//! Radiative-transfer solvers.
//!
//! A solver converts the combined optical properties of the atmosphere plus
//! boundary conditions (solar geometry, extraterrestrial flux, surface
//! albedo) into a level-resolved [`RadiationField`]. The only built-in solver
//! is the delta-Eddington two-stream method; the [`Solver`] trait is the seam
//! for alternatives.

mod delta_eddington;

pub use delta_eddington::DeltaEddingtonSolver;

use std::fmt::Debug;

use crate::constants::DEGREES_TO_RADIANS;
use crate::geometry::SlantPath;
use crate::radiation::RadiationField;
use crate::radiator::RadiatorState;

/// Input to a radiative-transfer solve.
///
/// The slant-path enhancement factors are optional: when absent, the solver
/// falls back to the plane-parallel value 1/μ₀ for every layer. The
/// extraterrestrial flux and surface albedo are also optional, defaulting to
/// a unit spectrum and a black surface respectively.
#[derive(Debug, Clone, Copy)]
pub struct SolverInput<'a> {
    /// Combined optical properties from all radiators.
    pub radiator_state: &'a RadiatorState,
    /// Solar zenith angle [degrees].
    pub solar_zenith_angle: f64,
    /// Extraterrestrial flux per wavelength bin [photons/cm²/s/nm].
    pub extraterrestrial_flux: Option<&'a [f64]>,
    /// Surface albedo per wavelength bin, in [0, 1].
    pub surface_albedo: Option<&'a [f64]>,
    /// Per-layer slant-path enhancement factors from spherical geometry.
    pub slant_path: Option<&'a SlantPath>,
}

impl<'a> SolverInput<'a> {
    /// Minimal input: optical state and zenith angle only.
    pub fn new(radiator_state: &'a RadiatorState, solar_zenith_angle: f64) -> Self {
        Self {
            radiator_state,
            solar_zenith_angle,
            extraterrestrial_flux: None,
            surface_albedo: None,
            slant_path: None,
        }
    }

    /// Cosine of the solar zenith angle.
    pub fn mu0(&self) -> f64 {
        (self.solar_zenith_angle * DEGREES_TO_RADIANS).cos()
    }
}

/// A radiative-transfer solver.
pub trait Solver: Debug + Send + Sync {
    /// Solver name (e.g. `"delta_eddington"`).
    fn name(&self) -> &str;

    /// Solve the transfer equation for the given input.
    fn solve(&self, input: &SolverInput) -> RadiationField;

    /// Whether this solver produces a meaningful result at the given solar
    /// zenith angle [degrees].
    fn can_handle(&self, solar_zenith_angle: f64) -> bool {
        solar_zenith_angle < 90.0
    }

    /// Clone into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Solver>;
}

impl Clone for Box<dyn Solver> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn mu0_follows_zenith_angle() {
        let state = RadiatorState::new(1, 1);
        let input = SolverInput::new(&state, 60.0);
        assert!(is_close!(input.mu0(), 0.5, rel_tol = 1e-12));

        let night = SolverInput::new(&state, 120.0);
        assert!(night.mu0() < 0.0);
    }
}
