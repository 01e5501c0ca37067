//! Slant paths through a spherically curved atmosphere.
//!
//! For solar zenith angles below about 70° a plane-parallel atmosphere is an
//! excellent approximation and the slant path through every layer is simply
//! sec χ times its thickness. Near the horizon and through twilight the
//! curvature of the Earth matters: path lengths grow more slowly than sec χ,
//! and for χ > 90° the lowest layers fall into the Earth's shadow entirely.
//!
//! [`SphericalGeometry`] produces a [`SlantPath`] with a per-layer
//! enhancement factor ds/dz, a cumulative air mass, and a sunlit flag, valid
//! from overhead sun through twilight.
//!
//! Based on Dahlback & Stamnes (1991), Planet. Space Sci. 39, 671–683.

use crate::constants::{DEGREES_TO_RADIANS, EARTH_RADIUS_KM};
use crate::errors::{SkyradError, SkyradResult};
use crate::grid::Grid;

/// Plane-parallel is used below this zenith angle [degrees].
const PLANE_PARALLEL_LIMIT: f64 = 85.0;

/// Cap on the spherical enhancement factor near grazing incidence.
const ENHANCEMENT_CAP: f64 = 40.0;

/// Slant-path information for one solar zenith angle.
#[derive(Debug, Clone, PartialEq)]
pub struct SlantPath {
    /// Path-length enhancement factor ds/dz for each layer `[n_layers]`.
    /// Zero for layers shadowed by the Earth.
    pub enhancement_factor: Vec<f64>,
    /// Cumulative enhanced path from the top of the atmosphere down to each
    /// layer's bottom `[n_layers]`.
    pub air_mass: Vec<f64>,
    /// Whether the direct beam reaches each layer `[n_layers]`.
    pub sunlit: Vec<bool>,
    /// Solar zenith angle used [degrees].
    pub zenith_angle: f64,
    /// Altitude below which the surface is geometrically shadowed [km].
    /// Only meaningful for χ > 90°.
    pub screening_height: f64,
}

/// Spherical-shell geometry bound to an altitude grid.
#[derive(Debug, Clone)]
pub struct SphericalGeometry {
    earth_radius: f64,
    /// Radius (Earth radius + altitude) at each grid edge [km].
    radii: Vec<f64>,
}

impl SphericalGeometry {
    /// Construct for an altitude grid with edges in km.
    pub fn new(altitude_grid: &Grid) -> Self {
        Self::with_earth_radius(altitude_grid, EARTH_RADIUS_KM)
    }

    /// Construct with a non-default Earth radius [km].
    pub fn with_earth_radius(altitude_grid: &Grid, earth_radius: f64) -> Self {
        let radii = altitude_grid
            .edges()
            .iter()
            .map(|&z| earth_radius + z)
            .collect();
        Self {
            earth_radius,
            radii,
        }
    }

    pub fn earth_radius(&self) -> f64 {
        self.earth_radius
    }

    pub fn n_levels(&self) -> usize {
        self.radii.len()
    }

    /// Compute slant paths for a solar zenith angle in [0, 180] degrees.
    pub fn calculate(&self, solar_zenith_angle: f64) -> SkyradResult<SlantPath> {
        if !(0.0..=180.0).contains(&solar_zenith_angle) || !solar_zenith_angle.is_finite() {
            return Err(SkyradError::bounds("solar zenith angle", solar_zenith_angle));
        }

        let n_layers = self.radii.len().saturating_sub(1);
        let mut result = SlantPath {
            enhancement_factor: vec![0.0; n_layers],
            air_mass: vec![0.0; n_layers],
            sunlit: vec![true; n_layers],
            zenith_angle: solar_zenith_angle,
            screening_height: 0.0,
        };
        if n_layers == 0 {
            return Ok(result);
        }

        let chi = solar_zenith_angle * DEGREES_TO_RADIANS;
        let cos_chi = chi.cos();

        if solar_zenith_angle < PLANE_PARALLEL_LIMIT {
            let sec_chi = 1.0 / cos_chi;
            for e in &mut result.enhancement_factor {
                *e = sec_chi;
            }
            // Cumulative path in layer units, top down
            result.air_mass[n_layers - 1] = sec_chi;
            for i in (0..n_layers - 1).rev() {
                result.air_mass[i] = result.air_mass[i + 1] + sec_chi;
            }
            return Ok(result);
        }

        if solar_zenith_angle > 90.0 {
            // Tangent ray from the sun grazes the Earth at this altitude
            let h_s = self.earth_radius * (1.0 / cos_chi.abs() - 1.0);
            let z_top = self.radii[n_layers] - self.earth_radius;
            result.screening_height = h_s.min(z_top);
        }

        for i in 0..n_layers {
            let r_bottom = self.radii[i];
            let r_mid = 0.5 * (r_bottom + self.radii[i + 1]);

            let layer_altitude = r_bottom - self.earth_radius;
            if solar_zenith_angle > 90.0 && layer_altitude < result.screening_height {
                result.sunlit[i] = false;
                result.enhancement_factor[i] = 0.0;
                continue;
            }

            result.enhancement_factor[i] = self.enhancement_at(r_mid, chi);
        }

        // Cumulative enhanced path from TOA, weighted by layer thickness
        let mut cumulative = 0.0;
        for i in (0..n_layers).rev() {
            if result.sunlit[i] {
                let dz = self.radii[i + 1] - self.radii[i];
                cumulative += result.enhancement_factor[i] * dz;
            }
            result.air_mass[i] = cumulative;
        }

        Ok(result)
    }

    /// Enhancement factor for a spherical shell at radius `r` [km].
    fn enhancement_at(&self, radius: f64, chi: f64) -> f64 {
        let cos_chi = chi.cos();
        let sin_chi = chi.sin();

        if cos_chi.abs() > 0.2 {
            // First-order spherical correction to the secant
            let x = (radius - self.earth_radius) / self.earth_radius;
            return (1.0 + x * sin_chi * sin_chi) / cos_chi.abs();
        }

        let y = radius / self.earth_radius;
        if cos_chi > 0.0 {
            // Grazing path through the shell, sun above horizon
            let enhancement = (1.0 + (y * y - 1.0) / (cos_chi * cos_chi)).sqrt();
            enhancement.min(ENHANCEMENT_CAP)
        } else {
            // Sun below horizon: the ray enters at the grazing angle to the
            // local horizon
            let grazing = (self.earth_radius / radius).acos();
            let effective = chi - grazing;
            if effective > 0.0 && effective < std::f64::consts::FRAC_PI_2 {
                1.0 / effective.cos()
            } else {
                0.0
            }
        }
    }
}

/// Plane-parallel relative air mass after Kasten & Young (1989):
///
/// ```text
/// am(χ) = 1 / (cos χ + 0.50572·(96.07995 − χ_deg)^(−1.6364))
/// ```
///
/// The plain secant is used below 75° where it is accurate to better than a
/// percent; at and beyond the horizon the air mass is unbounded.
pub fn plane_parallel_air_mass(solar_zenith_angle: f64) -> f64 {
    if solar_zenith_angle >= 90.0 {
        return f64::INFINITY;
    }
    let chi = solar_zenith_angle * DEGREES_TO_RADIANS;
    if solar_zenith_angle < 75.0 {
        return 1.0 / chi.cos();
    }
    1.0 / (chi.cos() + 0.50572 * (96.07995 - solar_zenith_angle).powf(-1.6364))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;
    use is_close::is_close;

    fn altitude_grid(n_layers: usize, top_km: f64) -> Grid {
        Grid::equally_spaced(GridSpec::new("altitude", "km", n_layers), 0.0, top_km).unwrap()
    }

    #[test]
    fn overhead_sun_has_unit_enhancement() {
        let geometry = SphericalGeometry::new(&altitude_grid(5, 50.0));
        let path = geometry.calculate(0.0).unwrap();

        for &e in &path.enhancement_factor {
            assert!(is_close!(e, 1.0));
        }
        assert!(path.sunlit.iter().all(|&s| s));
        assert_eq!(path.screening_height, 0.0);
    }

    #[test]
    fn plane_parallel_regime_is_secant() {
        let geometry = SphericalGeometry::new(&altitude_grid(4, 40.0));
        let path = geometry.calculate(60.0).unwrap();

        for &e in &path.enhancement_factor {
            assert!(is_close!(e, 2.0, rel_tol = 1e-12));
        }
        // Air mass decreases monotonically from surface to TOA
        for i in 0..3 {
            assert!(path.air_mass[i] > path.air_mass[i + 1]);
        }
    }

    #[test]
    fn spherical_regime_stays_below_secant() {
        let geometry = SphericalGeometry::new(&altitude_grid(10, 100.0));
        let path = geometry.calculate(88.0).unwrap();

        let secant = 1.0 / (88.0 * DEGREES_TO_RADIANS).cos();
        for &e in &path.enhancement_factor {
            assert!(e > 1.0);
            assert!(e <= ENHANCEMENT_CAP.max(secant));
        }
        assert!(path.sunlit.iter().all(|&s| s));
    }

    #[test]
    fn twilight_screens_low_layers() {
        let geometry = SphericalGeometry::new(&altitude_grid(5, 100.0));
        let path = geometry.calculate(105.0).unwrap();

        assert!(path.screening_height > 10.0);
        assert!(!path.sunlit[0]);
        assert_eq!(path.enhancement_factor[0], 0.0);

        // Shadowed layers contribute nothing to the overhead air mass
        for i in 0..4 {
            assert!(path.air_mass[i] >= path.air_mass[i + 1]);
        }
    }

    #[test]
    fn screening_height_is_clamped_to_grid_top() {
        let geometry = SphericalGeometry::new(&altitude_grid(5, 30.0));
        // At 120° the geometric screening height far exceeds 30 km
        let path = geometry.calculate(120.0).unwrap();
        assert!(is_close!(path.screening_height, 30.0));
        assert!(path.sunlit.iter().all(|&s| !s));
        assert!(path.air_mass.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn invalid_zenith_angle_is_rejected() {
        let geometry = SphericalGeometry::new(&altitude_grid(2, 10.0));
        assert!(geometry.calculate(-1.0).is_err());
        assert!(geometry.calculate(181.0).is_err());
        assert!(geometry.calculate(f64::NAN).is_err());
    }

    #[test]
    fn custom_earth_radius_shifts_screening() {
        // A grid tall enough that the screening height is not clamped
        let grid = altitude_grid(5, 10000.0);
        let small = SphericalGeometry::with_earth_radius(&grid, 1000.0);
        let large = SphericalGeometry::with_earth_radius(&grid, 6371.0);

        let h_small = small.calculate(120.0).unwrap().screening_height;
        let h_large = large.calculate(120.0).unwrap().screening_height;
        assert!(is_close!(h_small, 1000.0, rel_tol = 1e-9));
        assert!(is_close!(h_large, 6371.0, rel_tol = 1e-9));
        assert!(h_small < h_large);
    }

    #[test]
    fn kasten_young_matches_secant_at_low_angles() {
        assert!(is_close!(plane_parallel_air_mass(0.0), 1.0));
        assert!(is_close!(plane_parallel_air_mass(60.0), 2.0, rel_tol = 1e-12));
    }

    #[test]
    fn kasten_young_is_finite_near_horizon() {
        let am_85 = plane_parallel_air_mass(85.0);
        let am_89 = plane_parallel_air_mass(89.0);
        // Kasten-Young stays well below the diverging secant
        assert!(am_85 > 10.0 && am_85 < 12.0, "am(85) = {am_85}");
        assert!(am_89 > am_85);
        assert!(plane_parallel_air_mass(90.0).is_infinite());
    }
}
