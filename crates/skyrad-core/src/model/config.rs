//! Model configuration.

use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_KM;
use crate::errors::{ensure_finite, SkyradError, SkyradResult};
use crate::solar;

/// Configuration for a model run.
///
/// Grids may be given either as explicit edge arrays or as
/// min/max/count triples; explicit edges win when both are present. All
/// profiles are optional layer-midpoint vectors; absent profiles simply are
/// not registered, and a radiator that needs one fails the calculation with
/// a missing-entity error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    // --- Wavelength grid ---
    /// Wavelength bin edges [nm]; overrides the min/max/count triple.
    pub wavelength_edges: Vec<f64>,
    pub wavelength_min: f64,
    pub wavelength_max: f64,
    pub n_wavelength_bins: usize,

    // --- Altitude grid ---
    /// Altitude level edges [km]; overrides the min/max/count triple.
    pub altitude_edges: Vec<f64>,
    pub altitude_min: f64,
    pub altitude_max: f64,
    pub n_altitude_layers: usize,

    // --- Solar parameters ---
    /// Solar zenith angle [degrees, 0–180].
    pub solar_zenith_angle: f64,
    /// Day of year [1–366], used for the Earth–Sun distance correction.
    pub day_of_year: u32,
    /// Earth–Sun distance [AU]; computed from `day_of_year` when ≤ 0.
    pub earth_sun_distance: f64,

    // --- Geographic location (for the date/location overload) ---
    pub latitude: f64,
    pub longitude: f64,

    // --- Surface ---
    /// Gray surface albedo [0–1], used when the spectrum is empty.
    pub surface_albedo: f64,
    /// Wavelength-dependent surface albedo, one value per wavelength bin.
    pub surface_albedo_spectrum: Vec<f64>,

    // --- Atmospheric profiles (layer midpoints) ---
    /// Temperature [K].
    pub temperature_profile: Vec<f64>,
    /// Pressure [hPa].
    pub pressure_profile: Vec<f64>,
    /// Air number density [molecules/cm³].
    pub air_density_profile: Vec<f64>,
    /// Ozone number density [molecules/cm³].
    pub ozone_profile: Vec<f64>,

    // --- Geometry options ---
    /// Use spherical slant paths; plane-parallel sec χ otherwise.
    pub use_spherical_geometry: bool,
    /// Earth radius [km].
    pub earth_radius: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            wavelength_edges: Vec::new(),
            wavelength_min: 280.0,
            wavelength_max: 700.0,
            n_wavelength_bins: 140,
            altitude_edges: Vec::new(),
            altitude_min: 0.0,
            altitude_max: 80.0,
            n_altitude_layers: 80,
            solar_zenith_angle: 0.0,
            day_of_year: 1,
            earth_sun_distance: -1.0,
            latitude: 0.0,
            longitude: 0.0,
            surface_albedo: 0.1,
            surface_albedo_spectrum: Vec::new(),
            temperature_profile: Vec::new(),
            pressure_profile: Vec::new(),
            air_density_profile: Vec::new(),
            ozone_profile: Vec::new(),
            use_spherical_geometry: true,
            earth_radius: EARTH_RADIUS_KM,
        }
    }
}

impl ModelConfig {
    /// Validate the configuration.
    ///
    /// Grid ranges must be non-degenerate, the zenith angle must lie in
    /// [0, 180], albedo values in [0, 1], and every supplied number must be
    /// finite.
    pub fn validate(&self) -> SkyradResult<()> {
        if self.wavelength_edges.is_empty() {
            if self.wavelength_min >= self.wavelength_max {
                return Err(SkyradError::bounds(
                    "wavelength range",
                    self.wavelength_max - self.wavelength_min,
                ));
            }
            if self.n_wavelength_bins == 0 {
                return Err(SkyradError::bounds("wavelength bin count", 0.0));
            }
        }
        if self.altitude_edges.is_empty() {
            if self.altitude_min >= self.altitude_max {
                return Err(SkyradError::bounds(
                    "altitude range",
                    self.altitude_max - self.altitude_min,
                ));
            }
            if self.n_altitude_layers == 0 {
                return Err(SkyradError::bounds("altitude layer count", 0.0));
            }
        }
        if !(0.0..=180.0).contains(&self.solar_zenith_angle)
            || !self.solar_zenith_angle.is_finite()
        {
            return Err(SkyradError::bounds(
                "solar zenith angle",
                self.solar_zenith_angle,
            ));
        }
        if !(0.0..=1.0).contains(&self.surface_albedo) {
            return Err(SkyradError::bounds("surface albedo", self.surface_albedo));
        }
        for &a in &self.surface_albedo_spectrum {
            if !(0.0..=1.0).contains(&a) {
                return Err(SkyradError::bounds("surface albedo spectrum value", a));
            }
        }
        if self.earth_radius <= 0.0 {
            return Err(SkyradError::bounds("earth radius", self.earth_radius));
        }

        ensure_finite("wavelength edges", &self.wavelength_edges)?;
        ensure_finite("altitude edges", &self.altitude_edges)?;
        ensure_finite("temperature profile", &self.temperature_profile)?;
        ensure_finite("pressure profile", &self.pressure_profile)?;
        ensure_finite("air density profile", &self.air_density_profile)?;
        ensure_finite("ozone profile", &self.ozone_profile)?;
        Ok(())
    }

    /// Earth–Sun distance [AU], computed from the day of year when the
    /// configured distance is non-positive.
    pub fn effective_earth_sun_distance(&self) -> f64 {
        if self.earth_sun_distance > 0.0 {
            return self.earth_sun_distance;
        }
        solar::earth_sun_distance(self.day_of_year)
    }

    /// Whether the configured zenith angle is daytime (χ < 90°).
    pub fn is_daytime(&self) -> bool {
        self.solar_zenith_angle < 90.0
    }

    /// Whether the configured zenith angle falls in the twilight band
    /// (90° ≤ χ < 108°).
    pub fn is_twilight(&self) -> bool {
        (90.0..108.0).contains(&self.solar_zenith_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn default_config_is_valid() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn degenerate_ranges_are_rejected() {
        let config = ModelConfig {
            wavelength_min: 400.0,
            wavelength_max: 300.0,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            n_altitude_layers: 0,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());

        // Explicit edges bypass the min/max check
        let config = ModelConfig {
            wavelength_min: 400.0,
            wavelength_max: 300.0,
            wavelength_edges: vec![300.0, 350.0, 400.0],
            ..ModelConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zenith_and_albedo_bounds() {
        let config = ModelConfig {
            solar_zenith_angle: 190.0,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            surface_albedo: 1.5,
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ModelConfig {
            surface_albedo_spectrum: vec![0.5, -0.1],
            ..ModelConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_profiles_are_rejected() {
        let config = ModelConfig {
            temperature_profile: vec![288.0, f64::NAN],
            ..ModelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SkyradError::NumericInvalid { .. })
        ));
    }

    #[test]
    fn effective_distance_falls_back_to_day_of_year() {
        let config = ModelConfig {
            earth_sun_distance: 1.01,
            ..ModelConfig::default()
        };
        assert!(is_close!(config.effective_earth_sun_distance(), 1.01));

        let config = ModelConfig {
            earth_sun_distance: -1.0,
            day_of_year: 3,
            ..ModelConfig::default()
        };
        // Near perihelion the distance dips below 1 AU
        assert!(config.effective_earth_sun_distance() < 1.0);
    }

    #[test]
    fn daytime_and_twilight_flags() {
        let mut config = ModelConfig::default();
        config.solar_zenith_angle = 45.0;
        assert!(config.is_daytime());
        assert!(!config.is_twilight());

        config.solar_zenith_angle = 95.0;
        assert!(!config.is_daytime());
        assert!(config.is_twilight());

        config.solar_zenith_angle = 120.0;
        assert!(!config.is_twilight());
    }

    #[test]
    fn serde_roundtrip_with_defaults() {
        let json = r#"{"solar_zenith_angle": 30.0, "surface_albedo": 0.05}"#;
        let config: ModelConfig = serde_json::from_str(json).unwrap();
        assert!(is_close!(config.solar_zenith_angle, 30.0));
        assert!(is_close!(config.surface_albedo, 0.05));
        assert_eq!(config.n_wavelength_bins, 140);
        assert!(config.use_spherical_geometry);

        let full = serde_json::to_string(&config).unwrap();
        let restored: ModelConfig = serde_json::from_str(&full).unwrap();
        assert_eq!(restored, config);
    }
}
