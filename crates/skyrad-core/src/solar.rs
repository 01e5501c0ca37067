//! Solar geometry and the extraterrestrial flux interface.
//!
//! The position algorithm follows Michalsky (1988), "The Astronomical
//! Almanac's algorithm for approximate solar position (1950–2050)", Solar
//! Energy 40, 227–235, accurate to about 0.01° in zenith angle over that
//! period. The Earth–Sun distance correction uses Spencer's Fourier series.

use crate::constants::{DEGREES_TO_RADIANS, RADIANS_TO_DEGREES};
use crate::errors::{ensure_finite, SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::interpolate::LinearInterpolator;

/// Solar position for an observer at a given time and place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Solar zenith angle [degrees].
    pub zenith_angle: f64,
    /// Solar azimuth angle [degrees, clockwise from north].
    pub azimuth_angle: f64,
    /// Solar elevation above the horizon [degrees].
    pub elevation: f64,
    /// Hour angle [degrees].
    pub hour_angle: f64,
    /// Solar declination [degrees].
    pub declination: f64,
}

/// Julian day number for a calendar date.
pub fn julian_day(year: i32, month: u32, day: u32) -> f64 {
    let a = (14 - month as i32) / 12;
    let y = year + 4800 - a;
    let m = month as i32 + 12 * a - 3;

    (day as i32 + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045) as f64
}

/// Day of year (1–366) for a calendar date.
pub fn day_of_year(year: i32, month: u32, day: u32) -> u32 {
    const DAYS: [u32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let mut doy: u32 = DAYS[1..month as usize].iter().sum();
    doy += day;

    let leap = (year % 4 == 0 && year % 100 != 0) || year % 400 == 0;
    if leap && month > 2 {
        doy += 1;
    }
    doy
}

/// Earth–Sun distance correction factor (r₀/r)² for a day of year, after
/// Spencer. Greater than 1 near perihelion (early January), below 1 near
/// aphelion (early July).
pub fn earth_sun_distance_factor(day_of_year: u32) -> f64 {
    let gamma = 2.0 * std::f64::consts::PI * (day_of_year as f64 - 1.0) / 365.0;
    1.000110
        + 0.034221 * gamma.cos()
        + 0.001280 * gamma.sin()
        + 0.000719 * (2.0 * gamma).cos()
        + 0.000077 * (2.0 * gamma).sin()
}

/// Earth–Sun distance in AU for a day of year.
pub fn earth_sun_distance(day_of_year: u32) -> f64 {
    1.0 / earth_sun_distance_factor(day_of_year).sqrt()
}

/// Solar position for a UTC time and geographic location.
///
/// `hour` is UTC with fractional hours; latitude is positive north,
/// longitude positive east.
pub fn solar_position(
    year: i32,
    month: u32,
    day: u32,
    hour: f64,
    latitude: f64,
    longitude: f64,
) -> SolarPosition {
    let lat_rad = latitude * DEGREES_TO_RADIANS;

    let jd = julian_day(year, month, day) + (hour - 12.0) / 24.0;
    // Julian centuries from J2000.0
    let t = (jd - 2451545.0) / 36525.0;

    let mean_longitude = normalize_degrees(280.46646 + 36000.76983 * t + 0.0003032 * t * t);
    let mean_anomaly = normalize_degrees(357.52911 + 35999.05029 * t - 0.0001537 * t * t);
    let mean_anomaly_rad = mean_anomaly * DEGREES_TO_RADIANS;

    let center = (1.914602 - 0.004817 * t - 0.000014 * t * t) * mean_anomaly_rad.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * mean_anomaly_rad).sin()
        + 0.000289 * (3.0 * mean_anomaly_rad).sin();

    let sun_longitude_rad = (mean_longitude + center) * DEGREES_TO_RADIANS;
    let obliquity_rad = (23.439291 - 0.0130042 * t - 0.00000016 * t * t) * DEGREES_TO_RADIANS;

    let right_ascension = (obliquity_rad.cos() * sun_longitude_rad.sin())
        .atan2(sun_longitude_rad.cos());
    let declination_rad = (obliquity_rad.sin() * sun_longitude_rad.sin()).asin();

    let gmst = normalize_degrees(
        280.46061837 + 360.98564736629 * (jd - 2451545.0) + 0.000387933 * t * t
            - t * t * t / 38710000.0,
    );
    let lmst = gmst + longitude;

    let mut hour_angle = lmst - right_ascension * RADIANS_TO_DEGREES;
    while hour_angle > 180.0 {
        hour_angle -= 360.0;
    }
    while hour_angle < -180.0 {
        hour_angle += 360.0;
    }
    let hour_angle_rad = hour_angle * DEGREES_TO_RADIANS;

    let cos_zenith = (lat_rad.sin() * declination_rad.sin()
        + lat_rad.cos() * declination_rad.cos() * hour_angle_rad.cos())
    .clamp(-1.0, 1.0);
    let zenith_rad = cos_zenith.acos();

    let azimuth = if zenith_rad.sin().abs() < 1e-10 {
        0.0
    } else {
        let sin_azimuth = -declination_rad.cos() * hour_angle_rad.sin() / zenith_rad.sin();
        let cos_azimuth = (declination_rad.sin() - lat_rad.sin() * cos_zenith)
            / (lat_rad.cos() * zenith_rad.sin());
        normalize_degrees(sin_azimuth.atan2(cos_azimuth) * RADIANS_TO_DEGREES)
    };

    SolarPosition {
        zenith_angle: zenith_rad * RADIANS_TO_DEGREES,
        azimuth_angle: azimuth,
        elevation: 90.0 - zenith_rad * RADIANS_TO_DEGREES,
        hour_angle,
        declination: declination_rad * RADIANS_TO_DEGREES,
    }
}

fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Extraterrestrial solar flux at 1 AU, tabulated against wavelength.
///
/// Flux is in photon units (photons/cm²/s/nm); any irradiance → photon
/// conversion happens before construction. Evaluation interpolates onto the
/// wavelength grid midpoints, applies an Earth–Sun distance factor, and
/// returns zero outside the reference range.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraterrestrialFlux {
    wavelengths: Vec<f64>,
    flux: Vec<f64>,
}

impl ExtraterrestrialFlux {
    pub fn new(wavelengths: Vec<f64>, flux: Vec<f64>) -> SkyradResult<Self> {
        if wavelengths.len() != flux.len() {
            return Err(SkyradError::dimension(
                "extraterrestrial flux table",
                wavelengths.len(),
                flux.len(),
            ));
        }
        if wavelengths.len() < 2 {
            return Err(SkyradError::dimension(
                "extraterrestrial flux points",
                2,
                wavelengths.len(),
            ));
        }
        ensure_finite("extraterrestrial flux wavelengths", &wavelengths)?;
        ensure_finite("extraterrestrial flux values", &flux)?;

        Ok(Self { wavelengths, flux })
    }

    pub fn reference_wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn reference_flux(&self) -> &[f64] {
        &self.flux
    }

    /// Spectral flux at the grid midpoints, scaled by the distance factor
    /// (r₀/r)² [photons/cm²/s/nm].
    pub fn calculate(&self, wavelength_grid: &Grid, distance_factor: f64) -> Vec<f64> {
        let targets = wavelength_grid.midpoints();
        let mut result =
            LinearInterpolator::new().interpolate(targets, &self.wavelengths, &self.flux);

        let wl_min = self.wavelengths[0];
        let wl_max = self.wavelengths[self.wavelengths.len() - 1];
        for (value, &wl) in result.iter_mut().zip(targets) {
            if wl < wl_min || wl > wl_max {
                *value = 0.0;
            } else {
                *value *= distance_factor;
            }
        }
        result
    }

    /// Flux integrated over each wavelength bin [photons/cm²/s].
    pub fn calculate_integrated(&self, wavelength_grid: &Grid, distance_factor: f64) -> Vec<f64> {
        self.calculate(wavelength_grid, distance_factor)
            .into_iter()
            .zip(wavelength_grid.deltas())
            .map(|(flux, delta)| flux * delta.abs())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;
    use is_close::is_close;

    // ===== Calendar helpers =====

    #[test]
    fn julian_day_of_j2000_epoch() {
        // 2000 Jan 1 at noon is JD 2451545
        assert!(is_close!(julian_day(2000, 1, 1), 2451545.0));
    }

    #[test]
    fn day_of_year_handles_leap_years() {
        assert_eq!(day_of_year(2021, 1, 1), 1);
        assert_eq!(day_of_year(2021, 12, 31), 365);
        assert_eq!(day_of_year(2020, 3, 1), 61);
        assert_eq!(day_of_year(2020, 12, 31), 366);
        assert_eq!(day_of_year(1900, 3, 1), 60); // century, not leap
        assert_eq!(day_of_year(2000, 3, 1), 61); // 400-year rule
    }

    // ===== Earth-Sun distance =====

    #[test]
    fn distance_factor_peaks_near_perihelion() {
        let january = earth_sun_distance_factor(3);
        let july = earth_sun_distance_factor(185);
        assert!(january > 1.0);
        assert!(july < 1.0);
        // ±3.3% annual swing
        assert!(january < 1.04 && july > 0.96);
    }

    #[test]
    fn distance_in_au_is_near_unity() {
        for doy in [1, 91, 182, 274, 365] {
            let d = earth_sun_distance(doy);
            assert!(d > 0.98 && d < 1.02, "d({doy}) = {d}");
        }
    }

    // ===== Solar position =====

    #[test]
    fn equinox_noon_sun_overhead_at_equator() {
        // 2000-03-20 ~noon UTC at (0, 0): sun nearly overhead
        let position = solar_position(2000, 3, 20, 12.0, 0.0, 0.0);
        assert!(position.zenith_angle < 3.0, "zenith = {}", position.zenith_angle);
        assert!(position.declination.abs() < 1.0);
    }

    #[test]
    fn summer_solstice_declination() {
        let position = solar_position(2000, 6, 21, 12.0, 45.0, 0.0);
        assert!(is_close!(position.declination, 23.44, abs_tol = 0.1));
    }

    #[test]
    fn midnight_sun_is_below_horizon_at_equator() {
        let position = solar_position(2000, 3, 20, 0.0, 0.0, 0.0);
        assert!(position.zenith_angle > 90.0);
        assert!(position.elevation < 0.0);
    }

    #[test]
    fn elevation_complements_zenith() {
        let position = solar_position(2010, 8, 15, 15.0, 52.0, 13.0);
        assert!(is_close!(
            position.elevation,
            90.0 - position.zenith_angle,
            rel_tol = 1e-12
        ));
    }

    // ===== Extraterrestrial flux =====

    fn flux_table() -> ExtraterrestrialFlux {
        ExtraterrestrialFlux::new(
            vec![300.0, 400.0, 500.0],
            vec![1.0e14, 2.0e14, 3.0e14],
        )
        .unwrap()
    }

    #[test]
    fn flux_interpolates_onto_grid() {
        let grid =
            Grid::equally_spaced(GridSpec::new("wavelength", "nm", 2), 300.0, 500.0).unwrap();
        // Midpoints at 350 and 450 nm
        let flux = flux_table().calculate(&grid, 1.0);
        assert!(is_close!(flux[0], 1.5e14));
        assert!(is_close!(flux[1], 2.5e14));
    }

    #[test]
    fn flux_zero_outside_reference_range() {
        let grid =
            Grid::equally_spaced(GridSpec::new("wavelength", "nm", 2), 100.0, 260.0).unwrap();
        let flux = flux_table().calculate(&grid, 1.0);
        assert_eq!(flux, vec![0.0, 0.0]);
    }

    #[test]
    fn flux_applies_distance_factor() {
        let grid =
            Grid::equally_spaced(GridSpec::new("wavelength", "nm", 1), 340.0, 360.0).unwrap();
        let near = flux_table().calculate(&grid, 1.03);
        let far = flux_table().calculate(&grid, 0.97);
        assert!(is_close!(near[0] / far[0], 1.03 / 0.97, rel_tol = 1e-12));
    }

    #[test]
    fn integrated_flux_weights_by_bin_width() {
        let grid =
            Grid::equally_spaced(GridSpec::new("wavelength", "nm", 2), 300.0, 500.0).unwrap();
        let spectral = flux_table().calculate(&grid, 1.0);
        let integrated = flux_table().calculate_integrated(&grid, 1.0);
        assert!(is_close!(integrated[0], spectral[0] * 100.0));
    }

    #[test]
    fn flux_table_validation() {
        assert!(ExtraterrestrialFlux::new(vec![300.0], vec![1.0]).is_err());
        assert!(ExtraterrestrialFlux::new(vec![300.0, 400.0], vec![1.0]).is_err());
        assert!(ExtraterrestrialFlux::new(vec![300.0, 400.0], vec![1.0, f64::NAN]).is_err());
    }
}
