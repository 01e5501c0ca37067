//! US Standard Atmosphere 1976.
//!
//! Piecewise-linear temperature layers with the matching barometric pressure
//! segments, plus derived air density and a climatological ozone layer. Used
//! to fill model profiles when the caller has no sounding of their own.

use skyrad_core::constants::{BOLTZMANN, DOBSON_UNIT};
use skyrad_core::grid::Grid;

/// O2 volume mixing ratio in dry air.
pub const O2_MIXING_RATIO: f64 = 0.2095;

/// Temperature [K] at altitude `z` [km].
pub fn temperature(z: f64) -> f64 {
    if z < 11.0 {
        // Troposphere, lapse rate -6.5 K/km
        288.15 - 6.5 * z
    } else if z < 20.0 {
        // Lower stratosphere, isothermal
        216.65
    } else if z < 32.0 {
        // Middle stratosphere, +1.0 K/km
        216.65 + 1.0 * (z - 20.0)
    } else if z < 47.0 {
        // Upper stratosphere, +2.8 K/km
        228.65 + 2.8 * (z - 32.0)
    } else if z < 51.0 {
        // Stratopause, isothermal
        270.65
    } else if z < 71.0 {
        // Mesosphere, -2.8 K/km
        270.65 - 2.8 * (z - 51.0)
    } else {
        // Upper mesosphere, -2.0 K/km
        214.65 - 2.0 * (z - 71.0)
    }
}

/// Pressure [hPa] at altitude `z` [km].
pub fn pressure(z: f64) -> f64 {
    if z < 11.0 {
        1013.25 * (temperature(z) / 288.15).powf(5.2559)
    } else if z < 20.0 {
        226.32 * (-0.1577 * (z - 11.0)).exp()
    } else if z < 32.0 {
        54.75 * (temperature(z) / 216.65).powf(-34.163)
    } else if z < 47.0 {
        8.68 * (temperature(z) / 228.65).powf(-12.201)
    } else {
        1.11 * (-0.15 * (z - 47.0)).exp()
    }
}

/// Air number density [molecules/cm³] from the ideal-gas law.
pub fn air_density(temperature_k: f64, pressure_hpa: f64) -> f64 {
    let pressure_pa = pressure_hpa * 100.0;
    // molecules/m³ → molecules/cm³
    pressure_pa / (BOLTZMANN * temperature_k) * 1.0e-6
}

/// Temperature profile over a midpoint vector [K].
pub fn temperature_profile(altitude_midpoints: &[f64]) -> Vec<f64> {
    altitude_midpoints.iter().map(|&z| temperature(z)).collect()
}

/// Pressure profile over a midpoint vector [hPa].
pub fn pressure_profile(altitude_midpoints: &[f64]) -> Vec<f64> {
    altitude_midpoints.iter().map(|&z| pressure(z)).collect()
}

/// Air-density profile over a midpoint vector [molecules/cm³].
pub fn air_density_profile(altitude_midpoints: &[f64]) -> Vec<f64> {
    altitude_midpoints
        .iter()
        .map(|&z| air_density(temperature(z), pressure(z)))
        .collect()
}

/// O2 number density profile as a fixed fraction of air density.
pub fn o2_profile(air_density_profile: &[f64]) -> Vec<f64> {
    air_density_profile
        .iter()
        .map(|&n| n * O2_MIXING_RATIO)
        .collect()
}

/// Unnormalised ozone shape at altitude `z` [km]: a stratospheric layer
/// peaking near 22 km over a small tropospheric background.
pub fn ozone_shape(z: f64) -> f64 {
    let stratospheric = (-0.5 * ((z - 22.0) / 5.0).powi(2)).exp();
    let tropospheric = 0.05 * (-z / 8.0).exp();
    stratospheric + tropospheric
}

/// Ozone number density profile [molecules/cm³] scaled so the column over
/// the grid equals `column_du` Dobson units.
pub fn ozone_profile(altitude_grid: &Grid, column_du: f64) -> Vec<f64> {
    let midpoints = altitude_grid.midpoints();
    let deltas = altitude_grid.deltas();

    let shape: Vec<f64> = midpoints.iter().map(|&z| ozone_shape(z)).collect();
    // Column of the unnormalised shape [shape · cm]
    let shape_column: f64 = shape
        .iter()
        .zip(deltas)
        .map(|(s, dz)| s * dz.abs() * 1.0e5)
        .sum();
    if shape_column <= 0.0 {
        return vec![0.0; shape.len()];
    }

    let scale = column_du * DOBSON_UNIT / shape_column;
    shape.iter().map(|s| s * scale).collect()
}
