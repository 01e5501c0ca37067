//! Assembled output of a model run.

use crate::errors::{SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::photolysis::PhotolysisRates;
use crate::radiation::RadiationField;

/// Everything computed by one `calculate` call: metadata, the grids used,
/// the radiation field, and the per-reaction photolysis rate profiles.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// Solar zenith angle used [degrees].
    pub solar_zenith_angle: f64,
    /// Day of year used for the distance correction.
    pub day_of_year: u32,
    /// Earth–Sun distance used [AU].
    pub earth_sun_distance: f64,
    /// Whether the sun was above the horizon.
    pub is_daytime: bool,
    /// Whether spherical slant paths were used.
    pub used_spherical_geometry: bool,
    /// Wavelength grid of the calculation.
    pub wavelength_grid: Grid,
    /// Altitude grid of the calculation.
    pub altitude_grid: Grid,
    /// Level-resolved radiation field.
    pub radiation_field: RadiationField,
    /// Photolysis rate profiles, one entry per registered reaction.
    pub photolysis_rates: Vec<PhotolysisRates>,
}

impl ModelOutput {
    pub fn is_empty(&self) -> bool {
        self.radiation_field.is_empty()
    }

    pub fn n_levels(&self) -> usize {
        self.radiation_field.n_levels()
    }

    pub fn n_wavelengths(&self) -> usize {
        self.radiation_field.n_wavelengths()
    }

    pub fn n_reactions(&self) -> usize {
        self.photolysis_rates.len()
    }

    pub fn reaction_names(&self) -> Vec<&str> {
        self.photolysis_rates
            .iter()
            .map(|r| r.reaction_name.as_str())
            .collect()
    }

    /// J for a reaction at one level [s⁻¹].
    pub fn photolysis_rate(&self, reaction_name: &str, level: usize) -> SkyradResult<f64> {
        let profile = self.photolysis_rate_profile(reaction_name)?;
        profile
            .get(level)
            .copied()
            .ok_or_else(|| SkyradError::bounds("photolysis level index", level as f64))
    }

    /// The full J profile for a reaction, surface first.
    pub fn photolysis_rate_profile(&self, reaction_name: &str) -> SkyradResult<&[f64]> {
        self.photolysis_rates
            .iter()
            .find(|r| r.reaction_name == reaction_name)
            .map(|r| r.rates.as_slice())
            .ok_or_else(|| SkyradError::MissingEntity {
                kind: "photolysis reaction",
                key: reaction_name.to_string(),
            })
    }

    /// J for a reaction at the surface [s⁻¹].
    pub fn surface_photolysis_rate(&self, reaction_name: &str) -> SkyradResult<f64> {
        self.photolysis_rate(reaction_name, 0)
    }

    /// Maximum J over all levels for a reaction (typically at TOA).
    pub fn max_photolysis_rate(&self, reaction_name: &str) -> SkyradResult<f64> {
        Ok(self
            .photolysis_rates
            .iter()
            .find(|r| r.reaction_name == reaction_name)
            .ok_or_else(|| SkyradError::MissingEntity {
                kind: "photolysis reaction",
                key: reaction_name.to_string(),
            })?
            .max_rate())
    }

    /// Total (direct + diffuse) actinic flux at a level.
    pub fn actinic_flux(&self, level: usize) -> Vec<f64> {
        self.radiation_field.total_actinic_flux(level)
    }

    /// Direct actinic flux at a level.
    pub fn direct_actinic_flux(&self, level: usize) -> Vec<f64> {
        row(self.radiation_field.actinic_direct(), level)
    }

    /// Diffuse actinic flux at a level.
    pub fn diffuse_actinic_flux(&self, level: usize) -> Vec<f64> {
        row(self.radiation_field.actinic_diffuse(), level)
    }

    /// Direct irradiance at a level.
    pub fn direct_irradiance(&self, level: usize) -> Vec<f64> {
        row(self.radiation_field.direct_irradiance(), level)
    }

    /// Downwelling diffuse irradiance at a level.
    pub fn diffuse_down_irradiance(&self, level: usize) -> Vec<f64> {
        row(self.radiation_field.diffuse_down(), level)
    }

    /// Upwelling diffuse irradiance at a level.
    pub fn diffuse_up_irradiance(&self, level: usize) -> Vec<f64> {
        row(self.radiation_field.diffuse_up(), level)
    }

    /// Actinic flux integrated over every wavelength bin at a level.
    pub fn integrated_actinic_flux(&self, level: usize) -> f64 {
        self.band_actinic_flux(level, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// UV-B (280–315 nm) actinic flux at a level.
    pub fn uvb_actinic_flux(&self, level: usize) -> f64 {
        self.band_actinic_flux(level, 280.0, 315.0)
    }

    /// UV-A (315–400 nm) actinic flux at a level.
    pub fn uva_actinic_flux(&self, level: usize) -> f64 {
        self.band_actinic_flux(level, 315.0, 400.0)
    }

    /// Actinic flux integrated over `[wl_min, wl_max]` using cell-width
    /// weights; bins whose midpoints fall outside the band are excluded.
    pub fn band_actinic_flux(&self, level: usize, wl_min: f64, wl_max: f64) -> f64 {
        let flux = self.actinic_flux(level);
        let midpoints = self.wavelength_grid.midpoints();
        let deltas = self.wavelength_grid.deltas();

        let n = flux.len().min(midpoints.len());
        (0..n)
            .filter(|&i| midpoints[i] >= wl_min && midpoints[i] <= wl_max)
            .map(|i| flux[i] * deltas[i].abs())
            .sum()
    }

    /// Human-readable one-screen summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str("Radiative transfer output\n");
        s.push_str("=========================\n");
        s.push_str(&format!("SZA: {:.2} degrees\n", self.solar_zenith_angle));
        s.push_str(&format!(
            "Daytime: {}\n",
            if self.is_daytime { "yes" } else { "no" }
        ));
        s.push_str(&format!("Levels: {}\n", self.n_levels()));
        s.push_str(&format!("Wavelengths: {}\n", self.n_wavelengths()));
        s.push_str(&format!("Reactions: {}\n", self.n_reactions()));

        if !self.photolysis_rates.is_empty() {
            s.push_str("\nSurface J-values:\n");
            for rates in &self.photolysis_rates {
                s.push_str(&format!(
                    "  {}: {:.4e} s^-1\n",
                    rates.reaction_name,
                    rates.surface_rate()
                ));
            }
        }
        s
    }
}

fn row(array: &ndarray::Array2<f64>, level: usize) -> Vec<f64> {
    if level >= array.nrows() {
        return vec![];
    }
    array.row(level).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;
    use is_close::is_close;

    fn sample_output() -> ModelOutput {
        let wavelength_grid =
            Grid::equally_spaced(GridSpec::new("wavelength", "nm", 4), 280.0, 440.0).unwrap();
        let altitude_grid =
            Grid::equally_spaced(GridSpec::new("altitude", "km", 2), 0.0, 20.0).unwrap();

        let mut field = RadiationField::new(3, 4);
        for level in 0..3 {
            for j in 0..4 {
                let direct = (level + 1) as f64;
                field.set(level, j, direct, 0.0, 0.1, direct, 0.2);
            }
        }

        ModelOutput {
            solar_zenith_angle: 30.0,
            day_of_year: 172,
            earth_sun_distance: 1.0,
            is_daytime: true,
            used_spherical_geometry: true,
            wavelength_grid,
            altitude_grid,
            radiation_field: field,
            photolysis_rates: vec![PhotolysisRates {
                reaction_name: "O3 -> O2 + O(1D)".to_string(),
                rates: vec![1.0e-5, 2.0e-5, 4.0e-5],
            }],
        }
    }

    #[test]
    fn photolysis_accessors() {
        let output = sample_output();
        assert_eq!(output.n_reactions(), 1);
        assert_eq!(output.reaction_names(), vec!["O3 -> O2 + O(1D)"]);
        assert!(is_close!(
            output.surface_photolysis_rate("O3 -> O2 + O(1D)").unwrap(),
            1.0e-5
        ));
        assert!(is_close!(
            output.photolysis_rate("O3 -> O2 + O(1D)", 2).unwrap(),
            4.0e-5
        ));
        assert!(is_close!(
            output.max_photolysis_rate("O3 -> O2 + O(1D)").unwrap(),
            4.0e-5
        ));
    }

    #[test]
    fn unknown_reaction_is_an_error() {
        let output = sample_output();
        assert!(matches!(
            output.photolysis_rate_profile("NO2 -> NO + O"),
            Err(SkyradError::MissingEntity { .. })
        ));
        assert!(output.photolysis_rate("O3 -> O2 + O(1D)", 99).is_err());
    }

    #[test]
    fn actinic_flux_accessors() {
        let output = sample_output();
        let total = output.actinic_flux(0);
        assert!(is_close!(total[0], 1.2));
        assert_eq!(output.direct_actinic_flux(1), vec![2.0; 4]);
        assert_eq!(output.diffuse_actinic_flux(1), vec![0.2; 4]);
        assert!(output.direct_actinic_flux(9).is_empty());
    }

    #[test]
    fn irradiance_accessors() {
        let output = sample_output();
        assert_eq!(output.direct_irradiance(2), vec![3.0; 4]);
        assert_eq!(output.diffuse_down_irradiance(0), vec![0.1; 4]);
        assert_eq!(output.diffuse_up_irradiance(0), vec![0.0; 4]);
    }

    #[test]
    fn band_integration_uses_cell_widths() {
        let output = sample_output();
        // 40 nm bins with midpoints at 300, 340, 380, 420 nm; flux 1.2 each
        let total = output.integrated_actinic_flux(0);
        assert!(is_close!(total, 1.2 * 40.0 * 4.0));

        // UV-B band contains only the 300 nm bin
        assert!(is_close!(output.uvb_actinic_flux(0), 1.2 * 40.0));
        // UV-A band contains the 340 and 380 nm bins
        assert!(is_close!(output.uva_actinic_flux(0), 1.2 * 40.0 * 2.0));
        // Custom band
        assert!(is_close!(
            output.band_actinic_flux(0, 400.0, 440.0),
            1.2 * 40.0
        ));
    }

    #[test]
    fn summary_mentions_key_figures() {
        let output = sample_output();
        let summary = output.summary();
        assert!(summary.contains("SZA: 30.00"));
        assert!(summary.contains("Reactions: 1"));
        assert!(summary.contains("O3 -> O2 + O(1D)"));
    }
}
