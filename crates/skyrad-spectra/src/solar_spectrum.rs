//! Reference solar spectra and photon-flux conversions.
//!
//! The engine works in photon units throughout; conversion from spectral
//! irradiance happens here, before the flux is handed to the core:
//!
//! ```text
//! F [photons/cm²/s/nm] = E [W/m²/nm] · 10⁻⁴ · λ / (hc)
//! ```
//!
//! The bundled ASTM E-490 AM0 spectrum is a simplified sampling suitable for
//! testing and teaching; research applications should ingest a measured
//! spectrum (SORCE, TSIS, or the WMO reference) through the same interface.

use skyrad_core::constants::{BOLTZMANN, PLANCK, SPEED_OF_LIGHT};
use skyrad_core::solar::ExtraterrestrialFlux;

/// Convert spectral irradiance [W/m²/nm] at `wavelength` [nm] to photon flux
/// [photons/cm²/s/nm].
pub fn irradiance_to_photon_flux(irradiance: f64, wavelength: f64) -> f64 {
    let wavelength_m = wavelength * 1.0e-9;
    let photons_per_joule = wavelength_m / (PLANCK * SPEED_OF_LIGHT);
    irradiance * 1.0e-4 * photons_per_joule
}

/// Convert photon flux [photons/cm²/s/nm] at `wavelength` [nm] to spectral
/// irradiance [W/m²/nm].
pub fn photon_flux_to_irradiance(photon_flux: f64, wavelength: f64) -> f64 {
    let wavelength_m = wavelength * 1.0e-9;
    let energy_per_photon = PLANCK * SPEED_OF_LIGHT / wavelength_m;
    photon_flux * energy_per_photon * 1.0e4
}

/// Simplified ASTM E-490 AM0 reference spectrum at 1 AU.
///
/// Returns `(wavelengths [nm], irradiance [W/m²/nm])` at representative
/// points from the UV-C through the near infrared.
pub fn astm_e490_irradiance() -> (Vec<f64>, Vec<f64>) {
    let wavelengths = vec![
        200.0, 220.0, 240.0, 260.0, 280.0, 300.0, 320.0, 340.0, 360.0, 380.0, 400.0, 450.0,
        500.0, 550.0, 600.0, 650.0, 700.0, 750.0, 800.0, 850.0, 900.0, 950.0, 1000.0,
    ];
    let irradiance = vec![
        0.01, 0.02, 0.03, 0.06, 0.15, 0.48, 0.71, 0.95, 1.08, 1.15, 1.52, 2.05, 1.95, 1.85,
        1.77, 1.65, 1.49, 1.30, 1.13, 0.98, 0.85, 0.80, 0.75,
    ];
    (wavelengths, irradiance)
}

/// The ASTM E-490 spectrum as an [`ExtraterrestrialFlux`] in photon units.
pub fn astm_e490() -> ExtraterrestrialFlux {
    let (wavelengths, irradiance) = astm_e490_irradiance();
    let flux = wavelengths
        .iter()
        .zip(&irradiance)
        .map(|(&wl, &e)| irradiance_to_photon_flux(e, wl))
        .collect();
    ExtraterrestrialFlux::new(wavelengths, flux).expect("static spectrum is well-formed")
}

/// Blackbody solar spectrum at 1 AU [photons/cm²/s/nm] for the given
/// wavelengths [nm], as a crude fallback when no measured spectrum is
/// available.
pub fn blackbody_flux(wavelengths: &[f64], temperature: f64) -> Vec<f64> {
    const SOLAR_RADIUS: f64 = 6.96e8; // m
    const ASTRONOMICAL_UNIT: f64 = 1.496e11; // m
    let solid_angle = (SOLAR_RADIUS / ASTRONOMICAL_UNIT).powi(2);

    wavelengths
        .iter()
        .map(|&wl| {
            let wl_m = wl * 1.0e-9;
            let x = PLANCK * SPEED_OF_LIGHT / (wl_m * BOLTZMANN * temperature);
            if x > 700.0 {
                return 0.0;
            }
            // Planck radiance B(λ, T) [W/m²/sr/m]
            let planck =
                2.0 * PLANCK * SPEED_OF_LIGHT * SPEED_OF_LIGHT / (wl_m.powi(5) * (x.exp() - 1.0));
            // Irradiance at Earth [W/m²/nm]
            let irradiance = planck * std::f64::consts::PI * solid_angle * 1.0e-9;
            irradiance_to_photon_flux(irradiance, wl)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use skyrad_core::grid::{Grid, GridSpec};

    #[test]
    fn photon_conversion_roundtrip() {
        let irradiance = 1.5; // W/m²/nm
        let flux = irradiance_to_photon_flux(irradiance, 500.0);
        assert!(is_close!(
            photon_flux_to_irradiance(flux, 500.0),
            irradiance,
            rel_tol = 1e-12
        ));
    }

    #[test]
    fn green_photons_order_of_magnitude() {
        // ~2 W/m²/nm at 500 nm is a few times 10¹⁴ photons/cm²/s/nm
        let flux = irradiance_to_photon_flux(2.0, 500.0);
        assert!(flux > 1.0e14 && flux < 1.0e15, "flux = {flux:.3e}");
    }

    #[test]
    fn astm_spectrum_covers_uv_through_nir() {
        let spectrum = astm_e490();
        assert!(is_close!(spectrum.reference_wavelengths()[0], 200.0));
        assert!(is_close!(
            *spectrum.reference_wavelengths().last().unwrap(),
            1000.0
        ));

        let grid =
            Grid::equally_spaced(GridSpec::new("wavelength", "nm", 10), 300.0, 700.0).unwrap();
        let flux = spectrum.calculate(&grid, 1.0);
        assert!(flux.iter().all(|&f| f > 0.0));
    }

    #[test]
    fn uv_flux_is_weaker_than_visible() {
        let spectrum = astm_e490();
        let grid =
            Grid::from_edges(GridSpec::new("wavelength", "nm", 2), vec![240.0, 260.0, 500.0])
                .unwrap();
        let flux = spectrum.calculate(&grid, 1.0);
        assert!(flux[0] < flux[1] / 10.0);
    }

    #[test]
    fn blackbody_peaks_in_the_visible() {
        let wavelengths: Vec<f64> = (250..1000).step_by(50).map(f64::from).collect();
        let flux = blackbody_flux(&wavelengths, 5778.0);

        let peak_index = flux
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        let peak_wl = wavelengths[peak_index];
        // Photon-count spectrum peaks redward of the 500 nm energy peak
        assert!(peak_wl > 400.0 && peak_wl < 900.0, "peak at {peak_wl} nm");
    }

    #[test]
    fn blackbody_magnitude_is_solar() {
        let flux = blackbody_flux(&[500.0], 5778.0);
        let irradiance = photon_flux_to_irradiance(flux[0], 500.0);
        // ASTM E-490 has ~1.95 W/m²/nm at 500 nm; Planck should be within 2x
        assert!(irradiance > 1.0 && irradiance < 4.0, "E = {irradiance}");
    }
}
