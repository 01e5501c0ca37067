//! Ozone photochemistry: absorption cross-section and the O(¹D)/O(³P)
//! quantum yields.
//!
//! The cross-section table carries representative values for the Hartley
//! band (200–320 nm), the temperature-sensitive Huggins bands (310–350 nm),
//! and the weak Chappuis band in the visible, after the JPL Publication 19-5
//! recommendations (Sander et al., Evaluation No. 19).
//!
//! The O(¹D) quantum yield follows a simplified Matsumi et al. (2002)
//! parameterisation: near unity in the Hartley band, falling through the
//! Huggins transition (306–328 nm) with a low-temperature enhancement, and a
//! weak tail to 370 nm. The O(³P) channel is its complement.

use skyrad_core::cross_section::{CrossSection, TabulatedCrossSection};
use skyrad_core::grid::Grid;
use skyrad_core::quantum_yield::{QuantumYield, QuantumYieldModel};

/// Reference wavelengths of the O3 table [nm].
const WAVELENGTHS: [f64; 20] = [
    175.0, 200.0, 210.0, 220.0, 230.0, 240.0, 250.0, 260.0, 270.0, 280.0, 290.0, 300.0, 310.0,
    320.0, 330.0, 340.0, 350.0, 400.0, 500.0, 600.0,
];

/// Reference temperatures of the O3 table [K].
const TEMPERATURES: [f64; 5] = [218.0, 228.0, 243.0, 273.0, 295.0];

/// Cross-section at 295 K [cm²/molecule].
const XS_295K: [f64; 20] = [
    1.0e-17, 1.1e-17, 1.0e-17, 7.4e-18, 4.3e-18, 2.1e-18, 9.9e-19, 5.1e-19, 3.3e-19, 2.6e-19,
    1.4e-19, 4.3e-20, 7.6e-21, 9.5e-22, 1.6e-22, 5.0e-23, 1.5e-23, 1.0e-24, 4.0e-21, 5.0e-21,
];

/// Cross-section at 218 K [cm²/molecule]; the temperature effect sits in the
/// Huggins bands (300–350 nm).
const XS_218K: [f64; 20] = [
    1.0e-17, 1.1e-17, 1.0e-17, 7.4e-18, 4.3e-18, 2.1e-18, 9.9e-19, 5.1e-19, 3.3e-19, 2.6e-19,
    1.4e-19, 3.8e-20, 5.5e-21, 5.5e-22, 6.0e-23, 1.5e-23, 4.0e-24, 1.0e-24, 4.0e-21, 5.0e-21,
];

/// Ozone absorption cross-section with temperature dependence.
///
/// Intermediate reference temperatures are filled by linear interpolation
/// between the 218 K and 295 K anchor rows.
pub fn o3_cross_section() -> CrossSection {
    let rows: Vec<Vec<f64>> = TEMPERATURES
        .iter()
        .map(|&t| {
            let fraction = (t - 218.0) / (295.0 - 218.0);
            XS_218K
                .iter()
                .zip(&XS_295K)
                .map(|(cold, warm)| cold + fraction * (warm - cold))
                .collect()
        })
        .collect();

    TabulatedCrossSection::with_temperatures(
        "O3",
        WAVELENGTHS.to_vec(),
        TEMPERATURES.to_vec(),
        rows,
    )
    .expect("static O3 table is well-formed")
    .into()
}

/// Quantum yield of O3 + hv → O(¹D) + O2.
#[derive(Debug, Clone, Copy, Default)]
pub struct O3ToO1d;

impl O3ToO1d {
    fn at_wavelength(wavelength: f64, temperature: f64) -> f64 {
        if !(175.0..=400.0).contains(&wavelength) {
            return 0.0;
        }

        // Hartley band
        if wavelength < 306.0 {
            return 0.90;
        }

        // Huggins transition, 306-328 nm, with low-temperature enhancement
        if wavelength <= 328.0 {
            let fraction = (wavelength - 306.0) / (328.0 - 306.0);
            let phi_298 = 0.90 - 0.45 * fraction;
            let t_factor = (1.0 + 0.003 * (298.0 - temperature)).clamp(0.8, 1.3);
            return (phi_298 * t_factor).clamp(0.0, 1.0);
        }

        // Tail to 340 nm
        if wavelength <= 340.0 {
            let fraction = (wavelength - 328.0) / (340.0 - 328.0);
            let phi = 0.45 - (0.45 - 0.08) * fraction;
            let t_factor = (1.0 + 0.001 * (298.0 - temperature)).clamp(0.9, 1.1);
            return (phi * t_factor).clamp(0.0, 1.0);
        }

        // Weak production out to 370 nm
        if wavelength <= 370.0 {
            let fraction = (wavelength - 340.0) / (370.0 - 340.0);
            return (0.08 * (1.0 - fraction)).max(0.0);
        }

        0.0
    }
}

impl QuantumYieldModel for O3ToO1d {
    fn name(&self) -> &str {
        "O3->O(1D)+O2"
    }

    fn calculate(&self, wavelength_grid: &Grid, temperature: f64, _air_density: f64) -> Vec<f64> {
        let t = temperature.clamp(200.0, 320.0);
        wavelength_grid
            .midpoints()
            .iter()
            .map(|&wl| Self::at_wavelength(wl, t))
            .collect()
    }
}

/// Quantum yield of O3 + hv → O(¹D) + O2.
pub fn o3_o1d_quantum_yield() -> QuantumYield {
    QuantumYield::custom(O3ToO1d)
}

/// Quantum yield of the complementary channel O3 + hv → O(³P) + O2.
pub fn o3_o3p_quantum_yield() -> QuantumYield {
    QuantumYield::complement("O3->O(3P)+O2", o3_o1d_quantum_yield())
}
