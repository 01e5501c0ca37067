//! Molecular oxygen absorption.
//!
//! Representative O2 cross-sections after JPL Publication 19-5 covering the
//! Schumann–Runge continuum (130–175 nm), the Schumann–Runge bands
//! (175–205 nm, simplified to continuum values), and the Herzberg continuum
//! out to 245 nm. The weak temperature dependence of the Schumann–Runge
//! bands is neglected.

use skyrad_core::cross_section::{CrossSection, TabulatedCrossSection};

/// Reference wavelengths [nm].
const WAVELENGTHS: [f64; 20] = [
    130.0, 140.0, 150.0, 160.0, 170.0, 175.0, 180.0, 185.0, 190.0, 195.0, 200.0, 205.0, 210.0,
    215.0, 220.0, 225.0, 230.0, 235.0, 240.0, 245.0,
];

/// Cross-section values [cm²/molecule].
const CROSS_SECTIONS: [f64; 20] = [
    1.5e-17, 1.2e-17, 8.0e-18, 4.0e-18, 1.5e-18, 7.0e-19, 3.0e-19, 1.5e-19, 8.0e-20, 4.0e-20,
    1.5e-20, 5.0e-21, 1.5e-21, 7.0e-22, 3.0e-22, 1.0e-22, 5.0e-23, 2.0e-23, 1.0e-23, 5.0e-24,
];

/// O2 absorption cross-section (temperature independent).
pub fn o2_cross_section() -> CrossSection {
    TabulatedCrossSection::new("O2", WAVELENGTHS.to_vec(), CROSS_SECTIONS.to_vec())
        .expect("static O2 table is well-formed")
        .into()
}
