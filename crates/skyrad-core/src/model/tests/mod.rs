
use crate::cross_section::{CrossSection, TabulatedCrossSection};
use crate::model::{Model, ModelConfig};
use crate::quantum_yield::QuantumYield;
use crate::radiator::AbsorberRadiator;

/// A wavelength-flat cross-section spanning the whole UV/visible range.
pub(crate) fn flat_cross_section(name: &str, sigma: f64) -> CrossSection {
    TabulatedCrossSection::new(name, vec![100.0, 1000.0], vec![sigma, sigma])
        .unwrap()
        .into()
}

/// A unit quantum yield.
pub(crate) fn unit_yield(name: &str) -> QuantumYield {
    QuantumYield::constant(name, 1.0).unwrap()
}

/// Single-layer, single-wavelength model with a flat absorber tuned to a
/// total optical depth of `tau`, plane-parallel geometry, black surface.
pub(crate) fn single_layer_model(tau: f64, n_layers: usize) -> Model {
    // τ = σ · n · Δz · 1e5 with σ = 1e-19 cm², Δz in km
    let layer_km = 1.0;
    let sigma = 1.0e-19;
    let density = tau / (sigma * layer_km * 1.0e5 * n_layers as f64);

    let config = ModelConfig {
        wavelength_edges: vec![300.0, 310.0],
        altitude_edges: (0..=n_layers).map(|i| i as f64 * layer_km).collect(),
        temperature_profile: vec![288.0; n_layers],
        surface_albedo: 0.0,
        use_spherical_geometry: false,
        ..ModelConfig::default()
    };

    let mut model = Model::new(config).unwrap();
    model.set_air_density_profile(vec![density; n_layers]);
    model
        .add_radiator(AbsorberRadiator::new(
            "absorber",
            flat_cross_section("absorber", sigma),
            "air_density",
        ))
        .unwrap();
    model
}
