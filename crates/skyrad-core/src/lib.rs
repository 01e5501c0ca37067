//! Core of a 1-D atmospheric radiative-transfer and photolysis-rate engine
//! for the UV/visible spectrum.
//!
//! Given a vertical atmosphere (temperature, pressure, air-density, and
//! absorber profiles), a wavelength grid, solar geometry, and a set of
//! molecular absorbers and scatterers, the engine computes direct and
//! diffuse spectral irradiance and actinic flux at every altitude level, and
//! integrates these with cross-sections and quantum yields to produce
//! photolysis rate coefficients J(z).
//!
//! The pipeline, leaves first:
//!
//! 1. [`grid`] and [`profile`] discretise the atmosphere;
//! 2. [`cross_section`] and [`quantum_yield`] describe the photochemistry of
//!    each species;
//! 3. [`radiator`] turns species into per-layer optical properties
//!    (τ, ω, g) and combines them;
//! 4. [`geometry`] supplies slant-path enhancement factors valid from
//!    overhead sun through twilight;
//! 5. [`solver`] runs the delta-Eddington two-stream transfer;
//! 6. [`photolysis`] integrates the resulting actinic flux into J values;
//! 7. [`model`] wires it all together.
//!
//! Default species data (US Standard Atmosphere, O3/O2 cross-sections,
//! reference solar spectra) live in the companion `skyrad-spectra` crate;
//! this crate consumes them through the interfaces defined here.

pub mod constants;
pub mod cross_section;
pub mod errors;
pub mod geometry;
pub mod grid;
pub mod interpolate;
pub mod model;
pub mod photolysis;
pub mod profile;
pub mod quantum_yield;
pub mod radiation;
pub mod radiator;
pub mod solar;
pub mod solver;
pub mod surface;
pub mod warehouse;

pub use errors::{SkyradError, SkyradResult};
pub use model::{Model, ModelConfig, ModelOutput};
