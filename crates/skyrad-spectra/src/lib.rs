//! Default atmospheric and spectral data for the `skyrad-core` engine.
//!
//! The core deliberately ships no hard-coded species data; this crate
//! provides the standard set needed for a working UV model:
//!
//! - [`standard_atmosphere`]: US Standard Atmosphere 1976 profiles and a
//!   Dobson-scaled climatological ozone layer;
//! - [`o3`] and [`o2`]: absorption cross-sections and the O3 quantum yields;
//! - [`solar_spectrum`]: the ASTM E-490 reference spectrum in photon units;
//! - [`surface_types`]: representative surface albedos.
//!
//! A minimal ozone photolysis model:
//!
//! ```
//! use skyrad_core::model::{Model, ModelConfig};
//! use skyrad_core::photolysis::PhotolysisReaction;
//! use skyrad_core::radiator::{AbsorberRadiator, RayleighRadiator};
//! use skyrad_spectra::{o3, solar_spectrum, standard_atmosphere};
//!
//! let config = ModelConfig {
//!     wavelength_min: 280.0,
//!     wavelength_max: 420.0,
//!     n_wavelength_bins: 50,
//!     solar_zenith_angle: 30.0,
//!     ..ModelConfig::default()
//! };
//! let mut model = Model::new(config).unwrap();
//!
//! let midpoints = model.altitude_grid().midpoints().to_vec();
//! let air = standard_atmosphere::air_density_profile(&midpoints);
//! let ozone = standard_atmosphere::ozone_profile(model.altitude_grid(), 300.0);
//! model.set_temperature_profile(standard_atmosphere::temperature_profile(&midpoints));
//! model.set_air_density_profile(air);
//! model.set_ozone_profile(ozone);
//! model.set_extraterrestrial_flux(solar_spectrum::astm_e490());
//!
//! model.add_radiator(AbsorberRadiator::new("O3", o3::o3_cross_section(), "O3")).unwrap();
//! model.add_radiator(RayleighRadiator::new()).unwrap();
//! model.add_reaction(PhotolysisReaction::new(
//!     "O3 -> O2 + O(1D)",
//!     o3::o3_cross_section(),
//!     o3::o3_o1d_quantum_yield(),
//! ));
//!
//! let output = model.calculate().unwrap();
//! assert!(output.surface_photolysis_rate("O3 -> O2 + O(1D)").unwrap() > 0.0);
//! ```

pub mod o2;
pub mod o3;
pub mod solar_spectrum;
pub mod standard_atmosphere;
pub mod surface_types;
