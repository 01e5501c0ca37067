//! Representative surface albedos.
//!
//! Convenience constructors for common surface types. Values are broadband
//! climatological estimates; spectral variants carry the qualitative shape
//! (snow bright in the UV/visible and darker in the near-IR, vegetation dark
//! in the visible with the red-edge jump).

use skyrad_core::errors::SkyradResult;
use skyrad_core::surface::SurfaceAlbedo;

/// Ocean surface; roughness (wind speed [m/s]) nudges the albedo upward.
pub fn ocean(wind_speed: f64) -> SkyradResult<SurfaceAlbedo> {
    let albedo = 0.03 + 0.007 * wind_speed.min(10.0);
    SurfaceAlbedo::uniform(albedo)
}

/// Fresh snow: very bright in the UV/visible, darker in the near-IR.
pub fn fresh_snow() -> SkyradResult<SurfaceAlbedo> {
    SurfaceAlbedo::spectral(
        vec![300.0, 400.0, 500.0, 600.0, 700.0, 800.0, 1000.0],
        vec![0.95, 0.95, 0.90, 0.85, 0.80, 0.70, 0.50],
    )
}

/// Desert sand: bright in the visible, dark in the UV.
pub fn desert() -> SkyradResult<SurfaceAlbedo> {
    SurfaceAlbedo::spectral(
        vec![300.0, 400.0, 500.0, 600.0, 700.0, 800.0],
        vec![0.10, 0.20, 0.30, 0.35, 0.40, 0.40],
    )
}

/// Grass/vegetation: chlorophyll absorption in the visible, red edge in the
/// near-IR.
pub fn vegetation() -> SkyradResult<SurfaceAlbedo> {
    SurfaceAlbedo::spectral(
        vec![300.0, 400.0, 500.0, 550.0, 600.0, 700.0, 800.0],
        vec![0.05, 0.05, 0.10, 0.15, 0.10, 0.30, 0.50],
    )
}

/// Forest canopy.
pub fn forest() -> SkyradResult<SurfaceAlbedo> {
    SurfaceAlbedo::spectral(
        vec![300.0, 400.0, 500.0, 600.0, 700.0, 800.0],
        vec![0.03, 0.03, 0.05, 0.05, 0.20, 0.40],
    )
}

/// Urban surfaces: a typical gray value.
pub fn urban() -> SkyradResult<SurfaceAlbedo> {
    SurfaceAlbedo::uniform(0.15)
}
