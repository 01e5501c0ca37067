//! Surface reflectivity.

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_finite, SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::interpolate::LinearInterpolator;

/// Surface albedo, either gray (wavelength independent) or spectral.
///
/// Albedo couples the downwelling field back into the atmosphere as
/// upwelling diffuse radiation; over snow it can dominate the UV actinic
/// flux near the surface. Typical values range from 0.03 (calm ocean)
/// through 0.1–0.2 (vegetation, urban) to above 0.9 (fresh snow in the UV).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceAlbedo {
    /// The same albedo at every wavelength.
    Uniform(f64),
    /// Albedo tabulated against wavelength [nm]; evaluation clamps to the
    /// boundary values outside the tabulated range.
    Spectral {
        wavelengths: Vec<f64>,
        albedo: Vec<f64>,
    },
}

impl SurfaceAlbedo {
    /// A gray albedo, validated to lie in [0, 1].
    pub fn uniform(albedo: f64) -> SkyradResult<Self> {
        validate_albedo(albedo)?;
        Ok(SurfaceAlbedo::Uniform(albedo))
    }

    /// A spectral albedo from parallel wavelength/albedo tables.
    pub fn spectral(wavelengths: Vec<f64>, albedo: Vec<f64>) -> SkyradResult<Self> {
        if wavelengths.len() != albedo.len() {
            return Err(SkyradError::dimension(
                "surface albedo spectrum",
                wavelengths.len(),
                albedo.len(),
            ));
        }
        if wavelengths.len() < 2 {
            return Err(SkyradError::dimension(
                "surface albedo spectrum points",
                2,
                wavelengths.len(),
            ));
        }
        ensure_finite("surface albedo wavelengths", &wavelengths)?;
        ensure_finite("surface albedo values", &albedo)?;
        for &a in &albedo {
            validate_albedo(a)?;
        }
        Ok(SurfaceAlbedo::Spectral {
            wavelengths,
            albedo,
        })
    }

    /// Albedo at each midpoint of a wavelength grid, clamped to [0, 1].
    pub fn calculate(&self, wavelength_grid: &Grid) -> Vec<f64> {
        match self {
            SurfaceAlbedo::Uniform(a) => vec![*a; wavelength_grid.n_cells()],
            SurfaceAlbedo::Spectral {
                wavelengths,
                albedo,
            } => {
                let targets = wavelength_grid.midpoints();
                LinearInterpolator::new()
                    .interpolate(targets, wavelengths, albedo)
                    .into_iter()
                    .map(|a| a.clamp(0.0, 1.0))
                    .collect()
            }
        }
    }

    /// Albedo at a single wavelength [nm].
    pub fn at(&self, wavelength: f64) -> f64 {
        match self {
            SurfaceAlbedo::Uniform(a) => *a,
            SurfaceAlbedo::Spectral {
                wavelengths,
                albedo,
            } => LinearInterpolator::new()
                .interpolate_one(wavelength, wavelengths, albedo)
                .clamp(0.0, 1.0),
        }
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, SurfaceAlbedo::Uniform(_))
    }
}

fn validate_albedo(albedo: f64) -> SkyradResult<()> {
    if !(0.0..=1.0).contains(&albedo) {
        return Err(SkyradError::bounds("surface albedo", albedo));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;
    use is_close::is_close;

    fn grid() -> Grid {
        Grid::equally_spaced(GridSpec::new("wavelength", "nm", 4), 300.0, 700.0).unwrap()
    }

    #[test]
    fn uniform_albedo_fills_grid() {
        let albedo = SurfaceAlbedo::uniform(0.3).unwrap();
        assert_eq!(albedo.calculate(&grid()), vec![0.3; 4]);
        assert_eq!(albedo.at(550.0), 0.3);
        assert!(albedo.is_uniform());
    }

    #[test]
    fn albedo_outside_unit_interval_is_rejected() {
        assert!(matches!(
            SurfaceAlbedo::uniform(1.2),
            Err(SkyradError::InvalidBounds { .. })
        ));
        assert!(SurfaceAlbedo::uniform(-0.01).is_err());
        assert!(SurfaceAlbedo::spectral(vec![300.0, 400.0], vec![0.5, 1.3]).is_err());
    }

    #[test]
    fn spectral_albedo_interpolates() {
        let albedo =
            SurfaceAlbedo::spectral(vec![300.0, 700.0], vec![0.9, 0.5]).unwrap();
        // Grid midpoints at 350, 450, 550, 650 nm
        let values = albedo.calculate(&grid());
        assert!(is_close!(values[0], 0.85));
        assert!(is_close!(values[3], 0.55));
        assert!(!albedo.is_uniform());
    }

    #[test]
    fn spectral_albedo_clamps_outside_range() {
        let albedo =
            SurfaceAlbedo::spectral(vec![400.0, 500.0], vec![0.8, 0.6]).unwrap();
        assert!(is_close!(albedo.at(300.0), 0.8));
        assert!(is_close!(albedo.at(900.0), 0.6));
    }

    #[test]
    fn spectral_requires_two_points_and_matching_lengths() {
        assert!(SurfaceAlbedo::spectral(vec![400.0], vec![0.8]).is_err());
        assert!(SurfaceAlbedo::spectral(vec![400.0, 500.0], vec![0.8]).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let albedo =
            SurfaceAlbedo::spectral(vec![300.0, 700.0], vec![0.9, 0.5]).unwrap();
        let json = serde_json::to_string(&albedo).unwrap();
        let restored: SurfaceAlbedo = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, albedo);
    }
}
