//! Level-resolved radiation quantities.

use ndarray::Array2;

use crate::errors::{SkyradError, SkyradResult};

/// Computed radiation quantities at all levels and wavelengths.
///
/// Five arrays of shape `[n_levels][n_wavelengths]`, where
/// `n_levels = n_layers + 1`, level 0 is the surface, and the last level is
/// the top of the atmosphere:
///
/// - direct (unscattered) spectral irradiance,
/// - diffuse upwelling irradiance,
/// - diffuse downwelling irradiance,
/// - direct actinic flux (`F_dir = E_dir / μ₀`),
/// - diffuse actinic flux.
///
/// Irradiance is flux through a horizontal surface; actinic flux is the
/// scalar photon flux from all directions, the quantity that drives
/// photolysis. Fields support scaling and accumulation for time or
/// zenith-angle integrations.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiationField {
    direct_irradiance: Array2<f64>,
    diffuse_up: Array2<f64>,
    diffuse_down: Array2<f64>,
    actinic_direct: Array2<f64>,
    actinic_diffuse: Array2<f64>,
}

impl RadiationField {
    /// Zero-initialised field for the given dimensions.
    pub fn new(n_levels: usize, n_wavelengths: usize) -> Self {
        Self {
            direct_irradiance: Array2::zeros((n_levels, n_wavelengths)),
            diffuse_up: Array2::zeros((n_levels, n_wavelengths)),
            diffuse_down: Array2::zeros((n_levels, n_wavelengths)),
            actinic_direct: Array2::zeros((n_levels, n_wavelengths)),
            actinic_diffuse: Array2::zeros((n_levels, n_wavelengths)),
        }
    }

    /// An empty (0 × 0) field.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn n_levels(&self) -> usize {
        self.direct_irradiance.nrows()
    }

    pub fn n_wavelengths(&self) -> usize {
        self.direct_irradiance.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.direct_irradiance.is_empty()
    }

    pub fn direct_irradiance(&self) -> &Array2<f64> {
        &self.direct_irradiance
    }

    pub fn diffuse_up(&self) -> &Array2<f64> {
        &self.diffuse_up
    }

    pub fn diffuse_down(&self) -> &Array2<f64> {
        &self.diffuse_down
    }

    pub fn actinic_direct(&self) -> &Array2<f64> {
        &self.actinic_direct
    }

    pub fn actinic_diffuse(&self) -> &Array2<f64> {
        &self.actinic_diffuse
    }

    /// Write all five quantities for one cell.
    #[allow(clippy::too_many_arguments)]
    pub fn set(
        &mut self,
        level: usize,
        wavelength: usize,
        direct: f64,
        diffuse_up: f64,
        diffuse_down: f64,
        actinic_direct: f64,
        actinic_diffuse: f64,
    ) {
        self.direct_irradiance[[level, wavelength]] = direct;
        self.diffuse_up[[level, wavelength]] = diffuse_up;
        self.diffuse_down[[level, wavelength]] = diffuse_down;
        self.actinic_direct[[level, wavelength]] = actinic_direct;
        self.actinic_diffuse[[level, wavelength]] = actinic_diffuse;
    }

    /// Total (direct + diffuse) actinic flux at one level.
    pub fn total_actinic_flux(&self, level: usize) -> Vec<f64> {
        if level >= self.n_levels() {
            return vec![];
        }
        (0..self.n_wavelengths())
            .map(|j| self.actinic_direct[[level, j]] + self.actinic_diffuse[[level, j]])
            .collect()
    }

    /// Total downwelling irradiance (direct + diffuse down) at one level.
    pub fn total_downwelling(&self, level: usize) -> Vec<f64> {
        if level >= self.n_levels() {
            return vec![];
        }
        (0..self.n_wavelengths())
            .map(|j| self.direct_irradiance[[level, j]] + self.diffuse_down[[level, j]])
            .collect()
    }

    /// Scale every quantity by `factor` (e.g. for time averaging).
    pub fn scale(&mut self, factor: f64) {
        for array in [
            &mut self.direct_irradiance,
            &mut self.diffuse_up,
            &mut self.diffuse_down,
            &mut self.actinic_direct,
            &mut self.actinic_diffuse,
        ] {
            array.mapv_inplace(|v| v * factor);
        }
    }

    /// Add another field cell-wise (e.g. for zenith-angle integrations).
    ///
    /// Accumulating an empty field is a no-op; accumulating into an empty
    /// field adopts `other`.
    pub fn accumulate(&mut self, other: &RadiationField) -> SkyradResult<()> {
        if other.is_empty() {
            return Ok(());
        }
        if self.is_empty() {
            *self = other.clone();
            return Ok(());
        }
        if self.n_levels() != other.n_levels() || self.n_wavelengths() != other.n_wavelengths() {
            return Err(SkyradError::dimension(
                "radiation field accumulation",
                self.n_levels() * self.n_wavelengths(),
                other.n_levels() * other.n_wavelengths(),
            ));
        }

        self.direct_irradiance += &other.direct_irradiance;
        self.diffuse_up += &other.diffuse_up;
        self.diffuse_down += &other.diffuse_down;
        self.actinic_direct += &other.actinic_direct;
        self.actinic_diffuse += &other.actinic_diffuse;
        Ok(())
    }

    /// Total actinic flux at the surface (level 0).
    pub fn surface_actinic_flux(&self) -> Vec<f64> {
        self.total_actinic_flux(0)
    }

    /// Global (direct + diffuse down) irradiance at the surface.
    pub fn surface_global_irradiance(&self) -> Vec<f64> {
        self.total_downwelling(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn sample_field() -> RadiationField {
        let mut field = RadiationField::new(2, 2);
        field.set(0, 0, 1.0, 0.1, 0.2, 2.0, 0.6);
        field.set(1, 1, 4.0, 0.0, 0.0, 8.0, 0.0);
        field
    }

    #[test]
    fn initialised_to_zeros() {
        let field = RadiationField::new(3, 4);
        assert_eq!(field.n_levels(), 3);
        assert_eq!(field.n_wavelengths(), 4);
        assert_eq!(field.direct_irradiance()[[2, 3]], 0.0);
        assert!(RadiationField::empty().is_empty());
    }

    #[test]
    fn total_actinic_is_direct_plus_diffuse() {
        let field = sample_field();
        let total = field.total_actinic_flux(0);
        assert!(is_close!(total[0], 2.6));
        assert!(is_close!(total[1], 0.0));
        assert!(field.total_actinic_flux(5).is_empty());
    }

    #[test]
    fn total_downwelling_excludes_upwelling() {
        let field = sample_field();
        let down = field.total_downwelling(0);
        assert!(is_close!(down[0], 1.2));
    }

    #[test]
    fn scaling_applies_to_all_arrays() {
        let mut field = sample_field();
        field.scale(0.5);
        assert!(is_close!(field.direct_irradiance()[[0, 0]], 0.5));
        assert!(is_close!(field.diffuse_up()[[0, 0]], 0.05));
        assert!(is_close!(field.actinic_diffuse()[[0, 0]], 0.3));
    }

    #[test]
    fn accumulation_adds_cell_wise() {
        let mut a = sample_field();
        let b = sample_field();
        a.accumulate(&b).unwrap();
        assert!(is_close!(a.direct_irradiance()[[0, 0]], 2.0));
        assert!(is_close!(a.actinic_direct()[[1, 1]], 16.0));
    }

    #[test]
    fn accumulation_into_empty_adopts() {
        let mut a = RadiationField::empty();
        let b = sample_field();
        a.accumulate(&b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn accumulation_shape_mismatch_is_rejected() {
        let mut a = RadiationField::new(2, 2);
        let b = RadiationField::new(3, 2);
        assert!(matches!(
            a.accumulate(&b),
            Err(SkyradError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn surface_accessors_read_level_zero() {
        let field = sample_field();
        assert_eq!(field.surface_actinic_flux(), field.total_actinic_flux(0));
        assert_eq!(
            field.surface_global_irradiance(),
            field.total_downwelling(0)
        );
    }
}
