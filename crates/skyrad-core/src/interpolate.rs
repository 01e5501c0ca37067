//! Regridding of tabulated data.
//!
//! Two interpolators cover the needs of the engine:
//!
//! - [`LinearInterpolator`]: point-to-point linear interpolation with clamping
//!   at the source bounds (no extrapolation). Used for cross-sections, quantum
//!   yields, albedo spectra, and the extraterrestrial flux.
//! - [`ConservingInterpolator`]: area-preserving bin-to-bin resampling. Used
//!   where the integrated quantity must survive a change of grid, e.g. when
//!   rebinning spectral fluxes.

/// Point-to-point linear interpolation.
///
/// For each target x-coordinate the bracketing source interval is located by
/// binary search and the y-value interpolated linearly. Targets at or below
/// the first source point return the first y-value; targets at or above the
/// last source point return the last y-value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    pub fn new() -> Self {
        Self
    }

    /// Interpolate `source_y` (tabulated at ascending `source_x`) onto
    /// `target_x`.
    ///
    /// Empty or size-mismatched source arrays yield a zero vector of target
    /// length.
    pub fn interpolate(&self, target_x: &[f64], source_x: &[f64], source_y: &[f64]) -> Vec<f64> {
        if source_x.is_empty() || source_y.is_empty() || source_x.len() != source_y.len() {
            return vec![0.0; target_x.len()];
        }

        target_x
            .iter()
            .map(|&x| self.interpolate_one(x, source_x, source_y))
            .collect()
    }

    /// Interpolate a single point.
    pub fn interpolate_one(&self, x: f64, source_x: &[f64], source_y: &[f64]) -> f64 {
        let first = source_x[0];
        let last = source_x[source_x.len() - 1];
        if x <= first {
            return source_y[0];
        }
        if x >= last {
            return source_y[source_y.len() - 1];
        }

        let upper = source_x.partition_point(|&sx| sx <= x);
        let lower = upper - 1;

        let x0 = source_x[lower];
        let x1 = source_x[upper];
        let y0 = source_y[lower];
        let y1 = source_y[upper];

        let t = (x - x0) / (x1 - x0);
        y0 + t * (y1 - y0)
    }

    /// Whether the interpolator extrapolates beyond the source range.
    pub fn can_extrapolate(&self) -> bool {
        false
    }
}

/// Area-preserving bin-to-bin interpolation.
///
/// Source data are `n_src` bin values between `n_src + 1` sorted edges. For
/// each target bin the overlapping source areas are accumulated and divided by
/// the target bin width, so that `Σ result[i]·Δtarget[i]` equals
/// `Σ source[j]·Δsource[j]` over the intersection of the two ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConservingInterpolator;

impl ConservingInterpolator {
    pub fn new() -> Self {
        Self
    }

    /// Resample `source_values` from `source_edges` bins onto `target_edges`
    /// bins.
    ///
    /// Target bins outside the source range, and zero-width target bins,
    /// yield 0. Invalid source data (fewer than two edges, or a value count
    /// not matching the edge count) yield a zero vector.
    pub fn interpolate(
        &self,
        target_edges: &[f64],
        source_edges: &[f64],
        source_values: &[f64],
    ) -> Vec<f64> {
        if target_edges.len() < 2 {
            return vec![];
        }
        let n_target = target_edges.len() - 1;

        if source_edges.len() < 2 || source_values.len() != source_edges.len() - 1 {
            return vec![0.0; n_target];
        }

        let mut result = Vec::with_capacity(n_target);
        for i in 0..n_target {
            let target_lo = target_edges[i];
            let target_hi = target_edges[i + 1];
            let width = target_hi - target_lo;
            if width <= 0.0 {
                result.push(0.0);
                continue;
            }

            let mut area = 0.0;
            for (j, &value) in source_values.iter().enumerate() {
                let overlap_lo = target_lo.max(source_edges[j]);
                let overlap_hi = target_hi.min(source_edges[j + 1]);
                let overlap = overlap_hi - overlap_lo;
                if overlap > 0.0 {
                    area += value * overlap;
                }
            }
            result.push(area / width);
        }
        result
    }

    /// Whether the interpolator extrapolates beyond the source range.
    pub fn can_extrapolate(&self) -> bool {
        false
    }
}
