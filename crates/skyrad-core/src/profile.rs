//! Vertical atmospheric profiles defined on a 1-D grid.
//!
//! A [`Profile`] holds a field (temperature, number density, ...) at the
//! `n_cells` midpoints of a grid together with `n_cells + 1` edge values.
//! Edge values are reconstructed from midpoints by linear averaging in the
//! interior and linear extrapolation at the two ends.
//!
//! Profiles can compute, on demand and cached, layer-integrated densities
//! (midpoint × cell width) and the overhead column burden (cumulative sum from
//! the top of the atmosphere downward). A scale height carried in the
//! [`ProfileSpec`] supports exponential extrapolation above the grid top.

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_finite, SkyradError, SkyradResult};
use crate::grid::Grid;
use crate::warehouse::Keyed;

/// Default scale height used when none is specified [same units as the grid].
const DEFAULT_SCALE_HEIGHT: f64 = 8.0;

/// Immutable identity of a profile: name, units, cell count, and the scale
/// height used for extrapolation above the grid top.
///
/// Profiles are keyed in warehouses by `"name|units"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub name: String,
    pub units: String,
    pub n_cells: usize,
    pub scale_height: f64,
}

impl ProfileSpec {
    pub fn new(name: impl Into<String>, units: impl Into<String>, n_cells: usize) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            n_cells,
            scale_height: DEFAULT_SCALE_HEIGHT,
        }
    }

    pub fn with_scale_height(mut self, scale_height: f64) -> Self {
        self.scale_height = scale_height;
        self
    }

    /// Warehouse key: `"name|units"`.
    pub fn key(&self) -> String {
        format!("{}|{}", self.name, self.units)
    }
}

/// Atmospheric data on a vertical grid, held at midpoints and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    spec: ProfileSpec,
    mid_values: Vec<f64>,
    edge_values: Vec<f64>,
    layer_densities: Option<Vec<f64>>,
    burden: Option<Vec<f64>>,
}

impl Profile {
    /// Construct a profile from midpoint values; edge values are
    /// reconstructed by interior averaging and end extrapolation.
    pub fn from_midpoints(spec: ProfileSpec, mid_values: Vec<f64>) -> SkyradResult<Self> {
        if mid_values.len() != spec.n_cells {
            return Err(SkyradError::dimension(
                format!("profile \"{}\" midpoint values", spec.name),
                spec.n_cells,
                mid_values.len(),
            ));
        }
        ensure_finite("profile midpoint values", &mid_values)?;

        let edge_values = edges_from_midpoints(&mid_values);
        Ok(Self {
            spec,
            mid_values,
            edge_values,
            layer_densities: None,
            burden: None,
        })
    }

    /// Construct a profile from edge values; midpoints are their averages.
    pub fn from_edges(spec: ProfileSpec, edge_values: Vec<f64>) -> SkyradResult<Self> {
        if edge_values.len() != spec.n_cells + 1 {
            return Err(SkyradError::dimension(
                format!("profile \"{}\" edge values", spec.name),
                spec.n_cells + 1,
                edge_values.len(),
            ));
        }
        ensure_finite("profile edge values", &edge_values)?;

        let mid_values = (0..spec.n_cells)
            .map(|i| (edge_values[i] + edge_values[i + 1]) / 2.0)
            .collect();
        Ok(Self {
            spec,
            mid_values,
            edge_values,
            layer_densities: None,
            burden: None,
        })
    }

    pub fn spec(&self) -> &ProfileSpec {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn units(&self) -> &str {
        &self.spec.units
    }

    pub fn n_cells(&self) -> usize {
        self.spec.n_cells
    }

    pub fn scale_height(&self) -> f64 {
        self.spec.scale_height
    }

    /// Values at cell midpoints (`n_cells` elements).
    pub fn mid_values(&self) -> &[f64] {
        &self.mid_values
    }

    /// Values at cell edges (`n_cells + 1` elements).
    pub fn edge_values(&self) -> &[f64] {
        &self.edge_values
    }

    /// Whether layer densities have been computed.
    pub fn has_layer_densities(&self) -> bool {
        self.layer_densities.is_some()
    }

    /// Whether the overhead burden has been computed.
    pub fn has_burden(&self) -> bool {
        self.burden.is_some()
    }

    /// Layer-integrated densities, if computed.
    pub fn layer_densities(&self) -> Option<&[f64]> {
        self.layer_densities.as_deref()
    }

    /// Overhead column burden at each edge, if computed.
    ///
    /// `burden[n_cells] = 0` (nothing above the top);
    /// `burden[i] = burden[i + 1] + layer_density[i]`.
    pub fn burden(&self) -> Option<&[f64]> {
        self.burden.as_deref()
    }

    /// Compute and cache layer-integrated densities `mid[i] · Δ[i]`.
    ///
    /// For a number density in molecules/cm³ on a grid with deltas in cm,
    /// this yields the column density of each layer in molecules/cm².
    pub fn calculate_layer_densities(&mut self, grid: &Grid) -> SkyradResult<&[f64]> {
        if grid.n_cells() != self.spec.n_cells {
            return Err(SkyradError::dimension(
                format!("grid for profile \"{}\"", self.spec.name),
                self.spec.n_cells,
                grid.n_cells(),
            ));
        }

        let deltas = grid.deltas();
        let layers: Vec<f64> = (0..self.spec.n_cells)
            .map(|i| self.mid_values[i] * deltas[i])
            .collect();
        self.layer_densities = Some(layers);
        Ok(self.layer_densities.as_deref().expect("just set"))
    }

    /// Compute and cache the overhead burden, integrating from the top of the
    /// atmosphere downward. Computes layer densities first if needed.
    pub fn calculate_burden(&mut self, grid: &Grid) -> SkyradResult<&[f64]> {
        if !self.has_layer_densities() {
            self.calculate_layer_densities(grid)?;
        }
        let layers = self.layer_densities.as_deref().expect("just computed");

        let n = self.spec.n_cells;
        let mut burden = vec![0.0; n + 1];
        for i in (0..n).rev() {
            burden[i] = burden[i + 1] + layers[i];
        }
        self.burden = Some(burden);
        Ok(self.burden.as_deref().expect("just set"))
    }

    /// Exponentially extrapolated value above the top of the grid:
    /// `value_top · exp(−(z − z_top) / H)`.
    ///
    /// For `z ≤ z_top` the top value is returned unchanged.
    pub fn extrapolate_above(&self, altitude: f64, grid_top_altitude: f64) -> f64 {
        let Some(&value_top) = self.mid_values.last() else {
            return 0.0;
        };
        let dz = altitude - grid_top_altitude;
        if dz <= 0.0 {
            return value_top;
        }
        value_top * (-dz / self.spec.scale_height).exp()
    }
}

impl Keyed for Profile {
    const KIND: &'static str = "profile";

    fn key(&self) -> String {
        self.spec.key()
    }
}

/// A profile whose values can be updated by the host after construction.
///
/// Modifying midpoints or edges invalidates the cached layer densities and
/// burden. Bulk setters refresh the complementary representation immediately;
/// single-value setters require an explicit [`MutableProfile::update`] /
/// [`MutableProfile::update_from_edges`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutableProfile {
    inner: Profile,
}

impl MutableProfile {
    pub fn from_midpoints(spec: ProfileSpec, mid_values: Vec<f64>) -> SkyradResult<Self> {
        Ok(Self {
            inner: Profile::from_midpoints(spec, mid_values)?,
        })
    }

    pub fn from_edges(spec: ProfileSpec, edge_values: Vec<f64>) -> SkyradResult<Self> {
        Ok(Self {
            inner: Profile::from_edges(spec, edge_values)?,
        })
    }

    pub fn spec(&self) -> &ProfileSpec {
        self.inner.spec()
    }

    pub fn mid_values(&self) -> &[f64] {
        self.inner.mid_values()
    }

    pub fn edge_values(&self) -> &[f64] {
        self.inner.edge_values()
    }

    /// Mutable access to midpoint values.
    ///
    /// Call [`MutableProfile::update`] afterwards to rebuild edge values.
    pub fn mid_values_mut(&mut self) -> &mut [f64] {
        &mut self.inner.mid_values
    }

    /// Replace all midpoint values and rebuild edge values.
    pub fn set_mid_values(&mut self, values: &[f64]) -> SkyradResult<()> {
        if values.len() != self.inner.mid_values.len() {
            return Err(SkyradError::dimension(
                format!("profile \"{}\" midpoint values", self.inner.spec.name),
                self.inner.mid_values.len(),
                values.len(),
            ));
        }
        ensure_finite("profile midpoint values", values)?;
        self.inner.mid_values.copy_from_slice(values);
        self.update();
        Ok(())
    }

    /// Rebuild edge values from midpoints and drop cached derived values.
    pub fn update(&mut self) {
        self.inner.edge_values = edges_from_midpoints(&self.inner.mid_values);
        self.invalidate();
    }

    /// Rebuild midpoint values from edges and drop cached derived values.
    pub fn update_from_edges(&mut self) {
        let n = self.inner.spec.n_cells;
        self.inner.mid_values = (0..n)
            .map(|i| (self.inner.edge_values[i] + self.inner.edge_values[i + 1]) / 2.0)
            .collect();
        self.invalidate();
    }

    /// Mutable access to edge values.
    ///
    /// Call [`MutableProfile::update_from_edges`] afterwards.
    pub fn edge_values_mut(&mut self) -> &mut [f64] {
        &mut self.inner.edge_values
    }

    /// Snapshot as an immutable [`Profile`].
    pub fn to_profile(&self) -> Profile {
        let mut profile = self.inner.clone();
        profile.layer_densities = None;
        profile.burden = None;
        profile
    }

    fn invalidate(&mut self) {
        self.inner.layer_densities = None;
        self.inner.burden = None;
    }
}

impl From<Profile> for MutableProfile {
    fn from(inner: Profile) -> Self {
        Self { inner }
    }
}

/// Edge reconstruction: interior edges are midpoint averages, the two end
/// edges are linear extrapolations (`edge₀ = 1.5·m₀ − 0.5·m₁`).
fn edges_from_midpoints(mid_values: &[f64]) -> Vec<f64> {
    let n = mid_values.len();
    match n {
        0 => vec![0.0],
        1 => vec![mid_values[0], mid_values[0]],
        _ => {
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(1.5 * mid_values[0] - 0.5 * mid_values[1]);
            for i in 0..n - 1 {
                edges.push((mid_values[i] + mid_values[i + 1]) / 2.0);
            }
            edges.push(1.5 * mid_values[n - 1] - 0.5 * mid_values[n - 2]);
            edges
        }
    }
}
