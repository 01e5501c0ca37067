//! 1-D grids of discrete cells with edges.
//!
//! A [`Grid`] represents the discretisation used for wavelength, altitude, or
//! any other coordinate. It stores cell edges and derives midpoints and cell
//! widths (deltas). For a grid with `n_cells` cells there are `n_cells + 1`
//! edges, `n_cells` midpoints, and `n_cells` deltas.
//!
//! Grids may be ascending or descending. A [`MutableGrid`] additionally allows
//! edge values to be updated after construction, with an explicit
//! [`MutableGrid::update`] step to refresh the derived values.

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_finite, SkyradError, SkyradResult};
use crate::warehouse::Keyed;

/// Immutable identity of a grid: name, units, and cell count.
///
/// Grids are keyed in warehouses by `"name|units"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    pub name: String,
    pub units: String,
    pub n_cells: usize,
}

impl GridSpec {
    pub fn new(name: impl Into<String>, units: impl Into<String>, n_cells: usize) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            n_cells,
        }
    }

    /// Warehouse key: `"name|units"`.
    pub fn key(&self) -> String {
        format!("{}|{}", self.name, self.units)
    }
}

/// A 1-D grid of `n_cells` cells defined by `n_cells + 1` edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    spec: GridSpec,
    edges: Vec<f64>,
    midpoints: Vec<f64>,
    deltas: Vec<f64>,
}

impl Grid {
    /// Construct a grid from edge values.
    ///
    /// Fails with [`SkyradError::InvalidDimension`] if `edges.len()` is not
    /// `n_cells + 1` and with [`SkyradError::NumericInvalid`] if any edge is
    /// NaN or infinite.
    pub fn from_edges(spec: GridSpec, edges: Vec<f64>) -> SkyradResult<Self> {
        if edges.len() != spec.n_cells + 1 {
            return Err(SkyradError::dimension(
                format!("grid \"{}\" edges", spec.name),
                spec.n_cells + 1,
                edges.len(),
            ));
        }
        ensure_finite("grid edges", &edges)?;

        let (midpoints, deltas) = derive_midpoints_and_deltas(&edges);
        Ok(Self {
            spec,
            edges,
            midpoints,
            deltas,
        })
    }

    /// Create an equally spaced grid from `lower` to `upper`.
    pub fn equally_spaced(spec: GridSpec, lower: f64, upper: f64) -> SkyradResult<Self> {
        let edges = linspace(lower, upper, spec.n_cells + 1);
        Self::from_edges(spec, edges)
    }

    /// Create a logarithmically spaced grid from `lower` to `upper`.
    ///
    /// Fails with [`SkyradError::InvalidBounds`] unless both bounds are
    /// strictly positive.
    pub fn logarithmically_spaced(spec: GridSpec, lower: f64, upper: f64) -> SkyradResult<Self> {
        if lower <= 0.0 {
            return Err(SkyradError::bounds("logarithmic grid lower bound", lower));
        }
        if upper <= 0.0 {
            return Err(SkyradError::bounds("logarithmic grid upper bound", upper));
        }
        let edges = logspace(lower, upper, spec.n_cells + 1);
        Self::from_edges(spec, edges)
    }

    pub fn spec(&self) -> &GridSpec {
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

    /// Cell edge values (`n_cells + 1` elements).
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Cell midpoint values (`n_cells` elements).
    pub fn midpoints(&self) -> &[f64] {
        &self.midpoints
    }

    /// Cell widths (`n_cells` elements). Negative for descending grids.
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// First edge value.
    pub fn lower_bound(&self) -> f64 {
        self.edges[0]
    }

    /// Last edge value.
    pub fn upper_bound(&self) -> f64 {
        *self.edges.last().expect("grid has at least one edge")
    }

    /// Find the index of the cell containing `value`, or `None` if the value
    /// lies outside the grid.
    ///
    /// The cell at index `i` spans the half-open interval between edges `i`
    /// and `i + 1`. A value equal to an interior edge belongs to the upper of
    /// the two touching cells; a value at the grid's upper boundary belongs to
    /// the last cell. Both ascending and descending edge orderings are
    /// supported.
    pub fn find_cell(&self, value: f64) -> Option<usize> {
        find_cell_in_edges(&self.edges, self.spec.n_cells, value)
    }
}

impl Keyed for Grid {
    const KIND: &'static str = "grid";

    fn key(&self) -> String {
        self.spec.key()
    }
}

/// A 1-D grid whose edges can be updated after construction.
///
/// After modifying edges through [`MutableGrid::edges_mut`] or
/// [`MutableGrid::set_edge`], call [`MutableGrid::update`] to refresh the
/// derived midpoints and deltas. [`MutableGrid::set_edges`] refreshes
/// immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutableGrid {
    spec: GridSpec,
    edges: Vec<f64>,
    midpoints: Vec<f64>,
    deltas: Vec<f64>,
}

impl MutableGrid {
    /// Construct a mutable grid from edge values.
    pub fn from_edges(spec: GridSpec, edges: Vec<f64>) -> SkyradResult<Self> {
        let grid = Grid::from_edges(spec, edges)?;
        Ok(Self::from(grid))
    }

    pub fn spec(&self) -> &GridSpec {
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

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn midpoints(&self) -> &[f64] {
        &self.midpoints
    }

    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// Mutable access to edge values.
    ///
    /// Call [`MutableGrid::update`] afterwards to refresh derived values.
    pub fn edges_mut(&mut self) -> &mut [f64] {
        &mut self.edges
    }

    /// Replace all edge values and refresh derived values.
    pub fn set_edges(&mut self, new_edges: &[f64]) -> SkyradResult<()> {
        if new_edges.len() != self.edges.len() {
            return Err(SkyradError::dimension(
                format!("grid \"{}\" edges", self.spec.name),
                self.edges.len(),
                new_edges.len(),
            ));
        }
        ensure_finite("grid edges", new_edges)?;
        self.edges.copy_from_slice(new_edges);
        self.update();
        Ok(())
    }

    /// Set a single edge value without refreshing derived values.
    pub fn set_edge(&mut self, index: usize, value: f64) -> SkyradResult<()> {
        if index >= self.edges.len() {
            return Err(SkyradError::dimension(
                format!("grid \"{}\" edge index", self.spec.name),
                self.edges.len(),
                index,
            ));
        }
        self.edges[index] = value;
        Ok(())
    }

    /// Refresh midpoints and deltas after edge modifications.
    pub fn update(&mut self) {
        let (midpoints, deltas) = derive_midpoints_and_deltas(&self.edges);
        self.midpoints = midpoints;
        self.deltas = deltas;
    }

    /// Find the cell containing `value`; same convention as [`Grid::find_cell`].
    pub fn find_cell(&self, value: f64) -> Option<usize> {
        find_cell_in_edges(&self.edges, self.spec.n_cells, value)
    }

    /// Convert into an immutable [`Grid`] snapshot.
    pub fn to_grid(&self) -> Grid {
        Grid::from_edges(self.spec.clone(), self.edges.clone())
            .expect("mutable grid holds validated edges")
    }
}

impl From<Grid> for MutableGrid {
    fn from(grid: Grid) -> Self {
        Self {
            spec: grid.spec,
            edges: grid.edges,
            midpoints: grid.midpoints,
            deltas: grid.deltas,
        }
    }
}

fn derive_midpoints_and_deltas(edges: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n_cells = edges.len().saturating_sub(1);
    let mut midpoints = Vec::with_capacity(n_cells);
    let mut deltas = Vec::with_capacity(n_cells);
    for i in 0..n_cells {
        midpoints.push((edges[i] + edges[i + 1]) / 2.0);
        deltas.push(edges[i + 1] - edges[i]);
    }
    (midpoints, deltas)
}

fn find_cell_in_edges(edges: &[f64], n_cells: usize, value: f64) -> Option<usize> {
    if n_cells == 0 {
        return None;
    }

    let ascending = edges[0] <= edges[n_cells];
    if ascending {
        if value < edges[0] || value > edges[n_cells] {
            return None;
        }
        // Binary search for the first edge strictly greater than the value;
        // the cell below that edge contains it.
        let upper = edges.partition_point(|&e| e <= value);
        if upper == 0 {
            return Some(0);
        }
        Some((upper - 1).min(n_cells - 1))
    } else {
        if value > edges[0] || value < edges[n_cells] {
            return None;
        }
        let upper = edges.partition_point(|&e| e >= value);
        if upper == 0 {
            return Some(0);
        }
        Some((upper - 1).min(n_cells - 1))
    }
}

fn linspace(lower: f64, upper: f64, n_points: usize) -> Vec<f64> {
    if n_points == 0 {
        return vec![];
    }
    if n_points == 1 {
        return vec![lower];
    }
    let step = (upper - lower) / (n_points - 1) as f64;
    (0..n_points).map(|i| lower + step * i as f64).collect()
}

fn logspace(lower: f64, upper: f64, n_points: usize) -> Vec<f64> {
    linspace(lower.ln(), upper.ln(), n_points)
        .into_iter()
        .map(f64::exp)
        .collect()
}
