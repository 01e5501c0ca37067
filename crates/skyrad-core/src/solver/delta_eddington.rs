//! Delta-Eddington two-stream radiative transfer.
//!
//! Solves the transfer equation with a two-stream Eddington closure after
//! delta-M scaling of the optical properties. Delta-M absorbs the forward
//! diffraction peak of the phase function into the direct beam, which keeps
//! the two-stream closure accurate even for strongly forward-peaked aerosol
//! scattering.
//!
//! The diffuse coupling is a simplified single-scattering-plus-surface
//! treatment rather than a tridiagonal multi-layer system; for conservative
//! scattering (ω = 1) it conserves energy to about 10%. The level-resolved
//! direct beam is exact Beer–Lambert along the supplied slant paths.
//!
//! Based on:
//! - Joseph, Wiscombe & Weinman (1976), J. Atmos. Sci. 33, 2452–2459.
//! - Toon et al. (1989), J. Geophys. Res. 94, 16287–16301.

use rayon::prelude::*;

use crate::radiation::RadiationField;
use crate::solver::{Solver, SolverInput};

/// Layers thinner than this (after scaling) are treated as non-scattering.
const TAU_THRESHOLD: f64 = 1e-10;

/// Scattering albedos below this (after scaling) are treated as pure
/// absorption.
const OMEGA_THRESHOLD: f64 = 1e-10;

/// Floor applied to the two-stream denominator 1 − Γ²e⁻²λτ.
const DENOM_FLOOR: f64 = 1e-30;

/// Delta-Eddington two-stream solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaEddingtonSolver;

impl DeltaEddingtonSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for DeltaEddingtonSolver {
    fn name(&self) -> &str {
        "delta_eddington"
    }

    fn solve(&self, input: &SolverInput) -> RadiationField {
        let state = input.radiator_state;
        if state.is_empty() {
            return RadiationField::empty();
        }

        let n_layers = state.n_layers();
        let n_wavelengths = state.n_wavelengths();
        let n_levels = n_layers + 1;

        let mut field = RadiationField::new(n_levels, n_wavelengths);

        let mu0 = input.mu0();
        if mu0 <= 0.0 {
            // Night: the zero-initialised field
            return field;
        }

        // Slant enhancement factors, defaulting to plane-parallel 1/mu0
        let default_slant = vec![1.0 / mu0; n_layers];
        let slant: &[f64] = match input.slant_path {
            Some(path) => &path.enhancement_factor,
            None => &default_slant,
        };

        // Wavelengths are independent; solve them in parallel but collect in
        // order so accumulation stays bit-reproducible.
        let columns: Vec<ColumnSolution> = (0..n_wavelengths)
            .into_par_iter()
            .map(|j| {
                let tau: Vec<f64> = (0..n_layers).map(|i| state.get(i, j).0).collect();
                let omega: Vec<f64> = (0..n_layers).map(|i| state.get(i, j).1).collect();
                let g: Vec<f64> = (0..n_layers).map(|i| state.get(i, j).2).collect();

                let albedo = input
                    .surface_albedo
                    .and_then(|a| a.get(j).copied())
                    .unwrap_or(0.0);
                let flux_toa = input
                    .extraterrestrial_flux
                    .and_then(|f| f.get(j).copied())
                    .unwrap_or(1.0);

                solve_column(&tau, &omega, &g, mu0, albedo, flux_toa, slant)
            })
            .collect();

        for (j, column) in columns.iter().enumerate() {
            for i in 0..n_levels {
                field.set(
                    i,
                    j,
                    column.direct[i],
                    column.diffuse_up[i],
                    column.diffuse_down[i],
                    column.actinic_direct[i],
                    column.actinic_diffuse[i],
                );
            }
        }

        field
    }

    fn clone_box(&self) -> Box<dyn Solver> {
        Box::new(*self)
    }
}

/// Level-resolved solution for a single wavelength.
struct ColumnSolution {
    direct: Vec<f64>,
    diffuse_up: Vec<f64>,
    diffuse_down: Vec<f64>,
    actinic_direct: Vec<f64>,
    actinic_diffuse: Vec<f64>,
}

/// Reflectance, transmittance, and direct-beam source of a single layer.
#[derive(Debug, Clone, Copy)]
struct TwoStreamLayer {
    reflectance: f64,
    transmittance: f64,
    /// Direct-beam source term C₊ + C₋; diagnostic in the simplified
    /// coupling below.
    source: f64,
}

/// Delta-M scaling: remove the forward-scattering peak.
///
/// With f = g², the scaled properties are
/// τ̃ = τ(1 − ωf), ω̃ = ω(1 − f)/(1 − ωf), g̃ = (g − f)/(1 − f),
/// with ω̃ clamped to [0, 1] and g̃ to [−1, 1]. The fully degenerate corner
/// ωf = 1 (conservative, perfectly forward) scales to a transparent layer.
fn delta_scale(tau: f64, omega: f64, g: f64) -> (f64, f64, f64) {
    let f = g * g;
    let scale = 1.0 - omega * f;

    let tau_scaled = tau * scale;
    let omega_scaled = if scale > 0.0 {
        (omega * (1.0 - f) / scale).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let g_scaled = if f < 1.0 {
        ((g - f) / (1.0 - f)).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    (tau_scaled, omega_scaled, g_scaled)
}

/// Eddington two-stream properties of one layer.
fn two_stream_layer(tau: f64, omega: f64, g: f64, mu0: f64) -> TwoStreamLayer {
    if tau < TAU_THRESHOLD || omega < OMEGA_THRESHOLD {
        // Negligible optical depth or pure absorption
        return TwoStreamLayer {
            reflectance: 0.0,
            transmittance: (-tau / mu0).exp(),
            source: 0.0,
        };
    }

    let gamma_1 = (7.0 - omega * (4.0 + 3.0 * g)) / 4.0;
    let gamma_2 = -(1.0 - omega * (4.0 - 3.0 * g)) / 4.0;
    let gamma_3 = (2.0 - 3.0 * g * mu0) / 4.0;
    let gamma_4 = 1.0 - gamma_3;

    // gamma_1² − gamma_2² = 2(1 − ω)·1.5(1 − ωg) ≥ 0 for physical inputs
    let lambda = (gamma_1 * gamma_1 - gamma_2 * gamma_2).max(0.0).sqrt();
    let big_gamma = gamma_2 / (gamma_1 + lambda);

    let e_minus = (-lambda * tau).exp();
    let mut denom = 1.0 - big_gamma * big_gamma * e_minus * e_minus;
    if denom.abs() < DENOM_FLOOR {
        denom = DENOM_FLOOR;
    }

    let reflectance = big_gamma * (1.0 - e_minus * e_minus) / denom;
    let transmittance = (1.0 - big_gamma * big_gamma) * e_minus / denom;

    // Direct-beam source coefficients; guard the λ = 1/μ₀ resonance
    let mut source_denom = lambda * lambda - 1.0 / (mu0 * mu0);
    if source_denom.abs() < DENOM_FLOOR {
        source_denom = DENOM_FLOOR;
    }
    let c_plus = omega * ((gamma_1 - 1.0 / mu0) * gamma_3 + gamma_4 * gamma_2) / source_denom;
    let c_minus = omega * ((gamma_1 + 1.0 / mu0) * gamma_4 + gamma_3 * gamma_2) / source_denom;

    TwoStreamLayer {
        reflectance,
        transmittance,
        source: c_plus + c_minus,
    }
}

/// Solve one wavelength column.
///
/// Levels are indexed 0 (surface) to `n_layers` (TOA), with layer `i` between
/// levels `i` and `i + 1`.
fn solve_column(
    tau: &[f64],
    omega: &[f64],
    g: &[f64],
    mu0: f64,
    albedo: f64,
    flux_toa: f64,
    slant: &[f64],
) -> ColumnSolution {
    let n_layers = tau.len();
    let n_levels = n_layers + 1;

    let mut direct = vec![0.0; n_levels];
    let mut diffuse_up = vec![0.0; n_levels];
    let mut diffuse_down = vec![0.0; n_levels];
    let mut actinic_direct = vec![0.0; n_levels];
    let mut actinic_diffuse = vec![0.0; n_levels];

    // Direct beam: Beer-Lambert along the slant path, TOA downward
    direct[n_layers] = flux_toa * mu0;
    actinic_direct[n_layers] = flux_toa;
    for i in (0..n_layers).rev() {
        let (tau_s, _, _) = delta_scale(tau[i], omega[i], g[i]);
        let transmission = (-tau_s * slant[i]).exp();
        direct[i] = direct[i + 1] * transmission;
        actinic_direct[i] = actinic_direct[i + 1] * transmission;
    }

    // Per-layer two-stream properties
    let layers: Vec<TwoStreamLayer> = (0..n_layers)
        .map(|i| {
            let (tau_s, omega_s, g_s) = delta_scale(tau[i], omega[i], g[i]);
            two_stream_layer(tau_s, omega_s, g_s, mu0)
        })
        .collect();

    // Surface reflection of the direct beam
    diffuse_up[0] = albedo * (direct[0] + diffuse_down[0]);

    // Propagate the upwelling stream through the layer stack
    for i in 0..n_layers {
        diffuse_up[i + 1] =
            diffuse_up[i] * layers[i].transmittance + layers[i].reflectance * diffuse_down[i + 1];
    }

    // Single-scattering source of the direct beam, split between the
    // downward and upward streams by the asymmetry factor
    for i in 0..n_layers {
        let (tau_s, omega_s, g_s) = delta_scale(tau[i], omega[i], g[i]);
        let direct_avg = 0.5 * (direct[i] + direct[i + 1]) / mu0;
        let scatter_source = omega_s * direct_avg * tau_s;
        diffuse_down[i] += 0.5 * scatter_source * (1.0 - g_s);
        diffuse_up[i + 1] += 0.5 * scatter_source * (1.0 + g_s);
    }

    // Recompute the surface upwelling with the now-populated diffuse_down
    diffuse_up[0] = albedo * (direct[0] / mu0 + diffuse_down[0]);

    // Diffuse actinic flux under the isotropic approximation
    for i in 0..n_levels {
        actinic_diffuse[i] = 2.0 * (diffuse_up[i] + diffuse_down[i]);
    }

    ColumnSolution {
        direct,
        diffuse_up,
        diffuse_down,
        actinic_direct,
        actinic_diffuse,
    }
}
