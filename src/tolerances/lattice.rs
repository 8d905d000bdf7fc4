// SPDX-License-Identifier: AGPL-3.0-only

//! Gauge-field tolerances and reference values.

// ═══════════════════════════════════════════════════════════════════
// Exact-arithmetic checks
// ═══════════════════════════════════════════════════════════════════

/// Cold plaquette: absolute error (should be exactly 1.0 for unit links).
///
/// On a cold-start lattice the plaquette trace is exactly `N_c`.
/// Machine-precision rounding gives ~1e-15 residual.
pub const LATTICE_COLD_PLAQUETTE_ABS: f64 = 1e-12;

/// Cold Wilson action: absolute error (should be exactly 0.0).
pub const LATTICE_COLD_ACTION_ABS: f64 = 1e-10;

/// Distance of `|det U|` from 1 after products, heatbath draws or
/// re-projection.
///
/// Each SU(2) product loses ~1 ulp of unitarity; tens of chained products
/// stay far below 1e-12.
pub const GROUP_MANIFOLD_ABS: f64 = 1e-12;

/// `Re Tr(U K)` before and after one overrelaxation step.
///
/// The reflection is exact; the residual comes from re-projection and the
/// three products, ~1e-15 for `|K| = O(10)`.
pub const OVERRELAX_ACTION_ABS: f64 = 1e-12;

/// Relative change of the total plaquette sum over one overrelaxation
/// sweep.
pub const OVERRELAX_ACTION_REL: f64 = 1e-10;

/// Observables before and after a random gauge transformation.
///
/// Transformed links are re-projected, so invariance holds to rounding of
/// a few products per plaquette.
pub const GAUGE_INVARIANCE_ABS: f64 = 1e-10;

// ═══════════════════════════════════════════════════════════════════
// Reference configuration: U(1), 4^4, six non-trivial links
// ═══════════════════════════════════════════════════════════════════

/// Clover topological charge of the reference U(1) configuration.
///
/// Phases `π/2` on `U_1, U_2` at `(1,1,1,1)`, `π` on `U_0(0,1,1,1)`,
/// `π/2` on `U_1(1,0,1,1)`, `π` on `U_2(1,1,0,0)`, `π/2` on
/// `U_3(1,1,1,0)`, all others identity.
pub const TOPOLOGICAL_CHARGE_REFERENCE: f64 = 0.012_665_147_955_292_222;

/// Absolute tolerance on [`TOPOLOGICAL_CHARGE_REFERENCE`].
pub const TOPOLOGICAL_CHARGE_REFERENCE_ABS: f64 = 1e-5;

/// Clover energy density of the same configuration (exact binary value).
pub const ENERGY_DENSITY_REFERENCE: f64 = 0.021_972_656_25;

/// Absolute tolerance on [`ENERGY_DENSITY_REFERENCE`].
pub const ENERGY_DENSITY_REFERENCE_ABS: f64 = 1e-12;

// ═══════════════════════════════════════════════════════════════════
// Monte Carlo sanity bounds
// ═══════════════════════════════════════════════════════════════════

/// Metropolis acceptance lower bound for `delta ≤ 0.5` near equilibrium.
///
/// Zero acceptance indicates a wrong sign in `ΔS` or a broken proposal.
pub const METROPOLIS_ACCEPTANCE_MIN: f64 = 0.10;

/// Metropolis acceptance upper bound: 100% means proposals never change
/// the action.
pub const METROPOLIS_ACCEPTANCE_MAX: f64 = 0.99;

/// Weak-coupling plaquette lower bound.
///
/// At `β = 8` SU(2) has `⟨P⟩ ≈ 1 − 3/(4β) ≈ 0.91`; at `β = 4` U(1) in 4D
/// has `⟨P⟩ ≈ 1 − 1/(4β) ≈ 0.94`.
pub const WEAK_COUPLING_PLAQ_MIN: f64 = 0.80;

/// U(1) strong-coupling plaquette upper bound.
///
/// At `β = 0.5`, `⟨P⟩ ≈ I_1(β)/I_0(β) ≈ 0.24` to leading order.
pub const U1_STRONG_COUPLING_PLAQ_MAX: f64 = 0.40;
