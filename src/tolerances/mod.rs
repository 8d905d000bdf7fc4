// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized validation tolerances with physical justification.
//!
//! Every tolerance threshold used by tests and validation binaries is
//! defined here with its origin. No ad-hoc magic numbers.
//!
//! # Tolerance categories
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64 | 1e-12 for group closure |
//! | Reference values | Hand-checked configurations | topological charge 0.0126651 |
//! | Statistical | Monte Carlo error at fixed statistics | acceptance bounds |

/// Machine-precision tolerances.
pub mod core;
/// Gauge-field tolerances and reference values.
pub mod lattice;

pub use self::core::{EXACT_F64, NEAR_ZERO_EXPECTED};

pub use self::lattice::{
    ENERGY_DENSITY_REFERENCE, ENERGY_DENSITY_REFERENCE_ABS, GAUGE_INVARIANCE_ABS,
    GROUP_MANIFOLD_ABS, LATTICE_COLD_ACTION_ABS, LATTICE_COLD_PLAQUETTE_ABS,
    METROPOLIS_ACCEPTANCE_MAX, METROPOLIS_ACCEPTANCE_MIN, OVERRELAX_ACTION_ABS,
    OVERRELAX_ACTION_REL, TOPOLOGICAL_CHARGE_REFERENCE, TOPOLOGICAL_CHARGE_REFERENCE_ABS,
    U1_STRONG_COUPLING_PLAQ_MAX, WEAK_COUPLING_PLAQ_MIN,
};
