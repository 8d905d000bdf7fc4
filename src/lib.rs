// SPDX-License-Identifier: AGPL-3.0-only

//! hotlattice: SU(2) and U(1) lattice gauge theory on the CPU.
//!
//! Link fields on periodic 2D, 3D and 4D lattices, sampled with
//! Metropolis, heatbath and overrelaxation sweeps that run in parallel
//! over alternating time slices.
//!
//! ## Modules
//!   - `lattice`: group elements, geometry, field storage, updates, observables
//!   - `config`: JSON simulation configuration
//!   - `production`: Markov-chain driver writing JSONL measurement records
//!   - `tolerances`: named numeric thresholds for tests and validation
//!   - `validation`: pass/fail harness for validation binaries
//!
//! ## Binaries
//!   - `validate_gauge_invariance`: cold start, gauge invariance,
//!     topological-charge reference, overrelaxation exactness
//!   - `gauge_mcmc`: production run from a JSON config

pub mod config;
pub mod error;
pub mod lattice;
pub mod production;
pub mod tolerances;
pub mod validation;

pub use error::{LatticeError, Result};
