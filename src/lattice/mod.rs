// SPDX-License-Identifier: AGPL-3.0-only

//! Lattice gauge theory: SU(2) and U(1) link fields on periodic lattices.
//!
//! | Component | Representation |
//! |-----------|----------------|
//! | State | one group element per (site, direction) |
//! | Local action | Wilson plaquette, through the staple |
//! | Updates | Metropolis, heatbath, overrelaxation |
//! | Observables | plaquette, clover energy density, topological charge, Polyakov loop |
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `complex_f64` | Complex f64 arithmetic, `Pod` for snapshots |
//! | `constants` | numerical guards, per-worker RNG seeding |
//! | `group` | `GaugeGroup` and `Accumulator` traits |
//! | `su2` | SU(2) element `(a, b)` |
//! | `u1` | U(1) phase element |
//! | `geometry` | extents, dimensionality, periodic link index |
//! | `gauge_field` | link storage, cold/hot start, snapshots |
//! | `wilson` | staples, plaquettes, Wilson action, Polyakov and Wilson loops |
//! | `update` | single-link Metropolis, heatbath, overrelaxation |
//! | `sweep` | full-lattice sweep with time-parity worker partition |
//! | `observables` | clover field strength, energy density, topological charge |
//! | `gauge_transform` | site-local gauge transformations |
//!
//! # References
//!
//! - `Creutz`, "Quarks, Gluons and Lattices" (1983)
//! - Kennedy & Pendleton, Phys. Lett. B 156, 393 (1985)
//! - Gattringer & Lang, "Quantum Chromodynamics on the Lattice" (2010)

/// Complex f64 arithmetic (re, im).
pub mod complex_f64;
/// Numerical guards and worker RNG seeding.
pub mod constants;
/// Gauge field storage and snapshots.
pub mod gauge_field;
/// Site-local gauge transformations.
pub mod gauge_transform;
/// Lattice extents and periodic addressing.
pub mod geometry;
/// Group and accumulator abstractions shared by SU(2) and U(1).
pub mod group;
/// Clover energy density and topological charge.
pub mod observables;
/// SU(2) group elements.
pub mod su2;
/// Parity-partitioned sweeps.
pub mod sweep;
/// U(1) group elements.
pub mod u1;
/// Single-link update algorithms.
pub mod update;
/// Wilson action: staples, plaquettes, loops.
pub mod wilson;

pub use gauge_field::{GaugeField, LinkSource};
pub use geometry::{Coord, Geometry};
pub use group::{Accumulator, GaugeGroup};
pub use su2::Su2;
pub use u1::U1;
