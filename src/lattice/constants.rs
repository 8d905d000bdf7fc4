// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized constants for the lattice modules.
//!
//! Collects the dimension limits, numerical guards and the deterministic
//! per-worker generator seeding shared by `update.rs`, `sweep.rs`,
//! `gauge_field.rs` and `gauge_transform.rs`.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Maximum number of spacetime dimensions.
pub const N_DIM_MAX: usize = 4;

/// Minimum number of spacetime dimensions.
pub const N_DIM_MIN: usize = 2;

/// Index of the time direction.
pub const TIME_DIR: usize = 0;

/// Division guard for normalisations.
///
/// Prevents division by zero when re-projecting a link or normalising a
/// staple. Well below any physical lattice scale.
pub const LATTICE_DIVISION_GUARD: f64 = 1e-30;

/// Staple magnitude below which heatbath and overrelaxation treat the
/// local action as flat.
///
/// The heatbath then draws a Haar-random element and overrelaxation
/// leaves the link unchanged.
pub const STAPLE_DEGENERATE_GUARD: f64 = 1e-12;

/// Effective SU(2) coupling above which the Kennedy–Pendleton sampler is
/// used instead of Creutz's.
pub const KENNEDY_PENDLETON_THRESHOLD: f64 = 2.0;

/// von Mises concentration below which the U(1) heatbath samples a
/// uniform phase.
pub const VON_MISES_FLAT_KAPPA: f64 = 1e-6;

/// Seed used by [`GaugeField::hot_default`](super::gauge_field::GaugeField::hot_default).
pub const HOT_START_DEFAULT_SEED: u64 = 123_456;

/// Rejection attempts per heatbath draw before the sampler gives up and
/// keeps the last candidate.
///
/// Acceptance of both samplers is above 0.5 for all couplings, so this
/// cap is never reached in practice.
pub const HEATBATH_MAX_TRIES: usize = 10_000;

/// Generator for one worker of one sweep.
///
/// All workers share the global `seed`; the ChaCha stream selects
/// `sweep * n_workers + worker`, so streams never overlap and results are
/// reproducible for a fixed seed and worker count.
#[must_use]
pub fn worker_rng(seed: u64, sweep: u64, n_workers: usize, worker: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(sweep * n_workers as u64 + worker as u64);
    rng
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn worker_rng_is_deterministic() {
        let mut a = worker_rng(42, 3, 4, 1);
        let mut b = worker_rng(42, 3, 4, 1);
        for _ in 0..16 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }

    #[test]
    fn worker_streams_differ() {
        let mut a = worker_rng(42, 0, 2, 0);
        let mut b = worker_rng(42, 0, 2, 1);
        let mut c = worker_rng(42, 1, 2, 0);
        let x: u64 = a.gen();
        assert_ne!(x, b.gen::<u64>());
        assert_ne!(x, c.gen::<u64>());
    }
}
