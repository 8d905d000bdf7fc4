// SPDX-License-Identifier: AGPL-3.0-only

//! Gauge transformations, used to check that observables are invariant.
//!
//! With `Ω(x)` at every site, links transform as
//!
//!   `U_μ(x) → Ω(x) U_μ(x) Ω†(x+μ)`
//!
//! which is applied site by site: left-multiply every outgoing link of `x`
//! and right-multiply every incoming link by `Ω†(x)`.

use super::gauge_field::GaugeField;
use super::geometry::Geometry;
use super::group::GaugeGroup;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Apply the site-wise transformation `omega` (one element per site, in
/// storage order).
///
/// # Panics
///
/// If `omega.len()` differs from the lattice volume.
pub fn gauge_transform<G: GaugeGroup>(field: &mut GaugeField<G>, omega: &[G]) {
    let geom = *field.geometry();
    assert_eq!(omega.len(), geom.volume(), "one transformation per site");
    for (site, &w) in omega.iter().enumerate() {
        let x = geom.site_coords(site);
        let wd = w.dagger();
        for mu in 0..geom.ndims() {
            let out = geom.index(x, mu);
            field[out] = (w * field[out]).restore();
            let inc = geom.index(Geometry::shift(x, mu, -1), mu);
            field[inc] = (field[inc] * wd).restore();
        }
    }
}

/// Haar-random gauge transformation drawn from a ChaCha generator seeded
/// with `seed`. Returns the transformation that was applied.
pub fn random_gauge_transform<G: GaugeGroup>(field: &mut GaugeField<G>, seed: u64) -> Vec<G> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let omega: Vec<G> = (0..field.geometry().volume())
        .map(|_| G::random(&mut rng, 1.0))
        .collect();
    gauge_transform(field, &omega);
    omega
}
