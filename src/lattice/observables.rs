// SPDX-License-Identifier: AGPL-3.0-only

//! Clover-leaf field strength, energy density and topological charge.
//!
//! The field strength at `x` is the anti-hermitian part of the sum of the
//! four plaquettes surrounding `x` in the `(μ, ν)` plane:
//!
//! ```text
//!   G_μν(x) = [Σ_leaves L − h.c.] / 2 ,     G_νμ = −G_μν
//! ```
//!
//! which is `4 a² F_μν + O(a⁴)`. From it
//!
//! ```text
//!   E = −1/V Σ_x Σ_{μ<ν} Re Tr(G_μν G_μν) / 16
//!   Q = −4/(16·32π²) Σ_x Σ_{μ<ν, ρ<σ} ε_μνρσ Re Tr(G_μν G_ρσ)      (4D)
//!   Q = −4/(16·32π²) Σ_x Im Tr G_01                                  (2D)
//! ```
//!
//! The factor 4 in the 4D charge restores the terms with `μ > ν` or
//! `ρ > σ`, which are skipped. The 2D charge keeps only `G_01` and
//! shares the 4D normalisation.
//!
//! # References
//!
//! - de Forcrand, García Pérez & Stamatescu, NPB 499, 409 (1997), eq. 6
//! - Lüscher, JHEP 08 (2010) 071

use super::gauge_field::{GaugeField, LinkSource};
use super::geometry::{Coord, Geometry};
use super::group::{Accumulator, GaugeGroup, LEVI_CIVITA_ORDERED};
use super::wilson::Accum;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Per-site field strength components; unused planes are zero.
pub type FieldStrength<A> = [[A; 4]; 4];

/// Energy density and topological charge from one pass over the lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CloverObservables {
    pub energy_density: f64,
    pub topological_charge: f64,
}

/// Sum of the four plaquette leaves around `x` in the `(mu, nu)` plane,
/// each starting and ending at `x` with the same orientation.
pub fn clover_leaf_sum<S: LinkSource + ?Sized>(
    src: &S,
    x: Coord,
    mu: usize,
    nu: usize,
) -> Accum<S> {
    let s = Geometry::shift;
    let x_mu = s(x, mu, 1);
    let x_nu = s(x, nu, 1);
    let x_bmu = s(x, mu, -1);
    let x_bnu = s(x, nu, -1);
    let x_bmu_nu = s(x_bmu, nu, 1);
    let x_bmu_bnu = s(x_bmu, nu, -1);
    let x_mu_bnu = s(x_mu, nu, -1);

    let l1 = src.link(x, mu)
        * src.link(x_mu, nu)
        * src.link(x_nu, mu).dagger()
        * src.link(x, nu).dagger();
    let l2 = src.link(x, nu)
        * src.link(x_bmu_nu, mu).dagger()
        * src.link(x_bmu, nu).dagger()
        * src.link(x_bmu, mu);
    let l3 = src.link(x_bmu, mu).dagger()
        * src.link(x_bmu_bnu, nu).dagger()
        * src.link(x_bmu_bnu, mu)
        * src.link(x_bnu, nu);
    let l4 = src.link(x_bnu, nu).dagger()
        * src.link(x_bnu, mu)
        * src.link(x_mu_bnu, nu)
        * src.link(x, mu).dagger();

    l1.to_accum() + l2.to_accum() + l3.to_accum() + l4.to_accum()
}

/// Antisymmetric clover field strength `G_μν(x)` for all planes.
pub fn field_strength<S: LinkSource + ?Sized>(src: &S, x: Coord) -> FieldStrength<Accum<S>> {
    let nd = src.geometry().ndims();
    let zero = <Accum<S> as Accumulator>::zero();
    let mut g = [[zero; 4]; 4];
    for mu in 0..nd {
        for nu in (mu + 1)..nd {
            let gmn = clover_leaf_sum(src, x, mu, nu).traceless_antiherm();
            g[mu][nu] = gmn;
            g[nu][mu] = gmn.scale(-1.0);
        }
    }
    g
}

/// Unnormalised per-site contributions `(Σ Re Tr G G / 16, charge density)`.
fn site_contribution<G: GaugeGroup>(field: &GaugeField<G>, x: Coord) -> (f64, f64) {
    let nd = field.geometry().ndims();
    let g = field_strength(field, x);
    let mut e = 0.0;
    for mu in 0..nd {
        for nu in (mu + 1)..nd {
            e += (g[mu][nu] * g[mu][nu]).trace().re / 16.0;
        }
    }
    let q = match nd {
        4 => LEVI_CIVITA_ORDERED
            .iter()
            .map(|&([i1, i2, i3, i4], sign)| sign * (g[i1][i2] * g[i3][i4]).trace().re)
            .sum::<f64>(),
        2 => g[0][1].trace().im,
        _ => 0.0,
    };
    (e, q)
}

/// Energy density and topological charge of `field`.
///
/// The charge is identically zero in three dimensions.
#[must_use]
pub fn clover_observables<G: GaugeGroup>(field: &GaugeField<G>) -> CloverObservables {
    let geom = *field.geometry();
    let (e, q) = (0..geom.volume())
        .into_par_iter()
        .map(|s| site_contribution(field, geom.site_coords(s)))
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));
    let charge_norm = match geom.ndims() {
        2 | 4 => -4.0 / (16.0 * 32.0 * PI * PI),
        _ => 0.0,
    };
    CloverObservables {
        energy_density: -e / geom.volume() as f64,
        topological_charge: q * charge_norm,
    }
}

/// Clover energy density `E`.
#[must_use]
pub fn energy_density<G: GaugeGroup>(field: &GaugeField<G>) -> f64 {
    clover_observables(field).energy_density
}

/// Clover topological charge `Q`.
#[must_use]
pub fn topological_charge<G: GaugeGroup>(field: &GaugeField<G>) -> f64 {
    clover_observables(field).topological_charge
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::su2::Su2;
    use crate::lattice::u1::U1;
    use crate::lattice::wilson::plaquette;

    /// Uniform abelian field with `q` flux quanta on an `l0 × l1` torus.
    fn u1_flux_2d(l0: usize, l1: usize, q: f64) -> GaugeField<U1> {
        let geom = Geometry::new([l0, l1, 1, 1], 2).unwrap();
        let mut f = GaugeField::<U1>::cold(geom);
        let v = (l0 * l1) as f64;
        for t in 0..l0 {
            for x in 0..l1 {
                let c = [t as isize, x as isize, 0, 0];
                f.set_link(c, 0, U1::new(-2.0 * PI * q * x as f64 / v));
                if x == l1 - 1 {
                    f.set_link(c, 1, U1::new(2.0 * PI * q * t as f64 / l0 as f64));
                }
            }
        }
        f
    }

    #[test]
    fn cold_field_has_no_energy_or_charge() {
        for nd in 2..=4 {
            let f = GaugeField::<Su2>::cold(Geometry::hypercubic(3, nd).unwrap());
            let obs = clover_observables(&f);
            assert_eq!(obs.energy_density, 0.0);
            assert_eq!(obs.topological_charge, 0.0);
        }
    }

    #[test]
    fn field_strength_is_antisymmetric() {
        let f = GaugeField::<Su2>::hot(Geometry::hypercubic(3, 4).unwrap(), 4, 0.6);
        let g = field_strength(&f, [1, 0, 2, 1]);
        for mu in 0..4 {
            assert_eq!(g[mu][mu], Su2::ZERO);
            for nu in 0..4 {
                assert_eq!(g[mu][nu], g[nu][mu].scale(-1.0));
                assert!(g[mu][nu].trace().abs() < 1e-15);
            }
        }
    }

    #[test]
    fn clover_leaf_contains_plaquette() {
        let f = GaugeField::<U1>::hot(Geometry::hypercubic(3, 3).unwrap(), 5, 1.0);
        let x = [2, 1, 0, 0];
        let p = plaquette(&f, x, 0, 2).to_accum();
        let leaves = clover_leaf_sum(&f, x, 0, 2);
        // The other three leaves are plaquettes at shifted sites.
        let rest = plaquette(&f, Geometry::shift(x, 0, -1), 0, 2).to_accum()
            + plaquette(&f, Geometry::shift(Geometry::shift(x, 0, -1), 2, -1), 0, 2).to_accum()
            + plaquette(&f, Geometry::shift(x, 2, -1), 0, 2).to_accum();
        assert!((leaves - p - rest).abs() < 1e-13);
    }

    #[test]
    fn two_dimensional_unit_flux() {
        // Σ Im G_01 ≈ 4·2π q, so Q ≈ -q/(16π).
        let f = u1_flux_2d(16, 16, 1.0);
        let phi = 2.0 * PI / 256.0;
        let obs = clover_observables(&f);
        let expected = -1.0 / (16.0 * PI);
        assert!((obs.topological_charge - expected).abs() < 1e-5, "Q = {}", obs.topological_charge);
        assert!((obs.energy_density - phi.sin().powi(2)).abs() < 1e-12);
    }

    #[test]
    fn two_dimensional_charge_flips_sign() {
        let q = topological_charge(&u1_flux_2d(12, 10, -2.0));
        assert!((q - 2.0 / (16.0 * PI)).abs() < 2e-4, "Q = {q}");
    }

    #[test]
    fn two_dimensional_charge_uses_upper_component_and_4d_norm() {
        let geom = Geometry::hypercubic(8, 2).unwrap();
        let f = GaugeField::<U1>::hot(geom, 3, 0.7);
        let sum: f64 = geom.sites().map(|x| field_strength(&f, x)[0][1].im).sum();
        let expected = -4.0 / (16.0 * 32.0 * PI * PI) * sum;
        let q = topological_charge(&f);
        assert!((q - expected).abs() < 1e-12, "Q = {q}, expected {expected}");
        assert!(q.abs() < 0.1);
    }

    #[test]
    fn three_dimensional_charge_vanishes() {
        let f = GaugeField::<U1>::hot(Geometry::hypercubic(3, 3).unwrap(), 6, 1.0);
        let obs = clover_observables(&f);
        assert_eq!(obs.topological_charge, 0.0);
        assert!(obs.energy_density > 0.0);
    }
}
