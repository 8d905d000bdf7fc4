// SPDX-License-Identifier: AGPL-3.0-only

//! Wilson gauge action: staples, plaquettes and Wilson loops.
//!
//! The plaquette is the smallest closed loop of links:
//!
//!   `P_μν(x) = U_μ(x) U_ν(x+μ) U_μ†(x+ν) U_ν†(x)`
//!
//! and the (anisotropic) Wilson action is
//!
//!   `S = β/N_c Σ_{x,μ<ν} w_μν (N_c - Re Tr P_μν(x))`
//!
//! with `w = ξ` for spatial planes and `w = 1/ξ` for planes containing the
//! time direction when anisotropy is enabled, `w = 1` otherwise. The
//! action depends on a single link only through `Re Tr(U_μ(x) K_μ(x))`,
//! where `K` is the weighted staple returned by [`staple`].
//!
//! # References
//!
//! - Wilson, PRD 10, 2445 (1974)
//! - Klassen, NPB 533, 557 (1998): anisotropic action

use super::complex_f64::Complex64;
use super::constants::TIME_DIR;
use super::gauge_field::{GaugeField, LinkSource};
use super::geometry::{Coord, Geometry};
use super::group::{Accumulator, GaugeGroup};
use rayon::prelude::*;

/// Staple accumulator type of a link source.
pub type Accum<S> = <<S as LinkSource>::Group as GaugeGroup>::Accum;

/// Plaquette weight `w_μν`.
#[inline]
#[must_use]
pub fn plane_weight(mu: usize, nu: usize, xi: f64, anisotropic: bool) -> f64 {
    if !anisotropic {
        1.0
    } else if mu == TIME_DIR || nu == TIME_DIR {
        1.0 / xi
    } else {
        xi
    }
}

/// Staple sum `K_μ(x)` closing every plaquette that contains `U_μ(x)`.
///
/// For each `ν ≠ μ` (from `ν = 1` when `spatial_only`):
///   forward:  `U_ν(x+μ) U_μ†(x+ν) U_ν†(x)`
///   backward: `U_ν†(x+μ-ν) U_μ†(x-ν) U_ν(x-ν)`
///
/// each scaled by [`plane_weight`].
#[allow(clippy::fn_params_excessive_bools)]
pub fn staple<S: LinkSource + ?Sized>(
    src: &S,
    x: Coord,
    mu: usize,
    xi: f64,
    anisotropic: bool,
    spatial_only: bool,
) -> Accum<S> {
    let nd = src.geometry().ndims();
    let start = usize::from(spatial_only);
    let x_mu = Geometry::shift(x, mu, 1);
    let mut k = <Accum<S> as Accumulator>::zero();
    for nu in (start..nd).filter(|&nu| nu != mu) {
        let x_nu = Geometry::shift(x, nu, 1);
        let x_bnu = Geometry::shift(x, nu, -1);
        let x_mu_bnu = Geometry::shift(x_mu, nu, -1);

        let forward = src.link(x_mu, nu) * src.link(x_nu, mu).dagger() * src.link(x, nu).dagger();
        let backward =
            src.link(x_mu_bnu, nu).dagger() * src.link(x_bnu, mu).dagger() * src.link(x_bnu, nu);

        let term = forward.to_accum() + backward.to_accum();
        k += term.scale(plane_weight(mu, nu, xi, anisotropic));
    }
    k
}

/// Staples oriented parallel to `U_μ(x)`, as used by APE smearing.
///
///   forward:  `U_ν(x) U_μ(x+ν) U_ν†(x+μ)`
///   backward: `U_ν†(x-ν) U_μ(x-ν) U_ν(x+μ-ν)`
#[allow(clippy::fn_params_excessive_bools)]
pub fn staple_ape<S: LinkSource + ?Sized>(
    src: &S,
    x: Coord,
    mu: usize,
    xi: f64,
    anisotropic: bool,
    spatial_only: bool,
) -> Accum<S> {
    let nd = src.geometry().ndims();
    let start = usize::from(spatial_only);
    let x_mu = Geometry::shift(x, mu, 1);
    let mut k = <Accum<S> as Accumulator>::zero();
    for nu in (start..nd).filter(|&nu| nu != mu) {
        let x_nu = Geometry::shift(x, nu, 1);
        let x_bnu = Geometry::shift(x, nu, -1);
        let x_mu_bnu = Geometry::shift(x_mu, nu, -1);

        let forward = src.link(x, nu) * src.link(x_nu, mu) * src.link(x_mu, nu).dagger();
        let backward = src.link(x_bnu, nu).dagger() * src.link(x_bnu, mu) * src.link(x_mu_bnu, nu);

        let term = forward.to_accum() + backward.to_accum();
        k += term.scale(plane_weight(mu, nu, xi, anisotropic));
    }
    k
}

/// `P_μν(x) = U_μ(x) U_ν(x+μ) U_μ†(x+ν) U_ν†(x)`.
#[inline]
pub fn plaquette<S: LinkSource + ?Sized>(src: &S, x: Coord, mu: usize, nu: usize) -> S::Group {
    src.link(x, mu)
        * src.link(Geometry::shift(x, mu, 1), nu)
        * src.link(Geometry::shift(x, nu, 1), mu).dagger()
        * src.link(x, nu).dagger()
}

/// Sum of `Re Tr P_μν(x)` over sites and over planes with `first ≤ μ < ν`.
fn plaquette_sum<G: GaugeGroup>(field: &GaugeField<G>, first: usize) -> f64 {
    let geom = *field.geometry();
    let nd = geom.ndims();
    (0..geom.volume())
        .into_par_iter()
        .map(|s| {
            let x = geom.site_coords(s);
            let mut acc = 0.0;
            for mu in first..nd {
                for nu in (mu + 1)..nd {
                    acc += plaquette(field, x, mu, nu).trace().re;
                }
            }
            acc
        })
        .sum()
}

/// `Σ_x Σ_{μ<ν} Re Tr P_μν(x)`.
#[must_use]
pub fn gauge_energy<G: GaugeGroup>(field: &GaugeField<G>) -> f64 {
    plaquette_sum(field, 0)
}

/// `⟨Re Tr P⟩ / N_c`, averaged over all sites and planes.
///
/// Exactly 1.0 on a cold start.
#[must_use]
pub fn average_plaquette<G: GaugeGroup>(field: &GaugeField<G>) -> f64 {
    let geom = field.geometry();
    let norm = (G::N_C * geom.volume() * geom.n_planes()) as f64;
    gauge_energy(field) / norm
}

/// Plaquette average restricted to spatial planes `1 ≤ μ < ν`.
///
/// `None` in two dimensions, where no spatial plane exists.
#[must_use]
pub fn average_spatial_plaquette<G: GaugeGroup>(field: &GaugeField<G>) -> Option<f64> {
    let geom = field.geometry();
    let nd = geom.ndims();
    if nd < 3 {
        return None;
    }
    let planes = (nd - 1) * (nd - 2) / 2;
    let norm = (G::N_C * geom.volume() * planes) as f64;
    Some(plaquette_sum(field, 1) / norm)
}

/// Wilson action `β/N_c Σ w_μν (N_c - Re Tr P_μν)`.
#[must_use]
pub fn wilson_action<G: GaugeGroup>(
    field: &GaugeField<G>,
    beta: f64,
    xi: f64,
    anisotropic: bool,
) -> f64 {
    let geom = *field.geometry();
    let nd = geom.ndims();
    let nc = G::N_C as f64;
    let sum: f64 = (0..geom.volume())
        .into_par_iter()
        .map(|s| {
            let x = geom.site_coords(s);
            let mut acc = 0.0;
            for mu in 0..nd {
                for nu in (mu + 1)..nd {
                    let w = plane_weight(mu, nu, xi, anisotropic);
                    acc += w * (nc - plaquette(field, x, mu, nu).trace().re);
                }
            }
            acc
        })
        .sum();
    beta / nc * sum
}

/// `Tr Π_t U_0(t, x_s) / N_c` at spatial site `x_s = [x, y, z]`.
#[must_use]
pub fn polyakov_loop<G: GaugeGroup>(field: &GaugeField<G>, x_spatial: [isize; 3]) -> Complex64 {
    let lt = field.geometry().lt() as isize;
    let mut prod = G::identity();
    for t in 0..lt {
        let x = [t, x_spatial[0], x_spatial[1], x_spatial[2]];
        prod = prod * field.link(x, TIME_DIR);
    }
    prod.trace().scale(1.0 / G::N_C as f64)
}

/// Spatial average of the Polyakov loop.
#[must_use]
pub fn average_polyakov_loop<G: GaugeGroup>(field: &GaugeField<G>) -> Complex64 {
    let geom = *field.geometry();
    let vs = geom.spatial_volume();
    // The first `vs` sites are the t = 0 slice.
    let sum = (0..vs)
        .into_par_iter()
        .map(|s| {
            let x = geom.site_coords(s);
            polyakov_loop(field, [x[1], x[2], x[3]])
        })
        .reduce(|| Complex64::ZERO, |a, b| a + b);
    sum.scale(1.0 / vs as f64)
}

/// Ordered product of `n` links along `dir` starting at `x`.
fn line<S: LinkSource + ?Sized>(src: &S, x: Coord, dir: usize, n: usize) -> (S::Group, Coord) {
    let mut y = x;
    let mut prod = <S::Group as GaugeGroup>::identity();
    for _ in 0..n {
        prod = prod * src.link(y, dir);
        y = Geometry::shift(y, dir, 1);
    }
    (prod, y)
}

/// Planar `r × t` Wilson loop in the `(mu, nu)` plane based at `x`.
pub fn wilson_loop_at<S: LinkSource + ?Sized>(
    src: &S,
    x: Coord,
    r: usize,
    t: usize,
    mu: usize,
    nu: usize,
) -> S::Group {
    let (bottom, x_r) = line(src, x, mu, r);
    let (right, _) = line(src, x_r, nu, t);
    let (top, _) = line(src, Geometry::shift(x, nu, t as isize), mu, r);
    let (left, _) = line(src, x, nu, t);
    bottom * right * top.dagger() * left.dagger()
}

/// `⟨Re Tr W_{r×t}⟩ / N_c` in the `(mu, nu)` plane over all sites.
///
/// `wilson_loop(field, 1, 1, mu, nu)` is the plaquette average of that plane.
#[must_use]
pub fn wilson_loop<G: GaugeGroup>(
    field: &GaugeField<G>,
    r: usize,
    t: usize,
    mu: usize,
    nu: usize,
) -> f64 {
    let geom = *field.geometry();
    let sum: f64 = (0..geom.volume())
        .into_par_iter()
        .map(|s| {
            wilson_loop_at(field, geom.site_coords(s), r, t, mu, nu)
                .trace()
                .re
        })
        .sum();
    sum / (G::N_C * geom.volume()) as f64
}
