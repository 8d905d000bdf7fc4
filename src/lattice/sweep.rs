// SPDX-License-Identifier: AGPL-3.0-only

//! Full-lattice sweeps with a time-parity worker partition.
//!
//! A staple for a link on time slice `t` reads only slices `t-1`, `t`,
//! `t+1`. Updating all even slices concurrently, then all odd slices, is
//! therefore race-free whenever `Lt` is even: every worker owns whole
//! slices of the active parity and only reads the frozen neighbours.
//!
//! The storage order makes every time slice a contiguous block, so the
//! partition is expressed with `chunks_mut` and no locking.
//!
//! Worker `w` of sweep `s` draws from
//! [`worker_rng`]`(seed, s, n_workers, w)`; the result is reproducible for
//! a fixed seed and worker count.

use super::constants::{worker_rng, TIME_DIR};
use super::gauge_field::{GaugeField, LinkSource};
use super::geometry::{Coord, Geometry};
use super::group::GaugeGroup;
use super::update::{ActionParams, LinkOutcome, LinkUpdate};
use super::wilson::staple;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::ops::{Add, AddAssign};

/// Acceptance statistics of one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub accepted: usize,
    pub proposed: usize,
    /// Counts restricted to temporal links (`mu = 0`).
    pub temporal_accepted: usize,
    pub temporal_proposed: usize,
}

impl SweepStats {
    fn record(&mut self, mu: usize, outcome: LinkOutcome) {
        self.accepted += outcome.accepted;
        self.proposed += outcome.proposed;
        if mu == TIME_DIR {
            self.temporal_accepted += outcome.accepted;
            self.temporal_proposed += outcome.proposed;
        }
    }

    /// Accepted fraction of all proposals.
    #[must_use]
    pub fn acceptance_rate(&self) -> f64 {
        ratio(self.accepted, self.proposed)
    }

    /// Accepted fraction of proposals on temporal links.
    #[must_use]
    pub fn temporal_acceptance_rate(&self) -> f64 {
        ratio(self.temporal_accepted, self.temporal_proposed)
    }
}

fn ratio(a: usize, b: usize) -> f64 {
    if b == 0 {
        0.0
    } else {
        a as f64 / b as f64
    }
}

impl Add for SweepStats {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            accepted: self.accepted + rhs.accepted,
            proposed: self.proposed + rhs.proposed,
            temporal_accepted: self.temporal_accepted + rhs.temporal_accepted,
            temporal_proposed: self.temporal_proposed + rhs.temporal_proposed,
        }
    }
}

impl AddAssign for SweepStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Sweep parameters shared by all workers.
#[derive(Clone, Copy, Debug)]
pub struct SweepParams {
    pub update: LinkUpdate,
    pub action: ActionParams,
    /// Global seed.
    pub seed: u64,
    /// Index of this sweep in the chain.
    pub sweep_index: u64,
    /// Requested number of workers.
    pub n_workers: usize,
}

/// Whether the parity partition applies to this geometry.
#[must_use]
pub const fn parity_parallel_ok(geometry: &Geometry) -> bool {
    geometry.lt() >= 2 && geometry.lt() % 2 == 0
}

/// Read-only view of one time slice being updated plus its frozen
/// neighbours.
struct SliceView<'a, G> {
    geometry: &'a Geometry,
    t: usize,
    current: &'a [G],
    prev: &'a [G],
    next: &'a [G],
}

impl<G: GaugeGroup> LinkSource for SliceView<'_, G> {
    type Group = G;

    fn geometry(&self) -> &Geometry {
        self.geometry
    }

    #[inline]
    fn link(&self, x: Coord, mu: usize) -> G {
        let lt = self.geometry.lt();
        let t = self.geometry.time_of(x);
        let offset = self.geometry.slice_offset(x, mu);
        if t == self.t {
            self.current[offset]
        } else if t == (self.t + 1) % lt {
            self.next[offset]
        } else {
            debug_assert_eq!(t, (self.t + lt - 1) % lt, "staple left its slice window");
            self.prev[offset]
        }
    }
}

/// Update every link of slice `t` in storage order.
fn update_slice<G: GaugeGroup, R: Rng + ?Sized>(
    geometry: &Geometry,
    t: usize,
    slice: &mut [G],
    prev: &[G],
    next: &[G],
    params: &SweepParams,
    rng: &mut R,
) -> SweepStats {
    let nd = geometry.ndims();
    let beta_eff = params.action.beta_eff::<G>();
    let ActionParams {
        xi, anisotropic, ..
    } = params.action;
    let mut stats = SweepStats::default();
    for local in 0..slice.len() {
        let site = t * geometry.spatial_volume() + local / nd;
        let x = geometry.site_coords(site);
        let mu = local % nd;
        let k = {
            let view = SliceView {
                geometry,
                t,
                current: &*slice,
                prev,
                next,
            };
            staple(&view, x, mu, xi, anisotropic, false)
        };
        let (u, outcome) = params.update.apply(slice[local], k, beta_eff, rng);
        slice[local] = u;
        stats.record(mu, outcome);
    }
    stats
}

/// One pass of `params.update` over every link of `field`.
///
/// With an even time extent the even slices are updated concurrently,
/// then the odd ones, each phase split into `n_workers` contiguous groups.
/// Otherwise the sweep falls back to a single worker in storage order.
pub fn sweep<G: GaugeGroup>(field: &mut GaugeField<G>, params: &SweepParams) -> SweepStats {
    let geometry = *field.geometry();
    let n_workers = params.n_workers.max(1);

    if !parity_parallel_ok(&geometry) {
        if n_workers > 1 {
            tracing::warn!(
                lt = geometry.lt(),
                n_workers,
                "time extent is not even, falling back to a single worker"
            );
        }
        return sweep_sequential(field, params);
    }

    let slice_len = geometry.slice_len();
    let lt = geometry.lt();
    let mut rngs: Vec<ChaCha8Rng> = (0..n_workers)
        .map(|w| worker_rng(params.seed, params.sweep_index, n_workers, w))
        .collect();
    let mut total = SweepStats::default();

    for parity in 0..2 {
        let mut active: Vec<(usize, &mut [G])> = Vec::with_capacity(lt / 2);
        let mut frozen: Vec<&[G]> = Vec::with_capacity(lt);
        for (t, chunk) in field.links_mut().chunks_mut(slice_len).enumerate() {
            if t % 2 == parity {
                active.push((t, chunk));
                frozen.push(&[]);
            } else {
                let shared: &[G] = chunk;
                frozen.push(shared);
            }
        }
        let per_worker = active.len().div_ceil(n_workers);
        let frozen = &frozen;
        let phase = active
            .par_chunks_mut(per_worker)
            .zip(rngs.par_iter_mut())
            .map(|(group, rng)| {
                let mut stats = SweepStats::default();
                for (t, slice) in group.iter_mut() {
                    let prev = frozen[(*t + lt - 1) % lt];
                    let next = frozen[(*t + 1) % lt];
                    stats += update_slice(&geometry, *t, slice, prev, next, params, rng);
                }
                stats
            })
            .reduce(SweepStats::default, |a, b| a + b);
        total += phase;
    }

    tracing::debug!(
        sweep = params.sweep_index,
        update = params.update.name(),
        acceptance = total.acceptance_rate(),
        "sweep done"
    );
    total
}

/// Single-worker sweep in storage order.
pub fn sweep_sequential<G: GaugeGroup>(
    field: &mut GaugeField<G>,
    params: &SweepParams,
) -> SweepStats {
    let geometry = *field.geometry();
    let beta_eff = params.action.beta_eff::<G>();
    let mut rng = worker_rng(params.seed, params.sweep_index, 1, 0);
    let mut stats = SweepStats::default();
    for i in 0..field.len() {
        let (x, mu) = geometry.link_coords(i);
        let k = staple(
            &*field,
            x,
            mu,
            params.action.xi,
            params.action.anisotropic,
            false,
        );
        let (u, outcome) = params.update.apply(field[i], k, beta_eff, &mut rng);
        field[i] = u;
        stats.record(mu, outcome);
    }
    stats
}
