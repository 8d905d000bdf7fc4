// SPDX-License-Identifier: AGPL-3.0-only

//! Single-link update algorithms.
//!
//! Each update receives the current link `U` and its weighted staple `K`
//! and returns a replacement drawn so that repeated application samples
//!
//!   `P(U) ∝ exp(β/N_c · Re Tr(U K))`.
//!
//! | Algorithm | Move | Balance |
//! |-----------|------|---------|
//! | Metropolis | `U' = R U`, accept `min(1, e^{-ΔS})` | detailed balance, symmetric `R` |
//! | Heatbath | exact draw from the conditional | always accepted |
//! | Overrelaxation | reflection about `K` | microcanonical, `ΔS = 0` |
//!
//! Overrelaxation alone is not ergodic; it is interleaved with heatbath
//! sweeps by the driver.

use super::group::GaugeGroup;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Couplings entering the local action.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionParams {
    /// Inverse bare coupling `β`.
    pub beta: f64,
    /// Bare anisotropy `ξ`.
    pub xi: f64,
    /// Weight temporal and spatial plaquettes differently.
    pub anisotropic: bool,
}

impl ActionParams {
    /// Isotropic Wilson action at coupling `beta`.
    #[must_use]
    pub const fn isotropic(beta: f64) -> Self {
        Self {
            beta,
            xi: 1.0,
            anisotropic: false,
        }
    }

    /// `β / N_c` for group `G`.
    #[must_use]
    pub fn beta_eff<G: GaugeGroup>(&self) -> f64 {
        self.beta / G::N_C as f64
    }
}

/// Link update selected for a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkUpdate {
    /// `n_hit` Metropolis proposals of step size `delta` per link.
    Metropolis { delta: f64, n_hit: usize },
    /// Exact conditional draw.
    Heatbath,
    /// Action-preserving reflection.
    Overrelaxation,
}

/// Accept/propose counts of one link visit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkOutcome {
    pub accepted: usize,
    pub proposed: usize,
}

/// Metropolis test: accept if `ΔS ≤ 0`, otherwise with probability
/// `exp(-ΔS)`.
#[inline]
pub fn metropolis_accept<R: Rng + ?Sized>(delta_s: f64, rng: &mut R) -> bool {
    delta_s <= 0.0 || rng.gen::<f64>() < (-delta_s).exp()
}

/// `n_hit` Metropolis hits on one link at fixed staple.
///
/// Accepted links are re-projected onto the manifold.
pub fn metropolis_link<G: GaugeGroup, R: Rng + ?Sized>(
    link: G,
    staple: G::Accum,
    beta_eff: f64,
    delta: f64,
    n_hit: usize,
    rng: &mut R,
) -> (G, LinkOutcome) {
    let mut u = link;
    let mut s_old = u.re_trace_with(staple);
    let mut accepted = 0;
    for _ in 0..n_hit {
        let proposal = G::random(rng, delta) * u;
        let s_new = proposal.re_trace_with(staple);
        let delta_s = beta_eff * (s_old - s_new);
        if metropolis_accept(delta_s, rng) {
            u = proposal.restore();
            s_old = u.re_trace_with(staple);
            accepted += 1;
        }
    }
    (
        u,
        LinkOutcome {
            accepted,
            proposed: n_hit,
        },
    )
}

/// Heatbath draw for one link.
#[inline]
pub fn heatbath_link<G: GaugeGroup, R: Rng + ?Sized>(
    staple: G::Accum,
    beta_eff: f64,
    rng: &mut R,
) -> G {
    G::heatbath(staple, beta_eff, rng)
}

/// Overrelaxation step for one link.
#[inline]
pub fn overrelax_link<G: GaugeGroup>(link: G, staple: G::Accum) -> G {
    link.overrelax(staple)
}

impl LinkUpdate {
    /// Apply this update to a single link.
    pub fn apply<G: GaugeGroup, R: Rng + ?Sized>(
        self,
        link: G,
        staple: G::Accum,
        beta_eff: f64,
        rng: &mut R,
    ) -> (G, LinkOutcome) {
        let once = LinkOutcome {
            accepted: 1,
            proposed: 1,
        };
        match self {
            Self::Metropolis { delta, n_hit } => {
                metropolis_link(link, staple, beta_eff, delta, n_hit, rng)
            }
            Self::Heatbath => (heatbath_link::<G, R>(staple, beta_eff, rng), once),
            Self::Overrelaxation => (overrelax_link(link, staple), once),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Metropolis { .. } => "metropolis",
            Self::Heatbath => "heatbath",
            Self::Overrelaxation => "overrelaxation",
        }
    }
}
