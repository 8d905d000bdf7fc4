// SPDX-License-Identifier: AGPL-3.0-only

//! Gauge-group abstraction shared by the SU(2) and U(1) link types.
//!
//! Every sweep, staple and observable in this crate is generic over
//! [`GaugeGroup`] and monomorphised per group, so the inner per-link loop
//! carries no dynamic dispatch.
//!
//! Two types are involved per group:
//!
//! | Type | Role | SU(2) | U(1) |
//! |------|------|-------|------|
//! | `Self` | element on the manifold | [`Su2`](super::su2::Su2) with `|a|²+|b|²=1` | [`U1`](super::u1::U1) angle |
//! | `Accum` | sums of elements (staples, clover leaves) | unnormalised `Su2` | [`Complex64`] |

use super::complex_f64::Complex64;
use bytemuck::Pod;
use rand::Rng;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Linear span of group elements: staples, clover sums, field strengths.
pub trait Accumulator:
    Copy
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    /// Additive identity.
    fn zero() -> Self;

    /// Multiply by a real number.
    fn scale(self, s: f64) -> Self;

    /// Matrix trace.
    fn trace(self) -> Complex64;

    /// Conjugate transpose.
    fn dagger(self) -> Self;

    /// Anti-hermitian part `(A - A†)/2`.
    ///
    /// For SU(2) the result is automatically traceless. For U(1) it is the
    /// imaginary part `i Im A`, which is the abelian field strength.
    fn traceless_antiherm(self) -> Self;
}

/// A compact gauge group realised as link variables.
pub trait GaugeGroup:
    Copy + Debug + PartialEq + Send + Sync + Pod + Mul<Output = Self>
{
    /// Linear span used for staples.
    type Accum: Accumulator;

    /// Dimension of the fundamental representation.
    const N_C: usize;

    /// Human-readable group name.
    const NAME: &'static str;

    /// Group identity.
    fn identity() -> Self;

    /// Inverse, the conjugate transpose for elements on the manifold.
    fn dagger(self) -> Self;

    fn trace(self) -> Complex64;

    fn det(self) -> Complex64;

    /// Re-project onto the group manifold after floating drift.
    #[must_use]
    fn restore(self) -> Self;

    /// Quantise every real component to the nearest multiple of `1/n`.
    ///
    /// Reversibility diagnostics only.
    #[must_use]
    fn round(self, n: f64) -> Self;

    /// Embed into the linear span.
    fn to_accum(self) -> Self::Accum;

    /// Random element with disorder `d ∈ [0, 1]`.
    ///
    /// `d = 0` gives the identity and `d = 1` a uniformly (Haar)
    /// distributed element. The distribution of `R` equals that of `R†`
    /// for every `d`, so it doubles as a symmetric Metropolis proposal.
    fn random<R: Rng + ?Sized>(rng: &mut R, disorder: f64) -> Self;

    /// Exact draw from `P(U) ∝ exp(beta_eff · Re Tr(U K))` for staple `K`.
    fn heatbath<R: Rng + ?Sized>(staple: Self::Accum, beta_eff: f64, rng: &mut R) -> Self;

    /// Deterministic reflection that preserves `Re Tr(U K)`.
    #[must_use]
    fn overrelax(self, staple: Self::Accum) -> Self;

    /// `Re Tr(U K)`, the local action density up to `-β/N_c`.
    #[inline]
    fn re_trace_with(self, staple: Self::Accum) -> f64 {
        (self.to_accum() * staple).trace().re
    }
}

/// Permutations of `{0,1,2,3}` with `i1 < i2` and `i3 < i4`, with signs.
///
/// These are the six terms of `ε_{μνρσ} G_{μν} G_{ρσ}` left after
/// exploiting the antisymmetry of `G`; the other 18 are restored by a
/// factor 4 in the topological charge normalisation.
pub const LEVI_CIVITA_ORDERED: [([usize; 4], f64); 6] = [
    ([0, 1, 2, 3], 1.0),
    ([0, 2, 1, 3], -1.0),
    ([0, 3, 1, 2], 1.0),
    ([1, 2, 0, 3], 1.0),
    ([1, 3, 0, 2], -1.0),
    ([2, 3, 0, 1], 1.0),
];
