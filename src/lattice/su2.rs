// SPDX-License-Identifier: AGPL-3.0-only

//! SU(2) link variables in the Cayley–Klein parametrisation.
//!
//! An element is stored as two complex numbers `(a, b)` standing for
//!
//! ```text
//!   U = [[ a,   b  ],
//!        [-b*,  a* ]]
//! ```
//!
//! The set of such matrices with arbitrary `(a, b)` is closed under sums,
//! real scaling and products (it is the quaternion algebra), so the same
//! type doubles as the staple accumulator. On the manifold
//! `det U = |a|² + |b|² = 1`.
//!
//! # References
//!
//! - Creutz, PRD 21, 2308 (1980): heatbath
//! - Kennedy & Pendleton, PLB 156, 393 (1985): large-coupling heatbath
//! - Brown & Woch, PRL 58, 2394 (1987): overrelaxation

use super::complex_f64::Complex64;
use super::constants::{
    HEATBATH_MAX_TRIES, KENNEDY_PENDLETON_THRESHOLD, LATTICE_DIVISION_GUARD,
    STAPLE_DEGENERATE_GUARD,
};
use super::group::{Accumulator, GaugeGroup};
use bytemuck::{Pod, Zeroable};
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;
use std::ops::{Add, AddAssign, Mul, Sub};

/// SU(2) element, or an unnormalised member of its linear span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Su2 {
    pub a: Complex64,
    pub b: Complex64,
}

impl Su2 {
    pub const IDENTITY: Self = Self {
        a: Complex64::ONE,
        b: Complex64::ZERO,
    };

    pub const ZERO: Self = Self {
        a: Complex64::ZERO,
        b: Complex64::ZERO,
    };

    #[inline]
    pub const fn new(a: Complex64, b: Complex64) -> Self {
        Self { a, b }
    }

    /// `q0·1 + i(q1 σ1 + q2 σ2 + q3 σ3)`.
    #[inline]
    pub const fn from_quaternion(q0: f64, q1: f64, q2: f64, q3: f64) -> Self {
        Self {
            a: Complex64::new(q0, q3),
            b: Complex64::new(q2, q1),
        }
    }

    /// Conjugate transpose.
    #[inline]
    pub fn adjoint(self) -> Self {
        Self {
            a: self.a.conj(),
            b: -self.b,
        }
    }

    #[inline]
    pub fn trace(self) -> Complex64 {
        Complex64::new(2.0 * self.a.re, 0.0)
    }

    #[inline]
    pub fn re_trace(self) -> f64 {
        2.0 * self.a.re
    }

    /// `|a|² + |b|²`.
    #[inline]
    pub fn det(self) -> f64 {
        self.a.abs_sq() + self.b.abs_sq()
    }

    #[inline]
    pub fn scale(self, s: f64) -> Self {
        Self {
            a: self.a.scale(s),
            b: self.b.scale(s),
        }
    }

    /// Project onto SU(2) by normalising `(a, b)`.
    pub fn reunitarize(self) -> Self {
        let n = self.det().sqrt();
        if n < LATTICE_DIVISION_GUARD {
            return Self::IDENTITY;
        }
        self.scale(1.0 / n)
    }

    /// Haar-random element with its rotation angle scaled by `disorder`.
    ///
    /// A unit quaternion `(cos φ, sin φ n̂)` drawn from four normal
    /// deviates is Haar distributed; replacing `φ` by `disorder·φ` keeps
    /// `n̂` isotropic, so `R` and `R†` share one distribution.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, disorder: f64) -> Self {
        let d = disorder.clamp(0.0, 1.0);
        let q0: f64 = rng.sample(StandardNormal);
        let v = [
            rng.sample::<f64, _>(StandardNormal),
            rng.sample::<f64, _>(StandardNormal),
            rng.sample::<f64, _>(StandardNormal),
        ];
        let vn = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        if vn < LATTICE_DIVISION_GUARD {
            return Self::IDENTITY;
        }
        let phi = d * vn.atan2(q0);
        let s = phi.sin() / vn;
        Self::from_quaternion(phi.cos(), s * v[0], s * v[1], s * v[2])
    }

    /// Uniform point on the 2-sphere.
    fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> [f64; 3] {
        let cos_theta = 2.0f64.mul_add(rng.gen::<f64>(), -1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * PI * rng.gen::<f64>();
        [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta]
    }
}

/// Draw `x ∈ [-1, 1]` with density `∝ sqrt(1 - x²) exp(alpha x)`.
///
/// Creutz's sampler proposes from `exp(alpha x)` by inverting its CDF and
/// accepts with `sqrt(1 - x²)`; it is efficient for small `alpha`.
/// Kennedy–Pendleton proposes `1 - x` from a gamma-like law and accepts
/// with `sqrt(1 - λ²)`, efficient for large `alpha`.
pub fn sample_heatbath_w0<R: Rng + ?Sized>(alpha: f64, rng: &mut R) -> f64 {
    let mut x = 1.0;
    if alpha > KENNEDY_PENDLETON_THRESHOLD {
        for _ in 0..HEATBATH_MAX_TRIES {
            // 1 - gen() lies in (0, 1], so the logarithms are finite.
            let r1 = 1.0 - rng.gen::<f64>();
            let r2 = rng.gen::<f64>();
            let r3 = 1.0 - rng.gen::<f64>();
            let c = (2.0 * PI * r2).cos();
            let lambda_sq = -(r1.ln() + c * c * r3.ln()) / (2.0 * alpha);
            x = 1.0 - 2.0 * lambda_sq;
            let r4 = rng.gen::<f64>();
            if r4 * r4 <= 1.0 - lambda_sq {
                return x;
            }
        }
    } else {
        let e2 = (-2.0 * alpha).exp();
        for _ in 0..HEATBATH_MAX_TRIES {
            x = if alpha < LATTICE_DIVISION_GUARD {
                2.0f64.mul_add(rng.gen::<f64>(), -1.0)
            } else {
                let r = rng.gen::<f64>();
                1.0 + (e2 + r * (1.0 - e2)).ln() / alpha
            };
            let r2 = rng.gen::<f64>();
            if r2 * r2 <= 1.0 - x * x {
                return x;
            }
        }
    }
    x.clamp(-1.0, 1.0)
}

impl Add for Su2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            a: self.a + rhs.a,
            b: self.b + rhs.b,
        }
    }
}

impl AddAssign for Su2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.a += rhs.a;
        self.b += rhs.b;
    }
}

impl Sub for Su2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            a: self.a - rhs.a,
            b: self.b - rhs.b,
        }
    }
}

impl Mul for Su2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            a: self.a * rhs.a - self.b * rhs.b.conj(),
            b: self.a * rhs.b + self.b * rhs.a.conj(),
        }
    }
}

impl Accumulator for Su2 {
    #[inline]
    fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    fn scale(self, s: f64) -> Self {
        Self::scale(self, s)
    }

    #[inline]
    fn trace(self) -> Complex64 {
        Self::trace(self)
    }

    #[inline]
    fn dagger(self) -> Self {
        self.adjoint()
    }

    #[inline]
    fn traceless_antiherm(self) -> Self {
        Self {
            a: Complex64::new(0.0, self.a.im),
            b: self.b,
        }
    }
}

impl GaugeGroup for Su2 {
    type Accum = Self;

    const N_C: usize = 2;
    const NAME: &'static str = "su2";

    #[inline]
    fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    fn dagger(self) -> Self {
        self.adjoint()
    }

    #[inline]
    fn trace(self) -> Complex64 {
        Self::trace(self)
    }

    #[inline]
    fn det(self) -> Complex64 {
        Complex64::new(Self::det(self), 0.0)
    }

    #[inline]
    fn restore(self) -> Self {
        self.reunitarize()
    }

    fn round(self, n: f64) -> Self {
        Self {
            a: self.a.round_to(n),
            b: self.b.round_to(n),
        }
    }

    #[inline]
    fn to_accum(self) -> Self {
        self
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, disorder: f64) -> Self {
        Self::random(rng, disorder)
    }

    /// With `K = k V`, `V ∈ SU(2)`, the substitution `W = U V` turns the
    /// weight into `exp(2 beta_eff k w0)` times Haar measure on `W`.
    fn heatbath<R: Rng + ?Sized>(staple: Self, beta_eff: f64, rng: &mut R) -> Self {
        let k = staple.det().sqrt();
        if k < STAPLE_DEGENERATE_GUARD {
            return Self::random(rng, 1.0);
        }
        let v = staple.scale(1.0 / k);
        let alpha = 2.0 * beta_eff * k;
        let w0 = sample_heatbath_w0(alpha, rng);
        let r = (1.0 - w0 * w0).max(0.0).sqrt();
        let n = Self::random_direction(rng);
        let w = Self::from_quaternion(w0, r * n[0], r * n[1], r * n[2]);
        (w * v.adjoint()).reunitarize()
    }

    fn overrelax(self, staple: Self) -> Self {
        let k = staple.det().sqrt();
        if k < STAPLE_DEGENERATE_GUARD {
            return self;
        }
        let vd = staple.scale(1.0 / k).adjoint();
        (vd * self.adjoint() * vd).reunitarize()
    }
}
