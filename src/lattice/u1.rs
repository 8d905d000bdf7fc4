// SPDX-License-Identifier: AGPL-3.0-only

//! Compact U(1) link variables stored as phase angles.
//!
//! `U = e^{iθ}`. Products add angles and are kept unwrapped until
//! [`GaugeGroup::restore`] folds them back into `[-π, π)`. Staples and
//! clover sums live in [`Complex64`].

use super::complex_f64::Complex64;
use super::constants::{HEATBATH_MAX_TRIES, STAPLE_DEGENERATE_GUARD, VON_MISES_FLAT_KAPPA};
use super::group::{Accumulator, GaugeGroup};
use bytemuck::{Pod, Zeroable};
use rand::Rng;
use std::f64::consts::PI;
use std::ops::Mul;

/// U(1) element `e^{iθ}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct U1 {
    pub theta: f64,
}

impl U1 {
    #[inline]
    pub const fn new(theta: f64) -> Self {
        Self { theta }
    }

    /// `e^{iθ}` as a complex number.
    #[inline]
    pub fn phase(self) -> Complex64 {
        Complex64::from_polar(self.theta)
    }
}

/// Fold an angle into `[-π, π)`.
#[inline]
pub fn wrap_angle(theta: f64) -> f64 {
    (theta + PI).rem_euclid(2.0 * PI) - PI
}

/// Draw from the von Mises law `∝ exp(kappa cos x)` on `[-π, π)`.
///
/// Best & Fisher, Appl. Statist. 28, 152 (1979).
pub fn sample_von_mises<R: Rng + ?Sized>(kappa: f64, rng: &mut R) -> f64 {
    if kappa < VON_MISES_FLAT_KAPPA {
        return PI * 2.0f64.mul_add(rng.gen::<f64>(), -1.0);
    }
    let tau = 1.0 + 4.0f64.mul_add(kappa * kappa, 1.0).sqrt();
    let rho = (tau - (2.0 * tau).sqrt()) / (2.0 * kappa);
    let r = rho.mul_add(rho, 1.0) / (2.0 * rho);

    let mut f = 1.0;
    for _ in 0..HEATBATH_MAX_TRIES {
        let u1 = rng.gen::<f64>();
        let u2 = 1.0 - rng.gen::<f64>();
        let z = (PI * u1).cos();
        f = r.mul_add(z, 1.0) / (r + z);
        let c = kappa * (r - f);
        if c * (2.0 - c) > u2 || (c / u2).ln() + 1.0 - c >= 0.0 {
            break;
        }
    }
    let x = f.clamp(-1.0, 1.0).acos();
    if rng.gen::<bool>() {
        x
    } else {
        -x
    }
}

impl Mul for U1 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            theta: self.theta + rhs.theta,
        }
    }
}

impl Accumulator for Complex64 {
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
        self
    }

    #[inline]
    fn dagger(self) -> Self {
        self.conj()
    }

    #[inline]
    fn traceless_antiherm(self) -> Self {
        Self::new(0.0, self.im)
    }
}

impl GaugeGroup for U1 {
    type Accum = Complex64;

    const N_C: usize = 1;
    const NAME: &'static str = "u1";

    #[inline]
    fn identity() -> Self {
        Self { theta: 0.0 }
    }

    #[inline]
    fn dagger(self) -> Self {
        Self { theta: -self.theta }
    }

    #[inline]
    fn trace(self) -> Complex64 {
        self.phase()
    }

    #[inline]
    fn det(self) -> Complex64 {
        self.phase()
    }

    #[inline]
    fn restore(self) -> Self {
        Self {
            theta: wrap_angle(self.theta),
        }
    }

    /// Quantises the angle, the only real component of the element.
    fn round(self, n: f64) -> Self {
        Self {
            theta: (self.theta * n).round() / n,
        }
    }

    #[inline]
    fn to_accum(self) -> Complex64 {
        self.phase()
    }

    fn random<R: Rng + ?Sized>(rng: &mut R, disorder: f64) -> Self {
        let d = disorder.clamp(0.0, 1.0);
        Self {
            theta: d * PI * 2.0f64.mul_add(rng.gen::<f64>(), -1.0),
        }
    }

    /// `Re(e^{iθ} k e^{iφ}) = k cos(θ + φ)`, so `θ + φ` is von Mises
    /// distributed with concentration `beta_eff · k`.
    fn heatbath<R: Rng + ?Sized>(staple: Complex64, beta_eff: f64, rng: &mut R) -> Self {
        let k = staple.abs();
        if k < STAPLE_DEGENERATE_GUARD {
            return Self::random(rng, 1.0);
        }
        let x = sample_von_mises(beta_eff * k, rng);
        Self {
            theta: wrap_angle(x - staple.arg()),
        }
    }

    fn overrelax(self, staple: Complex64) -> Self {
        if staple.abs() < STAPLE_DEGENERATE_GUARD {
            return self;
        }
        Self {
            theta: wrap_angle(-self.theta - 2.0 * staple.arg()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::constants::worker_rng;
    use crate::tolerances::OVERRELAX_ACTION_ABS;

    #[test]
    fn multiplication_adds_phases() {
        let u = U1::new(0.4);
        let v = U1::new(-1.1);
        let p = (u * v).trace();
        let q = u.trace() * v.trace();
        assert!((p - q).abs() < 1e-15);
        assert_eq!(u * v, v * u);
    }

    #[test]
    fn dagger_inverts_and_det_equals_trace() {
        let u = U1::new(2.3);
        assert!((u * u.dagger()).theta.abs() < 1e-15);
        assert_eq!(u.det(), u.trace());
        assert!((u.det().abs() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn restore_wraps_into_principal_range() {
        for &t in &[-7.0, -PI, 0.0, 3.0, PI, 12.5] {
            let r = U1::new(t).restore();
            assert!((-PI..PI).contains(&r.theta), "{t} -> {}", r.theta);
            assert!((r.trace() - U1::new(t).trace()).abs() < 1e-12);
            assert!((r.restore().theta - r.theta).abs() < 1e-15);
        }
    }

    #[test]
    fn round_quantises_angle() {
        assert_eq!(U1::new(0.26).round(4.0), U1::new(0.25));
        assert_eq!(U1::new(-0.6).round(2.0), U1::new(-0.5));
    }

    #[test]
    fn random_respects_disorder() {
        let mut rng = worker_rng(3, 0, 1, 0);
        for _ in 0..200 {
            assert!(U1::random(&mut rng, 0.1).theta.abs() <= 0.1 * PI);
        }
        assert_eq!(U1::random(&mut rng, 0.0), U1::identity());
    }

    #[test]
    fn overrelaxation_preserves_local_action() {
        let mut rng = worker_rng(4, 0, 1, 0);
        for _ in 0..50 {
            let u = U1::random(&mut rng, 1.0);
            let k = U1::random(&mut rng, 1.0).phase().scale(1.7)
                + U1::random(&mut rng, 1.0).phase().scale(0.6);
            let before = u.re_trace_with(k);
            let after = u.overrelax(k).re_trace_with(k);
            assert!((before - after).abs() < OVERRELAX_ACTION_ABS);
        }
    }

    #[test]
    fn von_mises_mean_cosine() {
        let mut rng = worker_rng(5, 0, 1, 0);
        let n = 40_000;
        for &(kappa, expected) in &[(3.0, 0.80999), (0.5, 0.24250)] {
            let mean: f64 =
                (0..n).map(|_| sample_von_mises(kappa, &mut rng).cos()).sum::<f64>() / n as f64;
            assert!((mean - expected).abs() < 0.01, "kappa={kappa}: {mean}");
        }
    }

    #[test]
    fn heatbath_centres_on_staple_phase() {
        let mut rng = worker_rng(6, 0, 1, 0);
        let k = Complex64::from_polar(1.2).scale(2.0);
        let n = 20_000;
        let mean: f64 = (0..n)
            .map(|_| U1::heatbath(k, 1.5, &mut rng).re_trace_with(k) / 2.0)
            .sum::<f64>()
            / n as f64;
        // kappa = 3
        assert!((mean - 0.80999).abs() < 0.015, "mean = {mean}");
    }
}
