// SPDX-License-Identifier: AGPL-3.0-only

//! Machine-precision tolerances (IEEE 754 f64).

/// Tolerance for operations that should be exact in f64 arithmetic.
///
/// f64 has ~15.9 significant digits; 1e-10 allows 5 digits of accumulated
/// rounding in compositions of exact operations.
pub const EXACT_F64: f64 = 1e-10;

/// Threshold below which an expected value counts as zero for relative
/// comparisons.
pub const NEAR_ZERO_EXPECTED: f64 = 1e-14;
