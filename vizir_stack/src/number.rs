// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floating-point-error-corrected addition.
//!
//! Binary floats cannot represent most decimal fractions, so `0.1 + 0.2` reads
//! `0.30000000000000004`. Stacked sums feed axis extents, where such residue shows up as
//! spurious ticks or mis-filtered minimums. [`add_safe`] rounds each sum to the finer of its
//! operands' apparent decimal precisions.

extern crate alloc;

use alloc::format;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Largest number of fractional digits [`add_safe`] rounds to.
///
/// Operands finer than this are summed without rounding.
pub const ROUND_SUPPORTED_PRECISION_MAX: usize = 20;

/// Adds two values and rounds the sum to the operands' apparent decimal precision.
///
/// `NaN` propagates.
///
/// ```
/// assert_eq!(vizir_stack::add_safe(0.1, 0.2), 0.3);
/// ```
pub fn add_safe(a: f64, b: f64) -> f64 {
    let max_precision = precision(a).max(precision(b));
    let sum = a + b;
    // Rounding formats the sum, which allocates; integer operands never need it.
    if !sum.is_finite() || max_precision == 0 || max_precision > ROUND_SUPPORTED_PRECISION_MAX {
        sum
    } else {
        round_to(sum, max_precision)
    }
}

/// Returns the number of fractional decimal digits `v` appears to have.
///
/// `NaN` and infinities have precision `0`.
pub fn precision(v: f64) -> usize {
    if v.is_nan() || v.is_infinite() || v.round() == v {
        return 0;
    }
    if v > 1e-14 {
        let mut e = 1.0_f64;
        for i in 0..15 {
            if (v * e).round() / e == v {
                return i;
            }
            e *= 10.0;
        }
    }
    precision_from_repr(v)
}

/// Reads the precision off the shortest round-trip scientific representation.
///
/// `1.25e-7` has two mantissa fraction digits and exponent `-7`, so nine fractional digits.
fn precision_from_repr(v: f64) -> usize {
    let repr = format!("{v:e}");
    let (mantissa, exp) = repr.split_once('e').unwrap_or((repr.as_str(), "0"));
    let exp: i64 = exp.parse().unwrap_or(0);
    let fraction_digits = mantissa
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len());
    let digits = i64::try_from(fraction_digits).unwrap_or(i64::MAX) - exp;
    usize::try_from(digits).unwrap_or(0)
}

/// Rounds `v` to `digits` fractional digits through its decimal representation.
fn round_to(v: f64, digits: usize) -> f64 {
    format!("{v:.digits$}").parse().unwrap_or(v)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn add_safe_removes_representation_error() {
        assert_eq!(0.1 + 0.2, 0.300_000_000_000_000_04);
        assert_eq!(add_safe(0.1, 0.2), 0.3);
        assert_eq!(add_safe(0.7, 0.1), 0.8);
        assert_eq!(add_safe(-0.1, -0.2), -0.3);
        assert_eq!(add_safe(1.005, 2.01), 3.015);
    }

    #[test]
    fn add_safe_keeps_integers_exact() {
        assert_eq!(add_safe(10.0, 20.0), 30.0);
        assert_eq!(add_safe(-5.0, -3.0), -8.0);
        assert_eq!(add_safe(0.0, 0.0), 0.0);
    }

    #[test]
    fn add_safe_propagates_nan() {
        assert!(add_safe(f64::NAN, 1.0).is_nan());
        assert!(add_safe(1.0, f64::NAN).is_nan());
        assert_eq!(add_safe(f64::INFINITY, 1.0), f64::INFINITY);
    }

    #[test]
    fn integer_operands_skip_rounding() {
        assert_eq!(precision(-700.0), 0);
        assert_eq!(precision(1e300), 0);
        assert_eq!(add_safe(-700.0, 1e15), 1e15 - 700.0);
        assert_eq!(add_safe(2.0, 0.5), 2.5);
    }

    #[test]
    fn add_safe_skips_rounding_beyond_supported_precision() {
        // 1e-21 has 21 fractional digits; the raw sum is returned.
        let sum = add_safe(1e-21, 0.1);
        assert_eq!(sum, 1e-21 + 0.1);
    }

    #[test]
    fn precision_uses_fast_path_for_positive_values() {
        assert_eq!(precision(3.0), 0);
        assert_eq!(precision(0.5), 1);
        assert_eq!(precision(12.345), 3);
    }

    #[test]
    fn precision_reads_repr_for_tiny_and_negative_values() {
        assert_eq!(precision(-0.25), 2);
        assert_eq!(precision(-7.0), 0);
        assert_eq!(precision(1.5e-20), 21);
        assert_eq!(precision(1e-15), 15);
        assert_eq!(precision(0.0), 0);
        assert_eq!(precision(f64::NAN), 0);
    }
}
