//! Fixed-point price type for the hot path.
//!
//! [`Price`] stores a signed count of ticks at a fixed scale of
//! `10^-8` price units per tick ([`PRICE_SCALE`]). Eight fractional
//! digits cover satoshi-grade precision while keeping every arithmetic
//! operation a plain integer op. The representable range is roughly
//! ±92.2 billion price units; overflow is a domain error, not a checked
//! condition.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Ticks per price unit: `10^8`, i.e. 8 decimal places.
pub const PRICE_SCALE: i64 = 100_000_000;

const PRICE_SCALE_F64: f64 = 100_000_000.0;

/// Fixed-point price: a signed tick count at [`PRICE_SCALE`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Price(pub i64);

impl Price {
    /// Zero price.
    pub const ZERO: Price = Price(0);

    /// Construct from a raw tick count.
    #[inline]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Construct from a float, rounding half away from zero.
    ///
    /// **Not for hot-path use.** Intended for configuration, tests, and
    /// feed adapters that receive decimal strings parsed to `f64`.
    #[inline]
    pub fn from_float(value: f64) -> Self {
        // f64::round rounds half-way cases away from zero.
        Self((value * PRICE_SCALE_F64).round() as i64)
    }

    /// Convert to `f64`. Lossy above 2^53 ticks.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / PRICE_SCALE_F64
    }

    /// Raw tick count.
    #[inline]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Returns `true` if this price is zero ticks.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Absolute value.
    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl Add for Price {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Price {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / PRICE_SCALE;
        let frac = (self.0 % PRICE_SCALE).abs();
        let sign = if self.0 < 0 && whole == 0 { "-" } else { "" };
        write!(f, "{}{}.{:08}", sign, whole, frac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ticks_and_accessor() {
        let p = Price::from_ticks(5_000_000_000_000);
        assert_eq!(p.ticks(), 5_000_000_000_000);
    }

    #[test]
    fn test_from_float_basic() {
        let p = Price::from_float(100.0);
        assert_eq!(p.ticks(), 100 * PRICE_SCALE);
    }

    #[test]
    fn test_from_float_satoshi() {
        // Smallest representable increment.
        let p = Price::from_float(0.00000001);
        assert_eq!(p.ticks(), 1);
    }

    #[test]
    fn test_from_float_rounds_half_away_from_zero() {
        // 0.000000005 * 1e8 = 0.5 -> rounds to 1 tick
        assert_eq!(Price::from_float(0.000000005).ticks(), 1);
        // Negative half rounds away from zero to -1 tick
        assert_eq!(Price::from_float(-0.000000005).ticks(), -1);
    }

    #[test]
    fn test_to_float_round_trip_error_bound() {
        for &v in &[0.0, 1.5, 99.99, 50_000.12345678, -123.456, 0.1, 1e-8] {
            let p = Price::from_float(v);
            assert!(
                (p.to_float() - v).abs() <= 1.0 / PRICE_SCALE as f64,
                "round trip of {v} drifted: {}",
                p.to_float()
            );
        }
    }

    #[test]
    fn test_from_float_idempotent() {
        let p = Price::from_float(1234.56789);
        let q = Price::from_float(p.to_float());
        assert_eq!(p, q);
    }

    #[test]
    fn test_add_sub() {
        let a = Price::from_float(100.0);
        let b = Price::from_float(50.0);
        assert_eq!((a + b).to_float(), 150.0);
        assert_eq!((a - b).to_float(), 50.0);
    }

    #[test]
    fn test_sub_negative_result() {
        let a = Price::from_float(1.0);
        let b = Price::from_float(3.0);
        assert_eq!((a - b).ticks(), -2 * PRICE_SCALE);
    }

    #[test]
    fn test_neg() {
        let p = Price::from_ticks(42);
        assert_eq!((-p).ticks(), -42);
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_float(100.0) < Price::from_float(100.00000001));
        assert!(Price::from_float(-1.0) < Price::ZERO);
        assert_eq!(Price::from_float(2.5), Price::from_ticks(250_000_000));
    }

    #[test]
    fn test_floats_rounding_to_same_ticks_compare_equal() {
        // Both are within a quarter tick of 1.0.
        let a = Price::from_float(1.000000001);
        let b = Price::from_float(0.999999999);
        assert_eq!(a, b);
    }

    #[test]
    fn test_abs() {
        assert_eq!(Price::from_ticks(-5).abs().ticks(), 5);
        assert_eq!(Price::from_ticks(5).abs().ticks(), 5);
    }

    #[test]
    fn test_is_zero() {
        assert!(Price::ZERO.is_zero());
        assert!(!Price::from_ticks(1).is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Price::from_float(50_000.5)), "50000.50000000");
        assert_eq!(format!("{}", Price::from_ticks(1)), "0.00000001");
        assert_eq!(format!("{}", Price::from_float(-0.25)), "-0.25000000");
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn round_trip_within_one_tick(v in -9.0e9f64..9.0e9f64) {
            let p = Price::from_float(v);
            prop_assert!((p.to_float() - v).abs() <= 1.0 / PRICE_SCALE as f64);
        }

        #[test]
        fn add_sub_inverse(a in -1_000_000_000_000i64..1_000_000_000_000i64,
                           b in -1_000_000_000_000i64..1_000_000_000_000i64) {
            let pa = Price::from_ticks(a);
            let pb = Price::from_ticks(b);
            prop_assert_eq!((pa + pb) - pb, pa);
        }

        #[test]
        fn ordering_matches_ticks(a in any::<i32>(), b in any::<i32>()) {
            let pa = Price::from_ticks(a as i64);
            let pb = Price::from_ticks(b as i64);
            prop_assert_eq!(pa.cmp(&pb), (a as i64).cmp(&(b as i64)));
        }
    }
}
