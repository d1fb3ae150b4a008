//! Rational exponents with a fixed denominator.
//!
//! Dimension exponents must survive `sqrt`, `cbrt` and fractional powers
//! while still comparing exactly. Storing the numerator over a fixed
//! denominator of 25200 (= 2^4 · 3^2 · 5^2 · 7) keeps every halving, thirding
//! and small-integer division of an integer exponent exact.
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DENOMINATOR: i32 = 25_200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exponent(i32);

impl Exponent {
    pub const ZERO: Exponent = Exponent(0);
    pub const ONE: Exponent = Exponent(DENOMINATOR);

    pub const fn from_int(n: i32) -> Self {
        Self(n * DENOMINATOR)
    }

    /// Nearest representable exponent, or `None` if `x` is not finite or
    /// does not fit.
    pub fn from_f64(x: f64) -> Option<Self> {
        if !x.is_finite() {
            return None;
        }
        let scaled = (x * DENOMINATOR as f64).round();
        if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i32))
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / DENOMINATOR as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiplies by an arbitrary real factor, rounding to the grid.
    pub fn scale(self, factor: f64) -> Option<Self> {
        if self.is_zero() {
            return Some(self);
        }
        let scaled = (self.0 as f64 * factor).round();
        if !scaled.is_finite() || scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i32))
    }

    /// `None` on overflow. There is no saturating form: a clamped exponent
    /// would compare equal to a different dimension.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = gcd(self.0.unsigned_abs(), DENOMINATOR as u32).max(1) as i64;
        let num = self.0 as i64 / g;
        let den = DENOMINATOR as i64 / g;
        if den == 1 {
            write!(f, "{}", num)
        } else {
            write!(f, "{}/{}", num, den)
        }
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Exponent::from_int(2), "2")]
    #[case(Exponent::from_int(-3), "-3")]
    #[case(Exponent::ZERO, "0")]
    #[case(Exponent::ONE.scale(0.5).unwrap(), "1/2")]
    #[case(Exponent::from_int(-1).scale(1.0 / 3.0).unwrap(), "-1/3")]
    fn test_display_reduces_fraction(#[case] e: Exponent, #[case] expected: &str) {
        assert_eq!(e.to_string(), expected);
    }

    #[test]
    fn test_halving_and_thirding_are_exact() {
        let one = Exponent::ONE;
        let half = one.scale(0.5).unwrap();
        assert_eq!(half.checked_add(half), Some(one));

        let third = one.scale(1.0 / 3.0).unwrap();
        let two_thirds = third.checked_add(third).unwrap();
        assert_eq!(two_thirds.checked_add(third), Some(one));
        assert_eq!(one.checked_sub(third), Some(two_thirds));
    }

    #[test]
    fn test_overflow_is_not_clamped() {
        let big = Exponent::from_f64(80_000.0).unwrap();
        assert_eq!(big.checked_add(big), None);
        assert_eq!(Exponent::ZERO.checked_sub(big).and_then(|n| n.checked_sub(big)), None);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(Exponent::from_f64(1e12).is_none());
        assert!(Exponent::from_f64(f64::NAN).is_none());
        assert!(Exponent::ONE.scale(1e12).is_none());
        // Zero scales to zero for any factor.
        assert_eq!(Exponent::ZERO.scale(1e12), Some(Exponent::ZERO));
    }
}
