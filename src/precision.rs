use std::num::NonZeroU64;

use bigdecimal::{BigDecimal, RoundingMode};
use bitcode::{Decode, Encode};
use num_rational::BigRational;
use num_traits::One;

use crate::prefix::exact_pow;

/// How a value is brought back to a fixed number of significant digits.
#[derive(Encode, Decode, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Ties go to the even neighbour (banker's rounding).
    #[default]
    HalfEven,
    /// Ties go away from zero.
    HalfUp,
    /// Truncate toward zero.
    Down,
}

impl From<Rounding> for RoundingMode {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::HalfEven => RoundingMode::HalfEven,
            Rounding::HalfUp => RoundingMode::HalfUp,
            Rounding::Down => RoundingMode::Down,
        }
    }
}

/// Number of significant decimal digits kept by a division, plus the tie-breaking rule.
///
/// Quotient factors are the only values that are ever rounded; everything else in the
/// algebra is an exact rational.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Precision {
    digits: u32,
    rounding: Rounding,
}

impl Default for Precision {
    fn default() -> Self {
        Self::DECIMAL128
    }
}

impl Precision {
    /// 34 significant digits, ties to even.
    pub const DECIMAL128: Self = Self::new(34, Rounding::HalfEven);
    /// 16 significant digits, ties to even.
    pub const DECIMAL64: Self = Self::new(16, Rounding::HalfEven);

    /// Most digits a precision may keep; divisions are carried to 100 digits before
    /// rounding.
    pub const MAX_DIGITS: u32 = 64;

    /// Digits are clamped to `1..=MAX_DIGITS`.
    pub const fn new(digits: u32, rounding: Rounding) -> Self {
        let digits = if digits == 0 {
            1
        } else if digits > Self::MAX_DIGITS {
            Self::MAX_DIGITS
        } else {
            digits
        };
        Self { digits, rounding }
    }

    /// Like [`Precision::new`], but rejects digit counts outside `1..=MAX_DIGITS`
    /// instead of clamping them.
    pub const fn checked(digits: u32, rounding: Rounding) -> Option<Self> {
        if digits == 0 || digits > Self::MAX_DIGITS {
            None
        } else {
            Some(Self { digits, rounding })
        }
    }

    pub const fn digits(&self) -> u32 {
        self.digits
    }

    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Round a value to this many significant decimal digits.
    pub fn round(&self, value: &BigRational) -> BigRational {
        let (mantissa, scale) = self.to_decimal(value).into_bigint_and_exponent();
        // `scale` is bounded by the magnitude of `value` plus `MAX_DIGITS`.
        let scale = i32::try_from(scale).unwrap_or(if scale < 0 { i32::MIN } else { i32::MAX });
        BigRational::from_integer(mantissa) * exact_pow(10, scale.saturating_neg())
    }

    /// Render a value as a plain decimal string with at most this many significant digits.
    ///
    /// e.g. `1/8 -> "0.125"`, `1/3 -> "0.3333..."`, `1200 -> "1200"`
    pub fn format(&self, value: &BigRational) -> String {
        self.to_decimal(value).normalized().to_plain_string()
    }

    fn to_decimal(&self, value: &BigRational) -> BigDecimal {
        let numer = BigDecimal::from(value.numer().clone());
        let exact = if value.denom().is_one() {
            numer
        } else {
            numer / BigDecimal::from(value.denom().clone())
        };
        let digits = NonZeroU64::new(u64::from(self.digits)).unwrap_or(NonZeroU64::MIN);
        exact.with_precision_round(digits, self.rounding.into())
    }
}
