use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    expression::{Expression, Scalar},
    prefix::Prefix,
    unit::UnitToken,
};

/// Asserts that an exact rational renders as the given decimal string.
///
/// The default precision is `Precision::DECIMAL128`.
///
/// # Examples
///
/// ```ignore
/// assert_decimal!(ratio(1, 4), "0.25");
/// assert_decimal!(ratio(1, 3), "0.333", Precision::new(3, Rounding::HalfEven));
/// ```
#[macro_export]
macro_rules! assert_decimal {
    ($value:expr, $expected:expr) => {
        assert_eq!($crate::precision::Precision::default().format(&$value), $expected);
    };
    ($value:expr, $expected:expr, $precision:expr) => {
        assert_eq!($precision.format(&$value), $expected);
    };
}

pub fn ratio(numer: i64, denom: i64) -> BigRational {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

pub fn scalar(prefix: Prefix, symbol: &str) -> Scalar {
    Scalar::new(prefix, UnitToken::new(symbol))
}

pub fn base(symbol: &str) -> Scalar {
    Scalar::base(UnitToken::new(symbol))
}

pub fn base_pow(symbol: &str, exponent: i32) -> Scalar {
    Scalar::base(UnitToken::with_exponent(symbol, exponent))
}

pub fn scalar_expr(prefix: Prefix, symbol: &str) -> Expression {
    Expression::from(scalar(prefix, symbol))
}

pub fn base_expr(symbol: &str) -> Expression {
    Expression::from(base(symbol))
}
