use std::{
    fmt,
    hash::{Hash, Hasher},
};

use num_rational::BigRational;
use num_traits::{One, Signed};

use crate::{
    error::{UnitError, UnitResult},
    prefix::{Prefix, metric},
    system::Scaled,
    unit::UnitToken,
};

/// Grouping key used while merging factors: identical keys render identical symbols.
pub(crate) type GroupKey = (&'static str, String, String);

/// The atomic expression: a prefix applied to a single unit token.
///
/// The prefix scales the whole token, so `km²` here means kilo-(square metre). Units
/// that need a scale no prefix can express (e.g. a reciprocal unit derived from an
/// inverted base unit) carry it in `overflow`.
#[derive(Clone, Debug)]
pub struct Scalar {
    prefix: Prefix,
    unit: UnitToken,
    overflow: BigRational,
    factor: BigRational,
    symbol: String,
}

impl Scalar {
    pub fn new(prefix: Prefix, unit: UnitToken) -> Self {
        Self::build(prefix, unit, BigRational::one())
    }

    /// An unprefixed metric scalar, e.g. `m` or `s²`.
    pub fn base(unit: UnitToken) -> Self {
        Self::new(metric::BASE, unit)
    }

    /// Return
    /// ------
    /// Err if the overflow multiplier is not strictly positive.
    pub fn with_overflow(prefix: Prefix, unit: UnitToken, overflow: BigRational) -> UnitResult<Self> {
        if !overflow.is_positive() {
            return Err(UnitError::InvalidOperation(format!(
                "Overflow multiplier for {}{} must be positive, got {}",
                prefix.symbol(),
                unit,
                overflow
            )));
        }
        Ok(Self::build(prefix, unit, overflow))
    }

    fn build(prefix: Prefix, unit: UnitToken, overflow: BigRational) -> Self {
        let factor = prefix.factor() * &overflow;
        let symbol = if unit.is_zero() {
            String::new()
        } else {
            format!("{}{}", prefix.symbol(), unit)
        };
        Self {
            prefix,
            unit,
            overflow,
            factor,
            symbol,
        }
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn unit(&self) -> &UnitToken {
        &self.unit
    }

    pub fn overflow(&self) -> &BigRational {
        &self.overflow
    }

    pub fn factor(&self) -> &BigRational {
        &self.factor
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Return true if this scalar uses its family's unscaled prefix and no overflow.
    pub fn is_canonical(&self) -> bool {
        self.prefix.is_canonical() && self.overflow.is_one()
    }

    /// The same unit without any scaling, e.g. `km -> m`.
    #[must_use]
    pub fn canonical(&self) -> Self {
        Self::new(*self.prefix.family().system().canonical(), self.unit.clone())
    }

    /// Combine with another scalar of the same unit symbol, adding exponents.
    ///
    /// Return
    /// ------
    /// Err if the unit symbols differ.
    pub fn multiply(&self, other: &Self) -> UnitResult<Self> {
        let unit = self.unit.multiply(&other.unit)?;
        Ok(self.rescaled(unit, self.prefix.multiply(&other.prefix), &other.overflow, true))
    }

    /// Combine with another scalar of the same unit symbol, subtracting exponents.
    ///
    /// Return
    /// ------
    /// Err if the unit symbols differ.
    pub fn divide(&self, other: &Self) -> UnitResult<Self> {
        let unit = self.unit.divide(&other.unit)?;
        Ok(self.rescaled(unit, self.prefix.divide(&other.prefix), &other.overflow, false))
    }

    /// Same prefix, inverted exponent.
    #[must_use]
    pub fn invert(&self) -> Self {
        Self::build(self.prefix, self.unit.invert(), self.overflow.clone())
    }

    pub(crate) fn multiply_unchecked(&self, other: &Self) -> Self {
        let unit = self.unit.multiply_unchecked(&other.unit);
        self.rescaled(unit, self.prefix.multiply(&other.prefix), &other.overflow, true)
    }

    pub(crate) fn divide_unchecked(&self, other: &Self) -> Self {
        let unit = self.unit.divide_unchecked(&other.unit);
        self.rescaled(unit, self.prefix.divide(&other.prefix), &other.overflow, false)
    }

    pub(crate) fn group_key(&self) -> GroupKey {
        (
            self.prefix.symbol(),
            self.unit.symbol().to_string(),
            self.unit.exponent().to_string(),
        )
    }

    fn rescaled(
        &self,
        unit: UnitToken,
        (prefix, surplus): (Prefix, BigRational),
        other_overflow: &BigRational,
        multiply: bool,
    ) -> Self {
        let overflow = if multiply {
            &self.overflow * other_overflow
        } else {
            &self.overflow / other_overflow
        };
        Self::build(prefix, unit, overflow * surplus)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl Scaled for Scalar {
    fn scale_factor(&self) -> BigRational {
        self.factor.clone()
    }

    fn is_canonical(&self) -> bool {
        Scalar::is_canonical(self)
    }

    fn symbol(&self) -> String {
        self.symbol.clone()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

//==================================================
// Unit tests
//==================================================
#[cfg(test)]
mod test_scalar {
    use test_case::case;

    use super::*;
    use crate::{
        prefix::binary,
        test_utils::{ratio, scalar},
    };

    #[case(metric::KILO, "m", 1, "km"; "Kilometre")]
    #[case(metric::MICRO, "s", 1, "µs"; "Microsecond")]
    #[case(metric::BASE, "m", 2, "m²"; "Square metre")]
    #[case(metric::BASE, "s", -2, "s⁻²"; "Inverse square second")]
    #[case(binary::MEBI, "B", 1, "MiB"; "Mebibyte")]
    #[case(metric::KILO, "m", 0, ""; "Zero exponent")]
    fn test_symbol(prefix: Prefix, symbol: &str, exponent: i32, expected: &str) {
        let s = Scalar::new(prefix, UnitToken::with_exponent(symbol, exponent));
        assert_eq!(s.symbol(), expected);
    }

    #[test]
    fn test_factor_includes_overflow() -> UnitResult<()> {
        let s = Scalar::with_overflow(metric::KILO, UnitToken::with_exponent("H", -1), ratio(3, 2))?;
        assert_eq!(*s.factor(), ratio(1500, 1));
        assert_eq!(s.symbol(), "kH");
        assert!(!s.is_canonical());
        Ok(())
    }

    #[test]
    fn test_non_positive_overflow_is_rejected() {
        let result = Scalar::with_overflow(metric::BASE, UnitToken::new("H"), ratio(0, 1));
        assert!(matches!(result, Err(UnitError::InvalidOperation(_))));
    }

    #[test]
    fn test_multiply_combines_prefix_and_exponent() -> UnitResult<()> {
        let km = scalar(metric::KILO, "m");
        let product = km.multiply(&km)?;

        assert_eq!(product.symbol(), "Mm²");
        assert_eq!(*product.factor(), ratio(1_000_000, 1));
        Ok(())
    }

    #[test]
    fn test_multiply_without_prefix_moves_scale_into_overflow() -> UnitResult<()> {
        let hm = scalar(metric::HECTO, "m");
        let product = hm.multiply(&hm)?;

        assert_eq!(product.symbol(), "m²");
        assert_eq!(*product.overflow(), ratio(10_000, 1));
        assert_eq!(*product.factor(), ratio(10_000, 1));
        Ok(())
    }

    #[test]
    fn test_multiply_different_units_fails() {
        assert!(scalar(metric::KILO, "m").multiply(&scalar(metric::KILO, "s")).is_err());
    }

    #[test]
    fn test_divide_cancels() -> UnitResult<()> {
        let km = scalar(metric::KILO, "m");
        let quotient = km.divide(&km)?;

        assert!(quotient.unit().is_zero());
        assert_eq!(quotient.symbol(), "");
        assert!(quotient.is_canonical());
        Ok(())
    }

    #[test]
    fn test_equality_is_by_symbol() -> UnitResult<()> {
        let plain = scalar(metric::KILO, "m");
        let scaled = Scalar::with_overflow(metric::KILO, UnitToken::new("m"), ratio(2, 1))?;
        assert_eq!(plain, scaled);
        assert_ne!(plain, scalar(metric::MILLI, "m"));
        Ok(())
    }

    #[test]
    fn test_canonical() {
        assert_eq!(scalar(binary::KIBI, "B").canonical(), scalar(binary::BASE, "B"));
        assert!(scalar(metric::MILLI, "s").canonical().is_canonical());
    }
}
