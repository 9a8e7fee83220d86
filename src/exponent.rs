use std::fmt;

use bitcode::{Decode, Encode};

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
const SUPERSCRIPT_MINUS: char = '⁻';

/// Integer power attached to a unit token, e.g. the `2` in `m²`.
///
/// Arithmetic wraps on overflow so every operation is total over `i32`.
#[derive(Encode, Decode, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Exponent(i32);

impl Exponent {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub const fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }

    #[must_use]
    pub const fn subtract(self, other: Self) -> Self {
        Self(self.0.wrapping_sub(other.0))
    }

    #[must_use]
    pub const fn invert(self) -> Self {
        Self(self.0.wrapping_neg())
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for Exponent {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

/// Powers of magnitude one are implicit: `m¹` and `m⁻¹` both render as `m`.
impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        if magnitude <= 1 {
            return Ok(());
        }
        if self.0 < 0 {
            write!(f, "{}", SUPERSCRIPT_MINUS)?;
        }
        magnitude
            .to_string()
            .bytes()
            .try_for_each(|b| write!(f, "{}", SUPERSCRIPT_DIGITS[usize::from(b - b'0')]))
    }
}

//==================================================
// Unit tests
//==================================================
#[cfg(test)]
mod test_exponent {
    use test_case::case;

    use super::*;

    #[case(0, ""; "Zero")]
    #[case(1, ""; "One")]
    #[case(-1, ""; "Negative one")]
    #[case(2, "²"; "Square")]
    #[case(-2, "⁻²"; "Inverse square")]
    #[case(10, "¹⁰"; "Multi digit")]
    #[case(-37, "⁻³⁷"; "Negative multi digit")]
    #[case(i32::MAX, "²¹⁴⁷⁴⁸³⁶⁴⁷"; "Max")]
    #[case(i32::MIN, "⁻²¹⁴⁷⁴⁸³⁶⁴⁸"; "Min")]
    fn test_display(value: i32, expected: &str) {
        assert_eq!(Exponent::new(value).to_string(), expected);
    }

    #[case(3, -7, 11; "Mixed signs")]
    #[case(0, 0, 0; "Zeros")]
    #[case(i32::MAX, 1, -5; "Wraps past max")]
    #[case(i32::MIN, -1, i32::MAX; "Wraps past min")]
    fn test_addition_is_an_abelian_group(a: i32, b: i32, c: i32) {
        let (a, b, c) = (Exponent::new(a), Exponent::new(b), Exponent::new(c));

        assert_eq!(a.add(b).add(c), a.add(b.add(c)));
        assert_eq!(a.add(b), b.add(a));
        assert_eq!(a.add(Exponent::ZERO), a);
        assert_eq!(a.add(a.invert()), Exponent::ZERO);
        assert_eq!(a.add(b).subtract(b), a);
    }

    #[test]
    fn test_invert_boundaries() {
        assert_eq!(Exponent::new(i32::MIN).invert(), Exponent::new(i32::MIN));
        assert_eq!(Exponent::new(i32::MAX).invert(), Exponent::new(-i32::MAX));
    }

    #[case(-3, false, false; "Negative")]
    #[case(0, false, true; "Zero")]
    #[case(4, true, false; "Positive")]
    fn test_sign(value: i32, positive: bool, zero: bool) {
        let exponent = Exponent::from(value);
        assert_eq!(exponent.is_positive(), positive);
        assert_eq!(exponent.is_zero(), zero);
    }
}
