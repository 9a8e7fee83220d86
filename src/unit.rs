use std::{cmp::Ordering, fmt};

use crate::{
    error::{UnitError, UnitResult},
    exponent::Exponent,
};

/// Display priority of well-known unit symbols: derived units, then SI base units,
/// then angles. Symbols missing from this list sort after all of them.
const DISPLAY_ORDER: &[&str] = &[
    // Derived
    "N", "J", "W", "Pa", "Hz", "C", "V", "Ω", "S", "F", "Wb", "T", "H", "Bq", "Gy", "Sv",
    "kat", "lm", "lx", "°C",
    // Base
    "g", "m", "s", "A", "K", "mol", "cd",
    // Angle
    "rad", "sr", "°", "′", "″",
];

fn display_rank(symbol: &str) -> usize {
    DISPLAY_ORDER
        .iter()
        .position(|&known| known == symbol)
        .unwrap_or(DISPLAY_ORDER.len())
}

/// A single unit symbol raised to an integer power, e.g. `m²` or `s⁻¹`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitToken {
    symbol: String,
    exponent: Exponent,
}

impl UnitToken {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_exponent(symbol, Exponent::ONE)
    }

    pub fn with_exponent(symbol: impl Into<String>, exponent: impl Into<Exponent>) -> Self {
        Self {
            symbol: symbol.into(),
            exponent: exponent.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn exponent(&self) -> Exponent {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.exponent.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.exponent.is_positive()
    }

    /// Combine two tokens of the same symbol by adding their exponents.
    ///
    /// Return
    /// ------
    /// Err if the symbols differ (e.g. `m` and `s`).
    pub fn multiply(&self, other: &Self) -> UnitResult<Self> {
        self.check_compatible(other)?;
        Ok(self.multiply_unchecked(other))
    }

    /// Combine two tokens of the same symbol by subtracting their exponents.
    ///
    /// Return
    /// ------
    /// Err if the symbols differ.
    pub fn divide(&self, other: &Self) -> UnitResult<Self> {
        self.check_compatible(other)?;
        Ok(self.divide_unchecked(other))
    }

    #[must_use]
    pub fn invert(&self) -> Self {
        Self::with_exponent(self.symbol.clone(), self.exponent.invert())
    }

    /// Multiply assuming both tokens share a symbol.
    #[inline(always)]
    pub(crate) fn multiply_unchecked(&self, other: &Self) -> Self {
        Self::with_exponent(self.symbol.clone(), self.exponent.add(other.exponent))
    }

    /// Divide assuming both tokens share a symbol.
    #[inline(always)]
    pub(crate) fn divide_unchecked(&self, other: &Self) -> Self {
        Self::with_exponent(self.symbol.clone(), self.exponent.subtract(other.exponent))
    }

    /// Display ordering of two tokens.
    ///
    /// Only the symbol participates: `m` and `m²` compare equal here even though they
    /// are not `==`. This is why `UnitToken` does not implement `Ord`; use this only to
    /// lay out rendered symbols, never to decide whether two tokens are the same.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        display_rank(&self.symbol).cmp(&display_rank(&other.symbol))
    }

    fn check_compatible(&self, other: &Self) -> UnitResult<()> {
        if self.symbol != other.symbol {
            return Err(UnitError::IncompatibleUnit {
                left: self.to_string(),
                right: other.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for UnitToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.symbol, self.exponent)
    }
}
