//! The unit-expression algebra: scalars, products and quotients.
//!
//! Every expression exposes an exact `factor` relative to its canonical form, a rendered
//! `symbol`, and a normalized set of irreducible scalar factors. Composite expressions
//! derive all three lazily from their children and cache them.

mod normalize;
mod product;
mod quotient;
mod scalar;

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use itertools::Itertools;
use num_rational::BigRational;

pub use product::Product;
pub use quotient::Quotient;
pub use scalar::Scalar;

use crate::{
    error::{UnitError, UnitResult},
    precision::Precision,
    prefix::Prefix,
    system::Scaled,
    unit::UnitToken,
};

/// Values computed once per composite expression.
#[derive(Clone, Debug)]
pub(crate) struct Derived {
    factor: BigRational,
    factors: Vec<Scalar>,
    symbol: String,
}

/// A unit expression tree.
///
/// Equality and hashing only look at the rendered symbol, so differently built trees that
/// render the same text are interchangeable.
#[derive(Clone, Debug)]
pub enum Expression {
    Scalar(Scalar),
    Product(Product),
    Quotient(Quotient),
}

impl Expression {
    pub fn scalar(prefix: Prefix, unit: UnitToken) -> Self {
        Self::Scalar(Scalar::new(prefix, unit))
    }

    /// Exact scale of this expression relative to its canonical form.
    pub fn factor(&self) -> &BigRational {
        match self {
            Self::Scalar(s) => s.factor(),
            Self::Product(p) => p.factor(),
            Self::Quotient(q) => q.factor(),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Scalar(s) => s.symbol(),
            Self::Product(p) => p.symbol(),
            Self::Quotient(q) => q.symbol(),
        }
    }

    /// The normalized, irreducible scalar components of this expression.
    pub fn factors(&self) -> &[Scalar] {
        match self {
            Self::Scalar(s) => std::slice::from_ref(s),
            Self::Product(p) => p.factors(),
            Self::Quotient(q) => q.factors(),
        }
    }

    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self::Product(Product::new(self.clone(), other.clone()))
    }

    /// Divide, rounding the resulting factor with the default [`Precision`].
    #[must_use]
    pub fn divide(&self, other: &Self) -> Self {
        self.divide_with(other, Precision::default())
    }

    #[must_use]
    pub fn divide_with(&self, other: &Self, precision: Precision) -> Self {
        Self::Quotient(Quotient::with_precision(self.clone(), other.clone(), precision))
    }

    /// Return true if every scalar in this tree uses its family's unscaled prefix and no
    /// overflow multiplier.
    pub fn is_canonical(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_canonical(),
            Self::Product(p) => p.left().is_canonical() && p.right().is_canonical(),
            Self::Quotient(q) => q.numerator().is_canonical() && q.denominator().is_canonical(),
        }
    }

    /// Return true if every unit cancelled out.
    pub fn is_dimensionless(&self) -> bool {
        self.factors().iter().all(|s| s.unit().is_zero())
    }

    /// The same tree with every scalar replaced by its canonical form, e.g. `km/ms -> m/s`.
    #[must_use]
    pub fn canonical(&self) -> Self {
        match self {
            Self::Scalar(s) => Self::Scalar(s.canonical()),
            Self::Product(p) => Self::Product(Product::new(p.left().canonical(), p.right().canonical())),
            Self::Quotient(q) => Self::Quotient(Quotient::with_precision(
                q.numerator().canonical(),
                q.denominator().canonical(),
                q.precision(),
            )),
        }
    }

    /// The net power of every unit symbol in this expression, sorted by symbol.
    ///
    /// Prefixes are ignored, so `km·m` and `m²` have the same dimensions.
    pub fn dimensions(&self) -> Vec<UnitToken> {
        self.factors()
            .iter()
            .map(|s| s.unit().clone())
            .sorted_by(|a, b| a.symbol().cmp(b.symbol()))
            .coalesce(|a, b| {
                if a.symbol() == b.symbol() {
                    Ok(a.multiply_unchecked(&b))
                } else {
                    Err((a, b))
                }
            })
            .filter(|u| !u.is_zero())
            .collect()
    }

    /// Return true if values in this expression can be converted into `other`.
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Multiplicative factor converting a value in this expression into `other`.
    ///
    /// Return
    /// ------
    /// Err if the expressions have different dimensions (e.g. `m/s` and `m`).
    pub fn conversion_factor(&self, other: &Self) -> UnitResult<BigRational> {
        if !self.is_compatible_with(other) {
            return Err(UnitError::IncompatibleUnit {
                left: self.symbol().to_string(),
                right: other.symbol().to_string(),
            });
        }
        Ok(self.factor() / other.factor())
    }
}

impl From<Scalar> for Expression {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Product> for Expression {
    fn from(product: Product) -> Self {
        Self::Product(product)
    }
}

impl From<Quotient> for Expression {
    fn from(quotient: Quotient) -> Self {
        Self::Quotient(quotient)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.symbol() == other.symbol()
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol().hash(state);
    }
}

impl Scaled for Expression {
    fn scale_factor(&self) -> BigRational {
        self.factor().clone()
    }

    fn is_canonical(&self) -> bool {
        Expression::is_canonical(self)
    }

    fn symbol(&self) -> String {
        Expression::symbol(self).to_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
