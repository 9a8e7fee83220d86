//! Exact, prefix-aware algebra over unit expressions.
//!
//! Units are built bottom-up: an [`Exponent`] raises a [`UnitToken`], a [`Prefix`] scales
//! it into a [`Scalar`], and scalars combine into products and quotients of arbitrary
//! depth. Every [`Expression`] reports an exact conversion `factor` relative to its
//! canonical form along with a normalized, human-readable `symbol`.
//!
//! ```
//! use measura::{Expression, Scalar, UnitToken, prefix::metric};
//!
//! let km = Expression::from(Scalar::new(metric::KILO, UnitToken::new("m")));
//! let ms = Expression::from(Scalar::new(metric::MILLI, UnitToken::new("s")));
//!
//! let speed = km.divide(&ms);
//! assert_eq!(speed.symbol(), "km/ms");
//! assert_eq!(speed.to_string(), "km/ms");
//! ```

pub mod codec;
pub mod error;
pub mod exponent;
pub mod expression;
pub mod precision;
pub mod prefix;
pub mod quantity;
pub mod system;
pub mod unit;

#[cfg(test)]
mod test_utils;

pub use error::{UnitError, UnitResult};
pub use exponent::Exponent;
pub use expression::{Expression, Product, Quotient, Scalar};
pub use precision::{Precision, Rounding};
pub use prefix::{Family, Prefix};
pub use quantity::Quantity;
pub use system::{PrefixSystem, ScalarSystem, Scaled, System};
pub use unit::UnitToken;
