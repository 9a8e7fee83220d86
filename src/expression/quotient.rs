use std::sync::OnceLock;

use num_rational::BigRational;
use tracing::trace;

use super::{Derived, Expression, normalize, scalar::Scalar};
use crate::precision::Precision;

/// One expression divided by another, e.g. `m/s²`.
///
/// The factor is the only rounded value in the algebra: it is divided exactly and then
/// brought to this quotient's [`Precision`].
#[derive(Clone, Debug)]
pub struct Quotient {
    numerator: Box<Expression>,
    denominator: Box<Expression>,
    precision: Precision,
    derived: OnceLock<Derived>,
}

impl Quotient {
    pub fn new(numerator: Expression, denominator: Expression) -> Self {
        Self::with_precision(numerator, denominator, Precision::default())
    }

    pub fn with_precision(numerator: Expression, denominator: Expression, precision: Precision) -> Self {
        Self {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
            precision,
            derived: OnceLock::new(),
        }
    }

    pub fn numerator(&self) -> &Expression {
        &self.numerator
    }

    pub fn denominator(&self) -> &Expression {
        &self.denominator
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn factor(&self) -> &BigRational {
        &self.derived().factor
    }

    pub fn symbol(&self) -> &str {
        &self.derived().symbol
    }

    /// The signed factor set: denominator-only scalars appear with negative exponents.
    pub fn factors(&self) -> &[Scalar] {
        &self.derived().factors
    }

    fn derived(&self) -> &Derived {
        self.derived.get_or_init(|| {
            let factors =
                normalize::divide_factors(self.numerator.factors(), self.denominator.factors());
            let symbol = normalize::render(&factors);
            trace!(
                numerator = %self.numerator,
                denominator = %self.denominator,
                %symbol,
                "normalized quotient"
            );
            // Scalar factors are strictly positive, so the denominator is never zero.
            let exact = self.numerator.factor() / self.denominator.factor();
            Derived {
                factor: self.precision.round(&exact),
                factors,
                symbol,
            }
        })
    }
}

//==================================================
// Unit tests
//==================================================
#[cfg(test)]
mod test_quotient {
    use test_case::case;

    use super::*;
    use crate::{
        expression::Product,
        precision::Rounding,
        prefix::{binary, metric},
        test_utils::{base_expr, base_pow, ratio, scalar_expr},
        unit::UnitToken,
    };

    #[case(base_expr("m"), base_expr("s"), "m/s", ratio(1, 1); "Velocity")]
    #[case(scalar_expr(metric::KILO, "m"), scalar_expr(metric::BASE, "s"), "km/s", ratio(1000, 1); "Kilometres per second")]
    #[case(base_expr("m"), base_expr("m"), "", ratio(1, 1); "Self cancels")]
    #[case(scalar_expr(metric::KILO, "m"), base_expr("m"), "", ratio(1000, 1); "Scaled cancel keeps factor")]
    #[case(scalar_expr(binary::MEBI, "B"), scalar_expr(metric::MILLI, "s"), "MiB/ms", ratio(1_048_576_000, 1); "Throughput")]
    fn test_quotient(numerator: Expression, denominator: Expression, symbol: &str, factor: BigRational) {
        let quotient = Quotient::new(numerator, denominator);
        assert_eq!(quotient.symbol(), symbol);
        assert_eq!(*quotient.factor(), factor);
    }

    #[test]
    fn test_acceleration() {
        let seconds = Expression::from(Product::new(base_expr("s"), base_expr("s")));
        let quotient = Quotient::new(base_expr("m"), seconds);
        assert_eq!(quotient.symbol(), "m/s²");
    }

    #[test]
    fn test_pressure() {
        let area = Expression::from(Product::new(
            base_expr("m"),
            Expression::from(Product::new(base_expr("s"), base_expr("s"))),
        ));
        let quotient = Quotient::new(scalar_expr(metric::KILO, "g"), area);
        assert_eq!(quotient.symbol(), "kg/(m·s²)");
        assert_eq!(*quotient.factor(), ratio(1000, 1));
    }

    #[test]
    fn test_division_by_quotient_flips() {
        let left = Expression::from(Quotient::new(base_expr("N"), base_expr("m")));
        let right = Expression::from(Quotient::new(base_expr("s"), base_expr("A")));

        let quotient = Quotient::new(left, right);

        assert_eq!(quotient.symbol(), "(N·A)/(m·s)");
    }

    #[test]
    fn test_only_denominator() {
        let quotient = Quotient::new(Expression::from(base_pow("s", 0)), base_expr("s"));
        assert_eq!(quotient.symbol(), "1/s");
    }

    #[test]
    fn test_factor_is_rounded_to_precision() {
        let three_seconds = Expression::from(
            Scalar::with_overflow(metric::BASE, UnitToken::new("s"), ratio(3, 1))
                .expect("positive overflow"),
        );
        let precision = Precision::new(3, Rounding::HalfEven);

        let quotient = Quotient::with_precision(base_expr("m"), three_seconds, precision);

        assert_eq!(*quotient.factor(), ratio(333, 1000));
        assert_eq!(quotient.precision(), precision);
    }

    #[test]
    fn test_nested_quotient_signed_factors() {
        let inner = Expression::from(Quotient::new(base_expr("m"), base_expr("s")));
        let quotient = Quotient::new(inner, base_expr("s"));

        let exponents = quotient
            .factors()
            .iter()
            .map(|s| s.unit().exponent().value())
            .collect::<Vec<_>>();
        assert_eq!(exponents, vec![1, -1, -1]);
        assert_eq!(quotient.symbol(), "m/(s·s)");
    }
}
