use std::sync::OnceLock;

use num_rational::BigRational;
use tracing::trace;

use super::{Derived, Expression, normalize, scalar::Scalar};

/// Two expressions multiplied together, e.g. `N·m`.
#[derive(Clone, Debug)]
pub struct Product {
    left: Box<Expression>,
    right: Box<Expression>,
    derived: OnceLock<Derived>,
}

impl Product {
    pub fn new(left: Expression, right: Expression) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
            derived: OnceLock::new(),
        }
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }

    /// Exact product of both sides' factors.
    pub fn factor(&self) -> &BigRational {
        &self.derived().factor
    }

    pub fn symbol(&self) -> &str {
        &self.derived().symbol
    }

    /// The normalized union of both sides' scalar factors.
    pub fn factors(&self) -> &[Scalar] {
        &self.derived().factors
    }

    fn derived(&self) -> &Derived {
        self.derived.get_or_init(|| {
            let factors = normalize::multiply_factors(self.left.factors(), self.right.factors());
            let symbol = normalize::render(&factors);
            trace!(left = %self.left, right = %self.right, %symbol, "normalized product");
            Derived {
                factor: self.left.factor() * self.right.factor(),
                factors,
                symbol,
            }
        })
    }
}
