use std::fmt;

use num_rational::BigRational;
use num_traits::Zero;

use crate::{
    error::{UnitError, UnitResult},
    expression::Expression,
    precision::Precision,
};

/// A magnitude paired with the unit expression it is measured in.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    /// e.g. `5` in `5 km`.
    magnitude: BigRational,

    /// e.g. `km` in `5 km`.
    unit: Expression,
}

impl Quantity {
    pub fn new(magnitude: BigRational, unit: Expression) -> Self {
        Self { magnitude, unit }
    }

    pub fn magnitude(&self) -> &BigRational {
        &self.magnitude
    }

    pub fn unit(&self) -> &Expression {
        &self.unit
    }

    /// Return true if this quantity is expressed without any prefix scaling.
    pub fn is_canonical(&self) -> bool {
        self.unit.is_canonical()
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    pub fn is_compatible_with(&self, other: &Self) -> bool {
        self.unit.is_compatible_with(&other.unit)
    }

    /// Return the magnitude of this quantity converted to the target units.
    pub fn m_as(&self, unit: &Expression) -> UnitResult<BigRational> {
        Ok(&self.magnitude * self.unit.conversion_factor(unit)?)
    }

    /// Return a new quantity whose value is converted to the target units.
    pub fn to(&self, unit: &Expression) -> UnitResult<Self> {
        let mut q = self.clone();
        q.ito(unit)?;
        Ok(q)
    }

    /// In-place value conversion to the target units.
    ///
    /// Return
    /// ------
    /// Err if the target has different dimensions; the quantity is left untouched.
    pub fn ito(&mut self, unit: &Expression) -> UnitResult<()> {
        self.magnitude = self.m_as(unit)?;
        self.unit = unit.clone();
        Ok(())
    }

    /// The same quantity with every prefix removed, e.g. `5 km -> 5000 m`.
    pub fn to_canonical(&self) -> Self {
        let unit = self.unit.canonical();
        let magnitude = &self.magnitude * (self.unit.factor() / unit.factor());
        Self { magnitude, unit }
    }

    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            magnitude: &self.magnitude * &other.magnitude,
            unit: self.unit.multiply(&other.unit),
        }
    }

    /// Return
    /// ------
    /// Err if `other` has a zero magnitude.
    pub fn divide(&self, other: &Self) -> UnitResult<Self> {
        if other.magnitude.is_zero() {
            return Err(UnitError::InvalidOperation(format!(
                "Cannot divide {} by zero {}",
                self, other.unit
            )));
        }
        Ok(Self {
            magnitude: &self.magnitude / &other.magnitude,
            unit: self.unit.divide(&other.unit),
        })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = Precision::default().format(&self.magnitude);
        if self.unit.symbol().is_empty() {
            write!(f, "{magnitude}")
        } else {
            write!(f, "{} {}", magnitude, self.unit)
        }
    }
}
