use std::sync::LazyLock;

use num_rational::BigRational;
use tracing::debug;

use crate::{
    error::{UnitError, UnitResult},
    expression::{Expression, Scalar},
    prefix::{Prefix, binary, decimal, metric},
    unit::UnitToken,
};

/// Something with an exact scale relative to an unscaled, canonical member of its family.
pub trait Scaled {
    fn scale_factor(&self) -> BigRational;

    fn is_canonical(&self) -> bool;

    fn symbol(&self) -> String;
}

/// The closed, ordered set of variants of one family, with a designated canonical member.
///
/// Members are sorted ascending by their scale factor. Every system has exactly one
/// canonical member, so `canonical`, `smallest` and `largest` are always available.
#[derive(Clone, Debug)]
pub struct System<T> {
    name: String,
    members: Vec<T>,
    canonical: usize,
}

pub type PrefixSystem = System<Prefix>;
pub type ScalarSystem = System<Scalar>;

pub static METRIC: LazyLock<PrefixSystem> = LazyLock::new(|| {
    System::new("metric", metric::ALL.to_vec()).expect("metric prefix table is malformed")
});
pub static BINARY: LazyLock<PrefixSystem> = LazyLock::new(|| {
    System::new("binary", binary::ALL.to_vec()).expect("binary prefix table is malformed")
});
pub static DECIMAL: LazyLock<PrefixSystem> = LazyLock::new(|| {
    System::new("decimal", decimal::ALL.to_vec()).expect("decimal prefix table is malformed")
});

impl<T: Scaled> System<T> {
    /// Build a system from every member of a family.
    ///
    /// Return
    /// ------
    /// Err if the members do not contain exactly one canonical member.
    pub fn new(name: impl Into<String>, mut members: Vec<T>) -> UnitResult<Self> {
        let name = name.into();
        let canonicals = members.iter().filter(|m| m.is_canonical()).count();
        if canonicals != 1 {
            return Err(UnitError::NoCanonicalPrefix {
                system: name,
                found: canonicals,
            });
        }

        members.sort_by_cached_key(|m| m.scale_factor());
        let canonical = members
            .iter()
            .position(|m| m.is_canonical())
            .unwrap_or_default();

        debug!(system = %name, members = members.len(), "built system");
        Ok(Self {
            name,
            members,
            canonical,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical(&self) -> &T {
        &self.members[self.canonical]
    }

    pub fn smallest(&self) -> &T {
        &self.members[0]
    }

    pub fn largest(&self) -> &T {
        &self.members[self.members.len() - 1]
    }

    /// Every member, ascending by scale factor.
    pub fn all(&self) -> &[T] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Look up a member by its rendered symbol.
    pub fn get(&self, symbol: &str) -> Option<&T> {
        self.members.iter().find(|m| m.symbol() == symbol)
    }

    /// Build the equivalent system for a composite expression by mapping every member
    /// through `combine` while the other side of the expression stays fixed.
    ///
    /// The canonical member of the result is the image of this system's canonical member.
    ///
    /// Examples
    /// --------
    /// `metres.composite(|m| Expression::from(m.clone()).divide(&second))` enumerates
    /// `qm/s` through `Qm/s`.
    pub fn composite<F>(&self, combine: F) -> System<Expression>
    where
        F: Fn(&T) -> Expression,
    {
        let mut members = self
            .members
            .iter()
            .enumerate()
            .map(|(idx, m)| (idx, combine(m)))
            .collect::<Vec<_>>();
        members.sort_by(|(_, a), (_, b)| a.factor().cmp(b.factor()));

        let canonical = members
            .iter()
            .position(|(idx, _)| *idx == self.canonical)
            .unwrap_or_default();
        let members = members.into_iter().map(|(_, e)| e).collect::<Vec<_>>();

        let name = members[canonical].symbol().to_string();
        debug!(system = %name, members = members.len(), "built composite system");
        System {
            name,
            members,
            canonical,
        }
    }
}

impl System<Prefix> {
    pub fn by_power(&self, power: i32) -> Option<&Prefix> {
        self.members
            .binary_search_by_key(&power, |p| p.power())
            .ok()
            .map(|idx| &self.members[idx])
    }
}

impl System<Scalar> {
    /// Every representable variant of a unit within one prefix family, e.g. `qm` to `Qm`.
    pub fn of_unit(prefixes: &PrefixSystem, unit: &UnitToken) -> Self {
        let members = prefixes
            .iter()
            .map(|&p| Scalar::new(p, unit.clone()))
            .collect::<Vec<_>>();
        let canonical = prefixes.canonical;

        debug!(unit = %unit, members = members.len(), "built scalar system");
        Self {
            name: unit.to_string(),
            members,
            canonical,
        }
    }
}
