use std::{cmp::Ordering, fmt};

use bitcode::{Decode, Encode};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;

use crate::system::{PrefixSystem, Scaled, BINARY, DECIMAL, METRIC};

/// The scale families a prefix can belong to.
#[derive(Encode, Decode, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// Powers of 2 (kibi, mebi, ...).
    Binary,
    /// Powers of 10 (milli, kilo, ...).
    Metric,
    /// Powers of 1000, for quantities that only step in thousands (kB, MB, ...).
    Decimal,
}

impl Family {
    pub const fn base(self) -> u32 {
        match self {
            Family::Binary => 2,
            Family::Metric => 10,
            Family::Decimal => 1000,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Family::Binary => "binary",
            Family::Metric => "metric",
            Family::Decimal => "decimal",
        }
    }

    /// The registry holding every prefix of this family.
    pub fn system(self) -> &'static PrefixSystem {
        match self {
            Family::Binary => &*BINARY,
            Family::Metric => &*METRIC,
            Family::Decimal => &*DECIMAL,
        }
    }
}

/// Exact `base^power`, with a reciprocal for negative powers.
pub(crate) fn exact_pow(base: u32, power: i32) -> BigRational {
    let magnitude: BigInt = num_traits::pow(BigInt::from(base), power.unsigned_abs() as usize);
    if power < 0 {
        BigRational::new(BigInt::one(), magnitude)
    } else {
        BigRational::from_integer(magnitude)
    }
}

/// A named multiplicative scale, `factor = base^power`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Prefix {
    family: Family,
    power: i32,
    symbol: &'static str,
    name: &'static str,
}

impl Prefix {
    pub const fn new(family: Family, power: i32, symbol: &'static str, name: &'static str) -> Self {
        Self {
            family,
            power,
            symbol,
            name,
        }
    }

    pub const fn family(&self) -> Family {
        self.family
    }

    pub const fn power(&self) -> i32 {
        self.power
    }

    pub const fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub fn factor(&self) -> BigRational {
        exact_pow(self.family.base(), self.power)
    }

    pub const fn is_canonical(&self) -> bool {
        self.power == 0
    }

    /// Multiplicative factor converting a value expressed with this prefix into `other`.
    ///
    /// e.g. `kilo.scale(&milli) == 10^6`
    pub fn scale(&self, other: &Self) -> BigRational {
        if self.family == other.family {
            exact_pow(self.family.base(), self.power - other.power)
        } else {
            self.factor() / other.factor()
        }
    }

    /// Product of two prefixes re-expressed in this prefix's family.
    ///
    /// Return
    /// ------
    /// The resulting prefix and any remaining multiplier that has no prefix of its own
    /// (e.g. `hecto * hecto` has no metric symbol, so it becomes the canonical prefix
    /// with a surplus of `10^4`).
    pub fn multiply(&self, other: &Self) -> (Self, BigRational) {
        if self.family == other.family {
            self.rescale_power(self.power + other.power)
        } else {
            self.rescale(self.factor() * other.factor())
        }
    }

    /// Quotient of two prefixes re-expressed in this prefix's family.
    pub fn divide(&self, other: &Self) -> (Self, BigRational) {
        if self.family == other.family {
            self.rescale_power(self.power - other.power)
        } else {
            self.rescale(self.factor() / other.factor())
        }
    }

    fn rescale_power(&self, power: i32) -> (Self, BigRational) {
        let system = self.family.system();
        match system.by_power(power) {
            Some(prefix) => (*prefix, BigRational::one()),
            None => (*system.canonical(), exact_pow(self.family.base(), power)),
        }
    }

    fn rescale(&self, factor: BigRational) -> (Self, BigRational) {
        let system = self.family.system();
        match system.iter().find(|p| p.factor() == factor) {
            Some(prefix) => (*prefix, BigRational::one()),
            None => (*system.canonical(), factor),
        }
    }
}

impl Ord for Prefix {
    fn cmp(&self, other: &Self) -> Ordering {
        self.power
            .cmp(&other.power)
            .then_with(|| self.family.cmp(&other.family))
    }
}

impl PartialOrd for Prefix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Scaled for Prefix {
    fn scale_factor(&self) -> BigRational {
        self.factor()
    }

    fn is_canonical(&self) -> bool {
        Prefix::is_canonical(self)
    }

    fn symbol(&self) -> String {
        self.symbol.to_string()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

/// Powers of 10.
pub mod metric {
    use super::{Family::Metric, Prefix};

    pub const QUECTO: Prefix = Prefix::new(Metric, -30, "q", "quecto");
    pub const RONTO: Prefix = Prefix::new(Metric, -27, "r", "ronto");
    pub const YOCTO: Prefix = Prefix::new(Metric, -24, "y", "yocto");
    pub const ZEPTO: Prefix = Prefix::new(Metric, -21, "z", "zepto");
    pub const ATTO: Prefix = Prefix::new(Metric, -18, "a", "atto");
    pub const FEMTO: Prefix = Prefix::new(Metric, -15, "f", "femto");
    pub const PICO: Prefix = Prefix::new(Metric, -12, "p", "pico");
    pub const NANO: Prefix = Prefix::new(Metric, -9, "n", "nano");
    pub const MICRO: Prefix = Prefix::new(Metric, -6, "µ", "micro");
    pub const MILLI: Prefix = Prefix::new(Metric, -3, "m", "milli");
    pub const CENTI: Prefix = Prefix::new(Metric, -2, "c", "centi");
    pub const DECI: Prefix = Prefix::new(Metric, -1, "d", "deci");
    pub const BASE: Prefix = Prefix::new(Metric, 0, "", "");
    pub const DECA: Prefix = Prefix::new(Metric, 1, "da", "deca");
    pub const HECTO: Prefix = Prefix::new(Metric, 2, "h", "hecto");
    pub const KILO: Prefix = Prefix::new(Metric, 3, "k", "kilo");
    pub const MEGA: Prefix = Prefix::new(Metric, 6, "M", "mega");
    pub const GIGA: Prefix = Prefix::new(Metric, 9, "G", "giga");
    pub const TERA: Prefix = Prefix::new(Metric, 12, "T", "tera");
    pub const PETA: Prefix = Prefix::new(Metric, 15, "P", "peta");
    pub const EXA: Prefix = Prefix::new(Metric, 18, "E", "exa");
    pub const ZETTA: Prefix = Prefix::new(Metric, 21, "Z", "zetta");
    pub const YOTTA: Prefix = Prefix::new(Metric, 24, "Y", "yotta");
    pub const RONNA: Prefix = Prefix::new(Metric, 27, "R", "ronna");
    pub const QUETTA: Prefix = Prefix::new(Metric, 30, "Q", "quetta");

    pub const ALL: [Prefix; 25] = [
        QUECTO, RONTO, YOCTO, ZEPTO, ATTO, FEMTO, PICO, NANO, MICRO, MILLI, CENTI, DECI, BASE,
        DECA, HECTO, KILO, MEGA, GIGA, TERA, PETA, EXA, ZETTA, YOTTA, RONNA, QUETTA,
    ];
}

/// Powers of 2, stepping by `2^10`.
pub mod binary {
    use super::{Family::Binary, Prefix};

    pub const BASE: Prefix = Prefix::new(Binary, 0, "", "");
    pub const KIBI: Prefix = Prefix::new(Binary, 10, "Ki", "kibi");
    pub const MEBI: Prefix = Prefix::new(Binary, 20, "Mi", "mebi");
    pub const GIBI: Prefix = Prefix::new(Binary, 30, "Gi", "gibi");
    pub const TEBI: Prefix = Prefix::new(Binary, 40, "Ti", "tebi");
    pub const PEBI: Prefix = Prefix::new(Binary, 50, "Pi", "pebi");
    pub const EXBI: Prefix = Prefix::new(Binary, 60, "Ei", "exbi");
    pub const ZEBI: Prefix = Prefix::new(Binary, 70, "Zi", "zebi");
    pub const YOBI: Prefix = Prefix::new(Binary, 80, "Yi", "yobi");

    pub const ALL: [Prefix; 9] = [BASE, KIBI, MEBI, GIBI, TEBI, PEBI, EXBI, ZEBI, YOBI];
}

/// Powers of 1000.
pub mod decimal {
    use super::{Family::Decimal, Prefix};

    pub const QUECTO: Prefix = Prefix::new(Decimal, -10, "q", "quecto");
    pub const RONTO: Prefix = Prefix::new(Decimal, -9, "r", "ronto");
    pub const YOCTO: Prefix = Prefix::new(Decimal, -8, "y", "yocto");
    pub const ZEPTO: Prefix = Prefix::new(Decimal, -7, "z", "zepto");
    pub const ATTO: Prefix = Prefix::new(Decimal, -6, "a", "atto");
    pub const FEMTO: Prefix = Prefix::new(Decimal, -5, "f", "femto");
    pub const PICO: Prefix = Prefix::new(Decimal, -4, "p", "pico");
    pub const NANO: Prefix = Prefix::new(Decimal, -3, "n", "nano");
    pub const MICRO: Prefix = Prefix::new(Decimal, -2, "µ", "micro");
    pub const MILLI: Prefix = Prefix::new(Decimal, -1, "m", "milli");
    pub const BASE: Prefix = Prefix::new(Decimal, 0, "", "");
    pub const KILO: Prefix = Prefix::new(Decimal, 1, "k", "kilo");
    pub const MEGA: Prefix = Prefix::new(Decimal, 2, "M", "mega");
    pub const GIGA: Prefix = Prefix::new(Decimal, 3, "G", "giga");
    pub const TERA: Prefix = Prefix::new(Decimal, 4, "T", "tera");
    pub const PETA: Prefix = Prefix::new(Decimal, 5, "P", "peta");
    pub const EXA: Prefix = Prefix::new(Decimal, 6, "E", "exa");
    pub const ZETTA: Prefix = Prefix::new(Decimal, 7, "Z", "zetta");
    pub const YOTTA: Prefix = Prefix::new(Decimal, 8, "Y", "yotta");
    pub const RONNA: Prefix = Prefix::new(Decimal, 9, "R", "ronna");
    pub const QUETTA: Prefix = Prefix::new(Decimal, 10, "Q", "quetta");

    pub const ALL: [Prefix; 21] = [
        QUECTO, RONTO, YOCTO, ZEPTO, ATTO, FEMTO, PICO, NANO, MICRO, MILLI, BASE, KILO, MEGA,
        GIGA, TERA, PETA, EXA, ZETTA, YOTTA, RONNA, QUETTA,
    ];
}
