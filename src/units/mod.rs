// A unit is a product of named symbols raised to integer powers, e.g.
// "kilometer/second" or "meter^2". Symbols are plain strings: the built-in
// tables in `tables` know how to reduce the common ones (abbreviations,
// SI prefixes, non-SI units) to a handful of base names, and everything else
// is kept as an opaque, already-canonical symbol.
//
// Internally the numerator and denominator multisets are stored as a single
// count map from symbol to signed exponent. Positive exponents belong to the
// numerator, negative ones to the denominator, and zero exponents are never
// stored. Common entries therefore cancel as soon as a unit is built, and
// structural equality is multiset equality.

pub mod normalize;
pub mod tables;

use std::{collections::BTreeMap, fmt, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{EvalError, equation::parse::unit_expression};

pub use normalize::normalize_symbol;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Unit {
    exponents: BTreeMap<String, i32>,
}

impl Unit {
    /// Builds a unit from numerator and denominator symbols, cancelling
    /// symbols that appear on both sides.
    pub fn new<N, D, S>(numerator: N, denominator: D) -> Self
    where
        N: IntoIterator<Item = S>,
        D: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut exponents = BTreeMap::new();
        for name in numerator {
            *exponents.entry(name.into()).or_insert(0) += 1;
        }
        for name in denominator {
            *exponents.entry(name.into()).or_insert(0) -= 1;
        }
        Self::from_exponents(exponents)
    }

    /// The empty unit, identity for multiplication.
    pub fn dimensionless() -> Self {
        Self::default()
    }

    /// A unit made of a single numerator symbol.
    pub fn symbol<S: Into<String>>(name: S) -> Self {
        Self::new([name.into()], [])
    }

    pub(crate) fn from_exponents(mut exponents: BTreeMap<String, i32>) -> Self {
        exponents.retain(|_, exponent| *exponent != 0);
        Unit { exponents }
    }

    pub fn is_empty(&self) -> bool {
        self.exponents.is_empty()
    }

    /// Numerator symbols, repeated by multiplicity, in symbol order.
    pub fn numerator(&self) -> Vec<&str> {
        self.side(|exponent| exponent)
    }

    /// Denominator symbols, repeated by multiplicity, in symbol order.
    pub fn denominator(&self) -> Vec<&str> {
        self.side(|exponent| -exponent)
    }

    fn side(&self, sign: impl Fn(i32) -> i32) -> Vec<&str> {
        self.exponents
            .iter()
            .filter(|(_, exponent)| sign(**exponent) > 0)
            .flat_map(|(name, exponent)| {
                std::iter::repeat_n(name.as_str(), sign(*exponent) as usize)
            })
            .collect()
    }

    /// Signed exponents of every symbol in the unit.
    pub fn exponents(&self) -> impl Iterator<Item = (&str, i32)> {
        self.exponents
            .iter()
            .map(|(name, exponent)| (name.as_str(), *exponent))
    }

    /// Fails with [`EvalError::UnitExponentOverflow`] if a combined exponent
    /// does not fit in an `i32`.
    pub fn multiply(&self, other: &Unit) -> Result<Unit, EvalError> {
        let mut exponents = self.exponents.clone();
        for (name, exponent) in &other.exponents {
            let entry = exponents.entry(name.clone()).or_insert(0);
            *entry = entry
                .checked_add(*exponent)
                .ok_or_else(|| overflow(format!("({}) * ({})", self, other)))?;
        }
        Ok(Self::from_exponents(exponents))
    }

    pub fn divide(&self, other: &Unit) -> Result<Unit, EvalError> {
        self.multiply(&other.reciprocal()?)
    }

    /// Swaps numerator and denominator.
    pub fn reciprocal(&self) -> Result<Unit, EvalError> {
        self.powi(-1)
    }

    /// Raises every symbol to `power`; a power of zero yields the empty unit.
    pub fn powi(&self, power: i32) -> Result<Unit, EvalError> {
        self.exponents
            .iter()
            .map(|(name, exponent)| {
                exponent
                    .checked_mul(power)
                    .map(|raised| (name.clone(), raised))
                    .ok_or_else(|| overflow(format!("({}) ^ {}", self, power)))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self::from_exponents)
    }
}

pub(crate) fn overflow(expression: String) -> EvalError {
    EvalError::UnitExponentOverflow { expression }
}

fn group_powers<'a>(factors: impl Iterator<Item = (&'a str, i32)>) -> String {
    factors
        .map(|(name, power)| match power {
            1 => name.to_string(),
            _ => format!("{}^{}", name, power),
        })
        .join(" ")
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numerator = group_powers(self.exponents().filter(|(_, e)| *e > 0));
        write!(f, "{}", numerator)?;

        let mut denominator = self
            .exponents()
            .filter(|(_, e)| *e < 0)
            .map(|(name, e)| (name, -e))
            .peekable();
        if denominator.peek().is_some() {
            write!(f, " / {}", group_powers(denominator))?;
        }
        Ok(())
    }
}

impl FromStr for Unit {
    type Err = EvalError;

    /// Parses a unit in rendered form (`"a^2 c / b d"`) or literal form
    /// (`"m/s"`). The empty string is the dimensionless unit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, unit) = unit_expression(s).map_err(|_| EvalError::Parse {
            offset: 0,
            fragment: s.to_string(),
            message: "invalid unit".to_string(),
        })?;
        if !rest.is_empty() {
            return Err(EvalError::Parse {
                offset: s.len() - rest.len(),
                fragment: rest.to_string(),
                message: "unexpected trailing characters after unit".to_string(),
            });
        }
        Ok(unit)
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Unit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
