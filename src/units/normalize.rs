//! # Unit normalization
//!
//! Reduces unit symbols to canonical base names plus a scale multiplier,
//! e.g. `km` becomes `(1000, "meter")` and `hour` becomes `(3600, "second")`.
//!
//! Each pass over a symbol applies, in order:
//!
//! 1. expansion of a unit abbreviation (`km` is not one, `m` is),
//! 2. replacement of a non-SI unit by its base unit and factor,
//! 3. expansion of a one-letter prefix in front of a unit abbreviation
//!    (`km` becomes `kilometer`),
//! 4. removal of a leading SI prefix name (`kilometer` becomes `meter`).
//!
//! Passes repeat until the name stops changing. Every step either swaps the
//! name through a finite table lookup or strips a prefix, and the table of
//! non-SI units is acyclic, so only a handful of passes ever run. The pass
//! count is nonetheless capped at [`MAX_PASSES`].
//!
//! Normalization never fails: symbols no table knows are returned unchanged
//! with a multiplier of one.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::EvalError;

use super::{
    Unit, overflow,
    tables::{ALTERNATIVE_UNITS, SI_PREFIX_ABBREVIATIONS, SI_PREFIXES, UNIT_ABBREVIATIONS},
};

/// Names that every chain of table lookups ends in.
pub const BASE_UNITS: [&str; 4] = ["meter", "gram", "second", "bit"];

pub const MAX_PASSES: usize = 32;

/// Normalizes a single symbol to `(multiplier, canonical name)`.
///
/// A value of `1 <symbol>` equals `multiplier <canonical name>`.
///
/// ```rust
/// use quantcalc::units::normalize_symbol;
///
/// assert_eq!(normalize_symbol("km"), (1000.0, "meter".to_string()));
/// assert_eq!(normalize_symbol("B"), (8.0, "bit".to_string()));
/// assert_eq!(normalize_symbol("unknown"), (1.0, "unknown".to_string()));
/// ```
pub fn normalize_symbol(name: &str) -> (f64, String) {
    let mut multiplier = 1.0;
    let mut current = name.to_string();

    for pass in 0..MAX_PASSES {
        let (factor, next) = normalize_once(&current);
        if next == current {
            break;
        }
        trace!(
            "pass {}: '{}' -> {} '{}'",
            pass, current, factor, next
        );
        multiplier *= factor;
        current = next;
    }

    if current == name && !BASE_UNITS.contains(&name) {
        debug!("Unit symbol '{}' is not recognised, keeping it as-is", name);
    }

    (multiplier, current)
}

fn normalize_once(name: &str) -> (f64, String) {
    let mut multiplier = 1.0;
    let mut name = UNIT_ABBREVIATIONS
        .get(name)
        .copied()
        .unwrap_or(name)
        .to_string();

    if let Some((factor, base)) = ALTERNATIVE_UNITS.get(name.as_str()) {
        multiplier *= factor;
        name = base.to_string();
    }

    if let Some(expanded) = expand_abbreviated_prefix(&name) {
        name = expanded;
    }

    let prefix = SI_PREFIXES
        .entries()
        .find(|(prefix, _)| name.len() > prefix.len() && name.starts_with(**prefix));
    if let Some((prefix, factor)) = prefix {
        multiplier *= factor;
        name = name[prefix.len()..].to_string();
    }

    (multiplier, name)
}

/// Expands e.g. `ms` to `millisecond`, but only when both halves are
/// abbreviations.
fn expand_abbreviated_prefix(name: &str) -> Option<String> {
    SI_PREFIX_ABBREVIATIONS
        .entries()
        .find_map(|(short, long)| {
            let unit = UNIT_ABBREVIATIONS.get(name.strip_prefix(short)?)?;
            Some(format!("{}{}", long, unit))
        })
}

impl Unit {
    /// Normalizes every symbol, returning the combined multiplier and the
    /// unit made of canonical names.
    ///
    /// Numerator multipliers multiply the total, denominator multipliers
    /// divide it; symbols that become equal after normalization cancel.
    ///
    /// Merging symbols can push an exponent out of range, which fails with
    /// [`EvalError::UnitExponentOverflow`].
    pub fn normalize(&self) -> Result<(f64, Unit), EvalError> {
        let mut multiplier = 1.0;
        let mut exponents: BTreeMap<String, i32> = BTreeMap::new();
        for (name, exponent) in self.exponents() {
            let (factor, canonical) = normalize_symbol(name);
            multiplier *= factor.powi(exponent);
            let entry = exponents.entry(canonical).or_insert(0);
            *entry = entry
                .checked_add(exponent)
                .ok_or_else(|| overflow(self.to_string()))?;
        }
        Ok((multiplier, Unit::from_exponents(exponents)))
    }
}
