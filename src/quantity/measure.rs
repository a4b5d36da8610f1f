use std::fmt;

use serde::Serialize;

use crate::{
    EvalError, Result,
    quantity::numeric::format_number,
    units::{Unit, overflow},
};

/// A number bound to a unit.
///
/// The value is always expressed in the unit that is attached to it. Measures
/// built from literals ([`Measure::from_literal`]) are normalized to
/// canonical units; only [`Measure::convert`] produces a measure labelled
/// with a non-canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measure {
    pub value: f64,
    pub unit: Unit,
}

impl Measure {
    pub fn new(value: f64, unit: Unit) -> Self {
        Measure { value, unit }
    }

    /// Builds a measure from a literal such as `5 km`, normalizing the unit
    /// and scaling the value accordingly (`5 km` becomes `5000 meter`).
    pub fn from_literal(value: f64, unit: &Unit) -> Result<Self> {
        let (multiplier, normalized) = unit.normalize()?;
        Ok(Measure::new(value * multiplier, normalized))
    }

    fn require_same_unit(&self, other: &Measure, operation: &'static str) -> Result<()> {
        if self.unit == other.unit {
            Ok(())
        } else {
            Err(EvalError::UnitMismatch {
                operation,
                left: self.to_string(),
                right: other.to_string(),
            })
        }
    }

    pub fn add(&self, other: &Measure) -> Result<Measure> {
        self.require_same_unit(other, "add")?;
        Ok(Measure::new(self.value + other.value, self.unit.clone()))
    }

    pub fn subtract(&self, other: &Measure) -> Result<Measure> {
        self.require_same_unit(other, "subtract")?;
        Ok(Measure::new(self.value - other.value, self.unit.clone()))
    }

    /// Adds a bare number, keeping the unit.
    pub fn add_scalar(&self, other: f64) -> Measure {
        Measure::new(self.value + other, self.unit.clone())
    }

    /// Subtracts a bare number, keeping the unit.
    pub fn subtract_scalar(&self, other: f64) -> Measure {
        Measure::new(self.value - other, self.unit.clone())
    }

    pub fn multiply(&self, other: &Measure) -> Result<Measure> {
        Ok(Measure::new(
            self.value * other.value,
            self.unit.multiply(&other.unit)?,
        ))
    }

    /// Multiplies by a bare number, keeping the unit.
    pub fn scale(&self, factor: f64) -> Measure {
        Measure::new(self.value * factor, self.unit.clone())
    }

    pub fn divide(&self, other: &Measure) -> Result<Measure> {
        if other.value == 0.0 {
            return Err(EvalError::DivisionByZero {
                expression: format!("{} / {}", self, other),
            });
        }
        Ok(Measure::new(
            self.value / other.value,
            self.unit.divide(&other.unit)?,
        ))
    }

    /// Divides by a bare number, keeping the unit.
    pub fn divide_scalar(&self, divisor: f64) -> Result<Measure> {
        if divisor == 0.0 {
            return Err(EvalError::DivisionByZero {
                expression: format!("{} / {}", self, format_number(divisor)),
            });
        }
        Ok(Measure::new(self.value / divisor, self.unit.clone()))
    }

    /// Raises the measure to `exponent`, raising the unit to the same power.
    ///
    /// Units only carry integer exponents, so a fractional exponent is an
    /// error unless the measure has no unit.
    pub fn powf(&self, exponent: f64) -> Result<Measure> {
        if self.value == 0.0 && exponent < 0.0 {
            return Err(EvalError::DivisionByZero {
                expression: format!("{} ^ {}", self, format_number(exponent)),
            });
        }
        if self.unit.is_empty() {
            return Ok(Measure::new(self.value.powf(exponent), Unit::dimensionless()));
        }
        if exponent.fract() != 0.0 {
            return Err(EvalError::FractionalUnitExponent {
                base: self.to_string(),
                exponent: format_number(exponent),
            });
        }
        if exponent.abs() > f64::from(i32::MAX) {
            return Err(overflow(format!("({}) ^ {}", self.unit, format_number(exponent))));
        }
        Ok(Measure::new(
            self.value.powf(exponent),
            self.unit.powi(exponent as i32)?,
        ))
    }

    /// Re-expresses the measure in `target`, which must be dimensionally
    /// equal to the measure's unit once both are normalized.
    ///
    /// The result is labelled with `target` exactly as given, e.g.
    /// `500 centimeter` rather than `5 meter`.
    pub fn convert(&self, target: &Unit) -> Result<Measure> {
        let (source_multiplier, source) = self.unit.normalize()?;
        let (target_multiplier, normalized) = target.normalize()?;
        if source != normalized {
            return Err(EvalError::IncompatibleUnits {
                value: self.to_string(),
                target: target.to_string(),
            });
        }
        Ok(Measure::new(
            self.value * source_multiplier / target_multiplier,
            target.clone(),
        ))
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", format_number(self.value))
        } else {
            let unit = self.unit.to_string();
            write!(f, "{} {}", format_number(self.value), unit.trim_start())
        }
    }
}
