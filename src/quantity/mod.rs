pub mod measure;
pub mod numeric;
pub mod percentage;

use std::fmt;

use serde::Serialize;

use crate::{EvalError, Result};

pub use measure::Measure;
pub use numeric::format_number;
pub use percentage::Percentage;

/// The result of evaluating an expression.
///
/// Arithmetic dispatches on the kinds of both operands with exhaustive
/// matches, so every combination is either defined or an explicit error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(f64),
    Measure(Measure),
    Percentage(Percentage),
    /// An ordered pair, only meaningful to the result expander.
    Tuple(Box<Value>, Box<Value>),
}

/// How an operand takes part in multiplication, division and powers.
enum Factor<'a> {
    Scalar(f64),
    Measure(&'a Measure),
    Unsupported,
}

impl Value {
    pub fn tuple(first: Value, second: Value) -> Self {
        Value::Tuple(Box::new(first), Box::new(second))
    }

    /// Percentages take part in products as their bare fraction.
    fn factor(&self) -> Factor<'_> {
        match self {
            Value::Number(n) => Factor::Scalar(*n),
            Value::Percentage(p) => Factor::Scalar(p.fraction),
            Value::Measure(m) => Factor::Measure(m),
            Value::Tuple(..) => Factor::Unsupported,
        }
    }

    fn unsupported(&self, operation: &'static str) -> EvalError {
        EvalError::UnsupportedOperation {
            operation,
            operand: self.to_string(),
        }
    }

    /// Whether every number in the value is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Number(n) => n.is_finite(),
            Value::Measure(m) => m.value.is_finite(),
            Value::Percentage(p) => p.fraction.is_finite(),
            Value::Tuple(first, second) => first.is_finite() && second.is_finite(),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::Number(n) => *n == 0.0,
            Value::Percentage(p) => p.fraction == 0.0,
            Value::Measure(m) => m.value == 0.0,
            Value::Tuple(..) => false,
        }
    }

    pub fn add(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Tuple(..), _) => Err(self.unsupported("addition")),
            (_, Value::Tuple(..)) => Err(rhs.unsupported("addition")),
            (_, Value::Percentage(p)) => percentage::add_to_base(self, *p),
            (Value::Percentage(_), _) => Err(self.unsupported("adding to a percentage")),
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Measure(a), Value::Measure(b)) => a.add(b).map(Value::from),
            (Value::Measure(a), Value::Number(b)) => Ok(Value::from(a.add_scalar(*b))),
            (Value::Number(a), Value::Measure(b)) => Ok(Value::from(b.add_scalar(*a))),
        }
    }

    pub fn subtract(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Tuple(..), _) => Err(self.unsupported("subtraction")),
            (_, Value::Tuple(..)) => Err(rhs.unsupported("subtraction")),
            (_, Value::Percentage(p)) => percentage::subtract_from_base(self, *p),
            (Value::Percentage(_), _) => Err(self.unsupported("subtracting from a percentage")),
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
            (Value::Measure(a), Value::Measure(b)) => a.subtract(b).map(Value::from),
            (Value::Measure(a), Value::Number(b)) => Ok(Value::from(a.subtract_scalar(*b))),
            (Value::Number(a), Value::Measure(b)) => {
                Ok(Value::from(Measure::new(a - b.value, b.unit.clone())))
            }
        }
    }

    pub fn multiply(&self, rhs: &Value) -> Result<Value> {
        match (self.factor(), rhs.factor()) {
            (Factor::Unsupported, _) => Err(self.unsupported("multiplication")),
            (_, Factor::Unsupported) => Err(rhs.unsupported("multiplication")),
            (Factor::Scalar(a), Factor::Scalar(b)) => Ok(Value::Number(a * b)),
            (Factor::Measure(m), Factor::Scalar(s)) | (Factor::Scalar(s), Factor::Measure(m)) => {
                Ok(Value::from(m.scale(s)))
            }
            (Factor::Measure(a), Factor::Measure(b)) => a.multiply(b).map(Value::from),
        }
    }

    pub fn divide(&self, rhs: &Value) -> Result<Value> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero {
                expression: format!("{} / {}", self, rhs),
            });
        }
        match (self.factor(), rhs.factor()) {
            (Factor::Unsupported, _) => Err(self.unsupported("division")),
            (_, Factor::Unsupported) => Err(rhs.unsupported("division")),
            (Factor::Scalar(a), Factor::Scalar(b)) => Ok(Value::Number(a / b)),
            (Factor::Measure(m), Factor::Scalar(s)) => m.divide_scalar(s).map(Value::from),
            (Factor::Scalar(s), Factor::Measure(m)) => Ok(Value::from(Measure::new(
                s / m.value,
                m.unit.reciprocal()?,
            ))),
            (Factor::Measure(a), Factor::Measure(b)) => a.divide(b).map(Value::from),
        }
    }

    /// Raises `self` to `exponent`, which must not carry a unit.
    pub fn power(&self, exponent: &Value) -> Result<Value> {
        let exponent = match exponent.factor() {
            Factor::Scalar(n) => n,
            Factor::Measure(_) => {
                return Err(EvalError::ExponentMustBeUnitless {
                    exponent: exponent.to_string(),
                });
            }
            Factor::Unsupported => return Err(exponent.unsupported("exponentiation")),
        };
        match self.factor() {
            Factor::Scalar(base) => {
                if base == 0.0 && exponent < 0.0 {
                    return Err(EvalError::DivisionByZero {
                        expression: format!("{} ^ {}", self, format_number(exponent)),
                    });
                }
                Ok(Value::Number(base.powf(exponent)))
            }
            Factor::Measure(m) => m.powf(exponent).map(Value::from),
            Factor::Unsupported => Err(self.unsupported("exponentiation")),
        }
    }

    pub fn negate(&self) -> Result<Value> {
        match self {
            Value::Number(n) => Ok(Value::Number(-n)),
            Value::Measure(m) => Ok(Value::Measure(m.scale(-1.0))),
            Value::Percentage(p) => Ok(Value::Percentage(Percentage::new(-p.fraction))),
            Value::Tuple(..) => Err(self.unsupported("negation")),
        }
    }
}

/// A measure whose unit cancelled out is a plain number.
impl From<Measure> for Value {
    fn from(measure: Measure) -> Self {
        if measure.unit.is_empty() {
            Value::Number(measure.value)
        } else {
            Value::Measure(measure)
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<Percentage> for Value {
    fn from(percentage: Percentage) -> Self {
        Value::Percentage(percentage)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Measure(m) => write!(f, "{}", m),
            Value::Percentage(p) => write!(f, "{}", p),
            Value::Tuple(first, second) => write!(f, "({}, {})", first, second),
        }
    }
}
