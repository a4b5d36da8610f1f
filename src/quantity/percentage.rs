//! Percentages with increase/decrease semantics.
//!
//! A percentage on the right-hand side of `+` or `-` scales the left-hand
//! side instead of being added to it: `100 + 15%` is `115` and
//! `5 km - 10%` is `4.5 km`. Two percentages combine additively
//! (`100% - 15%` is `85%`). Multiplication and division treat a percentage
//! as its bare fraction, so `100 * 15%` is `15`.

use std::fmt;

use serde::Serialize;

use crate::{EvalError, Result, Value, quantity::numeric::format_number};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentage {
    /// The decimal ratio, `0.15` for `15%`.
    pub fraction: f64,
}

impl Percentage {
    pub fn new(fraction: f64) -> Self {
        Percentage { fraction }
    }

    /// Builds a percentage from its literal number, `15` for `15%`.
    pub fn from_percent(percent: f64) -> Self {
        Percentage::new(percent / 100.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", format_number(self.fraction * 100.0))
    }
}

/// `base + pct`: an increase of `base` by `pct`, or the sum of two
/// percentages.
pub fn add_to_base(base: &Value, pct: Percentage) -> Result<Value> {
    shift(base, pct.fraction, "addition")
}

/// `base - pct`: a decrease of `base` by `pct`, or the difference of two
/// percentages.
pub fn subtract_from_base(base: &Value, pct: Percentage) -> Result<Value> {
    shift(base, -pct.fraction, "subtraction")
}

fn shift(base: &Value, delta: f64, operation: &'static str) -> Result<Value> {
    match base {
        Value::Percentage(p) => Ok(Value::Percentage(Percentage::new(p.fraction + delta))),
        Value::Number(n) => Ok(Value::Number(n * (1.0 + delta))),
        Value::Measure(m) => Ok(Value::from(m.scale(1.0 + delta))),
        Value::Tuple(..) => Err(EvalError::UnsupportedOperation {
            operation,
            operand: base.to_string(),
        }),
    }
}
