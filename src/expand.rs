//! # Result expansion
//!
//! Derives a few related results from a top-level result by building an
//! expression around it and feeding its text back through the [`Evaluator`]:
//!
//! | Result        | Derived                                     | Source text            |
//! |---------------|---------------------------------------------|------------------------|
//! | `p%`          | complement, `100% - p%`                     | `100% - 15%`           |
//! |               | inverse, `1 / p%`                           | `1 / 15%`              |
//! | `(a, b)`      | ratio of `b` to `a` as a percentage         | `8 / 2 in %`           |
//! |               | ratio of `a` to `b` as a percentage         | `2 / 8 in %`           |
//! |               | the ratio of `b` to `a` in decibels         | `10 * log10(8 / 2)`    |
//!
//! Other results have nothing to expand. Derived results are never expanded
//! themselves, and a derived expression that fails (say, a decibel value for
//! a negative ratio) only fails its own entry.
//!
//! Operands are written with [`source_expression`], not with the display
//! form of a value: `16 meter^2` is how a result is shown, but as input it
//! means `(16 meter)^2`.

use serde::Serialize;

use crate::{
    EvalError, Evaluator, Expression, Measure, Unit, Value,
    equation::expression::ConversionTarget,
};

/// One derived result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Derived {
    pub label: &'static str,
    /// Expression text that evaluates to `value`.
    pub source: String,
    pub value: Result<Value, EvalError>,
}

impl Evaluator {
    /// Derives related results from `result`, one level deep.
    pub fn expand(&self, result: &Value) -> Vec<Derived> {
        derived_expressions(result)
            .into_iter()
            .map(|(label, expression)| {
                let source = expression.to_string();
                let value = self.evaluate(&source);
                if let Err(e) = &value {
                    log::debug!("Derived expression '{}' failed: {}", source, e);
                }
                Derived {
                    label,
                    source,
                    value,
                }
            })
            .collect()
    }
}

fn derived_expressions(result: &Value) -> Vec<(&'static str, Expression)> {
    match result {
        Value::Percentage(_) => {
            let p = source_expression(result);
            vec![
                (
                    "Complement",
                    Expression::subtract(Expression::percentage(100.0), p.clone()),
                ),
                ("Inverse", Expression::divide(Expression::number(1.0), p)),
            ]
        }
        Value::Tuple(a, b) => {
            let (a, b) = (source_expression(a), source_expression(b));
            vec![
                (
                    "Ratio",
                    Expression::conversion(
                        Expression::divide(b.clone(), a.clone()),
                        ConversionTarget::Percent,
                    ),
                ),
                (
                    "Inverse ratio",
                    Expression::conversion(
                        Expression::divide(a.clone(), b.clone()),
                        ConversionTarget::Percent,
                    ),
                ),
                (
                    "Decibels",
                    Expression::multiply(
                        Expression::number(10.0),
                        Expression::function_call("log10", Expression::divide(b, a)),
                    ),
                ),
            ]
        }
        Value::Number(_) | Value::Measure(_) => Vec::new(),
    }
}

/// An expression that evaluates back to `value` and can stand as an operand
/// of any operator.
///
/// Measures in canonical units come back exactly. Measures labelled with a
/// conversion target (`500 cm`) are re-converted to that label. Any other
/// non-canonical unit is written through its canonical equivalent.
pub fn source_expression(value: &Value) -> Expression {
    match value {
        Value::Number(n) => Expression::number(*n),
        Value::Percentage(p) => Expression::percentage(p.fraction * 100.0),
        Value::Measure(m) => measure_expression(m),
        Value::Tuple(first, second) => {
            Expression::tuple(source_expression(first), source_expression(second))
        }
    }
}

fn measure_expression(measure: &Measure) -> Expression {
    let unit = &measure.unit;
    let canonical = unit
        .normalize()
        .is_ok_and(|(multiplier, normalized)| multiplier == 1.0 && normalized == *unit);

    match (canonical, is_literal_unit(unit)) {
        (true, true) => Expression::measure(measure.value, unit.clone()),
        // The inner parentheses keep a trailing `1 in` from reading as a conversion.
        (false, true) => Expression::parentheses(Expression::conversion(
            Expression::parentheses(unit_product(measure)),
            ConversionTarget::Unit(unit.clone()),
        )),
        _ => Expression::parentheses(unit_product(measure)),
    }
}

/// Whether a measure literal can carry `unit`: one numerator symbol and at
/// most one denominator symbol, letters only.
fn is_literal_unit(unit: &Unit) -> bool {
    unit.numerator().len() == 1
        && unit.denominator().len() <= 1
        && unit
            .exponents()
            .all(|(name, _)| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic()))
}

/// `value * 1 a ^ 2 / 1 b`, one unit literal per symbol.
fn unit_product(measure: &Measure) -> Expression {
    measure
        .unit
        .exponents()
        .fold(Expression::number(measure.value), |product, (name, exponent)| {
            let one = Expression::measure(1.0, Unit::symbol(name));
            let factor = match exponent.unsigned_abs() {
                1 => one,
                power => Expression::exponentiation(one, Expression::number(f64::from(power))),
            };
            if exponent > 0 {
                Expression::multiply(product, factor)
            } else {
                Expression::divide(product, factor)
            }
        })
}
