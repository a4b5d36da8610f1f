//! # Expression evaluation
//!
//! [`Evaluator`] turns text into a [`Value`] in three steps: the input is
//! checked against the configured limits, parsed into an [`Expression`] and
//! then evaluated bottom-up. Each operator dispatches on the runtime kinds
//! of its operands (number, measure, percentage, tuple) through the
//! arithmetic in [`crate::quantity`].
//!
//! Evaluation is a pure function of the input text and the built-in unit
//! tables. An `Evaluator` holds nothing but its options, so one instance can
//! be shared freely between threads.
//!
//! ```rust
//! use quantcalc::{Evaluator, Value};
//!
//! let evaluator = Evaluator::default();
//! assert_eq!(evaluator.evaluate("10 km").unwrap().to_string(), "10000 meter");
//! assert_eq!(evaluator.evaluate("100 * 15%").unwrap(), Value::Number(15.0));
//! ```

use log::{debug, warn};

use crate::{
    EvalError, Expression, Result,
    equation::{
        expression::{ConversionTarget, function::Function},
        parse::{FRAGMENT_LENGTH, parse_expression},
    },
    quantity::{Measure, Percentage, Value},
};

/// Limits applied to input text before it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Longest accepted input, in characters.
    pub max_input_length: usize,
    /// Deepest accepted nesting of parentheses.
    pub max_nesting_depth: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        EvaluatorOptions {
            max_input_length: 1024,
            max_nesting_depth: 64,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    options: EvaluatorOptions,
}

impl Evaluator {
    pub fn new(options: EvaluatorOptions) -> Self {
        Evaluator { options }
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Parses `text` after checking it against the configured limits.
    pub fn parse(&self, text: &str) -> Result<Expression> {
        self.check_limits(text)?;
        parse_expression(text)
    }

    /// Parses and evaluates `text`.
    pub fn evaluate(&self, text: &str) -> Result<Value> {
        debug!("Evaluating '{}'", text);
        let expression = self.parse(text)?;
        let value = self.evaluate_expression(&expression)?;
        debug!("'{}' evaluated to {}", text, value);
        Ok(value)
    }

    /// Evaluates an already parsed expression.
    ///
    /// Every intermediate result must be finite; an overflow to infinity or
    /// NaN fails with [`EvalError::NonFiniteResult`] at the operation that
    /// produced it.
    pub fn evaluate_expression(&self, expression: &Expression) -> Result<Value> {
        let value = match expression {
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::Percentage(n) => Ok(Value::Percentage(Percentage::from_percent(*n))),
            Expression::Measure(n, unit) => Measure::from_literal(*n, unit).map(Value::from),
            Expression::Tuple(first, second) => Ok(Value::tuple(
                self.evaluate_expression(first)?,
                self.evaluate_expression(second)?,
            )),
            Expression::Parentheses(inner) => self.evaluate_expression(inner),
            Expression::UnaryMinus(inner) => self.evaluate_expression(inner)?.negate(),
            Expression::Exponentiation(base, exponent) => self
                .evaluate_expression(base)?
                .power(&self.evaluate_expression(exponent)?),
            Expression::Multiply(lhs, rhs) => self
                .evaluate_expression(lhs)?
                .multiply(&self.evaluate_expression(rhs)?),
            Expression::Divide(lhs, rhs) => self
                .evaluate_expression(lhs)?
                .divide(&self.evaluate_expression(rhs)?),
            Expression::Add(lhs, rhs) => self
                .evaluate_expression(lhs)?
                .add(&self.evaluate_expression(rhs)?),
            Expression::Subtract(lhs, rhs) => self
                .evaluate_expression(lhs)?
                .subtract(&self.evaluate_expression(rhs)?),
            Expression::FunctionCall { name, argument } => {
                let function = expression
                    .function()
                    .ok_or_else(|| EvalError::UnknownFunction { name: name.clone() })?;
                apply(function, &self.evaluate_expression(argument)?)
            }
            Expression::Conversion { expression, target } => {
                convert(self.evaluate_expression(expression)?, target)
            }
        }?;

        if value.is_finite() {
            Ok(value)
        } else {
            debug!("'{}' evaluated to non-finite {}", expression, value);
            Err(EvalError::NonFiniteResult {
                expression: expression.to_string(),
            })
        }
    }

    fn check_limits(&self, text: &str) -> Result<()> {
        let length = text.chars().count();
        if length > self.options.max_input_length {
            warn!(
                "Rejecting input of {} characters (limit {})",
                length, self.options.max_input_length
            );
            return Err(EvalError::Parse {
                offset: 0,
                fragment: text.chars().take(FRAGMENT_LENGTH).collect(),
                message: format!(
                    "input is longer than {} characters",
                    self.options.max_input_length
                ),
            });
        }

        let mut depth = 0usize;
        for (offset, ch) in text.char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => continue,
            }
            if depth > self.options.max_nesting_depth {
                warn!(
                    "Rejecting input nested deeper than {} parentheses",
                    self.options.max_nesting_depth
                );
                return Err(EvalError::Parse {
                    offset,
                    fragment: text[offset..].chars().take(FRAGMENT_LENGTH).collect(),
                    message: format!(
                        "parentheses nested deeper than {} levels",
                        self.options.max_nesting_depth
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The unitless number a function argument stands for, if any.
fn unitless(argument: &Value) -> Option<f64> {
    match argument {
        Value::Number(n) => Some(*n),
        Value::Percentage(p) => Some(p.fraction),
        Value::Measure(_) | Value::Tuple(..) => None,
    }
}

fn apply(function: Function, argument: &Value) -> Result<Value> {
    let domain_error = || EvalError::DomainError {
        function: function.name(),
        argument: argument.to_string(),
    };

    match function {
        Function::Abs => match argument {
            Value::Number(n) => Ok(Value::Number(n.abs())),
            Value::Measure(m) => Ok(Value::Measure(Measure::new(m.value.abs(), m.unit.clone()))),
            Value::Percentage(p) => Ok(Value::Percentage(Percentage::new(p.fraction.abs()))),
            Value::Tuple(..) => Err(EvalError::UnsupportedOperation {
                operation: "abs",
                operand: argument.to_string(),
            }),
        },
        Function::Log10 | Function::Ln => {
            let n = unitless(argument).filter(|n| *n > 0.0).ok_or_else(domain_error)?;
            Ok(Value::Number(match function {
                Function::Ln => n.ln(),
                _ => n.log10(),
            }))
        }
        Function::Sqrt => {
            let n = unitless(argument).filter(|n| *n >= 0.0).ok_or_else(domain_error)?;
            Ok(Value::Number(n.sqrt()))
        }
    }
}

fn convert(value: Value, target: &ConversionTarget) -> Result<Value> {
    match (value, target) {
        (Value::Measure(m), ConversionTarget::Unit(unit)) => Ok(Value::Measure(m.convert(unit)?)),
        (Value::Number(n), ConversionTarget::Percent) => {
            Ok(Value::Percentage(Percentage::new(n)))
        }
        (value @ Value::Percentage(_), ConversionTarget::Percent) => Ok(value),
        (value, target) => Err(EvalError::InvalidConversionTarget {
            value: value.to_string(),
            target: target.to_string(),
        }),
    }
}
