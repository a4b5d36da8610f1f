//! Evaluates short arithmetic expressions over numbers, percentages and
//! physical quantities, e.g. `5 km`, `100 + 15%` or `5 meter in centimeter`.
//!
//! ```rust
//! let result = quantcalc::evaluate("15%").unwrap();
//! assert_eq!(quantcalc::render(&result), "15%");
//!
//! let derived = quantcalc::expand(&result);
//! assert_eq!(derived[0].source, "100% - 15%");
//! assert_eq!(quantcalc::render(derived[0].value.as_ref().unwrap()), "85%");
//! ```

pub mod equation;
pub mod error;
pub mod expand;
pub mod quantity;
pub mod units;

pub use crate::equation::{Evaluator, EvaluatorOptions, Expression};
pub use crate::error::{EvalError, Result};
pub use crate::expand::Derived;
pub use crate::quantity::{Measure, Percentage, Value};
pub use crate::units::Unit;

/// Evaluates `text` with the default [`EvaluatorOptions`].
pub fn evaluate(text: &str) -> Result<Value> {
    Evaluator::default().evaluate(text)
}

/// Derives related results from `result` with the default
/// [`EvaluatorOptions`].
pub fn expand(result: &Value) -> Vec<Derived> {
    Evaluator::default().expand(result)
}

/// Renders a result the way it is shown to users.
pub fn render(result: &Value) -> String {
    result.to_string()
}
