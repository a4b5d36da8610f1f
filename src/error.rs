use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors that can occur while evaluating or expanding an expression.
///
/// Every variant carries the rendered operands or the offending input
/// fragment so callers can show the user what went wrong. None of them are
/// fatal beyond the single evaluation that produced them.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalError {
    /// The input text could not be parsed.
    ///
    /// `offset` is the byte offset into the input where parsing stopped and
    /// `fragment` the text starting there (possibly truncated).
    #[error("Parse error at offset {offset} near '{fragment}': {message}")]
    Parse {
        offset: usize,
        fragment: String,
        message: String,
    },

    /// Addition or subtraction of two measures whose units differ.
    #[error("Unit mismatch: cannot {operation} '{left}' and '{right}'")]
    UnitMismatch {
        operation: &'static str,
        left: String,
        right: String,
    },

    /// A conversion target that is not dimensionally equal to the measure.
    #[error("Incompatible units: '{value}' cannot be expressed in '{target}'")]
    IncompatibleUnits { value: String, target: String },

    /// A conversion applied to something that cannot be converted.
    #[error("Invalid conversion: '{value}' cannot be converted to '{target}'")]
    InvalidConversionTarget { value: String, target: String },

    /// An exponent that carries a unit.
    #[error("Exponent must be unitless: '{exponent}'")]
    ExponentMustBeUnitless { exponent: String },

    /// A measure with a unit raised to a non-integer power.
    #[error("Unit of '{base}' cannot be raised to the fractional power {exponent}")]
    FractionalUnitExponent { base: String, exponent: String },

    /// A unit exponent that no longer fits in an `i32`.
    #[error("Unit exponent out of range: '{expression}'")]
    UnitExponentOverflow { expression: String },

    /// An operation whose result is infinite or not a number.
    #[error("Result is not a finite number: '{expression}'")]
    NonFiniteResult { expression: String },

    /// Division by a zero-valued operand.
    #[error("Division by zero: '{expression}'")]
    DivisionByZero { expression: String },

    /// A function argument outside the function's domain.
    #[error("Domain error: {function}({argument}) is undefined")]
    DomainError {
        function: &'static str,
        argument: String,
    },

    /// A call to a function the evaluator does not provide.
    #[error("Unknown function: '{name}'")]
    UnknownFunction { name: String },

    /// An operator applied to operand kinds it has no meaning for.
    #[error("Unsupported operation: {operation} is not defined for '{operand}'")]
    UnsupportedOperation {
        operation: &'static str,
        operand: String,
    },
}
