use serde::{Deserialize, Serialize};

use std::fmt;

use function::Function;

use crate::{equation::parse::parse_expression, units::Unit};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Literals
    Number(f64),
    /// The number in front of `%`, i.e. `15.0` for `15%`.
    Percentage(f64),
    /// A number followed by a unit symbol, with the unit as written.
    Measure(f64, Unit),
    Tuple(Box<Expression>, Box<Expression>),
    // Operators
    Parentheses(Box<Expression>),
    Exponentiation(Box<Expression>, Box<Expression>),
    UnaryMinus(Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Add(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    // Function Calls
    FunctionCall {
        name: String,
        argument: Box<Expression>,
    },
    // Conversions
    Conversion {
        expression: Box<Expression>,
        target: ConversionTarget,
    },
}

/// What an `in` conversion re-expresses its operand as.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionTarget {
    /// `5 meter in centimeter`
    Unit(Unit),
    /// `8 / 2 in %`
    Percent,
}

impl Expression {
    pub fn number(value: f64) -> Self {
        Expression::Number(value)
    }

    pub fn percentage(value: f64) -> Self {
        Expression::Percentage(value)
    }

    pub fn measure(value: f64, unit: Unit) -> Self {
        Expression::Measure(value, unit)
    }

    pub fn tuple(first: Expression, second: Expression) -> Self {
        Expression::Tuple(Box::new(first), Box::new(second))
    }

    pub fn parentheses(expr: Expression) -> Self {
        Expression::Parentheses(Box::new(expr))
    }

    pub fn exponentiation(base: Expression, exponent: Expression) -> Self {
        Expression::Exponentiation(Box::new(base), Box::new(exponent))
    }

    pub fn unary_minus(expr: Expression) -> Self {
        Expression::UnaryMinus(Box::new(expr))
    }

    pub fn multiply(lhs: Expression, rhs: Expression) -> Self {
        Expression::Multiply(Box::new(lhs), Box::new(rhs))
    }

    pub fn divide(lhs: Expression, rhs: Expression) -> Self {
        Expression::Divide(Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: Expression, rhs: Expression) -> Self {
        Expression::Add(Box::new(lhs), Box::new(rhs))
    }

    pub fn subtract(lhs: Expression, rhs: Expression) -> Self {
        Expression::Subtract(Box::new(lhs), Box::new(rhs))
    }

    pub fn function_call<S: Into<String>>(name: S, argument: Expression) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            argument: Box::new(argument),
        }
    }

    pub fn conversion(expression: Expression, target: ConversionTarget) -> Self {
        Expression::Conversion {
            expression: Box::new(expression),
            target,
        }
    }

    /// The function a call refers to, if the name is a known one.
    pub fn function(&self) -> Option<Function> {
        match self {
            Expression::FunctionCall { name, .. } => Function::from_name(name),
            _ => None,
        }
    }
}

/// Writes a unit the way it appears in a literal, `km/h` rather than
/// `km / h`.
fn write_literal_unit(f: &mut fmt::Formatter<'_>, unit: &Unit) -> fmt::Result {
    write!(f, "{}", unit.numerator().join(" "))?;
    let denominator = unit.denominator();
    if !denominator.is_empty() {
        write!(f, "/{}", denominator.join(" "))?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(value) => write!(f, "{}", value),
            Expression::Percentage(value) => write!(f, "{}%", value),
            Expression::Measure(value, unit) if unit.is_empty() => write!(f, "{}", value),
            Expression::Measure(value, unit) => {
                write!(f, "{} ", value)?;
                write_literal_unit(f, unit)
            }
            Expression::Tuple(first, second) => write!(f, "({}, {})", first, second),
            Expression::Parentheses(expr) => write!(f, "({})", expr),
            Expression::Exponentiation(base, exponent) => write!(f, "{} ^ {}", base, exponent),
            Expression::UnaryMinus(expr) => write!(f, "-{}", expr),
            Expression::Multiply(lhs, rhs) => write!(f, "{} * {}", lhs, rhs),
            Expression::Divide(lhs, rhs) => write!(f, "{} / {}", lhs, rhs),
            Expression::Add(lhs, rhs) => write!(f, "{} + {}", lhs, rhs),
            Expression::Subtract(lhs, rhs) => write!(f, "{} - {}", lhs, rhs),
            Expression::FunctionCall { name, argument } => write!(f, "{}({})", name, argument),
            Expression::Conversion { expression, target } => {
                write!(f, "{} in {}", expression, target)
            }
        }
    }
}

impl fmt::Display for ConversionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionTarget::Unit(unit) => write_literal_unit(f, unit),
            ConversionTarget::Percent => write!(f, "%"),
        }
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Deserialize as a string, then parse the whole of it
        let s: String = Deserialize::deserialize(deserializer)?;
        parse_expression(&s).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Expression {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub mod function {
    //! ### Built-in functions
    //!
    //! Functions take a single parenthesised argument, e.g. `log10(4)`.
    //! Names are matched case-insensitively.
    //!
    //! | Function | Argument                      | Result               |
    //! |----------|-------------------------------|----------------------|
    //! | `log10`  | unitless, strictly positive   | number               |
    //! | `ln`     | unitless, strictly positive   | number               |
    //! | `sqrt`   | unitless, non-negative        | number               |
    //! | `abs`    | anything but a tuple          | same kind and unit   |

    use std::fmt;

    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub enum Function {
        Log10,
        Ln,
        Sqrt,
        Abs,
    }

    impl Function {
        pub fn from_name(name: &str) -> Option<Self> {
            match name.to_ascii_lowercase().as_str() {
                "log10" => Some(Function::Log10),
                "ln" => Some(Function::Ln),
                "sqrt" => Some(Function::Sqrt),
                "abs" => Some(Function::Abs),
                _ => None,
            }
        }

        pub fn name(&self) -> &'static str {
            match self {
                Function::Log10 => "log10",
                Function::Ln => "ln",
                Function::Sqrt => "sqrt",
                Function::Abs => "abs",
            }
        }
    }

    impl fmt::Display for Function {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.name())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_parser() {
        for input in [
            "100 + 15%",
            "5 meter in centimeter",
            "10 km/h * 2",
            "(2, 8)",
            "10 * log10(8 / 2)",
            "-(3 ^ 2)",
            "8 / 2 in %",
        ] {
            let parsed = parse_expression(input).unwrap();
            let reparsed = parse_expression(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "round trip of '{}'", input);
        }
    }

    #[test]
    fn test_function_lookup() {
        let call = Expression::function_call("LOG10", Expression::number(4.0));
        assert_eq!(call.function(), Some(Function::Log10));
        let unknown = Expression::function_call("cbrt", Expression::number(8.0));
        assert_eq!(unknown.function(), None);
    }
}
