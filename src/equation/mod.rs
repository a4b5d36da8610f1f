pub mod eval;
pub mod expression;
pub mod parse;

pub use eval::{Evaluator, EvaluatorOptions};
pub use expression::{ConversionTarget, Expression, function::Function};
pub use parse::parse_expression;
