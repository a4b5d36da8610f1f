//! Parser for calculator expressions.
//!
//! ```text
//! expr        := addExpr ( "in" target )?
//! addExpr     := mulExpr ( ("+"|"-") mulExpr )*
//! mulExpr     := powExpr ( ("*"|"/") powExpr )*
//! powExpr     := unary ( "^" unary )?
//! unary       := "-"? atom
//! atom        := call | "(" expr ( "," expr )? ")" | literal
//! call        := ident "(" expr ")"
//! literal     := number ( "%" | unitSymbol )?
//! unitSymbol  := letters ( "/" letters )?
//! target      := unitSymbol | "%"
//! ```

use std::collections::BTreeMap;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{
        alpha1, alphanumeric0, char, digit0, digit1, i32 as integer, multispace0, multispace1,
    },
    combinator::{map, map_opt, map_res, opt, recognize, value},
    multi::separated_list1,
    sequence::{delimited, pair, preceded},
};

use crate::{
    EvalError, Expression,
    equation::expression::ConversionTarget,
    units::Unit,
};

/// Longest piece of remaining input quoted in a parse error.
pub(crate) const FRAGMENT_LENGTH: usize = 20;

type Combine = fn(Expression, Expression) -> Expression;

/// Parse whitespace (spaces, tabs, newlines)
fn ws<'a, P, O>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse an unsigned decimal number, `12`, `12.` or `12.5`
fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

/// Parse a function name
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, alphanumeric0)).parse(input)
}

/// Parse a unit symbol as written in a literal: `km` or `km/h`
fn unit_symbol(input: &str) -> IResult<&str, Unit> {
    map(
        pair(alpha1, opt(preceded(char('/'), alpha1))),
        |(numerator, denominator): (&str, Option<&str>)| Unit::new([numerator], denominator),
    )
    .parse(input)
}

/// Parse the target of an `in` conversion
fn conversion_target(input: &str) -> IResult<&str, ConversionTarget> {
    alt((
        value(ConversionTarget::Percent, char('%')),
        map(unit_symbol, ConversionTarget::Unit),
    ))
    .parse(input)
}

/// Parse a trailing `in <target>` conversion
fn conversion(input: &str) -> IResult<&str, ConversionTarget> {
    delimited(
        (multispace0, tag("in"), multispace1),
        conversion_target,
        multispace0,
    )
    .parse(input)
}

/// Parse the unit of a measure literal.
///
/// `in` is both the inch abbreviation and the conversion keyword; when a
/// conversion target follows it, it is the keyword.
fn measure_unit(input: &str) -> IResult<&str, Unit> {
    let (rest, unit) = preceded(multispace0, unit_symbol).parse(input)?;
    if unit == Unit::symbol("in") && conversion(input).is_ok() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    Ok((rest, unit))
}

fn percent_sign(input: &str) -> IResult<&str, char> {
    preceded(multispace0, char('%')).parse(input)
}

/// Parse a number, percentage or measure literal
fn literal(input: &str) -> IResult<&str, Expression> {
    let (input, value) = number(input)?;

    if let Ok((rest, _)) = percent_sign(input) {
        return Ok((rest, Expression::percentage(value)));
    }
    if let Ok((rest, unit)) = measure_unit(input) {
        return Ok((rest, Expression::measure(value, unit)));
    }
    Ok((input, Expression::number(value)))
}

/// Parse a function call
fn function_call(input: &str) -> IResult<&str, Expression> {
    map(
        pair(
            identifier,
            delimited(ws(char('(')), expression, ws(char(')'))),
        ),
        |(name, argument)| Expression::function_call(name, argument),
    )
    .parse(input)
}

/// Parse a parenthesised expression or a pair
fn group(input: &str) -> IResult<&str, Expression> {
    let (input, first) = preceded(ws(char('(')), expression).parse(input)?;

    if let Ok((input, _)) = ws(char(')')).parse(input) {
        return Ok((input, Expression::parentheses(first)));
    }

    let (input, second) = delimited(ws(char(',')), expression, ws(char(')'))).parse(input)?;
    Ok((input, Expression::tuple(first, second)))
}

/// Parse primary expressions (atoms)
fn atom(input: &str) -> IResult<&str, Expression> {
    ws(alt((function_call, group, literal))).parse(input)
}

/// Parse an optionally negated atom
fn unary(input: &str) -> IResult<&str, Expression> {
    if let Ok((input, _)) = ws(char('-')).parse(input) {
        let (input, inner) = atom(input)?;
        return Ok((input, Expression::unary_minus(inner)));
    }
    atom(input)
}

/// Parse exponentiation (a single, non-associative `^`)
fn exponentiation(input: &str) -> IResult<&str, Expression> {
    let (input, base) = unary(input)?;

    if let Ok((input, _)) = ws(char('^')).parse(input) {
        let (input, exponent) = unary(input)?;
        Ok((input, Expression::exponentiation(base, exponent)))
    } else {
        Ok((input, base))
    }
}

/// Parse multiplication and division (left-associative)
fn multiplicative(input: &str) -> IResult<&str, Expression> {
    let (mut input, mut left) = exponentiation(input)?;

    loop {
        let op_result = alt((
            value(Expression::multiply as Combine, ws(char('*'))),
            value(Expression::divide as Combine, ws(char('/'))),
        ))
        .parse(input);

        if let Ok((new_input, combine)) = op_result {
            let (new_input, right) = exponentiation(new_input)?;
            input = new_input;
            left = combine(left, right);
        } else {
            break;
        }
    }

    Ok((input, left))
}

/// Parse addition and subtraction (left-associative)
fn additive(input: &str) -> IResult<&str, Expression> {
    let (mut input, mut left) = multiplicative(input)?;

    loop {
        let op_result = alt((
            value(Expression::add as Combine, ws(char('+'))),
            value(Expression::subtract as Combine, ws(char('-'))),
        ))
        .parse(input);

        if let Ok((new_input, combine)) = op_result {
            let (new_input, right) = multiplicative(new_input)?;
            input = new_input;
            left = combine(left, right);
        } else {
            break;
        }
    }

    Ok((input, left))
}

/// Parse a complete expression, including a trailing conversion
pub fn expression(input: &str) -> IResult<&str, Expression> {
    let (input, expr) = ws(additive).parse(input)?;

    if let Ok((input, target)) = conversion(input) {
        return Ok((input, Expression::conversion(expr, target)));
    }
    Ok((input, expr))
}

fn parse_error(full: &str, rest: &str, message: &str) -> EvalError {
    EvalError::Parse {
        offset: full.len() - rest.len(),
        fragment: rest.chars().take(FRAGMENT_LENGTH).collect(),
        message: message.to_string(),
    }
}

/// Parses `input` as a single expression, requiring all of it to be
/// consumed.
pub fn parse_expression(input: &str) -> Result<Expression, EvalError> {
    if input.trim().is_empty() {
        return Err(parse_error(input, input, "empty expression"));
    }
    match expression(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(parse_error(input, rest, "unexpected trailing input")),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(parse_error(input, e.input, "malformed expression"))
        }
        Err(nom::Err::Incomplete(_)) => Err(parse_error(input, "", "incomplete expression")),
    }
}

fn unit_factor(input: &str) -> IResult<&str, (&str, i32)> {
    pair(
        alpha1,
        map(opt(preceded(char('^'), integer)), |power| power.unwrap_or(1)),
    )
    .parse(input)
}

fn unit_factors(input: &str) -> IResult<&str, Vec<(&str, i32)>> {
    separated_list1(multispace1, unit_factor).parse(input)
}

/// Parse a unit in rendered form, `a^2 c / b d`, or literal form, `m/s`.
/// Either side may be missing; nothing at all is the dimensionless unit.
/// Exponents that do not fit in an `i32` once summed are rejected.
pub fn unit_expression(input: &str) -> IResult<&str, Unit> {
    map_opt(
        pair(
            opt(unit_factors),
            opt(preceded((multispace0, char('/'), multispace0), unit_factors)),
        ),
        |(numerator, denominator)| {
            let mut exponents = BTreeMap::new();
            let numerator = numerator.unwrap_or_default().into_iter();
            let denominator = denominator
                .unwrap_or_default()
                .into_iter()
                .map(|(name, power)| power.checked_neg().map(|power| (name, power)));
            for factor in numerator.map(Some).chain(denominator) {
                let (name, power) = factor?;
                let entry = exponents.entry(name.to_string()).or_insert(0i32);
                *entry = entry.checked_add(power)?;
            }
            Some(Unit::from_exponents(exponents))
        },
    )
    .parse(input)
}
