//! Turns a formula string into a symbolic expression.
//!
//! The grammar is written with nom combinators:
//!
//! ```text
//! sum      := product (('+' | '-') product)*
//! product  := signed (('*' | '/') signed | power)*      implicit multiplication: 2x, x sin(x), (x+1)(x-1)
//! signed   := '-' signed | '+' signed | power
//! power    := primary ('^' signed)?                      right associative, '**' is accepted as '^'
//! primary  := number | '(' sum ')' | function | 'pi' | 'e' | 'x'
//! function := name ('^' primary)? ('(' sum ')' | power)  sin(x), sin x, sin^2(x)
//! ```
//!
//! `e^u` is read as the exponential function. Known function names are
//! sin, cos, tan/tg, cot/ctg, sec, csc, asin/arcsin, acos/arccos, atan/arctan/arctg,
//! acot/arccot/arcctg, sinh, cosh, tanh, exp, ln/log and sqrt. Any other identifier is
//! rejected, the calculus variable is `x`.
//!
//!# Example
//! ```
//! use RustedCalc::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("x^3 + 2x").unwrap();
//! assert_eq!(parsed_expression.to_raw_string(), "x**3 + 2*x");
//! ```
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::brackets_balanced;
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, opt, recognize},
    error::{Error as NomError, ErrorKind},
    multi::fold_many0,
    sequence::{pair, preceded, terminated},
};
use thiserror::Error;

/// the variable every formula is written in
pub const VARIABLE: &str = "x";

/// deepest bracket, sign, power and function nesting the parser descends into
pub const MAX_NESTING: usize = 100;
/// tallest tree handed to the engine; long chains of terms count too
pub const MAX_TREE_DEPTH: usize = 256;
const NESTED_TOO_DEEPLY: &str = "expression nested too deeply";

// longest names first so that "cosh" wins over "cos" and "exp" over "e"
const FUNCTION_NAMES: [&str; 26] = [
    "arcctg", "arcsin", "arccos", "arctan", "arccot", "arctg", "asin", "acos", "atan", "acot",
    "sinh", "cosh", "tanh", "sqrt", "exp", "sin", "cos", "tan", "cot", "ctg", "sec", "csc",
    "log", "tg", "ln", "lg",
];

/// Error returned for input that is not a well-formed formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse '{input}': {message}")]
pub struct ParseError {
    pub input: String,
    pub message: String,
}

impl ParseError {
    pub fn new(input: &str, message: impl Into<String>) -> Self {
        ParseError {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

pub fn parse_expression_func(input: &str) -> Result<Expr, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::new(input, "empty expression"));
    }
    if !brackets_balanced(trimmed) {
        return Err(ParseError::new(input, "unbalanced parentheses"));
    }
    let normalized = trimmed.replace("**", "^");
    match sum(&normalized, 0) {
        Ok((rest, expr)) => {
            let rest = rest.trim();
            if !rest.is_empty() {
                Err(ParseError::new(input, describe_rest(rest)))
            } else if expr.depth() > MAX_TREE_DEPTH {
                Err(ParseError::new(input, NESTED_TOO_DEEPLY))
            } else {
                Ok(expr)
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let message = match e.code {
                ErrorKind::TooLarge => NESTED_TOO_DEEPLY.to_string(),
                ErrorKind::Float => {
                    let literal: String = e.input.chars().take(24).collect();
                    format!("number out of range '{}'", literal.trim())
                }
                _ => describe_rest(e.input.trim()),
            };
            Err(ParseError::new(input, message))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::new(input, "unexpected end of input")),
    }
}

fn describe_rest(rest: &str) -> String {
    if rest.is_empty() {
        return "unexpected end of input".to_string();
    }
    let word: String = rest.chars().take_while(|c| c.is_alphabetic()).collect();
    if !word.is_empty() {
        return format!("unknown identifier '{}'", word);
    }
    let snippet: String = rest.chars().take(10).collect();
    format!("unexpected input '{}'", snippet)
}

fn sum(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, first) = product(input, depth)?;
    fold_many0(
        pair(preceded(multispace0, one_of("+-")), |i| product(i, depth)),
        move || first.clone(),
        |acc, (op, rhs)| {
            if op == '+' {
                Expr::Add(Box::new(acc), Box::new(rhs))
            } else {
                Expr::Sub(Box::new(acc), Box::new(rhs))
            }
        },
    )
    .parse(input)
}

fn product(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, first) = signed(input, depth)?;
    fold_many0(
        alt((
            pair(preceded(multispace0, one_of("*/")), |i| signed(i, depth)),
            // implicit multiplication
            map(|i| power(i, depth), |rhs| ('*', rhs)),
        )),
        move || first.clone(),
        |acc, (op, rhs)| {
            if op == '*' {
                Expr::Mul(Box::new(acc), Box::new(rhs))
            } else {
                Expr::Div(Box::new(acc), Box::new(rhs))
            }
        },
    )
    .parse(input)
}

/// one more level of nesting, a hard failure past `MAX_NESTING`
fn deeper(input: &str, depth: usize) -> Result<usize, nom::Err<NomError<&str>>> {
    if depth >= MAX_NESTING {
        Err(nom::Err::Failure(NomError::new(input, ErrorKind::TooLarge)))
    } else {
        Ok(depth + 1)
    }
}

fn signed(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    if let Some(rest) = input.strip_prefix('-') {
        let (rest, expr) = signed(rest, deeper(rest, depth)?)?;
        let negated = match expr {
            Expr::Const(c) => Expr::Const(-c),
            other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
        };
        return Ok((rest, negated));
    }
    if let Some(rest) = input.strip_prefix('+') {
        return signed(rest, deeper(rest, depth)?);
    }
    power(input, depth)
}

fn power(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, base) = primary(input, depth)?;
    let (after_caret, caret) = opt(preceded(multispace0, char('^'))).parse(input)?;
    if caret.is_none() {
        return Ok((input, base));
    }
    match signed(after_caret, deeper(after_caret, depth)?) {
        Ok((rest, exponent)) => Ok((rest, raise(base, exponent))),
        // a dangling '^' is left for the caller to report
        Err(nom::Err::Error(_)) => Ok((input, base)),
        Err(e) => Err(e),
    }
}

fn raise(base: Expr, exponent: Expr) -> Expr {
    if base == Expr::euler() {
        Expr::Exp(Box::new(exponent))
    } else {
        Expr::Pow(Box::new(base), Box::new(exponent))
    }
}

fn primary(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;
    alt((number, |i| parenthesized(i, depth), |i| identifier(i, depth))).parse(input)
}

/// `digits[.digits][(e|E)[+-]digits]`; an `e` without exponent digits is Euler's number
fn number(input: &str) -> IResult<&str, Expr> {
    let (rest, literal) = recognize((
        alt((
            recognize(pair(digit1, opt(pair(char('.'), opt(digit1))))),
            recognize(pair(char('.'), digit1)),
        )),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;
    match literal.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok((rest, Expr::Const(value))),
        _ => Err(nom::Err::Failure(NomError::new(input, ErrorKind::Float))),
    }
}

fn parenthesized(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, _) = char('(').parse(input)?;
    let depth = deeper(input, depth)?;
    terminated(|i| sum(i, depth), preceded(multispace0, char(')'))).parse(input)
}

fn identifier(input: &str, depth: usize) -> IResult<&str, Expr> {
    if let Some(name) = FUNCTION_NAMES.iter().find(|name| input.starts_with(**name)) {
        return function(&input[name.len()..], name, depth);
    }
    if let Some(rest) = input.strip_prefix("pi") {
        return Ok((rest, Expr::Pi));
    }
    if let Some(rest) = input.strip_prefix('e').or_else(|| input.strip_prefix('E')) {
        return Ok((rest, Expr::euler()));
    }
    if let Some(rest) = input.strip_prefix(VARIABLE) {
        return Ok((rest, Expr::var(VARIABLE)));
    }
    if input.starts_with(|c: char| c.is_alphabetic()) {
        // an unknown name is a hard error, not a point to backtrack from
        return Err(nom::Err::Failure(NomError::new(input, ErrorKind::Alpha)));
    }
    Err(nom::Err::Error(NomError::new(input, ErrorKind::Alt)))
}

fn function<'a>(input: &'a str, name: &str, depth: usize) -> IResult<&'a str, Expr> {
    let depth = deeper(input, depth)?;
    // sin^2(x)
    let (input, exponent) =
        opt(preceded(pair(multispace0, char('^')), |i| primary(i, depth))).parse(input)?;
    let (input, _) = multispace0(input)?;
    let (input, arg) = alt((|i| parenthesized(i, depth), |i| power(i, depth))).parse(input)?;
    let applied = apply_function(name, arg);
    match exponent {
        Some(exponent) => Ok((input, Expr::Pow(Box::new(applied), Box::new(exponent)))),
        None => Ok((input, applied)),
    }
}

fn apply_function(name: &str, arg: Expr) -> Expr {
    let arg = Box::new(arg);
    match name {
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "cot" | "ctg" => Expr::ctg(arg),
        "sec" => Expr::Pow(Box::new(Expr::cos(arg)), Box::new(Expr::Const(-1.0))),
        "csc" => Expr::Pow(Box::new(Expr::sin(arg)), Box::new(Expr::Const(-1.0))),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctan" | "arctg" => Expr::arctg(arg),
        "acot" | "arccot" | "arcctg" => Expr::arcctg(arg),
        "sinh" => Expr::sinh(arg),
        "cosh" => Expr::cosh(arg),
        "tanh" => Expr::tanh(arg),
        "sqrt" => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
        "exp" => Expr::Exp(arg),
        "lg" => Expr::Div(
            Box::new(Expr::Ln(arg)),
            Box::new(Expr::Ln(Box::new(Expr::Const(10.0)))),
        ),
        // ln and log are both the natural logarithm
        _ => Expr::Ln(arg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_parse_number_and_variable() {
        assert_eq!(parse_expression_func("2.5").unwrap(), Expr::Const(2.5));
        assert_eq!(parse_expression_func(" x ").unwrap(), x());
    }

    #[test]
    fn test_parse_decimals_at_end_of_input() {
        assert_eq!(parse_expression_func("x^2.5").unwrap(), Expr::Pow(Box::new(x()), Box::new(Expr::Const(2.5))));
        assert_eq!(parse_expression_func("5.").unwrap(), Expr::Const(5.0));
        assert_eq!(parse_expression_func(".25").unwrap(), Expr::Const(0.25));
        assert_eq!(parse_expression_func("0.125 ").unwrap(), Expr::Const(0.125));
    }

    #[test]
    fn test_parse_scientific_notation() {
        assert_eq!(parse_expression_func("1e-3").unwrap(), Expr::Const(0.001));
        assert_eq!(parse_expression_func("2.5E2").unwrap(), Expr::Const(250.0));
        assert_eq!(parse_expression_func("1e+2").unwrap(), Expr::Const(100.0));
        assert_eq!(
            parse_expression_func("1e5x").unwrap(),
            Expr::Mul(Box::new(Expr::Const(100000.0)), Box::new(x()))
        );
        // no exponent digits: Euler's number
        assert_eq!(
            parse_expression_func("2exp(x)").unwrap(),
            Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(Expr::Exp(Box::new(x()))))
        );
        let err = parse_expression_func("1e400").unwrap_err();
        assert!(err.message.starts_with("number out of range"), "{}", err.message);
    }

    #[test]
    fn test_parse_nesting_limit() {
        let shallow = format!("{}x{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse_expression_func(&shallow).unwrap(), x());

        let deep = format!("{}x{}", "(".repeat(1000), ")".repeat(1000));
        assert_eq!(parse_expression_func(&deep).unwrap_err().message, NESTED_TOO_DEEPLY);

        let signs = format!("{}x", "-".repeat(500));
        assert_eq!(parse_expression_func(&signs).unwrap_err().message, NESTED_TOO_DEEPLY);

        let functions = format!("{}x", "sin ".repeat(300));
        assert_eq!(parse_expression_func(&functions).unwrap_err().message, NESTED_TOO_DEEPLY);

        let powers = format!("x{}", "^x".repeat(300));
        assert_eq!(parse_expression_func(&powers).unwrap_err().message, NESTED_TOO_DEEPLY);

        let terms = format!("x{}", "+x".repeat(MAX_TREE_DEPTH + 10));
        assert_eq!(parse_expression_func(&terms).unwrap_err().message, NESTED_TOO_DEEPLY);
    }

    #[test]
    fn test_parse_precedence() {
        let parsed = parse_expression_func("1 + 2*x^2").unwrap();
        let expected = Expr::Add(
            Box::new(Expr::Const(1.0)),
            Box::new(Expr::Mul(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::Pow(Box::new(x()), Box::new(Expr::Const(2.0)))),
            )),
        );
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_power_is_right_associative() {
        let parsed = parse_expression_func("2^x^2").unwrap();
        let expected = Expr::Pow(
            Box::new(Expr::Const(2.0)),
            Box::new(Expr::Pow(Box::new(x()), Box::new(Expr::Const(2.0)))),
        );
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_double_star_power() {
        assert_eq!(
            parse_expression_func("x**3").unwrap(),
            parse_expression_func("x^3").unwrap()
        );
    }

    #[test]
    fn test_parse_implicit_multiplication() {
        let parsed = parse_expression_func("2x").unwrap();
        assert_eq!(parsed, Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(x())));
        let parsed = parse_expression_func("xsin(x)").unwrap();
        assert_eq!(
            parsed,
            Expr::Mul(Box::new(x()), Box::new(Expr::sin(Box::new(x()))))
        );
        let parsed = parse_expression_func("(x+1)(x-1)").unwrap();
        assert!(matches!(parsed, Expr::Mul(_, _)));
    }

    #[test]
    fn test_parse_unary_minus_binds_looser_than_power() {
        let parsed = parse_expression_func("-x^2").unwrap();
        let expected = Expr::Mul(
            Box::new(Expr::Const(-1.0)),
            Box::new(Expr::Pow(Box::new(x()), Box::new(Expr::Const(2.0)))),
        );
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_euler_power_is_exp() {
        let parsed = parse_expression_func("e^(2*x)").unwrap();
        assert!(matches!(parsed, Expr::Exp(_)));
        let parsed = parse_expression_func("2e^x").unwrap();
        assert_eq!(
            parsed,
            Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(Expr::Exp(Box::new(x()))))
        );
    }

    #[test]
    fn test_parse_function_names() {
        assert_eq!(
            parse_expression_func("tan(x)").unwrap(),
            Expr::tg(Box::new(x()))
        );
        assert_eq!(
            parse_expression_func("arctan(x)").unwrap(),
            Expr::arctg(Box::new(x()))
        );
        assert_eq!(
            parse_expression_func("log(x)").unwrap(),
            Expr::Ln(Box::new(x()))
        );
        assert_eq!(
            parse_expression_func("cosh(x)").unwrap(),
            Expr::cosh(Box::new(x()))
        );
        assert_eq!(
            parse_expression_func("sqrt(x)").unwrap(),
            Expr::Pow(Box::new(x()), Box::new(Expr::Const(0.5)))
        );
    }

    #[test]
    fn test_parse_function_without_parentheses() {
        assert_eq!(
            parse_expression_func("sin x").unwrap(),
            Expr::sin(Box::new(x()))
        );
    }

    #[test]
    fn test_parse_function_power_prefix() {
        let parsed = parse_expression_func("sin^2(x)").unwrap();
        assert_eq!(
            parsed,
            Expr::Pow(
                Box::new(Expr::sin(Box::new(x()))),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_expression_func("").unwrap_err();
        assert_eq!(err.message, "empty expression");
        let err = parse_expression_func("sin(x").unwrap_err();
        assert_eq!(err.message, "unbalanced parentheses");
        let err = parse_expression_func("x + y").unwrap_err();
        assert_eq!(err.message, "unknown identifier 'y'");
        let err = parse_expression_func("x +").unwrap_err();
        assert_eq!(err.message, "unexpected input '+'");
        assert!(parse_expression_func("2 ** * x").is_err());
    }
}
