//! # Calculation dispatcher
//!
//! Turns a [`CalculationRequest`] into a [`CalculationResult`]: the expression is parsed,
//! the requested operation is run by the symbolic engine with respect to `x`, and the
//! result is rendered twice, as LaTeX (`solution`) and as plain text (`solution_raw`).
//!
//! Pure and CPU bound; the HTTP layer runs it on the blocking pool.
//!
//! # Example
//! ```
//! use RustedCalc::calculator::{calculate, CalculationRequest, Operation};
//! let request = CalculationRequest::new(Some("cos(x)"), Operation::Integral, None).unwrap();
//! let result = calculate(&request).unwrap();
//! assert_eq!(result.solution, "\\sin{\\left(x \\right)} + C");
//! assert_eq!(result.solution_raw, "sin(x)");
//! ```

pub mod errors;

pub use errors::{CalcError, CalcResult};

use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::symbolic::parse_expr::VARIABLE;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_limits::LimitPoint;

/// limit target used when the request does not name one
pub const DEFAULT_LIMIT_TARGET: &str = "0";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Derivative,
    Integral,
    Limit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub expression: String,
    pub operation: Operation,
    /// limit target text, only for [`Operation::Limit`]
    pub target: Option<String>,
}

impl CalculationRequest {
    /// Validates the raw query values. A missing or blank equation is
    /// [`CalcError::MissingInput`]; a missing limit target becomes `0`.
    pub fn new(
        equation: Option<&str>,
        operation: Operation,
        target: Option<&str>,
    ) -> CalcResult<Self> {
        let expression = equation
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CalcError::MissingInput)?;
        let target = match operation {
            Operation::Limit => Some(
                target
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_LIMIT_TARGET)
                    .to_string(),
            ),
            _ => None,
        };
        Ok(Self {
            expression: expression.to_string(),
            operation,
            target,
        })
    }

    pub fn target_text(&self) -> &str {
        self.target.as_deref().unwrap_or(DEFAULT_LIMIT_TARGET)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    /// LaTeX display form, integrals end with `+ C`
    pub solution: String,
    /// plain text form: `**` powers, `log` for ln
    pub solution_raw: String,
}

pub fn calculate(request: &CalculationRequest) -> CalcResult<CalculationResult> {
    let expr = Expr::parse_expression(&request.expression)?;
    debug!("parsed '{}' as {}", request.expression, expr);
    let result = match request.operation {
        Operation::Derivative => {
            let derivative = expr.derivative(VARIABLE);
            CalculationResult {
                solution: derivative.to_latex(),
                solution_raw: derivative.to_raw_string(),
            }
        }
        Operation::Integral => {
            let integral = expr.integrate(VARIABLE).map_err(CalcError::Calculation)?;
            CalculationResult {
                solution: format!("{} + C", integral.to_latex()),
                solution_raw: integral.to_raw_string(),
            }
        }
        Operation::Limit => {
            let point = LimitPoint::parse(request.target_text()).map_err(CalcError::Calculation)?;
            let value = expr
                .limit(VARIABLE, &point)
                .map_err(CalcError::Calculation)?;
            CalculationResult {
                solution: value.to_latex(),
                solution_raw: value.to_raw_string(),
            }
        }
    };
    debug!("{} of '{}' = {}", request.operation, request.expression, result.solution_raw);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn run(equation: &str, operation: Operation, target: Option<&str>) -> CalculationResult {
        let request = CalculationRequest::new(Some(equation), operation, target).unwrap();
        calculate(&request).unwrap()
    }

    fn compact(s: &str) -> String {
        s.replace(' ', "")
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::Derivative.to_string(), "derivative");
        assert_eq!(Operation::from_str("limit").unwrap(), Operation::Limit);
        assert_eq!(Operation::iter().count(), 3);
    }

    #[test]
    fn test_missing_equation() {
        assert!(matches!(
            CalculationRequest::new(None, Operation::Derivative, None),
            Err(CalcError::MissingInput)
        ));
        assert!(matches!(
            CalculationRequest::new(Some("   "), Operation::Integral, None),
            Err(CalcError::MissingInput)
        ));
    }

    #[test]
    fn test_limit_target_defaults_to_zero() {
        let request = CalculationRequest::new(Some("sin(x)/x"), Operation::Limit, None).unwrap();
        assert_eq!(request.target_text(), "0");
        let request = CalculationRequest::new(Some("x"), Operation::Derivative, Some("3")).unwrap();
        assert_eq!(request.target, None);
    }

    #[test]
    fn test_derivatives() {
        let cases = [
            ("x^2", "2*x"),
            ("sin(x)", "cos(x)"),
            ("ln(x)", "1/x"),
            ("exp(x)", "exp(x)"),
            ("x^3 + 2*x", "3*x**2+2"),
            ("sin(x^2)", "2*x*cos(x**2)"),
        ];
        for (equation, expected) in cases {
            let result = run(equation, Operation::Derivative, None);
            assert!(
                compact(&result.solution_raw).contains(expected),
                "{} -> {}",
                equation,
                result.solution_raw
            );
        }
    }

    #[test]
    fn test_integrals() {
        for (equation, expected) in [("2*x", "x**2"), ("cos(x)", "sin(x)"), ("1/x", "log(x)")] {
            let result = run(equation, Operation::Integral, None);
            assert!(result.solution_raw.contains(expected));
            assert!(result.solution.ends_with(" + C"));
            assert!(!result.solution_raw.contains("+ C"));
        }
    }

    #[test]
    fn test_limits() {
        assert_eq!(run("(x^2-1)/(x-1)", Operation::Limit, Some("1")).solution_raw, "2");
        assert_eq!(run("sin(x)/x", Operation::Limit, None).solution_raw, "1");
        assert_eq!(run("1/x", Operation::Limit, Some("oo")).solution_raw, "0");
        let unbounded = run("1/x^2", Operation::Limit, Some("0"));
        assert_eq!(unbounded.solution, "\\infty");
        assert_eq!(unbounded.solution_raw, "oo");
    }

    #[test]
    fn test_calculation_errors() {
        let request = CalculationRequest::new(Some("sin(x"), Operation::Derivative, None).unwrap();
        assert!(matches!(calculate(&request), Err(CalcError::Parse(_))));
        let request = CalculationRequest::new(Some("e^(x^2)"), Operation::Integral, None).unwrap();
        assert!(matches!(calculate(&request), Err(CalcError::Calculation(_))));
        let request = CalculationRequest::new(Some("x"), Operation::Limit, Some("banana")).unwrap();
        assert!(matches!(calculate(&request), Err(CalcError::Calculation(_))));
    }

    #[test]
    fn test_identical_requests_give_identical_results() {
        let first = run("x^3 + 2*x", Operation::Derivative, None);
        let second = run("x^3 + 2*x", Operation::Derivative, None);
        assert_eq!(first, second);
    }
}
