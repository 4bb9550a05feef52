#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("2x^2 + sin x").unwrap();
/// assert_eq!(parsed_expression.to_raw_string(), "2*x**2 + sin(x)");
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the expression tree and its evaluation
/// 2) substitutes variables and subexpressions
/// 3) turns a symbolic expression into a string expression for printing and control results
///# Example#
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("x^2 + 1").unwrap();
/// assert_eq!(parsed_expression.eval("x", 3.0), 10.0);
/// assert_eq!(parsed_expression.all_arguments_are_variables(), vec!["x".to_string()]);
/// ```
pub mod symbolic_engine;
///____________________________________________________________________________________________________________________________
/// # Symbolic differentiation
/// sum, product, quotient, general power and chain rules for every supported function
///# Example#
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("sin(x^2)").unwrap();
/// assert_eq!(f.derivative("x").to_raw_string(), "2*x*cos(x**2)");
/// ```
pub mod symbolic_engine_derivatives;
///____________________________________________________________________________________________________________________________
/// # Symbolic integration
/// indefinite integrals: table integrals, substitution, integration by parts, rational functions
///# Example#
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("cos(x)").unwrap();
/// assert_eq!(f.integrate("x").unwrap().to_raw_string(), "sin(x)");
/// ```
pub mod symbolic_integration;
///____________________________________________________________________________________________________________________________
/// # Limits
/// two-sided limits at a point or at infinity
///# Example#
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// use RustedCalc::symbolic::symbolic_limits::LimitPoint;
/// let f = Expr::parse_expression("sin(x)/x").unwrap();
/// let value = f.limit("x", &LimitPoint::parse("0").unwrap()).unwrap();
/// assert_eq!(value.to_raw_string(), "1");
/// ```
pub mod symbolic_limits;
/// plain text (`x**2`, `log(x)`) and LaTeX renderings of expressions
pub mod symbolic_printing;
/// canonical form: like terms collected, constants folded, powers merged
pub mod symbolic_simplify;
pub mod utils;

mod symbolic_engine_tests;
