//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation of [`Expr`] trees and the parsing entry point.
//!
//! ## Key Methods
//!
//! - `diff(var: &str)` - raw derivative tree built with the calculus rules
//! - `derivative(var: &str)` - derivative passed through the canonical simplifier
//! - `n_th_derivative1D()` - higher-order derivatives
//! - `parse_expression()` - string to symbolic expression
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Differentiation Rules**: product, quotient and chain rules for every
//!    supported function
//! 2. **General Power Rule**: `f^g` with the variable in both base and exponent is handled
//!    through logarithmic differentiation, so `x^x` and `x^sin(x)` are covered

use crate::symbolic::parse_expr::{ParseError, parse_expression_func};
use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements all standard differentiation rules from calculus:
    /// - Power rule: d/dx(x^n) = n*x^(n-1)
    /// - Exponential rule: d/dx(a^g) = a^g*ln(a)*g'
    /// - General power: d/dx(f^g) = f^g*(g'*ln(f) + g*f'/f)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// The result is not simplified, see [`Expr::derivative`].
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Expr::Var("x".to_string());
    /// let f = x.clone().pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) | Expr::Pi => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) => {
                let base_depends = base.contains_variable(var);
                let exp_depends = exp.contains_variable(var);
                match (base_depends, exp_depends) {
                    (false, false) => Expr::Const(0.0),
                    // n*f^(n-1)*f'
                    (true, false) => Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    ),
                    // a^g*ln(a)*g'
                    (false, true) => Expr::Mul(
                        Box::new(Expr::Mul(
                            Box::new(self.clone()),
                            Box::new(Expr::Ln(base.clone())),
                        )),
                        Box::new(exp.diff(var)),
                    ),
                    // f^g*(g'*ln(f) + g*f'/f)
                    (true, true) => Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Add(
                            Box::new(Expr::Mul(
                                Box::new(exp.diff(var)),
                                Box::new(Expr::Ln(base.clone())),
                            )),
                            Box::new(Expr::Div(
                                Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                                base.clone(),
                            )),
                        )),
                    ),
                }
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            // (1 + tan^2(f))*f'
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::tg(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            // -(1 + cot^2(f))*f'
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Add(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(
                            Box::new(Expr::ctg(expr.clone())),
                            Box::new(Expr::Const(2.0)),
                        )),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Mul(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(one_minus_square(expr)),
                    Box::new(Expr::Const(-0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Mul(
                Box::new(Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(expr.diff(var)))),
                Box::new(Expr::Pow(
                    Box::new(one_minus_square(expr)),
                    Box::new(Expr::Const(-0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(one_plus_square(expr)),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(expr.diff(var)))),
                Box::new(one_plus_square(expr)),
            ),
            Expr::sinh(expr) => {
                Expr::Mul(Box::new(Expr::cosh(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cosh(expr) => {
                Expr::Mul(Box::new(Expr::sinh(expr.clone())), Box::new(expr.diff(var)))
            }
            // (1 - tanh^2(f))*f'
            Expr::tanh(expr) => Expr::Mul(
                Box::new(Expr::Sub(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::tanh(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
        }
    }

    /// Derivative in canonical simplified form.
    pub fn derivative(&self, var: &str) -> Expr {
        self.diff(var).simplify()
    }

    /// n-th derivative, simplified after every step to keep the tree small
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        let mut expr = self.simplify();
        for _ in 0..n {
            expr = expr.derivative(var_name);
        }
        expr
    }

    /// PARSING

    /// Parses a formula string into a symbolic expression.
    ///
    /// Accepts implicit multiplication (`2x`, `x sin(x)`), both `^` and `**` for powers,
    /// the constants `e` and `pi`, and the function names listed in [`parse_expr`].
    ///
    /// [`parse_expr`]: crate::symbolic::parse_expr
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression_func(input)
    }

    /// Pretty string form of the expression
    pub fn sym_to_str(&self) -> String {
        self.to_raw_string()
    }
}

fn one_minus_square(expr: &Expr) -> Expr {
    Expr::Sub(
        Box::new(Expr::Const(1.0)),
        Box::new(Expr::Pow(Box::new(expr.clone()), Box::new(Expr::Const(2.0)))),
    )
}

fn one_plus_square(expr: &Expr) -> Expr {
    Expr::Add(
        Box::new(Expr::Pow(Box::new(expr.clone()), Box::new(Expr::Const(2.0)))),
        Box::new(Expr::Const(1.0)),
    )
}
