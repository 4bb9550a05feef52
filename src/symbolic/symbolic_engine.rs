//! # Symbolic Engine Module
//!
//! This module holds the expression tree every calculus operation of the crate works on.
//! A formula typed by a user is parsed into an [`Expr`], differentiated, integrated or
//! sent to a limit, simplified into a canonical shape and finally printed as LaTeX and
//! as a plain computer-algebra string.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - the calculus variable, normally "x"
//! - **Constants**: `Const(f64)` numerical constants and `Pi` for the exact constant π
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `ctg`, inverse trigonometric and
//!   hyperbolic functions. Euler's number is `Exp(Const(1.0))`.
//!
//! ### Key Methods
//! - `diff(var: &str)` - analytical differentiation (symbolic_engine_derivatives.rs)
//! - `integrate(var: &str)` - indefinite integration (symbolic_integration.rs)
//! - `limit(var, point)` - limits at a point or at infinity (symbolic_limits.rs)
//! - `simplify()` - canonical simplification (symbolic_simplify.rs)
//! - `to_raw_string()` / `to_latex()` - printers (symbolic_printing.rs)
//! - `set_variable()` / `substitute_variable()` - substitution
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Expression Tree**: Uses Box<Expr> for nested expressions
//! 2. **Operator Overloading**: std::ops traits (Add, Sub, Mul, Div, Neg) give `x + y * z`
//! 3. **Non-standard Function Names**: mathematical notation (tg, ctg, arctg) is kept for the
//!    variants, the printers emit the conventional tan/cot/atan names

#![allow(non_camel_case_types)]

use std::f64;
use std::f64::consts::PI;
use std::fmt;

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// The constant π
    Pi,
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arccotangent function: arccot(x) - uses mathematical notation 'arcctg'
    arcctg(Box<Expr>),
    /// Hyperbolic sine
    sinh(Box<Expr>),
    /// Hyperbolic cosine
    cosh(Box<Expr>),
    /// Hyperbolic tangent
    tanh(Box<Expr>),
}

/// Display prints the plain computer-algebra form, the same text the API returns
/// as `solution_raw`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_raw_string())
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Wraps the expression in a Box
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// square root as a power with exponent 1/2
    pub fn sqrt(self) -> Expr {
        Expr::Pow(self.boxed(), Box::new(Expr::Const(0.5)))
    }

    /// Euler's number e = exp(1)
    pub fn euler() -> Expr {
        Expr::Exp(Box::new(Expr::Const(1.0)))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(c) if *c == 1.0)
    }

    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(c) => Some(*c),
            _ => None,
        }
    }

    /// Argument of a one-argument function node (Exp, Ln, trigonometric, hyperbolic)
    pub fn function_arg(&self) -> Option<&Expr> {
        match self {
            Expr::Exp(arg)
            | Expr::Ln(arg)
            | Expr::sin(arg)
            | Expr::cos(arg)
            | Expr::tg(arg)
            | Expr::ctg(arg)
            | Expr::arcsin(arg)
            | Expr::arccos(arg)
            | Expr::arctg(arg)
            | Expr::arcctg(arg)
            | Expr::sinh(arg)
            | Expr::cosh(arg)
            | Expr::tanh(arg) => Some(arg),
            _ => None,
        }
    }

    /// Same function node with a new argument. Returns the argument itself for
    /// nodes that are not functions.
    pub fn with_function_arg(&self, arg: Expr) -> Expr {
        let arg = Box::new(arg);
        match self {
            Expr::Exp(_) => Expr::Exp(arg),
            Expr::Ln(_) => Expr::Ln(arg),
            Expr::sin(_) => Expr::sin(arg),
            Expr::cos(_) => Expr::cos(arg),
            Expr::tg(_) => Expr::tg(arg),
            Expr::ctg(_) => Expr::ctg(arg),
            Expr::arcsin(_) => Expr::arcsin(arg),
            Expr::arccos(_) => Expr::arccos(arg),
            Expr::arctg(_) => Expr::arctg(arg),
            Expr::arcctg(_) => Expr::arcctg(arg),
            Expr::sinh(_) => Expr::sinh(arg),
            Expr::cosh(_) => Expr::cosh(arg),
            Expr::tanh(_) => Expr::tanh(arg),
            _ => *arg,
        }
    }

    /// Builds a new tree applying `f` to every direct child of the node.
    pub fn map_children<F: FnMut(&Expr) -> Expr>(&self, mut f: F) -> Expr {
        match self {
            Expr::Add(lhs, rhs) => Expr::Add(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Sub(lhs, rhs) => Expr::Sub(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Mul(lhs, rhs) => Expr::Mul(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Div(lhs, rhs) => Expr::Div(f(lhs).boxed(), f(rhs).boxed()),
            Expr::Pow(base, exp) => Expr::Pow(f(base).boxed(), f(exp).boxed()),
            Expr::Var(_) | Expr::Const(_) | Expr::Pi => self.clone(),
            other => match other.function_arg() {
                Some(arg) => other.with_function_arg(f(arg)),
                None => other.clone(),
            },
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    ///
    /// # Arguments
    /// * `var` - Name of the variable to substitute
    /// * `value` - Numerical value to substitute for the variable
    ///
    /// # Returns
    /// New expression with the variable substituted
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        match self {
            Expr::Var(name) if name == var => Expr::Const(value),
            _ => self.map_children(|child| child.set_variable(var, value)),
        }
    }

    /// Substitutes a variable with another expression throughout the expression.
    pub fn substitute_variable(&self, var: &str, value: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => value.clone(),
            _ => self.map_children(|child| child.substitute_variable(var, value)),
        }
    }

    /// Checks whether the expression depends on the variable.
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) | Expr::Pi => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            other => other
                .function_arg()
                .is_some_and(|arg| arg.contains_variable(var_name)),
        }
    }

    /// Collects the names of all variables, sorted and deduplicated
    pub fn all_arguments_are_variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Expr::Var(name) => out.push(name.clone()),
            Expr::Const(_) | Expr::Pi => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
            other => {
                if let Some(arg) = other.function_arg() {
                    arg.collect_variables(out);
                }
            }
        }
    }

    /// Number of nodes in the tree, used to keep rewriting strategies bounded
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Var(_) | Expr::Const(_) | Expr::Pi => 1,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => 1 + lhs.node_count() + rhs.node_count(),
            other => 1 + other.function_arg().map_or(0, |arg| arg.node_count()),
        }
    }

    /// Height of the tree. Walks with an explicit stack so that any tree can be measured.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            match node {
                Expr::Add(lhs, rhs)
                | Expr::Sub(lhs, rhs)
                | Expr::Mul(lhs, rhs)
                | Expr::Div(lhs, rhs)
                | Expr::Pow(lhs, rhs) => {
                    stack.push((lhs, level + 1));
                    stack.push((rhs, level + 1));
                }
                other => {
                    if let Some(arg) = other.function_arg() {
                        stack.push((arg, level + 1));
                    }
                }
            }
        }
        deepest
    }

    /// Evaluates the expression with the single variable `var` set to `value`.
    /// Unknown variables evaluate to NaN.
    pub fn eval(&self, var: &str, value: f64) -> f64 {
        match self {
            Expr::Var(name) if name == var => value,
            Expr::Var(_) => f64::NAN,
            Expr::Const(val) => *val,
            Expr::Pi => PI,
            Expr::Add(lhs, rhs) => lhs.eval(var, value) + rhs.eval(var, value),
            Expr::Sub(lhs, rhs) => lhs.eval(var, value) - rhs.eval(var, value),
            Expr::Mul(lhs, rhs) => lhs.eval(var, value) * rhs.eval(var, value),
            Expr::Div(lhs, rhs) => lhs.eval(var, value) / rhs.eval(var, value),
            Expr::Pow(base, exp) => real_pow(base.eval(var, value), exp.eval(var, value)),
            Expr::Exp(expr) => expr.eval(var, value).exp(),
            Expr::Ln(expr) => expr.eval(var, value).ln(),
            Expr::sin(expr) => expr.eval(var, value).sin(),
            Expr::cos(expr) => expr.eval(var, value).cos(),
            Expr::tg(expr) => expr.eval(var, value).tan(),
            Expr::ctg(expr) => 1.0 / expr.eval(var, value).tan(),
            Expr::arcsin(expr) => expr.eval(var, value).asin(),
            Expr::arccos(expr) => expr.eval(var, value).acos(),
            Expr::arctg(expr) => expr.eval(var, value).atan(),
            Expr::arcctg(expr) => (1.0 / expr.eval(var, value)).atan(),
            Expr::sinh(expr) => expr.eval(var, value).sinh(),
            Expr::cosh(expr) => expr.eval(var, value).cosh(),
            Expr::tanh(expr) => expr.eval(var, value).tanh(),
        }
    }

    /// Numerical value of an expression free of variables
    pub fn eval_constant(&self) -> Option<f64> {
        if !self.all_arguments_are_variables().is_empty() {
            return None;
        }
        let value = self.eval("", 0.0);
        if value.is_nan() { None } else { Some(value) }
    }
}

/// Real-valued power: negative bases are allowed for odd-denominator rational
/// exponents such as 1/3.
pub(crate) fn real_pow(base: f64, exp: f64) -> f64 {
    if base >= 0.0 || exp.fract() == 0.0 {
        return base.powf(exp);
    }
    for q in [3.0_f64, 5.0, 7.0, 9.0] {
        let p = exp * q;
        if (p - p.round()).abs() < 1e-12 {
            let magnitude = (-base).powf(exp);
            return if (p.round() as i64) % 2 == 0 {
                magnitude
            } else {
                -magnitude
            };
        }
    }
    f64::NAN
}
