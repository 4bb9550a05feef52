//! # Symbolic Limits Module
//!
//! Two-sided limits of single-variable expressions at a finite point or at ±∞.
//!
//! ## Algorithm
//! 1. constant expressions are their own limit
//! 2. direct substitution when the expression is finite at the point
//! 3. structural limit algebra: sums, products, constant powers and elementary
//!    functions are combined from the limits of their parts
//! 4. indeterminate quotients `0/0` and `∞/∞` (and `0·∞` rewritten as a quotient)
//!    go through repeated L'Hôpital's rule
//! 5. variable exponents `f^g` are reduced to `exp(lim g·ln f)`
//! 6. anything left undetermined is sampled numerically on both sides of the point
//!    (growing sample points at infinity), recognising integers, small rationals, `e` and `π`
//!
//! A divergent, oscillating or side-disagreeing limit is reported as
//! [`LimitValue::DoesNotExist`].

use crate::symbolic::parse_expr::VARIABLE;
use crate::symbolic::symbolic_engine::{Expr, real_pow};
use crate::symbolic::utils::is_integer;
use log::debug;

const MAX_LHOPITAL: usize = 8;

/// Where the variable goes
#[derive(Debug, Clone, PartialEq)]
pub enum LimitPoint {
    Finite(Expr),
    PositiveInfinity,
    NegativeInfinity,
}

/// Verdict of the limit engine
#[derive(Debug, Clone, PartialEq)]
pub enum LimitValue {
    Finite(Expr),
    PositiveInfinity,
    NegativeInfinity,
    DoesNotExist,
}

impl LimitPoint {
    /// Parses a limit target: blank means `0`, signed infinity tokens
    /// (`oo`, `inf`, `infinity`, `∞`) or any constant expression such as `pi/2`.
    pub fn parse(text: &str) -> Result<LimitPoint, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(LimitPoint::Finite(Expr::Const(0.0)));
        }
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest.trim()),
            None => (false, text.strip_prefix('+').unwrap_or(text).trim()),
        };
        let lowered = unsigned.to_lowercase();
        if matches!(lowered.as_str(), "oo" | "inf" | "infinity" | "∞") {
            return Ok(if negative {
                LimitPoint::NegativeInfinity
            } else {
                LimitPoint::PositiveInfinity
            });
        }
        let expr = Expr::parse_expression(text)
            .map_err(|e| format!("invalid limit target '{}': {}", text, e.message))?;
        if expr.contains_variable(VARIABLE) {
            return Err(format!(
                "invalid limit target '{}': the target must not depend on {}",
                text, VARIABLE
            ));
        }
        match expr.eval_constant() {
            Some(v) if v.is_finite() => Ok(LimitPoint::Finite(expr.simplify())),
            _ => Err(format!("invalid limit target '{}': not a real number", text)),
        }
    }
}

impl LimitValue {
    fn infinite(sign: f64) -> LimitValue {
        if sign < 0.0 {
            LimitValue::NegativeInfinity
        } else {
            LimitValue::PositiveInfinity
        }
    }

    /// SymPy-style plain text: `oo`, `-oo`
    pub fn to_raw_string(&self) -> String {
        match self {
            LimitValue::Finite(expr) => expr.to_raw_string(),
            LimitValue::PositiveInfinity => "oo".to_string(),
            LimitValue::NegativeInfinity => "-oo".to_string(),
            LimitValue::DoesNotExist => "does not exist".to_string(),
        }
    }

    pub fn to_latex(&self) -> String {
        match self {
            LimitValue::Finite(expr) => expr.to_latex(),
            LimitValue::PositiveInfinity => "\\infty".to_string(),
            LimitValue::NegativeInfinity => "-\\infty".to_string(),
            LimitValue::DoesNotExist => "\\text{does not exist}".to_string(),
        }
    }
}

impl Expr {
    /// Limit of the expression as `var` approaches `point`.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::parse_expression("sin(x)/x").unwrap();
    /// let value = f.limit("x", &LimitPoint::Finite(Expr::Const(0.0))).unwrap();
    /// assert_eq!(value, LimitValue::Finite(Expr::Const(1.0)));
    /// ```
    pub fn limit(&self, var: &str, point: &LimitPoint) -> Result<LimitValue, String> {
        if let LimitPoint::Finite(p) = point {
            if p.contains_variable(var) || !p.eval_constant().is_some_and(f64::is_finite) {
                return Err(format!("invalid limit target '{}'", p.to_raw_string()));
            }
        }
        let f = self.simplify();
        let value = limit_of(&f, var, point, 0);
        debug!("limit of {} -> {:?}", f, value);
        Ok(value)
    }
}

/// classification of an intermediate limit used by the combination rules
#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Zero,
    Nonzero(f64),
    Infinite(f64),
    Unknown,
}

fn kind_of(value: &LimitValue) -> Kind {
    match value {
        LimitValue::Finite(expr) => match expr.eval_constant() {
            Some(v) if v.abs() < 1e-14 => Kind::Zero,
            Some(v) if v.is_finite() => Kind::Nonzero(v),
            _ => Kind::Unknown,
        },
        LimitValue::PositiveInfinity => Kind::Infinite(1.0),
        LimitValue::NegativeInfinity => Kind::Infinite(-1.0),
        LimitValue::DoesNotExist => Kind::Unknown,
    }
}

fn limit_of(f: &Expr, var: &str, point: &LimitPoint, depth: usize) -> LimitValue {
    if !f.contains_variable(var) {
        return LimitValue::Finite(f.clone());
    }
    if let LimitPoint::Finite(p) = point {
        let substituted = f.substitute_variable(var, p);
        if substituted.eval_constant().is_some_and(f64::is_finite) {
            return LimitValue::Finite(substituted.simplify());
        }
    }
    if depth > MAX_LHOPITAL {
        return numeric_limit(f, var, point);
    }
    let structural = match f {
        Expr::Var(_) => match point {
            LimitPoint::PositiveInfinity => Some(LimitValue::PositiveInfinity),
            LimitPoint::NegativeInfinity => Some(LimitValue::NegativeInfinity),
            LimitPoint::Finite(p) => Some(LimitValue::Finite(p.clone())),
        },
        Expr::Add(lhs, rhs) => limit_of_sum(lhs, rhs, 1.0, var, point, depth),
        Expr::Sub(lhs, rhs) => limit_of_sum(lhs, rhs, -1.0, var, point, depth),
        Expr::Mul(_, _) | Expr::Div(_, _) => limit_of_product(f, var, point, depth),
        Expr::Pow(base, exp) if exp.contains_variable(var) => {
            limit_of_variable_power(base, exp, var, point, depth)
        }
        Expr::Pow(base, exp) => limit_of_power(base, exp, var, point, depth),
        _ => limit_of_function(f, var, point, depth),
    };
    structural.unwrap_or_else(|| numeric_limit(f, var, point))
}

fn limit_of_sum(
    lhs: &Expr,
    rhs: &Expr,
    sign: f64,
    var: &str,
    point: &LimitPoint,
    depth: usize,
) -> Option<LimitValue> {
    let a = limit_of(lhs, var, point, depth);
    let b = limit_of(rhs, var, point, depth);
    match (kind_of(&a), kind_of(&b)) {
        (Kind::Unknown, _) | (_, Kind::Unknown) => None,
        (Kind::Infinite(s), Kind::Infinite(t)) if s == sign * t => Some(LimitValue::infinite(s)),
        // ∞ - ∞
        (Kind::Infinite(_), Kind::Infinite(_)) => None,
        (Kind::Infinite(s), _) => Some(LimitValue::infinite(s)),
        (_, Kind::Infinite(t)) => Some(LimitValue::infinite(sign * t)),
        _ => {
            let (LimitValue::Finite(a), LimitValue::Finite(b)) = (a, b) else {
                return None;
            };
            let combined = if sign > 0.0 { a + b } else { a - b };
            Some(LimitValue::Finite(combined.simplify()))
        }
    }
}

fn flatten_mul(expr: &Expr, out: &mut Vec<Expr>) {
    match expr {
        Expr::Mul(a, b) => {
            flatten_mul(a, out);
            flatten_mul(b, out);
        }
        Expr::Div(a, b) => {
            flatten_mul(a, out);
            out.push(Expr::Pow(b.clone(), Box::new(Expr::Const(-1.0))));
        }
        _ => out.push(expr.clone()),
    }
}

fn product_of(factors: Vec<Expr>) -> Expr {
    factors
        .into_iter()
        .reduce(|acc, f| Expr::Mul(acc.boxed(), f.boxed()))
        .unwrap_or(Expr::Const(1.0))
}

fn is_plain_power(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) | Expr::Exp(_) => true,
        Expr::Pow(_, exp) => exp.as_const().is_some(),
        _ => false,
    }
}

fn reciprocal(expr: Expr) -> Expr {
    Expr::Pow(expr.boxed(), Box::new(Expr::Const(-1.0))).simplify()
}

fn limit_of_product(f: &Expr, var: &str, point: &LimitPoint, depth: usize) -> Option<LimitValue> {
    let mut factors = Vec::new();
    flatten_mul(f, &mut factors);
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors {
        match &factor {
            Expr::Pow(base, exp) if exp.as_const().is_some_and(|k| k < 0.0) => {
                let k = exp.as_const().unwrap_or(-1.0);
                denominator.push(Expr::Pow(base.clone(), Box::new(Expr::Const(-k))).simplify());
            }
            _ => numerator.push(factor),
        }
    }
    if denominator.is_empty() {
        return limit_of_plain_product(numerator, var, point, depth);
    }
    let num = product_of(numerator).simplify();
    let den = product_of(denominator).simplify();
    limit_of_quotient(&num, &den, var, point, depth)
}

fn limit_of_quotient(
    num: &Expr,
    den: &Expr,
    var: &str,
    point: &LimitPoint,
    depth: usize,
) -> Option<LimitValue> {
    let n = limit_of(num, var, point, depth);
    let d = limit_of(den, var, point, depth);
    match (kind_of(&n), kind_of(&d)) {
        (Kind::Zero, Kind::Zero) | (Kind::Infinite(_), Kind::Infinite(_)) => {
            Some(lhopital(num, den, var, point, depth))
        }
        (Kind::Zero | Kind::Nonzero(_), Kind::Nonzero(_)) => {
            let (LimitValue::Finite(a), LimitValue::Finite(b)) = (n, d) else {
                return None;
            };
            Some(LimitValue::Finite((a / b).simplify()))
        }
        (Kind::Zero | Kind::Nonzero(_), Kind::Infinite(_)) => {
            Some(LimitValue::Finite(Expr::Const(0.0)))
        }
        // bounded oscillation over a growing denominator
        (Kind::Unknown, Kind::Infinite(_)) if is_bounded(num, var) => {
            Some(LimitValue::Finite(Expr::Const(0.0)))
        }
        (Kind::Infinite(s), Kind::Nonzero(b)) => Some(LimitValue::infinite(s * b.signum())),
        // c/0 depends on the side the denominator vanishes from
        _ => None,
    }
}

/// lim f/g = lim f'/g'
fn lhopital(num: &Expr, den: &Expr, var: &str, point: &LimitPoint, depth: usize) -> LimitValue {
    let ratio = Expr::Mul(
        num.derivative(var).boxed(),
        Box::new(Expr::Pow(den.derivative(var).boxed(), Box::new(Expr::Const(-1.0)))),
    )
    .simplify();
    debug!("L'Hopital step {}: {}", depth + 1, ratio);
    limit_of(&ratio, var, point, depth + 1)
}

fn limit_of_plain_product(
    factors: Vec<Expr>,
    var: &str,
    point: &LimitPoint,
    depth: usize,
) -> Option<LimitValue> {
    let mut limits = Vec::with_capacity(factors.len());
    let mut oscillating = false;
    for factor in &factors {
        let value = limit_of(factor, var, point, depth);
        let kind = kind_of(&value);
        if kind == Kind::Unknown {
            if !is_bounded(factor, var) {
                return None;
            }
            oscillating = true;
            continue;
        }
        limits.push((value, kind));
    }
    if oscillating {
        // bounded times a vanishing factor, e.g. x*sin(1/x) at 0
        let vanishes = limits.iter().any(|(_, k)| *k == Kind::Zero)
            && !limits.iter().any(|(_, k)| matches!(k, Kind::Infinite(_)));
        return vanishes.then(|| LimitValue::Finite(Expr::Const(0.0)));
    }
    let has_zero = limits.iter().any(|(_, k)| *k == Kind::Zero);
    let has_infinite = limits.iter().any(|(_, k)| matches!(k, Kind::Infinite(_)));
    if has_zero && has_infinite {
        // 0·∞ → ∞/(1/0) or 0/(1/∞), inverting the side made of plain powers
        let invert_zeros = factors
            .iter()
            .zip(limits.iter())
            .filter(|(_, (_, kind))| *kind == Kind::Zero)
            .all(|(factor, _)| is_plain_power(factor))
            || !factors
                .iter()
                .zip(limits.iter())
                .filter(|(_, (_, kind))| matches!(kind, Kind::Infinite(_)))
                .all(|(factor, _)| is_plain_power(factor));
        let mut num = Vec::new();
        let mut den = Vec::new();
        for (factor, (_, kind)) in factors.into_iter().zip(limits.iter()) {
            let inverted = match kind {
                Kind::Zero => invert_zeros,
                Kind::Infinite(_) => !invert_zeros,
                _ => false,
            };
            if inverted {
                den.push(reciprocal(factor));
            } else {
                num.push(factor);
            }
        }
        let num = product_of(num).simplify();
        let den = product_of(den).simplify();
        return Some(lhopital(&num, &den, var, point, depth));
    }
    if has_infinite {
        let sign: f64 = limits
            .iter()
            .map(|(_, kind)| match kind {
                Kind::Infinite(s) => *s,
                Kind::Nonzero(v) => v.signum(),
                _ => 1.0,
            })
            .product();
        return Some(LimitValue::infinite(sign));
    }
    let finite: Vec<Expr> = limits
        .into_iter()
        .filter_map(|(value, _)| match value {
            LimitValue::Finite(expr) => Some(expr),
            _ => None,
        })
        .collect();
    Some(LimitValue::Finite(product_of(finite).simplify()))
}

/// true when |f| stays below a constant for every value of `var`
fn is_bounded(f: &Expr, var: &str) -> bool {
    if !f.contains_variable(var) {
        return f.eval_constant().is_some_and(f64::is_finite);
    }
    match f {
        Expr::sin(_)
        | Expr::cos(_)
        | Expr::tanh(_)
        | Expr::arctg(_)
        | Expr::arcctg(_)
        | Expr::arcsin(_)
        | Expr::arccos(_) => true,
        Expr::Exp(arg) => is_bounded(arg, var),
        Expr::Add(lhs, rhs) | Expr::Sub(lhs, rhs) | Expr::Mul(lhs, rhs) => {
            is_bounded(lhs, var) && is_bounded(rhs, var)
        }
        Expr::Div(lhs, rhs) => {
            is_bounded(lhs, var) && rhs.eval_constant().is_some_and(|c| c != 0.0 && c.is_finite())
        }
        Expr::Pow(base, exp) => {
            exp.eval_constant().is_some_and(|k| k >= 0.0) && is_bounded(base, var)
        }
        _ => false,
    }
}

/// base^n with constant n
fn limit_of_power(
    base: &Expr,
    exp: &Expr,
    var: &str,
    point: &LimitPoint,
    depth: usize,
) -> Option<LimitValue> {
    let n = exp.eval_constant()?;
    let b = limit_of(base, var, point, depth);
    match kind_of(&b) {
        Kind::Zero if n < 0.0 => {
            // only even powers have the same sign on both sides
            if is_integer(n) && (n.round() as i64) % 2 == 0 {
                Some(LimitValue::PositiveInfinity)
            } else {
                None
            }
        }
        Kind::Zero | Kind::Nonzero(_) => {
            let LimitValue::Finite(value) = b else {
                return None;
            };
            let power = Expr::Pow(value.boxed(), Box::new(exp.clone()));
            power
                .eval_constant()
                .filter(|v| v.is_finite())
                .map(|_| LimitValue::Finite(power.simplify()))
        }
        Kind::Infinite(_) if n < 0.0 => Some(LimitValue::Finite(Expr::Const(0.0))),
        Kind::Infinite(s) if s > 0.0 => Some(LimitValue::PositiveInfinity),
        Kind::Infinite(_) => {
            if !is_integer(n) {
                return None;
            }
            Some(LimitValue::infinite(real_pow(-1.0, n)))
        }
        Kind::Unknown => None,
    }
}

/// f^g = exp(g·ln f)
fn limit_of_variable_power(
    base: &Expr,
    exp: &Expr,
    var: &str,
    point: &LimitPoint,
    depth: usize,
) -> Option<LimitValue> {
    if let Some(c) = base.eval_constant() {
        if c <= 0.0 {
            return None;
        }
        let g = limit_of(exp, var, point, depth);
        return match kind_of(&g) {
            Kind::Zero | Kind::Nonzero(_) => {
                let LimitValue::Finite(value) = g else {
                    return None;
                };
                Some(LimitValue::Finite(
                    Expr::Pow(Box::new(base.clone()), value.boxed()).simplify(),
                ))
            }
            _ if c == 1.0 => Some(LimitValue::Finite(Expr::Const(1.0))),
            Kind::Infinite(s) if (s > 0.0) == (c > 1.0) => Some(LimitValue::PositiveInfinity),
            Kind::Infinite(_) => Some(LimitValue::Finite(Expr::Const(0.0))),
            Kind::Unknown => None,
        };
    }
    let b = limit_of(base, var, point, depth);
    if matches!(kind_of(&b), Kind::Nonzero(v) if v < 0.0) || matches!(kind_of(&b), Kind::Infinite(s) if s < 0.0) {
        return None;
    }
    let exponent = Expr::Mul(Box::new(exp.clone()), Box::new(Expr::Ln(Box::new(base.clone())))).simplify();
    let h = limit_of(&exponent, var, point, depth);
    match h {
        LimitValue::Finite(value) => Some(LimitValue::Finite(Expr::Exp(value.boxed()).simplify())),
        LimitValue::PositiveInfinity => Some(LimitValue::PositiveInfinity),
        LimitValue::NegativeInfinity => Some(LimitValue::Finite(Expr::Const(0.0))),
        LimitValue::DoesNotExist => None,
    }
}

fn limit_of_function(f: &Expr, var: &str, point: &LimitPoint, depth: usize) -> Option<LimitValue> {
    let arg = f.function_arg()?;
    let inner = limit_of(arg, var, point, depth);
    match inner {
        LimitValue::Finite(value) => {
            let composed = f.with_function_arg(value);
            composed
                .eval_constant()
                .filter(|v| v.is_finite())
                .map(|_| LimitValue::Finite(composed.simplify()))
        }
        LimitValue::PositiveInfinity => match f {
            Expr::Exp(_) | Expr::Ln(_) | Expr::sinh(_) | Expr::cosh(_) => {
                Some(LimitValue::PositiveInfinity)
            }
            Expr::arctg(_) => Some(LimitValue::Finite((Expr::Pi / Expr::Const(2.0)).simplify())),
            Expr::arcctg(_) => Some(LimitValue::Finite(Expr::Const(0.0))),
            Expr::tanh(_) => Some(LimitValue::Finite(Expr::Const(1.0))),
            Expr::sin(_) | Expr::cos(_) | Expr::tg(_) | Expr::ctg(_) => Some(LimitValue::DoesNotExist),
            _ => None,
        },
        LimitValue::NegativeInfinity => match f {
            Expr::Exp(_) => Some(LimitValue::Finite(Expr::Const(0.0))),
            Expr::sinh(_) => Some(LimitValue::NegativeInfinity),
            Expr::cosh(_) => Some(LimitValue::PositiveInfinity),
            Expr::arctg(_) => Some(LimitValue::Finite((-(Expr::Pi / Expr::Const(2.0))).simplify())),
            Expr::arcctg(_) => Some(LimitValue::Finite(Expr::Const(0.0))),
            Expr::tanh(_) => Some(LimitValue::Finite(Expr::Const(-1.0))),
            Expr::sin(_) | Expr::cos(_) | Expr::tg(_) | Expr::ctg(_) => Some(LimitValue::DoesNotExist),
            _ => None,
        },
        LimitValue::DoesNotExist => None,
    }
}

//___________________________________NUMERICAL FALLBACK____________________________________

#[derive(Debug, Clone, Copy, PartialEq)]
enum Estimate {
    Value(f64),
    PositiveInfinity,
    NegativeInfinity,
    Undefined,
    Divergent,
}

fn numeric_limit(f: &Expr, var: &str, point: &LimitPoint) -> LimitValue {
    let estimate = match point {
        LimitPoint::Finite(p) => {
            let Some(p) = p.eval_constant() else {
                return LimitValue::DoesNotExist;
            };
            let right = sample(f, var, (1..=7).map(|k| p + 10f64.powi(-k)));
            let left = sample(f, var, (1..=7).map(|k| p - 10f64.powi(-k)));
            combine_sides(left, right)
        }
        LimitPoint::PositiveInfinity => sample(f, var, (1..=8).map(|k| 10f64.powi(k))),
        LimitPoint::NegativeInfinity => sample(f, var, (1..=8).map(|k| -(10f64.powi(k)))),
    };
    debug!("numeric limit estimate of {}: {:?}", f, estimate);
    match estimate {
        Estimate::Value(v) => LimitValue::Finite(recognise_number(v)),
        Estimate::PositiveInfinity => LimitValue::PositiveInfinity,
        Estimate::NegativeInfinity => LimitValue::NegativeInfinity,
        Estimate::Undefined | Estimate::Divergent => LimitValue::DoesNotExist,
    }
}

/// Classifies the sequence of values at sample points approaching the limit point
fn sample(f: &Expr, var: &str, points: impl Iterator<Item = f64>) -> Estimate {
    let values: Vec<f64> = points.map(|x| f.eval(var, x)).collect();
    if values.iter().all(|v| v.is_nan()) {
        return Estimate::Undefined;
    }
    let tail = &values[values.len() - 4..];
    if tail.iter().any(|v| v.is_nan()) {
        return Estimate::Divergent;
    }
    let increments: Vec<f64> = tail.windows(2).map(|w| w[1] - w[0]).collect();
    let increasing = increments.iter().all(|d| *d > 0.0);
    let decreasing = increments.iter().all(|d| *d < 0.0);
    let last = tail[3];
    if last.is_infinite() {
        return if last > 0.0 && increasing {
            Estimate::PositiveInfinity
        } else if last < 0.0 && decreasing {
            Estimate::NegativeInfinity
        } else {
            Estimate::Divergent
        };
    }
    let scale = last.abs().max(1.0);
    if increments[2].abs() <= 1e-5 * scale {
        return Estimate::Value(last);
    }
    // increments that do not shrink mean unbounded growth (logarithmic or faster)
    let not_shrinking = increments[2].abs() >= 0.5 * increments[1].abs()
        && increments[1].abs() >= 0.5 * increments[0].abs();
    if increasing && not_shrinking {
        return Estimate::PositiveInfinity;
    }
    if decreasing && not_shrinking {
        return Estimate::NegativeInfinity;
    }
    Estimate::Divergent
}

fn combine_sides(left: Estimate, right: Estimate) -> Estimate {
    match (left, right) {
        (Estimate::Undefined, side) | (side, Estimate::Undefined) => side,
        (Estimate::Value(a), Estimate::Value(b)) => {
            if (a - b).abs() <= 1e-4 * a.abs().max(b.abs()).max(1.0) {
                Estimate::Value((a + b) / 2.0)
            } else {
                Estimate::Divergent
            }
        }
        (Estimate::PositiveInfinity, Estimate::PositiveInfinity) => Estimate::PositiveInfinity,
        (Estimate::NegativeInfinity, Estimate::NegativeInfinity) => Estimate::NegativeInfinity,
        _ => Estimate::Divergent,
    }
}

/// Turns a sampled value into 0, a small rational, `e`, `π` or leaves it as a float
fn recognise_number(v: f64) -> Expr {
    let tolerance = 1e-5 * v.abs().max(1.0);
    if v.abs() < 1e-6 {
        return Expr::Const(0.0);
    }
    for q in 1..=100_i64 {
        let p = (v * q as f64).round();
        if (p / q as f64 - v).abs() < tolerance {
            return Expr::Const(p / q as f64);
        }
    }
    if (v - std::f64::consts::E).abs() < tolerance {
        return Expr::euler();
    }
    if (v - std::f64::consts::PI).abs() < tolerance {
        return Expr::Pi;
    }
    Expr::Const(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_at(input: &str, target: &str) -> LimitValue {
        let f = Expr::parse_expression(input).unwrap();
        let point = LimitPoint::parse(target).unwrap();
        f.limit("x", &point).unwrap()
    }

    fn raw_limit(input: &str, target: &str) -> String {
        limit_at(input, target).to_raw_string()
    }

    #[test]
    fn test_parse_limit_point() {
        assert_eq!(LimitPoint::parse("").unwrap(), LimitPoint::Finite(Expr::Const(0.0)));
        assert_eq!(LimitPoint::parse("oo").unwrap(), LimitPoint::PositiveInfinity);
        assert_eq!(LimitPoint::parse("+inf").unwrap(), LimitPoint::PositiveInfinity);
        assert_eq!(LimitPoint::parse("-Infinity").unwrap(), LimitPoint::NegativeInfinity);
        assert_eq!(LimitPoint::parse("-∞").unwrap(), LimitPoint::NegativeInfinity);
        assert_eq!(LimitPoint::parse("2").unwrap(), LimitPoint::Finite(Expr::Const(2.0)));
        assert!(matches!(LimitPoint::parse("pi/2").unwrap(), LimitPoint::Finite(_)));
    }

    #[test]
    fn test_parse_invalid_limit_point() {
        assert!(LimitPoint::parse("x").is_err());
        assert!(LimitPoint::parse("abc").is_err());
        assert!(LimitPoint::parse("ln(0)").is_err());
    }

    #[test]
    fn test_direct_substitution() {
        assert_eq!(raw_limit("x^2 + 1", "3"), "10");
        assert_eq!(raw_limit("sin(x)", "pi/2"), "1");
        assert_eq!(raw_limit("5", "oo"), "5");
    }

    #[test]
    fn test_removable_singularity() {
        assert_eq!(raw_limit("(x^2 - 1)/(x - 1)", "1"), "2");
        assert_eq!(raw_limit("sin(x)/x", "0"), "1");
        assert_eq!(raw_limit("(1 - cos(x))/x^2", "0"), "1/2");
        assert_eq!(raw_limit("(e^x - 1)/x", "0"), "1");
    }

    #[test]
    fn test_limits_at_infinity() {
        assert_eq!(raw_limit("1/x", "oo"), "0");
        assert_eq!(raw_limit("(2*x^2 + 1)/(x^2 - 3)", "oo"), "2");
        assert_eq!(raw_limit("x/e^x", "oo"), "0");
        assert_eq!(raw_limit("atan(x)", "oo"), "pi/2");
        assert_eq!(raw_limit("e^x", "-oo"), "0");
        assert_eq!(limit_at("x^3", "-oo"), LimitValue::NegativeInfinity);
        assert_eq!(limit_at("ln(x)", "oo"), LimitValue::PositiveInfinity);
    }

    #[test]
    fn test_zero_times_infinity() {
        assert_eq!(raw_limit("x*ln(x)", "0"), "0");
        assert_eq!(raw_limit("x*e^(-x)", "oo"), "0");
    }

    #[test]
    fn test_bounded_oscillation_is_squeezed() {
        assert_eq!(raw_limit("sin(x)/ln(x)", "oo"), "0");
        assert_eq!(raw_limit("cos(x)/x", "oo"), "0");
        assert_eq!(raw_limit("sin(x)^2/x", "-oo"), "0");
        assert_eq!(raw_limit("x*sin(1/x)", "0"), "0");
        // bounded but not vanishing
        assert_eq!(limit_at("x*sin(x)", "oo"), LimitValue::DoesNotExist);
    }

    #[test]
    fn test_variable_exponent() {
        assert_eq!(raw_limit("(1 + 1/x)^x", "oo"), "E");
        assert_eq!(raw_limit("x^x", "0"), "1");
    }

    #[test]
    fn test_infinite_and_nonexistent_limits() {
        assert_eq!(limit_at("1/x", "0"), LimitValue::DoesNotExist);
        assert_eq!(limit_at("1/x^2", "0"), LimitValue::PositiveInfinity);
        assert_eq!(limit_at("sin(1/x)", "0"), LimitValue::DoesNotExist);
        assert_eq!(limit_at("sin(x)", "oo"), LimitValue::DoesNotExist);
        assert_eq!(limit_at("ln(x)", "0"), LimitValue::NegativeInfinity);
    }

    #[test]
    fn test_limit_value_rendering() {
        assert_eq!(LimitValue::PositiveInfinity.to_raw_string(), "oo");
        assert_eq!(LimitValue::NegativeInfinity.to_latex(), "-\\infty");
        assert_eq!(LimitValue::DoesNotExist.to_latex(), "\\text{does not exist}");
        assert_eq!(LimitValue::Finite(Expr::Const(0.5)).to_latex(), "\\frac{1}{2}");
    }
}
