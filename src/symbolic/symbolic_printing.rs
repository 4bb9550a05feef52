//! # Printing Module
//!
//! Two renderings of an [`Expr`]:
//!
//! - `to_raw_string()` - the plain computer-algebra form: `**` for powers, `log` for the
//!   natural logarithm, `E` and `pi` for the constants, `2*x*cos(x**2)`
//! - `to_latex()` - LaTeX markup for display: `2 x \cos{\left(x^{2} \right)}`
//!
//! Both printers split a product into numerator and denominator, so a canonical
//! `Mul(x^2, Const(0.5))` prints as `x**2/2` and `\frac{x^{2}}{2}`.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{as_rational, format_number, is_integer};

/// Sign, numeric coefficient and the factors above and below the fraction bar
struct Product {
    negative: bool,
    coeff: f64,
    numerator: Vec<Expr>,
    denominator: Vec<Expr>,
}

impl Product {
    fn decompose(expr: &Expr) -> Product {
        let mut factors = Vec::new();
        flatten_product(expr, false, &mut factors);
        let mut coeff = 1.0;
        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for (factor, inverted) in factors {
            match (&factor, inverted) {
                (Expr::Const(c), false) => coeff *= c,
                (Expr::Const(c), true) => coeff /= c,
                (Expr::Pow(base, exp), false) if exp.as_const().is_some_and(|n| n < 0.0) => {
                    denominator.push(invert_power(base, exp));
                }
                (_, false) => numerator.push(factor),
                (Expr::Pow(base, exp), true) if exp.as_const().is_some_and(|n| n < 0.0) => {
                    numerator.push(invert_power(base, exp));
                }
                (_, true) => denominator.push(factor),
            }
        }
        Product {
            negative: coeff < 0.0,
            coeff: coeff.abs(),
            numerator,
            denominator,
        }
    }

    /// (p, q) when the coefficient is rational, (coeff, 1) otherwise
    fn coeff_parts(&self) -> (String, Option<String>) {
        match as_rational(self.coeff) {
            Some((p, 1)) => (p.to_string(), None),
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (format_number(self.coeff), None),
        }
    }
}

fn flatten_product(expr: &Expr, inverted: bool, out: &mut Vec<(Expr, bool)>) {
    match expr {
        Expr::Mul(lhs, rhs) => {
            flatten_product(lhs, inverted, out);
            flatten_product(rhs, inverted, out);
        }
        Expr::Div(lhs, rhs) => {
            flatten_product(lhs, inverted, out);
            flatten_product(rhs, !inverted, out);
        }
        _ => out.push((expr.clone(), inverted)),
    }
}

fn invert_power(base: &Expr, exp: &Expr) -> Expr {
    match exp.as_const() {
        Some(n) if n == -1.0 => base.clone(),
        Some(n) => Expr::Pow(Box::new(base.clone()), Box::new(Expr::Const(-n))),
        None => Expr::Pow(Box::new(base.clone()), Box::new(exp.clone())),
    }
}

fn flatten_sum(expr: &Expr, negated: bool, out: &mut Vec<(Expr, bool)>) {
    match expr {
        Expr::Add(lhs, rhs) => {
            flatten_sum(lhs, negated, out);
            flatten_sum(rhs, negated, out);
        }
        Expr::Sub(lhs, rhs) => {
            flatten_sum(lhs, negated, out);
            flatten_sum(rhs, !negated, out);
        }
        _ => out.push((expr.clone(), negated)),
    }
}

fn is_sum(expr: &Expr) -> bool {
    matches!(expr, Expr::Add(_, _) | Expr::Sub(_, _))
}

fn is_product(expr: &Expr) -> bool {
    matches!(expr, Expr::Mul(_, _) | Expr::Div(_, _))
}

fn negative_const(expr: &Expr) -> bool {
    matches!(expr, Expr::Const(c) if *c < 0.0)
}

fn raw_function_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::Exp(_) => "exp",
        Expr::Ln(_) => "log",
        Expr::sin(_) => "sin",
        Expr::cos(_) => "cos",
        Expr::tg(_) => "tan",
        Expr::ctg(_) => "cot",
        Expr::arcsin(_) => "asin",
        Expr::arccos(_) => "acos",
        Expr::arctg(_) => "atan",
        Expr::arcctg(_) => "acot",
        Expr::sinh(_) => "sinh",
        Expr::cosh(_) => "cosh",
        Expr::tanh(_) => "tanh",
        _ => "",
    }
}

impl Expr {
    /// Plain computer-algebra text of the expression.
    pub fn to_raw_string(&self) -> String {
        raw(self)
    }

    /// LaTeX markup of the expression.
    pub fn to_latex(&self) -> String {
        latex(self)
    }
}

//___________________________________RAW____________________________________

fn raw(expr: &Expr) -> String {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => raw_sum(expr),
        Expr::Mul(_, _) | Expr::Div(_, _) => {
            let (negative, body) = raw_signed(expr);
            if negative { format!("-{}", body) } else { body }
        }
        Expr::Pow(base, exp) => raw_power_standalone(base, exp),
        Expr::Const(c) => format_number(*c),
        Expr::Var(name) => name.clone(),
        Expr::Pi => "pi".to_string(),
        Expr::Exp(arg) if arg.is_one() => "E".to_string(),
        other => match other.function_arg() {
            Some(arg) => format!("{}({})", raw_function_name(other), raw(arg)),
            None => String::new(),
        },
    }
}

fn raw_sum(expr: &Expr) -> String {
    let mut terms = Vec::new();
    flatten_sum(expr, false, &mut terms);
    let mut out = String::new();
    for (i, (term, negated)) in terms.iter().enumerate() {
        let (negative, body) = raw_signed(term);
        let negative = negative != *negated;
        if i == 0 {
            if negative {
                out.push('-');
            }
        } else {
            out.push_str(if negative { " - " } else { " + " });
        }
        out.push_str(&body);
    }
    out
}

/// sign and unsigned text of a term
fn raw_signed(term: &Expr) -> (bool, String) {
    match term {
        Expr::Const(c) if *c < 0.0 => (true, format_number(-c)),
        Expr::Mul(_, _) | Expr::Div(_, _) => {
            let product = Product::decompose(term);
            (product.negative, raw_product_body(&product))
        }
        Expr::Add(_, _) | Expr::Sub(_, _) => (false, format!("({})", raw(term))),
        _ => (false, raw(term)),
    }
}

fn raw_product_body(product: &Product) -> String {
    let (p, q) = product.coeff_parts();
    if product.numerator.is_empty() && p == "1" && q.is_none() {
        if let [single] = product.denominator.as_slice() {
            return format!("1/{}", raw_factor(single));
        }
    }
    let mut numerator: Vec<String> = Vec::new();
    if p != "1" {
        numerator.push(p);
    }
    numerator.extend(product.numerator.iter().map(raw_factor));
    let numerator = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join("*")
    };
    let mut denominator: Vec<String> = q.into_iter().collect();
    denominator.extend(product.denominator.iter().map(raw_factor));
    match denominator.len() {
        0 => numerator,
        1 => format!("{}/{}", numerator, denominator[0]),
        _ => format!("{}/({})", numerator, denominator.join("*")),
    }
}

fn raw_factor(factor: &Expr) -> String {
    match factor {
        Expr::Add(_, _) | Expr::Sub(_, _) => format!("({})", raw(factor)),
        Expr::Pow(base, exp) => raw_power(base, exp),
        Expr::Const(c) if *c < 0.0 => format!("({})", format_number(*c)),
        _ => raw(factor),
    }
}

fn raw_power_standalone(base: &Expr, exp: &Expr) -> String {
    match exp.as_const() {
        Some(n) if n == -1.0 => format!("1/{}", raw_factor(base)),
        Some(n) if n == -0.5 => format!("1/sqrt({})", raw(base)),
        _ => raw_power(base, exp),
    }
}

fn raw_power(base: &Expr, exp: &Expr) -> String {
    if exp.as_const() == Some(0.5) {
        return format!("sqrt({})", raw(base));
    }
    let needs_parens = is_sum(base)
        || is_product(base)
        || matches!(base, Expr::Pow(_, _))
        || matches!(base, Expr::Const(c) if *c < 0.0 || !is_integer(*c));
    let base_str = if needs_parens {
        format!("({})", raw(base))
    } else {
        raw(base)
    };
    let exp_str = match exp {
        Expr::Const(n) if *n >= 0.0 && is_integer(*n) => format_number(*n),
        Expr::Var(_) | Expr::Pi => raw(exp),
        other if other.function_arg().is_some() => raw(exp),
        _ => format!("({})", raw(exp)),
    };
    format!("{}**{}", base_str, exp_str)
}

//___________________________________LATEX____________________________________

fn latex_function_name(expr: &Expr) -> &'static str {
    match expr {
        Expr::sin(_) => "\\sin",
        Expr::cos(_) => "\\cos",
        Expr::tg(_) => "\\tan",
        Expr::ctg(_) => "\\cot",
        Expr::sinh(_) => "\\sinh",
        Expr::cosh(_) => "\\cosh",
        Expr::tanh(_) => "\\tanh",
        Expr::arcsin(_) => "\\operatorname{asin}",
        Expr::arccos(_) => "\\operatorname{acos}",
        Expr::arctg(_) => "\\operatorname{atan}",
        Expr::arcctg(_) => "\\operatorname{acot}",
        _ => "\\log",
    }
}

fn latex(expr: &Expr) -> String {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => latex_sum(expr),
        Expr::Mul(_, _) | Expr::Div(_, _) => latex_signed_text(expr),
        Expr::Pow(_, exp) if exp.as_const().is_some_and(|n| n < 0.0) => latex_signed_text(expr),
        Expr::Pow(base, exp) => latex_power(base, exp),
        Expr::Const(c) => latex_signed_text(&Expr::Const(*c)),
        Expr::Var(name) => name.clone(),
        Expr::Pi => "\\pi".to_string(),
        Expr::Exp(arg) if arg.is_one() => "e".to_string(),
        Expr::Exp(arg) => format!("e^{{{}}}", latex(arg)),
        other => match other.function_arg() {
            Some(arg) => format!(
                "{}{{\\left({} \\right)}}",
                latex_function_name(other),
                latex(arg)
            ),
            None => String::new(),
        },
    }
}

fn latex_signed_text(expr: &Expr) -> String {
    let (negative, body) = latex_signed(expr);
    if negative { format!("- {}", body) } else { body }
}

fn latex_sum(expr: &Expr) -> String {
    let mut terms = Vec::new();
    flatten_sum(expr, false, &mut terms);
    let mut out = String::new();
    for (i, (term, negated)) in terms.iter().enumerate() {
        let (negative, body) = latex_signed(term);
        let negative = negative != *negated;
        if i == 0 {
            if negative {
                out.push_str("- ");
            }
        } else {
            out.push_str(if negative { " - " } else { " + " });
        }
        out.push_str(&body);
    }
    out
}

fn latex_signed(term: &Expr) -> (bool, String) {
    match term {
        Expr::Const(c) => {
            let product = Product {
                negative: *c < 0.0,
                coeff: c.abs(),
                numerator: Vec::new(),
                denominator: Vec::new(),
            };
            (product.negative, latex_product_body(&product))
        }
        Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Pow(_, _) => {
            let product = Product::decompose(term);
            (product.negative, latex_product_body(&product))
        }
        Expr::Add(_, _) | Expr::Sub(_, _) => (false, format!("\\left({}\\right)", latex(term))),
        _ => (false, latex(term)),
    }
}

fn latex_product_body(product: &Product) -> String {
    let (p, q) = product.coeff_parts();
    let mut numerator: Vec<String> = Vec::new();
    if p != "1" || product.numerator.is_empty() {
        numerator.push(p);
    }
    numerator.extend(product.numerator.iter().map(latex_factor));
    let numerator = numerator.join(" ");
    let mut denominator: Vec<String> = q.into_iter().collect();
    denominator.extend(product.denominator.iter().map(latex_factor));
    if denominator.is_empty() {
        numerator
    } else {
        format!("\\frac{{{}}}{{{}}}", numerator, denominator.join(" "))
    }
}

fn latex_factor(factor: &Expr) -> String {
    match factor {
        Expr::Add(_, _) | Expr::Sub(_, _) => format!("\\left({}\\right)", latex(factor)),
        Expr::Pow(base, exp) => latex_power(base, exp),
        _ => latex(factor),
    }
}

fn latex_power(base: &Expr, exp: &Expr) -> String {
    if let Some(n) = exp.as_const() {
        if n == 0.5 {
            return format!("\\sqrt{{{}}}", latex(base));
        }
        if let Some((1, q)) = as_rational(n) {
            if q > 1 {
                return format!("\\sqrt[{}]{{{}}}", q, latex(base));
            }
        }
        // sin^2(x)
        if n > 0.0 && is_integer(n) && base.function_arg().is_some() && !matches!(base, Expr::Exp(_) | Expr::Ln(_)) {
            if let Some(arg) = base.function_arg() {
                return format!(
                    "{}^{{{}}}{{\\left({} \\right)}}",
                    latex_function_name(base),
                    format_number(n),
                    latex(arg)
                );
            }
        }
    }
    let needs_parens = is_sum(base)
        || is_product(base)
        || matches!(base, Expr::Pow(_, _) | Expr::Exp(_))
        || negative_const(base)
        || matches!(base, Expr::Const(c) if !is_integer(*c));
    let base_str = if needs_parens {
        format!("\\left({}\\right)", latex(base))
    } else {
        latex(base)
    };
    format!("{}^{{{}}}", base_str, latex(exp))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap().simplify()
    }

    #[test]
    fn test_raw_numbers_and_constants() {
        assert_eq!(Expr::Const(3.0).to_raw_string(), "3");
        assert_eq!(Expr::Const(-0.5).to_raw_string(), "-1/2");
        assert_eq!(Expr::Pi.to_raw_string(), "pi");
        assert_eq!(Expr::euler().to_raw_string(), "E");
    }

    #[test]
    fn test_raw_products_and_fractions() {
        assert_eq!(parsed("2*x*cos(x^2)").to_raw_string(), "2*x*cos(x**2)");
        assert_eq!(parsed("x^2/2").to_raw_string(), "x**2/2");
        assert_eq!(parsed("1/x").to_raw_string(), "1/x");
        assert_eq!(parsed("-3/x^2").to_raw_string(), "-3/x**2");
        assert_eq!(parsed("2*x/(x^2+1)").to_raw_string(), "2*x/(x**2 + 1)");
        assert_eq!(parsed("exp(x)/(x*sin(x))").to_raw_string(), "exp(x)/(x*sin(x))");
    }

    #[test]
    fn test_raw_powers() {
        assert_eq!(parsed("x^(3/2)").to_raw_string(), "x**(3/2)");
        assert_eq!(parsed("sqrt(x)").to_raw_string(), "sqrt(x)");
        assert_eq!(parsed("1/sqrt(1-x^2)").to_raw_string(), "1/sqrt(1 - x**2)");
        assert_eq!(parsed("x^x").to_raw_string(), "x**x");
        assert_eq!(parsed("2^x").to_raw_string(), "2**x");
        assert_eq!(parsed("(x+1)^2").to_raw_string(), "(x + 1)**2");
    }

    #[test]
    fn test_raw_function_names() {
        assert_eq!(parsed("tan(x)").to_raw_string(), "tan(x)");
        assert_eq!(parsed("arctan(x)").to_raw_string(), "atan(x)");
        assert_eq!(parsed("ln(x)").to_raw_string(), "log(x)");
        assert_eq!(parsed("e^x").to_raw_string(), "exp(x)");
    }

    #[test]
    fn test_raw_sum_signs() {
        assert_eq!(parsed("x^3 - 2*x + 1").to_raw_string(), "x**3 - 2*x + 1");
        assert_eq!(parsed("-x").to_raw_string(), "-x");
    }

    #[test]
    fn test_latex_basic() {
        assert_eq!(parsed("2*x*cos(x^2)").to_latex(), "2 x \\cos{\\left(x^{2} \\right)}");
        assert_eq!(parsed("x^2/2").to_latex(), "\\frac{x^{2}}{2}");
        assert_eq!(parsed("1/x").to_latex(), "\\frac{1}{x}");
        assert_eq!(parsed("e^x").to_latex(), "e^{x}");
        assert_eq!(parsed("ln(x)").to_latex(), "\\log{\\left(x \\right)}");
        assert_eq!(parsed("sqrt(x)").to_latex(), "\\sqrt{x}");
        assert_eq!(parsed("sin(x)^2").to_latex(), "\\sin^{2}{\\left(x \\right)}");
        assert_eq!(parsed("asin(x)").to_latex(), "\\operatorname{asin}{\\left(x \\right)}");
    }

    #[test]
    fn test_latex_sums_and_signs() {
        assert_eq!(parsed("3*x^2 + 2").to_latex(), "3 x^{2} + 2");
        assert_eq!(parsed("-sin(x)").to_latex(), "- \\sin{\\left(x \\right)}");
        assert_eq!(parsed("1 - x^2").to_latex(), "1 - x^{2}");
        assert_eq!(parsed("x*(x+1)").to_latex(), "x \\left(x + 1\\right)");
        assert_eq!(Expr::Const(-0.5).to_latex(), "- \\frac{1}{2}");
        assert_eq!(Expr::Pi.to_latex(), "\\pi");
    }
}
