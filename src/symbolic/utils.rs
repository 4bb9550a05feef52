// the collection of utility functions for bracket checking and number formatting

/// true when every bracket is closed by the matching kind and in order
pub fn brackets_balanced(s: &str) -> bool {
    let mut stack = Vec::new();
    for c in s.chars() {
        match c {
            '(' | '{' | '[' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

pub fn is_integer(value: f64) -> bool {
    value.is_finite() && (value - value.round()).abs() < 1e-12 * value.abs().max(1.0)
}

/// Small-denominator rational p/q (q > 0) approximating `value`, if one exists.
/// Integers come back with q = 1.
pub fn as_rational(value: f64) -> Option<(i64, i64)> {
    if !value.is_finite() || value.abs() > 1e15 {
        return None;
    }
    if is_integer(value) {
        return Some((value.round() as i64, 1));
    }
    for q in 2..=1000_i64 {
        let p = (value * q as f64).round();
        if (p / q as f64 - value).abs() < 1e-10 * value.abs().max(1.0) {
            return Some((p as i64, q));
        }
    }
    None
}

/// Formats a number the way it appears in plain output: integers without a
/// fractional part, simple fractions as p/q, anything else in shortest decimal form.
pub fn format_number(value: f64) -> String {
    match as_rational(value) {
        Some((p, 1)) => p.to_string(),
        Some((p, q)) => format!("{}/{}", p, q),
        None => format!("{}", value),
    }
}

/// Central finite difference, used to cross-check analytical derivatives
pub fn numerical_derivative<F: Fn(f64) -> f64>(f: F, x: f64, h: f64) -> f64 {
    (f(x + h) - f(x - h)) / (2.0 * h)
}
