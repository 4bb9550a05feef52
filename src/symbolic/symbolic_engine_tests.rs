//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_engine::Expr;
    use crate::symbolic::symbolic_limits::{LimitPoint, LimitValue};
    use crate::symbolic::utils::numerical_derivative;
    use approx::assert_relative_eq;

    fn parsed(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap()
    }

    fn compact(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_operators_build_trees() {
        let x = Expr::var("x");
        let expr = (x.clone() + Expr::Const(2.0)) * Expr::Const(3.0);
        let expected = Expr::Mul(
            Box::new(Expr::Add(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0)),
            )),
            Box::new(Expr::Const(3.0)),
        );
        assert_eq!(expr, expected);
        let neg_expr = -x;
        let expected = Expr::Mul(
            Box::new(Expr::Const(-1.0)),
            Box::new(Expr::Var("x".to_string())),
        );
        assert_eq!(neg_expr, expected);
    }

    #[test]
    fn test_diff_raw_tree() {
        let x = Expr::Var("x".to_string());
        let f = Expr::Pow(Box::new(x.clone()), Box::new(Expr::Const(2.0)));
        let df_dx = f.diff("x");
        assert_eq!(df_dx.simplify(), Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(x)));
    }

    #[test]
    fn test_derivative_power() {
        let df = parsed("x^2").derivative("x");
        assert!(df.to_raw_string().contains("2*x"));
    }

    #[test]
    fn test_derivative_trig() {
        assert!(parsed("sin(x)").derivative("x").to_raw_string().contains("cos(x)"));
        assert_eq!(parsed("cos(x)").derivative("x").to_raw_string(), "-sin(x)");
        assert_eq!(parsed("tan(x)").derivative("x").to_raw_string(), "tan(x)**2 + 1");
    }

    #[test]
    fn test_derivative_log_and_exp() {
        assert!(parsed("ln(x)").derivative("x").to_raw_string().contains("1/x"));
        assert!(parsed("exp(x)").derivative("x").to_raw_string().contains("exp(x)"));
        assert_eq!(parsed("e^x").derivative("x").to_raw_string(), "exp(x)");
    }

    #[test]
    fn test_derivative_polynomial() {
        let df = parsed("x^3 + 2*x").derivative("x");
        assert!(compact(&df.to_raw_string()).contains("3*x**2+2"));
    }

    #[test]
    fn test_derivative_chain_rule() {
        let df = parsed("sin(x^2)").derivative("x");
        assert!(df.to_raw_string().contains("2*x*cos(x**2)"));
        assert_eq!(df.to_latex(), "2 x \\cos{\\left(x^{2} \\right)}");
    }

    #[test]
    fn test_derivative_of_constant_is_zero() {
        assert_eq!(parsed("42").derivative("x").to_raw_string(), "0");
        assert_eq!(parsed("pi^2").derivative("x").to_raw_string(), "0");
    }

    #[test]
    fn test_n_th_derivative() {
        assert_eq!(parsed("x^4").n_th_derivative1D("x", 2).to_raw_string(), "12*x**2");
        assert_eq!(parsed("sin(x)").n_th_derivative1D("x", 4).to_raw_string(), "sin(x)");
    }

    /// analytical derivatives agree with central differences
    #[test]
    fn test_derivatives_against_finite_differences() {
        let cases = [
            "x^2*sin(x)",
            "e^(3x)/(x^2 + 1)",
            "sqrt(x^2 + 1)",
            "x^x",
            "2^x",
            "ln(x^2 + 1)",
            "atan(2x)",
            "asin(x/2)",
            "acos(x/3)",
            "acot(x)",
            "cot(x)",
            "sec(x)",
            "csc(x)",
            "sinh(x)*cosh(x)",
            "tanh(x^2)",
            "(x + 1)^(3/2)",
            "log(x)/x",
        ];
        for input in cases {
            let f = parsed(input);
            let df = f.derivative("x");
            for x0 in [0.3, 0.7, 1.3] {
                let numeric = numerical_derivative(|x| f.eval("x", x), x0, 1e-6);
                assert_relative_eq!(df.eval("x", x0), numeric, epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_results_are_idempotent() {
        for input in ["x^3 + 2*x", "sin(x^2)", "x*e^x", "(x + 1)/(x - 1)"] {
            let first = parsed(input).derivative("x");
            let second = parsed(input).derivative("x");
            assert_eq!(first.to_raw_string(), second.to_raw_string());
            assert_eq!(first.to_latex(), second.to_latex());
            assert_eq!(first.simplify(), first);
        }
    }

    #[test]
    fn test_integrals_of_common_forms() {
        assert!(parsed("2*x").integrate("x").unwrap().to_raw_string().contains("x**2"));
        assert!(parsed("cos(x)").integrate("x").unwrap().to_raw_string().contains("sin(x)"));
        assert!(parsed("1/x").integrate("x").unwrap().to_raw_string().contains("log(x)"));
    }

    #[test]
    fn test_integral_then_derivative_returns_integrand() {
        for input in ["x^2*e^x", "x*cos(2x)", "1/(x^2 + 4)", "tan(x)", "x/(x^2 + 1)"] {
            let f = parsed(input);
            let back = f.integrate("x").unwrap().derivative("x");
            for x0 in [0.2, 0.9] {
                assert_relative_eq!(back.eval("x", x0), f.eval("x", x0), epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_limits_of_common_forms() {
        let zero = LimitPoint::parse("0").unwrap();
        let one = LimitPoint::parse("1").unwrap();
        assert_eq!(
            parsed("(x^2-1)/(x-1)").limit("x", &one).unwrap().to_raw_string(),
            "2"
        );
        assert_eq!(parsed("sin(x)/x").limit("x", &zero).unwrap().to_raw_string(), "1");
        assert_eq!(
            parsed("1/x").limit("x", &LimitPoint::PositiveInfinity).unwrap().to_raw_string(),
            "0"
        );
        assert_eq!(parsed("1/x").limit("x", &zero).unwrap(), LimitValue::DoesNotExist);
        assert_eq!(parsed("1/x^2").limit("x", &zero).unwrap(), LimitValue::PositiveInfinity);
    }

    #[test]
    fn test_substitute_variable() {
        let f = parsed("x^2 + x");
        let g = f.substitute_variable("x", &parsed("sin(x)"));
        assert_eq!(g.to_raw_string(), "sin(x)**2 + sin(x)");
        assert_eq!(f.set_variable("x", 2.0).eval_constant(), Some(6.0));
    }
}
