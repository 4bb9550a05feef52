//! Derivative practice problems generated from formula families.
//!
//! Each family is a template over small integer parameters (powers, coefficients,
//! shifts). Records are keyed by slug; an existing list is kept in front and
//! duplicates are skipped, so regenerating is idempotent.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use itertools::iproduct;
use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use super::CatalogueError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub slug: String,
    pub formula: String,
    pub title: String,
    pub description: String,
}

impl Problem {
    pub fn derivative(formula: &str, description_suffix: &str) -> Self {
        Self {
            slug: format!("derivative-of-{}", slugify(formula)),
            formula: formula.to_string(),
            title: format!("Derivative of {}", formula),
            description: format!("Calculate the derivative of {} {}", formula, description_suffix),
        }
    }
}

static DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("-{2,}").expect("dash pattern is valid"));

/// URL-safe spelling of a formula: `x^2+1` becomes `x-to-the-2-plus-1`
pub fn slugify(formula: &str) -> String {
    let mut slug = String::with_capacity(formula.len() * 2);
    for c in formula.chars() {
        match c {
            '^' => slug.push_str("-to-the-"),
            '/' => slug.push_str("-over-"),
            '+' => slug.push_str("-plus-"),
            '-' => slug.push_str("-minus-"),
            '*' | '(' | ')' => {}
            c if c.is_whitespace() => slug.push('-'),
            c => slug.extend(c.to_lowercase()),
        }
    }
    DASHES.replace_all(&slug, "-").trim_matches('-').to_string()
}

/// Problem list with slug deduplication
#[derive(Debug, Clone, Default)]
pub struct ProblemCatalogue {
    problems: Vec<Problem>,
    slugs: HashSet<String>,
    added: usize,
}

impl ProblemCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing list; its records stay first and in order
    pub fn from_existing(existing: Vec<Problem>) -> Self {
        let slugs = existing.iter().map(|p| p.slug.clone()).collect();
        Self {
            problems: existing,
            slugs,
            added: 0,
        }
    }

    /// false when a problem with the same slug is already present
    pub fn add(&mut self, formula: &str, description_suffix: &str) -> bool {
        let problem = Problem::derivative(formula, description_suffix);
        if !self.slugs.insert(problem.slug.clone()) {
            return false;
        }
        self.problems.push(problem);
        self.added += 1;
        true
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }

    /// problems added since construction
    pub fn added(&self) -> usize {
        self.added
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

const CHAIN: &str = "using the Chain Rule.";
const PRODUCT: &str = "using the Product Rule.";
const QUOTIENT: &str = "using the Quotient Rule.";
const SUM: &str = "using the Sum Rule.";
const DIFFERENCE: &str = "using the Difference Rule.";
const POWER: &str = "using the Power Rule.";
const GENERAL_POWER: &str = "using the General Power Rule.";
const LOG_DIFF: &str = "using Logarithmic Differentiation.";
const REPEATED_PRODUCT: &str = "using the Product Rule repeatedly.";

/// Adds every formula family to the catalogue
pub fn generate_problems(catalogue: &mut ProblemCatalogue) {
    // powers, constant multiples, sums and differences
    for n in 2..=20 {
        catalogue.add(&format!("x^{n}"), "step-by-step using the Power Rule.");
        catalogue.add(&format!("{n}*x^{n}"), "step-by-step.");
        catalogue.add(&format!("x^{n} + x^{}", n - 1), SUM);
        catalogue.add(&format!("x^{n} - x"), DIFFERENCE);
    }
    // trigonometric with coefficients
    for a in 2..=15 {
        catalogue.add(&format!("sin({a}*x)"), CHAIN);
        catalogue.add(&format!("cos({a}*x)"), CHAIN);
        catalogue.add(&format!("tan({a}*x)"), CHAIN);
        catalogue.add(&format!("{a}*sin(x)"), ".");
        catalogue.add(&format!("{a}*cos(x)"), ".");
    }
    // exponentials
    for a in 2..=15 {
        catalogue.add(&format!("e^({a}*x)"), CHAIN);
        catalogue.add(&format!("{a}^x"), "using the general exponential rule.");
        catalogue.add(&format!("x*e^({a}*x)"), PRODUCT);
    }
    // logarithms
    for a in 2..=15 {
        catalogue.add(&format!("ln({a}*x)"), CHAIN);
        catalogue.add(&format!("x*ln({a}*x)"), PRODUCT);
    }
    // rational
    for n in 2..=10 {
        catalogue.add(&format!("1/x^{n}"), "by rewriting as a negative exponent.");
        catalogue.add(&format!("{n}/x"), ".");
    }
    // roots
    for a in 2..=10 {
        catalogue.add(&format!("sqrt({a}*x)"), CHAIN);
        catalogue.add(&format!("x^(1/{a})"), POWER);
    }
    // inverse trigonometric and hyperbolic
    for a in 2..=10 {
        catalogue.add(&format!("asin({a}*x)"), CHAIN);
        catalogue.add(&format!("atan({a}*x)"), CHAIN);
    }
    for a in 2..=10 {
        catalogue.add(&format!("sinh({a}*x)"), CHAIN);
        catalogue.add(&format!("cosh({a}*x)"), CHAIN);
    }
    // product and quotient rule
    for n in 2..=5 {
        catalogue.add(&format!("x^{n}*sin(x)"), PRODUCT);
        catalogue.add(&format!("x^{n}*cos(x)"), PRODUCT);
        catalogue.add(&format!("x^{n}*e^x"), PRODUCT);
        catalogue.add(&format!("sin(x)/x^{n}"), QUOTIENT);
        catalogue.add(&format!("e^x/x^{n}"), QUOTIENT);
    }
    for (a, b) in iproduct!(2..=10, 2..=5) {
        catalogue.add(&format!("sin({a}*x)+cos({b}*x)"), SUM);
        catalogue.add(&format!("e^({a}*x)+x^{b}"), SUM);
    }
    for (a, b) in iproduct!(2..=7, 2..=5) {
        catalogue.add(&format!("e^({a}*x)*sin({b}*x)"), PRODUCT);
        catalogue.add(&format!("e^({a}*x)*cos({b}*x)"), PRODUCT);
    }
    // chain rule compositions
    for n in 2..=10 {
        catalogue.add(&format!("sin(x^{n})"), CHAIN);
        catalogue.add(&format!("cos(x^{n})"), CHAIN);
        catalogue.add(&format!("e^(x^{n})"), CHAIN);
        catalogue.add(&format!("ln(x^{n})"), CHAIN);
    }
    for formula in [
        "ln(sin(x))",
        "ln(cos(x))",
        "ln(tan(x))",
        "sin(ln(x))",
        "cos(ln(x))",
        "e^(sin(x))",
        "e^(cos(x))",
    ] {
        catalogue.add(formula, CHAIN);
    }
    for n in 3..=7 {
        for m in 2..n {
            catalogue.add(&format!("x^{n}+x^{m}"), SUM);
            catalogue.add(&format!("x^{n}-x^{m}"), DIFFERENCE);
        }
    }
    for n in 1..=5 {
        catalogue.add(&format!("x/(x^{}+1)", 2 * n), QUOTIENT);
        catalogue.add(&format!("1/(x^{n}+1)"), QUOTIENT);
    }
    for n in 2..=10 {
        catalogue.add(&format!("x^{n}*asin(x)"), PRODUCT);
        catalogue.add(&format!("x^{n}*atan(x)"), PRODUCT);
        catalogue.add(&format!("x^{n}*sinh(x)"), PRODUCT);
        catalogue.add(&format!("x^{n}*cosh(x)"), PRODUCT);
    }
    // binomial powers of linear arguments
    for (a, b, n) in iproduct!(2..=5, 1..=5, 2..=5) {
        catalogue.add(&format!("({a}*x+{b})^{n}"), GENERAL_POWER);
        catalogue.add(&format!("({a}*x-{b})^{n}"), GENERAL_POWER);
    }
    // logarithmic differentiation candidates
    for formula in ["x^x", "x^sin(x)", "sin(x)^x", "x^ln(x)"] {
        catalogue.add(formula, LOG_DIFF);
    }
    for a in 1..=10 {
        catalogue.add(&format!("sqrt(x^2+{a})"), CHAIN);
        catalogue.add(&format!("sqrt(x^2-{a})"), CHAIN);
        catalogue.add(&format!("sqrt({a}-x^2)"), CHAIN);
        catalogue.add(&format!("1/sqrt({a}-x^2)"), CHAIN);
    }
    for a in 2..=10 {
        catalogue.add(&format!("sin({a}*x)*cos({a}*x)"), PRODUCT);
        catalogue.add(&format!("tan({a}*x)*sec({a}*x)"), PRODUCT);
    }
    for a in 1..=10 {
        catalogue.add(&format!("ln(x^2+{a})"), CHAIN);
        catalogue.add(&format!("ln(x^2-{a})"), CHAIN);
        catalogue.add(&format!("e^(x^2+{a})"), CHAIN);
        catalogue.add(&format!("sin(x^2+{a})"), CHAIN);
        catalogue.add(&format!("cos(x^2+{a})"), CHAIN);
    }
    for (a, n) in iproduct!(1..=5, 2..=5) {
        catalogue.add(&format!("(x^2+{a})^{n}"), GENERAL_POWER);
        catalogue.add(&format!("(x^2-{a})^{n}"), GENERAL_POWER);
        catalogue.add(&format!("(x^3+{a})^{n}"), GENERAL_POWER);
    }
    for formula in ["x*e^x*sin(x)", "x*ln(x)*sin(x)", "x^2*e^x*cos(x)"] {
        catalogue.add(formula, REPEATED_PRODUCT);
    }
    // trigonometric powers
    for n in 3..=10 {
        catalogue.add(&format!("sin(x)^{n}"), CHAIN);
        catalogue.add(&format!("cos(x)^{n}"), CHAIN);
        catalogue.add(&format!("tan(x)^{n}"), CHAIN);
    }
    // fractional powers
    for n in (3..15).step_by(2) {
        catalogue.add(&format!("x^({n}/2)"), POWER);
    }
    for a in 1..=10 {
        catalogue.add(&format!("1/(x^2+{a})^2"), CHAIN);
        catalogue.add(&format!("x/(x^2+{a})^2"), QUOTIENT);
    }
    // linear arguments
    for (a, b) in iproduct!(2..=5, 1..=5) {
        catalogue.add(&format!("e^({a}*x+{b})"), CHAIN);
        catalogue.add(&format!("e^({a}*x-{b})"), CHAIN);
    }
    for (a, b) in iproduct!(2..=5, 1..=5) {
        catalogue.add(&format!("sin({a}*x+{b})"), CHAIN);
        catalogue.add(&format!("cos({a}*x+{b})"), CHAIN);
    }
    for a in 2..=10 {
        catalogue.add(&format!("asin(x/{a})"), CHAIN);
        catalogue.add(&format!("acos(x/{a})"), CHAIN);
        catalogue.add(&format!("atan(x/{a})"), CHAIN);
    }
}

/// Reads a problem list; a missing file is an empty list
pub fn load_problems(path: &Path) -> Result<Vec<Problem>, CatalogueError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(|e| CatalogueError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| CatalogueError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the list as JSON indented by four spaces
pub fn save_problems(path: &Path, problems: &[Problem]) -> Result<(), CatalogueError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CatalogueError::io(parent, e))?;
    }
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    problems
        .serialize(&mut serializer)
        .map_err(|source| CatalogueError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, buffer).map_err(|e| CatalogueError::io(path, e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub before: usize,
    pub generated: usize,
    pub total: usize,
}

/// Merges freshly generated problems into the file at `path`
pub fn update_problem_file(path: &Path) -> Result<UpdateSummary, CatalogueError> {
    let existing = load_problems(path)?;
    let before = existing.len();
    let mut catalogue = ProblemCatalogue::from_existing(existing);
    generate_problems(&mut catalogue);
    let summary = UpdateSummary {
        before,
        generated: catalogue.added(),
        total: catalogue.len(),
    };
    save_problems(path, catalogue.problems())?;
    info!(
        "problems before: {}, new: {}, total: {} ({})",
        summary.before,
        summary.generated,
        summary.total,
        path.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("x^2"), "x-to-the-2");
        assert_eq!(slugify("x^2 + x^1"), "x-to-the-2-plus-x-to-the-1");
        assert_eq!(slugify("sin(2*x)+cos(3*x)"), "sin2x-plus-cos3x");
        assert_eq!(slugify("1/x^3"), "1-over-x-to-the-3");
        assert_eq!(slugify("(2*x-1)^2"), "2x-minus-1-to-the-2");
        assert_eq!(slugify("x^(1/2)"), "x-to-the-1-over-2");
        assert_eq!(slugify("-x"), "minus-x");
    }

    #[test]
    fn test_problem_record() {
        let problem = Problem::derivative("x^2", "step-by-step using the Power Rule.");
        assert_eq!(problem.slug, "derivative-of-x-to-the-2");
        assert_eq!(problem.title, "Derivative of x^2");
        assert_eq!(
            problem.description,
            "Calculate the derivative of x^2 step-by-step using the Power Rule."
        );
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let existing = vec![Problem::derivative("x^2", "old.")];
        let mut catalogue = ProblemCatalogue::from_existing(existing);
        assert!(!catalogue.add("x^2", "new."));
        assert!(catalogue.add("x^3", "new."));
        assert_eq!(catalogue.added(), 1);
        assert_eq!(catalogue.problems()[0].description, "Calculate the derivative of x^2 old.");
    }

    #[test]
    fn test_generation_is_large_and_unique() {
        let mut catalogue = ProblemCatalogue::new();
        generate_problems(&mut catalogue);
        assert!(catalogue.len() > 900);
        let slugs: HashSet<_> = catalogue.problems().iter().map(|p| &p.slug).collect();
        assert_eq!(slugs.len(), catalogue.len());
        // a second pass adds nothing
        generate_problems(&mut catalogue);
        assert_eq!(catalogue.added(), catalogue.len());
    }

    #[test]
    fn test_every_formula_parses_and_differentiates() {
        let mut catalogue = ProblemCatalogue::new();
        generate_problems(&mut catalogue);
        for problem in catalogue.problems() {
            let expr = Expr::parse_expression(&problem.formula)
                .unwrap_or_else(|e| panic!("{}: {}", problem.formula, e));
            let derivative = expr.derivative("x");
            assert!(!derivative.to_raw_string().is_empty(), "{}", problem.formula);
            assert!(!derivative.to_latex().is_empty(), "{}", problem.formula);
        }
    }

    #[test]
    fn test_update_problem_file_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("problems.json");
        save_problems(&path, &[Problem::derivative("x^2", "kept.")]).unwrap();
        let summary = update_problem_file(&path).unwrap();
        assert_eq!(summary.before, 1);
        assert_eq!(summary.total, summary.before + summary.generated);
        let problems = load_problems(&path).unwrap();
        assert_eq!(problems.len(), summary.total);
        assert_eq!(problems[0].description, "Calculate the derivative of x^2 kept.");
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"slug\""));
        // rerun is idempotent
        let again = update_problem_file(&path).unwrap();
        assert_eq!(again.generated, 0);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_problems(&dir.path().join("none.json")).unwrap().is_empty());
    }
}
