//! Prompt texts sent to the model, one per operation.

use crate::calculator::Operation;

const REPLY_FORMAT: &str = r#"Format output as JSON:
{
    "explanation": "...",
    "steps": "..."
}"#;

/// Builds the prompt for one solved problem. `answer` is the plain-text result;
/// `target` is only used for limits.
pub fn build_prompt(operation: Operation, expression: &str, target: &str, answer: &str) -> String {
    let (problem, answer, instructions) = match operation {
        Operation::Derivative => (
            format!("derivative of {expression}"),
            answer.to_string(),
            "1. Explain the derivative rule used in 1 simple sentence.\n\
             2. Provide a brief step-by-step derivation in plain text (max 3 steps).",
        ),
        Operation::Integral => (
            format!("indefinite integral of {expression}"),
            format!("{answer} + C"),
            "1. Explain the integration rule used in 1 simple sentence.\n\
             2. Provide a brief step-by-step integration in plain text (max 3 steps).",
        ),
        Operation::Limit => (
            format!("limit of {expression} as x approaches {target}"),
            answer.to_string(),
            "1. Explain the limit rule or technique used (e.g. direct substitution, L'Hopital's).\n\
             2. Provide a brief step-by-step evaluation in plain text (max 3 steps).",
        ),
    };
    format!(
        "For the math problem: {problem}\nThe answer is: {answer}\n\n{instructions}\n\n{REPLY_FORMAT}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivative_prompt() {
        let prompt = build_prompt(Operation::Derivative, "x^2", "0", "2*x");
        assert!(prompt.starts_with("For the math problem: derivative of x^2\nThe answer is: 2*x\n"));
        assert!(prompt.contains("derivative rule used in 1 simple sentence"));
        assert!(prompt.contains("\"explanation\": \"...\""));
    }

    #[test]
    fn test_integral_prompt_adds_constant() {
        let prompt = build_prompt(Operation::Integral, "cos(x)", "0", "sin(x)");
        assert!(prompt.contains("indefinite integral of cos(x)"));
        assert!(prompt.contains("The answer is: sin(x) + C"));
    }

    #[test]
    fn test_limit_prompt_names_target() {
        let prompt = build_prompt(Operation::Limit, "sin(x)/x", "0", "1");
        assert!(prompt.contains("limit of sin(x)/x as x approaches 0"));
        assert!(prompt.contains("L'Hopital's"));
    }
}
