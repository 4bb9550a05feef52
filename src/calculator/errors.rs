//! Errors of the calculation path. Every variant surfaces to the client as a JSON
//! error body, see `http_server::errors`.

use thiserror::Error;

use crate::symbolic::parse_expr::ParseError;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Clone, Error)]
pub enum CalcError {
    /// `equation` query parameter absent or blank
    #[error("No equation provided")]
    MissingInput,

    /// the expression text could not be parsed
    #[error("Calculation error: {0}")]
    Parse(#[from] ParseError),

    /// the engine could not complete the operation (no antiderivative, bad limit target)
    #[error("Calculation error: {0}")]
    Calculation(String),
}

impl CalcError {
    /// true for errors caused by the request itself rather than by the engine
    pub fn is_client_error(&self) -> bool {
        matches!(self, CalcError::MissingInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(CalcError::MissingInput.to_string(), "No equation provided");
        let err = CalcError::Calculation("no elementary antiderivative found for exp(x**2)".into());
        assert_eq!(
            err.to_string(),
            "Calculation error: no elementary antiderivative found for exp(x**2)"
        );
        let parse = CalcError::from(ParseError::new("sin(x", "unbalanced parentheses"));
        assert!(parse.to_string().starts_with("Calculation error: "));
        assert!(parse.to_string().contains("unbalanced parentheses"));
    }

    #[test]
    fn test_client_errors() {
        assert!(CalcError::MissingInput.is_client_error());
        assert!(!CalcError::Calculation("x".into()).is_client_error());
    }
}
