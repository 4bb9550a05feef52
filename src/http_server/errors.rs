//! # API Errors
//!
//! Maps calculation errors to HTTP status codes and JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::calculator::CalcError;

impl CalcError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            CalcError::MissingInput => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            CalcError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CalcError::Calculation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<CalcError> for ErrorResponse {
    fn from(err: CalcError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for CalcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if !self.is_client_error() {
            warn!("{}", self);
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr::ParseError;

    #[test]
    fn test_status_codes() {
        assert_eq!(CalcError::MissingInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CalcError::Parse(ParseError::new("(", "unbalanced parentheses")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            CalcError::Calculation("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::from(CalcError::MissingInput);
        assert_eq!(response.code, 400);
        assert_eq!(response.error, "No equation provided");
    }
}
