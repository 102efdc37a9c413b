use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::api::metrics;

/// Failure taxonomy for the request-handling surface. Every service returns
/// this; the `ResponseError` impl maps it onto the wire contract
/// (`{"error": <message>}` plus a status code).
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Missing or malformed field, invalid identifier, duplicate link.
    InvalidRequest(String),
    /// Credential mismatch or missing/invalid bearer token.
    Unauthorized(String),
    /// User, bracelet, or reading lookup miss.
    NotFound(String),
    /// Duplicate email on signup.
    Conflict(String),
    /// Database or runtime failure. The detail is logged, never exposed.
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::InvalidRequest(msg)
            | ServiceError::Unauthorized(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::Conflict(msg) => write!(f, "{}", msg),
            ServiceError::Internal(_) => write!(f, "Internal server error"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        metrics::increment_error_count();

        if let ServiceError::Internal(detail) = self {
            log::error!("💥 Internal error: {}", detail);
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

impl From<mongodb::error::Error> for ServiceError {
    fn from(err: mongodb::error::Error) -> Self {
        ServiceError::Internal(format!("Database error: {}", err))
    }
}

impl From<bcrypt::BcryptError> for ServiceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ServiceError::Internal(format!("Password hashing error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ServiceError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = ServiceError::Internal("connection refused at 10.0.0.3:27017".into());
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = ServiceError::NotFound("Bracelet does not exist.".into());
        assert_eq!(err.to_string(), "Bracelet does not exist.");
    }
}
