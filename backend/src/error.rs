//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.
//!
//! Authentication failures are deliberately opaque: every token and
//! credential error becomes the same 401 body, and the concrete cause
//! only reaches the logs.

use crate::auth::{CredentialError, GuardError, TokenError};
use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use devbook_shared::{ErrorDetail, ErrorResponse, ValidationError};
use thiserror::Error;
use tracing::{debug, error};

/// Message returned for every 401, whatever the underlying cause
pub const UNAUTHORIZED_MESSAGE: &str = "invalid or missing credentials";

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        if let TokenError::SigningFailure(_) = err {
            return ApiError::Internal(err.into());
        }
        debug!(cause = %err, "Rejected access token");
        ApiError::Unauthorized
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        if let CredentialError::HashingFailure(_) = err {
            return ApiError::Internal(err.into());
        }
        debug!("Rejected credential");
        ApiError::Unauthorized
    }
}

impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Forbidden => ApiError::Forbidden,
            GuardError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            GuardError::Lookup(e) => ApiError::Internal(e),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, code, message) = match &self {
            ApiError::Validation(err) => {
                field = Some(err.field.to_string());
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.message.clone())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                UNAUTHORIZED_MESSAGE.to_string(),
            ),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "forbidden".to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_status() {
        let error = ApiError::from(ValidationError::new("nick", "nick is required"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("User not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_every_token_error_collapses_to_401() {
        let causes = [
            TokenError::Malformed,
            TokenError::BadSignature,
            TokenError::Expired,
            TokenError::UnsupportedAlgorithm,
            TokenError::ClaimDecode,
        ];
        for cause in causes {
            let response = ApiError::from(cause).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_signing_failure_is_internal() {
        let response =
            ApiError::from(TokenError::SigningFailure("empty secret".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_credential_mismatch_is_401() {
        let response = ApiError::from(CredentialError::Mismatch).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_guard_errors() {
        let forbidden = ApiError::from(GuardError::Forbidden).into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let missing = ApiError::from(GuardError::NotFound).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unauthorized_body_is_generic() {
        let expired = ApiError::from(TokenError::Expired).into_response();
        let tampered = ApiError::from(TokenError::BadSignature).into_response();

        let a = axum::body::to_bytes(expired.into_body(), usize::MAX).await.unwrap();
        let b = axum::body::to_bytes(tampered.into_body(), usize::MAX).await.unwrap();
        assert_eq!(a, b);

        let body: serde_json::Value = serde_json::from_slice(&a).unwrap();
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert_eq!(body["error"]["message"], UNAUTHORIZED_MESSAGE);
    }
}
