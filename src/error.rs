//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It is the single place where failures are turned into HTTP responses: every handler,
//! extractor and the identity middleware hand back an `AppError`, and its
//! `actix_web::error::ResponseError` implementation renders the structured body
//!
//! ```json
//! { "timestamp": "...", "status": 401, "error": "Invalid Token", "message": "..." }
//! ```
//!
//! Authentication failures are coarse: an expired token, a forged token and
//! a token for an unknown account all render the same `InvalidToken` response, and an
//! unknown email renders the same `BadCredentials` response as a wrong password.
//! Server-side failures are logged with their detail and rendered with a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Message shared by every login failure so callers cannot tell which check failed.
pub const BAD_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
/// Message shared by every token failure.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid JWT token";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Sign-up with an email that already has an account (HTTP 400).
    #[error("an account with email `{0}` already exists")]
    DuplicateAccount(String),
    /// Login with an unknown email or a wrong password (HTTP 400).
    #[error("{}", BAD_CREDENTIALS_MESSAGE)]
    BadCredentials,
    /// A bearer token that is malformed, forged, expired or names an unknown account (HTTP 401).
    #[error("{}", INVALID_TOKEN_MESSAGE)]
    InvalidToken,
    /// A protected route was reached without any bearer token (HTTP 401).
    #[error("authentication required")]
    Unauthenticated,
    /// Represents a client-side error due to a malformed request (HTTP 400).
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Represents a situation where a requested resource was not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),
    /// Represents an error due to failed input validation (HTTP 422 Unprocessable Entity).
    #[error("validation error: {0}")]
    Validation(String),
    /// Persistence failure (HTTP 500). The detail is logged, never rendered.
    #[error("database error: {0}")]
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    #[error("internal server error: {0}")]
    Internal(String),
}

/// JSON body rendered for every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl AppError {
    /// Short, stable label rendered in the `error` field.
    fn label(&self) -> &'static str {
        match self {
            AppError::DuplicateAccount(_) => "Duplicate Entry",
            AppError::BadCredentials => "Bad Credentials",
            AppError::InvalidToken => "Invalid Token",
            AppError::Unauthenticated => "Unauthorized",
            AppError::BadRequest(_) => "Bad Request",
            AppError::NotFound(_) => "Not Found",
            AppError::Validation(_) => "Validation Error",
            AppError::Database(_) | AppError::Internal(_) => "Internal Server Error",
        }
    }

    /// Client-facing message. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::DuplicateAccount(email) => {
                format!("User with email `{}` already exists", email)
            }
            AppError::BadCredentials => BAD_CREDENTIALS_MESSAGE.to_string(),
            AppError::InvalidToken => INVALID_TOKEN_MESSAGE.to_string(),
            AppError::Unauthenticated => "User is not authenticated".to_string(),
            AppError::BadRequest(msg) | AppError::NotFound(msg) | AppError::Validation(msg) => {
                msg.clone()
            }
            AppError::Database(_) | AppError::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateAccount(_) | AppError::BadCredentials | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::InvalidToken | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(ErrorBody {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: self.label().to_string(),
            message: self.public_message(),
        })
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Store failures surface as 500s; duplicates are translated by the caller
/// that knows which entity was being written.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail(email) => AppError::DuplicateAccount(email),
            StoreError::Database(msg) => AppError::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(error: AppError) -> ErrorBody {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_responses() {
        let error = AppError::InvalidToken;
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::Unauthenticated;
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::DuplicateAccount("a@b.io".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::BadCredentials;
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::NotFound("Todo not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::Validation("title".into());
        assert_eq!(error.error_response().status(), 422);

        let error = AppError::Internal("Server error".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[actix_rt::test]
    async fn test_error_body_is_structured() {
        let body = body_of(AppError::BadCredentials).await;
        assert_eq!(body.status, 400);
        assert_eq!(body.error, "Bad Credentials");
        assert_eq!(body.message, BAD_CREDENTIALS_MESSAGE);
    }

    #[actix_rt::test]
    async fn test_internal_detail_is_not_rendered() {
        let body = body_of(AppError::Database("relation \"accounts\" does not exist".into())).await;
        assert_eq!(body.status, 500);
        assert!(!body.message.contains("accounts"));
    }

    #[test]
    fn test_duplicate_store_error_becomes_duplicate_account() {
        let error: AppError = StoreError::DuplicateEmail("a@b.io".into()).into();
        assert!(matches!(error, AppError::DuplicateAccount(email) if email == "a@b.io"));
    }
}
