//! Application error types for auth-gate
//!
//! This module defines the error taxonomies used throughout the application.
//! All error types use `thiserror` for ergonomic error handling.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Token issuance and validation errors
///
/// These never reach an HTTP client directly: the authentication gate absorbs
/// them and the request simply proceeds without an identity. The variants
/// exist so logs can distinguish an expired token from a forged one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    /// Token expiry has passed
    #[error("Token expired")]
    Expired,

    /// Signature does not verify against the configured secret
    #[error("Invalid token signature")]
    BadSignature,

    /// Token is structurally invalid or carries unexpected claims
    #[error("Malformed token")]
    Malformed,

    /// Signing a new token failed
    #[error("Token issuance failed: {0}")]
    Issue(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// Credential store errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// A record with this username already exists
    #[error("Username already exists")]
    UsernameTaken,

    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Errors surfaced at the HTTP boundary
///
/// Each variant maps to a status code; the response body is always
/// `{"error": "<message>"}`. Internal errors keep their detail out of the
/// response and log it server-side instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Missing or malformed input fields
    #[error("{0}")]
    Validation(String),

    /// Wrong username or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Protected route reached without an authenticated identity
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Duplicate registration
    #[error("{0}")]
    Conflict(String),

    /// Hashing or signing failure; detail is logged, not returned
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken => ApiError::Conflict("username already exists".to_string()),
            StoreError::Hash(detail) => ApiError::Internal(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "Internal error");
        }

        let body = serde_json::json!({
            "error": self.to_string()
        });
        (
            self.status(),
            [(header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
