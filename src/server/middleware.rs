//! HTTP middleware for auth-gate
//!
//! This module provides the two request-interception stages of the gate:
//! - The authentication gate: extracts and validates a bearer token and, when
//!   valid, attaches an identity to the request. It never rejects a request.
//! - The access policy: blocks protected routes that reach it without an
//!   identity.
//!
//! A request logging middleware rounds out the stack.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use crate::auth::TokenService;
use crate::error::ApiError;
use crate::models::AuthenticatedUser;

/// Scheme prefix expected in the Authorization header
pub const BEARER_PREFIX: &str = "Bearer ";

/// Method/path pairs that bypass the identity requirement
pub const PUBLIC_ROUTES: &[(&str, &str)] = &[
    ("POST", "/api/login"),
    ("POST", "/api/register"),
    ("GET", "/api/health"),
    ("GET", "/"),
];

/// Authentication gate middleware
///
/// Runs once per request, before the access policy:
/// 1. Read the `Authorization` header; absent or non-Bearer means the request
///    continues unauthenticated.
/// 2. Validate the token. Any failure (malformed, expired, bad signature) is
///    logged and the request continues unauthenticated; token errors are
///    never surfaced to the client from here.
/// 3. On success, attach an [`AuthenticatedUser`] to the request extensions.
///
/// The gate itself never rejects: rejection for protected routes is the
/// access policy's job.
pub async fn auth_gate(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX));

    if let Some(raw_token) = bearer {
        match tokens.decode(raw_token) {
            Ok(claims) => {
                request
                    .extensions_mut()
                    .insert(AuthenticatedUser::new(claims.sub));
            }
            Err(err) => {
                tracing::debug!(error = %err, "Rejected bearer token");
            }
        }
    }

    next.run(request).await
}

/// Access policy middleware
///
/// Static allow-list enforcement: routes in [`PUBLIC_ROUTES`] pass through;
/// everything else requires an identity established by the gate upstream.
pub async fn access_policy(request: Request, next: Next) -> Result<Response, ApiError> {
    let public = PUBLIC_ROUTES
        .iter()
        .any(|(method, path)| request.method().as_str() == *method && request.uri().path() == *path);

    if !public && request.extensions().get::<AuthenticatedUser>().is_none() {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "Unauthenticated request to protected route"
        );
        return Err(ApiError::AuthenticationRequired);
    }

    Ok(next.run(request).await)
}

/// Per-request log line
///
/// One info event per completed request: method, path, status, and elapsed
/// time in microseconds.
pub async fn request_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "request"
    );

    response
}
