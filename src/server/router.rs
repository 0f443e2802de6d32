//! HTTP router for auth-gate
//!
//! Thin controllers that translate requests into core calls:
//! - Public: login, register, health, and the gateway info document
//! - Protected (Bearer token): profile, secret data, profile update

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Extension, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{TokenService, BEARER_TYPE};
use crate::error::ApiError;
use crate::models::{AuthenticatedUser, LoginRequest, RegisterRequest, MIN_PASSWORD_LEN};
use crate::store::CredentialStore;

use super::middleware::{access_policy, auth_gate, request_log};

/// Shared application state
pub struct AppState<S: CredentialStore> {
    /// Credential store
    pub store: Arc<S>,

    /// Token issuance/validation service
    pub tokens: Arc<TokenService>,
}

impl<S: CredentialStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Login success response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiJ9...",
///   "type": "Bearer",
///   "expiresIn": 86400000,
///   "issuedAt": "2024-12-01T10:30:00Z"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,

    #[serde(rename = "type")]
    pub token_type: String,

    /// Token lifetime in milliseconds
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,

    /// Issuance timestamp, RFC 3339
    #[serde(rename = "issuedAt")]
    pub issued_at: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the main application router
///
/// Middleware run outermost-first: request logging, then the authentication
/// gate, then the access policy, then the matched handler.
pub fn build_router<S: CredentialStore + 'static>(state: AppState<S>) -> Router {
    let tokens = Arc::clone(&state.tokens);

    Router::new()
        .route("/", get(info_handler))
        .route("/api/health", get(health_handler))
        .route("/api/login", post(login_handler::<S>))
        .route("/api/register", post(register_handler::<S>))
        .route("/api/user/profile", get(profile_handler))
        .route("/api/user/secret", get(secret_handler))
        .route("/api/user/update", put(update_handler))
        .layer(middleware::from_fn(access_policy))
        .layer(middleware::from_fn_with_state(tokens, auth_gate))
        .layer(middleware::from_fn(request_log))
        .with_state(state)
}

// =============================================================================
// Public Handlers
// =============================================================================

/// Gateway info endpoint: static description of the available routes
async fn info_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "auth-gate",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Stateless bearer-token authentication gate",
        "availableRoutes": {
            "publicRoutes": [
                {
                    "path": "/api/login",
                    "method": "POST",
                    "description": "Exchange username/password for a bearer token",
                    "body": { "username": "string", "password": "string" }
                },
                {
                    "path": "/api/register",
                    "method": "POST",
                    "description": "Register a new account",
                    "body": { "username": "string", "password": "string (min. 6 characters)" }
                },
                {
                    "path": "/api/health",
                    "method": "GET",
                    "description": "Service liveness probe"
                }
            ],
            "protectedRoutes": [
                {
                    "path": "/api/user/profile",
                    "method": "GET",
                    "header": "Authorization: Bearer <token>",
                    "description": "Profile of the authenticated user"
                },
                {
                    "path": "/api/user/secret",
                    "method": "GET",
                    "header": "Authorization: Bearer <token>",
                    "description": "Protected sample data"
                },
                {
                    "path": "/api/user/update",
                    "method": "PUT",
                    "header": "Authorization: Bearer <token>",
                    "description": "Update profile fields"
                }
            ]
        }
    }))
}

/// Health check endpoint handler
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "UP".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Login endpoint handler
///
/// 200 with a signed token on success, 400 for missing/blank fields,
/// 401 for wrong credentials.
async fn login_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = request
        .credentials()
        .ok_or_else(|| ApiError::Validation("username and password are required".to_string()))?;

    if !state.store.verify(username, password).await {
        tracing::debug!(username = %username, "Login failed: invalid credentials");
        return Err(ApiError::InvalidCredentials);
    }

    let issued = state
        .tokens
        .issue(username)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(username = %username, "User logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: BEARER_TYPE.to_string(),
        expires_in: issued.expires_in_ms,
        issued_at: issued.issued_at.to_rfc3339(),
    }))
}

/// Registration endpoint handler
///
/// 201 on success, 400 for invalid input, 409 for an existing username,
/// 500 for hashing failures.
async fn register_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = request
        .credentials()
        .ok_or_else(|| ApiError::Validation("username and password are required".to_string()))?;

    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    state.store.register(username, password).await?;

    tracing::info!(username = %username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "user registered",
            "username": username
        })),
    ))
}

// =============================================================================
// Protected Handlers
// =============================================================================

/// Profile endpoint handler
///
/// The access policy guarantees an identity is present here.
async fn profile_handler(Extension(user): Extension<AuthenticatedUser>) -> impl IntoResponse {
    Json(serde_json::json!({
        "username": user.username,
        "message": "authenticated user profile",
        "authenticated": true
    }))
}

/// Protected sample-data endpoint handler
async fn secret_handler(Extension(user): Extension<AuthenticatedUser>) -> impl IntoResponse {
    Json(serde_json::json!({
        "username": user.username,
        "secretData": "top secret data, bearer tokens only",
        "timestamp": Utc::now().timestamp_millis()
    }))
}

/// Profile update endpoint handler
///
/// Accepts an arbitrary JSON object and echoes the updated field names.
async fn update_handler(
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = body
        .as_object()
        .ok_or_else(|| ApiError::Validation("request body must be a JSON object".to_string()))?;

    let updated: Vec<&String> = fields.keys().collect();

    Ok(Json(serde_json::json!({
        "message": "user data updated",
        "username": user.username,
        "updatedFields": updated
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::http::{header, HeaderValue};
    use axum_test::TestServer;

    const TEST_SECRET: &str = "router-test-secret";

    async fn create_test_state() -> AppState<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.register("alice", "secret1").await.unwrap();

        AppState {
            store,
            tokens: Arc::new(TokenService::new(TEST_SECRET, 86_400_000)),
        }
    }

    async fn test_server() -> (TestServer, AppState<MemoryStore>) {
        let state = create_test_state().await;
        let server = TestServer::new(build_router(state.clone())).unwrap();
        (server, state)
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    // Test 1: Health endpoint is public and reports UP
    #[tokio::test]
    async fn test_health_endpoint() {
        let (server, _) = test_server().await;

        let response = server.get("/api/health").await;
        response.assert_status_ok();

        let body: HealthResponse = response.json();
        assert_eq!(body.status, "UP");
        assert!(!body.version.is_empty());
    }

    // Test 2: Info endpoint is public
    #[tokio::test]
    async fn test_info_endpoint() {
        let (server, _) = test_server().await;

        let response = server.get("/").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["service"], "auth-gate");
        assert!(body["availableRoutes"]["publicRoutes"].is_array());
    }

    // Test 3: Login with valid credentials returns a usable token
    #[tokio::test]
    async fn test_login_success() {
        let (server, state) = test_server().await;

        let response = server
            .post("/api/login")
            .json(&serde_json::json!({"username": "alice", "password": "secret1"}))
            .await;
        response.assert_status_ok();

        let body: LoginResponse = response.json();
        assert_eq!(body.token_type, "Bearer");
        assert_eq!(body.expires_in, 86_400_000);
        assert!(state.tokens.validate(&body.token));
        assert_eq!(state.tokens.subject_of(&body.token).unwrap(), "alice");
    }

    // Test 4: Login with wrong password is 401
    #[tokio::test]
    async fn test_login_wrong_password() {
        let (server, _) = test_server().await;

        let response = server
            .post("/api/login")
            .json(&serde_json::json!({"username": "alice", "password": "wrong"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Invalid credentials");
    }

    // Test 5: Login with a missing field is 400, not 401
    #[tokio::test]
    async fn test_login_missing_field() {
        let (server, _) = test_server().await;

        let response = server
            .post("/api/login")
            .json(&serde_json::json!({"username": "alice"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    // Test 6: Login with a blank password is 400
    #[tokio::test]
    async fn test_login_blank_password() {
        let (server, _) = test_server().await;

        let response = server
            .post("/api/login")
            .json(&serde_json::json!({"username": "alice", "password": ""}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    // Test 7: Registration happy path is 201
    #[tokio::test]
    async fn test_register_success() {
        let (server, state) = test_server().await;

        let response = server
            .post("/api/register")
            .json(&serde_json::json!({"username": "bob", "password": "secret2"}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["username"], "bob");
        assert!(state.store.verify("bob", "secret2").await);
    }

    // Test 8: Duplicate registration is 409
    #[tokio::test]
    async fn test_register_duplicate() {
        let (server, _) = test_server().await;

        let response = server
            .post("/api/register")
            .json(&serde_json::json!({"username": "alice", "password": "another1"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    // Test 9: Registration with a short password is 400
    #[tokio::test]
    async fn test_register_short_password() {
        let (server, _) = test_server().await;

        let response = server
            .post("/api/register")
            .json(&serde_json::json!({"username": "carol", "password": "abc"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    // Test 10: Profile requires a token
    #[tokio::test]
    async fn test_profile_requires_token() {
        let (server, _) = test_server().await;

        let response = server.get("/api/user/profile").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    // Test 11: Profile with a valid token returns the identity
    #[tokio::test]
    async fn test_profile_with_token() {
        let (server, state) = test_server().await;
        let issued = state.tokens.issue("alice").unwrap();

        let response = server
            .get("/api/user/profile")
            .add_header(header::AUTHORIZATION, bearer(&issued.token))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["username"], "alice");
        assert_eq!(body["authenticated"], true);
    }

    // Test 12: Secret endpoint returns data and timestamp with a valid token
    #[tokio::test]
    async fn test_secret_with_token() {
        let (server, state) = test_server().await;
        let issued = state.tokens.issue("alice").unwrap();

        let response = server
            .get("/api/user/secret")
            .add_header(header::AUTHORIZATION, bearer(&issued.token))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["username"], "alice");
        assert!(body["secretData"].is_string());
        assert!(body["timestamp"].is_i64());
    }

    // Test 13: Update echoes field names with a valid token
    #[tokio::test]
    async fn test_update_with_token() {
        let (server, state) = test_server().await;
        let issued = state.tokens.issue("alice").unwrap();

        let response = server
            .put("/api/user/update")
            .add_header(header::AUTHORIZATION, bearer(&issued.token))
            .json(&serde_json::json!({"email": "alice@example.com", "city": "Lisbon"}))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["username"], "alice");
        let fields = body["updatedFields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains(&serde_json::json!("email")));
        assert!(fields.contains(&serde_json::json!("city")));
    }

    // Test 14: Update with a non-object body is 400
    #[tokio::test]
    async fn test_update_non_object_body() {
        let (server, state) = test_server().await;
        let issued = state.tokens.issue("alice").unwrap();

        let response = server
            .put("/api/user/update")
            .add_header(header::AUTHORIZATION, bearer(&issued.token))
            .json(&serde_json::json!(["not", "an", "object"]))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    // Test 15: Expired token yields 401 on a protected route
    #[tokio::test]
    async fn test_expired_token_unauthorized() {
        let (server, _) = test_server().await;
        let expired_issuer = TokenService::new(TEST_SECRET, -1_000);
        let issued = expired_issuer.issue("alice").unwrap();

        let response = server
            .get("/api/user/profile")
            .add_header(header::AUTHORIZATION, bearer(&issued.token))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    // Test 16: Hashing failure during registration surfaces as an opaque 500
    #[tokio::test]
    async fn test_register_store_failure() {
        let mut mock_store = crate::store::MockCredentialStore::new();
        mock_store
            .expect_register()
            .returning(|_, _| Err(crate::error::StoreError::Hash("salt failure".to_string())));

        let state = AppState {
            store: Arc::new(mock_store),
            tokens: Arc::new(TokenService::new(TEST_SECRET, 86_400_000)),
        };
        let server = TestServer::new(build_router(state)).unwrap();

        let response = server
            .post("/api/register")
            .json(&serde_json::json!({"username": "dave", "password": "secret3"}))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Internal server error");
    }

    // Test 17: Token signed with a different secret yields 401
    #[tokio::test]
    async fn test_foreign_token_unauthorized() {
        let (server, _) = test_server().await;
        let foreign_issuer = TokenService::new("some-other-secret", 86_400_000);
        let issued = foreign_issuer.issue("alice").unwrap();

        let response = server
            .get("/api/user/profile")
            .add_header(header::AUTHORIZATION, bearer(&issued.token))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
