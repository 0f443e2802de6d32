//! Request-scoped authenticated identity

/// Identity established by the authentication gate from a valid bearer token
///
/// Attached to the request's extensions for the duration of request
/// processing and dropped with the request; nothing about it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Username taken from the token's subject claim
    pub username: String,
}

impl AuthenticatedUser {
    /// Create an identity for the given username
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
