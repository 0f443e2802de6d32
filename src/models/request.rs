//! Request payloads for the public authentication endpoints
//!
//! Fields are optional so that a missing field surfaces as a 400 validation
//! error from the handler rather than a framework-level deserialization
//! rejection. Values are trimmed before validation.

use serde::Deserialize;

/// Minimum accepted password length for registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Login request body
///
/// ```json
/// { "username": "admin", "password": "admin123" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Trimmed (username, password) when both fields are present and non-blank
    pub fn credentials(&self) -> Option<(&str, &str)> {
        credentials(self.username.as_deref(), self.password.as_deref())
    }
}

/// Registration request body; same shape as login, stricter password rules
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    /// Trimmed (username, password) when both fields are present and non-blank
    pub fn credentials(&self) -> Option<(&str, &str)> {
        credentials(self.username.as_deref(), self.password.as_deref())
    }
}

fn credentials<'a>(
    username: Option<&'a str>,
    password: Option<&'a str>,
) -> Option<(&'a str, &'a str)> {
    let username = username.map(str::trim).filter(|u| !u.is_empty())?;
    let password = password.map(str::trim).filter(|p| !p.is_empty())?;
    Some((username, password))
}
