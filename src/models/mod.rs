//! Domain models for auth-gate
//!
//! Request payloads for the public endpoints and the request-scoped identity
//! established by the authentication gate.

pub mod identity;
pub mod request;

pub use identity::AuthenticatedUser;
pub use request::{LoginRequest, RegisterRequest, MIN_PASSWORD_LEN};
