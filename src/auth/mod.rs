//! Authentication primitives for auth-gate
//!
//! This module provides the two security-bearing building blocks:
//! - Salted password hashing and verification
//! - Signed, time-bounded bearer token issuance and validation

pub mod jwt;
pub mod password;

pub use jwt::{Claims, IssuedToken, TokenService, BEARER_TYPE};
pub use password::{hash_password, verify_password, HashError};
