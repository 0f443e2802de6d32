//! auth-gate - a stateless bearer-token authentication gate
//!
//! This crate provides a small HTTP service that exchanges username/password
//! credentials for signed JWT bearer tokens and enforces token-based access
//! to protected routes without any server-side session state.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod store;
