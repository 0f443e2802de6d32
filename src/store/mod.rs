//! Credential storage for auth-gate
//!
//! The core depends on credentials only through the narrow
//! [`CredentialStore`] contract; the in-memory implementation here can be
//! swapped for a database-backed one without touching the rest of the crate.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;

/// Narrow lookup/insert contract for credential records
///
/// Uses `async_trait` so implementations may do I/O, and
/// `mockall::automock` for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// True iff a record with that username is present
    async fn exists(&self, username: &str) -> bool;

    /// Verify a plaintext password against the stored salted hash
    ///
    /// False for unknown usernames and wrong passwords alike; callers cannot
    /// distinguish the two cases.
    async fn verify(&self, username: &str, password: &str) -> bool;

    /// Hash the password and insert a new record
    ///
    /// Fails with [`StoreError::UsernameTaken`] when the username is already
    /// in use. The existence check and the insert are atomic: concurrent
    /// registrations of the same username cannot both succeed.
    async fn register(&self, username: &str, password: &str) -> Result<(), StoreError>;
}
