//! In-memory credential store
//!
//! Holds username -> salted-hash records in a `RwLock<HashMap>`. Reads
//! (`exists`, `verify`) take the read lock; `register` performs its
//! existence check and insert inside a single write-lock critical section.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::auth::password::{hash_password, verify_password};
use crate::error::StoreError;

use super::CredentialStore;

/// Thread-safe in-memory credential store
pub struct MemoryStore {
    users: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }

    /// True when no records are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn exists(&self, username: &str) -> bool {
        self.users.read().unwrap().contains_key(username)
    }

    async fn verify(&self, username: &str, password: &str) -> bool {
        // Clone the hash so the deliberately slow verification runs outside
        // the lock.
        let hash = self.users.read().unwrap().get(username).cloned();

        match hash {
            Some(hash) => verify_password(password, &hash),
            None => false,
        }
    }

    async fn register(&self, username: &str, password: &str) -> Result<(), StoreError> {
        // Cheap duplicate check before paying for the hash
        if self.users.read().unwrap().contains_key(username) {
            return Err(StoreError::UsernameTaken);
        }

        let hash = hash_password(password).map_err(|e| StoreError::Hash(e.to_string()))?;

        // Re-check under the write lock: a racing registration of the same
        // username may have won while we were hashing.
        match self.users.write().unwrap().entry(username.to_string()) {
            Entry::Occupied(_) => Err(StoreError::UsernameTaken),
            Entry::Vacant(slot) => {
                slot.insert(hash);
                Ok(())
            }
        }
    }
}
