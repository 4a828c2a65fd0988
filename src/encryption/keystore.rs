//! Secure credential store seam
//!
//! The concrete store is an external collaborator: the platform keychain,
//! secret service, or credential manager. This module defines the narrow
//! contract the encryption service needs, plus an in-process implementation
//! used as the default on unsupported platforms and in tests.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Failure surfaced by a credential store operation.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Durable, OS-protected-at-rest key-value storage for secrets.
///
/// One logical slot per (service, account) pair. `set` has overwrite
/// semantics: the slot never holds two live secrets.
pub trait CredentialStore: Send + Sync {
    /// Store a secret, replacing any existing entry for the slot.
    fn set(&self, service: &str, account: &str, secret: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a secret, `None` if the slot is empty.
    fn get(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remove a secret. Removing an empty slot is not an error.
    fn delete(&self, service: &str, account: &str) -> Result<(), StoreError>;
}

/// In-process credential store. Not durable across restarts; suitable for
/// tests and platforms without a native secret facility.
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn set(&self, service: &str, account: &str, secret: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert((service.to_string(), account.to_string()), secret.to_vec());
        Ok(())
    }

    fn get(&self, service: &str, account: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(&(service.to_string(), account.to_string()))
            .cloned())
    }

    fn delete(&self, service: &str, account: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(&(service.to_string(), account.to_string()));
        Ok(())
    }
}
