//! Authenticated symmetric encryption with managed key lifecycle
//!
//! This module provides:
//! - [`EncryptionService`]: AES-256-GCM for opaque byte payloads and text
//! - [`CredentialStore`]: the seam to the platform's secure secret storage
//! - Lazy key provisioning, caching, and explicit rotation, with every key
//!   lifecycle event written through the audit trail

pub mod keystore;
pub mod service;

pub use keystore::{CredentialStore, MemoryCredentialStore, StoreError};
pub use service::EncryptionService;

use thiserror::Error;

/// Encryption-related errors. Callers treat any of these as fatal to the
/// operation; the service never retries internally.
#[derive(Error, Debug)]
pub enum EncryptionError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Credential store error: {0}")]
    KeystoreError(String),
}

pub type EncryptionResult<T> = Result<T, EncryptionError>;
