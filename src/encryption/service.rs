//! AES-256-GCM encryption service with key lifecycle management

use super::keystore::CredentialStore;
use super::{EncryptionError, EncryptionResult};
use crate::audit::{AuditLog, EventDetails, EventKind};
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::{Arc, Mutex};
use zeroize::Zeroizing;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

const DEFAULT_SERVICE: &str = "vigil";
const DEFAULT_ACCOUNT: &str = "primary";

/// Authenticated encryption for opaque byte payloads and text.
///
/// One logical 256-bit key is active at a time, held durably in the
/// credential store and cached in memory. A single mutex serializes every
/// key-touching operation (encrypt, decrypt, rotate, provisioning) so
/// concurrent first use cannot leave store and cache inconsistent.
///
/// Blob layout: `nonce (12) || ciphertext || tag (16)`, fresh random nonce
/// per encryption.
pub struct EncryptionService {
    store: Arc<dyn CredentialStore>,
    audit: Arc<AuditLog>,
    service: String,
    account: String,
    key: Mutex<Option<Zeroizing<[u8; KEY_LEN]>>>,
}

impl EncryptionService {
    pub fn new(store: Arc<dyn CredentialStore>, audit: Arc<AuditLog>) -> Self {
        Self {
            store,
            audit,
            service: DEFAULT_SERVICE.to_string(),
            account: DEFAULT_ACCOUNT.to_string(),
            key: Mutex::new(None),
        }
    }

    /// Override the credential store slot identifiers.
    pub fn with_slot(mut self, service: &str, account: &str) -> Self {
        self.service = service.to_string();
        self.account = account.to_string();
        self
    }

    /// Encrypt a byte payload into a single opaque blob.
    pub fn encrypt(&self, plaintext: &[u8]) -> EncryptionResult<Vec<u8>> {
        let mut cache = self.key.lock().unwrap();
        let key = self.get_or_create_key(&mut cache)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]));

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt). Tampering with
    /// any bit fails authentication; garbage is never returned.
    pub fn decrypt(&self, blob: &[u8]) -> EncryptionResult<Vec<u8>> {
        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(EncryptionError::DecryptionFailed(
                "ciphertext too short".to_string(),
            ));
        }

        let mut cache = self.key.lock().unwrap();
        let key = self.get_or_create_key(&mut cache)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]));

        let nonce = Nonce::from_slice(&blob[..NONCE_LEN]);
        cipher
            .decrypt(nonce, &blob[NONCE_LEN..])
            .map_err(|e| EncryptionError::DecryptionFailed(e.to_string()))
    }

    /// Encrypt text into a base64-encoded blob.
    pub fn encrypt_string(&self, plaintext: &str) -> EncryptionResult<String> {
        let blob = self.encrypt(plaintext.as_bytes())?;
        Ok(general_purpose::STANDARD.encode(blob))
    }

    /// Decrypt a base64-encoded blob back into text.
    pub fn decrypt_string(&self, encoded: &str) -> EncryptionResult<String> {
        let blob = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| EncryptionError::InvalidData(format!("invalid base64: {}", e)))?;
        let plaintext = self.decrypt(&blob)?;
        String::from_utf8(plaintext)
            .map_err(|e| EncryptionError::InvalidData(format!("invalid UTF-8: {}", e)))
    }

    /// Replace the active key with a freshly generated one.
    ///
    /// All-or-nothing: if the store write fails, the cache is untouched and
    /// the previous key remains authoritative. On success the rotation is
    /// logged through the audit trail.
    pub fn rotate_key(&self) -> EncryptionResult<()> {
        let mut cache = self.key.lock().unwrap();

        let fresh = Self::generate_key();
        self.store
            .set(&self.service, &self.account, &fresh[..])
            .map_err(|e| EncryptionError::KeystoreError(e.to_string()))?;
        *cache = Some(fresh);

        self.log_key_event("security_rotation");
        Ok(())
    }

    /// Cache, then store, then fresh generation. Caller holds the key lock.
    fn get_or_create_key(
        &self,
        cache: &mut Option<Zeroizing<[u8; KEY_LEN]>>,
    ) -> EncryptionResult<Zeroizing<[u8; KEY_LEN]>> {
        if let Some(key) = cache.as_ref() {
            return Ok(key.clone());
        }

        let stored = self
            .store
            .get(&self.service, &self.account)
            .map_err(|e| EncryptionError::KeystoreError(e.to_string()))?;

        let key = match stored {
            Some(bytes) => {
                let array: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
                    EncryptionError::KeystoreError(format!(
                        "stored key has invalid length {}",
                        bytes.len()
                    ))
                })?;
                Zeroizing::new(array)
            }
            None => {
                let fresh = Self::generate_key();
                self.store
                    .set(&self.service, &self.account, &fresh[..])
                    .map_err(|e| EncryptionError::KeystoreError(e.to_string()))?;
                self.log_key_event("initial_creation");
                fresh
            }
        };

        *cache = Some(key.clone());
        Ok(key)
    }

    fn generate_key() -> Zeroizing<[u8; KEY_LEN]> {
        Zeroizing::new(Aes256Gcm::generate_key(&mut OsRng).into())
    }

    fn log_key_event(&self, reason: &str) {
        let mut details = EventDetails::new();
        details.insert("reason".to_string(), json!(reason));
        self.audit
            .log_event(EventKind::EncryptionKeyRotated, details, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::keystore::MemoryCredentialStore;

    fn service() -> EncryptionService {
        EncryptionService::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(AuditLog::new()),
        )
    }

    #[test]
    fn test_byte_round_trip() {
        let service = service();
        let plaintext = b"account balance: 1204.55";

        let blob = service.encrypt(plaintext).unwrap();
        assert_ne!(blob.as_slice(), plaintext.as_slice());
        assert_eq!(service.decrypt(&blob).unwrap(), plaintext);
    }

    #[test]
    fn test_empty_payload_round_trip() {
        let service = service();
        let blob = service.encrypt(b"").unwrap();
        assert_eq!(blob.len(), NONCE_LEN + TAG_LEN);
        assert_eq!(service.decrypt(&blob).unwrap(), b"");
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let service = service();
        let first = service.encrypt(b"same input").unwrap();
        let second = service.encrypt(b"same input").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_short_blob_is_rejected() {
        let service = service();
        let err = service.decrypt(&[0u8; 20]).unwrap_err();
        assert!(matches!(err, EncryptionError::DecryptionFailed(_)));
    }

    #[test]
    fn test_string_round_trip_unicode() {
        let service = service();
        let plaintext = "Pläne für nächste Woche — 計画 🗓";

        let encoded = service.encrypt_string(plaintext).unwrap();
        assert_eq!(service.decrypt_string(&encoded).unwrap(), plaintext);
    }

    #[test]
    fn test_decrypt_string_rejects_non_base64() {
        let service = service();
        let err = service.decrypt_string("not-base64!!").unwrap_err();
        assert!(matches!(err, EncryptionError::InvalidData(_)));
    }

    #[test]
    fn test_first_use_provisions_key_into_store() {
        let store = Arc::new(MemoryCredentialStore::new());
        let audit = Arc::new(AuditLog::new());
        let service = EncryptionService::new(
            Arc::clone(&store) as Arc<dyn CredentialStore>,
            Arc::clone(&audit),
        );

        assert_eq!(store.get(DEFAULT_SERVICE, DEFAULT_ACCOUNT).unwrap(), None);
        service.encrypt(b"data").unwrap();

        let stored = store.get(DEFAULT_SERVICE, DEFAULT_ACCOUNT).unwrap().unwrap();
        assert_eq!(stored.len(), KEY_LEN);

        let events = audit.get_recent_events(10);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::EncryptionKeyRotated);
        assert_eq!(events[0].details["reason"], "initial_creation");
    }

    #[test]
    fn test_stored_key_survives_new_service_instance() {
        let store = Arc::new(MemoryCredentialStore::new());
        let audit = Arc::new(AuditLog::new());

        let first = EncryptionService::new(
            Arc::clone(&store) as Arc<dyn CredentialStore>,
            Arc::clone(&audit),
        );
        let blob = first.encrypt(b"persisted").unwrap();

        // Fresh instance with an empty cache reads the same key back.
        let second = EncryptionService::new(store, audit);
        assert_eq!(second.decrypt(&blob).unwrap(), b"persisted");
    }

    #[test]
    fn test_invalid_stored_key_length_is_a_keystore_error() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(DEFAULT_SERVICE, DEFAULT_ACCOUNT, b"short").unwrap();

        let service = EncryptionService::new(store, Arc::new(AuditLog::new()));
        let err = service.encrypt(b"data").unwrap_err();
        assert!(matches!(err, EncryptionError::KeystoreError(_)));
    }

    #[test]
    fn test_rotation_logs_audit_event() {
        let audit = Arc::new(AuditLog::new());
        let service = EncryptionService::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::clone(&audit),
        );

        service.rotate_key().unwrap();

        let events = audit.get_recent_events(10);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::EncryptionKeyRotated);
        assert_eq!(events[0].details["reason"], "security_rotation");
    }
}
