//! Secure credential storage for the session token and active library.
//!
//! Everything lives in the OS keystore, scoped to this app's service name;
//! there is no plaintext fallback. Absence of a token means "not
//! authenticated" and is reported as `None`, never as a hard failure.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use stacks_shared::ApiError;

const KEY_TOKEN: &str = "token";
const KEY_LIBRARY_ID: &str = "libraryId";
const KEY_LIBRARY_NAME: &str = "libraryName";

const DEFAULT_SERVICE: &str = "stacks";

/// Failure talking to the underlying keystore. A missing entry is not an
/// error; it surfaces as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialError(pub String);

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "credential store error: {}", self.0)
    }
}

impl std::error::Error for CredentialError {}

/// Storage backend for credentials. The real backend is the OS keystore;
/// tests inject [`MemoryBackend`].
pub trait CredentialBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError>;
    /// Upsert: writing an existing key replaces its value.
    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError>;
    /// Idempotent: deleting an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), CredentialError>;
}

/// OS keystore backend.
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, CredentialError> {
        keyring::Entry::new(&self.service, key).map_err(|e| CredentialError(e.to_string()))
    }
}

impl CredentialBackend for KeyringBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CredentialError(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        // set_password is insert-or-update on every platform backend.
        self.entry(key)?
            .set_password(value)
            .map_err(|e| CredentialError(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), CredentialError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CredentialError(e.to_string())),
        }
    }
}

/// In-memory backend for tests and non-keystore environments.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CredentialError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Credential store gating every authenticated call.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn CredentialBackend>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn CredentialBackend>) -> Self {
        Self { backend }
    }

    /// Keystore-backed store under the given service name.
    pub fn keyring(service: &str) -> Self {
        Self::new(Arc::new(KeyringBackend::new(service)))
    }

    pub fn save_token(&self, token: &str) -> Result<(), CredentialError> {
        self.backend.set(KEY_TOKEN, token)
    }

    pub fn token(&self) -> Result<Option<String>, CredentialError> {
        self.backend.get(KEY_TOKEN)
    }

    pub fn delete_token(&self) -> Result<(), CredentialError> {
        self.backend.delete(KEY_TOKEN)
    }

    pub fn save_library_id(&self, id: &str) -> Result<(), CredentialError> {
        self.backend.set(KEY_LIBRARY_ID, id)
    }

    pub fn library_id(&self) -> Result<Option<String>, CredentialError> {
        self.backend.get(KEY_LIBRARY_ID)
    }

    pub fn delete_library_id(&self) -> Result<(), CredentialError> {
        self.backend.delete(KEY_LIBRARY_ID)
    }

    pub fn save_library_name(&self, name: &str) -> Result<(), CredentialError> {
        self.backend.set(KEY_LIBRARY_NAME, name)
    }

    pub fn library_name(&self) -> Result<Option<String>, CredentialError> {
        self.backend.get(KEY_LIBRARY_NAME)
    }

    pub fn delete_library_name(&self) -> Result<(), CredentialError> {
        self.backend.delete(KEY_LIBRARY_NAME)
    }

    /// Remove every stored entry. Used during logout.
    pub fn clear_all(&self) -> Result<(), CredentialError> {
        self.delete_token()?;
        self.delete_library_id()?;
        self.delete_library_name()?;
        Ok(())
    }

    /// The session token, or [`ApiError::Unauthenticated`]. A backend
    /// failure also reads as unauthenticated rather than crashing the call.
    pub fn require_token(&self) -> Result<String, ApiError> {
        match self.token() {
            Ok(Some(token)) if !token.is_empty() => Ok(token),
            _ => Err(ApiError::Unauthenticated),
        }
    }

    /// The active library id, or a missing-configuration error.
    pub fn require_library_id(&self) -> Result<String, ApiError> {
        match self.library_id() {
            Ok(Some(id)) if !id.is_empty() => Ok(id),
            _ => Err(ApiError::MissingConfiguration("library id".to_string())),
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::keyring(DEFAULT_SERVICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryBackend::new()))
    }

    #[test]
    fn missing_token_is_none_not_error() {
        let store = store();
        assert_eq!(store.token().unwrap(), None);
        assert_eq!(store.require_token(), Err(ApiError::Unauthenticated));
    }

    #[test]
    fn writes_are_upserts() {
        let store = store();
        store.save_token("first").unwrap();
        store.save_token("second").unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn deletion_is_idempotent() {
        let store = store();
        store.delete_token().unwrap();
        store.save_token("t").unwrap();
        store.delete_token().unwrap();
        store.delete_token().unwrap();
        store.delete_token().unwrap();
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn clear_all_removes_every_entry() {
        let store = store();
        store.save_token("t").unwrap();
        store.save_library_id("l1").unwrap();
        store.save_library_name("Main Branch").unwrap();
        store.clear_all().unwrap();
        assert_eq!(store.token().unwrap(), None);
        assert_eq!(store.library_id().unwrap(), None);
        assert_eq!(store.library_name().unwrap(), None);
        // Clearing again is still fine.
        store.clear_all().unwrap();
    }

    #[test]
    fn empty_token_counts_as_unauthenticated() {
        let store = store();
        store.save_token("").unwrap();
        assert_eq!(store.require_token(), Err(ApiError::Unauthenticated));
    }

    #[test]
    fn missing_library_id_is_a_config_error() {
        let store = store();
        assert_eq!(
            store.require_library_id(),
            Err(ApiError::MissingConfiguration("library id".into()))
        );
    }
}
