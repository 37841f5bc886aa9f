//! Test doubles for dependency injection
//!
//! In-memory implementations of persistence and the provider client for isolated testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::model::ApiKey;
use crate::traits::{KeyValidator, PersistenceError, ValidatorError, VaultPersistence};

// ============================================================================
// InMemoryPersistence
// ============================================================================

#[derive(Default)]
struct Snapshot {
    auth: Option<String>,
    keys: Option<Vec<ApiKey>>,
    save_count: usize,
}

/// In-memory vault persistence for testing
///
/// Clones share the same snapshot, so a test can keep a handle after giving
/// one to a `VaultStore` and later "restart" by building a new store over it.
#[derive(Clone, Default)]
pub struct InMemoryPersistence {
    inner: Arc<Mutex<Snapshot>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create persistence with a previously saved collection
    pub fn with_keys(keys: Vec<ApiKey>) -> Self {
        let p = Self::new();
        p.inner.lock().unwrap().keys = Some(keys);
        p
    }

    /// Raw stored auth value (for assertions)
    pub fn raw_auth(&self) -> Option<String> {
        self.inner.lock().unwrap().auth.clone()
    }

    /// Collection as last written (for assertions)
    pub fn stored_keys(&self) -> Option<Vec<ApiKey>> {
        self.inner.lock().unwrap().keys.clone()
    }

    /// Number of successful collection writes
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().save_count
    }

    /// Make every subsequent write fail
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(PersistenceError::Serialization("write disabled".to_string()));
        }
        Ok(())
    }
}

impl VaultPersistence for InMemoryPersistence {
    fn load_auth_flag(&self) -> Result<bool, PersistenceError> {
        Ok(self.inner.lock().unwrap().auth.as_deref() == Some("true"))
    }

    fn save_auth_flag(&self, authenticated: bool) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.inner.lock().unwrap().auth = Some(authenticated.to_string());
        Ok(())
    }

    fn clear_auth_flag(&self) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.inner.lock().unwrap().auth = None;
        Ok(())
    }

    fn load_collection(&self) -> Result<Option<Vec<ApiKey>>, PersistenceError> {
        Ok(self.inner.lock().unwrap().keys.clone())
    }

    fn save_collection(&self, keys: &[ApiKey]) -> Result<(), PersistenceError> {
        self.check_writable()?;
        let mut inner = self.inner.lock().unwrap();
        inner.keys = Some(keys.to_vec());
        inner.save_count += 1;
        Ok(())
    }
}

// ============================================================================
// RecordedKeyValidator
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorCall {
    Ping { secret: String },
    AskGuide { secret: String, provider: String },
}

/// Configured outcome for every call
#[derive(Debug, Clone)]
pub enum ValidatorBehavior {
    /// Accept every key; guides return the given text
    Accept(Option<String>),
    /// Fail every call with the given error
    AlwaysFail(ValidatorError),
}

/// Recorded provider client for testing
#[derive(Clone)]
pub struct RecordedKeyValidator {
    calls: Arc<Mutex<Vec<ValidatorCall>>>,
    behavior: Arc<Mutex<ValidatorBehavior>>,
}

impl RecordedKeyValidator {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            behavior: Arc::new(Mutex::new(ValidatorBehavior::Accept(None))),
        }
    }

    /// Accept keys and answer guide requests with `text`
    pub fn with_guide(text: &str) -> Self {
        let client = Self::new();
        client.set_behavior(ValidatorBehavior::Accept(Some(text.to_string())));
        client
    }

    pub fn always_fail(error: ValidatorError) -> Self {
        let client = Self::new();
        client.set_behavior(ValidatorBehavior::AlwaysFail(error));
        client
    }

    pub fn set_behavior(&self, behavior: ValidatorBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> Vec<ValidatorCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for RecordedKeyValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValidator for RecordedKeyValidator {
    async fn ping(&self, secret: &str) -> Result<(), ValidatorError> {
        self.calls.lock().unwrap().push(ValidatorCall::Ping {
            secret: secret.to_string(),
        });
        match &*self.behavior.lock().unwrap() {
            ValidatorBehavior::Accept(_) => Ok(()),
            ValidatorBehavior::AlwaysFail(e) => Err(e.clone()),
        }
    }

    async fn ask_guide(&self, secret: &str, provider: &str) -> Result<Option<String>, ValidatorError> {
        self.calls.lock().unwrap().push(ValidatorCall::AskGuide {
            secret: secret.to_string(),
            provider: provider.to_string(),
        });
        match &*self.behavior.lock().unwrap() {
            ValidatorBehavior::Accept(text) => Ok(text.clone()),
            ValidatorBehavior::AlwaysFail(e) => Err(e.clone()),
        }
    }
}
