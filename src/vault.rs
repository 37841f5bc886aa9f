//! Vault store: the single owner of the key collection
//!
//! Every mutation is written through to [`VaultPersistence`] before it becomes
//! visible in memory, so a failed write leaves both sides unchanged.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{seed_keys, ApiKey, Provider};
use crate::stats::{self, DashboardStats};
use crate::traits::{PersistenceError, VaultPersistence};

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("API key must not be empty")]
    EmptySecret,
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// What write-through does when a mutation leaves the collection empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyWritePolicy {
    /// Leave the previous snapshot in storage. Reloading after removing the
    /// last key brings the removed keys back.
    #[default]
    Skip,
    /// Persist the empty collection like any other state.
    Persist,
}

pub struct VaultStore {
    persistence: Arc<dyn VaultPersistence>,
    keys: Mutex<Vec<ApiKey>>,
    authenticated: Mutex<bool>,
    policy: EmptyWritePolicy,
}

impl VaultStore {
    /// Hydrate from persistence, falling back to the demonstration keys.
    ///
    /// Never fails: missing state is normal and unreadable state is logged
    /// and replaced by defaults.
    pub fn initialize(persistence: Arc<dyn VaultPersistence>, policy: EmptyWritePolicy) -> Self {
        let authenticated = persistence.load_auth_flag().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read auth flag, starting logged out");
            false
        });

        let (keys, loaded_cleanly) = match persistence.load_collection() {
            Ok(Some(keys)) => {
                tracing::info!(count = keys.len(), "Loaded key collection");
                (keys, true)
            }
            Ok(None) => {
                tracing::info!("No stored keys, using demonstration set");
                (seed_keys(), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored key collection unreadable, using demonstration set");
                (seed_keys(), false)
            }
        };

        let store = Self {
            persistence,
            keys: Mutex::new(Vec::new()),
            authenticated: Mutex::new(authenticated),
            policy,
        };

        // Unreadable data is left in place rather than overwritten by the seed set.
        if loaded_cleanly {
            if let Err(e) = store.write_through(&keys) {
                tracing::warn!(error = %e, "Failed to persist hydrated collection");
            }
        }
        *store.keys.lock().unwrap() = keys;
        store
    }

    pub fn policy(&self) -> EmptyWritePolicy {
        self.policy
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.lock().unwrap()
    }

    /// Compare `password` against `expected`; on a match persist the flag.
    pub fn login(&self, password: &str, expected: &str) -> Result<bool, VaultError> {
        if password != expected {
            tracing::warn!("Login rejected");
            return Ok(false);
        }
        self.persistence.save_auth_flag(true)?;
        *self.authenticated.lock().unwrap() = true;
        tracing::info!("Logged in");
        Ok(true)
    }

    pub fn logout(&self) -> Result<(), VaultError> {
        self.persistence.clear_auth_flag()?;
        *self.authenticated.lock().unwrap() = false;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Add a new key dated today (UTC)
    pub fn add(&self, secret: &str, provider: Provider, label: &str) -> Result<ApiKey, VaultError> {
        self.add_dated(secret, provider, label, chrono::Utc::now().date_naive())
    }

    /// Add a new key with an explicit creation date
    pub fn add_dated(
        &self,
        secret: &str,
        provider: Provider,
        label: &str,
        created_at: NaiveDate,
    ) -> Result<ApiKey, VaultError> {
        if secret.trim().is_empty() {
            return Err(VaultError::EmptySecret);
        }

        let mut keys = self.keys.lock().unwrap();
        let mut id = uuid::Uuid::new_v4().to_string();
        while keys.iter().any(|k| k.id == id) {
            id = uuid::Uuid::new_v4().to_string();
        }

        let key = ApiKey::new(id, secret, provider, label, created_at);
        let mut next = keys.clone();
        next.push(key.clone());
        self.write_through(&next)?;
        *keys = next;

        tracing::info!(id = %key.id, provider = %provider, "Added key");
        Ok(key)
    }

    /// Remove the key with `id`. Returns whether a key was removed; an
    /// unknown id is not an error.
    pub fn remove(&self, id: &str) -> Result<bool, VaultError> {
        let mut keys = self.keys.lock().unwrap();
        let next: Vec<ApiKey> = keys.iter().filter(|k| k.id != id).cloned().collect();
        let removed = next.len() != keys.len();

        self.write_through(&next)?;
        *keys = next;

        if removed {
            tracing::info!(id = %id, "Removed key");
        } else {
            tracing::debug!(id = %id, "Remove ignored, no such key");
        }
        Ok(removed)
    }

    /// Snapshot in storage order
    pub fn list(&self) -> Vec<ApiKey> {
        self.keys.lock().unwrap().clone()
    }

    pub fn get(&self, id: &str) -> Option<ApiKey> {
        self.keys.lock().unwrap().iter().find(|k| k.id == id).cloned()
    }

    pub fn stats(&self) -> DashboardStats {
        stats::compute(&self.keys.lock().unwrap())
    }

    fn write_through(&self, keys: &[ApiKey]) -> Result<(), PersistenceError> {
        if keys.is_empty() && self.policy == EmptyWritePolicy::Skip {
            tracing::debug!("Collection empty, keeping previous snapshot");
            return Ok(());
        }
        self.persistence.save_collection(keys)
    }
}
