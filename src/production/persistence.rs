//! Vault persistence on top of the SQLite key-value store

use std::sync::Arc;

use crate::model::ApiKey;
use crate::storage::LocalStorage;
use crate::traits::{PersistenceError, VaultPersistence};

/// Storage key holding the login flag
pub const AUTH_KEY: &str = "llm_vault_auth";
/// Storage key holding the JSON-encoded key list
pub const KEYS_KEY: &str = "llm_vault_keys";

pub struct SqliteVaultPersistence {
    storage: Arc<LocalStorage>,
}

impl SqliteVaultPersistence {
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }
}

impl VaultPersistence for SqliteVaultPersistence {
    fn load_auth_flag(&self) -> Result<bool, PersistenceError> {
        Ok(self.storage.get_bool(AUTH_KEY)?)
    }

    fn save_auth_flag(&self, authenticated: bool) -> Result<(), PersistenceError> {
        let value = if authenticated { "true" } else { "false" };
        Ok(self.storage.set(AUTH_KEY, value)?)
    }

    fn clear_auth_flag(&self) -> Result<(), PersistenceError> {
        Ok(self.storage.remove(AUTH_KEY)?)
    }

    fn load_collection(&self) -> Result<Option<Vec<ApiKey>>, PersistenceError> {
        let Some(raw) = self.storage.get(KEYS_KEY)? else {
            return Ok(None);
        };
        let keys = serde_json::from_str(&raw)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        Ok(Some(keys))
    }

    fn save_collection(&self, keys: &[ApiKey]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(keys)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        self.storage.set(KEYS_KEY, &json)?;
        tracing::debug!(count = keys.len(), "Saved key collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{seed_keys, KeyStatus};

    fn persistence() -> (Arc<LocalStorage>, SqliteVaultPersistence) {
        let storage = Arc::new(LocalStorage::open_in_memory().unwrap());
        (storage.clone(), SqliteVaultPersistence::new(storage))
    }

    #[test]
    fn test_empty_storage_is_absent_not_error() {
        let (_, p) = persistence();
        assert_eq!(p.load_collection().unwrap(), None);
        assert!(!p.load_auth_flag().unwrap());
    }

    #[test]
    fn test_collection_round_trip() {
        let (_, p) = persistence();
        let mut keys = seed_keys();
        keys[0].status = KeyStatus::Expired;

        p.save_collection(&keys).unwrap();

        assert_eq!(p.load_collection().unwrap(), Some(keys));
    }

    #[test]
    fn test_auth_flag_lifecycle() {
        let (storage, p) = persistence();

        p.save_auth_flag(true).unwrap();
        assert_eq!(storage.get(AUTH_KEY).unwrap(), Some("true".to_string()));
        assert!(p.load_auth_flag().unwrap());

        p.clear_auth_flag().unwrap();
        assert_eq!(storage.get(AUTH_KEY).unwrap(), None);
        assert!(!p.load_auth_flag().unwrap());
    }

    #[test]
    fn test_corrupt_collection_is_serialization_error() {
        let (storage, p) = persistence();
        storage.set(KEYS_KEY, "{not json").unwrap();

        assert!(matches!(
            p.load_collection(),
            Err(PersistenceError::Serialization(_))
        ));
    }

    #[test]
    fn test_numbers_stay_numbers() {
        let (storage, p) = persistence();
        p.save_collection(&seed_keys()).unwrap();

        let raw = storage.get(KEYS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value[0]["totalLimit"].is_u64());
        assert!(value[0]["used"].is_u64());
        assert!(value[0]["label"].is_string());
    }
}
