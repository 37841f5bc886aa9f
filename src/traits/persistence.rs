//! Durable storage of the key collection and the login flag

use thiserror::Error;

use crate::model::ApiKey;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Trait for persisting vault state between runs
///
/// Production: SQLite key-value table
/// Testing: In-memory snapshot
#[cfg_attr(test, mockall::automock)]
pub trait VaultPersistence: Send + Sync {
    /// Whether a previous session left the user logged in
    fn load_auth_flag(&self) -> Result<bool, PersistenceError>;

    fn save_auth_flag(&self, authenticated: bool) -> Result<(), PersistenceError>;

    fn clear_auth_flag(&self) -> Result<(), PersistenceError>;

    /// `None` when nothing has been saved yet
    fn load_collection(&self) -> Result<Option<Vec<ApiKey>>, PersistenceError>;

    fn save_collection(&self, keys: &[ApiKey]) -> Result<(), PersistenceError>;
}
