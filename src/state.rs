//! Application state management

use std::sync::Arc;

use crate::config::Settings;
use crate::production::{GeminiKeyValidator, SqliteVaultPersistence};
use crate::storage::LocalStorage;
use crate::traits::{KeyValidator, VaultPersistence};
use crate::vault::VaultStore;

/// Application state containing all dependencies
pub struct AppState {
    pub vault: Arc<VaultStore>,
    pub validator: Arc<dyn KeyValidator>,
    pub settings: Settings,
}

impl AppState {
    /// Create a new AppState with production implementations
    pub fn new_production(settings: Settings) -> Result<Self, Box<dyn std::error::Error>> {
        tracing::info!("Initializing AppState");

        std::fs::create_dir_all(&settings.data_dir)?;

        let storage_path = settings.storage_path();
        tracing::info!(path = %storage_path.display(), "Opening local storage");
        let storage = Arc::new(LocalStorage::open(&storage_path)?);
        let persistence: Arc<dyn VaultPersistence> = Arc::new(SqliteVaultPersistence::new(storage));

        let vault = Arc::new(VaultStore::initialize(persistence, settings.empty_write_policy()));

        let validator = Arc::new(GeminiKeyValidator::new(
            settings.gemini_base_url.clone(),
            settings.gemini_model.clone(),
        )?);
        tracing::info!("Gemini client initialized");

        tracing::info!(keys = vault.list().len(), "AppState initialization complete");
        Ok(Self {
            vault,
            validator,
            settings,
        })
    }

    /// Create a new AppState over caller-supplied implementations
    pub fn with_parts(
        persistence: Arc<dyn VaultPersistence>,
        validator: Arc<dyn KeyValidator>,
        settings: Settings,
    ) -> Self {
        let vault = Arc::new(VaultStore::initialize(persistence, settings.empty_write_policy()));
        Self {
            vault,
            validator,
            settings,
        }
    }

    /// Create a new AppState with test implementations
    #[cfg(test)]
    pub fn new_test() -> Self {
        use crate::mocks::{InMemoryPersistence, RecordedKeyValidator};

        Self::with_parts(
            Arc::new(InMemoryPersistence::new()),
            Arc::new(RecordedKeyValidator::new()),
            Settings::default(),
        )
    }
}
