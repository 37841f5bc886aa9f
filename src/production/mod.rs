//! Production implementations of traits

pub mod gemini_client;
mod persistence;

pub use gemini_client::GeminiKeyValidator;
pub use persistence::{SqliteVaultPersistence, AUTH_KEY, KEYS_KEY};
