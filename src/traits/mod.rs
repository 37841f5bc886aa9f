//! Trait definitions for dependency injection
//!
//! Storage and network access sit behind traits so the vault can be tested in isolation.

mod key_validator;
mod persistence;

pub use key_validator::{generate_guide, validate_key, KeyValidator, ValidatorError, EMPTY_GUIDE, GUIDE_ERROR};
pub use persistence::{PersistenceError, VaultPersistence};

#[cfg(test)]
pub use persistence::MockVaultPersistence;
