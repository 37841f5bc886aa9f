//! Runtime settings, from flags or environment

use std::path::PathBuf;

use clap::Args;

use crate::production::gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::vault::EmptyWritePolicy;

/// Password accepted by the login gate unless overridden
pub const DEFAULT_PASSWORD: &str = "admin";

#[derive(Clone, Debug, Args)]
pub struct Settings {
    /// Directory holding the storage database and logs.
    #[arg(long, env = "KEYVAULT_DATA_DIR", default_value = ".keyvault", global = true)]
    pub data_dir: PathBuf,

    /// Password accepted by the login gate. Not a security boundary.
    #[arg(
        long = "gate-password",
        id = "gate_password",
        env = "KEYVAULT_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_env_values = true,
        global = true
    )]
    pub password: String,

    /// Model used for key validation and guide requests.
    #[arg(long, env = "KEYVAULT_GEMINI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub gemini_model: String,

    /// Base URL of the Gemini API.
    #[arg(long, env = "KEYVAULT_GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub gemini_base_url: String,

    /// Also persist the collection when it becomes empty. By default the last
    /// non-empty snapshot is kept.
    #[arg(long, env = "KEYVAULT_PERSIST_EMPTY", global = true)]
    pub persist_empty: bool,
}

impl Settings {
    pub fn empty_write_policy(&self) -> EmptyWritePolicy {
        if self.persist_empty {
            EmptyWritePolicy::Persist
        } else {
            EmptyWritePolicy::Skip
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.sqlite")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".keyvault"),
            password: DEFAULT_PASSWORD.to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            persist_empty: false,
        }
    }
}
