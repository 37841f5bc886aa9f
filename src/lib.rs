//! KeyVault - track LLM provider API keys, their quotas, and where to get new ones
//!
//! This library provides the core functionality for KeyVault, organized around
//! trait-based dependency injection for testability.

pub mod commands;
pub mod traits;
pub mod mocks;
pub mod production;

pub mod config;
pub mod guide;
pub mod identity;
pub mod model;
pub mod stats;
pub mod storage;
mod state;
pub mod vault;

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use state::AppState;
pub use vault::{EmptyWritePolicy, VaultError, VaultStore};

/// Initialize logging to stderr and a daily log file in `log_dir`.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = rolling::daily(log_dir, "keyvault.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "keyvault=info,keyvault_lib=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()?;

    Ok(guard)
}
