mod config;
mod vault;

pub use config::{Config, SessionConfig, StoreBackend, StoreConfig, VaultBackend, ViewConfig};
pub use vault::{CredentialVault, FileVault, KeyringVault, KEYRING_SERVICE};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Overrides the data directory entirely.
pub const DATA_DIR_ENV: &str = "EVENTLINE_DATA_DIR";

/// Returns `~/.config/eventline[-dev]/` based on EVENTLINE_ENV.
///
/// Set EVENTLINE_ENV=dev to use development data directory, or
/// EVENTLINE_DATA_DIR to point somewhere else.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("EVENTLINE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("eventline-dev")
            } else {
                base_dir.join("eventline")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Location of the persisted admin session.
///
/// # Errors
/// See [`data_dir`].
pub fn session_path() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("session.json"))
}

/// Open the vault selected by `[session] vault`.
///
/// Keyring entries are keyed by data directory, so a dev directory and the
/// production one never share a login.
///
/// # Errors
/// Returns an error if the data directory or the keyring entry is unavailable.
pub fn open_vault(config: &SessionConfig) -> Result<Box<dyn CredentialVault>> {
    match config.vault {
        VaultBackend::Keyring => {
            let account = format!("admin@{}", data_dir()?.display());
            Ok(Box::new(KeyringVault::new(&account)?))
        }
        VaultBackend::File => Ok(Box::new(FileVault::new(session_path()?))),
    }
}
