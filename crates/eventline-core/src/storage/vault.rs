//! Where the admin password rests between CLI invocations.
//!
//! The OS keyring is the default. The file vault exists for headless
//! machines without a keyring daemon and only ever writes an owner-only file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Keyring service name for every eventline secret.
pub const KEYRING_SERVICE: &str = "eventline";

/// Storage for a single secret string.
pub trait CredentialVault {
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn get(&self) -> Result<Option<String>>;

    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn set(&self, secret: &str) -> Result<()>;

    /// Removing a secret that is not there is not an error.
    ///
    /// # Errors
    /// Returns an error if the backing store refuses the removal.
    fn delete(&self) -> Result<()>;
}

/// Secret kept in the platform keyring.
pub struct KeyringVault {
    entry: keyring::Entry,
}

impl KeyringVault {
    /// # Errors
    /// Returns an error if the keyring rejects the service/account pair.
    pub fn new(account: &str) -> Result<Self> {
        Ok(Self {
            entry: keyring::Entry::new(KEYRING_SERVICE, account)?,
        })
    }
}

impl CredentialVault for KeyringVault {
    fn get(&self) -> Result<Option<String>> {
        match self.entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, secret: &str) -> Result<()> {
        self.entry.set_password(secret)?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct VaultFile {
    password: String,
}

/// Secret kept in a JSON file readable only by its owner.
pub struct FileVault {
    path: PathBuf,
}

impl FileVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialVault for FileVault {
    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let file: VaultFile = serde_json::from_str(&content)?;
        Ok(Some(file.password).filter(|pw| !pw.is_empty()))
    }

    fn set(&self, secret: &str) -> Result<()> {
        let body = serde_json::to_string(&VaultFile {
            password: secret.to_string(),
        })?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        // `mode` only applies on creation; tighten a file left by older builds.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(body.as_bytes())?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
