//! Shared schedule storage.
//!
//! The schedule is one document: the ordered event sequence plus the time of
//! the last write and a revision counter. Stores replace the whole document
//! on every write; a write based on a stale revision is rejected.

mod http;
mod memory;
mod migrations;
mod sqlite;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::event::GameEvent;
use crate::storage::{data_dir, StoreBackend, StoreConfig};

/// Environment variable holding the admin password for the local store.
pub const ADMIN_PASSWORD_ENV: &str = "EVENTLINE_ADMIN_PASSWORD";

/// Row id of the schedule document.
pub const SCHEDULE_ID: &str = "master_schedule";

/// Admin password presented on writes.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Result of reading the shared schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub events: Vec<GameEvent>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revision: u64,
}

impl Snapshot {
    /// What readers see before anything has been saved.
    pub fn welcome() -> Self {
        Self {
            events: vec![GameEvent::welcome()],
            updated_at: None,
            revision: 0,
        }
    }
}

/// Confirmation of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteReceipt {
    pub revision: u64,
    /// Shown to users as "last updated".
    pub updated_at: DateTime<Utc>,
}

/// External schedule store.
pub trait ScheduleStore {
    /// Read the current schedule; `None` if it has never been written.
    fn read(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Replace the whole schedule.
    ///
    /// `expected_revision` is the revision the edit was based on. `None`
    /// skips the check and overwrites unconditionally.
    fn write(
        &self,
        credential: &Credential,
        events: &[GameEvent],
        expected_revision: Option<u64>,
    ) -> Result<WriteReceipt, StoreError>;

    /// Read, falling back to the welcome placeholder for an empty store.
    fn read_or_welcome(&self) -> Result<Snapshot, StoreError> {
        Ok(self.read()?.unwrap_or_else(Snapshot::welcome))
    }
}

/// Reject a credential that does not match the configured password.
///
/// An unset password locks the store for writing.
pub(crate) fn check_credential(
    expected: Option<&str>,
    credential: &Credential,
) -> Result<(), StoreError> {
    match expected {
        Some(password) if !password.is_empty() && password == credential.expose() => Ok(()),
        _ => Err(StoreError::Unauthorized),
    }
}

/// Reject a write based on a stale revision.
pub(crate) fn check_revision(expected: Option<u64>, actual: u64) -> Result<(), StoreError> {
    match expected {
        Some(expected) if expected != actual => Err(StoreError::Conflict { expected, actual }),
        _ => Ok(()),
    }
}

/// Open the store selected in the configuration.
///
/// # Errors
/// Returns an error if the local database cannot be opened or the remote URL
/// is missing or invalid.
pub fn open_configured(config: &StoreConfig) -> Result<Box<dyn ScheduleStore>> {
    match config.backend {
        StoreBackend::Local => {
            let path = data_dir()?.join("schedule.db");
            debug!(path = %path.display(), "opening local schedule store");
            let password = std::env::var(ADMIN_PASSWORD_ENV).ok();
            Ok(Box::new(SqliteStore::open(&path, password)?))
        }
        StoreBackend::Remote => {
            let url = config.remote_url.as_deref().ok_or_else(|| {
                crate::error::ConfigError::InvalidValue {
                    key: "store.remote_url".to_string(),
                    message: "required when store.backend = \"remote\"".to_string(),
                }
            })?;
            debug!(url, "opening remote schedule store");
            Ok(Box::new(HttpStore::new(
                url,
                Duration::from_secs(config.timeout_secs),
            )?))
        }
    }
}
