//! In-process schedule store.

use std::sync::Mutex;

use chrono::Utc;

use super::{check_credential, check_revision, Credential, ScheduleStore, Snapshot, WriteReceipt};
use crate::error::StoreError;
use crate::event::GameEvent;

/// Schedule store kept in memory, guarded by a fixed admin password.
#[derive(Debug)]
pub struct MemoryStore {
    password: Option<String>,
    inner: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            inner: Mutex::new(None),
        }
    }

    /// Start from an existing snapshot.
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.inner = Mutex::new(Some(snapshot));
        self
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Snapshot>>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

impl ScheduleStore for MemoryStore {
    fn read(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn write(
        &self,
        credential: &Credential,
        events: &[GameEvent],
        expected_revision: Option<u64>,
    ) -> Result<WriteReceipt, StoreError> {
        check_credential(self.password.as_deref(), credential)?;

        let mut current = self.lock()?;
        let actual = current.as_ref().map_or(0, |snapshot| snapshot.revision);
        check_revision(expected_revision, actual)?;

        let receipt = WriteReceipt {
            revision: actual + 1,
            updated_at: Utc::now(),
        };
        *current = Some(Snapshot {
            events: events.to_vec(),
            updated_at: Some(receipt.updated_at),
            revision: receipt.revision,
        });
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reads_none_then_welcome() {
        let store = MemoryStore::new("pw");
        assert_eq!(store.read().unwrap(), None);
        assert_eq!(store.read_or_welcome().unwrap(), Snapshot::welcome());
    }

    #[test]
    fn write_bumps_revision() {
        let store = MemoryStore::new("pw");
        let pw = Credential::new("pw");
        let events = vec![GameEvent::welcome()];

        let first = store.write(&pw, &events, Some(0)).unwrap();
        assert_eq!(first.revision, 1);
        let second = store.write(&pw, &[], Some(1)).unwrap();
        assert_eq!(second.revision, 2);

        let snapshot = store.read().unwrap().unwrap();
        assert!(snapshot.events.is_empty());
        assert_eq!(snapshot.updated_at, Some(second.updated_at));
    }

    #[test]
    fn stale_write_is_rejected_and_leaves_data() {
        let store = MemoryStore::new("pw");
        let pw = Credential::new("pw");
        store.write(&pw, &[GameEvent::welcome()], None).unwrap();

        let err = store.write(&pw, &[], Some(0)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected: 0, actual: 1 }));
        assert_eq!(store.read().unwrap().unwrap().events.len(), 1);
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let store = MemoryStore::new("pw");
        let err = store.write(&Credential::new("nope"), &[], None).unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
        assert_eq!(store.read().unwrap(), None);
    }
}
