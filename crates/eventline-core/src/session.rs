//! Admin session: the gate in front of schedule writes.
//!
//! Logging in only records the password; the store checks it on the first
//! save. Any failed save drops the session, so the admin has to log in again
//! and resubmit by hand. There is no automatic retry.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{Result, StoreError, ValidationError};
use crate::event::GameEvent;
use crate::storage::CredentialVault;
use crate::store::{Credential, ScheduleStore, WriteReceipt};

#[derive(Debug, Default)]
pub struct AdminSession {
    credential: Option<Credential>,
    last_updated: Option<DateTime<Utc>>,
}

impl AdminSession {
    /// Anonymous (read-only) session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns an error if `password` is empty.
    pub fn login(&mut self, password: impl Into<String>) -> Result<(), ValidationError> {
        let credential = Credential::new(password);
        if credential.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        self.credential = Some(credential);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.credential = None;
    }

    pub fn is_admin(&self) -> bool {
        self.credential.is_some()
    }

    /// Time of the last successful save made through this session.
    ///
    /// This is the client's own clock, not a server-confirmed ordering point.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Push `events` to the store.
    ///
    /// # Errors
    /// Returns [`StoreError::Unauthorized`] without contacting the store when
    /// not logged in. Any store failure logs the session out before it is
    /// returned.
    pub fn save(
        &mut self,
        store: &dyn ScheduleStore,
        events: &[GameEvent],
        expected_revision: Option<u64>,
    ) -> Result<WriteReceipt, StoreError> {
        let credential = self.credential.as_ref().ok_or(StoreError::Unauthorized)?;

        match store.write(credential, events, expected_revision) {
            Ok(receipt) => {
                info!(revision = receipt.revision, "schedule synced");
                self.last_updated = Some(receipt.updated_at);
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "sync failed, dropping admin session");
                self.credential = None;
                Err(err)
            }
        }
    }

    /// Restore a session persisted by [`persist`](Self::persist).
    ///
    /// An empty vault yields an anonymous session.
    ///
    /// # Errors
    /// Returns an error if the vault cannot be read.
    pub fn restore(vault: &dyn CredentialVault) -> Result<Self> {
        let mut session = Self::anonymous();
        if let Some(password) = vault.get()?.filter(|pw| !pw.is_empty()) {
            session.credential = Some(Credential::new(password));
        }
        Ok(session)
    }

    /// Store the password in `vault`, or clear it when logged out.
    ///
    /// # Errors
    /// Returns an error if the vault cannot be written.
    pub fn persist(&self, vault: &dyn CredentialVault) -> Result<()> {
        match &self.credential {
            Some(credential) => vault.set(credential.expose()),
            None => vault.delete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileVault, KeyringVault};
    use crate::store::MemoryStore;

    #[test]
    fn login_requires_password() {
        let mut session = AdminSession::anonymous();
        assert_eq!(session.login(""), Err(ValidationError::EmptyPassword));
        assert!(!session.is_admin());
        session.login("pw").unwrap();
        assert!(session.is_admin());
    }

    #[test]
    fn anonymous_save_is_rejected_without_touching_store() {
        let store = MemoryStore::new("pw");
        let mut session = AdminSession::anonymous();
        let err = session.save(&store, &[GameEvent::welcome()], None).unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn successful_save_records_last_updated() {
        let store = MemoryStore::new("pw");
        let mut session = AdminSession::anonymous();
        session.login("pw").unwrap();

        let receipt = session.save(&store, &[GameEvent::welcome()], Some(0)).unwrap();
        assert_eq!(session.last_updated(), Some(receipt.updated_at));
        assert!(session.is_admin());
    }

    #[test]
    fn failed_save_logs_out() {
        let store = MemoryStore::new("pw");
        let mut session = AdminSession::anonymous();
        session.login("wrong").unwrap();

        assert!(session.save(&store, &[], None).is_err());
        assert!(!session.is_admin());
        assert_eq!(session.last_updated(), None);
    }

    #[test]
    fn conflict_also_logs_out() {
        let store = MemoryStore::new("pw");
        let mut session = AdminSession::anonymous();
        session.login("pw").unwrap();
        session.save(&store, &[], Some(0)).unwrap();

        let err = session.save(&store, &[], Some(0)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert!(!session.is_admin());
    }

    #[test]
    fn persist_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let vault = FileVault::new(&path);

        let mut session = AdminSession::anonymous();
        session.login("pw").unwrap();
        session.persist(&vault).unwrap();
        assert!(AdminSession::restore(&vault).unwrap().is_admin());

        session.logout();
        session.persist(&vault).unwrap();
        assert!(!path.exists());
        assert!(!AdminSession::restore(&vault).unwrap().is_admin());
    }

    #[cfg(unix)]
    #[test]
    fn persisted_password_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut session = AdminSession::anonymous();
        session.login("s3cret").unwrap();
        session.persist(&FileVault::new(&path)).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "session file readable by others: {mode:o}");
        assert!(!format!("{session:?}").contains("s3cret"));
    }

    #[test]
    fn keyring_round_trip() {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        let vault = KeyringVault::new("session-test").unwrap();

        let mut session = AdminSession::anonymous();
        session.login("pw").unwrap();
        session.persist(&vault).unwrap();
        assert!(AdminSession::restore(&vault).unwrap().is_admin());

        session.logout();
        session.persist(&vault).unwrap();
        assert!(!AdminSession::restore(&vault).unwrap().is_admin());
    }
}
