//! SQLite-backed schedule store.
//!
//! Mirrors the shared document table: one row keyed by
//! [`SCHEDULE_ID`](super::SCHEDULE_ID) holding the event sequence as JSON.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::migrations;
use super::{
    check_credential, check_revision, Credential, ScheduleStore, Snapshot, WriteReceipt,
    SCHEDULE_ID,
};
use crate::error::StoreError;
use crate::event::GameEvent;

pub struct SqliteStore {
    conn: Connection,
    password: Option<String>,
}

impl SqliteStore {
    /// Open (and migrate) the database at `path`.
    ///
    /// Writes are accepted only with `password`; `None` makes the store
    /// read-only.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path, password: Option<String>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, password)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory(password: Option<String>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, password)
    }

    fn with_connection(conn: Connection, password: Option<String>) -> Result<Self, StoreError> {
        migrations::migrate(&conn)?;
        Ok(Self { conn, password })
    }

    fn current_revision(conn: &Connection) -> Result<u64, StoreError> {
        let revision: Option<i64> = conn
            .query_row(
                "SELECT revision FROM schedule WHERE id = ?1",
                params![SCHEDULE_ID],
                |row| row.get(0),
            )
            .optional()?;
        Ok(revision.map_or(0, |r| r.max(0) as u64))
    }
}

impl ScheduleStore for SqliteStore {
    fn read(&self) -> Result<Option<Snapshot>, StoreError> {
        let row: Option<(String, String, i64)> = self
            .conn
            .query_row(
                "SELECT data, updated_at, revision FROM schedule WHERE id = ?1",
                params![SCHEDULE_ID],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((data, updated_at, revision)) = row else {
            debug!("local schedule is empty");
            return Ok(None);
        };

        let events: Vec<GameEvent> =
            serde_json::from_str(&data).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        Ok(Some(Snapshot {
            events,
            updated_at: Some(updated_at),
            revision: revision.max(0) as u64,
        }))
    }

    fn write(
        &self,
        credential: &Credential,
        events: &[GameEvent],
        expected_revision: Option<u64>,
    ) -> Result<WriteReceipt, StoreError> {
        check_credential(self.password.as_deref(), credential)?;

        let data = serde_json::to_string(events).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let tx = self.conn.unchecked_transaction()?;

        let actual = Self::current_revision(&tx)?;
        check_revision(expected_revision, actual)?;

        let receipt = WriteReceipt {
            revision: actual + 1,
            updated_at: Utc::now(),
        };
        tx.execute(
            "INSERT INTO schedule (id, data, updated_at, revision)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at,
                revision = excluded.revision",
            params![
                SCHEDULE_ID,
                data,
                receipt.updated_at.to_rfc3339(),
                receipt.revision as i64,
            ],
        )?;
        tx.commit()?;

        info!(revision = receipt.revision, events = events.len(), "saved schedule");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Category;
    use chrono::NaiveDate;

    fn sample() -> Vec<GameEvent> {
        vec![
            GameEvent::welcome(),
            GameEvent {
                id: "2".into(),
                title: "Limited Gacha".into(),
                start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(),
                category: Category::Gacha,
                banner_image: Some("https://example.com/banner.png".into()),
                description: Some("Rate up".into()),
            },
        ]
    }

    #[test]
    fn write_then_read_preserves_order_and_fields() {
        let store = SqliteStore::open_in_memory(Some("pw".into())).unwrap();
        let mut events = sample();
        events.reverse();

        let receipt = store.write(&Credential::new("pw"), &events, Some(0)).unwrap();
        let snapshot = store.read().unwrap().unwrap();

        assert_eq!(snapshot.events, events);
        assert_eq!(snapshot.revision, receipt.revision);
        assert_eq!(
            snapshot.updated_at.map(|t| t.timestamp()),
            Some(receipt.updated_at.timestamp())
        );
    }

    #[test]
    fn read_only_without_password() {
        let store = SqliteStore::open_in_memory(None).unwrap();
        let err = store.write(&Credential::new("anything"), &sample(), None).unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized));
    }

    #[test]
    fn conflicting_write_is_rejected() {
        let store = SqliteStore::open_in_memory(Some("pw".into())).unwrap();
        let pw = Credential::new("pw");
        store.write(&pw, &sample(), Some(0)).unwrap();
        store.write(&pw, &sample()[..1], Some(1)).unwrap();

        let err = store.write(&pw, &[], Some(1)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected: 1, actual: 2 }));
        assert_eq!(store.read().unwrap().unwrap().events.len(), 1);
    }
}
