pub mod admin;
pub mod config;
pub mod data;
pub mod event;
pub mod timeline;

use eventline_core::store::{open_configured, ScheduleStore, Snapshot, WriteReceipt};
use eventline_core::{open_vault, AdminSession, Config, GameEvent};
use tracing::debug;

/// Open the configured store and read the current schedule.
pub fn load_schedule(
    config: &Config,
) -> Result<(Box<dyn ScheduleStore>, Snapshot), Box<dyn std::error::Error>> {
    let store = open_configured(&config.store)?;
    let snapshot = store.read_or_welcome()?;
    debug!(
        revision = snapshot.revision,
        events = snapshot.events.len(),
        "loaded schedule"
    );
    Ok((store, snapshot))
}

/// Push `events` through the persisted admin session.
///
/// A failed save logs the admin out; the edit has to be redone after a new
/// `admin login`.
pub fn save_schedule(
    config: &Config,
    store: &dyn ScheduleStore,
    events: &[GameEvent],
    expected_revision: Option<u64>,
) -> Result<WriteReceipt, Box<dyn std::error::Error>> {
    let vault = open_vault(&config.session)?;
    let mut session = AdminSession::restore(&*vault)?;
    if !session.is_admin() {
        return Err("admin login required (run `eventline admin login <password>`)".into());
    }

    match session.save(store, events, expected_revision) {
        Ok(receipt) => {
            println!("Last updated: {}", receipt.updated_at.to_rfc3339());
            Ok(receipt)
        }
        Err(e) => {
            session.persist(&*vault)?;
            Err(format!("{e}; logged out, log in again and resubmit").into())
        }
    }
}
