//! # Eventline Core Library
//!
//! Core logic for the Eventline game-event schedule dashboard. Every
//! operation is available through the `eventline` CLI; any other front end
//! is a thin presentation layer over the same library.
//!
//! ## Architecture
//!
//! - **Timeline**: pure functions deriving the four-month window, week grid,
//!   bar geometry and today marker from explicit state
//! - **View**: the authoritative event order, category filter and window
//! - **Store**: the shared schedule document behind a [`ScheduleStore`]
//!   trait (SQLite locally, HTTP for a shared service)
//! - **Session**: admin gate in front of every write
//! - **Storage**: TOML configuration, the data directory and the credential
//!   vault (platform keyring, or an owner-only file)
//!
//! ## Key Components
//!
//! - [`ViewState`]: application state fed into the timeline
//! - [`Frame`]: render-ready geometry for one pass
//! - [`AdminSession`]: login state and the save path
//! - [`Config`]: application configuration management

pub mod document;
pub mod error;
pub mod event;
pub mod session;
pub mod storage;
pub mod store;
pub mod timeline;
pub mod view;

pub use document::{banner_data_url, export_events, import_events};
pub use error::{ConfigError, CoreError, ImportError, ReorderError, StoreError, ValidationError};
pub use event::{Category, CategoryFilter, EventDraft, GameEvent};
pub use session::AdminSession;
pub use storage::{
    data_dir, open_vault, Config, CredentialVault, FileVault, KeyringVault, SessionConfig,
    StoreBackend, StoreConfig, VaultBackend, ViewConfig,
};
pub use store::{
    open_configured, Credential, HttpStore, MemoryStore, ScheduleStore, Snapshot, SqliteStore,
    WriteReceipt,
};
pub use timeline::{CanvasWidth, Frame, LayoutRecord, ViewPeriod, WeekMarker};
pub use view::ViewState;
