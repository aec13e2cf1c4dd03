//! Core error types for eventline-core.
//!
//! This module defines the error hierarchy using thiserror. Every fallible
//! operation in the library returns one of these, and the CLI boxes them at
//! the edge.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for eventline-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schedule store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Import document errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Reorder errors
    #[error("Reorder error: {0}")]
    Reorder(#[from] ReorderError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Platform keyring errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Errors raised by a [`ScheduleStore`](crate::store::ScheduleStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The credential was rejected by the store.
    #[error("Unauthorized: the admin credential was rejected")]
    Unauthorized,

    /// The store could not be reached or answered with an unexpected status.
    #[error("Network error: {0}")]
    Network(String),

    /// Another writer saved since this client last read the schedule.
    #[error(
        "Conflict: schedule is at revision {actual}, but this edit was based on revision {expected}"
    )]
    Conflict { expected: u64, actual: u64 },

    /// Local database failure
    #[error("Database error: {0}")]
    Database(String),

    /// Stored document could not be decoded
    #[error("Corrupt schedule document: {0}")]
    Corrupt(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors raised at the data-entry boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// End date before start date
    #[error("Invalid date range: end date ({end}) is before start date ({start})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Empty title
    #[error("Event title must not be empty")]
    EmptyTitle,

    /// Unknown category or filter name
    #[error(
        "Unknown category '{0}' (expected one of: main, story, event, \
         high_difficulty, gacha, campaign)"
    )]
    UnknownCategory(String),

    /// Reference year outside the supported calendar range
    #[error("Year {year} with month offset {month_offset} is outside the supported calendar range")]
    PeriodOutOfRange { year: i32, month_offset: i32 },

    /// Canvas width outside the zoom range
    #[error("Canvas width {width}px is outside the supported range {min}..={max}")]
    CanvasWidth { width: u32, min: u32, max: u32 },

    /// Unsupported banner image file
    #[error("Unsupported banner image '{0}' (expected png, jpg, jpeg, gif or webp)")]
    UnsupportedImage(String),

    /// Empty admin password at login
    #[error("Admin password must not be empty")]
    EmptyPassword,

    /// No event with the given id
    #[error("No event with id '{0}'")]
    UnknownEvent(String),
}

/// Errors raised while importing a portable schedule document.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Document is not a JSON array
    #[error("Document is not an array of events")]
    NotAnArray,

    /// An element could not be decoded as an event
    #[error("Element {index} is not a valid event: {message}")]
    InvalidElement { index: usize, message: String },

    /// An element decoded but failed validation
    #[error("Element {index} failed validation: {source}")]
    InvalidEvent {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// Document is not JSON at all
    #[error("Document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors raised by manual reordering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// Reordering a filtered subset would corrupt the full list
    #[error(
        "Events can only be reordered while the category filter is 'all' (current: {filter})"
    )]
    Filtered { filter: String },

    /// Index out of bounds
    #[error("Index {index} out of bounds for event list (length: {len})")]
    OutOfBounds { index: usize, len: usize },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Network(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
