//! Portable schedule document: a JSON array of events.
//!
//! Import is all-or-nothing. A document with one bad element is rejected
//! whole and the current schedule is left untouched.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use tracing::debug;

use crate::error::{ImportError, Result, ValidationError};
use crate::event::GameEvent;

/// Pretty-printed JSON array of `events`, in order.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn export_events(events: &[GameEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(events)
}

/// Parse a portable document into an event sequence.
///
/// # Errors
/// Returns an error if the text is not JSON, is not an array, or any element
/// is not a valid event.
pub fn import_events(text: &str) -> Result<Vec<GameEvent>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };

    let events = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let event: GameEvent = serde_json::from_value(item)
                .map_err(|e| ImportError::InvalidElement {
                    index,
                    message: e.to_string(),
                })?;
            event
                .validate()
                .map_err(|source| ImportError::InvalidEvent { index, source })?;
            Ok(event)
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    debug!(count = events.len(), "parsed schedule document");
    Ok(events)
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Embed a local image as a `data:` URL for [`GameEvent::banner_image`].
///
/// # Errors
/// Returns an error if the extension is not a supported image type or the
/// file cannot be read.
pub fn banner_data_url(path: &Path) -> Result<String> {
    let mime = image_mime(path)
        .ok_or_else(|| ValidationError::UnsupportedImage(path.display().to_string()))?;
    let bytes = std::fs::read(path)?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
