//! Remote schedule store reached over HTTP.
//!
//! - `GET  {base}/api/schedule` returns a [`Snapshot`]; 404 means empty.
//! - `POST {base}/api/sync` with `{password, events, expectedRevision}`
//!   replaces the document. 401/403 reject the credential, 409 reports a
//!   stale revision.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};
use url::Url;

use super::{Credential, ScheduleStore, Snapshot, WriteReceipt};
use crate::error::StoreError;
use crate::event::GameEvent;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SyncRequest<'a> {
    password: &'a str,
    events: &'a [GameEvent],
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_revision: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyncResponse {
    #[serde(default)]
    revision: Option<u64>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// HTTP client for the shared schedule service.
///
/// The async client runs on a private current-thread runtime so the store
/// can be used from synchronous code. Do not call it from inside another
/// tokio runtime.
pub struct HttpStore {
    base: Url,
    client: reqwest::Client,
    runtime: Runtime,
}

impl HttpStore {
    /// # Errors
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| StoreError::Network(format!("invalid store URL '{base_url}': {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("eventline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Network(format!("failed to start HTTP runtime: {e}")))?;

        Ok(Self {
            base,
            client,
            runtime,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base
            .join(path)
            .map_err(|e| StoreError::Network(e.to_string()))
    }

    async fn fetch_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        let url = self.endpoint("api/schedule")?;
        debug!(%url, "fetching schedule");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<Snapshot>().await?)),
            status => Err(StoreError::Network(format!(
                "unexpected status {status} while reading schedule"
            ))),
        }
    }

    async fn push_snapshot(
        &self,
        credential: &Credential,
        events: &[GameEvent],
        expected_revision: Option<u64>,
    ) -> Result<WriteReceipt, StoreError> {
        let url = self.endpoint("api/sync")?;
        let body = SyncRequest {
            password: credential.expose(),
            events,
            expected_revision,
        };
        debug!(%url, events = events.len(), ?expected_revision, "pushing schedule");

        let response = self.client.post(url).json(&body).send().await?;
        match response.status() {
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                warn!(%status, "store rejected admin credential");
                Err(StoreError::Unauthorized)
            }
            StatusCode::CONFLICT => {
                let current = response.json::<SyncResponse>().await.unwrap_or_default();
                Err(StoreError::Conflict {
                    expected: expected_revision.unwrap_or(0),
                    actual: current.revision.unwrap_or(0),
                })
            }
            status if status.is_success() => {
                // Older servers answer `{"success": true}` only.
                let ack = response.json::<SyncResponse>().await.unwrap_or_default();
                let receipt = WriteReceipt {
                    revision: ack
                        .revision
                        .unwrap_or_else(|| expected_revision.map_or(1, |r| r + 1)),
                    updated_at: ack.updated_at.unwrap_or_else(Utc::now),
                };
                info!(revision = receipt.revision, events = events.len(), "saved schedule");
                Ok(receipt)
            }
            status => Err(StoreError::Network(format!(
                "unexpected status {status} while saving schedule"
            ))),
        }
    }
}

impl ScheduleStore for HttpStore {
    fn read(&self) -> Result<Option<Snapshot>, StoreError> {
        self.runtime.block_on(self.fetch_snapshot())
    }

    fn write(
        &self,
        credential: &Credential,
        events: &[GameEvent],
        expected_revision: Option<u64>,
    ) -> Result<WriteReceipt, StoreError> {
        self.runtime
            .block_on(self.push_snapshot(credential, events, expected_revision))
    }
}
