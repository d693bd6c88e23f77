//! Record store client.
//!
//! Talks to a Kinto-style collection endpoint:
//! `{base}/buckets/{bucket}/collections/{collection}/records`. The same
//! endpoint serves both the initial batch (`_limit`) and incremental
//! changesets (`_since`), where deleted records come back as tombstones
//! (`"deleted": true`).

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use wallcast_core::config::ServerConfig;
use wallcast_core::{Record, RecordId};

use crate::error::{ClientError, Result};

#[derive(Clone)]
pub struct KintoClient {
    client: reqwest::Client,
    records_url: String,
    auth_header: Option<String>,
}

/// One `_since` poll result, split into live records and tombstones.
#[derive(Debug, Default)]
pub struct ChangeSet {
    /// Newly created records, newest first.
    pub created: Vec<Record>,
    /// Ids of deleted records.
    pub deleted: Vec<RecordId>,
    /// Highest `last_modified` seen; feed back as the next `_since` cursor.
    pub cursor: i64,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

/// Raw `{"data": [...]}` envelope. A missing `data` field is treated as an
/// empty list, not an error.
#[derive(Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    data: Vec<Value>,
}

impl KintoClient {
    pub fn new(server: &ServerConfig) -> Self {
        let records_url = format!(
            "{}/buckets/{}/collections/{}/records",
            server.url.trim_end_matches('/'),
            server.bucket,
            server.collection
        );
        let auth_header = server.auth.as_ref().map(|auth| {
            let token = STANDARD.encode(format!("{}:{}", auth.user, auth.password));
            format!("Basic {token}")
        });
        Self {
            client: reqwest::Client::new(),
            records_url,
            auth_header,
        }
    }

    /// Fetch the initial batch, newest first.
    pub async fn fetch_records(&self, limit: u32) -> Result<Vec<Record>> {
        let url = format!("{}?_limit={}&_sort=-last_modified", self.records_url, limit);
        let body = self.get(&url).await?;
        let changes = split_changes(body.data);
        debug!(count = changes.created.len(), "initial batch fetched");
        Ok(changes.created)
    }

    /// Fetch every change strictly newer than `since`.
    pub async fn poll_changes(&self, since: i64) -> Result<ChangeSet> {
        let url = format!("{}?_since={}", self.records_url, since);
        let body = self.get(&url).await?;
        Ok(split_changes(body.data))
    }

    async fn get(&self, url: &str) -> Result<RecordsResponse> {
        let mut req = self.client.get(url);
        if let Some(header) = &self.auth_header {
            req = req.header(reqwest::header::AUTHORIZATION, header.as_str());
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
            });
        }
        resp.json::<RecordsResponse>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Split raw changeset rows into live records and tombstones.
///
/// Rows that are neither are logged and skipped; the store is trusted but a
/// malformed row must not take the wall down.
fn split_changes(rows: Vec<Value>) -> ChangeSet {
    let mut changes = ChangeSet::default();
    for row in rows {
        let last_modified = row
            .get("last_modified")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        changes.cursor = changes.cursor.max(last_modified);

        let is_tombstone = row
            .get("deleted")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if is_tombstone {
            match row.get("id").and_then(Value::as_str) {
                Some(id) => changes.deleted.push(RecordId::from(id)),
                None => warn!("tombstone without id, skipping"),
            }
            continue;
        }

        match serde_json::from_value::<Record>(row) {
            Ok(record) => changes.created.push(record),
            Err(e) => warn!(error = %e, "unparsable record row, skipping"),
        }
    }
    changes
}
