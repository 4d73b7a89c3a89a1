//! Buffered bulk indexing.
//!
//! A [`BulkIndexer`] collects item operations and sends them to the engine's
//! `_bulk` endpoint in batches. A batch goes out when the buffered item count
//! or byte size reaches its threshold, when [`BulkIndexer::flush`] is called,
//! and once more on [`BulkIndexer::close`].
//!
//! Per-item failures do not fail the batch: they are logged and counted in
//! [`BulkIndexerStats`]. A failed request (transport error or non-success
//! status for the whole call) is returned as an error.

use crate::error::{error_body, Result, SearchError};
use clubsearch_log::{debug, info, warn};
use opensearch::http::request::JsonBody;
use opensearch::params::Refresh;
use opensearch::{BulkParts, OpenSearch};
use serde::Deserialize;
use serde_json::json;
use serde_json::value::{to_raw_value, RawValue};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Default number of buffered items that triggers a flush.
pub const DEFAULT_FLUSH_ITEMS: usize = 1000;

/// Default buffered payload size in bytes that triggers a flush.
pub const DEFAULT_FLUSH_BYTES: usize = 5_000_000;

/// Bulk operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Create or replace a document.
    Index,
    /// Create a document, failing if the id is taken.
    Create,
    /// Delete a document.
    Delete,
}

impl BulkAction {
    fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Index => "index",
            BulkAction::Create => "create",
            BulkAction::Delete => "delete",
        }
    }
}

/// One buffered bulk operation.
#[derive(Debug, Clone)]
pub struct BulkItem {
    action: BulkAction,
    id: Option<String>,
    source: Option<Box<RawValue>>,
}

impl BulkItem {
    /// Index `source`, under `id` or an engine-assigned id.
    pub fn index(id: Option<String>, source: Box<RawValue>) -> Self {
        Self {
            action: BulkAction::Index,
            id,
            source: Some(source),
        }
    }

    /// Create `source` under `id`.
    pub fn create(id: impl Into<String>, source: Box<RawValue>) -> Self {
        Self {
            action: BulkAction::Create,
            id: Some(id.into()),
            source: Some(source),
        }
    }

    /// Delete the document stored under `id`.
    pub fn delete(id: impl Into<String>) -> Self {
        Self {
            action: BulkAction::Delete,
            id: Some(id.into()),
            source: None,
        }
    }

    /// Operation type.
    pub fn action(&self) -> BulkAction {
        self.action
    }

    fn header(&self, index: &str) -> serde_json::Result<Box<RawValue>> {
        let mut meta = json!({ "_index": index });
        if let Some(id) = &self.id {
            meta["_id"] = json!(id);
        }
        to_raw_value(&json!({ self.action.as_str(): meta }))
    }

    // Source bytes plus an allowance for the header line.
    fn encoded_len(&self) -> usize {
        let id_len = self.id.as_ref().map_or(0, String::len);
        let source_len = self.source.as_ref().map_or(0, |s| s.get().len() + 1);
        64 + id_len + source_len
    }
}

/// Bulk indexer settings.
#[derive(Debug, Clone)]
pub struct BulkIndexerConfig {
    /// Target index.
    pub index: String,
    /// Flush once this many items are buffered.
    pub flush_items: usize,
    /// Flush once the buffered payload reaches this many bytes.
    pub flush_bytes: usize,
    /// Ask the engine to refresh after each batch.
    pub refresh: bool,
}

impl BulkIndexerConfig {
    /// Settings for `index` with default thresholds.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            flush_items: DEFAULT_FLUSH_ITEMS,
            flush_bytes: DEFAULT_FLUSH_BYTES,
            refresh: false,
        }
    }

    /// Set the item threshold.
    pub fn with_flush_items(mut self, items: usize) -> Self {
        self.flush_items = items.max(1);
        self
    }

    /// Set the byte threshold.
    pub fn with_flush_bytes(mut self, bytes: usize) -> Self {
        self.flush_bytes = bytes.max(1);
        self
    }

    /// Refresh the index after each batch.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

/// Counters kept by a [`BulkIndexer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkIndexerStats {
    /// Items handed to the indexer.
    pub num_added: u64,
    /// Items sent to the engine.
    pub num_flushed: u64,
    /// Items the engine rejected.
    pub num_failed: u64,
    /// Successful index operations.
    pub num_indexed: u64,
    /// Successful create operations.
    pub num_created: u64,
    /// Successful delete operations.
    pub num_deleted: u64,
    /// `_bulk` requests sent.
    pub num_requests: u64,
}

/// Buffered bulk indexer bound to one index.
pub struct BulkIndexer {
    client: Arc<OpenSearch>,
    config: BulkIndexerConfig,
    pending: Vec<BulkItem>,
    pending_bytes: usize,
    stats: BulkIndexerStats,
}

impl BulkIndexer {
    pub(crate) fn new(client: Arc<OpenSearch>, config: BulkIndexerConfig) -> Self {
        Self {
            client,
            config,
            pending: Vec::new(),
            pending_bytes: 0,
            stats: BulkIndexerStats::default(),
        }
    }

    /// Buffer an item, flushing if a threshold is reached.
    pub async fn add(&mut self, item: BulkItem) -> Result<()> {
        self.pending_bytes += item.encoded_len();
        self.pending.push(item);
        self.stats.num_added += 1;

        if self.pending.len() >= self.config.flush_items
            || self.pending_bytes >= self.config.flush_bytes
        {
            self.flush().await?;
        }
        Ok(())
    }

    /// Send every buffered item.
    pub async fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let items = std::mem::take(&mut self.pending);
        self.pending_bytes = 0;

        debug!(
            "Flushing {} bulk items to index {}",
            items.len(),
            self.config.index
        );

        let mut body: Vec<JsonBody<Box<RawValue>>> = Vec::with_capacity(items.len() * 2);
        for item in &items {
            body.push(JsonBody::new(item.header(&self.config.index)?));
            if let Some(source) = &item.source {
                body.push(JsonBody::new(source.clone()));
            }
        }

        let mut request = self
            .client
            .bulk(BulkParts::Index(&self.config.index))
            .body(body);
        if self.config.refresh {
            request = request.refresh(Refresh::True);
        }

        let response = request.send().await?;
        self.stats.num_requests += 1;

        let status = response.status_code();
        if !status.is_success() {
            let body = error_body(response).await?;
            return Err(SearchError::engine(status.as_u16(), &body));
        }

        let text = response.text().await?;
        let parsed: BulkResponse = serde_json::from_str(&text)
            .map_err(|e| SearchError::Decode(format!("malformed bulk response: {}", e)))?;

        self.stats.num_flushed += items.len() as u64;
        self.record(&parsed);
        Ok(())
    }

    /// Flush what is left and return the final counters.
    pub async fn close(mut self) -> Result<BulkIndexerStats> {
        self.flush().await?;

        info!(
            "Bulk indexing into {} finished: {} added, {} failed, {} requests",
            self.config.index, self.stats.num_added, self.stats.num_failed, self.stats.num_requests
        );
        Ok(self.stats)
    }

    /// Counters so far.
    pub fn stats(&self) -> &BulkIndexerStats {
        &self.stats
    }

    fn record(&mut self, response: &BulkResponse) {
        for item in &response.items {
            for (action, status) in item {
                if !status.is_success() {
                    self.stats.num_failed += 1;
                    let (kind, reason) = status
                        .error
                        .as_ref()
                        .map(|e| (e.error_type.as_str(), e.reason.as_deref().unwrap_or("")))
                        .unwrap_or(("unknown", ""));
                    warn!(
                        "Bulk {} of document {} failed with status {}: {} {}",
                        action,
                        status.id.as_deref().unwrap_or("<none>"),
                        status.status,
                        kind,
                        reason
                    );
                    continue;
                }

                match action.as_str() {
                    "index" => self.stats.num_indexed += 1,
                    "create" => self.stats.num_created += 1,
                    "delete" => self.stats.num_deleted += 1,
                    _ => {}
                }
            }
        }
    }
}

/// `_bulk` response body.
#[derive(Debug, Clone, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<BTreeMap<String, BulkItemStatus>>,
}

/// Outcome of one bulk item.
#[derive(Debug, Clone, Deserialize)]
struct BulkItemStatus {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    status: u16,
    #[serde(default)]
    error: Option<BulkItemError>,
}

impl BulkItemStatus {
    fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BulkItemError {
    #[serde(rename = "type")]
    error_type: String,
    #[serde(default)]
    reason: Option<String>,
}
