//! Search engine client implementation.

use crate::{
    bulk::{BulkIndexer, BulkIndexerConfig, BulkIndexerStats, BulkItem},
    config::SearchConfig,
    document::Document,
    error::{error_body, Result, SearchError},
    index::{IndexManager, IndexSettings},
    query::Query,
    search::{SearchBuilder, SearchHit},
};
use clubsearch_log::{debug, info};
use opensearch::{
    auth::Credentials,
    http::{
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode, Url,
    },
    params::Refresh,
    DeleteParts, GetParts, IndexParts, OpenSearch,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Client for document operations against one engine endpoint.
#[derive(Clone)]
pub struct SearchClient {
    client: Arc<OpenSearch>,
    config: Arc<SearchConfig>,
}

impl SearchClient {
    /// Build a client from `config`.
    ///
    /// No request is sent; use [`SearchClient::ping`] to check reachability.
    pub fn connect(config: SearchConfig) -> Result<Self> {
        info!("Connecting to search engine at {}", config.url);

        if config.url.trim().is_empty() {
            return Err(SearchError::Connection(
                "no engine address configured".to_string(),
            ));
        }

        let url = Url::parse(&config.url)
            .map_err(|e| SearchError::Connection(format!("invalid address '{}': {}", config.url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(config.request_timeout)
            .disable_proxy();

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.auth(Credentials::Basic(user.clone(), pass.clone()));
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::Connection(e.to_string()))?;

        debug!("Search engine client initialized");

        Ok(Self {
            client: Arc::new(OpenSearch::new(transport)),
            config: Arc::new(config),
        })
    }

    /// Get the underlying engine client.
    pub fn inner(&self) -> &OpenSearch {
        &self.client
    }

    /// Get the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Ask the engine root endpoint who it is.
    ///
    /// Returns `"<cluster_name> (node <name>, version <number>)"`. Any failure
    /// to get a successful answer is a [`SearchError::Connection`].
    pub async fn ping(&self) -> Result<String> {
        debug!("Pinging {}", self.config.url);

        let response = self
            .client
            .info()
            .send()
            .await
            .map_err(|e| SearchError::Connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchError::Connection(format!(
                "engine answered ping with status {}",
                status.as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Connection(e.to_string()))?;

        Ok(format!(
            "{} (node {}, version {})",
            body["cluster_name"].as_str().unwrap_or("unknown"),
            body["name"].as_str().unwrap_or("unknown"),
            body["version"]["number"].as_str().unwrap_or("unknown"),
        ))
    }

    /// Get an index manager for index operations.
    pub fn indices(&self) -> IndexManager {
        IndexManager::new(self.client.clone())
    }

    /// Create a search builder.
    pub fn search(&self) -> SearchBuilder {
        SearchBuilder::new(self.client.clone())
    }

    /// Create a bulk indexer.
    pub fn bulk_indexer(&self, config: BulkIndexerConfig) -> BulkIndexer {
        BulkIndexer::new(self.client.clone(), config)
    }

    // =========================================================================
    // Index Operations
    // =========================================================================

    /// Create `name` with `settings`; fails with
    /// [`SearchError::IndexExists`] if it is already there.
    pub async fn create_index(&self, name: &str, settings: &IndexSettings) -> Result<()> {
        self.indices().create(name, settings).await
    }

    /// Check whether `name` exists.
    pub async fn index_exists(&self, name: &str) -> Result<bool> {
        self.indices().exists(name).await
    }

    /// Delete `name`.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        self.indices().delete(name).await
    }

    /// Make recent writes to `name` searchable.
    pub async fn refresh_index(&self, name: &str) -> Result<()> {
        self.indices().refresh(name).await
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Store `doc` in `index`, replacing any document with the same id.
    ///
    /// The index is refreshed before the call returns. Returns the id the
    /// document was stored under.
    pub async fn insert_document(&self, index: &str, doc: &dyn Document) -> Result<String> {
        let id = doc.document_id();
        if matches!(id.as_deref(), Some(id) if id.is_empty()) {
            return Err(SearchError::Validation(
                "document id must not be empty".to_string(),
            ));
        }

        let source = doc.to_source()?;

        let parts = match &id {
            Some(id) => {
                debug!("Indexing document {} in index {}", id, index);
                IndexParts::IndexId(index, id)
            }
            None => {
                debug!("Indexing document with auto-generated ID in index {}", index);
                IndexParts::Index(index)
            }
        };

        let response = self
            .client
            .index(parts)
            .refresh(Refresh::True)
            .body(source)
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let body = error_body(response).await?;
            return Err(SearchError::engine(status.as_u16(), &body));
        }

        let body: Value = response.json().await?;
        body["_id"]
            .as_str()
            .map(str::to_string)
            .or(id)
            .ok_or_else(|| SearchError::Decode("index response carried no '_id'".to_string()))
    }

    /// Store every document in `docs` through a bulk indexer.
    ///
    /// All documents are encoded before anything is sent; the first encoding
    /// failure aborts the batch with [`SearchError::Encoding`]. Items the
    /// engine rejects are counted in the returned stats rather than failing
    /// the call.
    pub async fn bulk_insert(
        &self,
        index: &str,
        docs: &[&dyn Document],
    ) -> Result<BulkIndexerStats> {
        debug!("Bulk inserting {} documents into index {}", docs.len(), index);

        let items = docs
            .iter()
            .enumerate()
            .map(|(position, doc)| {
                doc.to_source()
                    .map(|source| BulkItem::index(doc.document_id(), source))
                    .map_err(|source| SearchError::Encoding { position, source })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut indexer = self.bulk_indexer(BulkIndexerConfig::new(index));
        for item in items {
            indexer.add(item).await?;
        }
        indexer.close().await
    }

    /// Fetch the stored body of document `id` as an untyped map.
    pub async fn get_by_id(&self, index: &str, id: &str) -> Result<Map<String, Value>> {
        let response: GetResponse<Value> = self.fetch(index, id).await?;

        match response.source {
            Some(Value::Object(source)) if response.found => Ok(source),
            _ => Err(not_found(index, id)),
        }
    }

    /// Fetch document `id` and decode its stored body into `T`.
    pub async fn get_document<T: DeserializeOwned>(&self, index: &str, id: &str) -> Result<T> {
        let response: GetResponse<T> = self.fetch(index, id).await?;

        match response.source {
            Some(source) if response.found => Ok(source),
            _ => Err(not_found(index, id)),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, index: &str, id: &str) -> Result<GetResponse<T>> {
        debug!("Getting document {} from index {}", id, index);

        let response = self.client.get(GetParts::IndexId(index, id)).send().await?;

        let status = response.status_code();
        if status == StatusCode::NOT_FOUND {
            return Err(not_found(index, id));
        }
        if !status.is_success() {
            let body = error_body(response).await?;
            return Err(SearchError::engine(status.as_u16(), &body));
        }

        // Decoded straight from the text so raw JSON fields survive intact.
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            SearchError::Decode(format!("document {}/{} has an unexpected shape: {}", index, id, e))
        })
    }

    /// Documents in `index`, as returned by a `match_all` query.
    ///
    /// No `size` is sent, so the engine's default page applies (10 hits on
    /// Elasticsearch). Use [`search`](Self::search) with
    /// [`SearchBuilder::size`] and [`crate::SearchResult::total`] to page through
    /// larger indices.
    pub async fn search_all(&self, index: &str) -> Result<Vec<SearchHit>> {
        let result = self
            .search()
            .index(index)
            .query(Query::match_all())
            .execute()
            .await?;
        Ok(result.hits)
    }

    /// Run a caller-built query document against `index`.
    pub async fn search_by_dsl(&self, index: &str, body: &Value) -> Result<Vec<SearchHit>> {
        let result = self
            .search()
            .index(index)
            .raw_body(body.clone())
            .execute()
            .await?;
        Ok(result.hits)
    }

    /// Delete document `id` from `index`.
    ///
    /// A missing document is an [`SearchError::Engine`] error with the
    /// engine's `not_found` result as its reason.
    pub async fn delete_document(&self, index: &str, id: &str) -> Result<()> {
        debug!("Deleting document {} from index {}", id, index);

        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .refresh(Refresh::True)
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let body = error_body(response).await?;
            return Err(SearchError::engine(status.as_u16(), &body));
        }

        Ok(())
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("config", &self.config)
            .finish()
    }
}

/// `_doc` GET response.
#[derive(Deserialize)]
struct GetResponse<T> {
    #[serde(default)]
    found: bool,
    #[serde(rename = "_source")]
    source: Option<T>,
}

fn not_found(index: &str, id: &str) -> SearchError {
    SearchError::DocumentNotFound {
        index: index.to_string(),
        id: id.to_string(),
    }
}
