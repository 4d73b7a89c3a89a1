//! Search builder and results.

use crate::error::{error_body, Result, SearchError};
use crate::query::Query;
use clubsearch_log::debug;
use opensearch::{OpenSearch, SearchParts};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Search builder for constructing and executing searches.
#[derive(Clone)]
pub struct SearchBuilder {
    client: Arc<OpenSearch>,
    indices: Vec<String>,
    query: Option<Value>,
    raw_body: Option<Value>,
    from: Option<u64>,
    size: Option<u64>,
    sort: Vec<Value>,
}

impl SearchBuilder {
    pub(crate) fn new(client: Arc<OpenSearch>) -> Self {
        Self {
            client,
            indices: Vec::new(),
            query: None,
            raw_body: None,
            from: None,
            size: None,
            sort: Vec::new(),
        }
    }

    /// Add an index to search.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    /// Set the query clause.
    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query.to_json());
        self
    }

    /// Send `body` as the complete request body.
    ///
    /// The body is passed through untouched; query, paging and sort settings
    /// on the builder are ignored.
    pub fn raw_body(mut self, body: Value) -> Self {
        self.raw_body = Some(body);
        self
    }

    /// Set pagination offset.
    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Set result size limit.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add a sort field.
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        let field: String = field.into();
        self.sort.push(json!({ field: { "order": order.as_str() } }));
        self
    }

    /// Request body as sent to the engine.
    pub fn build_body(&self) -> Value {
        if let Some(body) = &self.raw_body {
            return body.clone();
        }

        let mut body = Map::new();
        if let Some(query) = &self.query {
            body.insert("query".to_string(), query.clone());
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        if !self.sort.is_empty() {
            body.insert("sort".to_string(), Value::Array(self.sort.clone()));
        }
        Value::Object(body)
    }

    /// Execute the search.
    pub async fn execute(self) -> Result<SearchResult> {
        if self.indices.is_empty() {
            return Err(SearchError::Validation(
                "search needs at least one index".to_string(),
            ));
        }

        debug!("Searching indices: {:?}", self.indices);

        let index_refs: Vec<&str> = self.indices.iter().map(String::as_str).collect();
        let body = self.build_body();

        let response = self
            .client
            .search(SearchParts::Index(&index_refs))
            .body(body)
            .send()
            .await?;

        let status = response.status_code();
        if !status.is_success() {
            let body = error_body(response).await?;
            return Err(SearchError::engine(status.as_u16(), &body));
        }

        // Hit bodies are cut from the text as-is so raw JSON fields survive.
        let text = response.text().await?;
        SearchResult::from_response(status.as_u16(), &text)
    }
}

/// Sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Search result.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Total matching documents.
    pub total: u64,
    /// Maximum score.
    pub max_score: Option<f64>,
    /// Time taken in milliseconds.
    pub took_ms: u64,
    /// Returned hits, in engine order.
    pub hits: Vec<SearchHit>,
}

impl SearchResult {
    /// Decode a `_search` response body.
    pub(crate) fn from_response(status: u16, text: &str) -> Result<Self> {
        let response: SearchResponse = serde_json::from_str(text)
            .map_err(|e| SearchError::Decode(format!("malformed search response: {}", e)))?;

        let hits = response.hits.ok_or_else(|| SearchError::Engine {
            status,
            reason: "no 'hits' field in the response".to_string(),
        })?;
        let hit_list = hits
            .hits
            .ok_or_else(|| SearchError::Decode("no 'hits.hits' array in the response".to_string()))?;
        let hits_vec = hit_list
            .into_iter()
            .map(SearchHit::from_raw)
            .collect::<Result<Vec<_>>>()?;

        // `hits.total` is an object on current engines and a bare number on old ones.
        let total = hits
            .total
            .as_ref()
            .and_then(|t| t["value"].as_u64().or_else(|| t.as_u64()))
            .unwrap_or(hits_vec.len() as u64);

        Ok(Self {
            total,
            max_score: hits.max_score,
            took_ms: response.took.unwrap_or(0),
            hits: hits_vec,
        })
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    took: Option<u64>,
    #[serde(default)]
    hits: Option<HitsEnvelope>,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<Value>,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(default)]
    hits: Option<Vec<RawHit>>,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_index", default)]
    index: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source", default)]
    source: Option<Box<RawValue>>,
}

/// A single search hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Document ID.
    pub id: String,
    /// Index the document lives in.
    pub index: String,
    /// Relevance score; absent when sorting by field.
    pub score: Option<f64>,
    /// Stored document body, untyped.
    pub source: Map<String, Value>,
    raw_source: Box<RawValue>,
}

impl SearchHit {
    fn from_raw(hit: RawHit) -> Result<Self> {
        let raw_source = match hit.source {
            Some(raw) => raw,
            None => RawValue::from_string("{}".to_string())?,
        };
        let source = serde_json::from_str(raw_source.get()).map_err(|e| {
            SearchError::Decode(format!("hit {} has a non-object source: {}", hit.id, e))
        })?;

        Ok(Self {
            id: hit.id,
            index: hit.index,
            score: hit.score,
            source,
            raw_source,
        })
    }

    /// Stored document body exactly as the engine returned it.
    pub fn raw_source(&self) -> &RawValue {
        &self.raw_source
    }

    /// Decode the stored body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(self.raw_source.get()).map_err(|e| {
            SearchError::Decode(format!("hit {} does not match the expected shape: {}", self.id, e))
        })
    }
}
