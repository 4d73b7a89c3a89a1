//! Search engine gateway for clubsearch.
//!
//! A typed client over an Elasticsearch-compatible REST API:
//! - Document insert, fetch and delete
//! - Index lifecycle management with declarative mappings
//! - Buffered bulk indexing
//! - Match-all, query-builder and raw query-DSL search
//!
//! # Example
//!
//! ```rust,no_run
//! use clubsearch_engine::{Document, Query, SearchClient, SearchConfig};
//! use serde::Serialize;
//! use serde_json::value::RawValue;
//!
//! #[derive(Serialize)]
//! struct Article {
//!     id: String,
//!     title: String,
//! }
//!
//! impl Document for Article {
//!     fn document_id(&self) -> Option<String> {
//!         Some(self.id.clone())
//!     }
//!
//!     fn to_source(&self) -> serde_json::Result<Box<RawValue>> {
//!         serde_json::value::to_raw_value(self)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SearchConfig::new("http://localhost:9200");
//!     let client = SearchClient::connect(config)?;
//!     println!("{}", client.ping().await?);
//!
//!     let article = Article {
//!         id: "article-1".to_string(),
//!         title: "Hello search".to_string(),
//!     };
//!     client.insert_document("articles", &article).await?;
//!
//!     let result = client
//!         .search()
//!         .index("articles")
//!         .query(Query::matches("title", "hello"))
//!         .size(10)
//!         .execute()
//!         .await?;
//!     println!("{} hits", result.total);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bulk;
mod client;
mod config;
mod document;
mod error;
mod index;
mod query;
mod search;

pub use bulk::{
    BulkAction, BulkIndexer, BulkIndexerConfig, BulkIndexerStats, BulkItem, DEFAULT_FLUSH_BYTES,
    DEFAULT_FLUSH_ITEMS,
};
pub use client::SearchClient;
pub use config::SearchConfig;
pub use document::Document;
pub use error::{Result, SearchError};
pub use index::{FieldType, IndexManager, IndexSettings, Mapping, MappingField};
pub use query::{BoolQuery, MatchQuery, Query, RangeQuery};
pub use search::{SearchBuilder, SearchHit, SearchResult, SortOrder};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::bulk::{BulkIndexerConfig, BulkIndexerStats};
    pub use crate::client::SearchClient;
    pub use crate::config::SearchConfig;
    pub use crate::document::Document;
    pub use crate::error::{Result, SearchError};
    pub use crate::index::{IndexSettings, Mapping, MappingField};
    pub use crate::query::Query;
    pub use crate::search::SearchHit;
}
