//! Error types for search engine operations.

use opensearch::http::response::Response;
use serde_json::{json, Value};
use thiserror::Error;

/// Search engine error type.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The engine cannot be reached, or the connection settings are unusable.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Index creation conflicted with an existing index.
    #[error("Index already exists: {0}")]
    IndexExists(String),

    /// Index not found.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Document not found, or the response carried no `_source`.
    #[error("Document not found: {index}/{id}")]
    DocumentNotFound {
        /// Index name.
        index: String,
        /// Document ID.
        id: String,
    },

    /// The engine answered with a non-success status.
    #[error("Engine error ({status}): {reason}")]
    Engine {
        /// HTTP status code, `0` when the failure was not tied to a status.
        status: u16,
        /// Reason reported by the engine.
        reason: String,
    },

    /// A document could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A bulk document could not be encoded; the batch was not sent.
    #[error("Encoding error for bulk document {position}: {source}")]
    Encoding {
        /// Zero-based position of the document in the batch.
        position: usize,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// A response did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid input rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request could not be completed by the client library.
    #[error("Client error: {0}")]
    Client(#[from] opensearch::Error),
}

impl SearchError {
    /// Build an [`SearchError::Engine`] from a status and an error body.
    pub(crate) fn engine(status: u16, body: &Value) -> Self {
        SearchError::Engine {
            status,
            reason: error_reason(body),
        }
    }
}

/// Extract the human-readable reason from an engine error body.
pub(crate) fn error_reason(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("reason").or(Some(e)))
        .and_then(|r| r.as_str())
        .or_else(|| body.get("result").and_then(|r| r.as_str()))
        .unwrap_or("Unknown error")
        .to_string()
}

/// Read the body of a failed response.
///
/// Bodies that are not JSON are wrapped as `{"error": "<text>"}` so the
/// reason still reaches the caller.
pub(crate) async fn error_body(response: Response) -> Result<Value> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text).unwrap_or_else(|_| json!({ "error": text })))
}

/// Error `type` reported by the engine, if any.
pub(crate) fn error_type(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(|e| e.get("type"))
        .and_then(|t| t.as_str())
}

/// Result type alias for search engine operations.
pub type Result<T> = std::result::Result<T, SearchError>;
