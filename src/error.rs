//! Application error type.

use clubsearch_config::ConfigError;
use clubsearch_engine::SearchError;
use thiserror::Error;

/// Errors surfaced by the clubsearch library and binary.
#[derive(Error, Debug)]
pub enum Error {
    /// Settings could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A search engine operation failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// A raw match-status payload is not well-formed JSON.
    #[error("Invalid raw payload: {0}")]
    InvalidRaw(#[source] serde_json::Error),
}

/// Result type alias for clubsearch operations.
pub type Result<T> = std::result::Result<T, Error>;
