//! clubsearch - club information records in an Elasticsearch-compatible engine.
//!
//! The library holds the document model, the application settings and the
//! startup scenario run by the `clubsearch` binary. Engine access lives in
//! [`clubsearch_engine`], re-exported here as [`engine`].
//!
//! # Example
//!
//! ```rust,no_run
//! use clubsearch::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> clubsearch::Result<()> {
//!     let settings = AppConfig::load("config.yaml")?;
//!     let client = SearchClient::connect(settings.search_config())?;
//!
//!     let club = ClubInfo::new("1", "Alice").club_type("football3");
//!     client.insert_document(CLUB_INDEX, &club).await?;
//!
//!     let stored: ClubInfo = client.get_document(CLUB_INDEX, "1").await?;
//!     assert_eq!(stored.club_name, "Alice");
//!     Ok(())
//! }
//! ```

pub mod club;
pub mod error;
pub mod scenario;
pub mod settings;

pub use club::{
    CLUB_INDEX, ClubInfo, MatchStatus, club_index_settings, club_mapping, sample_clubs,
};
pub use error::{Error, Result};
pub use settings::{AppConfig, EngineSettings};

pub use clubsearch_engine as engine;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::club::{CLUB_INDEX, ClubInfo, MatchStatus, club_index_settings, sample_clubs};
    pub use crate::error::{Error, Result};
    pub use crate::settings::AppConfig;
    pub use clubsearch_engine::{Document, Query, SearchClient, SearchError, SearchHit};
}
