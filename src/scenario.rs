//! Startup scenario run by the `clubsearch` binary.

use crate::club::{CLUB_INDEX, sample_clubs};
use crate::error::Result;
use crate::settings::AppConfig;
use clubsearch_engine::{BulkIndexerStats, Document, SearchClient};
use clubsearch_log::info;
use std::path::Path;

/// Names of the demo clubs, stored under ids `"1"`, `"2"` and `"3"`.
pub const SAMPLE_NAMES: [&str; 3] = ["Alice", "John", "Mary"];

/// Load settings from `path` and build a client from them.
pub fn connect(path: impl AsRef<Path>) -> Result<SearchClient> {
    let settings = AppConfig::load(path)?;
    let client = SearchClient::connect(settings.search_config())?;
    info!("Search engine client created");
    Ok(client)
}

/// Ping the engine, delete club `"3"` and bulk-insert the demo clubs.
///
/// Steps run in order and the first failure stops the scenario.
pub async fn run(client: &SearchClient) -> Result<BulkIndexerStats> {
    let info = client.ping().await?;
    info!("Connected to search engine: {}", info);

    client.delete_document(CLUB_INDEX, "3").await?;
    info!("Deleted club 3 from {}", CLUB_INDEX);

    let clubs = sample_clubs(&SAMPLE_NAMES)?;
    let docs: Vec<&dyn Document> = clubs.iter().map(|c| c as &dyn Document).collect();
    let stats = client.bulk_insert(CLUB_INDEX, &docs).await?;

    info!(
        "Bulk insert finished: {} indexed, {} failed",
        stats.num_indexed, stats.num_failed
    );
    Ok(stats)
}
