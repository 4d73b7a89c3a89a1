//! Bulk-insert the demo clubs.

use clubsearch::prelude::*;
use clubsearch::scenario::SAMPLE_NAMES;
use clubsearch::{scenario, settings};
use clubsearch_log::info;

#[tokio::main]
async fn main() -> clubsearch::Result<()> {
    clubsearch_log::init();

    let client = scenario::connect(settings::config_path())?;

    let clubs = sample_clubs(&SAMPLE_NAMES)?;
    let docs: Vec<&dyn Document> = clubs.iter().map(|c| c as &dyn Document).collect();
    let stats = client.bulk_insert(CLUB_INDEX, &docs).await?;

    info!(
        "Bulk insert: {} added, {} indexed, {} failed in {} requests",
        stats.num_added, stats.num_indexed, stats.num_failed, stats.num_requests
    );
    Ok(())
}
