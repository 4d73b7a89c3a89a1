//! List every club in the index.

use clubsearch::prelude::*;
use clubsearch::{scenario, settings};
use clubsearch_log::info;

#[tokio::main]
async fn main() -> clubsearch::Result<()> {
    clubsearch_log::init();

    let client = scenario::connect(settings::config_path())?;

    for hit in client.search_all(CLUB_INDEX).await? {
        info!(" * ID={}, {}", hit.id, serde_json::Value::Object(hit.source));
    }
    info!("Search completed");
    Ok(())
}
