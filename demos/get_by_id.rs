//! Fetch club 3, untyped and typed.

use clubsearch::prelude::*;
use clubsearch::{scenario, settings};
use clubsearch_log::info;

#[tokio::main]
async fn main() -> clubsearch::Result<()> {
    clubsearch_log::init();

    let client = scenario::connect(settings::config_path())?;

    let source = client.get_by_id(CLUB_INDEX, "3").await?;
    info!("Document retrieved: {}", serde_json::Value::Object(source));

    let club: ClubInfo = client.get_document(CLUB_INDEX, "3").await?;
    info!(
        "Club {} ({}), rank {}, raw {}",
        club.club_name,
        club.club_type,
        club.match_status.rank,
        club.match_status.raw.get()
    );
    Ok(())
}
