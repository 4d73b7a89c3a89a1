//! Delete club 3.

use clubsearch::prelude::*;
use clubsearch::{scenario, settings};
use clubsearch_log::info;

#[tokio::main]
async fn main() -> clubsearch::Result<()> {
    clubsearch_log::init();

    let client = scenario::connect(settings::config_path())?;
    client.delete_document(CLUB_INDEX, "3").await?;
    info!("Club 3 deleted");
    Ok(())
}
