//! Create the club index with its mapping.
//!
//! ```text
//! cargo run --example create_index
//! ```

use clubsearch::prelude::*;
use clubsearch::{scenario, settings};
use clubsearch_log::info;

#[tokio::main]
async fn main() -> clubsearch::Result<()> {
    clubsearch_log::init();

    let client = scenario::connect(settings::config_path())?;
    match client.create_index(CLUB_INDEX, &club_index_settings()).await {
        Ok(()) => info!("Index {} created", CLUB_INDEX),
        Err(SearchError::IndexExists(name)) => info!("Index {} is already there", name),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
