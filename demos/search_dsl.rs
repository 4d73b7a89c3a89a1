//! Search clubs created in the last six hours whose name matches "Mary".

use chrono::{Duration, SecondsFormat, Utc};
use clubsearch::prelude::*;
use clubsearch::{scenario, settings};
use clubsearch_engine::{BoolQuery, RangeQuery};
use clubsearch_log::info;

#[tokio::main]
async fn main() -> clubsearch::Result<()> {
    clubsearch_log::init();

    let client = scenario::connect(settings::config_path())?;

    let now = Utc::now();
    let since = now - Duration::hours(6);
    let query: Query = BoolQuery::new()
        .must(
            RangeQuery::new("created_at")
                .gte(since.to_rfc3339_opts(SecondsFormat::Millis, true))
                .lte(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        )
        .must(Query::matches("club_name", "Mary"))
        .into();

    let hits = client.search_by_dsl(CLUB_INDEX, &query.to_body()).await?;
    for hit in &hits {
        let club: ClubInfo = hit.decode()?;
        info!(" * ID={}, score {:?}, {}", hit.id, hit.score, club.club_name);
    }
    info!("{} matching clubs", hits.len());
    Ok(())
}
