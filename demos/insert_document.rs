//! Insert one club, replacing any club with the same id.

use chrono::{Duration, Utc};
use clubsearch::prelude::*;
use clubsearch::{scenario, settings};
use clubsearch_log::info;

#[tokio::main]
async fn main() -> clubsearch::Result<()> {
    clubsearch_log::init();

    let client = scenario::connect(settings::config_path())?;

    let now = Utc::now();
    let club = ClubInfo::new("3", "测试俱乐部3")
        .created_by("xiaoming3")
        .club_type("football3")
        .match_status(
            MatchStatus::new(1, 100, now, r#"{"key1": "value1","key2": "value2"}"#)?
                .remark("Great performance"),
        )
        .push_history(
            MatchStatus::new(
                2,
                90,
                now - Duration::days(30),
                r#"{"key1": "hello world","key3": "value3"}"#,
            )?
            .remark("Previous match"),
        );

    let id = client.insert_document(CLUB_INDEX, &club).await?;
    info!("Club stored under id {}", id);
    Ok(())
}
