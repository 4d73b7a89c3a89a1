//! Club information documents.
//!
//! [`ClubInfo`] is the record stored in the [`CLUB_INDEX`] index. Its JSON
//! field names match the mapping returned by [`club_index_settings`].

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use clubsearch_engine::{Document, IndexSettings, Mapping, MappingField};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Index holding club information documents.
pub const CLUB_INDEX: &str = "idx-itsm-club-info";

const INDEX_ANALYZER: &str = "ik_max_word";
const SEARCH_ANALYZER: &str = "ik_smart";

/// A club information record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubInfo {
    /// Unique club id, also used as the document id.
    pub club_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub club_name: String,
    pub created_by: String,
    pub club_type: String,
    /// Current standing.
    pub match_status: MatchStatus,
    /// Past standings, oldest first.
    #[serde(default)]
    pub history: Vec<MatchStatus>,
}

impl ClubInfo {
    /// New club created now, with a zero standing and a `null` payload.
    pub fn new(club_id: impl Into<String>, club_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            club_id: club_id.into(),
            created_at: now,
            updated_at: None,
            deleted_at: None,
            club_name: club_name.into(),
            created_by: String::new(),
            club_type: String::new(),
            match_status: MatchStatus::empty(now),
            history: Vec::new(),
        }
    }

    pub fn created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }

    pub fn club_type(mut self, club_type: impl Into<String>) -> Self {
        self.club_type = club_type.into();
        self
    }

    pub fn match_status(mut self, status: MatchStatus) -> Self {
        self.match_status = status;
        self
    }

    /// Append a past standing.
    pub fn push_history(mut self, status: MatchStatus) -> Self {
        self.history.push(status);
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Mark the club as deleted. Nothing filters on this marker.
    pub fn deleted_at(mut self, at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(at);
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Document for ClubInfo {
    fn document_id(&self) -> Option<String> {
        Some(self.club_id.clone())
    }

    fn to_source(&self) -> serde_json::Result<Box<RawValue>> {
        serde_json::value::to_raw_value(self)
    }
}

/// A club's standing at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchStatus {
    pub rank: i32,
    pub point: i32,
    pub year: DateTime<Utc>,
    /// Schema-less payload, kept exactly as written.
    pub raw: Box<RawValue>,
    #[serde(default)]
    pub remark: String,
}

impl MatchStatus {
    /// Standing with `raw_json` as its payload.
    ///
    /// Fails with [`Error::InvalidRaw`] if `raw_json` is not well-formed JSON.
    pub fn new(
        rank: i32,
        point: i32,
        year: DateTime<Utc>,
        raw_json: impl Into<String>,
    ) -> Result<Self> {
        let raw = RawValue::from_string(raw_json.into()).map_err(Error::InvalidRaw)?;
        Ok(Self {
            rank,
            point,
            year,
            raw,
            remark: String::new(),
        })
    }

    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }

    fn empty(year: DateTime<Utc>) -> Self {
        Self {
            rank: 0,
            point: 0,
            year,
            raw: RawValue::NULL.to_owned(),
            remark: String::new(),
        }
    }
}

// Raw payloads compare by their exact text.
impl PartialEq for MatchStatus {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank
            && self.point == other.point
            && self.year == other.year
            && self.raw.get() == other.raw.get()
            && self.remark == other.remark
    }
}

fn match_status_field(base: MappingField) -> MappingField {
    base.property("rank", MappingField::integer())
        .property("point", MappingField::integer())
        .property("year", MappingField::date())
        .property("raw", MappingField::object())
        .property(
            "remark",
            MappingField::text()
                .analyzer(INDEX_ANALYZER)
                .search_analyzer(SEARCH_ANALYZER),
        )
}

/// Field mapping of [`ClubInfo`].
pub fn club_mapping() -> Mapping {
    Mapping::new()
        .field("club_id", MappingField::keyword())
        .field("created_at", MappingField::date())
        .field("updated_at", MappingField::date())
        .field("deleted_at", MappingField::date())
        .field(
            "club_name",
            MappingField::text()
                .analyzer(INDEX_ANALYZER)
                .search_analyzer(SEARCH_ANALYZER),
        )
        .field("created_by", MappingField::keyword())
        .field("club_type", MappingField::keyword())
        .field("match_status", match_status_field(MappingField::object()))
        .field("history", match_status_field(MappingField::nested()))
}

/// Settings sent when creating [`CLUB_INDEX`].
pub fn club_index_settings() -> IndexSettings {
    IndexSettings::new().mappings(club_mapping())
}

/// Demo clubs with ids `"1"..="N"`, one per name, in order.
pub fn sample_clubs(names: &[&str]) -> Result<Vec<ClubInfo>> {
    let now = Utc::now();
    let last_month = now - chrono::Duration::days(30);

    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let current = MatchStatus::new(1, 100, now, r#"{"key1": "value1","key2": "value2"}"#)?
                .remark("Great performance");
            let previous =
                MatchStatus::new(2, 90, last_month, r#"{"key1": "hello world","key3": "value3"}"#)?
                    .remark("Previous match");

            Ok(ClubInfo::new((i + 1).to_string(), *name)
                .created_by("xiaoming3")
                .club_type("football3")
                .match_status(current)
                .push_history(previous))
        })
        .collect()
}
