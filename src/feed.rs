//! Deserialized view of the TfNSW alerts feed, which is the GTFS Realtime
//! `FeedMessage` delivered as JSON (camelCase field names, uint64
//! timestamps serialized as strings).

use serde::Deserialize;

use crate::error::{AlertsError, Result};

#[derive(Deserialize, Debug)]
pub struct FeedMessage {
    pub header: FeedHeader,
    #[serde(default)]
    pub entity: Vec<FeedEntity>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FeedHeader {
    pub gtfs_realtime_version: String,
    pub incrementality: String,
    pub timestamp: EpochSeconds,
}

#[derive(Deserialize, Debug)]
pub struct FeedEntity {
    pub id: String,
    pub alert: Alert,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default)]
    pub active_period: Vec<TimeRange>,
    #[serde(default)]
    pub informed_entity: Vec<EntitySelector>,
    pub cause: Option<String>,
    pub effect: Option<String>,
    pub header_text: TranslatedString,
    pub description_text: Option<TranslatedString>,
    pub url: Option<TranslatedString>,
}

/// A window during which an alert is in effect. `end` is optional; an
/// open-ended period carries only `start`.
#[derive(Deserialize, Debug)]
pub struct TimeRange {
    pub start: EpochSeconds,
    pub end: Option<EpochSeconds>,
}

/// Route/agency/direction tuple naming what an alert affects. All fields
/// are optional in the GTFS Realtime schema.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EntitySelector {
    pub agency_id: Option<String>,
    pub route_id: Option<String>,
    pub direction_id: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct TranslatedString {
    #[serde(default)]
    pub translation: Vec<Translation>,
}

#[derive(Deserialize, Debug)]
pub struct Translation {
    pub language: String,
    pub text: String,
}

/// Epoch timestamp as the feed delivers it: usually a decimal string, but
/// a plain JSON integer must decode too.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum EpochSeconds {
    Number(i64),
    Text(String),
}

impl EpochSeconds {
    pub fn seconds(&self) -> Result<i64> {
        match self {
            EpochSeconds::Number(n) => Ok(*n),
            EpochSeconds::Text(s) => s
                .parse()
                .map_err(|_| AlertsError::BadTimestamp(s.clone())),
        }
    }
}
