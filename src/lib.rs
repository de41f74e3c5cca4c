pub mod error;
pub mod feed;

pub use error::{AlertsError, Result};
pub use feed::{Alert, FeedEntity, FeedMessage, TimeRange, TranslatedString};

use chrono::DateTime;
use chrono_tz::Australia::Sydney;
use chrono_tz::Tz;
use reqwest::Client;
use std::env;
use std::fmt;
use std::str::FromStr;

pub const ENV_API_KEY: &str = "TFNSW_OPENDATA_API_KEY";

const ALERTS_API: &str = "https://api.transport.nsw.gov.au/v2/gtfs/alerts";

/// One alerts feed per transport network; the variant picks the path
/// segment of the feed URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportMode {
    Buses,
    Ferries,
    LightRail,
    Metro,
    NswTrains,
    RegionBuses,
    SydneyTrains,
}

impl TransportMode {
    pub const ALL: [TransportMode; 7] = [
        TransportMode::Buses,
        TransportMode::Ferries,
        TransportMode::LightRail,
        TransportMode::Metro,
        TransportMode::NswTrains,
        TransportMode::RegionBuses,
        TransportMode::SydneyTrains,
    ];

    /// Exact literal segment the upstream feed expects in the request path.
    pub fn path_segment(self) -> &'static str {
        match self {
            TransportMode::Buses => "buses",
            TransportMode::Ferries => "ferries",
            TransportMode::LightRail => "lightrail",
            TransportMode::Metro => "metro",
            TransportMode::NswTrains => "nswtrains",
            TransportMode::RegionBuses => "regionbuses",
            TransportMode::SydneyTrains => "sydneytrains",
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TransportMode::ALL
            .into_iter()
            .find(|mode| mode.path_segment() == s)
            .ok_or_else(|| format!("unknown transport mode {s:?}"))
    }
}

/// Reads the TfNSW Open Data API key from the environment. Fails before
/// any network I/O when the variable is unset or empty.
pub fn api_key_from_env() -> Result<String> {
    require_api_key(env::var(ENV_API_KEY).ok())
}

pub fn require_api_key(value: Option<String>) -> Result<String> {
    match value {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(AlertsError::MissingApiKey(ENV_API_KEY)),
    }
}

/// Fetches the current service alerts for one transport mode from the
/// production feed, authenticating with the key from the environment.
pub async fn fetch_alerts(mode: TransportMode) -> Result<FeedMessage> {
    let api_key = api_key_from_env()?;
    fetch_alerts_from(ALERTS_API, &api_key, mode).await
}

/// Same as [`fetch_alerts`] but with the feed base URL and API key
/// injected, so tests can point it at a local server.
pub async fn fetch_alerts_from(
    base: &str,
    api_key: &str,
    mode: TransportMode,
) -> Result<FeedMessage> {
    let client = Client::new();

    let url = format!("{}/{}?format=json", base, mode.path_segment());
    let resp = client
        .get(&url)
        .header("authorization", format!("apikey {api_key}"))
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        // Surface the raw body for operator debugging before failing.
        eprintln!("{body}");
        return Err(AlertsError::Upstream { status, body });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Projection of one alert entity: its first declared active window in
/// Sydney local time and its English headline. Either may be absent.
#[derive(Debug)]
pub struct AlertSummary {
    pub active_period: Option<(DateTime<Tz>, DateTime<Tz>)>,
    pub headline: Option<String>,
}

impl fmt::Display for AlertSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.active_period {
            Some((start, end)) => write!(
                f,
                "{} -> {}",
                start.format("%Y-%m-%d %H:%M:%S %Z"),
                end.format("%Y-%m-%d %H:%M:%S %Z")
            )?,
            None => f.write_str("(no active period)")?,
        }
        match &self.headline {
            Some(headline) => write!(f, " | {headline}"),
            None => f.write_str(" | (no English headline)"),
        }
    }
}

/// Walks the feed's entities in document order and summarises each alert.
/// A timestamp that cannot be read as epoch seconds fails the whole batch.
pub fn project_alerts(feed: &FeedMessage) -> Result<Vec<AlertSummary>> {
    feed.entity
        .iter()
        .map(|entity| {
            Ok(AlertSummary {
                active_period: active_period(&entity.alert)?,
                headline: english_text(&entity.alert.header_text).map(str::to_owned),
            })
        })
        .collect()
}

/// First `activePeriod` entry converted to Sydney local time. An alert
/// without any declared period yields `None`. A period without an `end`
/// collapses to a zero-width window at `start`.
pub fn active_period(alert: &Alert) -> Result<Option<(DateTime<Tz>, DateTime<Tz>)>> {
    let Some(period) = alert.active_period.first() else {
        return Ok(None);
    };

    let start = period.start.seconds()?;
    let end = match &period.end {
        Some(end) => end.seconds()?,
        None => start,
    };

    Ok(Some((to_sydney(start)?, to_sydney(end)?)))
}

fn to_sydney(epoch: i64) -> Result<DateTime<Tz>> {
    DateTime::from_timestamp(epoch, 0)
        .map(|utc| utc.with_timezone(&Sydney))
        .ok_or_else(|| AlertsError::BadTimestamp(epoch.to_string()))
}

/// Text of the first translation tagged exactly `"en"`, if any.
pub fn english_text(text: &TranslatedString) -> Option<&str> {
    text.translation
        .iter()
        .find(|t| t.language == "en")
        .map(|t| t.text.as_str())
}
