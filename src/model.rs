use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a listing, as tracked by the backend.
///
/// The wire labels are the backend's French values; anything else found in
/// stored data is treated as [`PropertyStatus::Available`] when editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyStatus {
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "contacté")]
    Contacted,
    #[serde(rename = "visité")]
    Visited,
    #[serde(rename = "rejeté")]
    Rejected,
    #[serde(rename = "acheté")]
    Purchased,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 5] = [
        PropertyStatus::Available,
        PropertyStatus::Contacted,
        PropertyStatus::Visited,
        PropertyStatus::Rejected,
        PropertyStatus::Purchased,
    ];

    /// Wire label sent to and received from the backend.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "disponible",
            PropertyStatus::Contacted => "contacté",
            PropertyStatus::Visited => "visité",
            PropertyStatus::Rejected => "rejeté",
            PropertyStatus::Purchased => "acheté",
        }
    }

    /// Strict parse: only the exact wire labels are accepted.
    pub fn parse(value: &str) -> Option<PropertyStatus> {
        Self::ALL.iter().copied().find(|s| s.label() == value)
    }

    /// Lenient parse for stored data: unknown values fall back to Available.
    pub fn coerce(value: Option<&str>) -> PropertyStatus {
        value
            .and_then(Self::parse)
            .unwrap_or(PropertyStatus::Available)
    }
}

impl std::fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A scraped listing as returned by the search and property endpoints.
///
/// Every field except the id may be missing or null in stored rows; the
/// renderer substitutes a fallback per field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub surface: Option<f64>,
    #[serde(default)]
    pub dpe: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub posted_date: Option<NaiveDate>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Property {
    /// Status used when editing: stored value coerced into the closed set.
    pub fn editing_status(&self) -> PropertyStatus {
        PropertyStatus::coerce(self.status.as_deref())
    }
}

/// Dates in stored rows come back as "YYYY-MM-DD" or a full timestamp;
/// anything unparsable is treated as absent rather than failing the row.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// A registered scraping source, managed through the sites view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub url: String,
    pub timeout: u64,
    pub enabled: bool,
}

/// Scheduler preferences, persisted locally (see `store`), never sent to the
/// backend by this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub interval: i64,
    #[serde(rename = "reportTime")]
    pub report_time: String,
    pub notifications: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: 2,
            report_time: "12:00".to_string(),
            notifications: true,
        }
    }
}

/// Ephemeral scheduler state, refreshed by the poller and never cached.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulerStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub last_run: String,
    #[serde(default)]
    pub next_run: String,
}

/// Search criteria, built fresh for every submission. Empty strings mean
/// "no filter" and are passed through unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchFilters {
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub dpe_max: String,
    pub location: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_french_labels() {
        for status in PropertyStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            let back: PropertyStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
        assert_eq!(
            serde_json::to_string(&PropertyStatus::Contacted).unwrap(),
            "\"contacté\""
        );
    }

    #[test]
    fn unknown_status_coerces_to_available() {
        assert_eq!(
            PropertyStatus::coerce(Some("vendu")),
            PropertyStatus::Available
        );
        assert_eq!(PropertyStatus::coerce(None), PropertyStatus::Available);
        assert_eq!(
            PropertyStatus::coerce(Some("visité")),
            PropertyStatus::Visited
        );
    }

    #[test]
    fn property_tolerates_missing_fields() {
        let prop: Property = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert!(prop.title.is_none());
        assert!(prop.price.is_none());
        assert_eq!(prop.editing_status(), PropertyStatus::Available);
    }

    #[test]
    fn posted_date_parses_date_and_timestamp_forms() {
        let prop: Property =
            serde_json::from_str(r#"{"id": "a", "posted_date": "2024-03-01"}"#).unwrap();
        assert_eq!(
            prop.posted_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );

        let prop: Property =
            serde_json::from_str(r#"{"id": "b", "posted_date": "2024-03-01 08:30:00"}"#).unwrap();
        assert_eq!(
            prop.posted_date,
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );

        let prop: Property =
            serde_json::from_str(r#"{"id": "c", "posted_date": "hier"}"#).unwrap();
        assert!(prop.posted_date.is_none());
    }

    #[test]
    fn filters_serialize_null_bounds() {
        let filters = SearchFilters {
            price_min: None,
            price_max: Some(200_000),
            dpe_max: "C".to_string(),
            location: String::new(),
            status: String::new(),
        };
        let value = serde_json::to_value(&filters).unwrap();
        assert!(value["price_min"].is_null());
        assert_eq!(value["price_max"], 200_000);
        assert_eq!(value["location"], "");
    }
}
