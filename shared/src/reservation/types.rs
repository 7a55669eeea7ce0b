//! Request payloads and serde helpers

use super::ReservationStatus;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub party_count: i32,
    pub zone: String,
    pub table_id: i64,
    pub date: NaiveDate,
    #[serde(with = "serde_hhmm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub note: Option<String>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ReservationStatus,
}

/// Administrative listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationFilter {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ReservationStatus>,
    #[serde(default)]
    pub table_id: Option<i64>,
}

impl ReservationFilter {
    pub fn matches(&self, r: &crate::models::Reservation) -> bool {
        self.date.is_none_or(|d| r.date == d)
            && self.status.is_none_or(|s| r.status == s)
            && self.table_id.is_none_or(|t| r.table_id == t)
    }
}

/// `HH:MM` wire format for slot times
///
/// Accepts `HH:MM:SS` on input as well; seconds are dropped when serializing.
pub mod serde_hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    /// Parse `HH:MM` (or `HH:MM:SS`)
    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    }
}
