//! Reservation Model

use crate::reservation::{ReservationStatus, serde_hhmm};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Reservation entity (预订)
///
/// `(table_id, date, time)` is the occupancy key. At most one reservation per
/// key is active (pending or confirmed) at any time, except after a reopen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub customer_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub party_count: i32,
    pub zone: String,
    pub table_id: i64,
    pub date: NaiveDate,
    #[serde(with = "serde_hhmm")]
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: ReservationStatus,
    /// Actor who confirmed the reservation (set on pending → confirmed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<i64>,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

impl Reservation {
    /// Whether this reservation currently occupies its table slot
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
