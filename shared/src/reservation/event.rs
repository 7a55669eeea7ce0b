//! Reservation events - emitted after a change has been committed

use super::{ReservationStatus, serde_hhmm};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// What happened to the reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationEventKind {
    Created,
    StatusChanged,
    Deleted,
}

/// Notification payload handed to dispatchers
///
/// Always built from committed state; a dispatcher never sees an event for a
/// change that was rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationEvent {
    pub kind: ReservationEventKind,
    pub reservation_id: i64,
    pub table_id: i64,
    pub date: NaiveDate,
    #[serde(with = "serde_hhmm")]
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_status: Option<ReservationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<ReservationStatus>,
    /// Actor who triggered the change (absent for public creation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<i64>,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
}
