//! Availability API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use shared::models::DiningTable;
use shared::reservation::serde_hhmm;

use crate::core::ServerState;
use crate::reservations::ReservationError;
use crate::utils::time::{parse_date, parse_time};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
    pub zone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(serialize_with = "serialize_times")]
    pub slots: Vec<NaiveTime>,
}

#[derive(Debug, Deserialize)]
pub struct TablesQuery {
    pub date: String,
    pub time: String,
    pub zone: String,
    pub party_count: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub date: NaiveDate,
    #[serde(with = "serde_hhmm")]
    pub time: NaiveTime,
    pub zone: String,
    /// Free table ids, ascending
    pub table_ids: Vec<i64>,
    pub tables: Vec<DiningTable>,
}

fn serialize_times<S: serde::Serializer>(times: &[NaiveTime], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(times.iter().map(|t| t.format(serde_hhmm::FORMAT).to_string()))
}

fn ensure_zone(state: &ServerState, zone: &str) -> AppResult<()> {
    if state.inventory.has_zone(zone) {
        Ok(())
    } else {
        Err(AppError::zone_not_found(zone))
    }
}

/// GET /api/availability/slots - 有空桌的时段 (按时间顺序)
pub async fn slots(
    State(state): State<ServerState>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<SlotsResponse>> {
    let date = parse_date(&query.date)?;

    let slots = match &query.zone {
        Some(zone) => {
            ensure_zone(&state, zone)?;
            state.availability.available_slots_in_zone(date, zone)
        }
        None => state.availability.available_slots(date),
    }
    .map_err(ReservationError::from)?;

    Ok(Json(SlotsResponse {
        date,
        zone: query.zone,
        slots,
    }))
}

/// GET /api/availability/tables - 某时段某区域的空桌 (按 id 升序)
pub async fn tables(
    State(state): State<ServerState>,
    Query(query): Query<TablesQuery>,
) -> AppResult<Json<TablesResponse>> {
    let date = parse_date(&query.date)?;
    let time = parse_time(&query.time)?;
    ensure_zone(&state, &query.zone)?;

    let tables = match query.party_count {
        Some(party_count) => state
            .availability
            .available_tables_for_party(date, time, &query.zone, party_count),
        None => state
            .availability
            .available_tables(date, time, &query.zone)
            .map(|ids| {
                ids.into_iter()
                    .filter_map(|id| state.inventory.get_table(id).cloned())
                    .collect()
            }),
    }
    .map_err(ReservationError::from)?;

    Ok(Json(TablesResponse {
        date,
        time,
        zone: query.zone,
        table_ids: tables.iter().map(|t| t.id).collect(),
        tables,
    }))
}
