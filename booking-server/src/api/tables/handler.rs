//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::DiningTable;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub zone: Option<String>,
}

/// GET /api/tables?zone= - 获取桌台 (按 id 升序)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<DiningTable>> {
    let tables = match query.zone {
        Some(zone) => state.inventory.tables_in_zone(&zone),
        None => state.inventory.list_tables(),
    };
    Json(tables)
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = state
        .inventory
        .get_table(id)
        .cloned()
        .ok_or_else(|| AppError::table_not_found(id))?;
    Ok(Json(table))
}
