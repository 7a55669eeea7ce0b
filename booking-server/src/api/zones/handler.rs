//! Zone API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, Zone};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/zones - 获取所有区域
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Zone>> {
    Json(state.inventory.list_zones().to_vec())
}

/// GET /api/zones/{name}/tables - 获取区域内桌台
pub async fn list_tables(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Json<Vec<DiningTable>>> {
    if !state.inventory.has_zone(&name) {
        return Err(AppError::zone_not_found(&name));
    }
    Ok(Json(state.inventory.tables_in_zone(&name)))
}
