//! Reservation API Handlers
//!
//! Ledger writes are synchronous (slot lock + redb commit), so they run on
//! the blocking pool.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::models::Reservation;
use shared::reservation::{ReservationCreate, ReservationFilter, ReservationStatus, StatusChange};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::reservations::{ManagerResult, ReservationManager};
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub status: Option<String>,
    pub table_id: Option<i64>,
}

impl ListQuery {
    fn into_filter(self) -> AppResult<ReservationFilter> {
        let date = self.date.as_deref().map(parse_date).transpose()?;
        let status = self
            .status
            .as_deref()
            .map(|s| {
                s.parse::<ReservationStatus>()
                    .map_err(|e| AppError::validation(e.to_string()))
            })
            .transpose()?;
        Ok(ReservationFilter {
            date,
            status,
            table_id: self.table_id,
        })
    }
}

/// 在阻塞线程池上执行账本操作
async fn run_ledger<T, F>(state: &ServerState, op: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&ReservationManager) -> ManagerResult<T> + Send + 'static,
{
    let manager = state.reservations.clone();
    tokio::task::spawn_blocking(move || op(&manager))
        .await
        .map_err(|e| AppError::internal(format!("Ledger task failed: {}", e)))?
        .map_err(AppError::from)
}

/// POST /api/reservations - 创建预订 (pending)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    let reservation = run_ledger(&state, move |m| m.create(payload)).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// GET /api/reservations?date=&status=&table_id= - 预订列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let filter = query.into_filter()?;
    let reservations = state.reservations.list(&filter)?;
    Ok(Json(reservations))
}

/// GET /api/reservations/{id} - 预订详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.reservations.get(id)?))
}

/// PUT /api/reservations/{id}/status - 确认 / 取消 / 重开
pub async fn change_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StatusChange>,
) -> AppResult<Json<Reservation>> {
    let actor_id = current_user.id;
    let reservation =
        run_ledger(&state, move |m| m.change_status(id, payload.status, actor_id)).await?;
    Ok(Json(reservation))
}

/// DELETE /api/reservations/{id} - 物理删除
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let actor_id = current_user.id;
    let removed = run_ledger(&state, move |m| m.remove(id, Some(actor_id))).await?;
    Ok(Json(removed))
}
