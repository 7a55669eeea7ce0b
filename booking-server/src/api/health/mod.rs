//! 健康检查路由 (公共路由，无需认证)
//!
//! | 路径 | 说明 |
//! |------|------|
//! | /health | 存活检查 + 楼面规模 |
//! | /health/detailed | 额外读取账本统计 (redb 读事务) |
//!
//! ```json
//! { "status": "healthy", "version": "0.1.0", "zones": 2, "tables": 6 }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

use crate::core::ServerState;
use crate::reservations::StorageStats;

static STARTED: OnceLock<Instant> = OnceLock::new();

pub fn router() -> Router<ServerState> {
    // 路由注册时记录启动时刻
    STARTED.get_or_init(Instant::now);
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    zones: usize,
    tables: usize,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    /// 业务时区的"今天"
    business_date: NaiveDate,
    timezone: String,
    ledger: LedgerCheck,
}

/// 账本检查结果
#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LedgerCheck {
    Ok {
        latency_ms: u64,
        reservations: u64,
        active_slots: u64,
        last_id: u64,
    },
    Error {
        message: String,
    },
}

impl LedgerCheck {
    fn from_stats(stats: StorageStats, started: Instant) -> Self {
        Self::Ok {
            latency_ms: started.elapsed().as_millis() as u64,
            reservations: stats.reservation_count,
            active_slots: stats.active_slot_count,
            last_id: stats.current_sequence,
        }
    }
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        zones: state.inventory.list_zones().len(),
        tables: state.inventory.table_count(),
    })
}

pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let started = Instant::now();
    let ledger = match state.reservations.storage().get_stats() {
        Ok(stats) => LedgerCheck::from_stats(stats, started),
        Err(e) => {
            tracing::error!(error = %e, "Ledger health check failed");
            LedgerCheck::Error {
                message: e.to_string(),
            }
        }
    };

    Json(DetailedHealthResponse {
        status: match ledger {
            LedgerCheck::Ok { .. } => "healthy",
            LedgerCheck::Error { .. } => "degraded",
        },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: STARTED.get().map(|t| t.elapsed().as_secs()).unwrap_or(0),
        business_date: state.reservations.today(),
        timezone: state.config.timezone.to_string(),
        ledger,
    })
}
