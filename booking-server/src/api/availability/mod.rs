//! Availability API 模块 (公开，只读)
//!
//! | 路径 | 方法 | 参数 |
//! |------|------|------|
//! | /api/availability/slots | GET | `date`, `zone?` |
//! | /api/availability/tables | GET | `date`, `time`, `zone`, `party_count?` |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/availability", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/slots", get(handler::slots))
        .route("/tables", get(handler::tables))
}
