//! Reservation API 模块
//!
//! | 路径 | 方法 | 权限 |
//! |------|------|------|
//! | /api/reservations | POST | 公开 |
//! | /api/reservations | GET | reservations:view |
//! | /api/reservations/{id} | GET | reservations:view |
//! | /api/reservations/{id}/status | PUT | reservations:manage |
//! | /api/reservations/{id} | DELETE | reservations:manage |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::permissions::{RESERVATIONS_MANAGE, RESERVATIONS_VIEW};
use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    let public_routes = Router::new().route("/", post(handler::create));

    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission(RESERVATIONS_VIEW)));

    let manage_routes = Router::new()
        .route("/{id}/status", put(handler::change_status))
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission(RESERVATIONS_MANAGE)));

    public_routes.merge(read_routes).merge(manage_routes)
}
