//! AppError and its wire body
//!
//! Every failed request answers with the same JSON shape:
//!
//! ```json
//! { "code": 4002, "message": "Table 1 is taken at 2025-03-10 19:00", "details": { "reason": "slot_taken" } }
//! ```
//!
//! `code` is the numeric [`ErrorCode`]; `details.reason` is present for
//! reservation rejections so clients never parse `message`.

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Structured details, serialized with sorted keys
pub type ErrorDetails = BTreeMap<String, Value>;

/// 请求级错误 (HTTP 边界)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<ErrorDetails>,
}

impl AppError {
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// `details.reason`, if any
    pub fn reason(&self) -> Option<&str> {
        self.details.as_ref()?.get("reason")?.as_str()
    }

    /// Expected business outcome (slot taken, invalid transition, failed
    /// rule) with a machine-readable `reason`
    pub fn rejected(code: ErrorCode, reason: &'static str, msg: impl Into<String>) -> Self {
        Self::with_message(code, msg).with_detail("reason", reason)
    }

    // ========== Request parsing ==========

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    // ========== Floor plan lookups ==========

    pub fn table_not_found(id: i64) -> Self {
        Self::with_message(ErrorCode::TableNotFound, format!("Table {id} not found"))
            .with_detail("table_id", id)
    }

    pub fn zone_not_found(zone: &str) -> Self {
        Self::with_message(ErrorCode::ZoneNotFound, format!("Zone '{zone}' not found"))
            .with_detail("zone", zone)
    }

    // ========== Identity ==========

    pub fn unauthorized() -> Self {
        Self::with_message(ErrorCode::NotAuthenticated, ErrorCode::NotAuthenticated.message())
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::with_message(ErrorCode::TokenExpired, ErrorCode::TokenExpired.message())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    // ========== System ==========

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// JSON body of an error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl From<AppError> for ErrorBody {
    fn from(err: AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message,
            details: err.details,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        let category = self.code.category();
        if !category.is_client_side() {
            tracing::error!(code = %self.code, message = %self.message, "Request failed");
        } else if matches!(category, ErrorCategory::Auth | ErrorCategory::Permission) {
            tracing::debug!(code = %self.code, message = %self.message, "Request refused");
        }
        (status, axum::Json(ErrorBody::from(self))).into_response()
    }
}
