use super::super::slot::SlotKey;
use super::super::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use shared::reservation::ReservationStatus;
use thiserror::Error;

/// Which rule a rejected request broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Malformed or out-of-range field
    Field,
    /// party_count outside 1..=max_party_size
    PartySize,
    /// Table exists but belongs to another zone
    ZoneMismatch,
    /// party_count exceeds table capacity
    Capacity,
    /// Time is not a calendar slot for the date
    OutsideOperatingHours,
    /// Date before today (business timezone)
    DateInPast,
    /// Date past the booking horizon
    BeyondHorizon,
}

impl ValidationKind {
    /// Machine-readable reason carried in `details.reason`
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Field => "invalid_field",
            Self::PartySize => "invalid_party_size",
            Self::ZoneMismatch => "zone_mismatch",
            Self::Capacity => "capacity_exceeded",
            Self::OutsideOperatingHours => "outside_operating_hours",
            Self::DateInPast => "date_in_past",
            Self::BeyondHorizon => "beyond_booking_horizon",
        }
    }

    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Field => ErrorCode::ValidationFailed,
            Self::PartySize => ErrorCode::PartySizeInvalid,
            Self::ZoneMismatch => ErrorCode::TableZoneMismatch,
            Self::Capacity => ErrorCode::CapacityExceeded,
            Self::OutsideOperatingHours => ErrorCode::OutsideOperatingHours,
            Self::DateInPast => ErrorCode::DateInPast,
            Self::BeyondHorizon => ErrorCode::BeyondBookingHorizon,
        }
    }
}

/// Ledger rejections and failures
///
/// Everything except `Storage` is an expected outcome of a well-formed call;
/// `SlotTaken` in particular is informational.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("{message}")]
    Validation {
        kind: ValidationKind,
        message: String,
    },

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(i64),

    #[error("Slot already taken: {0}")]
    SlotTaken(SlotKey),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ReservationError {
    pub fn validation(kind: ValidationKind, message: impl Into<String>) -> Self {
        Self::Validation {
            kind,
            message: message.into(),
        }
    }

    /// Machine-readable reason, stable across releases
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation { kind, .. } => kind.reason(),
            Self::TableNotFound(_) => "table_not_found",
            Self::ReservationNotFound(_) => "reservation_not_found",
            Self::SlotTaken(_) => "slot_taken",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Storage(_) => "internal_error",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TableNotFound(_) | Self::ReservationNotFound(_))
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        let reason = err.reason();
        match err {
            ReservationError::Validation { kind, message } => {
                AppError::rejected(kind.error_code(), reason, message)
            }
            ReservationError::TableNotFound(id) => {
                AppError::rejected(ErrorCode::TableNotFound, reason, format!("Table {id} not found"))
                    .with_detail("table_id", id)
            }
            ReservationError::ReservationNotFound(id) => AppError::rejected(
                ErrorCode::ReservationNotFound,
                reason,
                format!("Reservation {id} not found"),
            )
            .with_detail("reservation_id", id),
            ReservationError::SlotTaken(key) => AppError::rejected(
                ErrorCode::SlotTaken,
                reason,
                format!("Table {} is already reserved at {} {}", key.table_id, key.date, key.time.format("%H:%M")),
            )
            .with_detail("table_id", key.table_id)
            .with_detail("date", key.date.to_string())
            .with_detail("time", key.time.format("%H:%M").to_string()),
            ReservationError::InvalidTransition { from, to } => AppError::rejected(
                ErrorCode::InvalidTransition,
                reason,
                format!("Cannot change status from {from} to {to}"),
            )
            .with_detail("from", from.as_str())
            .with_detail("to", to.as_str()),
            ReservationError::Storage(e) => {
                // 保留技术细节用于日志，不暴露给客户端
                tracing::error!(error = %e, "Reservation storage error");
                AppError::database("Reservation storage unavailable").with_detail("reason", reason)
            }
        }
    }
}

pub type ManagerResult<T> = Result<T, ReservationError>;
