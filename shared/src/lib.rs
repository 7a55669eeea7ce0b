//! Shared types for the booking system
//!
//! Common types used by booking-server and its clients: domain models,
//! reservation wire types, error types and response structures.

pub mod error;
pub mod models;
pub mod reservation;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorBody, ErrorCode};
pub use models::{DiningTable, Reservation, Zone};
pub use reservation::{ReservationEvent, ReservationEventKind, ReservationStatus};
