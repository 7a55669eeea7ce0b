//! Reservation wire types
//!
//! - Status: the three lifecycle states and their wire names
//! - Events: notifications emitted after every committed change
//! - Requests: payloads accepted by the HTTP API

pub mod event;
pub mod status;
pub mod types;

// Re-exports
pub use event::{ReservationEvent, ReservationEventKind};
pub use status::ReservationStatus;
pub use types::*;
