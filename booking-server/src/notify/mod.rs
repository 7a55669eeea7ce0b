//! Notification Dispatcher - 预订变更通知
//!
//! Dispatchers are invoked by the ledger strictly after a change has been
//! committed and after the slot lock has been released. They are
//! fire-and-forget: an error is logged by the caller and never rolls the
//! change back or blocks the next writer.
//!
//! | Dispatcher | Sink |
//! |------------|------|
//! | [`BroadcastDispatcher`] | in-process `tokio::sync::broadcast` subscribers |
//! | [`LogDispatcher`] | structured `tracing` record |
//! | [`WebhookDispatcher`] | HTTP POST to an external URL (spawned task) |

mod broadcast;
mod webhook;

pub use broadcast::BroadcastDispatcher;
pub use webhook::WebhookDispatcher;

use shared::reservation::ReservationEvent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("No async runtime available to deliver notification")]
    NoRuntime,

    #[error("Failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outbound notification seam
///
/// Implementations must return quickly; anything slow (network I/O) belongs
/// on a spawned task.
pub trait NotificationDispatcher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn notify(&self, event: &ReservationEvent) -> Result<(), NotifyError>;
}

/// Writes every event to the `reservation_events` log target
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn name(&self) -> &'static str {
        "log"
    }

    fn notify(&self, event: &ReservationEvent) -> Result<(), NotifyError> {
        tracing::info!(
            target: "reservation_events",
            kind = ?event.kind,
            reservation_id = event.reservation_id,
            table_id = event.table_id,
            date = %event.date,
            time = %event.time.format("%H:%M"),
            old_status = ?event.old_status,
            new_status = ?event.new_status,
            actor_id = ?event.actor_id,
            "Reservation event"
        );
        Ok(())
    }
}
