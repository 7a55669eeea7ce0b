//! In-process fan-out over a tokio broadcast channel

use super::{NotificationDispatcher, NotifyError};
use shared::reservation::ReservationEvent;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Publishes events to every live subscriber
///
/// Slow subscribers lag and lose the oldest events instead of stalling
/// writers.
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    tx: broadcast::Sender<ReservationEvent>,
}

impl BroadcastDispatcher {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<ReservationEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationDispatcher for BroadcastDispatcher {
    fn name(&self) -> &'static str {
        "broadcast"
    }

    fn notify(&self, event: &ReservationEvent) -> Result<(), NotifyError> {
        if self.tx.send(event.clone()).is_err() {
            // Nobody listening is not a delivery failure.
            tracing::trace!(reservation_id = event.reservation_id, "No active receivers");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use shared::reservation::{ReservationEventKind, ReservationStatus};

    fn event(id: i64) -> ReservationEvent {
        ReservationEvent {
            kind: ReservationEventKind::Created,
            reservation_id: id,
            table_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            old_status: None,
            new_status: Some(ReservationStatus::Pending),
            actor_id: None,
            timestamp: 0,
        }
    }

    #[test]
    fn test_without_receivers_is_ok() {
        let dispatcher = BroadcastDispatcher::new();
        assert!(dispatcher.notify(&event(1)).is_ok());
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let dispatcher = BroadcastDispatcher::new();
        let mut rx = dispatcher.subscribe();

        dispatcher.notify(&event(1)).unwrap();
        dispatcher.notify(&event(2)).unwrap();

        assert_eq!(rx.recv().await.unwrap().reservation_id, 1);
        assert_eq!(rx.recv().await.unwrap().reservation_id, 2);
    }
}
