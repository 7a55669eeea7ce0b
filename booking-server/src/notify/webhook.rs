//! HTTP webhook delivery

use super::{NotificationDispatcher, NotifyError};
use shared::reservation::ReservationEvent;
use std::time::Duration;
use tokio::runtime::Handle;

/// POSTs each event as JSON to a fixed URL
///
/// Delivery happens on a spawned task; failures are logged there and never
/// retried. The caller only sees errors that occur before the task starts.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: reqwest::Client,
    url: String,
}

impl WebhookDispatcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NotificationDispatcher for WebhookDispatcher {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn notify(&self, event: &ReservationEvent) -> Result<(), NotifyError> {
        let handle = Handle::try_current().map_err(|_| NotifyError::NoRuntime)?;
        let body = serde_json::to_vec(event)?;

        let client = self.client.clone();
        let url = self.url.clone();
        let reservation_id = event.reservation_id;

        handle.spawn(async move {
            let result = client
                .post(&url)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .and_then(|resp| resp.error_for_status());

            match result {
                Ok(resp) => tracing::debug!(
                    reservation_id,
                    status = %resp.status(),
                    "Webhook delivered"
                ),
                Err(e) => tracing::warn!(
                    reservation_id,
                    url = %url,
                    error = %e,
                    "Webhook delivery failed"
                ),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use shared::reservation::{ReservationEventKind, ReservationStatus};

    fn event() -> ReservationEvent {
        ReservationEvent {
            kind: ReservationEventKind::StatusChanged,
            reservation_id: 1,
            table_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            old_status: Some(ReservationStatus::Pending),
            new_status: Some(ReservationStatus::Confirmed),
            actor_id: Some(2),
            timestamp: 0,
        }
    }

    #[test]
    fn test_outside_runtime_reports_error() {
        let dispatcher =
            WebhookDispatcher::new("http://127.0.0.1:9/hook", Duration::from_millis(100)).unwrap();
        assert!(matches!(
            dispatcher.notify(&event()),
            Err(NotifyError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_does_not_fail_caller() {
        let dispatcher =
            WebhookDispatcher::new("http://127.0.0.1:9/hook", Duration::from_millis(100)).unwrap();
        assert!(dispatcher.notify(&event()).is_ok());
    }
}
