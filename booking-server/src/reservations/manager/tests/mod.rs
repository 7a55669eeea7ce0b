use super::*;
use crate::inventory::FloorPlan;
use crate::notify::NotifyError;
use crate::utils::FixedClock;
use std::sync::atomic::{AtomicUsize, Ordering};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn create_test_manager() -> ReservationManager {
    let (inventory, calendar) = FloorPlan::default().build().unwrap();
    let storage = ReservationStorage::open_in_memory().unwrap();
    ReservationManager::with_storage(
        storage,
        Arc::new(inventory),
        Arc::new(calendar),
        Arc::new(FixedClock::new(today())),
        BookingPolicy::default(),
    )
}

/// Table 1 (Terraza, capacity 4), 2025-03-10 19:00, party of 2
fn terraza_request(customer: &str) -> ReservationCreate {
    ReservationCreate {
        customer_name: customer.to_string(),
        phone: "+34 600 000 000".to_string(),
        email: None,
        party_count: 2,
        zone: "Terraza".to_string(),
        table_id: 1,
        date: monday(),
        time: hm(19, 0),
        note: None,
    }
}

fn request_at(table_id: i64, zone: &str, time: NaiveTime) -> ReservationCreate {
    ReservationCreate {
        table_id,
        zone: zone.to_string(),
        time,
        ..terraza_request("Guest")
    }
}

/// Counts calls and always fails
#[derive(Default)]
struct FailingDispatcher {
    calls: AtomicUsize,
}

impl NotificationDispatcher for FailingDispatcher {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn notify(&self, _event: &ReservationEvent) -> Result<(), NotifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::NoRuntime)
    }
}

mod test_status;
