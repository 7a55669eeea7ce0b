//! 预订并发测试
//!
//! 使用 ServerState::initialize_with_clock 完整初始化 (文件型 redb)，
//! 在阻塞线程池上并发提交预订，验证同一时段只有一个赢家。

use booking_server::auth::JwtConfig;
use booking_server::utils::FixedClock;
use booking_server::{Config, ServerState};
use chrono::{NaiveDate, NaiveTime};
use shared::reservation::{ReservationCreate, ReservationFilter, ReservationStatus};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

const CONTENDERS: usize = 64;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn state_in(dir: &tempfile::TempDir) -> ServerState {
    let config = Config::with_overrides(
        dir.path().to_string_lossy(),
        0,
        JwtConfig::new("stress-test-secret-0123456789abcdef"),
    );
    let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
    ServerState::initialize_with_clock(&config, clock).expect("Failed to initialize state")
}

fn request(customer: String, table_id: i64, zone: &str, time: NaiveTime) -> ReservationCreate {
    ReservationCreate {
        customer_name: customer,
        phone: "600000000".to_string(),
        email: None,
        party_count: 2,
        zone: zone.to_string(),
        table_id,
        date: monday(),
        time,
        note: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_slot_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);
    let successes = Arc::new(AtomicUsize::new(0));
    let taken = Arc::new(AtomicUsize::new(0));

    let started = Instant::now();
    let mut handles = Vec::with_capacity(CONTENDERS);
    for i in 0..CONTENDERS {
        let manager = state.reservations.clone();
        let successes = successes.clone();
        let taken = taken.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            match manager.create(request(format!("Guest {i}"), 1, "Terraza", hm(19, 0))) {
                Ok(_) => successes.fetch_add(1, Ordering::SeqCst),
                Err(booking_server::reservations::ReservationError::SlotTaken(_)) => {
                    taken.fetch_add(1, Ordering::SeqCst)
                }
                Err(e) => panic!("unexpected error: {e}"),
            };
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    println!(
        "{} contenders on one slot in {:?}",
        CONTENDERS,
        started.elapsed()
    );

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(taken.load(Ordering::SeqCst), CONTENDERS - 1);

    let all = state.reservations.list(&ReservationFilter::default()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, ReservationStatus::Pending);

    let free = state
        .availability
        .available_tables(monday(), hm(19, 0), "Terraza")
        .unwrap();
    assert_eq!(free, vec![2, 3]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_slots_capacity_invariant() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_in(&dir);

    // Every Terraza table at every dinner slot, each requested 4 times
    let slots = [hm(19, 0), hm(19, 30), hm(20, 0), hm(20, 30)];
    let mut handles = Vec::new();
    for round in 0..4 {
        for table_id in 1..=3 {
            for time in slots {
                let manager = state.reservations.clone();
                handles.push(tokio::task::spawn_blocking(move || {
                    manager
                        .create(request(format!("R{round}-T{table_id}"), table_id, "Terraza", time))
                        .is_ok()
                }));
            }
        }
    }

    let mut ok = 0;
    for handle in handles {
        if handle.await.unwrap() {
            ok += 1;
        }
    }
    assert_eq!(ok, 3 * slots.len());

    // No two active reservations share a slot
    let all = state.reservations.list(&ReservationFilter::default()).unwrap();
    let mut seen = HashSet::new();
    for r in all.iter().filter(|r| r.is_active()) {
        assert!(seen.insert((r.table_id, r.date, r.time)), "double booking: {r:?}");
    }

    // Terraza is full at those slots, Salón untouched
    let open = state.availability.available_slots_in_zone(monday(), "Terraza").unwrap();
    for time in slots {
        assert!(!open.contains(&time));
    }
    assert!(state.availability.available_slots(monday()).unwrap().contains(&hm(19, 0)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ledger_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let state = state_in(&dir);
        let r = state
            .reservations
            .create(request("Ana".to_string(), 1, "Terraza", hm(19, 0)))
            .unwrap();
        state
            .reservations
            .change_status(r.id, ReservationStatus::Confirmed, 2)
            .unwrap();
        r.id
    };

    let state = state_in(&dir);
    let r = state.reservations.get(id).unwrap();
    assert_eq!(r.status, ReservationStatus::Confirmed);
    assert_eq!(r.confirmed_by, Some(2));
    assert!(
        !state
            .availability
            .available_tables(monday(), hm(19, 0), "Terraza")
            .unwrap()
            .contains(&1)
    );

    // Sequence continues after reopen
    let next = state
        .reservations
        .create(request("Luis".to_string(), 2, "Terraza", hm(19, 0)))
        .unwrap();
    assert_eq!(next.id, id + 1);
}
