use super::*;
use ReservationStatus::*;

#[test]
fn test_confirm_records_actor() {
    let manager = create_test_manager();
    let r = manager.create(terraza_request("Ana")).unwrap();

    let confirmed = manager.change_status(r.id, Confirmed, 2).unwrap();
    assert_eq!(confirmed.status, Confirmed);
    assert_eq!(confirmed.confirmed_by, Some(2));
    assert_eq!(manager.get(r.id).unwrap().confirmed_by, Some(2));
}

#[test]
fn test_every_transition() {
    let cases = [
        (Pending, Pending, false),
        (Pending, Confirmed, true),
        (Pending, Cancelled, true),
        (Confirmed, Pending, false),
        (Confirmed, Confirmed, false),
        (Confirmed, Cancelled, true),
        (Cancelled, Pending, true),
        (Cancelled, Confirmed, false),
        (Cancelled, Cancelled, false),
    ];

    for (from, to, allowed) in cases {
        let manager = create_test_manager();
        let r = manager.create(terraza_request("Ana")).unwrap();
        // Walk to `from`
        match from {
            Pending => {}
            Confirmed => {
                manager.change_status(r.id, Confirmed, 1).unwrap();
            }
            Cancelled => {
                manager.change_status(r.id, Cancelled, 1).unwrap();
            }
        }

        let result = manager.change_status(r.id, to, 7);
        if allowed {
            assert_eq!(result.unwrap().status, to, "{from} -> {to}");
        } else {
            match result {
                Err(ReservationError::InvalidTransition { from: f, to: t }) => {
                    assert_eq!((f, t), (from, to));
                }
                other => panic!("{from} -> {to}: expected InvalidTransition, got {other:?}"),
            }
            // Rejected transition leaves the record untouched
            assert_eq!(manager.get(r.id).unwrap().status, from);
        }
    }
}

#[test]
fn test_cancel_frees_slot() {
    let manager = create_test_manager();
    let r = manager.create(terraza_request("Ana")).unwrap();
    manager.change_status(r.id, Cancelled, 1).unwrap();

    let again = manager.create(terraza_request("Luis")).unwrap();
    assert_eq!(again.status, Pending);
}

#[test]
fn test_cancel_keeps_confirmed_by() {
    let manager = create_test_manager();
    let r = manager.create(terraza_request("Ana")).unwrap();
    manager.change_status(r.id, Confirmed, 2).unwrap();
    let cancelled = manager.change_status(r.id, Cancelled, 3).unwrap();
    assert_eq!(cancelled.confirmed_by, Some(2));
}

#[test]
fn test_reopen_clears_confirmed_by_and_reclaims_slot() {
    let manager = create_test_manager();
    let r = manager.create(terraza_request("Ana")).unwrap();
    manager.change_status(r.id, Confirmed, 2).unwrap();
    manager.change_status(r.id, Cancelled, 2).unwrap();

    let reopened = manager.change_status(r.id, Pending, 3).unwrap();
    assert_eq!(reopened.status, Pending);
    assert_eq!(reopened.confirmed_by, None);

    let err = manager.create(terraza_request("Luis")).unwrap_err();
    assert!(matches!(err, ReservationError::SlotTaken(_)));
}

#[test]
fn test_reopen_does_not_recheck_slot() {
    let manager = create_test_manager();
    let first = manager.create(terraza_request("Ana")).unwrap();
    manager.change_status(first.id, Cancelled, 1).unwrap();
    let second = manager.create(terraza_request("Luis")).unwrap();

    // Both now hold the slot
    let reopened = manager.change_status(first.id, Pending, 1).unwrap();
    assert_eq!(reopened.status, Pending);

    let avail = manager.availability();
    assert!(!avail.available_tables(monday(), hm(19, 0), "Terraza").unwrap().contains(&1));

    // Cancelling one of them leaves the other holding the slot
    manager.change_status(second.id, Cancelled, 1).unwrap();
    assert!(!avail.available_tables(monday(), hm(19, 0), "Terraza").unwrap().contains(&1));
    manager.change_status(first.id, Cancelled, 1).unwrap();
    assert!(avail.available_tables(monday(), hm(19, 0), "Terraza").unwrap().contains(&1));
}

#[test]
fn test_change_status_not_found() {
    let manager = create_test_manager();
    let err = manager.change_status(42, Confirmed, 1).unwrap_err();
    assert!(matches!(err, ReservationError::ReservationNotFound(42)));
}

#[test]
fn test_remove() {
    let manager = create_test_manager();
    let r = manager.create(terraza_request("Ana")).unwrap();
    manager.change_status(r.id, Confirmed, 2).unwrap();

    let removed = manager.remove(r.id, Some(2)).unwrap();
    assert_eq!(removed.id, r.id);
    assert_eq!(removed.status, Confirmed);

    assert!(matches!(
        manager.get(r.id),
        Err(ReservationError::ReservationNotFound(_))
    ));
    assert!(matches!(
        manager.remove(r.id, None),
        Err(ReservationError::ReservationNotFound(_))
    ));

    // Slot is free again
    manager.create(terraza_request("Luis")).unwrap();
}

#[test]
fn test_remove_cancelled() {
    let manager = create_test_manager();
    let r = manager.create(terraza_request("Ana")).unwrap();
    manager.change_status(r.id, Cancelled, 1).unwrap();
    manager.remove(r.id, None).unwrap();

    let stats = manager.storage().get_stats().unwrap();
    assert_eq!(stats.reservation_count, 0);
    assert_eq!(stats.active_slot_count, 0);
}
