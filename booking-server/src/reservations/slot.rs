//! Per-slot mutual exclusion
//!
//! `(table_id, date, time)` is the unit of contention. Writers touching the
//! same key serialise on one mutex; writers on different keys never share a
//! lock. Entries are created on demand and removed when the last holder
//! releases them, so the table only ever holds contended keys.

use chrono::{NaiveDate, NaiveTime};
use dashmap::DashMap;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use std::fmt;
use std::sync::Arc;

/// Occupancy key of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub table_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl SlotKey {
    pub fn new(table_id: i64, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            table_id,
            date,
            time,
        }
    }

    pub fn of(reservation: &shared::models::Reservation) -> Self {
        Self::new(reservation.table_id, reservation.date, reservation.time)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table {} @ {} {}",
            self.table_id,
            self.date,
            self.time.format("%H:%M")
        )
    }
}

/// Lock table keyed by [`SlotKey`]
#[derive(Debug, Default)]
pub struct SlotLocks {
    locks: DashMap<SlotKey, Arc<Mutex<()>>>,
}

/// Held lock on one key; dropping it releases the key
pub struct SlotGuard<'a> {
    locks: &'a SlotLocks,
    key: SlotKey,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        // Release first so the entry's only remaining owner is the map.
        self.guard.take();
        self.locks
            .locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `key`, blocking while another writer holds it
    pub fn lock(&self, key: SlotKey) -> SlotGuard<'_> {
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        SlotGuard {
            locks: self,
            key,
            guard: Some(lock.lock_arc()),
        }
    }

    /// Number of keys currently locked or waited on
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
