//! Availability Engine - 空位查询
//!
//! Pure reads over one committed redb snapshot. A query never takes a slot
//! lock and never waits on a writer; it may be one commit behind a
//! concurrent create.
//!
//! Only bookable (date, time) pairs are ever reported: dates between today
//! and the booking horizon, times that are calendar slots of that date.

use super::manager::BookingPolicy;
use super::storage::{ReservationStorage, StorageResult};
use crate::calendar::SlotCalendar;
use crate::inventory::InventoryRegistry;
use crate::utils::Clock;
use chrono::{Duration, NaiveDate, NaiveTime};
use shared::models::DiningTable;
use std::sync::Arc;

/// Read-side view of the ledger
#[derive(Clone)]
pub struct AvailabilityEngine {
    storage: ReservationStorage,
    inventory: Arc<InventoryRegistry>,
    calendar: Arc<SlotCalendar>,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl std::fmt::Debug for AvailabilityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityEngine")
            .field("tables", &self.inventory.table_count())
            .field("interval_minutes", &self.calendar.interval_minutes())
            .field("horizon_days", &self.policy.horizon_days)
            .finish_non_exhaustive()
    }
}

impl AvailabilityEngine {
    pub fn new(
        storage: ReservationStorage,
        inventory: Arc<InventoryRegistry>,
        calendar: Arc<SlotCalendar>,
        clock: Arc<dyn Clock>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            storage,
            inventory,
            calendar,
            clock,
            policy,
        }
    }

    /// Slots of `date` with at least one free table, in calendar order
    ///
    /// Dates before today or beyond the booking horizon yield nothing.
    pub fn available_slots(&self, date: NaiveDate) -> StorageResult<Vec<NaiveTime>> {
        let all_ids: Vec<i64> = self.inventory.list_tables().iter().map(|t| t.id).collect();
        self.slots_with_free_table(date, &all_ids)
    }

    /// Slots of `date` with at least one free table in `zone`
    pub fn available_slots_in_zone(
        &self,
        date: NaiveDate,
        zone: &str,
    ) -> StorageResult<Vec<NaiveTime>> {
        let ids = self.inventory.table_ids_in_zone(zone);
        self.slots_with_free_table(date, ids)
    }

    /// Free table ids of `zone` at (`date`, `time`), ascending
    ///
    /// Unknown zones, zones without tables, dates outside the booking window
    /// and times that are not a calendar slot of `date` yield nothing.
    pub fn available_tables(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        zone: &str,
    ) -> StorageResult<Vec<i64>> {
        let ids = self.inventory.table_ids_in_zone(zone);
        if ids.is_empty() || !self.in_window(date) || !self.calendar.is_bookable(date, time) {
            return Ok(Vec::new());
        }

        let read_txn = self.storage.begin_read()?;
        let occupied = self.storage.occupied_tables(&read_txn, date, time)?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !occupied.contains(id))
            .collect())
    }

    /// Free tables of `zone` at (`date`, `time`) that seat `party_count`
    pub fn available_tables_for_party(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        zone: &str,
        party_count: i32,
    ) -> StorageResult<Vec<DiningTable>> {
        let ids = self.available_tables(date, time, zone)?;
        Ok(ids
            .into_iter()
            .filter_map(|id| self.inventory.get_table(id))
            .filter(|t| t.fits(party_count))
            .cloned()
            .collect())
    }

    fn slots_with_free_table(
        &self,
        date: NaiveDate,
        table_ids: &[i64],
    ) -> StorageResult<Vec<NaiveTime>> {
        if table_ids.is_empty() || !self.in_window(date) {
            return Ok(Vec::new());
        }
        let slots = self.calendar.slots_for(date);
        if slots.is_empty() {
            return Ok(Vec::new());
        }

        let read_txn = self.storage.begin_read()?;
        let occupancy = self.storage.occupancy_for_date(&read_txn, date)?;

        Ok(slots
            .iter()
            .copied()
            .filter(|time| match occupancy.get(time) {
                Some(occupied) => table_ids.iter().any(|id| !occupied.contains(id)),
                None => true,
            })
            .collect())
    }

    /// today ..= today + horizon_days
    fn in_window(&self, date: NaiveDate) -> bool {
        let today = self.clock.today();
        date >= today && date <= today + Duration::days(self.policy.horizon_days)
    }
}
