//! ReservationManager - the reservation ledger
//!
//! The manager is the only writer of reservation state. It owns:
//! - request validation (fields, table/zone, capacity, calendar)
//! - the per-slot lock table
//! - persistence to redb (one write transaction per mutation)
//! - post-commit notification dispatch
//!
//! # Create Flow
//!
//! ```text
//! create(req)
//!     ├─ 1. Field validation (name, phone, email, note, party size)
//!     ├─ 2. Table exists and belongs to zone
//!     ├─ 3. party_count ≤ table.capacity
//!     ├─ 4. Date not past / within horizon, time is a calendar slot
//!     ├─ 5. Lock (table_id, date, time)
//!     ├─ 6. Begin write transaction
//!     ├─ 7. Occupied? → SlotTaken (transaction dropped)
//!     ├─ 8. Allocate id, insert pending record, index slot
//!     ├─ 9. Commit, release lock
//!     └─ 10. Dispatch `created`
//! ```
//!
//! Status changes and deletes follow the same lock → transaction → commit →
//! unlock → dispatch order, so a dispatcher never observes uncommitted state
//! and never runs while a slot is locked.

mod error;
pub use error::*;

#[cfg(test)]
mod tests;

use super::availability::AvailabilityEngine;
use super::slot::{SlotKey, SlotLocks};
use super::state_machine::{OccupancyChange, Transition, next_status, occupancy_change};
use super::storage::ReservationStorage;
use crate::calendar::SlotCalendar;
use crate::inventory::InventoryRegistry;
use crate::notify::{BroadcastDispatcher, NotificationDispatcher};
use crate::utils::Clock;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_required_text,
};
use chrono::{Duration, NaiveDate, NaiveTime};
use shared::models::Reservation;
use shared::reservation::{
    ReservationCreate, ReservationEvent, ReservationEventKind, ReservationFilter,
    ReservationStatus,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Booking limits enforced on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Largest party accepted at all (before table capacity)
    pub max_party_size: i32,
    /// Furthest bookable date, in days from today
    pub horizon_days: i64,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_party_size: 12,
            horizon_days: 90,
        }
    }
}

/// The reservation ledger
pub struct ReservationManager {
    storage: ReservationStorage,
    inventory: Arc<InventoryRegistry>,
    calendar: Arc<SlotCalendar>,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
    locks: SlotLocks,
    broadcast: BroadcastDispatcher,
    dispatchers: Vec<Arc<dyn NotificationDispatcher>>,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("storage", &"<ReservationStorage>")
            .field("policy", &self.policy)
            .field("locked_slots", &self.locks.len())
            .field(
                "dispatchers",
                &self.dispatchers.iter().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ReservationManager {
    /// Open the ledger at `db_path`
    pub fn new(
        db_path: impl AsRef<Path>,
        inventory: Arc<InventoryRegistry>,
        calendar: Arc<SlotCalendar>,
        clock: Arc<dyn Clock>,
        policy: BookingPolicy,
    ) -> ManagerResult<Self> {
        let storage = ReservationStorage::open(db_path)?;
        Ok(Self::with_storage(storage, inventory, calendar, clock, policy))
    }

    /// Build the ledger over existing storage
    pub fn with_storage(
        storage: ReservationStorage,
        inventory: Arc<InventoryRegistry>,
        calendar: Arc<SlotCalendar>,
        clock: Arc<dyn Clock>,
        policy: BookingPolicy,
    ) -> Self {
        let broadcast = BroadcastDispatcher::new();
        let dispatchers: Vec<Arc<dyn NotificationDispatcher>> = vec![Arc::new(broadcast.clone())];
        Self {
            storage,
            inventory,
            calendar,
            clock,
            policy,
            locks: SlotLocks::new(),
            broadcast,
            dispatchers,
        }
    }

    /// Register an additional notification sink
    pub fn add_dispatcher(&mut self, dispatcher: Arc<dyn NotificationDispatcher>) {
        tracing::info!(dispatcher = dispatcher.name(), "Notification dispatcher registered");
        self.dispatchers.push(dispatcher);
    }

    /// Subscribe to committed reservation events
    pub fn subscribe(&self) -> broadcast::Receiver<ReservationEvent> {
        self.broadcast.subscribe()
    }

    pub fn storage(&self) -> &ReservationStorage {
        &self.storage
    }

    pub fn inventory(&self) -> &InventoryRegistry {
        &self.inventory
    }

    pub fn calendar(&self) -> &SlotCalendar {
        &self.calendar
    }

    pub fn policy(&self) -> BookingPolicy {
        self.policy
    }

    /// Business "today" as seen by the ledger
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Read-side view over the same storage
    pub fn availability(&self) -> AvailabilityEngine {
        AvailabilityEngine::new(
            self.storage.clone(),
            self.inventory.clone(),
            self.calendar.clone(),
            self.clock.clone(),
            self.policy,
        )
    }

    // ========== Commands ==========

    /// Validate and atomically claim a (table, date, time) slot
    pub fn create(&self, req: ReservationCreate) -> ManagerResult<Reservation> {
        self.validate_fields(&req)?;

        let table = self
            .inventory
            .get_table(req.table_id)
            .ok_or(ReservationError::TableNotFound(req.table_id))?;
        if table.zone != req.zone {
            return Err(ReservationError::validation(
                ValidationKind::ZoneMismatch,
                format!("Table {} is in zone '{}', not '{}'", table.id, table.zone, req.zone),
            ));
        }
        if !table.fits(req.party_count) {
            return Err(ReservationError::validation(
                ValidationKind::Capacity,
                format!(
                    "Party of {} exceeds capacity {} of table {}",
                    req.party_count, table.capacity, table.id
                ),
            ));
        }
        self.validate_schedule(req.date, req.time)?;

        let key = SlotKey::new(req.table_id, req.date, req.time);
        let reservation = {
            let _guard = self.locks.lock(key);
            let txn = self.storage.begin_write()?;

            if !self.storage.slot_holders_txn(&txn, &key)?.is_empty() {
                tracing::info!(slot = %key, customer = %req.customer_name, "Slot already taken");
                return Err(ReservationError::SlotTaken(key));
            }

            let id = self.storage.next_reservation_id(&txn)?;
            let now = self.clock.now_millis();
            let reservation = Reservation {
                id,
                customer_name: req.customer_name.trim().to_string(),
                phone: req.phone.trim().to_string(),
                email: req.email,
                party_count: req.party_count,
                zone: req.zone,
                table_id: req.table_id,
                date: req.date,
                time: req.time,
                note: req.note,
                status: ReservationStatus::Pending,
                confirmed_by: None,
                created_at: now,
                updated_at: now,
            };
            self.storage.store_reservation(&txn, &reservation)?;
            self.storage.mark_slot_active(&txn, &key, id)?;
            self.storage.commit(txn)?;
            reservation
        };

        tracing::info!(
            reservation_id = reservation.id,
            slot = %key,
            party_count = reservation.party_count,
            "Reservation created"
        );
        self.dispatch(self.event(
            ReservationEventKind::Created,
            &reservation,
            None,
            Some(reservation.status),
            None,
        ));
        Ok(reservation)
    }

    /// Move a reservation along the status state machine
    ///
    /// Confirming records `actor_id` as `confirmed_by`. Reopening a cancelled
    /// reservation claims its slot again without checking for a holder.
    pub fn change_status(
        &self,
        id: i64,
        new_status: ReservationStatus,
        actor_id: i64,
    ) -> ManagerResult<Reservation> {
        // The slot key never changes for a reservation, so a pre-read is
        // enough to pick the lock; the authoritative read happens inside the
        // transaction.
        let key = self.slot_key_of(id)?;

        let (old_status, reservation) = {
            let _guard = self.locks.lock(key);
            let txn = self.storage.begin_write()?;

            let mut reservation = self
                .storage
                .get_reservation_txn(&txn, id)?
                .ok_or(ReservationError::ReservationNotFound(id))?;
            let old_status = reservation.status;

            let next = match next_status(old_status, new_status) {
                Transition::Allowed(next) => next,
                Transition::Denied { from, to } => {
                    tracing::info!(reservation_id = id, %from, %to, "Status transition rejected");
                    return Err(ReservationError::InvalidTransition { from, to });
                }
            };

            reservation.status = next;
            reservation.updated_at = self.clock.now_millis();
            match next {
                ReservationStatus::Confirmed => reservation.confirmed_by = Some(actor_id),
                ReservationStatus::Pending => reservation.confirmed_by = None,
                ReservationStatus::Cancelled => {}
            }

            match occupancy_change(old_status, next) {
                OccupancyChange::Claim => {
                    let holders = self.storage.slot_holders_txn(&txn, &key)?;
                    if !holders.is_empty() {
                        tracing::warn!(
                            reservation_id = id,
                            slot = %key,
                            holders = ?holders,
                            "Reopened reservation shares its slot with an active reservation"
                        );
                    }
                    self.storage.mark_slot_active(&txn, &key, id)?;
                }
                OccupancyChange::Release => self.storage.mark_slot_inactive(&txn, &key, id)?,
                OccupancyChange::Keep => {}
            }

            self.storage.store_reservation(&txn, &reservation)?;
            self.storage.commit(txn)?;
            (old_status, reservation)
        };

        tracing::info!(
            reservation_id = id,
            from = %old_status,
            to = %reservation.status,
            actor_id,
            "Reservation status changed"
        );
        self.dispatch(self.event(
            ReservationEventKind::StatusChanged,
            &reservation,
            Some(old_status),
            Some(reservation.status),
            Some(actor_id),
        ));
        Ok(reservation)
    }

    /// Hard delete, bypassing the state machine; frees the slot immediately
    pub fn remove(&self, id: i64, actor_id: Option<i64>) -> ManagerResult<Reservation> {
        let key = self.slot_key_of(id)?;

        let removed = {
            let _guard = self.locks.lock(key);
            let txn = self.storage.begin_write()?;

            let reservation = self
                .storage
                .get_reservation_txn(&txn, id)?
                .ok_or(ReservationError::ReservationNotFound(id))?;
            self.storage.remove_reservation(&txn, id)?;
            self.storage.mark_slot_inactive(&txn, &key, id)?;
            self.storage.commit(txn)?;
            reservation
        };

        tracing::info!(reservation_id = id, slot = %key, actor_id = ?actor_id, "Reservation deleted");
        self.dispatch(self.event(
            ReservationEventKind::Deleted,
            &removed,
            Some(removed.status),
            None,
            actor_id,
        ));
        Ok(removed)
    }

    // ========== Queries ==========

    pub fn get(&self, id: i64) -> ManagerResult<Reservation> {
        self.storage
            .get_reservation(id)?
            .ok_or(ReservationError::ReservationNotFound(id))
    }

    /// Reservations matching `filter`, ordered by (date, time, table_id)
    pub fn list(&self, filter: &ReservationFilter) -> ManagerResult<Vec<Reservation>> {
        let all = self.storage.list_reservations()?;
        Ok(all.into_iter().filter(|r| filter.matches(r)).collect())
    }

    // ========== Internals ==========

    fn slot_key_of(&self, id: i64) -> ManagerResult<SlotKey> {
        self.storage
            .get_reservation(id)?
            .map(|r| SlotKey::of(&r))
            .ok_or(ReservationError::ReservationNotFound(id))
    }

    fn validate_fields(&self, req: &ReservationCreate) -> ManagerResult<()> {
        validate_required_text(&req.customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_required_text(&req.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_email(&req.email)?;
        validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;

        if req.party_count < 1 || req.party_count > self.policy.max_party_size {
            return Err(ReservationError::validation(
                ValidationKind::PartySize,
                format!(
                    "party_count must be between 1 and {}, got {}",
                    self.policy.max_party_size, req.party_count
                ),
            ));
        }
        Ok(())
    }

    fn validate_schedule(&self, date: NaiveDate, time: NaiveTime) -> ManagerResult<()> {
        let today = self.clock.today();
        if date < today {
            return Err(ReservationError::validation(
                ValidationKind::DateInPast,
                format!("Date {date} is in the past (today is {today})"),
            ));
        }
        if date > today + Duration::days(self.policy.horizon_days) {
            return Err(ReservationError::validation(
                ValidationKind::BeyondHorizon,
                format!(
                    "Date {date} is more than {} days ahead",
                    self.policy.horizon_days
                ),
            ));
        }
        if !self.calendar.is_bookable(date, time) {
            return Err(ReservationError::validation(
                ValidationKind::OutsideOperatingHours,
                format!("{} is not a bookable slot on {date}", time.format("%H:%M")),
            ));
        }
        Ok(())
    }

    fn event(
        &self,
        kind: ReservationEventKind,
        reservation: &Reservation,
        old_status: Option<ReservationStatus>,
        new_status: Option<ReservationStatus>,
        actor_id: Option<i64>,
    ) -> ReservationEvent {
        ReservationEvent {
            kind,
            reservation_id: reservation.id,
            table_id: reservation.table_id,
            date: reservation.date,
            time: reservation.time,
            old_status,
            new_status,
            actor_id,
            timestamp: self.clock.now_millis(),
        }
    }

    /// Fire-and-forget: failures are logged, never surfaced
    fn dispatch(&self, event: ReservationEvent) {
        for dispatcher in &self.dispatchers {
            if let Err(e) = dispatcher.notify(&event) {
                tracing::warn!(
                    dispatcher = dispatcher.name(),
                    reservation_id = event.reservation_id,
                    kind = ?event.kind,
                    error = %e,
                    "Notification dispatch failed"
                );
            }
        }
    }
}
