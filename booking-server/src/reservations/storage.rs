//! redb-based storage layer for the reservation ledger
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `reservations` | `id` | `Reservation` (JSON) | Ledger records, every status |
//! | `active_slots` | `(day, minute, table_id, id)` | `()` | Occupancy index (pending/confirmed only) |
//! | `sequence_counter` | `&str` | `u64` | Reservation id sequence |
//!
//! `day` is days from CE and `minute` is minutes from midnight, so a range
//! scan over a prefix of the key answers "who holds this date", "who holds
//! this slot" and "who holds this table at this slot" without touching the
//! ledger records.
//!
//! # Consistency
//!
//! Every mutation runs inside one redb write transaction; a transaction that is
//! dropped without `commit()` leaves no trace. Readers use `begin_read()`, which
//! gives an MVCC snapshot of the last committed state and never waits on a
//! writer.

use super::slot::SlotKey;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, WriteTransaction,
};
use shared::models::Reservation;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Ledger records: key = reservation id, value = JSON-serialized Reservation
const RESERVATIONS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("reservations");

/// Occupancy index: key = (day, minute, table_id, reservation_id), value = empty
const ACTIVE_SLOTS_TABLE: TableDefinition<(i32, u32, i64, i64), ()> =
    TableDefinition::new("active_slots");

/// Sequence counters: key = counter name, value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const RESERVATION_SEQ_KEY: &str = "reservation_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt index entry: {0}")]
    CorruptIndex(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// ========== Key encoding ==========

fn day_of(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

fn minute_of(time: NaiveTime) -> u32 {
    time.num_seconds_from_midnight() / 60
}

fn time_from_minute(minute: u32) -> StorageResult<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(minute * 60, 0)
        .ok_or_else(|| StorageError::CorruptIndex(format!("minute {minute} out of range")))
}

type IndexKey = (i32, u32, i64, i64);

fn index_key(key: &SlotKey, reservation_id: i64) -> IndexKey {
    (
        day_of(key.date),
        minute_of(key.time),
        key.table_id,
        reservation_id,
    )
}

/// Inclusive bounds covering every holder of one (table, date, time) triple
fn slot_bounds(key: &SlotKey) -> (IndexKey, IndexKey) {
    let (d, m) = (day_of(key.date), minute_of(key.time));
    (
        (d, m, key.table_id, i64::MIN),
        (d, m, key.table_id, i64::MAX),
    )
}

/// Inclusive bounds covering every entry of one date
fn date_bounds(date: NaiveDate) -> (IndexKey, IndexKey) {
    let d = day_of(date);
    ((d, 0, i64::MIN, i64::MIN), (d, u32::MAX, i64::MAX, i64::MAX))
}

/// Inclusive bounds covering every table at one (date, time)
fn time_bounds(date: NaiveDate, time: NaiveTime) -> (IndexKey, IndexKey) {
    let (d, m) = (day_of(date), minute_of(time));
    ((d, m, i64::MIN, i64::MIN), (d, m, i64::MAX, i64::MAX))
}

/// Reservation storage backed by redb
#[derive(Clone)]
pub struct ReservationStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for ReservationStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationStorage").finish_non_exhaustive()
    }
}

impl ReservationStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits are durable once `commit()` returns (copy-on-write with
    /// an atomic root swap), so a crash never exposes a half-applied booking.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_SLOTS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(RESERVATION_SEQ_KEY)?.is_none() {
                seq_table.insert(RESERVATION_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Commit a write transaction
    pub fn commit(&self, txn: WriteTransaction) -> StorageResult<()> {
        txn.commit()?;
        Ok(())
    }

    /// Begin a read transaction (consistent snapshot)
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    // ========== Sequence Operations ==========

    /// Increment and return the reservation id sequence (within transaction)
    pub fn next_reservation_id(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(RESERVATION_SEQ_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(RESERVATION_SEQ_KEY, next)?;
        Ok(next as i64)
    }

    /// Get current sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(RESERVATION_SEQ_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    // ========== Ledger Records ==========

    /// Insert or overwrite a reservation record
    pub fn store_reservation(
        &self,
        txn: &WriteTransaction,
        reservation: &Reservation,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(RESERVATIONS_TABLE)?;
        let value = serde_json::to_vec(reservation)?;
        table.insert(reservation.id, value.as_slice())?;
        Ok(())
    }

    /// Get a reservation by id
    pub fn get_reservation(&self, id: i64) -> StorageResult<Option<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a reservation by id (within transaction)
    pub fn get_reservation_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> StorageResult<Option<Reservation>> {
        let table = txn.open_table(RESERVATIONS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Delete a reservation record; returns false if it did not exist
    pub fn remove_reservation(&self, txn: &WriteTransaction, id: i64) -> StorageResult<bool> {
        let mut table = txn.open_table(RESERVATIONS_TABLE)?;
        let existed = table.remove(id)?.is_some();
        Ok(existed)
    }

    /// All reservations ordered by (date, time, table_id, id)
    pub fn list_reservations(&self) -> StorageResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;

        let mut reservations = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let reservation: Reservation = serde_json::from_slice(value.value())?;
            reservations.push(reservation);
        }

        reservations.sort_by_key(|r| (r.date, r.time, r.table_id, r.id));
        Ok(reservations)
    }

    // ========== Occupancy Index ==========

    /// Record that `reservation_id` occupies `key`
    pub fn mark_slot_active(
        &self,
        txn: &WriteTransaction,
        key: &SlotKey,
        reservation_id: i64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_SLOTS_TABLE)?;
        table.insert(index_key(key, reservation_id), ())?;
        Ok(())
    }

    /// Release `reservation_id`'s hold on `key` (no-op if absent)
    pub fn mark_slot_inactive(
        &self,
        txn: &WriteTransaction,
        key: &SlotKey,
        reservation_id: i64,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_SLOTS_TABLE)?;
        table.remove(index_key(key, reservation_id))?;
        Ok(())
    }

    /// Ids of every active reservation holding `key` (within transaction)
    ///
    /// Normally zero or one; more than one only after a reopen collided.
    pub fn slot_holders_txn(
        &self,
        txn: &WriteTransaction,
        key: &SlotKey,
    ) -> StorageResult<Vec<i64>> {
        let table = txn.open_table(ACTIVE_SLOTS_TABLE)?;
        let (start, end) = slot_bounds(key);

        let mut holders = Vec::new();
        for result in table.range(start..=end)? {
            let (entry, _) = result?;
            holders.push(entry.value().3);
        }
        Ok(holders)
    }

    /// Tables occupied at (date, time) as seen by `read_txn`
    pub fn occupied_tables(
        &self,
        read_txn: &ReadTransaction,
        date: NaiveDate,
        time: NaiveTime,
    ) -> StorageResult<BTreeSet<i64>> {
        let table = read_txn.open_table(ACTIVE_SLOTS_TABLE)?;
        let (start, end) = time_bounds(date, time);

        let mut occupied = BTreeSet::new();
        for result in table.range(start..=end)? {
            let (entry, _) = result?;
            occupied.insert(entry.value().2);
        }
        Ok(occupied)
    }

    /// Occupied tables for every time of `date` as seen by `read_txn`
    pub fn occupancy_for_date(
        &self,
        read_txn: &ReadTransaction,
        date: NaiveDate,
    ) -> StorageResult<BTreeMap<NaiveTime, BTreeSet<i64>>> {
        let table = read_txn.open_table(ACTIVE_SLOTS_TABLE)?;
        let (start, end) = date_bounds(date);

        let mut occupancy: BTreeMap<NaiveTime, BTreeSet<i64>> = BTreeMap::new();
        for result in table.range(start..=end)? {
            let (entry, _) = result?;
            let (_day, minute, table_id, _id) = entry.value();
            occupancy
                .entry(time_from_minute(minute)?)
                .or_default()
                .insert(table_id);
        }
        Ok(occupancy)
    }

    // ========== Statistics ==========

    /// Get storage statistics
    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;

        let reservations_table = read_txn.open_table(RESERVATIONS_TABLE)?;
        let active_table = read_txn.open_table(ACTIVE_SLOTS_TABLE)?;
        let seq_table = read_txn.open_table(SEQUENCE_TABLE)?;

        Ok(StorageStats {
            reservation_count: reservations_table.len()?,
            active_slot_count: active_table.len()?,
            current_sequence: seq_table
                .get(RESERVATION_SEQ_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0),
        })
    }
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStats {
    pub reservation_count: u64,
    pub active_slot_count: u64,
    pub current_sequence: u64,
}
