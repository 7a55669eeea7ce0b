//! Reservation Ledger - 预订账本
//!
//! # Module Structure
//!
//! ```text
//! reservations/
//! ├── storage.rs        # redb tables: ledger records + occupancy index
//! ├── slot.rs           # SlotKey and the per-slot lock table
//! ├── state_machine.rs  # pending / confirmed / cancelled transitions
//! ├── availability.rs   # Snapshot reads over the occupancy index
//! └── manager/          # ReservationManager: create, change_status, remove
//! ```
//!
//! A slot `(table_id, date, time)` is *occupied* while it holds a pending or
//! confirmed reservation. The manager guarantees at most one active
//! reservation per slot on the create path; the availability engine reads
//! committed snapshots and never takes a slot lock.

pub mod availability;
pub mod manager;
pub mod slot;
pub mod state_machine;
pub mod storage;

pub use availability::AvailabilityEngine;
pub use manager::{BookingPolicy, ManagerResult, ReservationError, ReservationManager, ValidationKind};
pub use slot::{SlotKey, SlotLocks};
pub use state_machine::{OccupancyChange, Transition, next_status};
pub use storage::{ReservationStorage, StorageError, StorageResult, StorageStats};
