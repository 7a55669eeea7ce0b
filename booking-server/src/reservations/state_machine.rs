//! Reservation status transitions
//!
//! | From | To | Effect |
//! |------|----|--------|
//! | pending | confirmed | records the confirming actor |
//! | pending | cancelled | frees the slot |
//! | confirmed | cancelled | frees the slot |
//! | cancelled | pending | reopens; occupancy is **not** re-checked |
//!
//! Every other pair, self-transitions included, is denied.

use shared::reservation::ReservationStatus;

/// Outcome of consulting the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Allowed(ReservationStatus),
    Denied {
        from: ReservationStatus,
        to: ReservationStatus,
    },
}

impl Transition {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Transition::Allowed(_))
    }
}

/// Pure transition function consulted by every write path
pub fn next_status(current: ReservationStatus, requested: ReservationStatus) -> Transition {
    use ReservationStatus::*;

    match (current, requested) {
        (Pending, Confirmed)
        | (Pending, Cancelled)
        | (Confirmed, Cancelled)
        | (Cancelled, Pending) => Transition::Allowed(requested),
        (from, to) => Transition::Denied { from, to },
    }
}

/// Effect of a transition on the active-slot index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyChange {
    /// inactive → active (reopen)
    Claim,
    /// active → inactive (cancel)
    Release,
    Keep,
}

pub fn occupancy_change(from: ReservationStatus, to: ReservationStatus) -> OccupancyChange {
    match (from.is_active(), to.is_active()) {
        (false, true) => OccupancyChange::Claim,
        (true, false) => OccupancyChange::Release,
        _ => OccupancyChange::Keep,
    }
}
