//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity (桌台)
///
/// Immutable once the floor plan is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    /// Zone name this table belongs to
    pub zone: String,
    pub capacity: i32,
}

impl DiningTable {
    /// Whether a party of `party_count` fits at this table
    #[inline]
    pub fn fits(&self, party_count: i32) -> bool {
        party_count <= self.capacity
    }
}
