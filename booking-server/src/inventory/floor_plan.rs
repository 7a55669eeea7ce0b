//! Floor plan file (zones, tables, operating hours)
//!
//! ```json
//! {
//!   "zones": [{ "name": "Terraza" }],
//!   "tables": [{ "id": 1, "name": "T1", "zone": "Terraza", "capacity": 4 }],
//!   "calendar": {
//!     "slot_interval_minutes": 30,
//!     "days": [{ "weekday": "Mon", "services": [{ "open": "19:00", "close": "23:00" }] }],
//!     "closed_dates": ["2025-12-25"]
//!   }
//! }
//! ```

use super::InventoryRegistry;
use crate::calendar::{CalendarConfig, CalendarError, SlotCalendar};
use serde::{Deserialize, Serialize};
use shared::models::{DiningTable, Zone};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FloorPlanError {
    #[error("Failed to read floor plan: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse floor plan: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Zone '{0}' is defined more than once")]
    DuplicateZone(String),

    #[error("Table {0} is defined more than once")]
    DuplicateTable(i64),

    #[error("Table {table_id} references unknown zone '{zone}'")]
    UnknownZone { table_id: i64, zone: String },

    #[error("Table {table_id} has invalid capacity {capacity}")]
    InvalidCapacity { table_id: i64, capacity: i32 },

    #[error("Invalid calendar: {0}")]
    Calendar(#[from] CalendarError),
}

/// Raw floor plan as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlan {
    pub zones: Vec<Zone>,
    pub tables: Vec<DiningTable>,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl FloorPlan {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FloorPlanError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load from `path`, falling back to the built-in plan when the file
    /// does not exist. Any other failure is returned.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, FloorPlanError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Floor plan not found, using built-in default"
            );
            return Ok(Self::default());
        }
        let plan = Self::load(path)?;
        tracing::info!(
            path = %path.display(),
            zones = plan.zones.len(),
            tables = plan.tables.len(),
            "Floor plan loaded"
        );
        Ok(plan)
    }

    /// Validate and split into the registry and the calendar
    pub fn build(self) -> Result<(InventoryRegistry, SlotCalendar), FloorPlanError> {
        let calendar = SlotCalendar::from_config(&self.calendar)?;
        let registry = InventoryRegistry::new(self.zones, self.tables)?;
        Ok((registry, calendar))
    }
}

impl Default for FloorPlan {
    /// 两个区域：Salón (室内) 与 Terraza (露台)
    fn default() -> Self {
        let zone = |name: &str, description: &str| Zone {
            name: name.to_string(),
            description: Some(description.to_string()),
        };
        let table = |id: i64, zone: &str, capacity: i32| DiningTable {
            id,
            name: format!("Mesa {id}"),
            zone: zone.to_string(),
            capacity,
        };

        Self {
            zones: vec![
                zone("Salón", "Indoor dining room"),
                zone("Terraza", "Outdoor terrace"),
            ],
            tables: vec![
                table(1, "Terraza", 4),
                table(2, "Terraza", 2),
                table(3, "Terraza", 6),
                table(4, "Salón", 4),
                table(5, "Salón", 2),
                table(6, "Salón", 8),
            ],
            calendar: CalendarConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_builds() {
        let (registry, calendar) = FloorPlan::default().build().unwrap();
        assert_eq!(registry.table_count(), 6);
        assert_eq!(registry.table_ids_in_zone("Terraza"), &[1, 2, 3]);
        assert_eq!(calendar.interval_minutes(), 30);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor_plan.json");
        std::fs::write(
            &path,
            r#"{
                "zones": [{"name": "Terraza"}],
                "tables": [{"id": 1, "name": "T1", "zone": "Terraza", "capacity": 4}],
                "calendar": {
                    "slot_interval_minutes": 60,
                    "days": [{"weekday": "Mon", "services": [{"open": "19:00", "close": "21:00"}]}]
                }
            }"#,
        )
        .unwrap();

        let (registry, calendar) = FloorPlan::load_or_default(&path).unwrap().build().unwrap();
        assert_eq!(registry.get_table(1).unwrap().zone, "Terraza");
        assert_eq!(calendar.interval_minutes(), 60);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let plan = FloorPlan::load_or_default(dir.path().join("absent.json")).unwrap();
        assert_eq!(plan.tables.len(), 6);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor_plan.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FloorPlan::load_or_default(&path),
            Err(FloorPlanError::Parse(_))
        ));
    }
}
