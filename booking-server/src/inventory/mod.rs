//! Inventory Registry - 区域与桌台目录
//!
//! Read-only after start-up. The registry is built from a [`FloorPlan`]
//! and validated once; every lookup afterwards is infallible except for
//! "not found".

mod floor_plan;

pub use floor_plan::{FloorPlan, FloorPlanError};

use shared::models::{DiningTable, Zone};
use std::collections::{BTreeMap, HashMap};

/// Static catalog of zones and tables
#[derive(Debug, Clone)]
pub struct InventoryRegistry {
    zones: Vec<Zone>,
    /// Keyed by id, so iteration is ascending
    tables: BTreeMap<i64, DiningTable>,
    /// Zone name → table ids (ascending)
    by_zone: HashMap<String, Vec<i64>>,
}

impl InventoryRegistry {
    /// Build the registry, rejecting duplicate ids, unknown zones and
    /// non-positive capacities
    pub fn new(zones: Vec<Zone>, tables: Vec<DiningTable>) -> Result<Self, FloorPlanError> {
        let mut by_zone: HashMap<String, Vec<i64>> = HashMap::new();
        for zone in &zones {
            if by_zone.insert(zone.name.clone(), Vec::new()).is_some() {
                return Err(FloorPlanError::DuplicateZone(zone.name.clone()));
            }
        }

        let mut by_id = BTreeMap::new();
        for table in tables {
            if table.capacity < 1 {
                return Err(FloorPlanError::InvalidCapacity {
                    table_id: table.id,
                    capacity: table.capacity,
                });
            }
            let Some(ids) = by_zone.get_mut(&table.zone) else {
                return Err(FloorPlanError::UnknownZone {
                    table_id: table.id,
                    zone: table.zone,
                });
            };
            let id = table.id;
            if by_id.insert(id, table).is_some() {
                return Err(FloorPlanError::DuplicateTable(id));
            }
            ids.push(id);
        }

        for ids in by_zone.values_mut() {
            ids.sort_unstable();
        }

        Ok(Self {
            zones,
            tables: by_id,
            by_zone,
        })
    }

    /// Every table, ascending by id
    pub fn list_tables(&self) -> Vec<DiningTable> {
        self.tables.values().cloned().collect()
    }

    pub fn get_table(&self, id: i64) -> Option<&DiningTable> {
        self.tables.get(&id)
    }

    pub fn list_zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn has_zone(&self, zone: &str) -> bool {
        self.by_zone.contains_key(zone)
    }

    /// Table ids of `zone`, ascending; unknown zone yields an empty slice
    pub fn table_ids_in_zone(&self, zone: &str) -> &[i64] {
        self.by_zone.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tables of `zone`, ascending by id
    pub fn tables_in_zone(&self, zone: &str) -> Vec<DiningTable> {
        self.table_ids_in_zone(zone)
            .iter()
            .filter_map(|id| self.tables.get(id).cloned())
            .collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str) -> Zone {
        Zone {
            name: name.to_string(),
            description: None,
        }
    }

    fn table(id: i64, zone: &str, capacity: i32) -> DiningTable {
        DiningTable {
            id,
            name: format!("T{id}"),
            zone: zone.to_string(),
            capacity,
        }
    }

    fn registry() -> InventoryRegistry {
        InventoryRegistry::new(
            vec![zone("Terraza"), zone("Salón"), zone("Privado")],
            vec![
                table(3, "Terraza", 2),
                table(1, "Terraza", 4),
                table(2, "Salón", 6),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_list_tables_ascending() {
        let ids: Vec<i64> = registry().list_tables().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_get_table() {
        let reg = registry();
        assert_eq!(reg.get_table(1).unwrap().capacity, 4);
        assert!(reg.get_table(99).is_none());
    }

    #[test]
    fn test_tables_in_zone() {
        let reg = registry();
        assert_eq!(reg.table_ids_in_zone("Terraza"), &[1, 3]);
        assert!(reg.table_ids_in_zone("Privado").is_empty());
        assert!(reg.table_ids_in_zone("Nowhere").is_empty());
        assert!(reg.has_zone("Privado"));
        assert!(!reg.has_zone("Nowhere"));
    }

    #[test]
    fn test_rejects_bad_inventory() {
        let err = InventoryRegistry::new(
            vec![zone("Terraza")],
            vec![table(1, "Terraza", 4), table(1, "Terraza", 2)],
        )
        .unwrap_err();
        assert!(matches!(err, FloorPlanError::DuplicateTable(1)));

        let err =
            InventoryRegistry::new(vec![zone("Terraza")], vec![table(1, "Salón", 4)]).unwrap_err();
        assert!(matches!(err, FloorPlanError::UnknownZone { table_id: 1, .. }));

        let err =
            InventoryRegistry::new(vec![zone("Terraza")], vec![table(1, "Terraza", 0)]).unwrap_err();
        assert!(matches!(
            err,
            FloorPlanError::InvalidCapacity {
                table_id: 1,
                capacity: 0
            }
        ));

        let err = InventoryRegistry::new(vec![zone("A"), zone("A")], vec![]).unwrap_err();
        assert!(matches!(err, FloorPlanError::DuplicateZone(_)));
    }
}
