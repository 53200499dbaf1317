use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{BoundaryDecision, Entity, HierarchyEdge, Issue, CANONICAL_ENTITY_COLUMNS};

pub const BOUNDARY_COLUMNS: &[&str] = &[
    "entity_id",
    "name",
    "in_boundary",
    "reason",
    "parent_id",
    "parent_name",
    "country_code",
    "region",
];

pub const ISSUE_COLUMNS: &[&str] = &[
    "code",
    "message",
    "severity",
    "entity",
    "field",
    "source_file",
    "source_sheet",
    "source_row",
    "recommendation",
    "details",
];

pub const HIERARCHY_COLUMNS: &[&str] = &["entity_id", "parent_id", "parent_name", "relationship"];

/// A fixed-schema tabular projection ready for a downstream writer. Width is
/// constant: missing fields are nulls, and an empty table still carries its
/// header so writers never receive a schema-less result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    fn from_records<T: Serialize>(columns: &[&str], records: &[T]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                // domain types serialize to objects, so this cannot fail
                let value = serde_json::to_value(record).unwrap_or(Value::Null);
                columns
                    .iter()
                    .map(|col| value.get(col).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The four export projections consumed by reporting/export collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub entities: DataTable,
    pub boundary: DataTable,
    pub issues: DataTable,
    pub hierarchy: DataTable,
}

pub fn build_exports(
    entities: &[Entity],
    boundary: &[BoundaryDecision],
    issues: &[Issue],
    hierarchy: &[HierarchyEdge],
) -> ExportBundle {
    ExportBundle {
        entities: DataTable::from_records(CANONICAL_ENTITY_COLUMNS, entities),
        boundary: DataTable::from_records(BOUNDARY_COLUMNS, boundary),
        issues: DataTable::from_records(ISSUE_COLUMNS, issues),
        hierarchy: DataTable::from_records(HIERARCHY_COLUMNS, hierarchy),
    }
}
