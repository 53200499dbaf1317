use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BoundaryDecision, Entity, HierarchyEdge, Issue};
use crate::pipeline::processing::document::ParsedDocument;
use crate::pipeline::processing::export::ExportBundle;
use crate::pipeline::processing::{dedupe, export, extract, hierarchy, report};

/// Configuration for the consolidation pipeline
#[derive(Debug, Clone)]
pub struct ConsolidatorConfig {
    /// Sheet name assumed when the upstream parser supplied none
    pub default_sheet_name: String,
    /// Confidence assigned when an explicit identifier was present
    pub identifier_confidence: f64,
    /// Confidence assigned when the identifier was synthesized
    pub inferred_confidence: f64,
    /// Detail cap for duplicate id/name issue samples
    pub duplicate_detail_cap: usize,
    /// Detail cap for all other issue samples
    pub sample_detail_cap: usize,
}

impl Default for ConsolidatorConfig {
    fn default() -> Self {
        Self {
            default_sheet_name: "Sheet1".to_string(),
            identifier_confidence: 0.92,
            inferred_confidence: 0.85,
            duplicate_detail_cap: 5,
            sample_detail_cap: 8,
        }
    }
}

/// Per-run bookkeeping stamped onto every result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationRun {
    pub run_id: Uuid,
    pub consolidated_at: DateTime<Utc>,
    pub documents_processed: usize,
    pub documents_skipped: usize,
}

/// Complete output of one consolidation pass: the canonical roster, the
/// proposed boundary, the hierarchy forest, the data-quality review, and
/// export-ready tabular projections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationResult {
    pub entities: Vec<Entity>,
    pub boundary: Vec<BoundaryDecision>,
    pub hierarchy: Vec<HierarchyEdge>,
    pub issues: Vec<Issue>,
    pub narrative: String,
    pub recommendations: Vec<String>,
    pub exports: ExportBundle,
    pub run: ConsolidationRun,
}

/// Trait for consolidating parsed documents into a canonical structure
pub trait Consolidator {
    fn consolidate(&self, docs: &[ParsedDocument]) -> anyhow::Result<ConsolidationResult>;
}

/// Default implementation running the five stages in strict sequence:
/// extraction, deduplication, hierarchy/boundary resolution, issue
/// compilation, export projection. Degrades gracefully; it records issues
/// instead of failing.
pub struct DefaultConsolidator {
    pub config: ConsolidatorConfig,
}

impl DefaultConsolidator {
    pub fn new() -> Self {
        Self {
            config: ConsolidatorConfig::default(),
        }
    }

    pub fn with_config(config: ConsolidatorConfig) -> Self {
        Self { config }
    }
}

impl Default for DefaultConsolidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Consolidator for DefaultConsolidator {
    fn consolidate(&self, docs: &[ParsedDocument]) -> anyhow::Result<ConsolidationResult> {
        let extraction = extract::extract_entities(docs, &self.config);

        // Document-level issues come first, then row/field-level findings,
        // then roster-level aggregates
        let mut issues = extraction.issues;

        let (entities, duplicates) = dedupe::dedupe(extraction.entities);

        let resolution = hierarchy::resolve_hierarchy(&entities);
        issues.extend(resolution.issues);

        issues.extend(report::compile_quality_issues(
            &duplicates,
            &extraction.observations,
            &self.config,
        ));

        let narrative = report::generate_narrative(&entities, &issues);
        let recommendations = report::generate_recommendations(&issues);
        let exports = export::build_exports(&entities, &resolution.boundary, &issues, &resolution.edges);

        Ok(ConsolidationResult {
            entities,
            boundary: resolution.boundary,
            hierarchy: resolution.edges,
            issues,
            narrative,
            recommendations,
            exports,
            run: ConsolidationRun {
                run_id: Uuid::new_v4(),
                consolidated_at: Utc::now(),
                documents_processed: extraction.documents_used,
                documents_skipped: extraction.documents_skipped,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::document::TabularBlock;
    use serde_json::json;

    fn doc(path: &str, columns: &[&str], rows: Vec<Vec<serde_json::Value>>) -> ParsedDocument {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|values| {
                columns
                    .iter()
                    .cloned()
                    .zip(values.into_iter())
                    .collect::<serde_json::Map<String, serde_json::Value>>()
            })
            .collect();
        ParsedDocument::ok(path, None, TabularBlock::new(columns, rows))
    }

    #[test]
    fn test_consolidate_links_all_stages() {
        let docs = vec![doc(
            "org.xlsx",
            &["Entity Name", "Entity ID", "Parent ID", "Country", "Region"],
            vec![
                vec![json!("Holding"), json!("HQ"), json!(null), json!("US"), json!("AMER")],
                vec![json!("Alpha Plant"), json!("A1"), json!("HQ"), json!("France"), json!("EMEA")],
            ],
        )];

        let result = DefaultConsolidator::new().consolidate(&docs).unwrap();
        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.hierarchy.len(), result.entities.len());
        assert_eq!(result.boundary.len(), result.entities.len());
        assert!(result.boundary.iter().all(|b| b.in_boundary));
        assert_eq!(result.run.documents_processed, 1);
        assert_eq!(result.run.documents_skipped, 0);
        assert_eq!(result.exports.entities.rows.len(), 2);
    }

    #[test]
    fn test_issue_order_is_document_then_row_then_roster() {
        let docs = vec![
            ParsedDocument::failed("broken.xlsx", None, "unreadable"),
            doc(
                "org.xlsx",
                &["Entity Name", "Parent"],
                vec![vec![json!("Alpha"), json!("NoSuchParent")]],
            ),
        ];
        let result = DefaultConsolidator::new().consolidate(&docs).unwrap();
        let codes: Vec<&str> = result.issues.iter().map(|i| i.code.as_str()).collect();
        let doc_pos = codes.iter().position(|c| *c == "input_unusable").unwrap();
        let row_pos = codes.iter().position(|c| *c == "missing_parent").unwrap();
        let roster_pos = codes.iter().position(|c| *c == "missing_entity_identifier").unwrap();
        assert!(doc_pos < row_pos && row_pos < roster_pos);
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let docs = vec![doc(
            "org.xlsx",
            &["Entity Name", "Country"],
            vec![
                vec![json!("Alpha Plant"), json!("France")],
                vec![json!("Beta Office"), json!("Atlantis")],
            ],
        )];
        let consolidator = DefaultConsolidator::new();
        let first = consolidator.consolidate(&docs).unwrap();
        let second = consolidator.consolidate(&docs).unwrap();

        let ids = |result: &ConsolidationResult| {
            result.entities.iter().map(|e| e.entity_id.clone()).collect::<Vec<_>>()
        };
        let codes = |result: &ConsolidationResult| {
            result.issues.iter().map(|i| i.code).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(codes(&first), codes(&second));
        assert_eq!(first.entities.len(), second.entities.len());
    }
}
