use std::collections::{HashMap, HashSet};

use crate::domain::{BoundaryDecision, Entity, HierarchyEdge, Issue, IssueCode, Relationship, Severity};

const BOUNDARY_DEFAULT_REASON: &str = "Included by default; refine with control & ownership inputs";

/// Output of hierarchy and boundary resolution over the deduplicated roster
#[derive(Debug, Default)]
pub struct HierarchyResolution {
    pub boundary: Vec<BoundaryDecision>,
    pub edges: Vec<HierarchyEdge>,
    pub issues: Vec<Issue>,
}

/// Resolve parent references, flag unresolved ones, and propose the default
/// inclusion boundary. Every entity gets exactly one edge; an unresolved
/// reference still produces a `reports_to` edge pointing at the unmatched
/// id/name so the original intent survives for manual reconciliation.
pub fn resolve_hierarchy(entities: &[Entity]) -> HierarchyResolution {
    let mut resolution = HierarchyResolution::default();

    let ids: HashSet<&str> = entities.iter().map(|e| e.entity_id.as_str()).collect();
    let names: HashMap<String, &Entity> = entities
        .iter()
        .map(|e| (e.name.trim().to_lowercase(), e))
        .collect();

    for entity in entities {
        let parent_id = entity.parent_id.as_deref();
        let parent_name = entity.parent_name.as_deref();

        let parent_missing = if let Some(pid) = parent_id {
            !ids.contains(pid)
        } else if let Some(pname) = parent_name {
            !names.contains_key(&pname.trim().to_lowercase())
        } else {
            false
        };

        if parent_missing {
            let reference = parent_id.or(parent_name).unwrap_or_default();
            resolution.issues.push(
                Issue::new(
                    IssueCode::MissingParent,
                    format!("Parent reference for {} could not be matched", entity.name),
                    Severity::Warning,
                )
                .with_entity(&entity.name)
                .with_field("parent")
                .with_source(&entity.source_file, &entity.source_sheet, Some(entity.source_row))
                .with_recommendation("Provide a matching parent row or confirm the entity is standalone")
                .with_details(vec![reference.to_string()]),
            );
        }

        resolution.boundary.push(BoundaryDecision {
            entity_id: entity.entity_id.clone(),
            name: entity.name.clone(),
            in_boundary: true,
            reason: BOUNDARY_DEFAULT_REASON.to_string(),
            parent_id: entity.parent_id.clone(),
            parent_name: entity.parent_name.clone(),
            country_code: entity.country_code.clone(),
            region: entity.region.clone(),
        });

        resolution.edges.push(HierarchyEdge {
            entity_id: entity.entity_id.clone(),
            parent_id: entity.parent_id.clone(),
            parent_name: entity.parent_name.clone(),
            relationship: if parent_id.is_some() || parent_name.is_some() {
                Relationship::ReportsTo
            } else {
                Relationship::Root
            },
        });
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, name: &str, parent_id: Option<&str>, parent_name: Option<&str>) -> Entity {
        Entity {
            entity_id: id.to_string(),
            entity_identifier: Some(id.to_string()),
            name: name.to_string(),
            display_name: name.to_string(),
            entity_type: "Unknown".to_string(),
            region: None,
            country_raw: None,
            country_code: None,
            business_unit: None,
            division: None,
            facility_type: None,
            parent_id: parent_id.map(String::from),
            parent_name: parent_name.map(String::from),
            source_file: "orgs.xlsx".to_string(),
            source_sheet: "Sheet1".to_string(),
            source_row: 2,
            confidence: 0.92,
            is_user_verified: false,
        }
    }

    #[test]
    fn test_every_entity_gets_exactly_one_edge() {
        let entities = vec![
            entity("HQ", "Holding", None, None),
            entity("A", "Alpha", Some("HQ"), None),
            entity("B", "Beta", None, Some("Holding")),
        ];
        let resolution = resolve_hierarchy(&entities);
        assert_eq!(resolution.edges.len(), entities.len());
        assert_eq!(resolution.boundary.len(), entities.len());
        assert_eq!(resolution.edges[0].relationship, Relationship::Root);
        assert_eq!(resolution.edges[1].relationship, Relationship::ReportsTo);
        assert_eq!(resolution.edges[2].relationship, Relationship::ReportsTo);
        assert!(resolution.issues.is_empty());
    }

    #[test]
    fn test_parent_name_matches_case_insensitively() {
        let entities = vec![
            entity("HQ", "Holding Company", None, None),
            entity("A", "Alpha", None, Some("holding company")),
        ];
        let resolution = resolve_hierarchy(&entities);
        assert!(resolution.issues.is_empty());
    }

    #[test]
    fn test_unresolved_parent_keeps_edge_and_warns() {
        let entities = vec![entity("A", "Alpha", None, Some("NoSuchParent"))];
        let resolution = resolve_hierarchy(&entities);

        assert_eq!(resolution.issues.len(), 1);
        let issue = &resolution.issues[0];
        assert_eq!(issue.code, IssueCode::MissingParent);
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.details, vec!["NoSuchParent".to_string()]);

        let edge = &resolution.edges[0];
        assert_eq!(edge.relationship, Relationship::ReportsTo);
        assert_eq!(edge.parent_name.as_deref(), Some("NoSuchParent"));
    }

    #[test]
    fn test_boundary_includes_unresolved_entities() {
        let entities = vec![entity("A", "Alpha", Some("missing-id"), None)];
        let resolution = resolve_hierarchy(&entities);
        assert_eq!(resolution.issues.len(), 1);
        assert!(resolution.boundary[0].in_boundary);
        assert_eq!(resolution.boundary[0].reason, BOUNDARY_DEFAULT_REASON);
    }

    #[test]
    fn test_parent_id_checked_before_parent_name() {
        // an unresolvable parent_id is missing even if the name would match
        let entities = vec![
            entity("HQ", "Holding", None, None),
            entity("A", "Alpha", Some("nope"), Some("Holding")),
        ];
        let resolution = resolve_hierarchy(&entities);
        assert_eq!(resolution.issues.len(), 1);
    }
}
