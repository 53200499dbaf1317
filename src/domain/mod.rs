use serde::{Deserialize, Serialize};

/// A canonical organizational unit (facility, subsidiary, division) after
/// consolidation across all supplied documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier: the supplied identifier when present, otherwise a
    /// deterministic hash derived from the normalized name
    pub entity_id: String,
    /// Raw supplied identifier, if the source carried one
    pub entity_identifier: Option<String>,
    pub name: String,
    /// Name augmented with business-unit/division qualifiers when they are
    /// not already substrings of the name itself
    pub display_name: String,
    /// Facility type or "Unknown" when neither explicit nor inferable
    #[serde(rename = "type")]
    pub entity_type: String,
    pub region: Option<String>,
    pub country_raw: Option<String>,
    /// ISO-3166 alpha-2 code, when the raw country value normalized
    pub country_code: Option<String>,
    pub business_unit: Option<String>,
    pub division: Option<String>,
    pub facility_type: Option<String>,
    pub parent_id: Option<String>,
    pub parent_name: Option<String>,
    pub source_file: String,
    pub source_sheet: String,
    /// 1-based spreadsheet row, accounting for the header row
    pub source_row: usize,
    pub confidence: f64,
    /// Always false at creation; user verification is an external mutation
    pub is_user_verified: bool,
}

/// Proposed boundary membership for a single entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryDecision {
    pub entity_id: String,
    pub name: String,
    pub in_boundary: bool,
    pub reason: String,
    pub parent_id: Option<String>,
    pub parent_name: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
}

/// A single parent-reference record; one per entity, forming a forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyEdge {
    pub entity_id: String,
    pub parent_id: Option<String>,
    pub parent_name: Option<String>,
    pub relationship: Relationship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// No parent reference exists at all
    Root,
    /// A parent reference exists, even if it failed to resolve
    ReportsTo,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Root => "root",
            Relationship::ReportsTo => "reports_to",
        }
    }
}

/// Data-quality finding. Issues are append-only observations, never errors
/// raised to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Bounded sample of affected entity names/files; capped so issue
    /// payload size is independent of roster size
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<String>,
}

impl Issue {
    pub fn new(code: IssueCode, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code,
            message: message.into(),
            severity,
            entity: None,
            field: None,
            source_file: None,
            source_sheet: None,
            source_row: None,
            recommendation: None,
            details: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_source(
        mut self,
        file: impl Into<String>,
        sheet: impl Into<String>,
        row: Option<usize>,
    ) -> Self {
        self.source_file = Some(file.into());
        self.source_sheet = Some(sheet.into());
        self.source_row = row;
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Typed issue codes covering the document-, row-, and roster-level taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InputUnusable,
    EmptySheet,
    MissingNameColumn,
    DuplicateEntityId,
    DuplicateEntityName,
    MissingEntityIdentifier,
    CountryNormalization,
    CountryStandardization,
    MissingRegion,
    MissingFacilityType,
    MissingParent,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::InputUnusable => "input_unusable",
            IssueCode::EmptySheet => "empty_sheet",
            IssueCode::MissingNameColumn => "missing_name_column",
            IssueCode::DuplicateEntityId => "duplicate_entity_id",
            IssueCode::DuplicateEntityName => "duplicate_entity_name",
            IssueCode::MissingEntityIdentifier => "missing_entity_identifier",
            IssueCode::CountryNormalization => "country_normalization",
            IssueCode::CountryStandardization => "country_standardization",
            IssueCode::MissingRegion => "missing_region",
            IssueCode::MissingFacilityType => "missing_facility_type",
            IssueCode::MissingParent => "missing_parent",
        }
    }
}

/// Severity levels for data-quality issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// Fixed entity export schema; every export row carries exactly these
/// columns, with nulls filling missing fields
pub const CANONICAL_ENTITY_COLUMNS: &[&str] = &[
    "entity_id",
    "entity_identifier",
    "name",
    "display_name",
    "type",
    "region",
    "country_raw",
    "country_code",
    "business_unit",
    "division",
    "facility_type",
    "parent_id",
    "parent_name",
    "source_file",
    "source_sheet",
    "source_row",
    "confidence",
    "is_user_verified",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_serializes_type_field() {
        let entity = Entity {
            entity_id: "ent-0000000001".to_string(),
            entity_identifier: None,
            name: "Acme Plant".to_string(),
            display_name: "Acme Plant".to_string(),
            entity_type: "Manufacturing".to_string(),
            region: None,
            country_raw: None,
            country_code: None,
            business_unit: None,
            division: None,
            facility_type: Some("Manufacturing".to_string()),
            parent_id: None,
            parent_name: None,
            source_file: "sites.xlsx".to_string(),
            source_sheet: "Sheet1".to_string(),
            source_row: 2,
            confidence: 0.85,
            is_user_verified: false,
        };

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "Manufacturing");
        assert!(json.get("entity_type").is_none());
    }

    #[test]
    fn test_issue_codes_render_snake_case() {
        assert_eq!(IssueCode::MissingNameColumn.as_str(), "missing_name_column");
        let json = serde_json::to_value(IssueCode::DuplicateEntityId).unwrap();
        assert_eq!(json, "duplicate_entity_id");
    }

    #[test]
    fn test_issue_omits_empty_optional_fields() {
        let issue = Issue::new(IssueCode::EmptySheet, "empty", Severity::Warning);
        let json = serde_json::to_value(&issue).unwrap();
        assert!(json.get("entity").is_none());
        assert!(json.get("details").is_none());
        assert_eq!(json["severity"], "warning");
    }

    #[test]
    fn test_canonical_schema_is_eighteen_columns() {
        assert_eq!(CANONICAL_ENTITY_COLUMNS.len(), 18);
    }
}
