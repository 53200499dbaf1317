use sha2::{Digest, Sha256};

use crate::domain::{Entity, Issue, IssueCode, Severity};
use crate::pipeline::processing::columns::{detect_division, ColumnRoles};
use crate::pipeline::processing::consolidate::ConsolidatorConfig;
use crate::pipeline::processing::document::{fetch_value, DocumentStatus, ParsedDocument};
use crate::pipeline::processing::geography::normalize_country;

const MANUFACTURING_KEYWORDS: &[&str] = &["manufacturing", "plant", "factory"];
const OFFICE_KEYWORDS: &[&str] = &["office", "hq", "headquarters"];

/// Row-level findings accumulated across all documents, compiled into
/// roster-level issues after deduplication
#[derive(Debug, Default)]
pub struct RowObservations {
    /// Entity name and source row for every row lacking an explicit id
    pub missing_identifiers: Vec<(String, usize)>,
    /// Raw country value -> affected entity names, first-seen order
    pub unknown_countries: Vec<(String, Vec<String>)>,
    /// Verbose-but-mappable country label -> affected entity names
    pub non_iso_countries: Vec<(String, Vec<String>)>,
    pub missing_regions: Vec<String>,
    pub missing_types: Vec<String>,
}

impl RowObservations {
    fn note_country(target: &mut Vec<(String, Vec<String>)>, raw: &str, entity: &str) {
        match target.iter_mut().find(|(key, _)| key == raw) {
            Some((_, names)) => names.push(entity.to_string()),
            None => target.push((raw.to_string(), vec![entity.to_string()])),
        }
    }
}

/// Output of the extraction stage: raw (pre-dedup) entities, document-level
/// issues, and the row-level observation trackers
#[derive(Debug, Default)]
pub struct ExtractionOutcome {
    pub entities: Vec<Entity>,
    pub issues: Vec<Issue>,
    pub observations: RowObservations,
    pub documents_used: usize,
    pub documents_skipped: usize,
}

/// Walk every usable document in order and build one entity per named row.
/// Unusable documents are excluded with an issue; sentinel-named rows are
/// skipped silently.
pub fn extract_entities(docs: &[ParsedDocument], config: &ConsolidatorConfig) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();

    for doc in docs {
        let file = doc.file_name();
        let sheet = doc
            .sheet_name
            .clone()
            .unwrap_or_else(|| config.default_sheet_name.clone());

        if doc.status != DocumentStatus::Ok {
            outcome.issues.push(
                Issue::new(
                    IssueCode::InputUnusable,
                    doc.error
                        .clone()
                        .unwrap_or_else(|| "Input could not be parsed".to_string()),
                    Severity::Error,
                )
                .with_source(&file, &sheet, None)
                .with_recommendation(
                    "Re-export the sheet with a single header row and no merged cells",
                ),
            );
            outcome.documents_skipped += 1;
            continue;
        }

        let table = match &doc.table {
            Some(table) if !table.is_empty() => table,
            _ => {
                outcome.issues.push(
                    Issue::new(
                        IssueCode::EmptySheet,
                        format!("{} in {} contained no tabular data", sheet, file),
                        Severity::Warning,
                    )
                    .with_source(&file, &sheet, None),
                );
                outcome.documents_skipped += 1;
                continue;
            }
        };

        let roles = ColumnRoles::detect(&table.columns);
        let Some(name_col) = roles.name.as_deref() else {
            outcome.issues.push(
                Issue::new(
                    IssueCode::MissingNameColumn,
                    format!("Could not detect an entity name column in {} ({})", sheet, file),
                    Severity::Error,
                )
                .with_source(&file, &sheet, None)
                .with_recommendation("Add a column such as 'Facility Name' or 'Entity Name'"),
            );
            outcome.documents_skipped += 1;
            continue;
        };
        outcome.documents_used += 1;

        for (idx, row) in table.rows.iter().enumerate() {
            let Some(entity_name) = fetch_value(row, Some(name_col)) else {
                continue;
            };
            let source_row = idx + 2;

            let entity_identifier = fetch_value(row, roles.id.as_deref());
            let parent_identifier = fetch_value(row, roles.parent_id.as_deref());
            let parent_name = fetch_value(row, roles.parent_name.as_deref());
            let region = fetch_value(row, roles.region.as_deref());
            let country_raw = fetch_value(row, roles.country.as_deref());
            let entity_type = fetch_value(row, roles.entity_type.as_deref());
            let business_unit = fetch_value(row, roles.business_unit.as_deref());
            let division = detect_division(&table.columns, row);
            let facility_type =
                entity_type.or_else(|| infer_type_from_name(&entity_name).map(String::from));

            let normalized = normalize_country(country_raw.as_deref());
            if let Some(unmapped) = &normalized.unmapped {
                RowObservations::note_country(
                    &mut outcome.observations.unknown_countries,
                    unmapped,
                    &entity_name,
                );
            } else if let (Some(code), Some(raw)) = (&normalized.code, &country_raw) {
                if raw.to_uppercase() != *code {
                    RowObservations::note_country(
                        &mut outcome.observations.non_iso_countries,
                        raw,
                        &entity_name,
                    );
                }
            }

            if region.is_none() {
                outcome.observations.missing_regions.push(entity_name.clone());
            }
            if facility_type.is_none() {
                outcome.observations.missing_types.push(entity_name.clone());
            }

            let entity_id = entity_identifier
                .clone()
                .unwrap_or_else(|| make_entity_id(&entity_name));
            if entity_identifier.is_none() {
                outcome
                    .observations
                    .missing_identifiers
                    .push((entity_name.clone(), source_row));
            }

            let confidence = if entity_identifier.is_some() {
                config.identifier_confidence
            } else {
                config.inferred_confidence
            };

            outcome.entities.push(Entity {
                entity_id,
                entity_identifier,
                display_name: derive_display_name(
                    &entity_name,
                    business_unit.as_deref(),
                    division.as_deref(),
                ),
                name: entity_name,
                entity_type: facility_type.clone().unwrap_or_else(|| "Unknown".to_string()),
                region,
                country_raw,
                country_code: normalized.code,
                business_unit,
                division,
                facility_type,
                parent_id: parent_identifier,
                parent_name,
                source_file: file.clone(),
                source_sheet: sheet.clone(),
                source_row,
                confidence,
                is_user_verified: false,
            });
        }
    }

    outcome
}

/// Deterministic synthetic identifier: SHA-256 over the normalized name and
/// its raw length, truncated to a zero-padded 10-digit decimal. Stable
/// across processes, unlike a runtime hash.
pub fn make_entity_id(name: &str) -> String {
    let normalized = normalized_name_key(name);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hasher.update([0u8]);
    hasher.update(name.chars().count().to_string().as_bytes());
    let digest = hasher.finalize();
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[..8]);
    let numeric = u64::from_be_bytes(word) % 10_000_000_000;
    format!("ent-{:010}", numeric)
}

/// Lowercase the name and collapse every non-alphanumeric run to a single
/// dash, trimming dangling dashes
fn normalized_name_key(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Append business-unit/division qualifiers that are not already part of
/// the name
fn derive_display_name(name: &str, business_unit: Option<&str>, division: Option<&str>) -> String {
    let name_lower = name.to_lowercase();
    let mut parts = vec![name.to_string()];
    if let Some(bu) = business_unit {
        if !name_lower.contains(&bu.to_lowercase()) {
            parts.push(format!("[{}]", bu));
        }
    }
    if let Some(div) = division {
        if !name_lower.contains(&div.to_lowercase()) {
            parts.push(format!("[{}]", div));
        }
    }
    parts.join(" ")
}

/// Infer a facility type from name keywords when no explicit type column
/// value exists
fn infer_type_from_name(name: &str) -> Option<&'static str> {
    let lowered = name.to_lowercase();
    if MANUFACTURING_KEYWORDS.iter().any(|term| lowered.contains(term)) {
        return Some("Manufacturing");
    }
    if OFFICE_KEYWORDS.iter().any(|term| lowered.contains(term)) {
        return Some("Office");
    }
    if lowered.contains("distribution") {
        return Some("Distribution");
    }
    None
}
