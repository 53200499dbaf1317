use std::collections::{BTreeSet, HashSet};

use crate::domain::{Entity, Issue, IssueCode, Severity};
use crate::pipeline::processing::consolidate::ConsolidatorConfig;
use crate::pipeline::processing::dedupe::DuplicateReport;
use crate::pipeline::processing::extract::RowObservations;

/// Aggregate the row-level observations and duplicate findings into
/// roster-level issues, with detail samples capped so payload size stays
/// independent of roster size
pub fn compile_quality_issues(
    duplicates: &DuplicateReport,
    observations: &RowObservations,
    config: &ConsolidatorConfig,
) -> Vec<Issue> {
    let mut compiled = Vec::new();

    if !duplicates.duplicate_ids.is_empty() {
        compiled.push(
            Issue::new(
                IssueCode::DuplicateEntityId,
                format!(
                    "Detected {} duplicate entity identifiers across uploads",
                    duplicates.duplicate_ids.len()
                ),
                Severity::Warning,
            )
            .with_recommendation(
                "Ensure each facility or legal entity has a unique identifier before aggregation",
            )
            .with_details(keyed_file_details(&duplicates.duplicate_ids, config.duplicate_detail_cap)),
        );
    }

    if !duplicates.duplicate_names.is_empty() {
        compiled.push(
            Issue::new(
                IssueCode::DuplicateEntityName,
                format!(
                    "{} entity names are repeated across files",
                    duplicates.duplicate_names.len()
                ),
                Severity::Info,
            )
            .with_recommendation(
                "Clarify whether repeated names represent distinct sites or duplicate entries",
            )
            .with_details(keyed_file_details(
                &duplicates.duplicate_names,
                config.duplicate_detail_cap,
            )),
        );
    }

    if !observations.missing_identifiers.is_empty() {
        compiled.push(
            Issue::new(
                IssueCode::MissingEntityIdentifier,
                format!(
                    "{} rows are missing an explicit facility/entity identifier",
                    observations.missing_identifiers.len()
                ),
                Severity::Warning,
            )
            .with_recommendation("Provide a stable ID column (e.g., Facility ID) to support traceability")
            .with_details(
                observations
                    .missing_identifiers
                    .iter()
                    .take(config.sample_detail_cap)
                    .map(|(name, row)| format!("{} (row {})", name, row))
                    .collect(),
            ),
        );
    }

    if !observations.unknown_countries.is_empty() {
        let total: usize = observations.unknown_countries.iter().map(|(_, v)| v.len()).sum();
        compiled.push(
            Issue::new(
                IssueCode::CountryNormalization,
                format!("{} facilities use country values that could not be mapped to ISO-3166", total),
                Severity::Warning,
            )
            .with_recommendation(
                "Standardize country inputs (e.g., use ISO alpha-2 codes or consistent names)",
            )
            .with_details(
                observations
                    .unknown_countries
                    .iter()
                    .take(config.sample_detail_cap)
                    .map(|(raw, _)| raw.clone())
                    .collect(),
            ),
        );
    }

    if !observations.non_iso_countries.is_empty() {
        let total: usize = observations.non_iso_countries.iter().map(|(_, v)| v.len()).sum();
        compiled.push(
            Issue::new(
                IssueCode::CountryStandardization,
                format!("{} facilities use verbose country labels; ISO-2 equivalents inferred", total),
                Severity::Info,
            )
            .with_recommendation(
                "Store ISO-2 country codes alongside descriptive labels to prevent downstream ambiguity",
            )
            .with_details(
                observations
                    .non_iso_countries
                    .iter()
                    .take(config.sample_detail_cap)
                    .map(|(raw, _)| raw.clone())
                    .collect(),
            ),
        );
    }

    if !observations.missing_regions.is_empty() {
        compiled.push(
            Issue::new(
                IssueCode::MissingRegion,
                format!("{} facilities have no region assigned", observations.missing_regions.len()),
                Severity::Info,
            )
            .with_recommendation("Populate regional groupings (e.g., AMER, EMEA) to support roll-ups")
            .with_details(
                observations
                    .missing_regions
                    .iter()
                    .take(config.sample_detail_cap)
                    .cloned()
                    .collect(),
            ),
        );
    }

    if !observations.missing_types.is_empty() {
        compiled.push(
            Issue::new(
                IssueCode::MissingFacilityType,
                format!(
                    "{} facilities are missing facility type information",
                    observations.missing_types.len()
                ),
                Severity::Info,
            )
            .with_recommendation(
                "Provide facility type (Manufacturing, Distribution, Office, etc.) for boundary governance",
            )
            .with_details(
                observations
                    .missing_types
                    .iter()
                    .take(config.sample_detail_cap)
                    .cloned()
                    .collect(),
            ),
        );
    }

    compiled
}

fn keyed_file_details(entries: &[(String, Vec<String>)], cap: usize) -> Vec<String> {
    entries
        .iter()
        .take(cap)
        .map(|(key, files)| {
            let unique: BTreeSet<&String> = files.iter().collect();
            let listed: Vec<&str> = unique.into_iter().map(String::as_str).collect();
            format!("{}: {:?}", key, listed)
        })
        .collect()
}

/// Fixed-template summary of the consolidated roster and its review findings
pub fn generate_narrative(entities: &[Entity], issues: &[Issue]) -> String {
    if entities.is_empty() {
        return "No entities could be consolidated from the supplied documents.".to_string();
    }

    let countries: HashSet<&str> = entities
        .iter()
        .filter_map(|e| e.country_code.as_deref())
        .collect();
    let regions: HashSet<&str> = entities.iter().filter_map(|e| e.region.as_deref()).collect();

    let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
    let warnings = issues.iter().filter(|i| i.severity == Severity::Warning).count();
    let infos = issues.iter().filter(|i| i.severity == Severity::Info).count();

    let type_summary = facility_type_summary(entities, 3)
        .unwrap_or_else(|| "facility mix not yet classified".to_string());

    [
        format!(
            "Consolidated {} unique entities spanning {} countries and {} regions.",
            entities.len(),
            countries.len(),
            regions.len()
        ),
        format!("Top facility mix: {}.", type_summary),
        "Initial boundary includes all entities; tune inclusion with ownership/control once supplied."
            .to_string(),
        format!(
            "Data quality review flagged {} errors, {} warnings, and {} informational notes.",
            errors, warnings, infos
        ),
    ]
    .join(" ")
}

/// Top-N facility types by frequency, first-seen order breaking ties
fn facility_type_summary(entities: &[Entity], top: usize) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for entity in entities {
        let Some(ftype) = entity.facility_type.as_deref() else {
            continue;
        };
        match counts.iter_mut().find(|(name, _)| name == ftype) {
            Some((_, count)) => *count += 1,
            None => counts.push((ftype.to_string(), 1)),
        }
    }
    if counts.is_empty() {
        return None;
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Some(
        counts
            .iter()
            .take(top)
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Static baseline recommendations plus conditional additions keyed off the
/// issue codes actually observed
pub fn generate_recommendations(issues: &[Issue]) -> Vec<String> {
    let mut recs: Vec<String> = [
        "Provide ownership percentages and control type (financial vs operational) per entity",
        "Confirm reporting currency, consolidation method, and excluded entities with rationale",
        "Publish ISO-2 country codes alongside descriptive labels to unblock downstream analytics",
        "Upload latest legal entity register and org charts to improve hierarchical accuracy",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let codes: HashSet<IssueCode> = issues.iter().map(|i| i.code).collect();
    if codes.contains(&IssueCode::MissingEntityIdentifier) {
        recs.push(
            "Introduce a stable Facility ID/Legal Entity ID column for every record before final boundary sign-off"
                .to_string(),
        );
    }
    if codes.contains(&IssueCode::DuplicateEntityId) {
        recs.push(
            "Resolve duplicate identifiers to avoid double counting and misattribution in carbon ledgers"
                .to_string(),
        );
    }
    if codes.contains(&IssueCode::MissingParent) {
        recs.push(
            "Review missing parent links and confirm whether affected entities are standalone or require hierarchy updates"
                .to_string(),
        );
    }
    if codes.contains(&IssueCode::MissingRegion) {
        recs.push(
            "Populate a standard region field (e.g., AMER/EMEA/APAC) for aggregated sustainability reporting"
                .to_string(),
        );
    }
    recs
}
