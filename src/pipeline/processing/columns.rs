use crate::pipeline::processing::document::fetch_value;
use serde_json::Value;

// Ranked candidate phrases per semantic role, most specific first. These are
// data tables on purpose: extending a role means adding a phrase, not a
// branch.

pub const ID_CANDIDATES: &[&str] = &[
    "facility id",
    "entity id",
    "site id",
    "company id",
    "org id",
    "organization id",
    "organisation id",
    "legal entity id",
    "location id",
    "identifier",
    "id",
];

pub const NAME_CANDIDATES: &[&str] = &[
    "entity name",
    "facility name",
    "site name",
    "legal entity",
    "business unit",
    "company name",
    "division name",
    "organisation name",
    "organization name",
    "operating unit",
    "department",
    "name",
    "unit",
];

pub const PARENT_ID_CANDIDATES: &[&str] = &[
    "parent id",
    "parent entity id",
    "parent facility id",
    "ultimate parent id",
    "upper id",
];

pub const PARENT_NAME_CANDIDATES: &[&str] = &[
    "parent",
    "parent entity",
    "parent company",
    "parent name",
    "reports to",
    "reports_to",
    "holding company",
];

pub const REGION_CANDIDATES: &[&str] = &["region", "geo", "geography", "market", "area", "cluster"];

pub const COUNTRY_CANDIDATES: &[&str] = &[
    "country code",
    "country",
    "country/market",
    "jurisdiction",
    "location",
    "hq country",
    "nation",
];

pub const TYPE_CANDIDATES: &[&str] = &[
    "facility type",
    "entity type",
    "category",
    "site type",
    "business type",
    "org type",
    "operating type",
];

pub const BUSINESS_UNIT_CANDIDATES: &[&str] = &[
    "business unit",
    "business-unit",
    "business_unit",
    "segment",
    "division",
    "line of business",
    "lob",
];

/// "name" alone is too ambiguous (e.g. "Business Unit Name"), so compound
/// pairs are tried first; both tokens must appear in the header.
const NAME_PRIORITY_PAIRS: &[&[&str]] = &[
    &["entity", "name"],
    &["facility", "name"],
    &["site", "name"],
    &["legal", "entity"],
];

const DIVISION_HEADER_TOKENS: &[&str] = &["division", "dept", "department", "business line"];

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|tok| !tok.is_empty())
        .map(|tok| tok.to_string())
        .collect()
}

/// Return the first column whose token set is a superset of a candidate
/// phrase's tokens, trying candidates in priority order
pub fn detect_column(columns: &[String], candidates: &[&str]) -> Option<String> {
    let lowered: Vec<Vec<String>> = columns.iter().map(|col| tokenize(col.trim())).collect();
    for candidate in candidates {
        let candidate_tokens = tokenize(candidate);
        for (idx, col_tokens) in lowered.iter().enumerate() {
            if candidate_tokens.iter().all(|tok| col_tokens.contains(tok)) {
                return Some(columns[idx].clone());
            }
        }
    }
    None
}

/// Name detection tries the compound priority pairs before falling back to
/// the generic candidate list
pub fn detect_name_column(columns: &[String]) -> Option<String> {
    let lowered: Vec<String> = columns.iter().map(|col| col.to_lowercase()).collect();
    for priority in NAME_PRIORITY_PAIRS {
        for (idx, col) in lowered.iter().enumerate() {
            if priority.iter().all(|token| col.contains(token)) {
                return Some(columns[idx].clone());
            }
        }
    }
    detect_column(columns, NAME_CANDIDATES)
}

/// First non-empty value among columns whose header mentions a division-like
/// token
pub fn detect_division(columns: &[String], row: &serde_json::Map<String, Value>) -> Option<String> {
    columns
        .iter()
        .filter(|col| {
            let lowered = col.to_lowercase();
            DIVISION_HEADER_TOKENS.iter().any(|token| lowered.contains(token))
        })
        .find_map(|col| fetch_value(row, Some(col)))
}

/// Per-document mapping from semantic roles to detected column headers.
/// Every role other than `name` is optional and degrades to `None`.
#[derive(Debug, Clone, Default)]
pub struct ColumnRoles {
    pub id: Option<String>,
    pub name: Option<String>,
    pub parent_id: Option<String>,
    pub parent_name: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub entity_type: Option<String>,
    pub business_unit: Option<String>,
}

impl ColumnRoles {
    pub fn detect(columns: &[String]) -> Self {
        Self {
            id: detect_column(columns, ID_CANDIDATES),
            name: detect_name_column(columns),
            parent_id: detect_column(columns, PARENT_ID_CANDIDATES),
            parent_name: detect_column(columns, PARENT_NAME_CANDIDATES),
            region: detect_column(columns, REGION_CANDIDATES),
            country: detect_column(columns, COUNTRY_CANDIDATES),
            entity_type: detect_column(columns, TYPE_CANDIDATES),
            business_unit: detect_column(columns, BUSINESS_UNIT_CANDIDATES),
        }
    }
}
