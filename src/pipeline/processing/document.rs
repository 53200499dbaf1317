use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Strings treated as semantically empty cells. Blank rows from spreadsheet
/// formatting are expected noise, so matching values are skipped silently.
pub const EMPTY_SENTINELS: &[&str] = &[
    "", "nan", "none", "n/a", "na", "n.a", "null", "-", "\u{2014}", "\u{2013}", "--", "tbd",
];

/// Upstream parse status for a single document/sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Ok,
    Empty,
    Error,
}

/// A document already decoded by the parsing collaborator. Only `Ok`
/// documents with at least one detected name column contribute entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub path: String,
    pub sheet_name: Option<String>,
    pub status: DocumentStatus,
    pub error: Option<String>,
    pub table: Option<TabularBlock>,
}

impl ParsedDocument {
    pub fn ok(path: impl Into<String>, sheet_name: Option<String>, table: TabularBlock) -> Self {
        Self {
            path: path.into(),
            sheet_name,
            status: DocumentStatus::Ok,
            error: None,
            table: Some(table),
        }
    }

    pub fn failed(path: impl Into<String>, sheet_name: Option<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_name,
            status: DocumentStatus::Error,
            error: Some(error.into()),
            table: None,
        }
    }

    /// Basename of the document path, used in provenance and issues
    pub fn file_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone())
    }
}

/// Row-oriented tabular data with named columns. Cells are raw JSON values
/// so numeric/boolean columns survive the upstream decode untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabularBlock {
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Map<String, Value>>,
}

impl TabularBlock {
    pub fn new(columns: Vec<String>, rows: Vec<serde_json::Map<String, Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fetch a cell as trimmed text, treating sentinels and non-scalar values
/// as absent
pub fn fetch_value(row: &serde_json::Map<String, Value>, column: Option<&str>) -> Option<String> {
    let column = column?;
    let value = row.get(column)?;
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if EMPTY_SENTINELS.contains(&text.to_lowercase().as_str()) {
        return None;
    }
    Some(text)
}
