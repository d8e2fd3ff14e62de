//! Column model and the type inference engine.
//!
//! Inference is a conservative, all-or-nothing scan: a column only narrows
//! to INTEGER, DOUBLE, or BOOLEAN when **every** value in the column
//! conforms, and any null/empty cell widens the column back to TEXT because
//! the empty string fails both numeric patterns. False-narrowing would break
//! table creation on the first outlier row, so there is no majority voting,
//! no locale-aware parsing, no sign, and no scientific notation.

use std::{fmt, str::FromStr, sync::LazyLock};

use anyhow::{Result, anyhow};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::RecordSet;

// ASCII digits only; `\d` would also accept Unicode digits the engine's
// integer cast rejects.
static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("integer pattern"));
static DOUBLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("double pattern"));

/// Storage type declared to the analytical engine for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Integer,
    Double,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Double => "DOUBLE",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Text => "TEXT",
        }
    }

    /// All selectable types, in the order the type selector presents them.
    pub fn variants() -> &'static [ColumnType] {
        &[
            ColumnType::Integer,
            ColumnType::Double,
            ColumnType::Boolean,
            ColumnType::Text,
        ]
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INTEGER" | "INT" => Ok(ColumnType::Integer),
            "DOUBLE" | "FLOAT" => Ok(ColumnType::Double),
            "BOOLEAN" | "BOOL" => Ok(ColumnType::Boolean),
            "TEXT" | "STRING" | "VARCHAR" => Ok(ColumnType::Text),
            other => Err(anyhow!(
                "Unknown column type '{other}'. Supported types: INTEGER, DOUBLE, BOOLEAN, TEXT"
            )),
        }
    }
}

/// One column of the table to be created: header name plus declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub datatype: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, datatype: ColumnType) -> Self {
        Self {
            name: name.into(),
            datatype,
        }
    }
}

/// Derives one [`ColumnSpec`] per header, in header order.
///
/// Nulls are scanned as empty strings, so any missing cell forces TEXT. A
/// record set with headers but no rows yields TEXT for every column.
pub fn infer(records: &RecordSet) -> Vec<ColumnSpec> {
    let specs: Vec<ColumnSpec> = records
        .headers()
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let datatype = classify_column(records, index);
            ColumnSpec::new(header.clone(), datatype)
        })
        .collect();
    debug!(
        "Inferred {} column type(s) from {} row(s)",
        specs.len(),
        records.row_count()
    );
    specs
}

fn classify_column(records: &RecordSet, index: usize) -> ColumnType {
    if records.is_empty() {
        return ColumnType::Text;
    }
    let values = || records.column_values(index).map(|cell| cell.scan_str());
    if values().all(|value| INTEGER_PATTERN.is_match(value)) {
        return ColumnType::Integer;
    }
    if values().all(|value| DOUBLE_PATTERN.is_match(value)) {
        return ColumnType::Double;
    }
    if values().all(|value| value == "true" || value == "false") {
        return ColumnType::Boolean;
    }
    ColumnType::Text
}
