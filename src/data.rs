//! Record model shared by ingestion, inference, and statement building.
//!
//! A CSV cell is either text or null; numeric and boolean coercion is
//! deferred entirely to the analytical engine, so nothing in this crate
//! parses a cell beyond classifying it for inference. [`RecordSet`] keeps
//! one header list for the whole file and enforces that every row carries
//! exactly one cell per header.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single CSV cell: present text or an absent/empty field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Text(String),
}

impl Cell {
    pub fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Cell::Null
        } else {
            Cell::Text(field.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// The value as seen by the inference scan: nulls read as empty string.
    pub fn scan_str(&self) -> &str {
        match self {
            Cell::Null => "",
            Cell::Text(value) => value,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(field: &str) -> Self {
        Cell::from_field(field)
    }
}

/// Ordered header list plus rows of cells, all from one uploaded file.
///
/// Column order is CSV header order and is never reordered downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordSet {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with nulls and truncating long
    /// ones so the width invariant holds for every stored row.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.headers.len(), Cell::Null);
        self.rows.push(cells);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates one column's cells across every row, in row order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// The first `limit` rows, for the editable upload preview.
    pub fn preview(&self, limit: usize) -> &[Vec<Cell>] {
        let end = limit.min(self.rows.len());
        &self.rows[..end]
    }
}

/// One result row handed back from the engine: ordered (column, cell)
/// pairs, serialized as a JSON object so the rendering collaborator sees a
/// plain row-mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(Vec<(String, Cell)>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, cell: Cell) {
        self.0.push((column.into(), cell));
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Cell)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Cell)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Cell)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, cell) in &self.0 {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RowVisitor;

        impl<'de> serde::de::Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to cell values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Row, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((column, cell)) = access.next_entry::<String, Cell>()? {
                    entries.push((column, cell));
                }
                Ok(Row(entries))
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_from_field_maps_empty_to_null() {
        assert_eq!(Cell::from_field(""), Cell::Null);
        assert_eq!(Cell::from_field("x"), Cell::Text("x".to_string()));
    }

    #[test]
    fn scan_str_reads_null_as_empty() {
        assert_eq!(Cell::Null.scan_str(), "");
        assert_eq!(Cell::Text("42".to_string()).scan_str(), "42");
    }

    #[test]
    fn push_row_pads_and_truncates_to_header_width() {
        let mut set = RecordSet::new(vec!["a".to_string(), "b".to_string()]);
        set.push_row(vec![Cell::from_field("1")]);
        set.push_row(vec![
            Cell::from_field("1"),
            Cell::from_field("2"),
            Cell::from_field("3"),
        ]);

        assert_eq!(set.rows()[0], vec![Cell::Text("1".to_string()), Cell::Null]);
        assert_eq!(set.rows()[1].len(), 2);
    }

    #[test]
    fn preview_clamps_to_row_count() {
        let mut set = RecordSet::new(vec!["a".to_string()]);
        set.push_row(vec![Cell::from_field("1")]);
        set.push_row(vec![Cell::from_field("2")]);

        assert_eq!(set.preview(5).len(), 2);
        assert_eq!(set.preview(1).len(), 1);
    }

    #[test]
    fn column_values_follow_row_order() {
        let mut set = RecordSet::new(vec!["a".to_string(), "b".to_string()]);
        set.push_row(vec![Cell::from_field("1"), Cell::from_field("x")]);
        set.push_row(vec![Cell::from_field("2"), Cell::from_field("y")]);

        let column: Vec<&str> = set.column_values(1).map(Cell::scan_str).collect();
        assert_eq!(column, vec!["x", "y"]);
    }
}
