//! Upload orchestration: the state carried between user actions.
//!
//! A [`Session`] is immutable per transition; every user action consumes
//! the old state and returns a new one, so there is no shared mutable
//! field for two in-flight actions to race on. A new upload fully replaces
//! the prior dataset, inferred types, table name, and output. No
//! transition retries anything; the user re-triggers after fixing input,
//! and every failure degrades to a visible message.

use std::io::Read;

use log::{info, warn};

use crate::data::Cell;
use crate::engine::{Engine, Output, with_connection};
use crate::ingest::{self, Dataset};
use crate::schema::{self, ColumnSpec, ColumnType};
use crate::statement;

/// Number of rows kept for the editable upload preview.
pub const PREVIEW_ROWS: usize = 5;

const MSG_NO_FILE: &str = "No file selected.";
const MSG_MISSING_INPUT: &str = "Missing data, table name, or database is not initialized.";
const MSG_NO_QUERY: &str = "Editor is not initialized.";
const MSG_NO_DATA: &str = "No data returned";

/// Pipeline state between user actions: the current upload (if any), its
/// column types (inferred, then possibly overridden), and the last output
/// handed to the rendering collaborator.
#[derive(Debug, Clone, Default)]
pub struct Session {
    dataset: Option<Dataset>,
    column_types: Vec<ColumnSpec>,
    output: Option<Output>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn table_name(&self) -> &str {
        self.dataset
            .as_ref()
            .map(|dataset| dataset.table_name.as_str())
            .unwrap_or("")
    }

    pub fn column_types(&self) -> &[ColumnSpec] {
        &self.column_types
    }

    /// The first [`PREVIEW_ROWS`] rows of the current upload.
    pub fn preview(&self) -> &[Vec<Cell>] {
        self.dataset
            .as_ref()
            .map(|dataset| dataset.records.preview(PREVIEW_ROWS))
            .unwrap_or(&[])
    }

    pub fn output(&self) -> Option<&Output> {
        self.output.as_ref()
    }

    fn with_output(mut self, output: Output) -> Self {
        self.output = Some(output);
        self
    }

    /// File selection: parses the upload, infers column types, and seeds
    /// the table name from the file name. Replaces all prior upload state.
    /// An empty file name or a parse failure leaves the prior upload in
    /// place and only reports a message.
    pub fn upload<R: Read>(self, file_name: &str, source: R) -> Self {
        if file_name.is_empty() {
            return self.with_output(Output::message(MSG_NO_FILE));
        }
        match ingest::parse_source(file_name, source, None, None) {
            Ok(dataset) => {
                let column_types = schema::infer(&dataset.records);
                Session {
                    dataset: Some(dataset),
                    column_types,
                    output: None,
                }
            }
            Err(err) => {
                warn!("Upload of '{file_name}' failed: {err:#}");
                self.with_output(Output::message(format!("{err:#}")))
            }
        }
    }

    /// Free-text table name overwrite; no other field is touched.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        if let Some(dataset) = self.dataset.as_mut() {
            dataset.table_name = name.into();
        }
        self
    }

    /// Overrides one column's type. Other columns keep their inferred (or
    /// previously overridden) types; an out-of-range index is a no-op.
    pub fn with_column_type(mut self, index: usize, datatype: ColumnType) -> Self {
        if let Some(spec) = self.column_types.get_mut(index) {
            spec.datatype = datatype;
        }
        self
    }

    /// User confirmation: builds the CREATE TABLE and multi-row INSERT
    /// statements and executes them through one fresh connection. If the
    /// CREATE succeeds and the INSERT fails the table remains created;
    /// there is no rollback. The result lands in [`Session::output`].
    pub fn create_table(self, engine: &dyn Engine) -> Self {
        let Some(dataset) = self
            .dataset
            .as_ref()
            .filter(|dataset| !dataset.records.is_empty())
        else {
            return self.with_output(Output::message(MSG_MISSING_INPUT));
        };
        if self.column_types.is_empty() || dataset.table_name.trim().is_empty() {
            return self.with_output(Output::message(MSG_MISSING_INPUT));
        }
        let create_sql = statement::build_create_table(&dataset.table_name, &self.column_types);
        let insert_sql = statement::build_insert(&dataset.table_name, &dataset.records);

        let executed = with_connection(engine, |conn| {
            conn.query(&create_sql)?;
            conn.query(&insert_sql)?;
            Ok(())
        });
        let output = match executed {
            Ok(()) => {
                info!(
                    "Created table \"{}\" with {} row(s)",
                    dataset.table_name,
                    dataset.records.row_count()
                );
                Output::message(format!(
                    "Table \"{}\" created successfully with all rows.",
                    dataset.table_name
                ))
            }
            Err(err) => {
                warn!("Creating table \"{}\" failed: {err}", dataset.table_name);
                Output::message(err.to_string())
            }
        };
        self.with_output(output)
    }

    /// Ad-hoc SQL from the editor: one connection, one statement, rows or
    /// a message back. Leaves upload/preview state untouched.
    pub fn run_query(self, engine: &dyn Engine, sql: &str) -> Self {
        if sql.trim().is_empty() {
            return self.with_output(Output::message(MSG_NO_QUERY));
        }
        let output = match with_connection(engine, |conn| conn.query(sql)) {
            Ok(rows) if rows.is_empty() => Output::message(MSG_NO_DATA),
            Ok(rows) => Output::Data(rows),
            Err(err) => Output::Message(format!("Error: {err}")),
        };
        self.with_output(output)
    }
}
