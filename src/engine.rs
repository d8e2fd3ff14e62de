//! Seam to the embedded analytical engine and the rendering handoff.
//!
//! The engine is a black box behind [`Engine`]/[`Connection`]: every
//! operation group acquires one fresh connection, uses it, and releases it
//! unconditionally through [`with_connection`]. No pooling, no reuse, no
//! timeouts; a hung statement is the engine's problem, not this crate's.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::Row;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to open a connection: {0}")]
    Connect(String),
    #[error("{0}")]
    Execution(String),
    #[error("An unknown error occurred")]
    Unknown,
}

/// Connection factory supplied by the embedding application.
pub trait Engine {
    fn connect(&self) -> Result<Box<dyn Connection + '_>, EngineError>;
}

/// One logical connection handle, good for one operation group.
pub trait Connection {
    /// Executes a single SQL statement and returns its result rows (empty
    /// for DDL/DML).
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, EngineError>;

    /// Releases the handle. Called exactly once, success or failure.
    fn close(&mut self);
}

/// Runs one operation group against a fresh connection, releasing it
/// whether the operation succeeded or failed.
pub fn with_connection<T>(
    engine: &dyn Engine,
    op: impl FnOnce(&mut dyn Connection) -> Result<T, EngineError>,
) -> Result<T, EngineError> {
    let mut conn = engine.connect()?;
    let result = op(conn.as_mut());
    conn.close();
    result
}

/// Result object handed to the rendering collaborator: either rows to
/// tabulate/chart or a status/error message. Serializes to the wire shape
/// `{"data": [...]}` / `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Data(Vec<Row>),
    Message(String),
}

impl Output {
    pub fn message(text: impl Into<String>) -> Self {
        Output::Message(text.into())
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Output::Message(_))
    }
}
