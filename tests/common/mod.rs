#![allow(dead_code)]

use std::cell::{Cell as StdCell, RefCell};
use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_studio::data::Row;
use csv_studio::engine::{Connection, Engine, EngineError};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Scripted stand-in for the analytical engine: records every statement it
/// receives and pops canned responses in order (defaulting to an empty
/// result once the script runs out).
#[derive(Default)]
pub struct MockEngine {
    statements: RefCell<Vec<String>>,
    responses: RefCell<VecDeque<Result<Vec<Row>, EngineError>>>,
    connects: StdCell<usize>,
    closes: StdCell<usize>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next unanswered statement.
    pub fn respond(self, response: Result<Vec<Row>, EngineError>) -> Self {
        self.responses.borrow_mut().push_back(response);
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.get()
    }

    pub fn close_count(&self) -> usize {
        self.closes.get()
    }
}

pub struct MockConnection<'a> {
    engine: &'a MockEngine,
}

impl Engine for MockEngine {
    fn connect(&self) -> Result<Box<dyn Connection + '_>, EngineError> {
        self.connects.set(self.connects.get() + 1);
        Ok(Box::new(MockConnection { engine: self }))
    }
}

impl Connection for MockConnection<'_> {
    fn query(&mut self, sql: &str) -> Result<Vec<Row>, EngineError> {
        self.engine.statements.borrow_mut().push(sql.to_string());
        self.engine
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn close(&mut self) {
        self.engine.closes.set(self.engine.closes.get() + 1);
    }
}
