//! CSV exploration pipeline for an embedded analytical SQL engine.
//!
//! The flow mirrors a file upload in the hosting application: parse the
//! CSV into records ([`ingest`]), infer one storage type per column
//! ([`schema`]), let the user override the table name or any single
//! column's type, then materialize the table with generated CREATE
//! TABLE/INSERT statements ([`statement`]) executed through the engine
//! seam ([`engine`]). The [`session::Session`] state machine carries the
//! upload between user actions. The engine itself, query planning, and all
//! rendering are external collaborators.

pub mod data;
pub mod engine;
pub mod ingest;
pub mod schema;
pub mod session;
pub mod statement;

use std::{env, sync::OnceLock};

use log::LevelFilter;

static LOGGER: OnceLock<()> = OnceLock::new();

/// Initializes logging once for the hosting application. `RUST_LOG` wins;
/// otherwise the crate logs at info level.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_studio", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}
