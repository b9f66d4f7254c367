//! SQLite persistence for lab progress.
//!
//! [`Database`] is a thin synchronous wrapper around a rusqlite connection.
//! Async callers go through [`ProgressStore`], which opens a connection per
//! operation inside `spawn_blocking`.

use std::{path::Path, time::Duration};

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod progress_queries;
pub mod recorder;
pub mod store;

pub use recorder::ProgressRecorder;
pub use store::{ProgressStore, ProgressStoreBuilder};

/// Writers from the recorder and the CLI may overlap briefly.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
