//! SQLite storage for pages, builder pages, CMS entries and pilgrimages.
//!
//! Each query module adds an `impl Database` block for one table. Page
//! documents are stored whole: the section list is a single JSON column
//! guarded by a version counter.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod builder_queries;
pub mod cms_queries;
pub mod migrations;
pub mod page_queries;
pub mod pilgrimage_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (or creates) the database file and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
