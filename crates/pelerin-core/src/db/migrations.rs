//! Schema initialization and in-place upgrades.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Applies the embedded schema, then upgrades older databases.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Databases created before optimistic versioning lack the `version`
    /// column on the page tables.
    fn apply_migrations(&self) -> Result<()> {
        for table in ["pages", "builder_pages"] {
            if !self.has_column(table, "version")? {
                self.connection
                    .execute(
                        &format!(
                            "ALTER TABLE {table} ADD COLUMN version INTEGER NOT NULL DEFAULT 0"
                        ),
                        [],
                    )
                    .db_context("Failed to add version column")?;
            }
        }
        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                [table, column],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)
            .db_context("Failed to inspect table columns")
    }
}
