//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Brings databases created by older versions up to date.
    fn apply_migrations(&self) -> Result<()> {
        let has_points_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('lab_progress') WHERE name = 'points_earned'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .db_context("Failed to inspect lab_progress columns")?;

        if !has_points_column {
            self.connection
                .execute(
                    "ALTER TABLE lab_progress ADD COLUMN points_earned INTEGER NOT NULL DEFAULT 0",
                    [],
                )
                .db_context("Failed to add points_earned column to lab_progress")?;
        }

        Ok(())
    }
}
