//! Migration service - manages database schema migrations
//!
//! Migrations are SQL files embedded at compile time. Each applied
//! migration is recorded in the schema_migrations table so reruns are
//! idempotent.

use anyhow::Result;
use duckdb::Connection;

use crate::migrations::MIGRATIONS;

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Service for managing database migrations
pub struct MigrationService<'a> {
    conn: &'a Connection,
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Run all pending migrations in order
    ///
    /// The first migration creates the tracking table itself and is written
    /// to be idempotent, so it can bootstrap a fresh database.
    pub fn run_pending(&self) -> Result<MigrationResult> {
        // Bootstrap: the tracking table must exist before we can read it
        let (bootstrap_name, bootstrap_sql) = MIGRATIONS[0];
        let bootstrapped = !self.migrations_table_exists()?;
        if bootstrapped {
            self.conn.execute_batch(bootstrap_sql)?;
            self.record_migration(bootstrap_name)?;
        }

        let applied_before = self.applied()?;
        let mut newly_applied: Vec<String> = Vec::new();
        if bootstrapped {
            newly_applied.push(bootstrap_name.to_string());
        }

        for (name, sql) in MIGRATIONS.iter().skip(1) {
            if applied_before.iter().any(|n| n == name) {
                continue;
            }
            self.conn.execute_batch(sql)?;
            self.record_migration(name)?;
            newly_applied.push(name.to_string());
        }

        let already_applied = applied_before.len() - usize::from(bootstrapped);
        Ok(MigrationResult {
            applied: newly_applied,
            already_applied,
        })
    }

    /// Names of migrations not yet applied
    pub fn pending(&self) -> Result<Vec<String>> {
        let applied = self.applied()?;
        Ok(MIGRATIONS
            .iter()
            .map(|(name, _)| name.to_string())
            .filter(|name| !applied.contains(name))
            .collect())
    }

    /// Names of already applied migrations
    pub fn applied(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM schema_migrations ORDER BY migration_name")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for name in names {
            result.push(name?);
        }
        Ok(result)
    }

    fn migrations_table_exists(&self) -> Result<bool> {
        let result: std::result::Result<i64, _> = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'schema_migrations'",
            [],
            |row| row.get(0),
        );
        Ok(result.map(|count| count > 0).unwrap_or(false))
    }

    fn record_migration(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO schema_migrations (migration_name) VALUES (?)",
            [name],
        )?;
        Ok(())
    }
}
