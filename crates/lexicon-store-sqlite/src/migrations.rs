//! Bookkeeping schema for the lookup-table registry.
//!
//! Lookup tables themselves are created at runtime; these migrations only
//! cover the registry's own control tables.

use lexicon_registry::RegistryError;
use rusqlite::Connection;

/// Current bookkeeping schema version.
const SCHEMA_VERSION: u32 = 2;

/// Runs all pending migrations on the database.
pub fn run_migrations(conn: &Connection) -> Result<(), RegistryError> {
    let current = get_schema_version(conn)?;

    if current < 1 {
        migrate_v1(conn)?;
    }
    if current < 2 {
        migrate_v2(conn)?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

/// Creates the config, metadata and association tables (v1).
fn migrate_v1(conn: &Connection) -> Result<(), RegistryError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS lookup_table_config (
            table_name               VARCHAR(100) PRIMARY KEY NOT NULL,
            is_multi_select          BOOLEAN NOT NULL DEFAULT FALSE,
            use_for_image_processing BOOLEAN NOT NULL DEFAULT FALSE,
            created_at               TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at               TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS lookup_table_metadata (
            table_name   VARCHAR(100) NOT NULL,
            column_name  VARCHAR(100) NOT NULL,
            display_name VARCHAR(100),
            PRIMARY KEY (table_name, column_name)
        );

        CREATE TABLE IF NOT EXISTS lookup_table_artifact_types (
            table_name         VARCHAR(100) NOT NULL,
            artifact_type_code VARCHAR(20) NOT NULL,
            PRIMARY KEY (table_name, artifact_type_code)
        );",
    )
    .map_err(|e| RegistryError::storage("migration v1", e))
}

/// Indexes association lookups by artifact type (v2).
fn migrate_v2(conn: &Connection) -> Result<(), RegistryError> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_lookup_artifact_type_code
            ON lookup_table_artifact_types(artifact_type_code);",
    )
    .map_err(|e| RegistryError::storage("migration v2", e))
}

/// Reads the current schema version from PRAGMA user_version.
fn get_schema_version(conn: &Connection) -> Result<u32, RegistryError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| RegistryError::storage("read schema version", e))
}

/// Sets the schema version via PRAGMA user_version.
fn set_schema_version(conn: &Connection, version: u32) -> Result<(), RegistryError> {
    conn.pragma_update(None, "user_version", version)
        .map_err(|e| RegistryError::storage("set schema version", e))
}
