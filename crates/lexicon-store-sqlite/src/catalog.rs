//! Live catalog introspection.
//!
//! Lookup-table membership is never cached: every operation calls
//! [`require_lookup_table`] against `sqlite_master` before touching a table.

use std::collections::HashSet;

use lexicon_registry::RegistryError;
use lexicon_types::{is_lookup_table_name, ColumnName, TableName};
use rusqlite::{params, Connection};

use crate::row_mapping::OptionalExt;

/// One column as reported by `pragma_table_info`.
#[derive(Debug, Clone)]
pub(crate) struct CatalogColumn {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Name of the stored table matching `name`. SQLite resolves table names
/// case-insensitively, so the match does too.
pub(crate) fn stored_table_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<String>, RegistryError> {
    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| RegistryError::storage("inspect catalog", e))
}

/// Returns true if any table with this name exists, ignoring case.
pub(crate) fn table_exists(conn: &Connection, name: &str) -> Result<bool, RegistryError> {
    Ok(stored_table_name(conn, name)?.is_some())
}

/// Validates the naming convention and confirms the table exists. The
/// returned name is the stored spelling, so bookkeeping rows keyed by
/// table name line up whatever case the caller used.
pub(crate) fn require_lookup_table(
    conn: &Connection,
    name: &str,
) -> Result<TableName, RegistryError> {
    let not_lookup = || RegistryError::NotALookupTable {
        name: name.to_string(),
    };
    let requested = TableName::new(name).map_err(|_| not_lookup())?;
    let stored = stored_table_name(conn, requested.as_str())?.ok_or_else(|| {
        RegistryError::TableNotFound {
            name: name.to_string(),
        }
    })?;
    TableName::new(stored).map_err(|_| not_lookup())
}

/// Columns of `table` in declaration order.
pub(crate) fn table_columns(
    conn: &Connection,
    table: &TableName,
) -> Result<Vec<CatalogColumn>, RegistryError> {
    let mut stmt = conn
        .prepare(
            "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?1) ORDER BY cid",
        )
        .map_err(|e| RegistryError::storage("inspect columns", e))?;
    let columns = stmt
        .query_map(params![table.as_str()], |row| {
            Ok(CatalogColumn {
                name: row.get(0)?,
                decl_type: row.get(1)?,
                not_null: row.get::<_, i64>(2)? != 0,
                primary_key: row.get::<_, i64>(3)? != 0,
            })
        })
        .map_err(|e| RegistryError::storage("inspect columns", e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RegistryError::storage("inspect columns", e))?;
    Ok(columns)
}

/// Fails with `ColumnNotFound` unless `column` exists in `table`.
pub(crate) fn require_column(
    conn: &Connection,
    table: &TableName,
    column: &ColumnName,
) -> Result<(), RegistryError> {
    let exists = table_columns(conn, table)?
        .iter()
        .any(|c| c.name == column.as_str());
    if !exists {
        return Err(RegistryError::ColumnNotFound {
            table: table.to_string(),
            column: column.to_string(),
        });
    }
    Ok(())
}

/// All lookup tables, optionally restricted to one artifact type.
pub(crate) fn list_lookup_tables(
    conn: &Connection,
    artifact_type: Option<&str>,
) -> Result<Vec<String>, RegistryError> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name COLLATE NOCASE")
        .map_err(|e| RegistryError::storage("list tables", e))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| RegistryError::storage("list tables", e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RegistryError::storage("list tables", e))?;

    let associated = match artifact_type {
        Some(code) => Some(tables_for_artifact_type(conn, code)?),
        None => None,
    };

    Ok(names
        .into_iter()
        .filter(|n| is_lookup_table_name(n))
        .filter(|n| associated.as_ref().map_or(true, |set| set.contains(n)))
        .collect())
}

fn tables_for_artifact_type(
    conn: &Connection,
    code: &str,
) -> Result<HashSet<String>, RegistryError> {
    let mut stmt = conn
        .prepare("SELECT table_name FROM lookup_table_artifact_types WHERE artifact_type_code = ?1")
        .map_err(|e| RegistryError::storage("list associations", e))?;
    let set = stmt
        .query_map(params![code], |row| row.get::<_, String>(0))
        .map_err(|e| RegistryError::storage("list associations", e))?
        .collect::<Result<HashSet<_>, _>>()
        .map_err(|e| RegistryError::storage("list associations", e))?;
    Ok(set)
}
