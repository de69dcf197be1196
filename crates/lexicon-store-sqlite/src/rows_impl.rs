//! `RowStore` trait implementation for `SqliteLexiconStore`.

use lexicon_registry::{RegistryError, RowStore};
use lexicon_types::{Row, TableName, Value};
use rusqlite::{params, params_from_iter, Connection};
use tracing::{debug, info};

use crate::catalog::require_lookup_table;
use crate::query_builder::{
    build_insert, build_select_all, build_select_one, build_update, build_upsert, Statement,
};
use crate::row_mapping::{is_unique_violation, row_to_entry, timestamp_now, OptionalExt};
use crate::store::SqliteLexiconStore;

/// Fails unless `field` holds a non-empty string.
fn require_text(row: &Row, field: &str) -> Result<(), RegistryError> {
    match row.get(field) {
        Some(Value::Text(s)) if !s.is_empty() => Ok(()),
        _ => Err(RegistryError::MissingRequiredField {
            field: field.to_string(),
        }),
    }
}

/// Replaces any client-supplied `created_at` with the server stamp.
fn stamp_created_at(row: &mut Row) {
    row.remove("created_at");
    row.set("created_at", timestamp_now());
}

fn execute(conn: &Connection, stmt: &Statement) -> rusqlite::Result<usize> {
    conn.execute(&stmt.sql, params_from_iter(stmt.params.iter()))
}

/// Reads one entry while the caller already holds the connection.
fn fetch_entry(
    conn: &Connection,
    table: &TableName,
    code: &str,
) -> Result<Option<Row>, RegistryError> {
    let mut stmt = conn
        .prepare(&build_select_one(table))
        .map_err(|e| RegistryError::storage("get entry", e))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    stmt.query_row(params![code], |r| row_to_entry(r, &columns))
        .optional()
        .map_err(|e| RegistryError::storage("get entry", e))
}

impl RowStore for SqliteLexiconStore {
    fn list(&self, table: &str) -> Result<Vec<Row>, RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        let mut stmt = conn
            .prepare(&build_select_all(&table))
            .map_err(|e| RegistryError::storage("list entries", e))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt
            .query_map([], |r| row_to_entry(r, &columns))
            .map_err(|e| RegistryError::storage("list entries", e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RegistryError::storage("list entries", e))?;
        Ok(rows)
    }

    fn get(&self, table: &str, code: &str) -> Result<Row, RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        fetch_entry(&conn, &table, code)?.ok_or_else(|| RegistryError::EntryNotFound {
            table: table.to_string(),
            code: code.to_string(),
        })
    }

    fn create(&self, table: &str, mut row: Row) -> Result<Row, RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        require_text(&row, "code")?;
        require_text(&row, "full_name")?;
        stamp_created_at(&mut row);

        let stmt = build_insert(&table, &row)?;
        execute(&conn, &stmt).map_err(|e| {
            if is_unique_violation(&e) {
                RegistryError::DuplicateCode {
                    table: table.to_string(),
                    code: row.get_str("code").unwrap_or_default().to_string(),
                }
            } else {
                RegistryError::storage("create entry", e)
            }
        })?;
        info!(table = %table, code = row.get_str("code").unwrap_or_default(), "created entry");
        Ok(row)
    }

    fn update(&self, table: &str, code: &str, mut row: Row) -> Result<Row, RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        // The path code is authoritative; created_at is immutable.
        row.remove("code");
        row.remove("created_at");
        if row.is_empty() {
            return Err(RegistryError::NoFieldsProvided);
        }
        if row.contains("full_name") {
            require_text(&row, "full_name")?;
        }

        let stmt = build_update(&table, code, &row)?;
        let affected =
            execute(&conn, &stmt).map_err(|e| RegistryError::storage("update entry", e))?;
        if affected == 0 {
            return Err(RegistryError::EntryNotFound {
                table: table.to_string(),
                code: code.to_string(),
            });
        }
        info!(table = %table, code, columns = row.len(), "updated entry");
        fetch_entry(&conn, &table, code)?.ok_or_else(|| RegistryError::EntryNotFound {
            table: table.to_string(),
            code: code.to_string(),
        })
    }

    fn delete(&self, table: &str, code: &str) -> Result<(), RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        let sql = format!("DELETE FROM {} WHERE \"code\" = ?1", table.quoted());
        let affected = conn
            .execute(&sql, params![code])
            .map_err(|e| RegistryError::storage("delete entry", e))?;
        debug!(table = %table, code, affected, "deleted entry");
        Ok(())
    }

    fn upsert(&self, table: &str, mut row: Row) -> Result<(), RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        require_text(&row, "code")?;
        require_text(&row, "full_name")?;
        stamp_created_at(&mut row);

        let stmt = build_upsert(&table, &row)?;
        execute(&conn, &stmt).map_err(|e| RegistryError::storage("upsert entry", e))?;
        debug!(table = %table, code = row.get_str("code").unwrap_or_default(), "upserted entry");
        Ok(())
    }
}
