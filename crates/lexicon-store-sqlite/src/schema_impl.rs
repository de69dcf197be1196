//! `SchemaRegistry` trait implementation for `SqliteLexiconStore`.

use std::collections::HashMap;

use lexicon_registry::{RegistryError, SchemaRegistry, TableQuery};
use lexicon_types::{
    is_protected_column, ColumnInfo, ColumnName, ColumnType, ConfigUpdate, TableConfig,
    TableName, TableSchema, Template,
};
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::catalog::{
    list_lookup_tables, require_column, require_lookup_table, table_columns, table_exists,
};
use crate::row_mapping::OptionalExt;
use crate::store::SqliteLexiconStore;

/// Validates a column name for use in statement text.
fn column_name(name: &str) -> Result<ColumnName, RegistryError> {
    ColumnName::new(name).map_err(|e| RegistryError::InvalidColumnName {
        name: name.to_string(),
        reason: e.message,
    })
}

/// Reads the config row, treating a missing row as all flags false.
fn read_config(conn: &Connection, table: &TableName) -> Result<TableConfig, RegistryError> {
    let config = conn
        .query_row(
            "SELECT COALESCE(is_multi_select, FALSE), COALESCE(use_for_image_processing, FALSE) \
             FROM lookup_table_config WHERE table_name = ?1",
            params![table.as_str()],
            |row| {
                Ok(TableConfig {
                    is_multi_select: row.get(0)?,
                    use_for_image_processing: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(|e| RegistryError::storage("read table config", e))?;
    Ok(config.unwrap_or_default())
}

fn read_display_names(
    conn: &Connection,
    table: &TableName,
) -> Result<HashMap<String, String>, RegistryError> {
    let mut stmt = conn
        .prepare(
            "SELECT column_name, display_name FROM lookup_table_metadata \
             WHERE table_name = ?1 AND display_name IS NOT NULL AND display_name <> ''",
        )
        .map_err(|e| RegistryError::storage("read column metadata", e))?;
    let names = stmt
        .query_map(params![table.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| RegistryError::storage("read column metadata", e))?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(|e| RegistryError::storage("read column metadata", e))?;
    Ok(names)
}

fn read_artifact_types(conn: &Connection, table: &TableName) -> Result<Vec<String>, RegistryError> {
    let mut stmt = conn
        .prepare(
            "SELECT artifact_type_code FROM lookup_table_artifact_types \
             WHERE table_name = ?1 ORDER BY artifact_type_code",
        )
        .map_err(|e| RegistryError::storage("read associations", e))?;
    let codes = stmt
        .query_map(params![table.as_str()], |row| row.get::<_, String>(0))
        .map_err(|e| RegistryError::storage("read associations", e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RegistryError::storage("read associations", e))?;
    Ok(codes)
}

impl SchemaRegistry for SqliteLexiconStore {
    fn list_tables(&self, query: &TableQuery) -> Result<Vec<String>, RegistryError> {
        let conn = self.lock_conn()?;
        list_lookup_tables(&conn, query.artifact_type.as_deref())
    }

    fn create_table(
        &self,
        name: &str,
        template: Template,
        is_multi_select: bool,
    ) -> Result<(), RegistryError> {
        let table = TableName::new(name).map_err(|e| RegistryError::InvalidTableName {
            name: name.to_string(),
            reason: e.message,
        })?;
        let mut conn = self.lock_conn()?;
        if table_exists(&conn, table.as_str())? {
            return Err(RegistryError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let tx = conn
            .transaction()
            .map_err(|e| RegistryError::storage("create table", e))?;
        tx.execute_batch(&template.create_table_sql(&table))
            .map_err(|e| RegistryError::storage("create table", e))?;
        // Leftovers from a table dropped behind the registry's back.
        tx.execute(
            "DELETE FROM lookup_table_metadata WHERE table_name = ?1",
            params![table.as_str()],
        )
        .map_err(|e| RegistryError::storage("create table", e))?;
        tx.execute(
            "DELETE FROM lookup_table_artifact_types WHERE table_name = ?1",
            params![table.as_str()],
        )
        .map_err(|e| RegistryError::storage("create table", e))?;
        tx.execute(
            "INSERT INTO lookup_table_config (table_name, is_multi_select, use_for_image_processing) \
             VALUES (?1, ?2, FALSE) \
             ON CONFLICT(table_name) DO UPDATE SET \
                is_multi_select = excluded.is_multi_select, \
                use_for_image_processing = FALSE, \
                updated_at = CURRENT_TIMESTAMP",
            params![table.as_str(), is_multi_select],
        )
        .map_err(|e| RegistryError::storage("create table config", e))?;
        tx.commit()
            .map_err(|e| RegistryError::storage("create table", e))?;

        info!(table = %table, template = %template, is_multi_select, "created lookup table");
        Ok(())
    }

    fn delete_table(&self, table: &str) -> Result<(), RegistryError> {
        let mut conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;

        let tx = conn
            .transaction()
            .map_err(|e| RegistryError::storage("delete table", e))?;
        tx.execute_batch(&format!("DROP TABLE {}", table.quoted()))
            .map_err(|e| RegistryError::storage("delete table", e))?;
        for bookkeeping in [
            "DELETE FROM lookup_table_artifact_types WHERE table_name = ?1",
            "DELETE FROM lookup_table_metadata WHERE table_name = ?1",
            "DELETE FROM lookup_table_config WHERE table_name = ?1",
        ] {
            tx.execute(bookkeeping, params![table.as_str()])
                .map_err(|e| RegistryError::storage("delete table bookkeeping", e))?;
        }
        tx.commit()
            .map_err(|e| RegistryError::storage("delete table", e))?;

        info!(table = %table, "deleted lookup table");
        Ok(())
    }

    fn clear_table(&self, table: &str) -> Result<usize, RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        let removed = conn
            .execute(&format!("DELETE FROM {}", table.quoted()), [])
            .map_err(|e| RegistryError::storage("clear table", e))?;
        info!(table = %table, removed, "cleared lookup table");
        Ok(removed)
    }

    fn add_column(&self, table: &str, column: &str, ty: ColumnType) -> Result<(), RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        let column = column_name(column)?;

        let sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            table.quoted(),
            column.quoted(),
            ty.sql_type()
        );
        conn.execute_batch(&sql)
            .map_err(|e| RegistryError::storage("add column", e))?;
        info!(table = %table, column = %column, ty = %ty, "added column");
        Ok(())
    }

    fn drop_column(&self, table: &str, column: &str) -> Result<(), RegistryError> {
        let mut conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        if is_protected_column(column) {
            return Err(RegistryError::ProtectedColumn {
                column: column.to_string(),
            });
        }
        let column = column_name(column)?;
        require_column(&conn, &table, &column)?;

        let tx = conn
            .transaction()
            .map_err(|e| RegistryError::storage("drop column", e))?;
        tx.execute_batch(&format!(
            "ALTER TABLE {} DROP COLUMN {}",
            table.quoted(),
            column.quoted()
        ))
        .map_err(|e| RegistryError::storage("drop column", e))?;
        tx.execute(
            "DELETE FROM lookup_table_metadata WHERE table_name = ?1 AND column_name = ?2",
            params![table.as_str(), column.as_str()],
        )
        .map_err(|e| RegistryError::storage("drop column metadata", e))?;
        tx.commit()
            .map_err(|e| RegistryError::storage("drop column", e))?;

        info!(table = %table, column = %column, "dropped column");
        Ok(())
    }

    fn schema(&self, table: &str) -> Result<TableSchema, RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;

        let display_names = read_display_names(&conn, &table)?;
        let columns = table_columns(&conn, &table)?
            .into_iter()
            .map(|c| ColumnInfo {
                display_name: display_names
                    .get(&c.name)
                    .cloned()
                    .unwrap_or_else(|| c.name.clone()),
                name: c.name,
                storage_type: c.decl_type,
                nullable: !c.not_null,
                primary_key: c.primary_key,
            })
            .collect();
        let artifact_types = read_artifact_types(&conn, &table)?;
        let config = read_config(&conn, &table)?;

        Ok(TableSchema {
            table_name: table.to_string(),
            columns,
            artifact_types,
            is_multi_select: config.is_multi_select,
            use_for_image_processing: config.use_for_image_processing,
        })
    }

    fn update_artifact_types(&self, table: &str, codes: &[String]) -> Result<(), RegistryError> {
        let mut conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;

        let tx = conn
            .transaction()
            .map_err(|e| RegistryError::storage("update associations", e))?;
        tx.execute(
            "DELETE FROM lookup_table_artifact_types WHERE table_name = ?1",
            params![table.as_str()],
        )
        .map_err(|e| RegistryError::storage("clear associations", e))?;
        for code in codes.iter().filter(|c| !c.is_empty()) {
            tx.execute(
                "INSERT OR IGNORE INTO lookup_table_artifact_types (table_name, artifact_type_code) \
                 VALUES (?1, ?2)",
                params![table.as_str(), code],
            )
            .map_err(|e| RegistryError::storage("insert association", e))?;
        }
        tx.commit()
            .map_err(|e| RegistryError::storage("update associations", e))?;

        debug!(table = %table, count = codes.len(), "replaced artifact-type associations");
        Ok(())
    }

    fn update_config(
        &self,
        table: &str,
        update: ConfigUpdate,
    ) -> Result<TableConfig, RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        if update.is_empty() {
            return Err(RegistryError::NoFieldsProvided);
        }

        // Only the provided flags are overwritten on an existing row.
        let mut sets = Vec::new();
        if update.is_multi_select.is_some() {
            sets.push("is_multi_select = excluded.is_multi_select");
        }
        if update.use_for_image_processing.is_some() {
            sets.push("use_for_image_processing = excluded.use_for_image_processing");
        }
        sets.push("updated_at = CURRENT_TIMESTAMP");

        let sql = format!(
            "INSERT INTO lookup_table_config \
             (table_name, is_multi_select, use_for_image_processing, updated_at) \
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP) \
             ON CONFLICT(table_name) DO UPDATE SET {}",
            sets.join(", ")
        );
        conn.execute(
            &sql,
            params![
                table.as_str(),
                update.is_multi_select.unwrap_or(false),
                update.use_for_image_processing.unwrap_or(false),
            ],
        )
        .map_err(|e| RegistryError::storage("update table config", e))?;

        let config = read_config(&conn, &table)?;
        info!(
            table = %table,
            is_multi_select = config.is_multi_select,
            use_for_image_processing = config.use_for_image_processing,
            "updated table config"
        );
        Ok(config)
    }

    fn set_display_name(
        &self,
        table: &str,
        column: &str,
        display_name: &str,
    ) -> Result<(), RegistryError> {
        let conn = self.lock_conn()?;
        let table = require_lookup_table(&conn, table)?;
        let column = column_name(column)?;
        require_column(&conn, &table, &column)?;

        conn.execute(
            "INSERT INTO lookup_table_metadata (table_name, column_name, display_name) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT(table_name, column_name) DO UPDATE SET display_name = excluded.display_name",
            params![table.as_str(), column.as_str(), display_name],
        )
        .map_err(|e| RegistryError::storage("set display name", e))?;
        debug!(table = %table, column = %column, display_name, "set display name");
        Ok(())
    }
}
