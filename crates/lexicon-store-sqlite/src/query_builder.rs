//! SQL statement builders for dynamic rows.
//!
//! Table names arrive already validated as `TableName`; every row key is
//! validated as a `ColumnName` here before it reaches statement text.
//! Values are always bound as parameters.

use lexicon_registry::RegistryError;
use lexicon_types::{ColumnName, Row, TableName};
use rusqlite::types::Value as SqlValue;

use crate::row_mapping::to_sql;

/// Generated statement text plus its positional parameters.
#[derive(Debug)]
pub(crate) struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Validates every key of `row` and splits it into quoted names and values.
fn split_row(row: &Row) -> Result<(Vec<ColumnName>, Vec<SqlValue>), RegistryError> {
    let mut names = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (col, val) in row.iter() {
        let name = ColumnName::new(col).map_err(|e| RegistryError::InvalidColumnName {
            name: col.to_string(),
            reason: e.message,
        })?;
        names.push(name);
        values.push(to_sql(val));
    }
    Ok((names, values))
}

fn insert_prefix(table: &TableName, names: &[ColumnName]) -> String {
    let cols: Vec<String> = names.iter().map(ColumnName::quoted).collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.quoted(),
        cols.join(", "),
        placeholders.join(", ")
    )
}

/// `SELECT *` ordered by code.
pub(crate) fn build_select_all(table: &TableName) -> String {
    format!("SELECT * FROM {} ORDER BY \"code\"", table.quoted())
}

/// `SELECT *` for a single code bound as `?1`.
pub(crate) fn build_select_one(table: &TableName) -> String {
    format!("SELECT * FROM {} WHERE \"code\" = ?1", table.quoted())
}

/// Plain insert of exactly the columns in `row`.
pub(crate) fn build_insert(table: &TableName, row: &Row) -> Result<Statement, RegistryError> {
    let (names, params) = split_row(row)?;
    Ok(Statement {
        sql: insert_prefix(table, &names),
        params,
    })
}

/// Partial update of the columns in `row` on the entry `code`.
pub(crate) fn build_update(
    table: &TableName,
    code: &str,
    row: &Row,
) -> Result<Statement, RegistryError> {
    let (names, mut params) = split_row(row)?;
    let sets: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{} = ?{}", n.quoted(), i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE \"code\" = ?{}",
        table.quoted(),
        sets.join(", "),
        names.len() + 1
    );
    params.push(SqlValue::Text(code.to_string()));
    Ok(Statement { sql, params })
}

/// Insert that, on a code conflict, updates only the columns present in
/// `row`. `code` and `created_at` are never part of the update set.
pub(crate) fn build_upsert(table: &TableName, row: &Row) -> Result<Statement, RegistryError> {
    let (names, params) = split_row(row)?;
    let sets: Vec<String> = names
        .iter()
        .filter(|n| n.as_str() != "code" && n.as_str() != "created_at")
        .map(|n| format!("{0} = excluded.{0}", n.quoted()))
        .collect();
    let conflict = if sets.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", sets.join(", "))
    };
    Ok(Statement {
        sql: format!(
            "{} ON CONFLICT(\"code\") {}",
            insert_prefix(table, &names),
            conflict
        ),
        params,
    })
}
