//! Validated SQL identifiers for lookup tables and their columns.
//!
//! SQLite cannot bind table or column names as parameters, so every
//! identifier that ends up in generated statement text must first pass
//! through [`TableName::new`] or [`ColumnName::new`]. The allow-list is
//! ASCII letters, digits and underscore; nothing else is accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LexiconError;

/// Suffixes that mark a table as a lookup table.
pub const LOOKUP_SUFFIXES: [&str; 4] = ["_types", "_codes", "_states", "_roles"];

/// Registry bookkeeping tables. Never treated as lookup tables even when
/// their names carry a lookup suffix.
pub const BOOKKEEPING_TABLES: [&str; 3] = [
    "lookup_table_config",
    "lookup_table_metadata",
    "lookup_table_artifact_types",
];

/// Columns that every lookup table must keep.
pub const PROTECTED_COLUMNS: [&str; 3] = ["code", "full_name", "created_at"];

/// Returns true if `c` is allowed inside an identifier.
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns true if `name` follows the lookup-table naming convention.
///
/// This is a purely syntactic check; callers still have to confirm the
/// table exists in the live catalog.
pub fn is_lookup_table_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(is_ident_char)
        && LOOKUP_SUFFIXES.iter().any(|s| name.ends_with(s))
        && !BOOKKEEPING_TABLES.contains(&name)
}

/// Returns true if `column` may never be dropped.
pub fn is_protected_column(column: &str) -> bool {
    PROTECTED_COLUMNS.contains(&column)
}

/// Name of a lookup table, validated against the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Creates a new `TableName`, validating charset, suffix and that the
    /// name is not a bookkeeping table.
    pub fn new(name: impl Into<String>) -> Result<Self, LexiconError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LexiconError::validation("table name cannot be empty"));
        }
        if !name.chars().all(is_ident_char) {
            return Err(LexiconError::validation(
                "table name must contain only letters, numbers, and underscores",
            ));
        }
        if !LOOKUP_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            return Err(LexiconError::validation(
                "table name must end with _types, _codes, _states, or _roles",
            ));
        }
        if BOOKKEEPING_TABLES.contains(&name.as_str()) {
            return Err(LexiconError::validation(format!(
                "'{name}' is reserved for registry bookkeeping"
            )));
        }
        Ok(Self(name))
    }

    /// Returns the table name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name double-quoted for statement text.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TableName {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableName {
    type Error = LexiconError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> Self {
        value.0
    }
}

/// Name of a column inside a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnName(String);

impl ColumnName {
    /// Creates a new `ColumnName`, validating the charset.
    pub fn new(name: impl Into<String>) -> Result<Self, LexiconError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LexiconError::validation("column name cannot be empty"));
        }
        if !name.chars().all(is_ident_char) {
            return Err(LexiconError::validation(
                "column name must contain only letters, numbers, and underscores",
            ));
        }
        Ok(Self(name))
    }

    /// Returns the column name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name double-quoted for statement text.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }

    /// True for `code`, `full_name` and `created_at`.
    pub fn is_protected(&self) -> bool {
        is_protected_column(&self.0)
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ColumnName {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ColumnName {
    type Error = LexiconError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnName> for String {
    fn from(value: ColumnName) -> Self {
        value.0
    }
}
