//! Column types, table templates and schema views.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LexiconError;
use crate::ident::TableName;

/// Semantic column types offered to users when adding a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColumnType {
    #[serde(rename = "text_20")]
    Text20,
    #[serde(rename = "text_50")]
    Text50,
    #[default]
    #[serde(rename = "text_100")]
    Text100,
    #[serde(rename = "text_1000")]
    Text1000,
    #[serde(rename = "number")]
    Number,
}

impl ColumnType {
    /// All supported types, in vocabulary order.
    pub const ALL: [ColumnType; 5] = [
        Self::Text20,
        Self::Text50,
        Self::Text100,
        Self::Text1000,
        Self::Number,
    ];

    /// The vocabulary name (`text_20`, ..., `number`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text20 => "text_20",
            Self::Text50 => "text_50",
            Self::Text100 => "text_100",
            Self::Text1000 => "text_1000",
            Self::Number => "number",
        }
    }

    /// The storage type used in `ALTER TABLE ... ADD COLUMN`.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Text20 => "VARCHAR(20)",
            Self::Text50 => "VARCHAR(50)",
            Self::Text100 => "VARCHAR(100)",
            Self::Text1000 => "TEXT",
            Self::Number => "REAL",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                LexiconError::validation(
                    "column type must be text_20, text_50, text_100, text_1000, or number",
                )
            })
    }
}

/// A fixed column in a table template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name.
    pub name: &'static str,
    /// Column definition following the name in `CREATE TABLE`.
    pub definition: &'static str,
}

const fn col(name: &'static str, definition: &'static str) -> ColumnSpec {
    ColumnSpec { name, definition }
}

const CREATED_AT: ColumnSpec = col("created_at", "TIMESTAMP DEFAULT CURRENT_TIMESTAMP");

const BASIC: [ColumnSpec; 4] = [
    col("code", "VARCHAR(20) PRIMARY KEY NOT NULL"),
    col("full_name", "VARCHAR(100) NOT NULL"),
    col("description", "TEXT"),
    CREATED_AT,
];

const WITH_CATEGORY: [ColumnSpec; 5] = [
    col("code", "VARCHAR(20) PRIMARY KEY NOT NULL"),
    col("full_name", "VARCHAR(100) NOT NULL"),
    col("category", "VARCHAR(50)"),
    col("description", "TEXT"),
    CREATED_AT,
];

const WITH_SORT_ORDER: [ColumnSpec; 5] = [
    col("code", "VARCHAR(20) PRIMARY KEY NOT NULL"),
    col("full_name", "VARCHAR(100) NOT NULL"),
    col("description", "TEXT"),
    col("sort_order", "INTEGER"),
    CREATED_AT,
];

const WITH_UNIVERSE: [ColumnSpec; 6] = [
    col("code", "VARCHAR(3) PRIMARY KEY NOT NULL"),
    col("full_name", "VARCHAR(100) NOT NULL"),
    col("universe", "VARCHAR(100) NOT NULL"),
    col("description", "TEXT"),
    col("founded_year", "INTEGER"),
    CREATED_AT,
];

/// Starter column layout chosen when a lookup table is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    #[default]
    Basic,
    WithCategory,
    WithSortOrder,
    WithUniverse,
}

impl Template {
    /// All templates.
    pub const ALL: [Template; 4] = [
        Self::Basic,
        Self::WithCategory,
        Self::WithSortOrder,
        Self::WithUniverse,
    ];

    /// The template's wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::WithCategory => "with_category",
            Self::WithSortOrder => "with_sort_order",
            Self::WithUniverse => "with_universe",
        }
    }

    /// Fixed columns, `created_at` last.
    pub fn columns(self) -> &'static [ColumnSpec] {
        match self {
            Self::Basic => &BASIC,
            Self::WithCategory => &WITH_CATEGORY,
            Self::WithSortOrder => &WITH_SORT_ORDER,
            Self::WithUniverse => &WITH_UNIVERSE,
        }
    }

    /// Renders the `CREATE TABLE` statement for `table`.
    pub fn create_table_sql(self, table: &TableName) -> String {
        let defs: Vec<String> = self
            .columns()
            .iter()
            .map(|c| format!("    \"{}\" {}", c.name, c.definition))
            .collect();
        format!("CREATE TABLE {} (\n{}\n)", table.quoted(), defs.join(",\n"))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Template {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                LexiconError::validation(
                    "template must be basic, with_category, with_sort_order, or with_universe",
                )
            })
    }
}

/// Per-table configuration flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub is_multi_select: bool,
    pub use_for_image_processing: bool,
}

/// Partial update of [`TableConfig`]. `None` leaves a flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub is_multi_select: Option<bool>,
    #[serde(default)]
    pub use_for_image_processing: Option<bool>,
}

impl ConfigUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.is_multi_select.is_none() && self.use_for_image_processing.is_none()
    }
}

/// A column as reported by catalog introspection, merged with metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared storage type, e.g. `VARCHAR(20)` or `REAL`.
    pub storage_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    /// Display name from metadata, or the raw column name.
    pub display_name: String,
}

/// Full schema view of one lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<ColumnInfo>,
    pub artifact_types: Vec<String>,
    pub is_multi_select: bool,
    pub use_for_image_processing: bool,
}

impl TableSchema {
    /// Column names in catalog order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// The config flags as a [`TableConfig`].
    pub fn config(&self) -> TableConfig {
        TableConfig {
            is_multi_select: self.is_multi_select,
            use_for_image_processing: self.use_for_image_processing,
        }
    }
}
