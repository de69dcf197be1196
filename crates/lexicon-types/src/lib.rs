//! # lexicon-types
//!
//! Domain types for the lookup-table registry.
//! This crate contains pure data types with zero external dependencies
//! (except serde for serialization).

pub mod error;
pub mod ident;
pub mod import;
pub mod row;
pub mod schema;
pub mod value;

// Re-exports for convenience.
pub use error::{DiagnosticError, ErrorKind, LexiconError};
pub use ident::{
    is_lookup_table_name, is_protected_column, ColumnName, TableName, BOOKKEEPING_TABLES,
    LOOKUP_SUFFIXES, PROTECTED_COLUMNS,
};
pub use import::{ColumnSource, CsvPreview, ImportMapping, ImportResult, SKIP_SENTINEL};
pub use row::Row;
pub use schema::{ColumnInfo, ColumnSpec, ColumnType, ConfigUpdate, TableConfig, TableSchema, Template};
pub use value::Value;
