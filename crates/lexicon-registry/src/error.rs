//! Errors shared by the schema registry, the row store and the CSV engine.

use lexicon_types::{DiagnosticError, ErrorKind, LexiconError};
use thiserror::Error;

/// Errors returned by registry and row-store implementations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Table name fails the charset/suffix/bookkeeping rules.
    #[error("invalid table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: String },
    /// Column name fails the charset rule.
    #[error("invalid column name '{name}': {reason}")]
    InvalidColumnName { name: String, reason: String },
    /// Template is not one of the known set.
    #[error("unknown template: {name}")]
    UnknownTemplate { name: String },
    /// Column type is not part of the vocabulary.
    #[error("unknown column type: {name}")]
    UnknownColumnType { name: String },
    /// The name does not follow the lookup-table convention.
    #[error("not a lookup table: {name}")]
    NotALookupTable { name: String },
    /// The name is well formed but no such table exists.
    #[error("lookup table not found: {name}")]
    TableNotFound { name: String },
    /// A table with this name already exists.
    #[error("table already exists: {name}")]
    AlreadyExists { name: String },
    /// `code`, `full_name` and `created_at` cannot be dropped.
    #[error("cannot drop required column: {column}")]
    ProtectedColumn { column: String },
    /// The column does not exist in the table.
    #[error("column '{column}' not found in {table}")]
    ColumnNotFound { table: String, column: String },
    /// A partial update carried no fields.
    #[error("no fields to update")]
    NoFieldsProvided,
    /// `code` or `full_name` is missing or empty.
    #[error("{field} is required and must be a non-empty string")]
    MissingRequiredField { field: String },
    /// An entry with this code already exists.
    #[error("duplicate code '{code}' in {table}")]
    DuplicateCode { table: String, code: String },
    /// No entry with this code.
    #[error("entry '{code}' not found in {table}")]
    EntryNotFound { table: String, code: String },
    /// The CSV payload has no rows at all.
    #[error("CSV must have headers")]
    EmptyFile,
    /// The CSV payload could not be parsed.
    #[error("failed to parse CSV: {message}")]
    MalformedCsv { message: String },
    /// The payload exceeds the configured limit.
    #[error("CSV payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },
    /// A required target column is not mapped to a CSV header.
    #[error("{column} column must be mapped")]
    MappingIncomplete { column: String },
    /// The mapping names a header that is not in the CSV.
    #[error("CSV column '{header}' not found (mapped to {column})")]
    UnknownSourceColumn { column: String, header: String },
    /// Project name fails the charset rule.
    #[error("invalid project name '{name}'")]
    InvalidProjectName { name: String },
    /// No project with this name.
    #[error("project not found: {name}")]
    ProjectNotFound { name: String },
    /// A project with this name already exists.
    #[error("project already exists: {name}")]
    ProjectExists { name: String },
    /// The underlying store rejected a statement.
    #[error("storage error ({context}): {message}")]
    Storage { context: String, message: String },
}

impl RegistryError {
    /// Wraps a store failure with the operation it happened in.
    pub fn storage(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Storage {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Domain classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TableNotFound { .. }
            | Self::ColumnNotFound { .. }
            | Self::EntryNotFound { .. }
            | Self::ProjectNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } | Self::DuplicateCode { .. } | Self::ProjectExists { .. } => {
                ErrorKind::Conflict
            }
            Self::Storage { .. } => ErrorKind::Storage,
            _ => ErrorKind::Validation,
        }
    }
}

impl From<RegistryError> for LexiconError {
    fn from(e: RegistryError) -> Self {
        let notes: Vec<String> = [
            e.hint().map(|hint| format!("hint: {hint}")),
            e.fix().map(|fix| format!("fix: {fix}")),
        ]
        .into_iter()
        .flatten()
        .collect();
        let err = LexiconError::new(e.kind(), e.to_string());
        if notes.is_empty() {
            err
        } else {
            err.with_context(notes.join("; "))
        }
    }
}

impl DiagnosticError for RegistryError {
    fn hint(&self) -> Option<String> {
        match self {
            Self::NotALookupTable { name } => Some(format!(
                "'{name}' does not end with _types, _codes, _states or _roles, or is a registry table."
            )),
            Self::ProtectedColumn { .. } => {
                Some("code, full_name and created_at are part of every lookup table.".into())
            }
            Self::DuplicateCode { code, .. } => {
                Some(format!("An entry with code '{code}' is already present."))
            }
            Self::MappingIncomplete { .. } => {
                Some("Both code and full_name must be mapped to a CSV header.".into())
            }
            Self::EmptyFile => Some("The uploaded file contains no rows.".into()),
            _ => None,
        }
    }

    fn fix(&self) -> Option<String> {
        match self {
            Self::DuplicateCode { .. } => {
                Some("Update the existing entry instead, or use a different code.".into())
            }
            Self::UnknownColumnType { .. } => {
                Some("Use one of: text_20, text_50, text_100, text_1000, number.".into())
            }
            Self::UnknownTemplate { .. } => Some(
                "Use one of: basic, with_category, with_sort_order, with_universe.".into(),
            ),
            Self::TableNotFound { .. } => {
                Some("Create the table first with `lexicon table create`.".into())
            }
            _ => None,
        }
    }
}
