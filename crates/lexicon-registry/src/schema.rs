//! Abstract schema registry trait (port) for lookup tables.

use lexicon_types::{ColumnType, ConfigUpdate, TableConfig, TableSchema, Template};

use crate::error::RegistryError;
use crate::query::TableQuery;

/// Defines and mutates lookup tables whose column sets are only known at
/// runtime.
///
/// Every operation that takes an existing table name re-checks, against
/// the live catalog, that the table is a lookup table. Implementations
/// live in adapter crates (e.g., `lexicon-store-sqlite`).
pub trait SchemaRegistry: Send + Sync {
    /// Lists lookup tables, ordered case-insensitively by name.
    fn list_tables(&self, query: &TableQuery) -> Result<Vec<String>, RegistryError>;

    /// Creates a table from `template` and records its config row.
    fn create_table(
        &self,
        name: &str,
        template: Template,
        is_multi_select: bool,
    ) -> Result<(), RegistryError>;

    /// Drops a table along with its config, metadata and associations.
    fn delete_table(&self, table: &str) -> Result<(), RegistryError>;

    /// Removes every row but keeps the structure. Returns the rows removed.
    fn clear_table(&self, table: &str) -> Result<usize, RegistryError>;

    /// Appends a column of the given semantic type.
    fn add_column(&self, table: &str, column: &str, ty: ColumnType) -> Result<(), RegistryError>;

    /// Drops a non-protected column and its display-name metadata.
    fn drop_column(&self, table: &str, column: &str) -> Result<(), RegistryError>;

    /// Returns columns, associations and config flags.
    fn schema(&self, table: &str) -> Result<TableSchema, RegistryError>;

    /// Replaces the full artifact-type association set.
    fn update_artifact_types(&self, table: &str, codes: &[String]) -> Result<(), RegistryError>;

    /// Partially updates config flags and returns the resulting config.
    fn update_config(&self, table: &str, update: ConfigUpdate)
        -> Result<TableConfig, RegistryError>;

    /// Sets the display name shown for a column.
    fn set_display_name(
        &self,
        table: &str,
        column: &str,
        display_name: &str,
    ) -> Result<(), RegistryError>;
}

/// Parses a template name, mapping failures to [`RegistryError::UnknownTemplate`].
pub fn parse_template(name: &str) -> Result<Template, RegistryError> {
    name.parse().map_err(|_| RegistryError::UnknownTemplate {
        name: name.to_string(),
    })
}

/// Parses a column type, mapping failures to [`RegistryError::UnknownColumnType`].
pub fn parse_column_type(name: &str) -> Result<ColumnType, RegistryError> {
    name.parse().map_err(|_| RegistryError::UnknownColumnType {
        name: name.to_string(),
    })
}
