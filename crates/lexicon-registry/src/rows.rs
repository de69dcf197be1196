//! Abstract row store trait (port) for lookup-table entries.

use lexicon_types::Row;

use crate::error::RegistryError;

/// Generic CRUD over rows of a runtime-declared column set.
///
/// Values are untyped at this layer. Anything the declared column types
/// do not allow is rejected by the store and surfaced as
/// [`RegistryError::Storage`].
pub trait RowStore: Send + Sync {
    /// All rows ordered by `code`. Empty when the table has no rows.
    fn list(&self, table: &str) -> Result<Vec<Row>, RegistryError>;

    /// The row with this code.
    fn get(&self, table: &str, code: &str) -> Result<Row, RegistryError>;

    /// Inserts a new row. `created_at` is stamped by the store.
    fn create(&self, table: &str, row: Row) -> Result<Row, RegistryError>;

    /// Sets only the columns present in `row` on the entry `code`.
    ///
    /// The `code` argument wins over any `code` in the body, and
    /// `created_at` is never modified.
    fn update(&self, table: &str, code: &str, row: Row) -> Result<Row, RegistryError>;

    /// Deletes an entry. Deleting a missing code succeeds.
    fn delete(&self, table: &str, code: &str) -> Result<(), RegistryError>;

    /// Inserts a row, or on a `code` conflict updates only the columns
    /// present in it. Used by bulk import.
    fn upsert(&self, table: &str, row: Row) -> Result<(), RegistryError>;
}
