//! # lexicon-registry
//!
//! Port definitions (abstract traits) for the lookup-table registry.
//! Adapter crates implement these traits.

pub mod error;
pub mod query;
pub mod rows;
pub mod schema;

pub use error::RegistryError;
pub use query::TableQuery;
pub use rows::RowStore;
pub use schema::{parse_column_type, parse_template, SchemaRegistry};
