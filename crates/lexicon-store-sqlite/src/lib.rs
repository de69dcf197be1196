//! # lexicon-store-sqlite
//!
//! SQLite adapter for the lookup-table registry.
//! Implements `SchemaRegistry` and `RowStore` over one database per
//! project, plus the `ProjectStores` handle cache.

mod catalog;
pub mod migrations;
pub mod project;
mod query_builder;
mod row_mapping;
mod rows_impl;
mod schema_impl;
pub mod store;

pub use project::ProjectStores;
pub use store::SqliteLexiconStore;
