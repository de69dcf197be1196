//! CLI command definitions.

pub mod csv;
pub mod entry;
pub mod project;
pub mod table;
