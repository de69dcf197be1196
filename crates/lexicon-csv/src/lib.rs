//! # lexicon-csv
//!
//! Bulk movement of lookup-table rows as CSV. [`CsvEngine`] previews and
//! imports payloads against a column mapping and exports full table
//! snapshots. It works over any store implementing both
//! `SchemaRegistry` and `RowStore`.

pub mod engine;
mod reader;
mod writer;

pub use engine::{CsvEngine, DEFAULT_MAX_PAYLOAD_BYTES};
pub use writer::escape_field;
