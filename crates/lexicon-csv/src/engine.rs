//! The CSV engine: preview, import and export over the registry ports.

use std::sync::Arc;

use lexicon_registry::{RegistryError, RowStore, SchemaRegistry};
use lexicon_types::{ColumnName, CsvPreview, ImportMapping, ImportResult, Row};
use tracing::{debug, info, warn};

use crate::reader::{parse, Parsed};
use crate::writer::render;

/// Largest payload accepted unless configured otherwise (10 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Columns every imported row must carry.
const REQUIRED: [&str; 2] = ["code", "full_name"];

/// Stateless CSV operations against one store.
///
/// Each call is a single pass over one payload for one table. Row-level
/// problems during import are collected into the [`ImportResult`] and
/// never fail the batch.
pub struct CsvEngine<S: ?Sized> {
    store: Arc<S>,
    max_payload_bytes: usize,
}

impl<S> CsvEngine<S>
where
    S: SchemaRegistry + RowStore + ?Sized,
{
    /// Creates an engine with the default payload limit.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    /// Overrides the payload limit.
    pub fn with_max_payload(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    fn check_size(&self, bytes: &[u8]) -> Result<(), RegistryError> {
        if bytes.len() > self.max_payload_bytes {
            return Err(RegistryError::PayloadTooLarge {
                size: bytes.len(),
                limit: self.max_payload_bytes,
            });
        }
        Ok(())
    }

    /// Parses a payload destined for `table` and reports its shape.
    ///
    /// # Errors
    ///
    /// Fails if `table` is not a live lookup table, with `EmptyFile` for a
    /// payload without records and with `MalformedCsv` on a parse error.
    pub fn preview(&self, table: &str, bytes: &[u8]) -> Result<CsvPreview, RegistryError> {
        self.check_size(bytes)?;
        self.store.schema(table)?;
        let parsed = parse(bytes)?;
        debug!(table, headers = parsed.headers.len(), rows = parsed.records.len(), "previewed CSV");
        Ok(CsvPreview {
            headers: parsed.headers,
            row_count: parsed.records.len(),
        })
    }

    /// Imports every data row of the payload into `table`.
    ///
    /// Rows are upserted by `code`; columns the mapping does not name keep
    /// their stored values. Data rows are numbered from 2 in the reported
    /// errors, matching their line in a header-first file.
    ///
    /// # Errors
    ///
    /// Fails before touching any row if the table is not a live lookup
    /// table, the payload cannot be parsed, or the mapping is unusable.
    #[tracing::instrument(skip_all, fields(table = %table, bytes = bytes.len()))]
    pub fn import(
        &self,
        table: &str,
        bytes: &[u8],
        mapping: &ImportMapping,
    ) -> Result<ImportResult, RegistryError> {
        self.check_size(bytes)?;
        self.store.schema(table)?;
        let parsed = parse(bytes)?;
        let plan = plan_columns(&parsed, mapping)?;

        let mut result = ImportResult::default();
        for (i, record) in parsed.records.iter().enumerate() {
            let row_num = i + 2;
            if record.len() != parsed.headers.len() {
                warn!(row = row_num, "column count mismatch");
                result.skip(row_num, "column count mismatch");
                continue;
            }

            let mut row = Row::new();
            for (target, idx) in &plan {
                match record.get(*idx) {
                    Some(cell) if !cell.is_empty() => row.set(target.as_str(), cell),
                    _ => {}
                }
            }
            if let Some(missing) = REQUIRED.iter().find(|c| !row.contains(c)) {
                warn!(row = row_num, column = *missing, "required value missing");
                result.skip(row_num, format!("missing {missing}"));
                continue;
            }

            match self.store.upsert(table, row) {
                Ok(()) => result.imported += 1,
                Err(e) => {
                    warn!(row = row_num, error = %e, "row rejected by store");
                    result.skip(row_num, e);
                }
            }
        }

        info!(
            table,
            imported = result.imported,
            skipped = result.skipped,
            "imported CSV"
        );
        Ok(result)
    }

    /// Renders every row of `table` as CSV, ordered by `code`.
    ///
    /// The header follows the live column order without `created_at`.
    pub fn export(&self, table: &str) -> Result<String, RegistryError> {
        let schema = self.store.schema(table)?;
        let columns: Vec<String> = schema
            .column_names()
            .filter(|c| *c != "created_at")
            .map(String::from)
            .collect();
        let rows = self.store.list(table)?;
        debug!(table, rows = rows.len(), "exported CSV");
        Ok(render(&columns, &rows))
    }
}

/// Resolves the mapping against the header row into `(target, field index)`
/// pairs in mapping order. Skip targets are dropped.
fn plan_columns(
    parsed: &Parsed,
    mapping: &ImportMapping,
) -> Result<Vec<(ColumnName, usize)>, RegistryError> {
    for required in REQUIRED {
        if mapping.get(required).and_then(|s| s.header()).is_none() {
            return Err(RegistryError::MappingIncomplete {
                column: required.to_string(),
            });
        }
    }

    let index = parsed.header_index();
    let mut plan = Vec::with_capacity(mapping.len());
    for (target, source) in mapping.iter() {
        let Some(header) = source.header() else {
            continue;
        };
        let column = ColumnName::new(target).map_err(|e| RegistryError::InvalidColumnName {
            name: target.to_string(),
            reason: e.message,
        })?;
        let idx = index
            .get(header)
            .copied()
            .ok_or_else(|| RegistryError::UnknownSourceColumn {
                column: target.to_string(),
                header: header.to_string(),
            })?;
        plan.push((column, idx));
    }
    Ok(plan)
}
