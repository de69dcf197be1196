//! CSV payload parsing.

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord};
use lexicon_registry::RegistryError;

/// A parsed payload: the header row plus every data record.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub headers: Vec<String>,
    pub records: Vec<StringRecord>,
}

impl Parsed {
    /// Header name to field index. The first occurrence of a repeated
    /// header wins.
    pub fn header_index(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::with_capacity(self.headers.len());
        for (i, h) in self.headers.iter().enumerate() {
            index.entry(h.as_str()).or_insert(i);
        }
        index
    }
}

/// Parses the whole payload.
///
/// Records are read flexibly so that a short or long row is reported
/// against that row instead of failing the payload. Fields are not
/// trimmed.
pub(crate) fn parse(bytes: &[u8]) -> Result<Parsed, RegistryError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| RegistryError::MalformedCsv {
            message: e.to_string(),
        })?;
    if records.is_empty() {
        return Err(RegistryError::EmptyFile);
    }
    let headers = records.remove(0).iter().map(String::from).collect();
    Ok(Parsed { headers, records })
}
