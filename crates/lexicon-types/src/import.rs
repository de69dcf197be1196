//! CSV import mapping and result types.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Mapping value that tells the importer to leave a target column out.
pub const SKIP_SENTINEL: &str = "(skip)";

/// Where a target column takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// The CSV column with this header.
    Header(String),
    /// Not imported.
    Skip,
}

impl ColumnSource {
    /// Parses a mapping value. Empty strings and `(skip)` mean [`ColumnSource::Skip`].
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == SKIP_SENTINEL {
            Self::Skip
        } else {
            Self::Header(raw.to_string())
        }
    }

    /// The source header, unless skipped.
    pub fn header(&self) -> Option<&str> {
        match self {
            Self::Header(h) => Some(h),
            Self::Skip => None,
        }
    }
}

/// Ordered `target column -> source header` mapping for CSV import.
///
/// Serialized as a flat JSON object: `{"code": "Code", "notes": "(skip)"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMapping {
    entries: Vec<(String, ColumnSource)>,
}

impl ImportMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps each header onto the column of the same name.
    pub fn identity<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mapping = Self::new();
        for h in headers {
            let h = h.as_ref();
            mapping.insert(h, ColumnSource::parse(h));
        }
        mapping
    }

    /// Sets the source for `target`, replacing any earlier entry in place.
    pub fn insert(&mut self, target: impl Into<String>, source: ColumnSource) {
        let target = target.into();
        match self.entries.iter_mut().find(|(t, _)| *t == target) {
            Some((_, slot)) => *slot = source,
            None => self.entries.push((target, source)),
        }
    }

    /// Builder-style mapping of `target` to `header` (or the skip sentinel).
    pub fn with(mut self, target: impl Into<String>, header: &str) -> Self {
        self.insert(target, ColumnSource::parse(header));
        self
    }

    /// Returns the source for `target`.
    pub fn get(&self, target: &str) -> Option<&ColumnSource> {
        self.entries.iter().find(|(t, _)| t == target).map(|(_, s)| s)
    }

    /// True if `target` is mapped to a real header (not skipped, not absent).
    pub fn maps(&self, target: &str) -> bool {
        self.get(target).and_then(ColumnSource::header).is_some()
    }

    /// Iterates entries in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnSource)> {
        self.entries.iter().map(|(t, s)| (t.as_str(), s))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ImportMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (target, source) in &self.entries {
            map.serialize_entry(target, source.header().unwrap_or(SKIP_SENTINEL))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ImportMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = ImportMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat object of target column to CSV header")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ImportMapping, A::Error> {
                let mut mapping = ImportMapping::new();
                while let Some((target, header)) = access.next_entry::<String, String>()? {
                    mapping.insert(target, ColumnSource::parse(&header));
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// Header row and data-row count of a CSV payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Outcome of a CSV import. Row-level failures are reported here rather
/// than failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportResult {
    /// Counts a skipped row and records `Row {row}: {reason}`.
    pub fn skip(&mut self, row: usize, reason: impl fmt::Display) {
        self.skipped += 1;
        self.errors.push(format!("Row {row}: {reason}"));
    }

    /// True if every data row was imported.
    pub fn is_clean(&self) -> bool {
        self.skipped == 0
    }
}
