//! Query types for listing lookup tables.

use serde::{Deserialize, Serialize};

/// Filtering for lookup-table listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableQuery {
    /// Only tables associated with this artifact-type code.
    pub artifact_type: Option<String>,
}

impl TableQuery {
    /// Creates a query that matches all lookup tables.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the listing to one artifact type.
    pub fn for_artifact_type(mut self, code: impl Into<String>) -> Self {
        self.artifact_type = Some(code.into());
        self
    }
}
