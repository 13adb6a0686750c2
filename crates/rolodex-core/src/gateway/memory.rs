//! Record source backed by a local JSON document.
//!
//! The document maps table names to arrays of rows in the same shape the REST
//! backend returns, e.g. `{"clients": [{"id": 1, "company_name": "Acme"}]}`.

use super::RecordSource;
use super::records::{search_terms, summarize, table_for, text};
use crate::{Error, Result};
use rolodex_types::{Category, RecordSummary};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, Vec<Value>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not an object of row arrays.
    pub fn from_json(content: &str) -> Result<Self> {
        let tables: HashMap<String, Vec<Value>> = serde_json::from_str(content)?;
        Ok(Self { tables })
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read fixtures {}: {e}", path.display()))
        })?;
        let source = Self::from_json(&content)?;
        debug!(
            "Loaded {} fixture records from {}",
            source.record_count(),
            path.display()
        );
        Ok(source)
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }
}

impl RecordSource for MemorySource {
    async fn lookup(
        &self,
        category: Category,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<RecordSummary>> {
        let spec = table_for(category);
        let Some(rows) = self.tables.get(spec.table) else {
            return Ok(Vec::new());
        };

        let terms = search_terms(spec, pattern);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        Ok(rows
            .iter()
            .filter(|row| {
                let values: Vec<String> = spec
                    .search_columns
                    .iter()
                    .filter_map(|column| text(row, column))
                    .map(|value| value.to_lowercase())
                    .collect();
                terms
                    .iter()
                    .all(|term| values.iter().any(|value| value.contains(term.as_str())))
            })
            .filter_map(|row| summarize(category, row))
            .take(limit)
            .collect())
    }
}
