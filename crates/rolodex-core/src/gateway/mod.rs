//! Query gateway: fans one query out to every category and gathers the results.
//!
//! The gateway owns request shaping only (threshold check, per-category limit,
//! timeout). Matching itself belongs to a [`RecordSource`].

mod memory;
mod records;
mod rest;

pub use memory::MemorySource;
pub use rest::RestSource;

use crate::config::{BackendConfig, SearchConfig};
use crate::{Error, Result};
use futures_util::future::try_join_all;
use rolodex_types::{Category, RecordSummary, ResultSet};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_PER_CATEGORY_LIMIT: usize = 3;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// A backend able to answer a substring lookup for one category.
pub trait RecordSource: Send + Sync + 'static {
    /// Case-insensitive substring match of each whitespace-separated term of
    /// `pattern` against the category's searchable fields, returning at most
    /// `limit` summaries in backend order.
    fn lookup(
        &self,
        category: Category,
        pattern: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RecordSummary>>> + Send;
}

/// True when `query` is long enough to be sent to the backend.
#[must_use]
pub fn meets_threshold(query: &str, min_chars: usize) -> bool {
    query.trim().chars().count() >= min_chars
}

pub struct QueryGateway<S> {
    source: S,
    limit: usize,
    min_chars: usize,
    timeout: Duration,
}

impl<S: RecordSource> QueryGateway<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            limit: DEFAULT_PER_CATEGORY_LIMIT,
            min_chars: DEFAULT_MIN_QUERY_CHARS,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_config(source: S, config: &SearchConfig) -> Self {
        Self {
            source,
            limit: config.per_category_limit,
            min_chars: config.min_query_chars,
            timeout: config.request_timeout(),
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn min_query_chars(&self) -> usize {
        self.min_chars
    }

    /// Look `query` up in every category at once.
    ///
    /// Short queries return an empty set without touching the source. The four
    /// lookups run concurrently and the set is returned only once all of them
    /// have succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SearchUnavailable`] if any lookup fails or the whole
    /// fan-out exceeds the request timeout.
    pub async fn search(&self, query: &str) -> Result<ResultSet> {
        let query = query.trim();
        if !meets_threshold(query, self.min_chars) {
            return Ok(ResultSet::new());
        }

        let lookups = Category::ALL.map(|category| self.lookup(category, query));
        let batches = tokio::time::timeout(self.timeout, try_join_all(lookups))
            .await
            .map_err(|_| {
                warn!("Search for {query:?} timed out after {:?}", self.timeout);
                Error::search_unavailable(format!(
                    "no response within {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        let mut results: ResultSet = Category::ALL.into_iter().zip(batches).collect();
        results.truncate_each(self.limit);
        debug!("Search for {query:?} returned {} records", results.len());
        Ok(results)
    }

    async fn lookup(&self, category: Category, query: &str) -> Result<Vec<RecordSummary>> {
        let mut records = self
            .source
            .lookup(category, query, self.limit)
            .await
            .map_err(|e| match e {
                Error::SearchUnavailable(_) => e,
                other => Error::search_unavailable(format!("{category} lookup failed: {other}")),
            })?;

        records.retain(|record| record.category == category);
        Ok(records)
    }
}

/// Record source chosen from configuration at startup.
pub enum Backend {
    Rest(RestSource),
    Memory(MemorySource),
}

impl Backend {
    /// Fixtures take precedence over a remote URL.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is configured, the fixtures file cannot be
    /// read, or the HTTP client cannot be built.
    pub fn from_config(backend: &BackendConfig, search: &SearchConfig) -> Result<Self> {
        if let Some(path) = &backend.fixtures {
            return Ok(Self::Memory(MemorySource::load(path)?));
        }

        let Some(url) = backend.url.as_deref().filter(|u| !u.is_empty()) else {
            return Err(Error::Config(
                "no backend configured: set backend.url or backend.fixtures".to_string(),
            ));
        };

        let api_key = backend.resolve_api_key();
        if api_key.is_none() {
            warn!(
                "No API key found (checked backend.apiKey and ${}); requests will be anonymous",
                backend.api_key_env
            );
        }

        Ok(Self::Rest(RestSource::new(
            url,
            api_key,
            search.request_timeout(),
        )?))
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Rest(source) => format!("remote {}", source.base_url()),
            Self::Memory(source) => format!("local fixtures ({} records)", source.record_count()),
        }
    }
}

impl RecordSource for Backend {
    async fn lookup(
        &self,
        category: Category,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<RecordSummary>> {
        match self {
            Self::Rest(source) => source.lookup(category, pattern, limit).await,
            Self::Memory(source) => source.lookup(category, pattern, limit).await,
        }
    }
}
