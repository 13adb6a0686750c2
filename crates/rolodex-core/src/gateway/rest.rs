//! PostgREST-style HTTP record source.

use super::RecordSource;
use super::records::{search_terms, summarize, table_for};
use crate::{Error, Result};
use reqwest::Url;
use rolodex_types::{Category, RecordSummary};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Characters with meaning inside a PostgREST `or=(...)` filter.
const FILTER_SYNTAX: &[char] = &[',', '(', ')', '*', '%', '\\', ':', '"'];

pub struct RestSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestSource {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, category: Category, terms: &[String], limit: usize) -> Result<Url> {
        let spec = table_for(category);
        let (operator, filter) = term_filter(spec.search_columns, terms);
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base_url, spec.table))
            .map_err(|e| Error::Config(format!("invalid backend url {}: {e}", self.base_url)))?;

        url.query_pairs_mut()
            .append_pair("select", spec.select)
            .append_pair(operator, &filter)
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

impl RecordSource for RestSource {
    async fn lookup(
        &self,
        category: Category,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<RecordSummary>> {
        let terms = search_terms(table_for(category), &sanitize_pattern(pattern));
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.table_url(category, &terms, limit)?;
        debug!("GET {url}");

        let mut request = self.client.get(url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::search_unavailable(format!(
                "{} returned {status}: {}",
                table_for(category).table,
                body.trim()
            )));
        }

        let body = response.text().await?;
        let rows: Vec<Value> = serde_json::from_str(&body).map_err(|e| {
            Error::search_unavailable(format!(
                "unreadable {} response: {e}",
                table_for(category).table
            ))
        })?;

        Ok(rows
            .iter()
            .filter_map(|row| summarize(category, row))
            .take(limit)
            .collect())
    }
}

/// Strip characters that would change the meaning of the filter expression.
pub(crate) fn sanitize_pattern(query: &str) -> String {
    query
        .chars()
        .filter(|c| !FILTER_SYNTAX.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `(col_a.ilike.*pattern*,col_b.ilike.*pattern*)`
pub(crate) fn or_filter(columns: &[&str], pattern: &str) -> String {
    let clauses: Vec<String> = columns
        .iter()
        .map(|column| format!("{column}.ilike.*{pattern}*"))
        .collect();
    format!("({})", clauses.join(","))
}

/// Query parameter for a row matching every term: a single `or` group, or an
/// `and` of one `or` group per term.
pub(crate) fn term_filter(columns: &[&str], terms: &[String]) -> (&'static str, String) {
    if let [term] = terms {
        return ("or", or_filter(columns, term));
    }
    let groups: Vec<String> = terms
        .iter()
        .map(|term| format!("or{}", or_filter(columns, term)))
        .collect();
    ("and", format!("({})", groups.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_filter_syntax() {
        assert_eq!(sanitize_pattern("acme, (inc)*"), "acme inc");
        assert_eq!(sanitize_pattern("100%"), "100");
        assert_eq!(sanitize_pattern("o'brien"), "o'brien");
        assert_eq!(sanitize_pattern("**"), "");
    }

    #[test]
    fn test_or_filter_covers_every_column() {
        let filter = or_filter(&["first_name", "last_name"], "ac");
        assert_eq!(filter, "(first_name.ilike.*ac*,last_name.ilike.*ac*)");
    }

    #[test]
    fn test_multiple_terms_require_each_term() {
        let terms = vec!["isaac".to_string(), "newton".to_string()];
        let (operator, filter) = term_filter(&["first_name", "last_name"], &terms);
        assert_eq!(operator, "and");
        assert_eq!(
            filter,
            "(or(first_name.ilike.*isaac*,last_name.ilike.*isaac*),\
             or(first_name.ilike.*newton*,last_name.ilike.*newton*))"
        );
    }

    #[test]
    fn test_table_url_shape() {
        let source =
            RestSource::new("https://crm.example.co/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(source.base_url(), "https://crm.example.co");

        let url = source
            .table_url(Category::Organizations, &["acme".to_string()], 3)
            .unwrap();
        assert_eq!(url.path(), "/rest/v1/clients");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("limit".to_string(), "3".to_string())));
        assert!(pairs.contains(&(
            "or".to_string(),
            "(company_name.ilike.*acme*,contact_name.ilike.*acme*)".to_string()
        )));
    }

    #[test]
    fn test_invoice_title_filters_on_number_only() {
        let source =
            RestSource::new("https://crm.example.co", None, Duration::from_secs(1)).unwrap();
        let terms = search_terms(table_for(Category::Billing), "Invoice INV-1001");
        let url = source.table_url(Category::Billing, &terms, 3).unwrap();
        let filter = url
            .query_pairs()
            .find(|(key, _)| key == "or")
            .map(|(_, value)| value.into_owned());
        assert_eq!(filter.as_deref(), Some("(invoice_number.ilike.*inv-1001*)"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_search_unavailable() {
        let source =
            RestSource::new("http://127.0.0.1:9", None, Duration::from_millis(500)).unwrap();
        let result = source.lookup(Category::People, "ada", 3).await;
        assert!(matches!(result, Err(Error::SearchUnavailable(_))));
    }
}
