//! Per-category backend schema: which table to hit, which columns to match,
//! and how a raw row becomes a [`RecordSummary`].

use rolodex_types::{Category, RecordSummary};
use serde_json::Value;

/// Remote table layout for one category.
#[derive(Debug)]
pub(crate) struct TableSpec {
    pub table: &'static str,
    /// PostgREST `select` clause, including embedded parent rows
    pub select: &'static str,
    pub search_columns: &'static [&'static str],
    /// Word the display title starts with, e.g. "Invoice" in "Invoice 1042"
    pub title_prefix: Option<&'static str>,
}

/// Indexed by `Category as usize`.
static TABLES: [TableSpec; 4] = [
    TableSpec {
        table: "leads",
        select: "id,first_name,last_name,email,company,status",
        search_columns: &["first_name", "last_name", "company", "email"],
        title_prefix: None,
    },
    TableSpec {
        table: "deals",
        select: "id,title,stage,value,clients(company_name)",
        search_columns: &["title"],
        title_prefix: None,
    },
    TableSpec {
        table: "clients",
        select: "id,company_name,contact_name,industry",
        search_columns: &["company_name", "contact_name"],
        title_prefix: None,
    },
    TableSpec {
        table: "invoices",
        select: "id,invoice_number,status,amount,clients(company_name)",
        search_columns: &["invoice_number"],
        title_prefix: Some("Invoice"),
    },
];

const SUBTITLE_SEPARATOR: &str = " · ";

pub(crate) fn table_for(category: Category) -> &'static TableSpec {
    &TABLES[category as usize]
}

/// Lowercased whitespace-separated terms of `pattern`; a row matches when
/// every term is found in one of the table's search columns. A term equal to
/// the table's title prefix is dropped unless nothing else is left, so a
/// display title such as "Invoice INV-1001" finds its own row again.
pub(crate) fn search_terms(spec: &TableSpec, pattern: &str) -> Vec<String> {
    let terms: Vec<String> = pattern.split_whitespace().map(str::to_lowercase).collect();
    let Some(prefix) = spec.title_prefix else {
        return terms;
    };

    let kept: Vec<String> = terms
        .iter()
        .filter(|term| !term.eq_ignore_ascii_case(prefix))
        .cloned()
        .collect();
    if kept.is_empty() { terms } else { kept }
}

/// Column value as trimmed, non-empty text. Numbers are rendered as-is.
pub(crate) fn text(row: &Value, key: &str) -> Option<String> {
    let value = match row.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// Column of an embedded parent row. PostgREST embeds many-to-one relations as
/// an object, but some views return a one-element array.
fn parent_text(row: &Value, relation: &str, key: &str) -> Option<String> {
    match row.get(relation)? {
        parent @ Value::Object(_) => text(parent, key),
        Value::Array(parents) => parents.first().and_then(|p| text(p, key)),
        _ => None,
    }
}

fn join_present(parts: &[Option<String>]) -> Option<String> {
    let present: Vec<&str> = parts.iter().flatten().map(String::as_str).collect();
    (!present.is_empty()).then(|| present.join(SUBTITLE_SEPARATOR))
}

/// Build a summary from a raw row. Rows without an id or a usable title are
/// skipped.
pub(crate) fn summarize(category: Category, row: &Value) -> Option<RecordSummary> {
    let id = text(row, "id")?;

    let (title, subtitle) = match category {
        Category::People => {
            let full_name = join_names(text(row, "first_name"), text(row, "last_name"));
            let email = text(row, "email");
            let company = text(row, "company");
            match full_name {
                Some(name) => (name, company.or(email)),
                None => (email?, company),
            }
        }
        Category::Opportunities => (
            text(row, "title")?,
            join_present(&[parent_text(row, "clients", "company_name"), text(row, "stage")]),
        ),
        Category::Organizations => (
            text(row, "company_name")?,
            join_present(&[text(row, "contact_name"), text(row, "industry")]),
        ),
        Category::Billing => (
            billing_title(text(row, "invoice_number")?),
            join_present(&[parent_text(row, "clients", "company_name"), text(row, "status")]),
        ),
    };

    let summary = RecordSummary::new(category, id, title);
    Some(match subtitle {
        Some(subtitle) => summary.with_subtitle(subtitle),
        None => summary,
    })
}

fn billing_title(number: String) -> String {
    match table_for(Category::Billing).title_prefix {
        Some(prefix) => format!("{prefix} {number}"),
        None => number,
    }
}

fn join_names(first: Option<String>, last: Option<String>) -> Option<String> {
    match (first, last) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (first, last) => first.or(last),
    }
}
