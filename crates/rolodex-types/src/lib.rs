//! Shared types for Rolodex command-palette components.
//!
//! This crate provides the record model used by rolodex-core and rolodex-tui:
//! the searchable [`Category`] kinds with their per-variant table, the
//! [`RecordSummary`] a lookup produces, and the partitioned [`ResultSet`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the searchable entity kinds.
///
/// Declaration order is display priority: `Ord` and [`Category::ALL`] both
/// follow it, so iteration over a [`ResultSet`] is always people first and
/// billing last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Leads and prospects
    People,
    /// Deals
    Opportunities,
    /// Client companies
    Organizations,
    /// Invoices
    Billing,
}

/// Static per-category presentation and routing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: Category,
    /// Stable key used in serialized result sets and config
    pub key: &'static str,
    /// Section heading
    pub label: &'static str,
    /// First path segment of the record's route (`/{route}/{id}`)
    pub route: &'static str,
    /// Single glyph shown before each row
    pub icon: &'static str,
}

/// Category table, indexed by `Category as usize`.
pub static CATEGORY_TABLE: [CategoryInfo; 4] = [
    CategoryInfo {
        category: Category::People,
        key: "people",
        label: "Leads",
        route: "leads",
        icon: "@",
    },
    CategoryInfo {
        category: Category::Opportunities,
        key: "opportunities",
        label: "Deals",
        route: "deals",
        icon: "$",
    },
    CategoryInfo {
        category: Category::Organizations,
        key: "organizations",
        label: "Clients",
        route: "clients",
        icon: "#",
    },
    CategoryInfo {
        category: Category::Billing,
        key: "billing",
        label: "Invoices",
        route: "invoices",
        icon: "%",
    },
];

impl Category {
    /// All categories in display priority order.
    pub const ALL: [Category; 4] = [
        Category::People,
        Category::Opportunities,
        Category::Organizations,
        Category::Billing,
    ];

    #[must_use]
    pub fn info(self) -> &'static CategoryInfo {
        &CATEGORY_TABLE[self as usize]
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        self.info().key
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    #[must_use]
    pub fn route(self) -> &'static str {
        self.info().route
    }

    /// Route of a single record, e.g. `/clients/42`.
    #[must_use]
    pub fn record_path(self, id: &str) -> String {
        format!("/{}/{id}", self.route())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single matched record, as rendered in the palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Opaque record id assigned by the backend
    pub id: String,

    pub category: Category,

    /// Primary display text (full name, deal title, company name, invoice number)
    pub title: String,

    /// Secondary context line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl RecordSummary {
    pub fn new(category: Category, id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            title: title.into(),
            subtitle: None,
        }
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Navigation target for this record.
    #[must_use]
    pub fn target(&self) -> String {
        self.category.record_path(&self.id)
    }
}

/// Lookup results partitioned by category.
///
/// Each settled query produces a fresh set; sets are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    buckets: BTreeMap<Category, Vec<RecordSummary>>,
}

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the records for `category`.
    pub fn insert(&mut self, category: Category, records: Vec<RecordSummary>) {
        self.buckets.insert(category, records);
    }

    /// Records for `category` in backend order (empty slice if absent).
    #[must_use]
    pub fn get(&self, category: Category) -> &[RecordSummary] {
        self.buckets.get(&category).map_or(&[], Vec::as_slice)
    }

    /// True when no category has any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Total number of records across categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Non-empty sections in category priority order.
    pub fn sections(&self) -> impl Iterator<Item = (Category, &[RecordSummary])> {
        self.buckets
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(category, records)| (*category, records.as_slice()))
    }

    /// Cap every category at `limit` records, keeping the first ones.
    pub fn truncate_each(&mut self, limit: usize) {
        for records in self.buckets.values_mut() {
            records.truncate(limit);
        }
    }
}

impl FromIterator<(Category, Vec<RecordSummary>)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (Category, Vec<RecordSummary>)>>(iter: I) -> Self {
        Self {
            buckets: iter.into_iter().collect(),
        }
    }
}
