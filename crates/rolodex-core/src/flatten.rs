//! Flattening of a partitioned [`ResultSet`] into one traversable list.

use rolodex_types::{Category, RecordSummary, ResultSet};

/// A contiguous run of one category inside a [`FlatIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub category: Category,
    pub start: usize,
    pub len: usize,
}

/// All records of a result set in fixed category priority, backend order
/// within each category. Derived state; rebuild it whenever results change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatIndex {
    entries: Vec<RecordSummary>,
    sections: Vec<Section>,
}

impl FlatIndex {
    #[must_use]
    pub fn from_results(results: &ResultSet) -> Self {
        let mut entries = Vec::with_capacity(results.len());
        let mut sections = Vec::new();

        for (category, records) in results.sections() {
            sections.push(Section {
                category,
                start: entries.len(),
                len: records.len(),
            });
            entries.extend_from_slice(records);
        }

        Self { entries, sections }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RecordSummary> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn entries(&self) -> &[RecordSummary] {
        &self.entries
    }

    /// Non-empty sections in display order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Category, id: &str) -> RecordSummary {
        RecordSummary::new(category, id, id.to_uppercase())
    }

    #[test]
    fn test_empty_results_flatten_to_empty() {
        let flat = FlatIndex::from_results(&ResultSet::new());
        assert!(flat.is_empty());
        assert!(flat.sections().is_empty());
        assert!(flat.get(0).is_none());
    }

    #[test]
    fn test_sections_track_offsets() {
        let mut results = ResultSet::new();
        results.insert(
            Category::People,
            vec![record(Category::People, "p1"), record(Category::People, "p2")],
        );
        results.insert(Category::Opportunities, Vec::new());
        results.insert(Category::Billing, vec![record(Category::Billing, "b1")]);

        let flat = FlatIndex::from_results(&results);
        assert_eq!(flat.len(), 3);
        assert_eq!(
            flat.sections(),
            &[
                Section {
                    category: Category::People,
                    start: 0,
                    len: 2
                },
                Section {
                    category: Category::Billing,
                    start: 2,
                    len: 1
                },
            ]
        );
    }

    #[test]
    fn test_within_category_order_preserved() {
        let mut results = ResultSet::new();
        results.insert(
            Category::Organizations,
            vec![
                record(Category::Organizations, "zeta"),
                record(Category::Organizations, "alpha"),
            ],
        );
        let flat = FlatIndex::from_results(&results);
        let ids: Vec<&str> = flat.entries().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_flatten_is_pure() {
        let mut results = ResultSet::new();
        results.insert(Category::People, vec![record(Category::People, "p1")]);
        assert_eq!(FlatIndex::from_results(&results), FlatIndex::from_results(&results));
    }
}
