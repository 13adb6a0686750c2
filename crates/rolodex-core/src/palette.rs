//! Command palette: the overlay that ties dispatch, flattening, navigation
//! and recency together.
//!
//! The palette is UI-agnostic. A host feeds it query edits, navigation keys,
//! clicks and dispatch updates, and acts on the [`PaletteAction`]s it returns.

use crate::dispatch::{Applied, DispatchUpdate, SearchDispatcher, SearchState};
use crate::flatten::FlatIndex;
use crate::gateway::{QueryGateway, RecordSource, meets_threshold};
use crate::navigation::{NavKey, SelectionCursor, Transition};
use crate::recency::{RecencyStorage, RecencyStore};
use rolodex_types::{Category, RecordSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

/// Request to route the host to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub target: String,
    pub title: String,
    pub category: Category,
}

impl From<&RecordSummary> for Navigation {
    fn from(record: &RecordSummary) -> Self {
        Self {
            target: record.target(),
            title: record.title.clone(),
            category: record.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteAction {
    None,
    Opened,
    Closed,
    Navigate(Navigation),
}

/// Link to the full listing of one category, filtered by the current query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAllLink {
    pub category: Category,
    pub label: String,
    pub target: String,
}

/// `/{route}?q={query}` with the query percent-encoded.
#[must_use]
pub fn view_all_link(category: Category, query: &str) -> String {
    format!(
        "/{}?q={}",
        category.route(),
        urlencoding::encode(query.trim())
    )
}

pub struct CommandPalette<S, R> {
    dispatcher: SearchDispatcher<S>,
    recency: RecencyStore<R>,
    cursor: SelectionCursor,
    flat: FlatIndex,
    is_open: bool,
}

impl<S: RecordSource, R: RecencyStorage> CommandPalette<S, R> {
    /// Build a closed palette. Every update arriving on the returned receiver
    /// must be passed to [`Self::apply`].
    pub fn new(
        gateway: Arc<QueryGateway<S>>,
        debounce: Duration,
        recency: RecencyStore<R>,
    ) -> (Self, UnboundedReceiver<DispatchUpdate>) {
        let (dispatcher, updates) = SearchDispatcher::new(gateway, debounce);
        let palette = Self {
            dispatcher,
            recency,
            cursor: SelectionCursor::default(),
            flat: FlatIndex::default(),
            is_open: false,
        };
        (palette, updates)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        self.dispatcher.state()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.dispatcher.state().query
    }

    /// True once the query is long enough to be looked up.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        meets_threshold(self.query(), self.dispatcher.min_query_chars())
    }

    #[must_use]
    pub fn min_query_chars(&self) -> usize {
        self.dispatcher.min_query_chars()
    }

    /// A search for the current query is debouncing or in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.dispatcher.is_pending()
    }

    #[must_use]
    pub fn flat(&self) -> &FlatIndex {
        &self.flat
    }

    /// Highlighted index, `None` when there are no results.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.cursor.selected(self.flat.len())
    }

    #[must_use]
    pub fn recent(&self) -> &[String] {
        self.recency.list()
    }

    /// Open with an empty query, picking up recent searches saved elsewhere.
    pub fn open(&mut self) -> PaletteAction {
        if self.is_open {
            return PaletteAction::None;
        }
        self.discard_transient();
        self.recency.reload();
        self.is_open = true;
        debug!("Palette opened");
        PaletteAction::Opened
    }

    /// Close and abandon any in-flight search.
    pub fn close(&mut self) -> PaletteAction {
        if !self.is_open {
            return PaletteAction::None;
        }
        self.discard_transient();
        self.is_open = false;
        debug!("Palette closed");
        PaletteAction::Closed
    }

    /// Replace the query text. Ignored while closed.
    pub fn set_query(&mut self, query: &str) {
        if !self.is_open {
            return;
        }
        self.dispatcher.set_query(query);
        self.rebuild_flat();
    }

    /// Fold a dispatch update in; settled results reset the cursor.
    pub fn apply(&mut self, update: DispatchUpdate) -> Applied {
        if !self.is_open {
            return Applied::StaleDiscarded;
        }
        let applied = self.dispatcher.apply(update);
        if matches!(applied, Applied::Results | Applied::Failed) {
            self.rebuild_flat();
        }
        applied
    }

    pub fn handle_key(&mut self, key: NavKey) -> PaletteAction {
        if !self.is_open {
            return PaletteAction::None;
        }
        match self.cursor.handle(key, &self.flat) {
            Transition::Ignored | Transition::Moved(_) => PaletteAction::None,
            Transition::Commit(record) => self.commit(&record),
            Transition::Close => self.close(),
        }
    }

    /// Pointer activation of a result row: select it, then confirm.
    pub fn click(&mut self, index: usize) -> PaletteAction {
        if !self.is_open || !self.cursor.select(index, self.flat.len()) {
            return PaletteAction::None;
        }
        self.handle_key(NavKey::Confirm)
    }

    /// Reuse a recent search as the query. Only offered while the query is
    /// empty, which is when recent searches are shown.
    pub fn use_recent(&mut self, index: usize) -> bool {
        if !self.is_open || !self.query().is_empty() {
            return false;
        }
        let Some(entry) = self.recency.list().get(index).cloned() else {
            return false;
        };
        self.set_query(&entry);
        true
    }

    /// One link per non-empty section, or none when the query is too short to
    /// have produced results.
    #[must_use]
    pub fn view_all_links(&self) -> Vec<ViewAllLink> {
        let query = self.query();
        self.flat
            .sections()
            .iter()
            .map(|section| ViewAllLink {
                category: section.category,
                label: format!("View all {}", section.category.label()),
                target: view_all_link(section.category, query),
            })
            .collect()
    }

    fn commit(&mut self, record: &RecordSummary) -> PaletteAction {
        let navigation = Navigation::from(record);
        self.recency.record(&record.title);
        self.close();
        debug!(route = %navigation.target, "Navigating to record");
        PaletteAction::Navigate(navigation)
    }

    fn rebuild_flat(&mut self) {
        self.flat = FlatIndex::from_results(&self.dispatcher.state().results);
        self.cursor.reset();
    }

    fn discard_transient(&mut self) {
        self.dispatcher.reset();
        self.flat = FlatIndex::default();
        self.cursor.reset();
    }
}
