//! Debounced search dispatch.
//!
//! [`SearchDispatcher`] turns a stream of keystrokes into at most one live
//! lookup. Every query change mints a [`GenerationToken`]; the spawned task
//! waits out the debounce window, runs the gateway, and reports back over a
//! channel. Updates carrying anything but the latest generation are dropped in
//! [`SearchDispatcher::apply`], so a slow response can never overwrite the
//! result of a newer query.

use crate::gateway::{QueryGateway, RecordSource, meets_threshold};
use crate::Result;
use rolodex_types::ResultSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Identity of one dispatched query, valid until the next query change.
#[derive(Debug, Clone)]
pub struct GenerationToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl GenerationToken {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a newer query (or a teardown) has been issued.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

/// Progress report from a dispatch task.
#[derive(Debug)]
pub enum DispatchUpdate {
    /// Debounce window elapsed and the lookup is in flight
    Started { generation: u64 },
    /// Lookup settled
    Finished {
        generation: u64,
        query: String,
        outcome: Result<ResultSet>,
    },
}

impl DispatchUpdate {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Started { generation } | Self::Finished { generation, .. } => *generation,
        }
    }
}

/// What [`SearchDispatcher::apply`] did with an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Loading,
    Results,
    Failed,
    /// The update belonged to a superseded query or a torn-down palette
    StaleDiscarded,
}

/// State exposed to the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub results: ResultSet,
    pub is_loading: bool,
    /// Message of the last `SearchUnavailable` failure
    pub error: Option<String>,
}

pub struct SearchDispatcher<S> {
    gateway: Arc<QueryGateway<S>>,
    debounce: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    update_tx: UnboundedSender<DispatchUpdate>,
    state: SearchState,
}

impl<S: RecordSource> SearchDispatcher<S> {
    /// Create a dispatcher and the receiver its tasks report to. The owner
    /// feeds every received update back through [`Self::apply`].
    pub fn new(
        gateway: Arc<QueryGateway<S>>,
        debounce: Duration,
    ) -> (Self, UnboundedReceiver<DispatchUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            gateway,
            debounce,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
            update_tx,
            state: SearchState::default(),
        };
        (dispatcher, update_rx)
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn min_query_chars(&self) -> usize {
        self.gateway.min_query_chars()
    }

    /// True from a dispatching keystroke until its lookup settles, including
    /// the debounce window before `is_loading` is raised.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle a keystroke. Must be called from within a tokio runtime.
    ///
    /// Restarts the debounce window and drops the previous query's error.
    /// Queries below the threshold clear the results immediately and dispatch
    /// nothing.
    pub fn set_query(&mut self, query: &str) {
        if query == self.state.query {
            return;
        }

        self.state.query = query.to_string();
        self.state.error = None;
        self.cancel_pending();
        let token = self.next_token();

        if !meets_threshold(query, self.gateway.min_query_chars()) {
            self.state.results = ResultSet::new();
            self.state.is_loading = false;
            return;
        }

        self.spawn_dispatch(token, query.trim().to_string());
    }

    /// Fold a task update into the state, discarding anything stale.
    pub fn apply(&mut self, update: DispatchUpdate) -> Applied {
        let latest = self.generation();
        if update.generation() != latest {
            debug!(
                stale = update.generation(),
                latest, "Discarding update from superseded search"
            );
            return Applied::StaleDiscarded;
        }

        match update {
            DispatchUpdate::Started { .. } => {
                self.state.is_loading = true;
                self.state.error = None;
                Applied::Loading
            }
            DispatchUpdate::Finished {
                outcome: Ok(results),
                ..
            } => {
                self.pending = None;
                self.state.results = results;
                self.state.is_loading = false;
                self.state.error = None;
                Applied::Results
            }
            DispatchUpdate::Finished {
                query,
                outcome: Err(e),
                ..
            } => {
                warn!("Search for {query:?} failed: {e}");
                self.pending = None;
                self.state.results = ResultSet::new();
                self.state.is_loading = false;
                self.state.error = Some(e.to_string());
                Applied::Failed
            }
        }
    }

    /// Tear down: abort any task, invalidate its generation, clear state.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.next_token();
        self.state = SearchState::default();
    }

    fn next_token(&self) -> GenerationToken {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        GenerationToken {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn spawn_dispatch(&mut self, token: GenerationToken, query: String) {
        let gateway = Arc::clone(&self.gateway);
        let update_tx = self.update_tx.clone();
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !token.is_current() {
                return;
            }

            let generation = token.generation();
            if update_tx.send(DispatchUpdate::Started { generation }).is_err() {
                return;
            }
            debug!(generation, "Dispatching search for {query:?}");

            let outcome = gateway.search(&query).await;
            if !token.is_current() {
                debug!(generation, "Search for {query:?} superseded in flight");
                return;
            }

            let _ = update_tx.send(DispatchUpdate::Finished {
                generation,
                query,
                outcome,
            });
        }));
    }
}

impl<S> Drop for SearchDispatcher<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
