//! Tests for debounced dispatch: coalescing, stale responses, failures,
//! timeouts and teardown

use super::fixtures::*;
use crate::dispatch::{Applied, DispatchUpdate, SearchDispatcher};
use crate::gateway::{QueryGateway, RecordSource};
use crate::Error;
use rolodex_types::Category;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;

fn dispatcher(
    source: FakeSource,
) -> (
    SearchDispatcher<FakeSource>,
    UnboundedReceiver<DispatchUpdate>,
) {
    SearchDispatcher::new(Arc::new(QueryGateway::new(source)), DEBOUNCE)
}

/// Apply updates until a lookup settles.
async fn settle<S: RecordSource>(
    dispatcher: &mut SearchDispatcher<S>,
    updates: &mut UnboundedReceiver<DispatchUpdate>,
) -> Applied {
    loop {
        let update = updates.recv().await.expect("dispatcher still alive");
        let applied = dispatcher.apply(update);
        if matches!(applied, Applied::Results | Applied::Failed) {
            return applied;
        }
    }
}

fn titles<S: RecordSource>(dispatcher: &SearchDispatcher<S>) -> Vec<String> {
    dispatcher
        .state()
        .results
        .sections()
        .flat_map(|(_, records)| records.iter().map(|r| r.title.clone()))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_keystroke_burst_dispatches_once() {
    let source = FakeSource::new();
    source.respond(
        "acme",
        vec![record(Category::Organizations, "42", "Acme Corp")],
    );
    let (mut dispatcher, mut updates) = dispatcher(source.clone());

    for query in ["a", "ac", "acm", "acme"] {
        dispatcher.set_query(query);
        sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(settle(&mut dispatcher, &mut updates).await, Applied::Results);
    assert_eq!(source.patterns(), vec!["acme"]);
    assert_eq!(source.lookups(), Category::ALL.len());
    assert_eq!(titles(&dispatcher), vec!["Acme Corp"]);
}

#[tokio::test(start_paused = true)]
async fn test_each_keystroke_restarts_debounce_window() {
    let source = FakeSource::new();
    let (mut dispatcher, mut updates) = dispatcher(source.clone());

    dispatcher.set_query("ac");
    sleep(Duration::from_millis(200)).await;
    dispatcher.set_query("acm");
    sleep(Duration::from_millis(200)).await;

    assert_eq!(source.lookups(), 0, "window restarted by second keystroke");

    settle(&mut dispatcher, &mut updates).await;
    assert_eq!(source.patterns(), vec!["acm"]);
}

#[tokio::test(start_paused = true)]
async fn test_started_marks_loading() {
    let source = FakeSource::new();
    source.delay("acme", Duration::from_secs(2));
    let (mut dispatcher, mut updates) = dispatcher(source);

    dispatcher.set_query("acme");
    assert!(!dispatcher.state().is_loading);

    let update = updates.recv().await.unwrap();
    assert_eq!(dispatcher.apply(update), Applied::Loading);
    assert!(dispatcher.state().is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_slow_response_never_overwrites_newer_query() {
    let source = FakeSource::new();
    source
        .respond("aa", vec![record(Category::People, "1", "Aaron Aardvark")])
        .delay("aa", Duration::from_millis(500));
    source
        .respond("bb", vec![record(Category::People, "2", "Bob Bobson")])
        .delay("bb", Duration::from_millis(50));
    let (mut dispatcher, mut updates) = dispatcher(source.clone());

    dispatcher.set_query("aa");
    sleep(Duration::from_millis(350)).await;
    dispatcher.set_query("bb");

    assert_eq!(settle(&mut dispatcher, &mut updates).await, Applied::Results);
    assert_eq!(titles(&dispatcher), vec!["Bob Bobson"]);

    // Past the point where the first lookup would have resolved
    sleep(Duration::from_secs(1)).await;
    while let Ok(update) = updates.try_recv() {
        assert_eq!(dispatcher.apply(update), Applied::StaleDiscarded);
    }

    assert_eq!(titles(&dispatcher), vec!["Bob Bobson"]);
    assert_eq!(dispatcher.state().query, "bb");
    assert_eq!(source.patterns(), vec!["aa", "bb"]);
}

#[tokio::test(start_paused = true)]
async fn test_queued_updates_from_superseded_query_are_discarded() {
    let source = FakeSource::new();
    source.respond("aa", vec![record(Category::People, "1", "Aaron Aardvark")]);
    let (mut dispatcher, mut updates) = dispatcher(source);

    dispatcher.set_query("aa");
    let started = updates.recv().await.unwrap();
    let finished = updates.recv().await.unwrap();
    assert!(matches!(finished, DispatchUpdate::Finished { .. }));

    dispatcher.set_query("bb");

    assert_eq!(dispatcher.apply(started), Applied::StaleDiscarded);
    assert_eq!(dispatcher.apply(finished), Applied::StaleDiscarded);
    assert!(dispatcher.state().results.is_empty());
    assert!(!dispatcher.state().is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_shortening_query_cancels_in_flight_search() {
    let source = FakeSource::new();
    source
        .respond("ac", vec![record(Category::Organizations, "42", "Acme Corp")])
        .delay("ac", Duration::from_millis(500));
    let (mut dispatcher, mut updates) = dispatcher(source);

    dispatcher.set_query("ac");
    let started = updates.recv().await.unwrap();
    dispatcher.apply(started);
    assert!(dispatcher.state().is_loading);

    dispatcher.set_query("a");
    assert!(!dispatcher.state().is_loading);
    assert!(dispatcher.state().results.is_empty());

    sleep(Duration::from_secs(1)).await;
    assert!(updates.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_failure_clears_loading_and_recovers() {
    let source = FakeSource::new();
    source.set_failing(true);
    let (mut dispatcher, mut updates) = dispatcher(source.clone());

    dispatcher.set_query("acme");
    assert_eq!(settle(&mut dispatcher, &mut updates).await, Applied::Failed);

    let state = dispatcher.state();
    assert!(!state.is_loading);
    assert!(state.results.is_empty());
    assert!(state.error.as_deref().is_some_and(|e| e.contains("503")));

    source.set_failing(false);
    source.respond("globex", vec![record(Category::Organizations, "43", "Globex")]);
    dispatcher.set_query("globex");
    assert_eq!(settle(&mut dispatcher, &mut updates).await, Applied::Results);
    assert!(dispatcher.state().error.is_none());
    assert_eq!(titles(&dispatcher), vec!["Globex"]);
}

#[tokio::test(start_paused = true)]
async fn test_pending_covers_debounce_and_flight() {
    let source = FakeSource::new();
    source.delay("acme", Duration::from_millis(500));
    let (mut dispatcher, mut updates) = dispatcher(source);
    assert!(!dispatcher.is_pending());

    dispatcher.set_query("acme");
    assert!(dispatcher.is_pending());
    assert!(!dispatcher.state().is_loading, "still debouncing");

    let started = updates.recv().await.unwrap();
    dispatcher.apply(started);
    assert!(dispatcher.is_pending());

    assert_eq!(settle(&mut dispatcher, &mut updates).await, Applied::Results);
    assert!(!dispatcher.is_pending());

    dispatcher.set_query("a");
    assert!(!dispatcher.is_pending(), "short queries dispatch nothing");
}

#[tokio::test(start_paused = true)]
async fn test_new_query_drops_previous_error() {
    let source = FakeSource::new();
    source.set_failing(true);
    let (mut dispatcher, mut updates) = dispatcher(source.clone());

    dispatcher.set_query("acme");
    assert_eq!(settle(&mut dispatcher, &mut updates).await, Applied::Failed);
    assert!(dispatcher.state().error.is_some());

    source.set_failing(false);
    source.delay("globex", Duration::from_millis(500));
    dispatcher.set_query("globex");
    assert!(dispatcher.state().error.is_none(), "pending query has no error yet");

    let started = updates.recv().await.unwrap();
    assert_eq!(dispatcher.apply(started), Applied::Loading);
    let state = dispatcher.state();
    assert!(state.is_loading);
    assert_eq!(state.query, "globex");
    assert!(state.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_gateway_timeout_is_search_unavailable() {
    let source = FakeSource::new();
    source.delay("slow", Duration::from_secs(30));
    let gateway = QueryGateway::new(source).with_timeout(Duration::from_secs(1));

    let result = gateway.search("slow").await;
    assert!(matches!(result, Err(Error::SearchUnavailable(_))));
}

#[tokio::test(start_paused = true)]
async fn test_short_query_never_reaches_source() {
    let source = FakeSource::new();
    let gateway = QueryGateway::new(source.clone());

    assert!(gateway.search(" a ").await.unwrap().is_empty());
    assert_eq!(source.lookups(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_gateway_applies_per_category_limit() {
    let source = FakeSource::new();
    source.respond(
        "co",
        (0..6)
            .map(|i| record(Category::Organizations, &i.to_string(), &format!("Co {i}")))
            .collect(),
    );
    let gateway = QueryGateway::new(source).with_limit(2);

    let results = gateway.search("co").await.unwrap();
    assert_eq!(results.get(Category::Organizations).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_dispatcher_stops_in_flight_search() {
    let source = FakeSource::new();
    source.delay("acme", Duration::from_millis(500));
    let (mut dispatcher, mut updates) = dispatcher(source);

    dispatcher.set_query("acme");
    let started = updates.recv().await.unwrap();
    assert!(matches!(started, DispatchUpdate::Started { .. }));

    drop(dispatcher);
    assert!(updates.recv().await.is_none());
}
