//! Typeahead driver tests under paused tokio time.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quoteboard::prelude::*;
use quoteboard::shared::MaybeSend;

const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Default)]
struct FakeSearch {
    delays: HashMap<&'static str, Duration>,
    hits: HashMap<&'static str, Vec<&'static str>>,
    failing: Vec<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl FakeSearch {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn hit(symbol: &str) -> SearchMatch {
    SearchMatch {
        symbol: Symbol::from(symbol),
        price: 100.0,
        change: 1.5,
        percent_change: 1.5,
        updated_at: "15:59:59".into(),
    }
}

impl SearchSource for FakeSearch {
    fn search_symbols(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<SearchMatch>, DashboardError>> + MaybeSend {
        self.calls.lock().unwrap().push(query.to_string());
        let delay = self.delays.get(query).copied().unwrap_or(Duration::from_millis(20));
        let failing = self.failing.iter().any(|f| *f == query);
        let hits: Vec<SearchMatch> = match self.hits.get(query) {
            Some(symbols) => symbols.iter().map(|s| hit(s)).collect(),
            None => vec![hit(query)],
        };

        async move {
            tokio::time::sleep(delay).await;
            if failing {
                Err(DashboardError::from(HttpError::ServerError {
                    status: 502,
                    body: "Bad Gateway".into(),
                }))
            } else {
                Ok(hits)
            }
        }
    }
}

/// Wait for the next panel that is not a loading placeholder.
async fn settled_panel(typeahead: &mut Typeahead) -> SearchPanel {
    loop {
        match typeahead.next_event().await.expect("typeahead task ended") {
            TypeaheadEvent::Panel(SearchPanel {
                content: PanelContent::Loading { .. },
                ..
            }) => continue,
            TypeaheadEvent::Panel(panel) => return panel,
            TypeaheadEvent::Navigate(path) => panic!("unexpected navigation to {path}"),
        }
    }
}

fn symbols(panel: &SearchPanel) -> Vec<&str> {
    panel.matches().iter().map(|m| m.symbol.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_sends_one_request() {
    let source = Arc::new(FakeSearch::default());
    let mut typeahead = Typeahead::spawn(Arc::clone(&source), DEBOUNCE);

    typeahead.input("A").unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    typeahead.input("AA").unwrap();

    let panel = settled_panel(&mut typeahead).await;
    assert!(panel.visible);
    assert_eq!(panel.query(), Some("AA"));
    assert_eq!(symbols(&panel), vec!["AA"]);
    assert_eq!(source.calls(), vec!["AA".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_response_never_overwrites_newer_query() {
    let source = Arc::new(FakeSearch {
        delays: HashMap::from([("A", Duration::from_millis(1000))]),
        ..Default::default()
    });
    let mut typeahead = Typeahead::spawn(Arc::clone(&source), DEBOUNCE);

    typeahead.input("A").unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    typeahead.input("AA").unwrap();

    let panel = settled_panel(&mut typeahead).await;
    assert_eq!(symbols(&panel), vec!["AA"]);
    assert_eq!(source.calls(), vec!["A".to_string(), "AA".to_string()]);

    // Let the slow request's deadline pass; nothing else may show up.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(typeahead.try_next_event().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_blank_input_hides_without_request() {
    let source = Arc::new(FakeSearch::default());
    let mut typeahead = Typeahead::spawn(Arc::clone(&source), DEBOUNCE);

    typeahead.input("MS").unwrap();
    typeahead.input("   ").unwrap();

    let _loading = typeahead.next_event().await.unwrap();
    match typeahead.next_event().await.unwrap() {
        TypeaheadEvent::Panel(panel) => assert!(!panel.visible),
        other => panic!("unexpected event: {other:?}"),
    }

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(source.calls().is_empty());
    assert!(typeahead.try_next_event().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_enter_navigates_to_first_result() {
    let source = Arc::new(FakeSearch {
        hits: HashMap::from([("TS", vec!["TSLA", "TSM"])]),
        ..Default::default()
    });
    let mut typeahead = Typeahead::spawn(source, DEBOUNCE);

    typeahead.input("TS").unwrap();
    let panel = settled_panel(&mut typeahead).await;
    assert_eq!(symbols(&panel), vec!["TSLA", "TSM"]);

    typeahead.enter().unwrap();
    assert_eq!(
        typeahead.next_event().await.unwrap(),
        TypeaheadEvent::Navigate("/stock/TSLA".into())
    );
}

#[tokio::test(start_paused = true)]
async fn test_enter_without_results_does_nothing() {
    let source = Arc::new(FakeSearch {
        hits: HashMap::from([("ZZZZ", vec![])]),
        ..Default::default()
    });
    let mut typeahead = Typeahead::spawn(source, DEBOUNCE);

    typeahead.input("ZZZZ").unwrap();
    let panel = settled_panel(&mut typeahead).await;
    assert_eq!(
        panel.content,
        PanelContent::NoResults {
            query: "ZZZZ".into()
        }
    );

    typeahead.enter().unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(typeahead.try_next_event().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_dismiss_then_focus_searches_again() {
    let source = Arc::new(FakeSearch::default());
    let mut typeahead = Typeahead::spawn(Arc::clone(&source), DEBOUNCE);

    typeahead.input("NV").unwrap();
    settled_panel(&mut typeahead).await;

    typeahead.dismiss().unwrap();
    let hidden = settled_panel(&mut typeahead).await;
    assert!(!hidden.visible);
    assert_eq!(symbols(&hidden), vec!["NV"]);

    typeahead.focus().unwrap();
    let shown = settled_panel(&mut typeahead).await;
    assert!(shown.visible);
    assert_eq!(source.calls(), vec!["NV".to_string(), "NV".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_failure_shows_message() {
    let source = Arc::new(FakeSearch {
        failing: vec!["ERR"],
        ..Default::default()
    });
    let mut typeahead = Typeahead::spawn(source, DEBOUNCE);

    typeahead.input("ERR").unwrap();
    let panel = settled_panel(&mut typeahead).await;
    assert!(panel.visible);
    assert_eq!(
        panel.content,
        PanelContent::Failed {
            query: "ERR".into(),
            message: "Search failed: HTTP 502".into(),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_hung_search_times_out() {
    let source = Arc::new(FakeSearch {
        delays: HashMap::from([("HANG", Duration::from_secs(600))]),
        ..Default::default()
    });
    let mut typeahead =
        Typeahead::spawn_with_timeout(Arc::clone(&source), DEBOUNCE, Duration::from_secs(2));
    let started = tokio::time::Instant::now();

    typeahead.input("HANG").unwrap();
    let panel = settled_panel(&mut typeahead).await;

    assert_eq!(started.elapsed(), DEBOUNCE + Duration::from_secs(2));
    assert!(panel.visible);
    assert_eq!(
        panel.content,
        PanelContent::Failed {
            query: "HANG".into(),
            message: "Search timed out".into(),
        }
    );
    assert_eq!(source.calls(), vec!["HANG".to_string()]);
}
