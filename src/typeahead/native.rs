//! Native typeahead driver: one tokio task owns the search state.
//!
//! Input restarts a debounce sleep; when it fires, any outstanding request is dropped
//! and a new one is issued under a deadline. Responses are additionally checked
//! against the state's request generation before they reach the panel.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{failure_message, SearchSource};
use crate::domain::search::{InputAction, SearchPanel, SearchState, SearchTicket};
use crate::error::{DashboardError, HttpError};

// ─── Commands from the UI to the background task ─────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Input(String),
    Focus,
    Enter,
    Dismiss,
}

/// What the UI should render or do next.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeaheadEvent {
    /// The panel changed.
    Panel(SearchPanel),
    /// Navigate to this path (Enter on a non-empty result list).
    Navigate(String),
}

/// Handle to a running typeahead task. Dropping it aborts the task.
pub struct Typeahead {
    cmd_tx: mpsc::Sender<Command>,
    event_rx: mpsc::Receiver<TypeaheadEvent>,
    task_handle: Option<JoinHandle<()>>,
}

/// Deadline for one search request when none is given.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

impl Typeahead {
    pub fn spawn<S>(source: Arc<S>, debounce: Duration) -> Self
    where
        S: SearchSource + Send + Sync + 'static,
    {
        Self::spawn_with_timeout(source, debounce, DEFAULT_SEARCH_TIMEOUT)
    }

    /// Like [`Typeahead::spawn`]; a request still pending after `timeout` fails with
    /// `HttpError::Timeout`.
    pub fn spawn_with_timeout<S>(source: Arc<S>, debounce: Duration, timeout: Duration) -> Self
    where
        S: SearchSource + Send + Sync + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::channel(256);
        let handle = tokio::spawn(run_task(source, debounce, timeout, cmd_rx, event_tx));

        Self {
            cmd_tx,
            event_rx,
            task_handle: Some(handle),
        }
    }

    /// The input's text changed.
    pub fn input(&self, text: &str) -> Result<(), DashboardError> {
        self.send(Command::Input(text.to_string()))
    }

    pub fn focus(&self) -> Result<(), DashboardError> {
        self.send(Command::Focus)
    }

    pub fn enter(&self) -> Result<(), DashboardError> {
        self.send(Command::Enter)
    }

    /// A click landed outside the input and the panel.
    pub fn dismiss(&self) -> Result<(), DashboardError> {
        self.send(Command::Dismiss)
    }

    pub async fn next_event(&mut self) -> Option<TypeaheadEvent> {
        self.event_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<TypeaheadEvent> {
        self.event_rx.try_recv().ok()
    }

    fn send(&self, cmd: Command) -> Result<(), DashboardError> {
        self.cmd_tx.try_send(cmd).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                DashboardError::Other("Typeahead command channel full".into())
            }
            mpsc::error::TrySendError::Closed(_) => {
                DashboardError::Other("Typeahead task has stopped".into())
            }
        })
    }
}

impl Drop for Typeahead {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task<S>(
    source: Arc<S>,
    debounce: Duration,
    timeout: Duration,
    mut cmd_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<TypeaheadEvent>,
) where
    S: SearchSource + Send + Sync + 'static,
{
    let mut state = SearchState::new();
    let emit = |event: TypeaheadEvent| {
        let _ = event_tx.try_send(event);
    };

    let mut pending: Option<String> = None;
    let far_future = Instant::now() + Duration::from_secs(86400);
    let debounce_sleep = tokio::time::sleep_until(far_future);
    tokio::pin!(debounce_sleep);

    let issue = |ticket: SearchTicket| {
        let source = Arc::clone(&source);
        async move {
            let request = source.search_symbols(ticket.query());
            let result = match tokio::time::timeout(timeout, request).await {
                Ok(result) => result,
                Err(_) => Err(DashboardError::from(HttpError::Timeout)),
            };
            (ticket, result)
        }
    };
    let mut in_flight = FuturesUnordered::new();

    loop {
        tokio::select! {
            // ── a) Command from the UI ───────────────────────────────────
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Input(text)) => {
                        match state.on_input(&text) {
                            InputAction::Hide => {
                                pending = None;
                                in_flight = FuturesUnordered::new();
                                debounce_sleep.as_mut().reset(far_future);
                            }
                            InputAction::Debounce(query) => {
                                pending = Some(query);
                                debounce_sleep.as_mut().reset(Instant::now() + debounce);
                            }
                        }
                        emit(TypeaheadEvent::Panel(state.panel().clone()));
                    }
                    Some(Command::Focus) => {
                        if let Some(ticket) = state.on_focus() {
                            pending = None;
                            debounce_sleep.as_mut().reset(far_future);
                            in_flight = FuturesUnordered::new();
                            in_flight.push(issue(ticket));
                            emit(TypeaheadEvent::Panel(state.panel().clone()));
                        }
                    }
                    Some(Command::Enter) => {
                        if let Some(path) = state.on_enter() {
                            emit(TypeaheadEvent::Navigate(path));
                        }
                    }
                    Some(Command::Dismiss) => {
                        state.dismiss();
                        emit(TypeaheadEvent::Panel(state.panel().clone()));
                    }
                    None => break,
                }
            }

            // ── b) Debounce window elapsed ───────────────────────────────
            () = &mut debounce_sleep, if pending.is_some() => {
                debounce_sleep.as_mut().reset(far_future);
                if let Some(query) = pending.take() {
                    let ticket = state.begin_search(&query);
                    in_flight = FuturesUnordered::new();
                    in_flight.push(issue(ticket));
                }
            }

            // ── c) A response arrived ────────────────────────────────────
            Some((ticket, result)) = in_flight.next(), if !in_flight.is_empty() => {
                let result = result.map_err(|e| failure_message(&e));
                if state.on_response(&ticket, result) {
                    emit(TypeaheadEvent::Panel(state.panel().clone()));
                }
            }
        }
    }

    tracing::debug!("Typeahead task stopped");
}
