//! Native driver: one tokio task owns the [`UpdateLoop`].
//!
//! The task `select!`s over:
//! - the poll interval (first tick fires immediately)
//! - the stop signal
//! - the earliest pending flash expiry
//! - completed fetches
//!
//! Fetches run concurrently on the same task inside a `FuturesUnordered`; their
//! results are applied one at a time, so cards are never touched from two places.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::{Flash, FlashTicket, QuoteCard, QuoteSource, UpdateLoop};
use crate::error::{DashboardError, HttpError};
use crate::shared::Symbol;

/// Something observable happened to a card.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    Updated {
        symbol: Symbol,
        price: f64,
        flash: Option<Flash>,
    },
    FlashCleared {
        symbol: Symbol,
    },
    Failed {
        symbol: Symbol,
        error: String,
    },
}

/// Handle to a running update task.
///
/// Dropping the handle aborts the task; [`LiveUpdates::stop`] shuts it down cleanly
/// and hands the loop (and its cards) back.
pub struct LiveUpdates<C: QuoteCard> {
    stop_tx: Option<oneshot::Sender<()>>,
    event_rx: mpsc::Receiver<LiveEvent>,
    task_handle: Option<JoinHandle<UpdateLoop<C>>>,
}

impl<C> LiveUpdates<C>
where
    C: QuoteCard + Send + 'static,
    C::Surface: Send + 'static,
{
    /// Start polling `source` for every card registered in `update_loop`.
    pub fn spawn<Q>(update_loop: UpdateLoop<C>, source: Arc<Q>) -> Self
    where
        Q: QuoteSource + Send + Sync + 'static,
    {
        let (stop_tx, stop_rx) = oneshot::channel();
        let (event_tx, event_rx) = mpsc::channel(256);
        let handle = tokio::spawn(run_task(update_loop, source, stop_rx, event_tx));

        Self {
            stop_tx: Some(stop_tx),
            event_rx,
            task_handle: Some(handle),
        }
    }

    /// Next card event. `None` once the task has ended.
    pub async fn next_event(&mut self) -> Option<LiveEvent> {
        self.event_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<LiveEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stop the task and wait for it to finish. In-flight fetches are dropped.
    pub async fn stop(mut self) -> Option<UpdateLoop<C>> {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }

        let handle = self.task_handle.take()?;
        match tokio::time::timeout(Duration::from_secs(5), handle).await {
            Ok(Ok(update_loop)) => Some(update_loop),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Update task failed");
                None
            }
            Err(_) => {
                tracing::error!("Update task did not stop in time");
                None
            }
        }
    }
}

impl<C: QuoteCard> Drop for LiveUpdates<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task<C, Q>(
    mut update_loop: UpdateLoop<C>,
    source: Arc<Q>,
    mut stop_rx: oneshot::Receiver<()>,
    event_tx: mpsc::Sender<LiveEvent>,
) -> UpdateLoop<C>
where
    C: QuoteCard,
    Q: QuoteSource + Send + Sync + 'static,
{
    let config = update_loop.config().clone();
    let emit = |event: LiveEvent| {
        let _ = event_tx.try_send(event);
    };

    let mut interval = tokio::time::interval(config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut fetches = FuturesUnordered::new();

    // Flash expiries in deadline order; the duration is fixed so pushes stay sorted.
    let mut flashes: VecDeque<(Instant, FlashTicket)> = VecDeque::new();
    let far_future = Instant::now() + Duration::from_secs(86400);
    let flash_sleep = tokio::time::sleep_until(far_future);
    tokio::pin!(flash_sleep);

    tracing::info!(
        symbols = update_loop.len(),
        interval_ms = config.poll_interval.as_millis() as u64,
        "Live updates started"
    );

    loop {
        tokio::select! {
            // ── a) Stop requested (or handle gone) ───────────────────────
            _ = &mut stop_rx => break,

            // ── b) Poll interval ─────────────────────────────────────────
            _ = interval.tick() => {
                for symbol in update_loop.begin_tick() {
                    let source = Arc::clone(&source);
                    let timeout = config.fetch_timeout;
                    fetches.push(async move {
                        let result = match tokio::time::timeout(timeout, source.latest(&symbol)).await {
                            Ok(result) => result,
                            Err(_) => Err(DashboardError::from(HttpError::Timeout)),
                        };
                        (symbol, result)
                    });
                }
            }

            // ── c) A fetch completed ─────────────────────────────────────
            Some((symbol, result)) = fetches.next(), if !fetches.is_empty() => {
                let price = result.as_ref().ok().map(|s| s.price);
                match update_loop.apply_result(&symbol, result) {
                    Ok(ticket) => {
                        let flash = ticket.as_ref().map(|t| t.flash);
                        if let Some(ticket) = ticket {
                            let deadline = Instant::now() + config.flash_duration;
                            if flashes.is_empty() {
                                flash_sleep.as_mut().reset(deadline);
                            }
                            flashes.push_back((deadline, ticket));
                        }
                        if let Some(price) = price {
                            emit(LiveEvent::Updated { symbol, price, flash });
                        }
                    }
                    Err(e) => emit(LiveEvent::Failed { symbol, error: e.to_string() }),
                }
            }

            // ── d) Flash expiry ──────────────────────────────────────────
            () = &mut flash_sleep, if !flashes.is_empty() => {
                let now = Instant::now();
                while let Some((deadline, _)) = flashes.front() {
                    if *deadline > now {
                        break;
                    }
                    if let Some((_, ticket)) = flashes.pop_front() {
                        if update_loop.clear_flash(&ticket) {
                            emit(LiveEvent::FlashCleared { symbol: ticket.symbol });
                        }
                    }
                }
                let next = flashes.front().map(|(deadline, _)| *deadline).unwrap_or(far_future);
                flash_sleep.as_mut().reset(next);
            }
        }
    }

    // Pending flashes and fetches die with the task; settle the cards they touched.
    for (_, ticket) in flashes.drain(..) {
        update_loop.clear_flash(&ticket);
    }
    drop(fetches);
    let abandoned = update_loop.abandon_in_flight();

    tracing::info!(abandoned, "Live updates stopped");
    update_loop
}
