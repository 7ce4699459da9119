//! WASM driver: a `spawn_local` future owns the [`UpdateLoop`].
//!
//! Each tick runs [`UpdateLoop::tick`] to completion (every fetch carries its own
//! timeout), waits out the flash duration, then clears the flashes it applied. The next
//! tick starts one interval after the previous one started, or right away if that has
//! already passed. Ticks never overlap and missed ticks are not replayed.

use std::rc::Rc;
use std::time::Duration;

use futures_util::future::{AbortHandle, Abortable};
use gloo_timers::future::TimeoutFuture;

use super::{QuoteCard, QuoteSource, UpdateLoop};

/// Handle to a running update future. Dropping it stops the loop.
pub struct LiveUpdates {
    abort: AbortHandle,
}

impl LiveUpdates {
    pub fn spawn<C, Q>(update_loop: UpdateLoop<C>, source: Rc<Q>) -> Self
    where
        C: QuoteCard + 'static,
        Q: QuoteSource + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        let task = Abortable::new(run(update_loop, source), registration);

        wasm_bindgen_futures::spawn_local(async move {
            if task.await.is_err() {
                tracing::info!("Live updates stopped");
            }
        });

        Self { abort }
    }

    pub fn stop(&self) {
        self.abort.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for LiveUpdates {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

async fn run<C, Q>(mut update_loop: UpdateLoop<C>, source: Rc<Q>)
where
    C: QuoteCard,
    Q: QuoteSource,
{
    let config = update_loop.config().clone();
    let interval_ms = u32::try_from(config.poll_interval.as_millis()).unwrap_or(u32::MAX);
    let flash_ms = u32::try_from(config.flash_duration.as_millis()).unwrap_or(u32::MAX);

    tracing::info!(symbols = update_loop.len(), interval_ms, "Live updates started");

    loop {
        let started = js_sys::Date::now();

        let flashes = update_loop.tick(source.as_ref()).await;
        if !flashes.is_empty() {
            TimeoutFuture::new(flash_ms).await;
            for ticket in &flashes {
                update_loop.clear_flash(ticket);
            }
        }

        let elapsed = Duration::from_millis((js_sys::Date::now() - started).max(0.0) as u64);
        let wait = config.delay_until_next_tick(elapsed);
        if !wait.is_zero() {
            TimeoutFuture::new(u32::try_from(wait.as_millis()).unwrap_or(u32::MAX)).await;
        }
    }
}
