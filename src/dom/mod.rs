//! Browser bindings: `web-sys` DOM cards, canvas surfaces, search box, detail chart.
//!
//! [`start`] wires everything on the current page:
//! 1. discover `.stock-card` elements and hand them to an [`UpdateLoop`]
//! 2. make cards clickable through to `/stock/{symbol}`
//! 3. bind `#stock-search` to its `.search-results` panel
//! 4. draw the detail chart if the page has one
//!
//! WASM is single-threaded: running drivers are parked in `thread_local!` statics.

pub mod canvas;
pub mod card;
pub mod detail;
pub mod search;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Window};

use crate::client::DashboardClient;
use crate::error::DashboardError;
use crate::live::wasm::LiveUpdates;
use crate::live::UpdateLoop;

pub use canvas::CanvasSurface;
pub use card::{bind_click_through, discover_cards, DomCard};
pub use detail::draw_detail_chart;
pub use search::SearchBox;

pub const CARD_SELECTOR: &str = ".stock-card";
pub const SEARCH_INPUT_SELECTOR: &str = "#stock-search";
pub const SEARCH_RESULTS_SELECTOR: &str = ".search-results";
pub const DETAIL_CONTAINER_SELECTOR: &str = ".stock-chart-container";
/// Clicks inside these never navigate away from the card.
pub const CARD_FORM_SELECTOR: &str = ".watchlist-form, .remove-form";

thread_local! {
    static LIVE_UPDATES: RefCell<Option<LiveUpdates>> = RefCell::new(None);
    static SEARCH_BOX: RefCell<Option<SearchBox>> = RefCell::new(None);
}

/// Bind the dashboard to the current page. Calling it again replaces the running loop.
pub fn start(client: DashboardClient) -> Result<(), DashboardError> {
    let document = document()?;
    let live_config = client.live_config();
    let debounce = client.config().search_debounce;
    let search_timeout = client.config().request_timeout;
    let client = Rc::new(client);

    let cards = discover_cards(&document)?;
    bind_click_through(&cards);

    let mut update_loop = UpdateLoop::new(live_config);
    update_loop.init(cards);
    let live = LiveUpdates::spawn(update_loop, Rc::clone(&client));
    LIVE_UPDATES.with(|slot| *slot.borrow_mut() = Some(live));

    match SearchBox::bind(&document, Rc::clone(&client), debounce, search_timeout)? {
        Some(search_box) => SEARCH_BOX.with(|slot| *slot.borrow_mut() = Some(search_box)),
        None => tracing::debug!("No search box on this page"),
    }

    draw_detail_chart(&document)?;
    Ok(())
}

/// Stop the live loop started by [`start`].
pub fn stop() {
    LIVE_UPDATES.with(|slot| {
        if let Some(live) = slot.borrow_mut().take() {
            live.stop();
        }
    });
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

pub(crate) fn window() -> Result<Window, DashboardError> {
    web_sys::window().ok_or_else(|| DashboardError::Other("No window".into()))
}

pub(crate) fn document() -> Result<Document, DashboardError> {
    window()?
        .document()
        .ok_or_else(|| DashboardError::Other("No document".into()))
}

/// Point the browser at `path`.
pub(crate) fn navigate(path: &str) {
    let result = window().and_then(|w| w.location().set_href(path).map_err(js_error));
    if let Err(e) = result {
        tracing::error!(path, error = %e, "Navigation failed");
    }
}

pub(crate) fn query(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub(crate) fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, DashboardError> {
    let nodes = document.query_selector_all(selector).map_err(js_error)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Log a failed DOM call instead of propagating it; the page keeps running.
pub(crate) fn log_js(result: Result<(), JsValue>, what: &str) {
    if let Err(e) = result {
        tracing::warn!(error = %extract_js_error(&e), "{} failed", what);
    }
}

pub(crate) fn js_error(err: JsValue) -> DashboardError {
    DashboardError::Other(extract_js_error(&err))
}

fn extract_js_error(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        let name = error.name().as_string().unwrap_or_else(|| "Error".to_string());
        let message = error.message().as_string().unwrap_or_default();
        return if message.is_empty() {
            name
        } else {
            format!("{}: {}", name, message)
        };
    }

    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Escape text for interpolation into `innerHTML`.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
