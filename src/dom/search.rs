//! `#stock-search` binding.
//!
//! Debounce is a `gloo_timers` `Timeout` replaced on every keystroke. Each issued
//! request runs under an `AbortHandle` and a deadline; starting a new one aborts the
//! previous, and [`SearchState`] still drops any response whose generation is stale.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures_util::future::{AbortHandle, Abortable};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent, MouseEvent, Node};

use super::{escape_html, log_js, navigate, SEARCH_INPUT_SELECTOR, SEARCH_RESULTS_SELECTOR};
use crate::domain::search::{InputAction, PanelContent, SearchMatch, SearchPanel, SearchState, SearchTicket};
use crate::error::DashboardError;
use crate::typeahead::{failure_message, search_with_deadline, SearchSource};

struct Inner<S> {
    input: HtmlInputElement,
    results: Element,
    source: Rc<S>,
    debounce_ms: u32,
    timeout: Duration,
    state: RefCell<SearchState>,
    debounce: RefCell<Option<Timeout>>,
    request: RefCell<Option<AbortHandle>>,
}

/// A bound search box. Listeners stay attached for the page's lifetime.
pub struct SearchBox {
    cancel: Box<dyn Fn()>,
}

impl SearchBox {
    /// Bind the input and panel on `document`. `Ok(None)` if the page has neither.
    pub fn bind<S>(
        document: &Document,
        source: Rc<S>,
        debounce: Duration,
        timeout: Duration,
    ) -> Result<Option<Self>, DashboardError>
    where
        S: SearchSource + 'static,
    {
        let input = document
            .query_selector(SEARCH_INPUT_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        let results = document.query_selector(SEARCH_RESULTS_SELECTOR).ok().flatten();
        let (Some(input), Some(results)) = (input, results) else {
            return Ok(None);
        };

        let inner = Rc::new(Inner {
            input,
            results,
            source,
            debounce_ms: u32::try_from(debounce.as_millis()).unwrap_or(u32::MAX),
            timeout,
            state: RefCell::new(SearchState::new()),
            debounce: RefCell::new(None),
            request: RefCell::new(None),
        });

        Inner::listen(&inner, document)?;
        tracing::debug!("Search box bound");

        Ok(Some(Self {
            cancel: Box::new(move || inner.cancel()),
        }))
    }

    /// Cancel the pending debounce and any in-flight request.
    pub fn cancel(&self) {
        (self.cancel)();
    }
}

impl<S: SearchSource + 'static> Inner<S> {
    fn listen(this: &Rc<Self>, document: &Document) -> Result<(), DashboardError> {
        let me = Rc::clone(this);
        let oninput = Closure::<dyn FnMut()>::new(move || {
            let value = me.input.value();
            Inner::on_input(&me, &value);
        });
        this.input
            .add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())
            .map_err(super::js_error)?;
        oninput.forget();

        let me = Rc::clone(this);
        let onfocus = Closure::<dyn FnMut()>::new(move || {
            let ticket = me.state.borrow_mut().on_focus();
            if let Some(ticket) = ticket {
                me.render();
                Inner::issue(&me, ticket);
            }
        });
        this.input
            .add_event_listener_with_callback("focus", onfocus.as_ref().unchecked_ref())
            .map_err(super::js_error)?;
        onfocus.forget();

        let me = Rc::clone(this);
        let onkeydown = Closure::<dyn FnMut(_)>::new(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                if let Some(path) = me.state.borrow().on_enter() {
                    navigate(&path);
                }
            }
        });
        this.input
            .add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())
            .map_err(super::js_error)?;
        onkeydown.forget();

        let me = Rc::clone(this);
        let onclick = Closure::<dyn FnMut(_)>::new(move |e: MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside = target.as_ref().is_some_and(|node| {
                me.input.contains(Some(node)) || me.results.contains(Some(node))
            });
            if !inside {
                me.state.borrow_mut().dismiss();
                me.render();
            }
        });
        document
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())
            .map_err(super::js_error)?;
        onclick.forget();

        Ok(())
    }

    fn on_input(this: &Rc<Self>, raw: &str) {
        this.debounce.borrow_mut().take();
        let action = this.state.borrow_mut().on_input(raw);
        this.render();

        match action {
            InputAction::Hide => this.abort_request(),
            InputAction::Debounce(query) => {
                let me = Rc::clone(this);
                let timeout = Timeout::new(this.debounce_ms, move || {
                    let ticket = me.state.borrow_mut().begin_search(&query);
                    Inner::issue(&me, ticket);
                });
                *this.debounce.borrow_mut() = Some(timeout);
            }
        }
    }

    fn issue(this: &Rc<Self>, ticket: SearchTicket) {
        this.abort_request();

        let (abort, registration) = AbortHandle::new_pair();
        *this.request.borrow_mut() = Some(abort);

        let me = Rc::clone(this);
        let request = Abortable::new(
            async move {
                let result = search_with_deadline(me.source.as_ref(), ticket.query(), me.timeout).await;
                let result = result.map_err(|e| failure_message(&e));
                let applied = me.state.borrow_mut().on_response(&ticket, result);
                if applied {
                    me.render();
                }
            },
            registration,
        );
        wasm_bindgen_futures::spawn_local(async move {
            if request.await.is_err() {
                tracing::debug!("Superseded search aborted");
            }
        });
    }

    fn abort_request(&self) {
        if let Some(abort) = self.request.borrow_mut().take() {
            abort.abort();
        }
    }

    fn cancel(&self) {
        self.debounce.borrow_mut().take();
        self.abort_request();
    }

    fn render(&self) {
        let state = self.state.borrow();
        let panel = state.panel();
        let list = self.results.class_list();

        if !panel.visible {
            log_js(list.remove_1("active"), "Hide results");
            return;
        }
        log_js(list.add_1("active"), "Show results");
        self.results.set_inner_html(&panel_html(panel));
    }
}

fn panel_html(panel: &SearchPanel) -> String {
    match &panel.content {
        PanelContent::Empty => String::new(),
        PanelContent::Loading { .. } => concat!(
            r#"<div class="search-loading">"#,
            r#"<span>Searching...</span><div class="search-spinner"></div>"#,
            r#"</div>"#
        )
        .to_string(),
        PanelContent::NoResults { .. } => concat!(
            r#"<div class="search-result-item">"#,
            r#"<div class="search-result-message">No results found</div>"#,
            r#"</div>"#
        )
        .to_string(),
        PanelContent::Failed { message, .. } => format!(
            r#"<div class="search-result-item"><div class="search-error">{}</div></div>"#,
            escape_html(message)
        ),
        PanelContent::Results { matches, .. } => matches.iter().map(result_html).collect(),
    }
}

fn result_html(m: &SearchMatch) -> String {
    format!(
        concat!(
            r#"<a href="{href}" class="search-result-item">"#,
            r#"<div class="search-result-left">"#,
            r#"<span class="search-result-symbol">{symbol}</span>"#,
            r#"<span class="search-result-updated">{updated}</span>"#,
            r#"</div>"#,
            r#"<div class="search-result-right">"#,
            r#"<div class="search-result-price">{price}</div>"#,
            r#"<div class="search-result-change {class}">{change}</div>"#,
            r#"</div>"#,
            r#"</a>"#
        ),
        href = escape_html(&m.detail_path()),
        symbol = escape_html(m.symbol.as_str()),
        updated = escape_html(&m.updated_label()),
        price = escape_html(&m.price_label()),
        class = m.direction().class_name(),
        change = escape_html(&m.change_label()),
    )
}
