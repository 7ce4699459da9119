//! `.stock-card` elements as [`QuoteCard`]s.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, MouseEvent};

use super::canvas::CanvasSurface;
use super::{log_js, navigate, query, query_all, CARD_FORM_SELECTOR, CARD_SELECTOR};
use crate::error::DashboardError;
use crate::live::{CardElement, Flash, QuoteCard};
use crate::network;
use crate::shared::{Direction, Symbol};

/// A card and the child elements an update touches, resolved once.
pub struct DomCard {
    root: Element,
    price: Option<Element>,
    change: Option<Element>,
    volume: Option<Element>,
    timestamp: Option<Element>,
    canvas: Option<HtmlCanvasElement>,
}

impl DomCard {
    pub fn from_element(root: Element) -> Self {
        let canvas = query(&root, CardElement::Chart.selector())
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        Self {
            price: query(&root, CardElement::Price.selector()),
            change: query(&root, CardElement::Change.selector()),
            volume: query(&root, CardElement::Volume.selector()),
            timestamp: query(&root, CardElement::Timestamp.selector()),
            canvas,
            root,
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    fn element(&self, element: CardElement) -> Option<&Element> {
        match element {
            CardElement::Price => self.price.as_ref(),
            CardElement::Change => self.change.as_ref(),
            CardElement::Volume => self.volume.as_ref(),
            CardElement::Timestamp => self.timestamp.as_ref(),
            CardElement::Chart => None,
        }
    }
}

impl QuoteCard for DomCard {
    type Surface = CanvasSurface;

    fn symbol(&self) -> Option<Symbol> {
        self.root
            .get_attribute("data-symbol")
            .and_then(|s| Symbol::parse(&s))
    }

    fn has_element(&self, element: CardElement) -> bool {
        match element {
            CardElement::Chart => self.canvas.is_some(),
            other => self.element(other).is_some(),
        }
    }

    fn embedded_chart(&self) -> Option<String> {
        self.root.get_attribute("data-chart")
    }

    fn initial_direction(&self) -> Direction {
        let Some(change) = &self.change else {
            return Direction::default();
        };
        let list = change.class_list();
        let classes: Vec<String> = (0..list.length()).filter_map(|i| list.item(i)).collect();
        Direction::from_class_list(classes.iter().map(String::as_str)).unwrap_or_default()
    }

    fn take_chart_surface(&mut self) -> Option<CanvasSurface> {
        let canvas = self.canvas.take()?;
        match CanvasSurface::new(canvas) {
            Ok(surface) => Some(surface),
            Err(e) => {
                tracing::warn!(symbol = ?self.symbol(), error = %e, "Mini chart unavailable");
                None
            }
        }
    }

    fn price_text(&self) -> Option<String> {
        self.price.as_ref().and_then(|el| el.text_content())
    }

    fn set_text(&mut self, element: CardElement, text: &str) {
        if let Some(el) = self.element(element) {
            el.set_text_content(Some(text));
        }
    }

    fn set_direction(&mut self, direction: Direction) {
        if let Some(change) = &self.change {
            let list = change.class_list();
            log_js(list.remove_2("positive", "negative"), "Change class removal");
            log_js(list.add_1(direction.class_name()), "Change class");
        }
    }

    fn set_flash(&mut self, flash: Option<Flash>) {
        let Some(price) = &self.price else {
            return;
        };
        let list = price.class_list();
        log_js(list.remove_2(Flash::CLASSES[0], Flash::CLASSES[1]), "Flash removal");

        if let Some(flash) = flash {
            // Force a reflow so the animation restarts on consecutive flashes.
            if let Some(html) = price.dyn_ref::<HtmlElement>() {
                let _ = html.offset_width();
            }
            log_js(list.add_1(flash.class_name()), "Flash");
        }
    }
}

/// Every `.stock-card` on the page.
pub fn discover_cards(document: &Document) -> Result<Vec<DomCard>, DashboardError> {
    let cards: Vec<DomCard> = query_all(document, CARD_SELECTOR)?
        .into_iter()
        .map(DomCard::from_element)
        .collect();
    tracing::info!(count = cards.len(), "Found stock cards");
    Ok(cards)
}

/// Clicking a card opens its detail page, unless the click was inside one of the
/// card's watchlist forms.
pub fn bind_click_through(cards: &[DomCard]) {
    for card in cards {
        let Some(symbol) = card.symbol() else {
            continue;
        };
        let path = network::detail_path(symbol.as_str());

        let onclick = Closure::<dyn FnMut(_)>::new(move |e: MouseEvent| {
            let in_form = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(CARD_FORM_SELECTOR).ok().flatten())
                .is_some();
            if !in_form {
                navigate(&path);
            }
        });
        log_js(
            card.root()
                .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref()),
            "Card click listener",
        );
        onclick.forget();
    }
}
