//! Live quote cards: periodic polling, price flashes, sparkline refresh.
//!
//! [`UpdateLoop`] owns every registered card and its [`ChartHandle`], and is the only
//! thing that mutates them. It is runtime-agnostic; the drivers decide how ticks and
//! flash expiries are scheduled:
//!
//! - `native`: a tokio task `select!`ing over the poll interval, a stop signal, the
//!   next flash deadline, and in-flight fetches.
//! - `wasm`: a `spawn_local` future over a `gloo_timers` interval.
//!
//! Cards are reached through the [`QuoteCard`] trait, so the same loop drives DOM cards
//! in the browser and in-memory cards in tests.

mod presenter;
pub mod registry;
pub mod source;
mod update_loop;

#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "wasm")]
pub mod wasm;

use crate::chart::SparklineSurface;
use crate::shared::{Direction, Symbol};

pub use presenter::apply_snapshot;
pub use registry::{ChartHandle, ChartRegistry};
pub use source::{fetch_quote, QuoteSource};
pub use update_loop::{FlashTicket, LoopState, UpdateLoop};

/// The text-bearing parts of a quote card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardElement {
    Price,
    Change,
    Volume,
    Timestamp,
    Chart,
}

impl CardElement {
    /// Selector of the element inside a `.stock-card`.
    pub fn selector(&self) -> &'static str {
        match self {
            CardElement::Price => ".stock-price",
            CardElement::Change => ".stock-change",
            CardElement::Volume => ".stock-volume",
            CardElement::Timestamp => ".timestamp",
            CardElement::Chart => "canvas.stock-mini-chart",
        }
    }

    /// An update cannot be shown without these.
    pub const REQUIRED: [CardElement; 2] = [CardElement::Price, CardElement::Change];
}

/// Short highlight on the price after it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flash {
    Up,
    Down,
}

impl Flash {
    pub const CLASSES: [&'static str; 2] = ["flash-green", "flash-red"];

    /// `None` when there is no prior price or it did not move.
    pub fn between(previous: Option<f64>, next: f64) -> Option<Self> {
        let previous = previous?;
        if next > previous {
            Some(Flash::Up)
        } else if next < previous {
            Some(Flash::Down)
        } else {
            None
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Flash::Up => "flash-green",
            Flash::Down => "flash-red",
        }
    }
}

/// One quote card as the update loop sees it.
pub trait QuoteCard {
    type Surface: SparklineSurface;

    /// `data-symbol`, if present and non-blank.
    fn symbol(&self) -> Option<Symbol>;

    fn has_element(&self, element: CardElement) -> bool;

    /// Raw `data-chart` payload rendered into the card.
    fn embedded_chart(&self) -> Option<String>;

    /// Direction the card was rendered with, read from the change element's class.
    fn initial_direction(&self) -> Direction;

    /// Hand the card's mini-chart surface over to a [`ChartHandle`]. Called once.
    fn take_chart_surface(&mut self) -> Option<Self::Surface>;

    /// Current price text, e.g. `$100.00`.
    fn price_text(&self) -> Option<String>;

    fn set_text(&mut self, element: CardElement, text: &str);

    /// Swap the change element's `positive`/`negative` class.
    fn set_direction(&mut self, direction: Direction);

    /// Replace the price flash class; `None` removes it.
    fn set_flash(&mut self, flash: Option<Flash>);
}

impl<C: QuoteCard + ?Sized> QuoteCard for Box<C> {
    type Surface = C::Surface;

    fn symbol(&self) -> Option<Symbol> {
        (**self).symbol()
    }

    fn has_element(&self, element: CardElement) -> bool {
        (**self).has_element(element)
    }

    fn embedded_chart(&self) -> Option<String> {
        (**self).embedded_chart()
    }

    fn initial_direction(&self) -> Direction {
        (**self).initial_direction()
    }

    fn take_chart_surface(&mut self) -> Option<Self::Surface> {
        (**self).take_chart_surface()
    }

    fn price_text(&self) -> Option<String> {
        (**self).price_text()
    }

    fn set_text(&mut self, element: CardElement, text: &str) {
        (**self).set_text(element, text)
    }

    fn set_direction(&mut self, direction: Direction) {
        (**self).set_direction(direction)
    }

    fn set_flash(&mut self, flash: Option<Flash>) {
        (**self).set_flash(flash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_between() {
        assert_eq!(Flash::between(Some(100.0), 101.5), Some(Flash::Up));
        assert_eq!(Flash::between(Some(100.0), 99.0), Some(Flash::Down));
        assert_eq!(Flash::between(Some(100.0), 100.0), None);
        assert_eq!(Flash::between(None, 100.0), None);
    }

    #[test]
    fn test_flash_class_names() {
        assert_eq!(Flash::Up.class_name(), "flash-green");
        assert_eq!(Flash::Down.class_name(), "flash-red");
    }
}
