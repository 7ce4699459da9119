//! Per-symbol chart handles.

use std::collections::HashMap;

use crate::chart::{self, SparklineSurface};
use crate::domain::quote::PriceSeries;
use crate::shared::{Direction, Symbol};

/// A card's mini chart: its surface plus the series and colour last drawn on it.
#[derive(Debug)]
pub struct ChartHandle<S> {
    symbol: Symbol,
    surface: S,
    series: PriceSeries,
    direction: Direction,
}

impl<S: SparklineSurface> ChartHandle<S> {
    pub fn new(symbol: Symbol, surface: S, direction: Direction) -> Self {
        Self {
            symbol,
            surface,
            series: PriceSeries::default(),
            direction,
        }
    }

    /// Replace the series and redraw. Returns `false` when there was nothing to draw.
    pub fn update(&mut self, series: PriceSeries, direction: Direction) -> bool {
        self.series = series;
        self.direction = direction;
        self.redraw()
    }

    pub fn redraw(&mut self) -> bool {
        let drawn =
            chart::render_direction(&mut self.surface, self.series.samples(), self.direction)
                .is_some();
        if !drawn {
            tracing::debug!(symbol = %self.symbol, samples = self.series.len(), "Chart cleared, too few samples");
        }
        drawn
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Symbol → chart handles. Owned by the update loop.
///
/// One entry per symbol. A symbol shown on several cards (main list and watchlist)
/// keeps one handle per card, addressed by the slot [`ChartRegistry::register`] returns.
#[derive(Debug)]
pub struct ChartRegistry<S> {
    handles: HashMap<Symbol, Vec<ChartHandle<S>>>,
}

impl<S> Default for ChartRegistry<S> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<S: SparklineSurface> ChartRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle under its symbol. Returns its slot among that symbol's handles.
    pub fn register(&mut self, handle: ChartHandle<S>) -> usize {
        let slots = self.handles.entry(handle.symbol().clone()).or_default();
        slots.push(handle);
        slots.len() - 1
    }

    /// The first chart registered for `symbol`.
    pub fn get(&self, symbol: &Symbol) -> Option<&ChartHandle<S>> {
        self.handles.get(symbol).and_then(|slots| slots.first())
    }

    /// Every chart showing `symbol`, in registration order.
    pub fn handles(&self, symbol: &Symbol) -> &[ChartHandle<S>] {
        self.handles.get(symbol).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn slot_mut(&mut self, symbol: &Symbol, slot: usize) -> Option<&mut ChartHandle<S>> {
        self.handles.get_mut(symbol).and_then(|slots| slots.get_mut(slot))
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.handles.contains_key(symbol)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Number of handles across all symbols.
    pub fn chart_count(&self) -> usize {
        self.handles.values().map(Vec::len).sum()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.handles.keys()
    }
}
