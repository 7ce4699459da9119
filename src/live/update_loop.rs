//! The update loop: card registry, per-tick bookkeeping, result application.

use std::collections::{HashMap, HashSet};

use futures_util::future::join_all;

use super::{apply_snapshot, fetch_quote, ChartHandle, ChartRegistry, Flash, QuoteCard, QuoteSource};
use crate::config::LiveConfig;
use crate::domain::quote::{PriceSeries, QuoteSnapshot};
use crate::error::{CardError, DashboardError};
use crate::shared::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
}

/// Identifies one applied flash, so a late expiry never clears a newer flash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashTicket {
    pub symbol: Symbol,
    pub flash: Flash,
    seq: u64,
}

struct TrackedCard<C> {
    card: C,
    /// Slot of this card's chart in the registry entry for its symbol.
    chart: Option<usize>,
}

/// Every card showing one symbol. One fetch per tick serves all of them.
struct TrackedSymbol<C> {
    symbol: Symbol,
    cards: Vec<TrackedCard<C>>,
}

/// Owns every registered card and its chart. All card mutation goes through here.
pub struct UpdateLoop<C: QuoteCard> {
    config: LiveConfig,
    state: LoopState,
    tracked: Vec<TrackedSymbol<C>>,
    charts: ChartRegistry<C::Surface>,
    in_flight: HashSet<Symbol>,
    flash_seq: HashMap<Symbol, u64>,
    next_seq: u64,
}

impl<C: QuoteCard> UpdateLoop<C> {
    pub fn new(config: LiveConfig) -> Self {
        Self {
            config,
            state: LoopState::Idle,
            tracked: Vec::new(),
            charts: ChartRegistry::new(),
            in_flight: HashSet::new(),
            flash_seq: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Register `cards`, draw their embedded charts, and move to `Running`.
    ///
    /// Cards without a symbol are skipped with a warning. Several cards may show the
    /// same symbol (main list and watchlist); each of them receives every update.
    /// Calling `init` again once running does nothing. Returns the number of cards
    /// registered by this call.
    pub fn init(&mut self, cards: impl IntoIterator<Item = C>) -> usize {
        if self.state == LoopState::Running {
            tracing::debug!("Update loop already running, ignoring init");
            return 0;
        }

        let mut registered = 0;
        for mut card in cards {
            let Some(symbol) = card.symbol() else {
                tracing::warn!(error = %CardError::MissingSymbol, "Skipping card");
                continue;
            };

            let chart = card.take_chart_surface().map(|surface| {
                let mut handle = ChartHandle::new(symbol.clone(), surface, card.initial_direction());
                if let Some(payload) = card.embedded_chart() {
                    match PriceSeries::from_embedded_json(&payload) {
                        Ok(series) => {
                            let direction = handle.direction();
                            handle.update(series, direction);
                        }
                        Err(e) => {
                            tracing::warn!(symbol = %symbol, error = %e, "Skipping initial chart");
                        }
                    }
                }
                self.charts.register(handle)
            });

            let tracked = TrackedCard { card, chart };
            match self.tracked.iter_mut().find(|t| t.symbol == symbol) {
                Some(existing) => {
                    tracing::debug!(symbol = %symbol, cards = existing.cards.len() + 1, "Another card for symbol");
                    existing.cards.push(tracked);
                }
                None => self.tracked.push(TrackedSymbol {
                    symbol,
                    cards: vec![tracked],
                }),
            }
            registered += 1;
        }

        self.state = LoopState::Running;
        tracing::info!(
            symbols = self.tracked.len(),
            cards = self.card_count(),
            charts = self.charts.chart_count(),
            "Update loop running"
        );
        registered
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn config(&self) -> &LiveConfig {
        &self.config
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.tracked.iter().map(|t| &t.symbol)
    }

    /// Number of distinct symbols polled each tick.
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    pub fn card_count(&self) -> usize {
        self.tracked.iter().map(|t| t.cards.len()).sum()
    }

    /// The first card registered for `symbol`.
    pub fn card(&self, symbol: &Symbol) -> Option<&C> {
        self.cards(symbol).next()
    }

    /// Every card showing `symbol`, in registration order.
    pub fn cards<'a, 's>(&'a self, symbol: &'s Symbol) -> impl Iterator<Item = &'a C> + 's
    where
        'a: 's,
    {
        self.tracked
            .iter()
            .filter(move |t| &t.symbol == symbol)
            .flat_map(|t| t.cards.iter().map(|c| &c.card))
    }

    pub fn charts(&self) -> &ChartRegistry<C::Surface> {
        &self.charts
    }

    pub fn is_in_flight(&self, symbol: &Symbol) -> bool {
        self.in_flight.contains(symbol)
    }

    /// Symbols to fetch this tick. Symbols whose previous fetch has not completed are
    /// left out; the returned ones are marked in flight until [`Self::apply_result`].
    pub fn begin_tick(&mut self) -> Vec<Symbol> {
        if self.state != LoopState::Running {
            return Vec::new();
        }

        let mut due = Vec::with_capacity(self.tracked.len());
        for tracked in &self.tracked {
            if self.in_flight.contains(&tracked.symbol) {
                tracing::debug!(symbol = %tracked.symbol, "Previous fetch still in flight, skipping");
                continue;
            }
            due.push(tracked.symbol.clone());
        }
        self.in_flight.extend(due.iter().cloned());
        tracing::debug!(due = due.len(), in_flight = self.in_flight.len(), "Tick");
        due
    }

    /// Forget fetches that will never report back, so the next tick polls those
    /// symbols again. Drivers call this when they drop pending fetches. Returns how
    /// many were abandoned.
    pub fn abandon_in_flight(&mut self) -> usize {
        let abandoned = self.in_flight.len();
        if abandoned > 0 {
            tracing::debug!(abandoned, "Abandoning in-flight fetches");
        }
        self.in_flight.clear();
        abandoned
    }

    /// Apply one fetch outcome to every card showing `symbol`.
    ///
    /// Failures are logged and leave the cards as they were. A card missing required
    /// elements is skipped; the result is an error only when no card could be updated.
    pub fn apply_result(
        &mut self,
        symbol: &Symbol,
        result: Result<QuoteSnapshot, DashboardError>,
    ) -> Result<Option<FlashTicket>, DashboardError> {
        self.in_flight.remove(symbol);

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Quote update failed");
                return Err(e);
            }
        };

        let Some(tracked) = self.tracked.iter_mut().find(|t| &t.symbol == symbol) else {
            tracing::debug!(symbol = %symbol, "Result for unregistered symbol");
            return Ok(None);
        };

        let mut flash = None;
        let mut updated = 0;
        let mut first_error = None;
        for slot in &mut tracked.cards {
            let chart = slot.chart.and_then(|i| self.charts.slot_mut(symbol, i));
            match apply_snapshot(&mut slot.card, chart, &snapshot) {
                Ok(card_flash) => {
                    updated += 1;
                    flash = flash.or(card_flash);
                }
                Err(e) => {
                    tracing::warn!(symbol = %symbol, error = %e, "Skipping card update");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        if updated == 0 {
            if let Some(e) = first_error {
                return Err(e.into());
            }
        }
        tracing::debug!(symbol = %symbol, price = snapshot.price, cards = updated, flash = ?flash, "Cards updated");

        Ok(flash.map(|flash| {
            self.next_seq += 1;
            self.flash_seq.insert(symbol.clone(), self.next_seq);
            FlashTicket {
                symbol: symbol.clone(),
                flash,
                seq: self.next_seq,
            }
        }))
    }

    /// Remove the flash `ticket` put on every card of its symbol. Returns `false` if
    /// a newer flash replaced it.
    pub fn clear_flash(&mut self, ticket: &FlashTicket) -> bool {
        if self.flash_seq.get(&ticket.symbol) != Some(&ticket.seq) {
            return false;
        }
        self.flash_seq.remove(&ticket.symbol);
        if let Some(tracked) = self.tracked.iter_mut().find(|t| t.symbol == ticket.symbol) {
            for slot in &mut tracked.cards {
                slot.card.set_flash(None);
            }
        }
        true
    }

    /// Run one full tick against `source`: fetch every due symbol concurrently, each
    /// under the configured timeout, then apply the results in order.
    pub async fn tick<Q>(&mut self, source: &Q) -> Vec<FlashTicket>
    where
        Q: QuoteSource + ?Sized,
    {
        let due = self.begin_tick();
        let timeout = self.config.fetch_timeout;
        let results = join_all(due.iter().map(|symbol| fetch_quote(source, symbol, timeout))).await;

        due.iter()
            .zip(results)
            .filter_map(|(symbol, result)| self.apply_result(symbol, result).ok().flatten())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RecordingSurface;
    use crate::error::HttpError;
    use crate::live::CardElement;
    use crate::shared::Direction;
    use std::future::Future;
    use std::sync::Mutex;

    struct TestCard {
        symbol: Option<&'static str>,
        price: String,
        chart: Option<&'static str>,
        surface: Option<RecordingSurface>,
        flash: Option<Flash>,
    }

    fn card(symbol: &'static str, price: &str) -> TestCard {
        TestCard {
            symbol: Some(symbol),
            price: price.to_string(),
            chart: Some("[1.0, 2.0, 3.0]"),
            surface: Some(RecordingSurface::new(120.0, 40.0)),
            flash: None,
        }
    }

    impl QuoteCard for TestCard {
        type Surface = RecordingSurface;

        fn symbol(&self) -> Option<Symbol> {
            self.symbol.and_then(Symbol::parse)
        }
        fn has_element(&self, element: CardElement) -> bool {
            matches!(element, CardElement::Price | CardElement::Change)
        }
        fn embedded_chart(&self) -> Option<String> {
            self.chart.map(str::to_string)
        }
        fn initial_direction(&self) -> Direction {
            Direction::Loss
        }
        fn take_chart_surface(&mut self) -> Option<RecordingSurface> {
            self.surface.take()
        }
        fn price_text(&self) -> Option<String> {
            Some(self.price.clone())
        }
        fn set_text(&mut self, element: CardElement, text: &str) {
            if element == CardElement::Price {
                self.price = text.to_string();
            }
        }
        fn set_direction(&mut self, _direction: Direction) {}
        fn set_flash(&mut self, flash: Option<Flash>) {
            self.flash = flash;
        }
    }

    fn quote(price: f64) -> QuoteSnapshot {
        QuoteSnapshot {
            symbol: None,
            price,
            change: 1.0,
            percent_change: 1.0,
            volume: None,
            updated_at: None,
            chart_data: None,
        }
    }

    struct ScriptedSource {
        prices: Mutex<HashMap<String, f64>>,
    }

    impl QuoteSource for ScriptedSource {
        fn latest(
            &self,
            symbol: &Symbol,
        ) -> impl Future<Output = Result<QuoteSnapshot, DashboardError>> + crate::shared::MaybeSend
        {
            let price = self.prices.lock().unwrap().get(symbol.as_str()).copied();
            async move {
                price
                    .map(quote)
                    .ok_or_else(|| DashboardError::from(HttpError::NotFound("Stock not found".into())))
            }
        }
    }

    #[test]
    fn test_init_registers_and_draws() {
        let mut ul = UpdateLoop::new(LiveConfig::default());
        assert_eq!(ul.state(), LoopState::Idle);

        let mut broken = card("MSFT", "$1.00");
        broken.chart = Some("not json");
        let registered = ul.init([card("AAPL", "$1.00"), broken, card("AAPL", "$2.00")]);

        assert_eq!(registered, 3);
        assert_eq!(ul.state(), LoopState::Running);
        assert_eq!(ul.len(), 2);
        assert_eq!(ul.card_count(), 3);
        assert_eq!(ul.charts().len(), 2);
        assert_eq!(ul.charts().handles(&Symbol::from("AAPL")).len(), 2);

        let aapl = ul.charts().get(&Symbol::from("AAPL")).unwrap();
        assert_eq!(aapl.direction(), Direction::Loss);
        assert_eq!(aapl.surface().line().unwrap().len(), 3);
        assert!(ul.charts().get(&Symbol::from("MSFT")).unwrap().surface().is_blank());
    }

    #[test]
    fn test_init_skips_blank_symbol_and_is_idempotent() {
        let mut ul = UpdateLoop::new(LiveConfig::default());
        let mut blank = card("AAPL", "$1.00");
        blank.symbol = Some("  ");
        assert_eq!(ul.init([blank]), 0);
        assert_eq!(ul.init([card("TSLA", "$1.00")]), 0);
        assert!(ul.is_empty());
    }

    #[test]
    fn test_begin_tick_skips_in_flight() {
        let mut ul = UpdateLoop::new(LiveConfig::default());
        assert!(ul.begin_tick().is_empty());

        ul.init([card("AAPL", "$1.00"), card("TSLA", "$1.00")]);
        assert_eq!(ul.begin_tick().len(), 2);

        let aapl = Symbol::from("AAPL");
        ul.apply_result(&aapl, Ok(quote(2.0))).unwrap();
        assert_eq!(ul.begin_tick(), vec![aapl]);
        assert!(ul.is_in_flight(&Symbol::from("TSLA")));
    }

    #[test]
    fn test_repeated_symbol_updates_every_card() {
        let mut ul = UpdateLoop::new(LiveConfig::default());
        ul.init([card("AAPL", "$100.00"), card("TSLA", "$1.00"), card("AAPL", "$100.00")]);
        let aapl = Symbol::from("AAPL");

        assert_eq!(ul.begin_tick(), vec![aapl.clone(), Symbol::from("TSLA")]);

        let mut snapshot = quote(101.0);
        snapshot.chart_data = Some(PriceSeries::new(vec![99.0, 100.0, 101.0, 101.0]));
        let ticket = ul.apply_result(&aapl, Ok(snapshot)).unwrap().unwrap();
        assert_eq!(ticket.flash, Flash::Up);

        let prices: Vec<&str> = ul.cards(&aapl).map(|c| c.price.as_str()).collect();
        assert_eq!(prices, vec!["$101.00", "$101.00"]);
        assert!(ul.cards(&aapl).all(|c| c.flash == Some(Flash::Up)));
        for chart in ul.charts().handles(&aapl) {
            assert_eq!(chart.surface().line().unwrap().len(), 4);
        }

        assert!(ul.clear_flash(&ticket));
        assert!(ul.cards(&aapl).all(|c| c.flash.is_none()));
    }

    #[test]
    fn test_abandoned_fetches_are_polled_again() {
        let mut ul = UpdateLoop::new(LiveConfig::default());
        ul.init([card("AAPL", "$1.00"), card("TSLA", "$1.00")]);
        assert_eq!(ul.begin_tick().len(), 2);
        assert!(ul.begin_tick().is_empty());

        assert_eq!(ul.abandon_in_flight(), 2);
        assert!(!ul.is_in_flight(&Symbol::from("AAPL")));
        assert_eq!(ul.begin_tick().len(), 2);
    }

    #[test]
    fn test_stale_flash_ticket_does_not_clear_newer_flash() {
        let mut ul = UpdateLoop::new(LiveConfig::default());
        ul.init([card("AAPL", "$100.00")]);
        let aapl = Symbol::from("AAPL");

        ul.begin_tick();
        let first = ul.apply_result(&aapl, Ok(quote(101.0))).unwrap().unwrap();
        ul.begin_tick();
        let second = ul.apply_result(&aapl, Ok(quote(100.5))).unwrap().unwrap();
        assert_eq!(second.flash, Flash::Down);

        assert!(!ul.clear_flash(&first));
        assert_eq!(ul.card(&aapl).unwrap().flash, Some(Flash::Down));
        assert!(ul.clear_flash(&second));
        assert_eq!(ul.card(&aapl).unwrap().flash, None);
    }

    #[tokio::test]
    async fn test_tick_isolates_failures() {
        let mut ul = UpdateLoop::new(LiveConfig::default());
        ul.init([card("AAPL", "$100.00"), card("TSLA", "$200.00")]);
        let source = ScriptedSource {
            prices: Mutex::new(HashMap::from([("TSLA".to_string(), 199.0)])),
        };

        let flashes = ul.tick(&source).await;
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].symbol.as_str(), "TSLA");
        assert_eq!(ul.card(&Symbol::from("AAPL")).unwrap().price, "$100.00");

        source.prices.lock().unwrap().insert("AAPL".into(), 101.5);
        let flashes = ul.tick(&source).await;
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].flash, Flash::Up);
        assert_eq!(ul.card(&Symbol::from("AAPL")).unwrap().price, "$101.50");
    }
}
