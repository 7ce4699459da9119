//! Writing a quote snapshot onto a card.

use super::{CardElement, ChartHandle, Flash, QuoteCard};
use crate::chart::SparklineSurface;
use crate::domain::quote::QuoteSnapshot;
use crate::error::CardError;
use crate::shared::fmt;

/// Apply `snapshot` to `card` (and its chart, if it has one).
///
/// Price and change elements are required; a card missing either is left untouched.
/// Volume and timestamp are written only when both the element and the value exist.
/// Returns the flash applied to the price, if the price moved.
pub fn apply_snapshot<C, S>(
    card: &mut C,
    chart: Option<&mut ChartHandle<S>>,
    snapshot: &QuoteSnapshot,
) -> Result<Option<Flash>, CardError>
where
    C: QuoteCard + ?Sized,
    S: SparklineSurface,
{
    let missing: Vec<CardElement> = CardElement::REQUIRED
        .into_iter()
        .filter(|e| !card.has_element(*e))
        .collect();
    if !missing.is_empty() {
        return Err(CardError::MissingElements {
            symbol: card
                .symbol()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            missing,
        });
    }

    let previous = card.price_text().as_deref().and_then(fmt::parse_price);
    card.set_text(CardElement::Price, &fmt::price(snapshot.price));

    let flash = Flash::between(previous, snapshot.price);
    if flash.is_some() {
        card.set_flash(flash);
    }

    let direction = snapshot.direction();
    card.set_direction(direction);
    card.set_text(
        CardElement::Change,
        &fmt::change(snapshot.change, snapshot.percent_change),
    );

    if let Some(volume) = snapshot.volume {
        if card.has_element(CardElement::Volume) {
            card.set_text(CardElement::Volume, &fmt::volume(volume));
        }
    }
    if let Some(stamp) = snapshot.updated_at.as_deref() {
        if card.has_element(CardElement::Timestamp) {
            card.set_text(CardElement::Timestamp, &fmt::updated_at(stamp));
        }
    }

    if let (Some(handle), Some(series)) = (chart, snapshot.chart_data.as_ref()) {
        handle.update(series.clone(), direction);
    }

    Ok(flash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RecordingSurface;
    use crate::domain::quote::PriceSeries;
    use crate::shared::{Direction, Symbol};
    use std::collections::HashMap;

    #[derive(Default)]
    struct TestCard {
        texts: HashMap<CardElement, String>,
        direction: Option<Direction>,
        flash: Option<Flash>,
    }

    impl TestCard {
        fn with(elements: &[(CardElement, &str)]) -> Self {
            Self {
                texts: elements.iter().map(|(e, t)| (*e, t.to_string())).collect(),
                ..Default::default()
            }
        }
    }

    impl QuoteCard for TestCard {
        type Surface = RecordingSurface;

        fn symbol(&self) -> Option<Symbol> {
            Some(Symbol::from("AAPL"))
        }
        fn has_element(&self, element: CardElement) -> bool {
            self.texts.contains_key(&element)
        }
        fn embedded_chart(&self) -> Option<String> {
            None
        }
        fn initial_direction(&self) -> Direction {
            Direction::Gain
        }
        fn take_chart_surface(&mut self) -> Option<RecordingSurface> {
            None
        }
        fn price_text(&self) -> Option<String> {
            self.texts.get(&CardElement::Price).cloned()
        }
        fn set_text(&mut self, element: CardElement, text: &str) {
            self.texts.insert(element, text.to_string());
        }
        fn set_direction(&mut self, direction: Direction) {
            self.direction = Some(direction);
        }
        fn set_flash(&mut self, flash: Option<Flash>) {
            self.flash = flash;
        }
    }

    fn snapshot(price: f64, change: f64) -> QuoteSnapshot {
        QuoteSnapshot {
            symbol: Some(Symbol::from("AAPL")),
            price,
            change,
            percent_change: change,
            volume: Some(1_234_567),
            updated_at: Some("14:03:22".into()),
            chart_data: Some(PriceSeries::new(vec![100.0, 100.5, price])),
        }
    }

    fn full_card(price: &str) -> TestCard {
        TestCard::with(&[
            (CardElement::Price, price),
            (CardElement::Change, ""),
            (CardElement::Volume, ""),
            (CardElement::Timestamp, ""),
        ])
    }

    #[test]
    fn test_rise_flashes_green_and_formats_text() {
        let mut card = full_card("$100.00");
        let flash = apply_snapshot::<_, RecordingSurface>(&mut card, None, &snapshot(101.5, 1.5))
            .unwrap();

        assert_eq!(flash, Some(Flash::Up));
        assert_eq!(card.flash, Some(Flash::Up));
        assert_eq!(card.texts[&CardElement::Price], "$101.50");
        assert_eq!(card.texts[&CardElement::Change], "↑ $1.50 (1.50%)");
        assert_eq!(card.texts[&CardElement::Volume], "Vol: 1,234,567");
        assert_eq!(card.texts[&CardElement::Timestamp], "Updated: 14:03:22");
        assert_eq!(card.direction, Some(Direction::Gain));
    }

    #[test]
    fn test_fall_flashes_red() {
        let mut card = full_card("$100.00");
        let flash =
            apply_snapshot::<_, RecordingSurface>(&mut card, None, &snapshot(99.0, -1.0)).unwrap();
        assert_eq!(flash, Some(Flash::Down));
        assert_eq!(card.direction, Some(Direction::Loss));
        assert!(card.texts[&CardElement::Change].starts_with('↓'));
    }

    #[test]
    fn test_unchanged_or_unreadable_price_no_flash() {
        let mut card = full_card("$101.50");
        let flash =
            apply_snapshot::<_, RecordingSurface>(&mut card, None, &snapshot(101.5, 0.0)).unwrap();
        assert_eq!(flash, None);

        let mut card = full_card("--");
        let flash =
            apply_snapshot::<_, RecordingSurface>(&mut card, None, &snapshot(101.5, 0.0)).unwrap();
        assert_eq!(flash, None);
        assert_eq!(card.flash, None);
    }

    #[test]
    fn test_missing_required_elements() {
        let mut card = TestCard::with(&[(CardElement::Price, "$1.00")]);
        let err =
            apply_snapshot::<_, RecordingSurface>(&mut card, None, &snapshot(2.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            CardError::MissingElements {
                symbol: "AAPL".into(),
                missing: vec![CardElement::Change],
            }
        );
        assert_eq!(card.texts[&CardElement::Price], "$1.00");
    }

    #[test]
    fn test_optional_elements_skipped() {
        let mut card = TestCard::with(&[(CardElement::Price, "$1.00"), (CardElement::Change, "")]);
        apply_snapshot::<_, RecordingSurface>(&mut card, None, &snapshot(2.0, 1.0)).unwrap();
        assert!(!card.texts.contains_key(&CardElement::Volume));
        assert!(!card.texts.contains_key(&CardElement::Timestamp));
    }

    #[test]
    fn test_chart_redrawn_with_change_sign() {
        let mut card = full_card("$100.00");
        let mut chart = ChartHandle::new(
            Symbol::from("AAPL"),
            RecordingSurface::new(120.0, 40.0),
            Direction::Gain,
        );
        apply_snapshot(&mut card, Some(&mut chart), &snapshot(99.0, -1.0)).unwrap();
        assert_eq!(chart.direction(), Direction::Loss);
        assert_eq!(chart.series().len(), 3);
        assert_eq!(chart.surface().line().unwrap().len(), 3);
    }
}
