//! Display formatting for card and search-result text.

pub mod num;

pub use num::{display, display_with_decimals, grouped_integer};

use crate::shared::Direction;

/// Card price text, e.g. `$101.50`.
pub fn price(value: f64) -> String {
    format!("${:.2}", value)
}

/// Parse a rendered price (`$1,234.50`) back into a number.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Card change text, e.g. `↑ $1.50 (1.50%)`.
pub fn change(change: f64, percent_change: f64) -> String {
    let direction = Direction::from_change(change);
    format!(
        "{} ${:.2} ({:.2}%)",
        direction.arrow(),
        change.abs(),
        percent_change.abs()
    )
}

/// Search-result change text, e.g. `+1.5 (1.5%)`.
pub fn signed_change(change: f64, percent_change: f64) -> String {
    let sign = if change >= 0.0 { "+" } else { "" };
    format!(
        "{}{} ({}%)",
        sign,
        display_with_decimals(&change, 2),
        display_with_decimals(&percent_change, 2)
    )
}

/// Card volume text, e.g. `Vol: 1,234,567`.
pub fn volume(volume: u64) -> String {
    format!("Vol: {}", grouped_integer(volume))
}

/// Card timestamp text, e.g. `Updated: 14:03:22`.
pub fn updated_at(stamp: &str) -> String {
    format!("Updated: {}", stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_two_decimals() {
        assert_eq!(price(101.5), "$101.50");
        assert_eq!(price(0.0), "$0.00");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$100.00"), Some(100.0));
        assert_eq!(parse_price(" $1,234.50 "), Some(1234.5));
        assert_eq!(parse_price("--"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn test_change_text() {
        assert_eq!(change(1.5, 1.5), "↑ $1.50 (1.50%)");
        assert_eq!(change(-2.345, -1.2), "↓ $2.35 (1.20%)");
    }

    #[test]
    fn test_signed_change_text() {
        assert_eq!(signed_change(1.5, 1.5), "+1.5 (1.5%)");
        assert_eq!(signed_change(-2.34, -0.87), "-2.34 (-0.87%)");
        assert_eq!(signed_change(0.0, 0.0), "+0 (0%)");
    }

    #[test]
    fn test_volume_and_timestamp() {
        assert_eq!(volume(1_234_567), "Vol: 1,234,567");
        assert_eq!(updated_at("14:03:22"), "Updated: 14:03:22");
    }
}
