//! Search domain: symbol matches and the result panel's state.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::network;
use crate::shared::{fmt, Direction, Symbol};
use serde::{Deserialize, Serialize};

pub use state::{InputAction, PanelContent, SearchPanel, SearchState, SearchTicket};

/// One search result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub symbol: Symbol,
    pub price: f64,
    pub change: f64,
    pub percent_change: f64,
    pub updated_at: String,
}

impl SearchMatch {
    pub fn direction(&self) -> Direction {
        Direction::from_change(self.change)
    }

    /// Navigation target when the row is chosen.
    pub fn detail_path(&self) -> String {
        network::detail_path(self.symbol.as_str())
    }

    pub fn price_label(&self) -> String {
        format!("${}", fmt::display(&self.price))
    }

    pub fn change_label(&self) -> String {
        fmt::signed_change(self.change, self.percent_change)
    }

    pub fn updated_label(&self) -> String {
        fmt::updated_at(&self.updated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let m = SearchMatch {
            symbol: Symbol::from("SBUX"),
            price: 92.3,
            change: -0.45,
            percent_change: -0.48,
            updated_at: "15:59:59".into(),
        };
        assert_eq!(m.price_label(), "$92.3");
        assert_eq!(m.change_label(), "-0.45 (-0.48%)");
        assert_eq!(m.updated_label(), "Updated: 15:59:59");
        assert_eq!(m.direction().class_name(), "negative");
    }
}
