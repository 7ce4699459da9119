//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod deadline;
pub mod fmt;
pub mod serde_util;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── Symbol ──────────────────────────────────────────────────────────────────

/// Newtype for ticker symbols (e.g. `"AAPL"`).
///
/// Surrounding whitespace is trimmed on construction; case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.len() == s.len() {
            Self(s)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Parse a symbol read from markup; blank values are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Symbol::new(s))
    }
}

impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Symbol::new(s))
    }
}

// ─── Direction ───────────────────────────────────────────────────────────────

/// Sign of a price change: drives colours and `positive`/`negative` classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Gain,
    Loss,
}

impl Direction {
    /// A zero change counts as a gain.
    pub fn from_change(change: f64) -> Self {
        if change >= 0.0 {
            Direction::Gain
        } else {
            Direction::Loss
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Direction::Gain)
    }

    /// CSS class carried by the change element.
    pub fn class_name(&self) -> &'static str {
        match self {
            Direction::Gain => "positive",
            Direction::Loss => "negative",
        }
    }

    /// Read a direction back from a rendered class list.
    pub fn from_class_list<'a>(classes: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        classes.into_iter().find_map(|c| match c {
            "positive" => Some(Direction::Gain),
            "negative" => Some(Direction::Loss),
            _ => None,
        })
    }

    pub fn arrow(&self) -> char {
        match self {
            Direction::Gain => '↑',
            Direction::Loss => '↓',
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Direction::Gain => write!(f, "gain"),
            Direction::Loss => write!(f, "loss"),
        }
    }
}

// ─── MaybeSend ───────────────────────────────────────────────────────────────

/// `Send` on native targets, nothing on wasm32.
///
/// Browser fetch futures are `!Send`; native drivers move futures onto a tokio task.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + ?Sized> MaybeSend for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSend for T {}

// ─── ApiErrorBody ────────────────────────────────────────────────────────────

/// `{"error": "..."}` body the dashboard API returns instead of a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
