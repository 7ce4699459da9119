//! # quoteboard
//!
//! Live stock-quote dashboard client: polling quote cards with price flashes and
//! sparklines, plus a debounced symbol search. Runs natively (tokio) and in the
//! browser (WASM).
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Symbols, quote/search domain types, formatting (always available, WASM-safe)
//! 2. **Charts**: Sparkline geometry behind a minimal drawing-surface trait
//! 3. **HTTP API**: `DashboardHttp` with per-endpoint retry policies
//! 4. **High-Level Client**: `DashboardClient` with nested sub-clients
//! 5. **Live updates & search**: `UpdateLoop` and typeahead, with native (tokio) and
//!    WASM (`spawn_local`) drivers
//! 6. **Browser bindings**: `web-sys` cards, canvas, and search box
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quoteboard::prelude::*;
//! use std::sync::Arc;
//!
//! let client = DashboardClient::builder()
//!     .base_url("http://127.0.0.1:5000")
//!     .build()?;
//!
//! let quote = client.quotes().latest(&Symbol::from("AAPL")).await?;
//! let matches = client.search().query("AA").await?;
//!
//! let mut update_loop = UpdateLoop::new(client.live_config());
//! update_loop.init(cards);
//! let live = LiveUpdates::spawn(update_loop, Arc::new(client));
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and formatting used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified error types.
pub mod error;

/// Default URL and endpoint paths.
pub mod network;

/// Dashboard configuration and environment overrides.
pub mod config;

// ── Layer 2: Charts ──────────────────────────────────────────────────────────

/// Sparkline layout, palettes, drawing surfaces.
pub mod chart;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `DashboardClient`: the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 5: Live updates & search ───────────────────────────────────────────

/// Quote card update loop and its drivers.
pub mod live;

/// Debounced search sources and the native driver.
pub mod typeahead;

// ── Layer 6: Browser bindings ────────────────────────────────────────────────

/// `web-sys` bindings for the dashboard page.
#[cfg(feature = "wasm")]
pub mod dom;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Direction, Symbol};

    // Domain types: quote
    pub use crate::domain::quote::{HistoryPoint, PriceHistory, PriceSeries, QuoteSnapshot};

    // Domain types: search
    pub use crate::domain::search::{PanelContent, SearchMatch, SearchPanel, SearchState};

    // Charts
    pub use crate::chart::{Palette, RecordingSurface, SparklineGeometry, SparklineSurface};

    // Live updates
    pub use crate::live::{
        CardElement, ChartHandle, ChartRegistry, Flash, LoopState, QuoteCard, QuoteSource,
        UpdateLoop,
    };
    #[cfg(feature = "native")]
    pub use crate::live::native::{LiveEvent, LiveUpdates};

    // Search
    pub use crate::typeahead::SearchSource;
    #[cfg(feature = "native")]
    pub use crate::typeahead::native::{Typeahead, TypeaheadEvent};

    // Errors
    pub use crate::error::{CardError, ChartDataError, DashboardError, HttpError};

    // Configuration
    pub use crate::config::{DashboardConfig, LiveConfig, QuoteEndpoint};
    pub use crate::network::DEFAULT_API_URL;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{DashboardClient, DashboardClientBuilder, QuotesClient, SearchClient};
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
}
