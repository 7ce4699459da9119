//! Network URL and path constants for the dashboard API.

/// Default REST API base URL (the dashboard's own origin in development).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Latest-quote path, `{symbol}` substituted per request.
pub const LATEST_QUOTE_PATH: &str = "/api/stock/{symbol}/latest";

/// Legacy quote path, also the detail page navigation target.
pub const STOCK_PAGE_PATH: &str = "/stock/{symbol}";

/// Search path; the query goes in `?q=`.
pub const SEARCH_PATH: &str = "/search";

/// Relative URL of a symbol's detail page.
pub fn detail_path(symbol: &str) -> String {
    STOCK_PAGE_PATH.replace("{symbol}", symbol)
}
