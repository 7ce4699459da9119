//! Detail page price chart (`.stock-chart-container[data-history] canvas`).

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement};

use super::canvas::CanvasSurface;
use super::{query, DETAIL_CONTAINER_SELECTOR};
use crate::chart::{self, Palette};
use crate::domain::quote::PriceHistory;
use crate::error::DashboardError;

/// Draw the embedded history with the detail palette. Pages without a chart
/// container, or with an empty history, are left alone.
pub fn draw_detail_chart(document: &Document) -> Result<(), DashboardError> {
    let Some(container) = document
        .query_selector(DETAIL_CONTAINER_SELECTOR)
        .map_err(super::js_error)?
    else {
        return Ok(());
    };
    let Some(canvas) = query(&container, "canvas").and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
    else {
        return Ok(());
    };

    let raw = container.get_attribute("data-history").unwrap_or_default();
    let history = match PriceHistory::from_embedded_json(&raw) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping detail chart");
            return Ok(());
        }
    };
    if history.is_empty() {
        return Ok(());
    }

    let mut surface = CanvasSurface::new(canvas)?;
    let series = history.series();
    chart::render(&mut surface, series.samples(), &Palette::DETAIL);
    tracing::debug!(points = series.len(), "Drew detail chart");
    Ok(())
}
