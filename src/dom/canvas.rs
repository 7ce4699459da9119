//! `CanvasRenderingContext2d`-backed sparkline surface.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{js_error, log_js};
use crate::chart::{Point, Size, SparklineSurface, Stroke, VerticalGradient};
use crate::error::DashboardError;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, DashboardError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| DashboardError::Other("Canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| DashboardError::Other("Unexpected canvas context type".into()))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn trace(&self, points: &[Point]) {
        self.ctx.begin_path();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.ctx.move_to(first.x, first.y);
        }
        for p in iter {
            self.ctx.line_to(p.x, p.y);
        }
    }
}

impl SparklineSurface for CanvasSurface {
    fn size(&self) -> Size {
        Size::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.width, size.height);
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        self.trace(points);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.set_line_width(stroke.width);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, outline: &[Point], fill: &VerticalGradient) {
        let gradient = self.ctx.create_linear_gradient(0.0, fill.y0, 0.0, fill.y1);
        log_js(gradient.add_color_stop(0.0, &fill.top.to_css()), "Gradient stop");
        log_js(gradient.add_color_stop(1.0, &fill.bottom.to_css()), "Gradient stop");

        self.trace(outline);
        self.ctx.close_path();
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill();
    }
}
