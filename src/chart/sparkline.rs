//! Sparkline layout and rendering.
//!
//! Samples are spread evenly left to right (oldest at `x = 0`, newest at
//! `x = width`) and scaled into the bottom 80% of the surface:
//!
//! ```text
//! x = i / (n - 1) * width
//! y = height - (v - min) / range * (height * 0.8)
//! ```
//!
//! A flat series has `range = 0`; it is treated as `1`, which pins the line to the
//! bottom edge instead of dividing by zero.

use super::{Palette, Point, Size, SparklineSurface};
use crate::shared::Direction;

/// Stroke width of the sparkline, in pixels.
pub const LINE_WIDTH: f64 = 1.5;

/// Share of the surface height the line may occupy; the rest is headroom.
pub const PLOT_HEIGHT_RATIO: f64 = 0.8;

/// Computed sparkline coordinates for one series on one surface size.
#[derive(Debug, Clone, PartialEq)]
pub struct SparklineGeometry {
    pub size: Size,
    pub min: f64,
    pub max: f64,
    /// `max - min`, or `1.0` for a flat series. Half of `max - min` when the full
    /// span overflows.
    pub range: f64,
    pub line: Vec<Point>,
}

impl SparklineGeometry {
    /// The line closed down to the bottom edge: right corner, then left corner.
    pub fn area(&self) -> Vec<Point> {
        let mut outline = Vec::with_capacity(self.line.len() + 2);
        outline.extend_from_slice(&self.line);
        outline.push(Point::new(self.size.width, self.size.height));
        outline.push(Point::new(0.0, self.size.height));
        outline
    }
}

/// Lay out `series` on a surface of `size`.
///
/// Non-finite samples are skipped. Returns `None` when fewer than two samples remain
/// or the size itself is not drawable.
pub fn layout(size: Size, series: &[f64]) -> Option<SparklineGeometry> {
    if !size.is_drawable() {
        return None;
    }

    let samples: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    if samples.len() < 2 {
        return None;
    }

    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let span = max - min;
    // Extreme finite inputs overflow `max - min`; both ends are halved in that case.
    let (shift, range) = if span.is_finite() {
        (1.0, if span == 0.0 { 1.0 } else { span })
    } else {
        (0.5, max * 0.5 - min * 0.5)
    };

    let last = (samples.len() - 1) as f64;
    let plot_height = size.height * PLOT_HEIGHT_RATIO;
    let line = samples
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = i as f64 / last * size.width;
            let y = size.height - ((v * shift - min * shift) / range) * plot_height;
            Point::new(x, y)
        })
        .collect();

    Some(SparklineGeometry {
        size,
        min,
        max,
        range,
        line,
    })
}

/// Clear `surface` and draw `series` with `palette`.
///
/// Idempotent: the same inputs always leave the surface in the same state. When the
/// series is too short to draw a line the surface is left cleared.
pub fn render<S>(surface: &mut S, series: &[f64], palette: &Palette) -> Option<SparklineGeometry>
where
    S: SparklineSurface + ?Sized,
{
    surface.clear();

    let geometry = layout(surface.size(), series)?;
    surface.stroke_polyline(&geometry.line, &palette.stroke());
    surface.fill_polygon(&geometry.area(), &palette.gradient(geometry.size.height));
    Some(geometry)
}

/// [`render`] with the gain/loss palette for `direction`.
pub fn render_direction<S>(
    surface: &mut S,
    series: &[f64],
    direction: Direction,
) -> Option<SparklineGeometry>
where
    S: SparklineSurface + ?Sized,
{
    render(surface, series, &Palette::for_direction(direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DrawOp, RecordingSurface};

    const W: f64 = 120.0;
    const H: f64 = 40.0;

    #[test]
    fn test_line_spans_full_width() {
        let geometry = layout(Size::new(W, H), &[3.0, 1.0, 4.0, 1.0, 5.0]).unwrap();
        assert_eq!(geometry.line.first().unwrap().x, 0.0);
        assert_eq!(geometry.line.last().unwrap().x, W);
        assert_eq!(geometry.line.len(), 5);
    }

    #[test]
    fn test_extremes_scaled_into_bottom_eighty_percent() {
        let geometry = layout(Size::new(W, H), &[10.0, 20.0]).unwrap();
        assert_eq!(geometry.line[0].y, H);
        assert!((geometry.line[1].y - H * 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_flat_series_stays_finite() {
        let geometry = layout(Size::new(W, H), &[7.0, 7.0, 7.0]).unwrap();
        assert_eq!(geometry.range, 1.0);
        for p in &geometry.line {
            assert!(p.x.is_finite() && p.y.is_finite());
            assert_eq!(p.y, H);
        }
    }

    #[test]
    fn test_overflowing_span_stays_finite() {
        let geometry = layout(Size::new(W, H), &[-1e308, 1e308, 0.0]).unwrap();
        assert!(geometry.range.is_finite());
        for p in &geometry.line {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
        assert_eq!(geometry.line[0].y, H);
        assert!((geometry.line[1].y - H * 0.2).abs() < 1e-9);
        assert!((geometry.line[2].y - H * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_short_series_has_no_layout() {
        assert!(layout(Size::new(W, H), &[]).is_none());
        assert!(layout(Size::new(W, H), &[1.0]).is_none());
        assert!(layout(Size::new(W, H), &[1.0, f64::NAN]).is_none());
    }

    #[test]
    fn test_non_finite_samples_skipped() {
        let geometry = layout(Size::new(W, H), &[1.0, f64::NAN, 2.0, f64::INFINITY, 3.0]).unwrap();
        assert_eq!(geometry.line.len(), 3);
        assert_eq!(geometry.line[1].x, W / 2.0);
    }

    #[test]
    fn test_render_strokes_then_fills_area() {
        let mut surface = RecordingSurface::new(W, H);
        render_direction(&mut surface, &[1.0, 2.0, 3.0], Direction::Loss).unwrap();

        assert!(matches!(surface.ops()[0], DrawOp::Clear));
        assert!(matches!(surface.ops()[1], DrawOp::Stroke { .. }));
        assert!(matches!(surface.ops()[2], DrawOp::Fill { .. }));

        let stroke = surface.stroke().unwrap();
        assert_eq!(stroke.color, Palette::LOSS.line);
        assert_eq!(stroke.width, LINE_WIDTH);

        let (outline, fill) = surface.fill().unwrap();
        assert_eq!(outline.len(), 5);
        assert_eq!(outline[3], Point::new(W, H));
        assert_eq!(outline[4], Point::new(0.0, H));
        assert_eq!(fill.top.a, 0.1);
        assert_eq!(fill.bottom.a, 0.0);
        assert_eq!((fill.y0, fill.y1), (0.0, H));
    }

    #[test]
    fn test_render_short_series_leaves_surface_cleared() {
        let mut surface = RecordingSurface::new(W, H);
        render_direction(&mut surface, &[1.0, 2.0], Direction::Gain);
        assert!(!surface.is_blank());

        assert!(render_direction(&mut surface, &[5.0], Direction::Gain).is_none());
        assert!(surface.is_blank());
        assert_eq!(surface.clear_count(), 2);
    }

    #[test]
    fn test_render_is_idempotent() {
        let series = [100.0, 100.4, 99.8, 101.5];
        let mut once = RecordingSurface::new(W, H);
        render_direction(&mut once, &series, Direction::Gain);
        let mut twice = once.clone();
        render_direction(&mut twice, &series, Direction::Gain);
        assert_eq!(once.ops(), twice.ops());
    }
}
