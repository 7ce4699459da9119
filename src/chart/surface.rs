//! The drawing surface a sparkline renders into.

use super::{Point, Size, Stroke, VerticalGradient};

/// A drawable line-plus-fill surface.
///
/// Implementations only need four primitives; all scaling happens in
/// [`super::sparkline`] before they are called.
pub trait SparklineSurface {
    fn size(&self) -> Size;

    /// Erase everything previously drawn.
    fn clear(&mut self);

    /// Stroke an open polyline through `points`.
    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke);

    /// Fill the closed polygon `outline` with a vertical gradient.
    fn fill_polygon(&mut self, outline: &[Point], fill: &VerticalGradient);
}

impl<S: SparklineSurface + ?Sized> SparklineSurface for Box<S> {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        (**self).stroke_polyline(points, stroke)
    }

    fn fill_polygon(&mut self, outline: &[Point], fill: &VerticalGradient) {
        (**self).fill_polygon(outline, fill)
    }
}

/// One recorded drawing command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Stroke { points: Vec<Point>, stroke: Stroke },
    Fill { outline: Vec<Point>, fill: VerticalGradient },
}

/// In-memory surface that records the current frame's commands.
///
/// `clear` discards the previous frame, so `ops()` always describes what is on the
/// surface right now.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSurface {
    size: Size,
    ops: Vec<DrawOp>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
            clears: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// How many times the surface has been cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// Nothing but (at most) a clear on the surface.
    pub fn is_blank(&self) -> bool {
        self.ops.iter().all(|op| matches!(op, DrawOp::Clear))
    }

    /// Points of the stroked line currently shown.
    pub fn line(&self) -> Option<&[Point]> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Stroke { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn stroke(&self) -> Option<&Stroke> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Stroke { stroke, .. } => Some(stroke),
            _ => None,
        })
    }

    pub fn fill(&self) -> Option<(&[Point], &VerticalGradient)> {
        self.ops.iter().rev().find_map(|op| match op {
            DrawOp::Fill { outline, fill } => Some((outline.as_slice(), fill)),
            _ => None,
        })
    }
}

impl SparklineSurface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear);
        self.clears += 1;
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        self.ops.push(DrawOp::Stroke {
            points: points.to_vec(),
            stroke: *stroke,
        });
    }

    fn fill_polygon(&mut self, outline: &[Point], fill: &VerticalGradient) {
        self.ops.push(DrawOp::Fill {
            outline: outline.to_vec(),
            fill: *fill,
        });
    }
}
