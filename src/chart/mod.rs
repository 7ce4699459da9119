//! Sparkline charts: geometry, palettes, and the surface they draw into.
//!
//! The renderer never touches a real display. It computes a [`SparklineGeometry`] and
//! issues two commands (stroke the line, fill the area under it) against any
//! [`SparklineSurface`]. Tests use [`RecordingSurface`]; the browser build provides a
//! canvas-backed surface in `dom::canvas`.

pub mod sparkline;
pub mod surface;

use crate::shared::Direction;

pub use sparkline::{layout, render, render_direction, SparklineGeometry, LINE_WIDTH, PLOT_HEIGHT_RATIO};
pub use surface::{DrawOp, RecordingSurface, SparklineSurface};

/// A position on a surface, in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// CSS colour string: `#RRGGBB` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Line stroke style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

/// Top-to-bottom linear gradient spanning `y0..y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalGradient {
    pub y0: f64,
    pub y1: f64,
    pub top: Rgba,
    pub bottom: Rgba,
}

/// Colours for one sparkline: the line and its area tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub line: Rgba,
    pub fill_top: Rgba,
    pub fill_bottom: Rgba,
}

impl Palette {
    const FILL_ALPHA: f64 = 0.1;

    pub const fn from_line(line: Rgba) -> Self {
        Self {
            line,
            fill_top: line.with_alpha(Self::FILL_ALPHA),
            fill_bottom: line.with_alpha(0.0),
        }
    }

    /// `#00C805`
    pub const GAIN: Palette = Palette::from_line(Rgba::opaque(0x00, 0xC8, 0x05));
    /// `#FF5000`
    pub const LOSS: Palette = Palette::from_line(Rgba::opaque(0xFF, 0x50, 0x00));
    /// `#2563EB`, the detail page's price chart.
    pub const DETAIL: Palette = Palette::from_line(Rgba::opaque(0x25, 0x63, 0xEB));

    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Gain => Self::GAIN,
            Direction::Loss => Self::LOSS,
        }
    }

    pub fn stroke(&self) -> Stroke {
        Stroke {
            color: self.line,
            width: LINE_WIDTH,
        }
    }

    pub fn gradient(&self, height: f64) -> VerticalGradient {
        VerticalGradient {
            y0: 0.0,
            y1: height,
            top: self.fill_top,
            bottom: self.fill_bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_css() {
        assert_eq!(Palette::GAIN.line.to_css(), "#00C805");
        assert_eq!(Palette::LOSS.line.to_css(), "#FF5000");
        assert_eq!(Palette::GAIN.fill_top.to_css(), "rgba(0, 200, 5, 0.1)");
        assert_eq!(Palette::LOSS.fill_bottom.to_css(), "rgba(255, 80, 0, 0)");
    }

    #[test]
    fn test_palette_for_direction() {
        assert_eq!(Palette::for_direction(Direction::Gain), Palette::GAIN);
        assert_eq!(Palette::for_direction(Direction::Loss), Palette::LOSS);
        assert_eq!(Palette::GAIN.stroke().width, 1.5);
    }
}
