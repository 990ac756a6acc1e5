//! Drawing primitives the chart layout emits.
//!
//! The layout never talks to an output format directly: it calls a
//! [`Renderer`], which the SVG writer and the primitive recorder implement.

use serde::Serialize;

use crate::layout::{AngleInterval, Point};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub color: String,
    pub opacity: f64,
}

/// Text laid along an arc centered on `center`.
///
/// `span` is the angular room the text may use; the text is centered on
/// `span.mid()`, which is also its rotation from noon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcText {
    pub lines: Vec<String>,
    pub center: Point,
    pub radius: f64,
    pub span: AngleInterval,
    pub font_size: f64,
    pub line_height: f64,
    pub color: String,
    pub font_family: String,
}

impl ArcText {
    pub fn rotation(&self) -> f64 {
        self.span.mid()
    }
}

/// Text orientation for [`PlainText`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TextOrientation {
    Horizontal,
    /// Rotated by the given angle (degrees, clockwise).
    Rotated(f64),
}

/// Straight text block centered on `anchor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlainText {
    pub lines: Vec<String>,
    pub anchor: Point,
    pub orientation: TextOrientation,
    pub font_size: f64,
    pub line_height: f64,
    pub color: String,
    pub font_family: String,
}

pub trait Renderer {
    /// Arc of `radius` around `center` over `span` (degrees clockwise from
    /// noon). A span of 360 degrees or more is a full circle.
    fn draw_arc(&mut self, center: Point, radius: f64, span: AngleInterval, stroke: &Stroke);

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke);

    /// Closed polygon; the last point connects back to the first.
    fn fill_region(&mut self, boundary: &[Point], fill: &Fill);

    fn draw_text_on_arc(&mut self, text: &ArcText);

    fn draw_text(&mut self, text: &PlainText);
}
