use inventory::Color;
use math::Point;

/// Average glyph width as a fraction of the font size, for canvases without font metrics.
pub const AVERAGE_GLYPH_WIDTH: f64 = 0.6;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Font {
    pub px: f64,
    pub bold: bool,
}

impl Font {
    pub const fn new(px: f64, bold: bool) -> Self {
        Self {
            px,
            bold,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextOrientation {
    Horizontal,
    /// rotated by -90 degrees about the text position, reading bottom to top
    Vertical,
}

/// Per-rack decoration state, refreshed every time a rack is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RackAnnotation {
    pub name: String,
    pub origin: Point,
    pub size: Point,
    /// some location in the rack is in error or missing
    pub attention: bool,
    /// some location in the rack is selected
    pub highlight: bool,
}

/// A 2D drawing surface.
///
/// Coordinates are drawing units with the origin at the top-left and y increasing downwards.  Later
/// drawing covers earlier drawing.
pub trait Canvas {
    /// Resizes the surface, discarding everything drawn so far.
    fn resize(&mut self, size: Point);

    fn fill_rect(&mut self, origin: Point, size: Point, color: Color);

    /// `position` is the left end of the text baseline, before any rotation.
    fn fill_text(&mut self, text: &str, position: Point, font: Font, orientation: TextOrientation, color: Color);

    /// Width of the text when drawn with `font`.
    fn measure_text(&self, text: &str, font: Font) -> f64;

    /// Called before a rack is drawn.  Everything drawn up to the rack's [`Canvas::annotate_rack`] belongs
    /// to that rack and replaces its previous drawing.
    fn begin_rack(&mut self, _name: &str) {}

    /// Ends the drawing of a rack.
    fn annotate_rack(&mut self, annotation: &RackAnnotation);
}

pub fn estimate_text_width(text: &str, font: Font) -> f64 {
    text.chars().count() as f64 * font.px * AVERAGE_GLYPH_WIDTH
}
