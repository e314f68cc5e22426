use std::fmt::Write;

use indexmap::IndexMap;
use inventory::Color;
use itertools::Itertools;
use math::Point;

use crate::canvas::{Canvas, Font, RackAnnotation, TextOrientation, estimate_text_width};

const FONT_FAMILY: &str = "sans-serif";

const STYLE: &str = ".rack { fill: none; stroke: none; } \
.rack-attention { stroke: #ff0000; stroke-width: 2; } \
.rack-highlight { stroke: #008000; stroke-width: 2; }";

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Rect {
        origin: Point,
        size: Point,
        color: Color,
    },
    Text {
        text: String,
        position: Point,
        font: Font,
        orientation: TextOrientation,
        color: Color,
    },
}

/// A canvas that keeps a display list and renders it as an SVG document.
///
/// Shapes drawn outside a rack come first, then each rack's shapes in the order the racks were first
/// drawn.  Redrawing a rack replaces its shapes.  Rack annotations become transparent outlines, classed
/// by their flags, on top of everything.
#[derive(Debug, Default)]
pub struct SvgCanvas {
    size: Point,
    shapes: Vec<Shape>,
    racks: IndexMap<String, Vec<Shape>>,
    /// rack being drawn, between `begin_rack` and `annotate_rack`
    current_rack: Option<String>,
    annotations: IndexMap<String, RackAnnotation>,
}

impl SvgCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
            + self
                .racks
                .values()
                .map(Vec::len)
                .sum::<usize>()
    }

    fn push(&mut self, shape: Shape) {
        let shapes = match &self.current_rack {
            Some(rack) => self.racks.entry(rack.clone()).or_default(),
            None => &mut self.shapes,
        };
        shapes.push(shape);
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // writing to a String cannot fail
        let _ = self.write_svg(&mut svg);
        svg
    }

    fn write_svg(&self, svg: &mut String) -> std::fmt::Result {
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.size.x, self.size.y, self.size.x, self.size.y
        )?;
        writeln!(svg, "<style>{}</style>", STYLE)?;

        for shape in self
            .shapes
            .iter()
            .chain(self.racks.values().flatten())
        {
            match shape {
                Shape::Rect {
                    origin,
                    size,
                    color,
                } => {
                    writeln!(
                        svg,
                        r#"<rect x="{}" y="{}" width="{}" height="{}" {}/>"#,
                        origin.x,
                        origin.y,
                        size.x,
                        size.y,
                        fill(color)
                    )?;
                }
                Shape::Text {
                    text,
                    position,
                    font,
                    orientation,
                    color,
                } => {
                    let placement = match orientation {
                        TextOrientation::Horizontal => format!(r#"x="{}" y="{}""#, position.x, position.y),
                        TextOrientation::Vertical => {
                            format!(r#"transform="translate({},{}) rotate(-90)""#, position.x, position.y)
                        }
                    };
                    let weight = match font.bold {
                        true => r#" font-weight="bold""#,
                        false => "",
                    };
                    writeln!(
                        svg,
                        r#"<text {} font-family="{}" font-size="{}"{} {}>{}</text>"#,
                        placement,
                        FONT_FAMILY,
                        font.px,
                        weight,
                        fill(color),
                        escape(text)
                    )?;
                }
            }
        }

        for annotation in self.annotations.values() {
            let classes = [
                Some("rack"),
                annotation
                    .attention
                    .then_some("rack-attention"),
                annotation
                    .highlight
                    .then_some("rack-highlight"),
            ]
            .into_iter()
            .flatten()
            .join(" ");

            writeln!(
                svg,
                r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}"><title>{}</title></rect>"#,
                classes,
                annotation.origin.x,
                annotation.origin.y,
                annotation.size.x,
                annotation.size.y,
                escape(&annotation.name)
            )?;
        }

        writeln!(svg, "</svg>")
    }
}

fn fill(color: &Color) -> String {
    match color.is_opaque() {
        true => format!(r#"fill="{}""#, color.to_hex()),
        false => format!(r#"fill="{}" fill-opacity="{}""#, color.to_hex(), color.a),
    }
}

fn escape(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            other => other.to_string(),
        })
        .collect()
}

impl Canvas for SvgCanvas {
    fn resize(&mut self, size: Point) {
        self.size = size;
        self.shapes.clear();
        self.racks.clear();
        self.current_rack = None;
        self.annotations.clear();
    }

    fn fill_rect(&mut self, origin: Point, size: Point, color: Color) {
        self.push(Shape::Rect {
            origin,
            size,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, position: Point, font: Font, orientation: TextOrientation, color: Color) {
        self.push(Shape::Text {
            text: text.to_string(),
            position,
            font,
            orientation,
            color,
        });
    }

    fn measure_text(&self, text: &str, font: Font) -> f64 {
        estimate_text_width(text, font)
    }

    fn begin_rack(&mut self, name: &str) {
        self.racks
            .entry(name.to_string())
            .or_default()
            .clear();
        self.current_rack = Some(name.to_string());
    }

    fn annotate_rack(&mut self, annotation: &RackAnnotation) {
        self.current_rack = None;
        self.annotations
            .insert(annotation.name.clone(), annotation.clone());
    }
}
