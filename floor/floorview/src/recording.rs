//! A canvas that records drawing calls, for tests.

use inventory::Color;
use math::Point;

use crate::canvas::{Canvas, Font, RackAnnotation, TextOrientation, estimate_text_width};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Resize(Point),
    FillRect {
        origin: Point,
        size: Point,
        color: Color,
    },
    FillText {
        text: String,
        position: Point,
        font: Font,
        orientation: TextOrientation,
        color: Color,
    },
    AnnotateRack(RackAnnotation),
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Names of the annotated racks, in drawing order.
    pub fn annotated_racks(&self) -> Vec<&str> {
        self.annotations()
            .map(|annotation| annotation.name.as_str())
            .collect()
    }

    pub fn annotations(&self) -> impl Iterator<Item = &RackAnnotation> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::AnnotateRack(annotation) => Some(annotation),
                _ => None,
            })
    }

    pub fn rects(&self) -> Vec<(Point, Point, Color)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillRect {
                    origin,
                    size,
                    color,
                } => Some((*origin, *size, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<(&str, Point, Font, TextOrientation, Color)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillText {
                    text,
                    position,
                    font,
                    orientation,
                    color,
                } => Some((text.as_str(), *position, *font, *orientation, *color)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn resize(&mut self, size: Point) {
        self.calls.push(DrawCall::Resize(size));
    }

    fn fill_rect(&mut self, origin: Point, size: Point, color: Color) {
        self.calls.push(DrawCall::FillRect {
            origin,
            size,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, position: Point, font: Font, orientation: TextOrientation, color: Color) {
        self.calls.push(DrawCall::FillText {
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

    fn annotate_rack(&mut self, annotation: &RackAnnotation) {
        self.calls
            .push(DrawCall::AnnotateRack(annotation.clone()));
    }
}
