//! Zoomable floor and rack diagrams of a hardware inventory, redrawn incrementally as the inventory
//! changes.

pub mod canvas;
pub mod floor;
pub mod palette;
pub mod svg;
pub mod view;

#[cfg(feature = "testing")]
pub mod recording;

pub use canvas::{Canvas, Font, RackAnnotation, TextOrientation};
pub use floor::{FloorView, ViewError};
pub use palette::ViewPalette;
pub use svg::SvgCanvas;
pub use view::{ElementView, ViewId};

#[cfg(test)]
mod tests;
