use std::collections::BTreeMap;

use inventory::layout::{ContentItem, LayoutError, LayoutView};
use inventory::{ElementKey, HardwareElement, HardwareSet, InventoryObserver, RackSet};
use math::Point;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::canvas::{Canvas, Font, RackAnnotation, TextOrientation};
use crate::palette::ViewPalette;
use crate::view::{ElementView, ViewId};

/// Racks whose height is at least this multiple of their width get a vertical label.
pub const VERTICAL_LABEL_RATIO: f64 = 2.0;

const COMPONENT_LABEL_FONT: Font = Font::new(8.0, false);
const COMPONENT_LABEL_OFFSET: Point = Point::new(2.0, 8.0);
const COMPONENT_LABEL_MIN_SIZE: Point = Point::new(15.0, 10.0);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("No hardware for view. location: '{0}'")]
    MissingHardware(String),
    #[error("Unknown zoom level. level: {level}, levels: {levels}")]
    UnknownZoomLevel { level: usize, levels: usize },
    #[error("Not a rack of this view. view: {0}")]
    UnknownRackView(usize),
}

/// A zoomable diagram of racks, drawn onto a [`Canvas`].
///
/// A floor view mirrors the hardware tree built from the same layout view, one [`ElementView`] per
/// element, and holds only geometry.  Element state, jobs and selection are read from the
/// [`HardwareSet`] at draw time.
///
/// Nothing is drawn until a zoom has been applied.  Registered as an [`InventoryObserver`] it redraws
/// the racks named in each change notification.
pub struct FloorView<C: Canvas> {
    name: String,
    description: Option<String>,
    views: Vec<ElementView>,
    racks: Vec<ViewId>,
    grid_size: Point,
    draw_size: Point,
    zoom_level: usize,
    zoom_scales: Vec<f64>,
    rack_scale: f64,
    scale: Option<f64>,
    label_components: bool,
    descriptions: BTreeMap<String, String>,
    palette: ViewPalette,
    canvas: C,
}

impl<C: Canvas> FloorView<C> {
    fn new(name: &str, layout: &LayoutView, canvas: C, palette: ViewPalette) -> Self {
        let descriptions = layout
            .descriptions()
            .into_iter()
            .map(|(hwtype, description)| (hwtype.to_string(), description.to_string()))
            .collect();

        Self {
            name: name.to_string(),
            description: None,
            views: vec![],
            racks: vec![],
            grid_size: Point::default(),
            draw_size: Point::default(),
            zoom_level: layout.initzoom,
            zoom_scales: layout.zoomscales.clone(),
            rack_scale: layout.rackscale,
            scale: None,
            label_components: false,
            descriptions,
            palette,
            canvas,
        }
    }

    /// Builds the views for every rack placed on the floor of `layout`, which must be the layout view
    /// `hardware` was built from.
    pub fn from_layout(
        name: &str,
        layout: &LayoutView,
        hardware: &HardwareSet,
        canvas: C,
        palette: ViewPalette,
    ) -> Result<Self, ViewError> {
        let mut floor = Self::new(name, layout, canvas, palette);
        floor.grid_size = layout.floor.size();
        floor.description = layout.floor.description.clone();

        for item in &layout.floor.content {
            floor.add_rack(layout, hardware, item, item.position())?;
        }

        info!(
            "Floor view built. view: '{}', racks: {}, views: {}",
            floor.name,
            floor.racks.len(),
            floor.views.len()
        );
        Ok(floor)
    }

    /// Builds a view of a single rack, placed at the origin, with component labels.
    pub fn rack_view(
        name: &str,
        layout: &LayoutView,
        hardware: &HardwareSet,
        rack: &str,
        canvas: C,
        palette: ViewPalette,
    ) -> Result<Self, ViewError> {
        let item = layout
            .floor
            .content
            .iter()
            .find(|item| item.name == rack)
            .ok_or_else(|| LayoutError::UnknownRack(rack.to_string()))?;

        let mut floor = Self::new(name, layout, canvas, palette);
        floor.label_components = true;
        floor.grid_size = layout.definition(&item.definition)?.size();
        floor.description = Some(format!("Rack {}", rack));
        floor.add_rack(layout, hardware, item, Point::default())?;

        info!("Rack view built. view: '{}', rack: '{}', views: {}", floor.name, rack, floor.views.len());
        Ok(floor)
    }

    fn add_rack(
        &mut self,
        layout: &LayoutView,
        hardware: &HardwareSet,
        item: &ContentItem,
        position: Point,
    ) -> Result<(), ViewError> {
        let id = self.attach(layout, hardware, None, &item.name, item, position)?;
        self.racks.push(id);
        self.add_content(layout, hardware, id, &item.name, &item.definition)
    }

    fn add_content(
        &mut self,
        layout: &LayoutView,
        hardware: &HardwareSet,
        parent: ViewId,
        location: &str,
        definition: &str,
    ) -> Result<(), ViewError> {
        for item in &layout.definition(definition)?.content {
            let child_location = format!("{}-{}", location, item.name);
            let id = self.attach(layout, hardware, Some(parent), &child_location, item, item.position())?;
            self.add_content(layout, hardware, id, &child_location, &item.definition)?;
        }
        Ok(())
    }

    fn attach(
        &mut self,
        layout: &LayoutView,
        hardware: &HardwareSet,
        parent: Option<ViewId>,
        location: &str,
        item: &ContentItem,
        relative_pos: Point,
    ) -> Result<ViewId, ViewError> {
        let element = hardware
            .get_by_location(location)
            .ok_or_else(|| ViewError::MissingHardware(location.to_string()))?;
        let definition = layout.definition(&item.definition)?;

        let mut view = ElementView::new(element, &item.name, relative_pos, definition.size(), definition.obscured);
        let id = ViewId(self.views.len());
        if let Some(parent) = parent {
            view.parent = Some(parent);
            view.grid_pos = self.views[parent.0]
                .grid_pos
                .offset(relative_pos);
            self.views[parent.0].content.push(id);
        }
        self.views.push(view);

        Ok(id)
    }

    /// Zooms to one of the layout's zoom scales.
    pub fn apply_zoom(&mut self, level: usize) -> Result<&mut Self, ViewError> {
        let scale = *self
            .zoom_scales
            .get(level)
            .ok_or(ViewError::UnknownZoomLevel {
                level,
                levels: self.zoom_scales.len(),
            })?;
        self.zoom_level = level;
        Ok(self.apply_scaled_zoom(scale))
    }

    /// Zooms to the layout's single-rack scale.
    pub fn apply_rack_zoom(&mut self) -> &mut Self {
        self.apply_scaled_zoom(self.rack_scale)
    }

    fn apply_scaled_zoom(&mut self, scale: f64) -> &mut Self {
        self.scale = Some(scale);
        self.draw_size = self.grid_size.scale(scale);
        self.canvas.resize(self.draw_size);
        for view in &mut self.views {
            view.apply_zoom(scale);
        }
        debug!("Zoom applied. view: '{}', scale: {}, size: {}", self.name, scale, self.draw_size);
        self
    }

    /// Redraws every rack.
    pub fn draw(&mut self, hardware: &HardwareSet) {
        let racks = self.racks.clone();
        self.redraw_racks(hardware, &racks);
    }

    /// Redraws the given racks, the rest of the canvas is left alone.
    ///
    /// Every id must be one of [`Self::racks`], otherwise nothing is drawn.
    pub fn draw_racks(&mut self, hardware: &HardwareSet, racks: &[ViewId]) -> Result<(), ViewError> {
        if let Some(unknown) = racks
            .iter()
            .find(|id| !self.racks.contains(id))
        {
            return Err(ViewError::UnknownRackView(unknown.0));
        }
        self.redraw_racks(hardware, racks);
        Ok(())
    }

    fn redraw_racks(&mut self, hardware: &HardwareSet, racks: &[ViewId]) {
        if self.scale.is_none() {
            warn!("Floor view drawn before zoom, nothing to draw. view: '{}'", self.name);
            return;
        }
        trace!("Drawing racks. view: '{}', racks: {}", self.name, racks.len());

        for rack in racks {
            self.draw_rack(hardware, *rack);
        }
    }

    fn draw_rack(&mut self, hardware: &HardwareSet, id: ViewId) {
        let view = &self.views[id.0];
        let (origin, size) = (view.draw_pos, view.fill_size);

        self.canvas.begin_rack(&view.name);
        self.canvas
            .fill_rect(origin, size, self.palette.rack_background);
        self.draw_view(hardware, id);
        self.draw_border(origin, size);
        self.draw_label(id);

        let view = &self.views[id.0];
        match hardware
            .get(view.element)
            .and_then(HardwareElement::counters)
        {
            Some(counters) => {
                let annotation = RackAnnotation {
                    name: view.name.clone(),
                    origin,
                    size,
                    attention: counters.needs_attention(),
                    highlight: counters.selected > 0,
                };
                self.canvas.annotate_rack(&annotation);
            }
            None => warn!("No rack counters for rack view. rack: '{}'", view.name),
        }
    }

    /// Draws a view then its content.  Obscured views are not drawn themselves.
    fn draw_view(&mut self, hardware: &HardwareSet, id: ViewId) {
        let view = &self.views[id.0];
        if !view.obscured {
            match hardware.get(view.element) {
                Some(element) => self.draw_element(element, id),
                None => warn!("No hardware for view, skipping. view: '{}'", view.name),
            }
        }

        for child in self.views[id.0].content.clone() {
            self.draw_view(hardware, child);
        }
    }

    fn draw_element(&mut self, element: &HardwareElement, id: ViewId) {
        let view = &self.views[id.0];
        let color = match element.is_selected() {
            true => self.palette.selected,
            false => element
                .job()
                .and_then(|job| job.borrow().color())
                .unwrap_or_else(|| {
                    self.palette
                        .state_color(element.hwtype(), element.state())
                }),
        };
        self.canvas
            .fill_rect(view.draw_pos, view.fill_size, color);

        if self.label_components
            && view.fill_size.x > COMPONENT_LABEL_MIN_SIZE.x
            && view.fill_size.y > COMPONENT_LABEL_MIN_SIZE.y
        {
            self.canvas.fill_text(
                &view.name,
                view.draw_pos + COMPONENT_LABEL_OFFSET,
                COMPONENT_LABEL_FONT,
                TextOrientation::Horizontal,
                self.palette.component_label,
            );
        }
    }

    /// One unit wide, just outside the rack.
    fn draw_border(&mut self, origin: Point, size: Point) {
        let color = self.palette.rack_border;
        let (x, y, w, h) = (origin.x, origin.y, size.x, size.y);

        for (origin, size) in [
            (Point::new(x - 1.0, y - 1.0), Point::new(w + 2.0, 1.0)),
            (Point::new(x - 1.0, y + h), Point::new(w + 2.0, 1.0)),
            (Point::new(x - 1.0, y - 1.0), Point::new(1.0, h + 2.0)),
            (Point::new(x + w, y - 1.0), Point::new(1.0, h + 2.0)),
        ] {
            self.canvas.fill_rect(origin, size, color);
        }
    }

    /// Horizontal across the top of wide racks, vertical and centred on tall racks.  Font sizes
    /// follow the rack width.
    fn draw_label(&mut self, id: ViewId) {
        let view = &self.views[id.0];
        let name = view.name.as_str();
        let (x, y) = (view.draw_pos.x, view.draw_pos.y);
        let (w, h) = (view.fill_size.x, view.fill_size.y);

        let color = match self.label_components {
            true => self.palette.rack_dim_label,
            false => self.palette.rack_label,
        };

        let orientation = match view.fill_size.aspect_ratio() < VERTICAL_LABEL_RATIO {
            true => TextOrientation::Horizontal,
            false => TextOrientation::Vertical,
        };
        let px = match orientation {
            TextOrientation::Horizontal => ((w / name.chars().count() as f64) / 1.25).floor(),
            TextOrientation::Vertical => (w / 1.5).floor(),
        };
        if !(px >= 1.0 && px.is_finite()) {
            trace!("Rack label too small to draw. rack: '{}', px: {}", name, px);
            return;
        }

        let font = Font::new(px, true);
        let width = self.canvas.measure_text(name, font);
        let position = match orientation {
            TextOrientation::Horizontal => Point::new(x + ((w - width).max(0.0) / 2.0).floor(), y + px),
            TextOrientation::Vertical => Point::new(x + px, y + ((h - width).max(0.0) / 2.0).floor() + width),
        };

        self.canvas
            .fill_text(name, position, font, orientation, color);
    }

    /// The view under `point`.  A floor view only resolves racks, a rack view resolves the innermost
    /// drawn component and falls back to the rack.
    pub fn view_at(&self, point: Point) -> Option<ViewId> {
        let rack = self
            .racks
            .iter()
            .copied()
            .find(|rack| self.views[rack.0].contains(point))?;

        if !self.label_components {
            return Some(rack);
        }
        Some(self.component_at(rack, point).unwrap_or(rack))
    }

    fn component_at(&self, id: ViewId, point: Point) -> Option<ViewId> {
        let view = &self.views[id.0];
        view.content
            .iter()
            .copied()
            .filter(|child| self.views[child.0].contains(point))
            .find_map(|child| {
                self.component_at(child, point)
                    .or_else(|| (!self.views[child.0].obscured).then_some(child))
            })
    }

    pub fn element_at(&self, point: Point) -> Option<ElementKey> {
        self.view_at(point)
            .map(|id| self.views[id.0].element)
    }

    /// Text describing the element of a view, as shown when hovering over it.
    pub fn hover_text(&self, hardware: &HardwareSet, id: ViewId) -> Option<String> {
        let view = self.views.get(id.0)?;
        let element = hardware.get(view.element)?;
        let description = self
            .descriptions
            .get(element.hwtype())
            .map(String::as_str)
            .unwrap_or_default();

        let mut lines = vec![];
        match (view.is_rack(), element.counters()) {
            (true, Some(counters)) => {
                lines.push(format!("Rack {}   {}", view.name, description));
                if counters.errors > 0 {
                    lines.push(format!("{} locations in error", counters.errors));
                }
                if counters.missing > 0 {
                    lines.push(format!("{} locations marked missing", counters.missing));
                }
            }
            _ => {
                lines.push(format!("{}    {}", element.location(), description));
                if let Some(state) = element.state() {
                    lines.push(format!("State: {} ({})", state.name(), state.code()));
                }
            }
        }
        Some(lines.join("\n"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn racks(&self) -> &[ViewId] {
        &self.racks
    }

    /// `None` for ids of another floor view.
    pub fn view(&self, id: ViewId) -> Option<&ElementView> {
        self.views.get(id.0)
    }

    pub fn views(&self) -> impl Iterator<Item = (ViewId, &ElementView)> {
        self.views
            .iter()
            .enumerate()
            .map(|(index, view)| (ViewId(index), view))
    }

    pub fn rack_of_element(&self, element: ElementKey) -> Option<ViewId> {
        self.racks
            .iter()
            .copied()
            .find(|rack| self.views[rack.0].element == element)
    }

    pub fn grid_size(&self) -> Point {
        self.grid_size
    }

    pub fn draw_size(&self) -> Point {
        self.draw_size
    }

    pub fn zoom_level(&self) -> usize {
        self.zoom_level
    }

    pub fn zoom_scales(&self) -> &[f64] {
        &self.zoom_scales
    }

    /// The applied scale, `None` until zoomed.
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    pub fn labels_components(&self) -> bool {
        self.label_components
    }

    pub fn palette(&self) -> &ViewPalette {
        &self.palette
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

impl<C: Canvas> InventoryObserver for FloorView<C> {
    fn observed_change(&mut self, source: &HardwareSet, change: Option<&RackSet>) {
        match change {
            None => self.draw(source),
            Some(changed) => {
                let racks: Vec<ViewId> = self
                    .racks
                    .iter()
                    .copied()
                    .filter(|rack| changed.contains(&self.views[rack.0].element))
                    .collect();
                self.redraw_racks(source, &racks);
            }
        }
    }
}
