use inventory::ElementKey;
use math::Point;

/// Index of a view within its [`crate::FloorView`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) usize);

/// Drawing geometry of one hardware element within one floor view.
///
/// Grid values are fixed when the view is attached, draw values are derived from them on every zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
    pub(crate) element: ElementKey,
    pub(crate) name: String,
    pub(crate) obscured: bool,
    pub(crate) parent: Option<ViewId>,
    pub(crate) content: Vec<ViewId>,
    pub(crate) relative_pos: Point,
    pub(crate) grid_pos: Point,
    pub(crate) grid_size: Point,
    pub(crate) draw_pos: Point,
    pub(crate) draw_size: Point,
    pub(crate) fill_size: Point,
}

impl ElementView {
    pub(crate) fn new(element: ElementKey, name: &str, relative_pos: Point, grid_size: Point, obscured: bool) -> Self {
        Self {
            element,
            name: name.to_string(),
            obscured,
            parent: None,
            content: vec![],
            relative_pos,
            grid_pos: relative_pos,
            grid_size,
            draw_pos: Point::default(),
            draw_size: Point::default(),
            fill_size: Point::default(),
        }
    }

    /// Scales the grid geometry.  Boxes that are drawn lose a unit on each axis, when big enough, so
    /// neighbours stay visually separate.
    pub(crate) fn apply_zoom(&mut self, factor: f64) {
        self.draw_pos = self.grid_pos.scale(factor);
        self.draw_size = self.grid_size.scale(factor);
        self.fill_size = self.draw_size;

        if !self.obscured {
            if self.fill_size.x > 4.0 {
                self.fill_size.x -= 1.0;
            }
            if self.fill_size.y > 3.0 {
                self.fill_size.y -= 1.0;
            }
        }
    }

    pub fn element(&self) -> ElementKey {
        self.element
    }

    /// Last segment of the element's location.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_obscured(&self) -> bool {
        self.obscured
    }

    pub fn is_rack(&self) -> bool {
        self.parent.is_none()
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn content(&self) -> &[ViewId] {
        &self.content
    }

    pub fn relative_pos(&self) -> Point {
        self.relative_pos
    }

    pub fn grid_pos(&self) -> Point {
        self.grid_pos
    }

    pub fn grid_size(&self) -> Point {
        self.grid_size
    }

    pub fn draw_pos(&self) -> Point {
        self.draw_pos
    }

    /// Unshrunk size, used for hit-testing.
    pub fn draw_size(&self) -> Point {
        self.draw_size
    }

    /// Size of the filled box.
    pub fn fill_size(&self) -> Point {
        self.fill_size
    }

    pub fn contains(&self, point: Point) -> bool {
        point.is_within(self.draw_pos, self.draw_size)
    }
}
