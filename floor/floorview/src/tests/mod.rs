mod drawing;
mod hit_test;

use inventory::testing::compute_layout;
use inventory::{ElementKey, HardwareSet, InventoryOptions, LayoutView};

use crate::palette::ViewPalette;
use crate::recording::RecordingCanvas;
use crate::{FloorView, ViewId};

pub(crate) struct Fixture {
    pub layout: LayoutView,
    pub hardware: HardwareSet,
}

impl Fixture {
    pub fn new(racks: &[&str]) -> Self {
        Self::from_layout(compute_layout(racks))
    }

    pub fn from_layout(layout: LayoutView) -> Self {
        let hardware = HardwareSet::from_layout(&layout, InventoryOptions::default()).unwrap();
        Self {
            layout,
            hardware,
        }
    }

    pub fn floor(&self) -> FloorView<RecordingCanvas> {
        FloorView::from_layout(
            "Full",
            &self.layout,
            &self.hardware,
            RecordingCanvas::default(),
            ViewPalette::default(),
        )
        .unwrap()
    }

    pub fn rack(&self, rack: &str) -> FloorView<RecordingCanvas> {
        FloorView::rack_view(
            "Full",
            &self.layout,
            &self.hardware,
            rack,
            RecordingCanvas::default(),
            ViewPalette::default(),
        )
        .unwrap()
    }

    pub fn key(&self, location: &str) -> ElementKey {
        self.hardware
            .get_by_location(location)
            .unwrap()
    }
}

pub(crate) fn view_of(floor: &FloorView<RecordingCanvas>, fixture: &Fixture, location: &str) -> ViewId {
    let element = fixture.key(location);
    floor
        .views()
        .find(|(_id, view)| view.element() == element)
        .map(|(id, _view)| id)
        .unwrap()
}
