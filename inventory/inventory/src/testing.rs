//! Layout fixtures shared by the tests of this crate and of the view crates.

use indexmap::IndexMap;

use crate::layout::{ContentItem, FloorPlan, HardwareDefinition, LayoutView};

pub const RACK_WIDTH: f64 = 5.0;
pub const RACK_HEIGHT: f64 = 10.0;
pub const RACK_SPACING: f64 = 6.0;

pub fn item(name: &str, definition: &str, x: f64, y: f64) -> ContentItem {
    ContentItem {
        name: name.to_string(),
        definition: definition.to_string(),
        x,
        y,
    }
}

pub fn definition(description: &str, width: f64, height: f64, obscured: bool, content: Vec<ContentItem>) -> HardwareDefinition {
    HardwareDefinition {
        description: description.to_string(),
        hwtype: None,
        width,
        height,
        obscured,
        content,
    }
}

/// One `compute-rack` per name, placed left to right.  Each rack holds two `compute-chassis` of four
/// `compute-node`s; the rack content is listed out of name order.
pub fn compute_layout(racks: &[&str]) -> LayoutView {
    let content = racks
        .iter()
        .enumerate()
        .map(|(index, name)| item(name, "compute-rack", index as f64 * RACK_SPACING, 0.0))
        .collect();

    let nodes = (0..4)
        .map(|index| item(&format!("CN{}", index), "compute-node", 0.0, index as f64))
        .collect();

    LayoutView {
        description: Some("Test Floor".to_string()),
        initzoom: 0,
        zoomscales: vec![1.0, 4.0],
        rackscale: 8.0,
        floor: FloorPlan {
            description: Some("The test floor".to_string()),
            width: racks.len() as f64 * RACK_SPACING,
            height: RACK_HEIGHT,
            content,
        },
        definitions: IndexMap::from([
            (
                "compute-rack".to_string(),
                definition("Compute Rack", RACK_WIDTH, RACK_HEIGHT, true, vec![
                    item("CH1", "compute-chassis", 0.0, 5.0),
                    item("CH0", "compute-chassis", 0.0, 0.0),
                ]),
            ),
            (
                "compute-chassis".to_string(),
                definition("Compute Chassis", RACK_WIDTH, 4.0, false, nodes),
            ),
            (
                "compute-node".to_string(),
                definition("Compute Node", RACK_WIDTH, 1.0, false, vec![]),
            ),
        ]),
    }
}
